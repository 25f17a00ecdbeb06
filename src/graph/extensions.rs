use crate::graph::{amplify::Amplify, node::GraphNode};

pub trait NodeExt: GraphNode + Sized {
    /// Multiply this node's output by `modulator` (typically an envelope).
    fn amplify<M: GraphNode>(self, modulator: M) -> Amplify<Self, M> {
        Amplify::new(self, modulator)
    }
}

impl<T: GraphNode> NodeExt for T {}
