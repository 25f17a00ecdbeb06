use crate::{graph::node::RenderCtx, MIN_TIME};

/*
Click Envelope
==============

A metronome click is a percussive blip: it jumps up almost instantly and
then fades out. There is no decay-to-sustain segment and no gate to hold,
so the envelope is a two-ramp shape that runs to completion on its own.

  Level
    1.0 ┐ ╱╲
        │╱  ╲
        │     ╲
        │       ╲
    0.0 └─────────╲──→ Time
        A   Release
       1ms   50ms

  attack   Linear ramp 0 → 1. Short enough to read as a transient but long
           enough (1ms) to avoid a DC step, which would sound as a pop.

  release  Linear ramp 1 → 0, starting on the sample after the attack
           peaks. The click is over once release reaches zero.

The envelope is unit-height. Loudness is applied by the graph node that
wraps it (see `graph::envelope::EnvNode`), so one envelope shape serves
every click role.


The State Machine
-----------------

    ┌──────┐  note_on   ┌────────┐  level=1   ┌─────────┐
    │ Idle │ ─────────→ │ Attack │ ─────────→ │ Release │
    └──────┘            └────────┘            └─────────┘
        ↑                                          │
        └────────────────── level=0 ───────────────┘

note_on always restarts from zero. Release is interpolated from a snapshot
taken when the attack peaks, so it lands exactly on 0.0.
*/

/// Attack of a metronome click, in seconds.
pub const CLICK_ATTACK: f32 = 0.001;
/// Release of a metronome click, in seconds.
pub const CLICK_RELEASE: f32 = 0.050;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Release,
}

pub struct Envelope {
    attack_time: f32,
    release_time: f32,

    stage: EnvelopeState,
    level: f32,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    /// The 1ms / 50ms click shape.
    pub fn click() -> Self {
        Self::attack_release(CLICK_ATTACK, CLICK_RELEASE)
    }

    pub fn attack_release(attack: f32, release: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            release_time: release.max(MIN_TIME),

            stage: EnvelopeState::Idle,
            level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    /// Start the attack from zero.
    pub fn note_on(&mut self, _ctx: &RenderCtx) {
        self.level = 0.0;
        self.stage = EnvelopeState::Attack;
        self.release_elapsed_samples = 0;
    }

    fn begin_release(&mut self, ctx: &RenderCtx) {
        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * ctx.sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeState::Release;
    }

    /// Advance the envelope by one sample.
    pub fn next_sample(&mut self, ctx: &RenderCtx) {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                let increment = 1.0 / (self.attack_time * ctx.sample_rate);
                self.level += increment;

                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.begin_release(ctx);
                }
            }

            EnvelopeState::Release => {
                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            self.next_sample(ctx);
            *sample = self.level;
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn ctx() -> RenderCtx {
        RenderCtx::from_freq(SAMPLE_RATE, 800.0, 1.0)
    }

    #[test]
    fn attack_peaks_after_one_millisecond() {
        let mut env = Envelope::click();
        let ctx = ctx();
        env.note_on(&ctx);

        let attack_samples = (CLICK_ATTACK * SAMPLE_RATE).round() as usize;
        for _ in 0..=attack_samples {
            env.next_sample(&ctx);
        }

        assert_relative_eq!(env.level(), 1.0, epsilon = 1e-3);
        assert_eq!(env.state(), EnvelopeState::Release);
    }

    #[test]
    fn release_starts_right_after_the_peak() {
        let mut env = Envelope::click();
        let ctx = ctx();
        env.note_on(&ctx);

        let mut buffer = vec![0.0f32; 60];
        env.render(&mut buffer, &ctx);

        let peak = (0..buffer.len())
            .max_by(|&a, &b| buffer[a].total_cmp(&buffer[b]))
            .unwrap();
        assert_relative_eq!(buffer[peak], 1.0, epsilon = 1e-6);
        assert!(buffer[peak + 1] < buffer[peak], "no hold after the peak");
    }

    #[test]
    fn click_goes_idle_after_about_51_milliseconds() {
        let mut env = Envelope::click();
        let ctx = ctx();
        env.note_on(&ctx);

        let total = ((CLICK_ATTACK + CLICK_RELEASE) * SAMPLE_RATE).round() as usize;
        let mut buffer = vec![0.0f32; total - 10];
        env.render(&mut buffer, &ctx);
        assert!(env.is_active(), "still releasing just before the end");

        let mut tail = vec![0.0f32; 20];
        env.render(&mut tail, &ctx);
        assert!(!env.is_active());
        assert_eq!(env.level(), 0.0);
    }
}
