use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use tracing::debug;

use crate::sequencing::Tempo;

/// Taps further apart than this start a new estimate.
pub const TAP_RESET_GAP: Duration = Duration::from_millis(1_000);
/// Most recent taps kept in the window.
pub const TAP_WINDOW: usize = 3;

/// Tap-based tempo estimator.
///
/// Keeps the last three taps and averages their spacing. Timestamps are
/// supplied by the caller, so the estimate is fully reproducible.
///
/// ```
/// use std::time::{Duration, Instant};
/// use saavy_metronome::sequencing::TapTempo;
///
/// let mut tapper = TapTempo::new();
/// let t0 = Instant::now();
/// tapper.register_tap(t0);
/// let bpm = tapper.register_tap(t0 + Duration::from_millis(500));
/// assert_eq!(bpm.map(|t| t.bpm()), Some(120));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TapTempo {
    taps: VecDeque<Instant>,
    locked: bool,
}

impl TapTempo {
    pub fn new() -> Self {
        Self {
            taps: VecDeque::with_capacity(TAP_WINDOW + 1),
            locked: false,
        }
    }

    /// Register a tap at `at`.
    ///
    /// Returns the clamped estimate once at least two taps are in the
    /// window. While locked, taps are ignored and nothing is returned.
    pub fn register_tap(&mut self, at: Instant) -> Option<Tempo> {
        if self.locked {
            return None;
        }

        if let Some(&last) = self.taps.back() {
            if at.saturating_duration_since(last) > TAP_RESET_GAP {
                debug!("tap gap exceeded, starting a new estimate");
                self.taps.clear();
            }
        }

        self.taps.push_back(at);
        while self.taps.len() > TAP_WINDOW {
            self.taps.pop_front();
        }

        if self.taps.len() < 2 {
            return None;
        }

        let (first, last) = (self.taps[0], self.taps[self.taps.len() - 1]);
        let span_ms = last.saturating_duration_since(first).as_secs_f64() * 1_000.0;
        let average_ms = span_ms / (self.taps.len() - 1) as f64;

        let bpm = if average_ms > 0.0 {
            (60_000.0 / average_ms).round()
        } else {
            f64::INFINITY
        };
        let tempo = Tempo::clamped(bpm.min(u32::MAX as f64) as u32);
        debug!(taps = self.taps.len(), average_ms, bpm = tempo.bpm(), "tap tempo estimate");
        Some(tempo)
    }

    /// Drop the window once the last tap is older than the reset gap.
    ///
    /// `register_tap` applies the same rule lazily; this lets a display show
    /// the reset as soon as it happens.
    pub fn expire(&mut self, now: Instant) {
        if let Some(&last) = self.taps.back() {
            if now.saturating_duration_since(last) > TAP_RESET_GAP {
                self.taps.clear();
            }
        }
    }

    pub fn reset(&mut self) {
        self.taps.clear();
    }

    /// Taps currently in the window.
    pub fn taps(&self) -> usize {
        self.taps.len()
    }

    /// Suppress tap registration (the lockout is owned by the caller).
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn single_tap_gives_no_estimate() {
        let mut tapper = TapTempo::new();
        assert_eq!(tapper.register_tap(Instant::now()), None);
        assert_eq!(tapper.taps(), 1);
    }

    #[test]
    fn three_taps_500ms_apart_is_120() {
        let mut tapper = TapTempo::new();
        let t = Instant::now();
        assert_eq!(tapper.register_tap(t), None);
        assert_eq!(tapper.register_tap(t + ms(500)).unwrap().bpm(), 120);
        assert_eq!(tapper.register_tap(t + ms(1_000)).unwrap().bpm(), 120);
    }

    #[test]
    fn window_keeps_only_three_taps() {
        let mut tapper = TapTempo::new();
        let t = Instant::now();
        tapper.register_tap(t);
        tapper.register_tap(t + ms(900));
        tapper.register_tap(t + ms(1_400));
        // Oldest tap (900ms interval) falls out: (500 + 500) / 2
        let tempo = tapper.register_tap(t + ms(1_900)).unwrap();
        assert_eq!(tapper.taps(), 3);
        assert_eq!(tempo.bpm(), 120);
    }

    #[test]
    fn averages_uneven_intervals() {
        let mut tapper = TapTempo::new();
        let t = Instant::now();
        tapper.register_tap(t);
        tapper.register_tap(t + ms(400));
        // (400 + 600) / 2 = 500ms
        assert_eq!(tapper.register_tap(t + ms(1_000)).unwrap().bpm(), 120);
    }

    #[test]
    fn long_gap_restarts_the_window() {
        let mut tapper = TapTempo::new();
        let t = Instant::now();
        tapper.register_tap(t);
        tapper.register_tap(t + ms(500));
        assert_eq!(tapper.register_tap(t + ms(1_501)), None);
        assert_eq!(tapper.taps(), 1);

        assert!(tapper.register_tap(t + ms(2_001)).is_some());
    }

    #[test]
    fn gap_of_exactly_one_second_still_counts() {
        let mut tapper = TapTempo::new();
        let t = Instant::now();
        tapper.register_tap(t);
        assert_eq!(tapper.register_tap(t + ms(1_000)).unwrap().bpm(), 60);
    }

    #[test]
    fn estimates_are_clamped() {
        let mut tapper = TapTempo::new();
        let t = Instant::now();
        tapper.register_tap(t);
        assert_eq!(tapper.register_tap(t + ms(20)).unwrap().bpm(), Tempo::MAX);

        let mut tapper = TapTempo::new();
        tapper.register_tap(t);
        assert_eq!(tapper.register_tap(t).unwrap().bpm(), Tempo::MAX);
    }

    #[test]
    fn lockout_ignores_taps() {
        let mut tapper = TapTempo::new();
        let t = Instant::now();
        tapper.set_locked(true);
        assert_eq!(tapper.register_tap(t), None);
        assert_eq!(tapper.register_tap(t + ms(500)), None);
        assert_eq!(tapper.taps(), 0);

        tapper.set_locked(false);
        tapper.register_tap(t + ms(600));
        assert!(tapper.register_tap(t + ms(1_100)).is_some());
    }

    #[test]
    fn expire_clears_stale_window() {
        let mut tapper = TapTempo::new();
        let t = Instant::now();
        tapper.register_tap(t);
        tapper.expire(t + ms(800));
        assert_eq!(tapper.taps(), 1);
        tapper.expire(t + ms(1_200));
        assert_eq!(tapper.taps(), 0);
    }
}
