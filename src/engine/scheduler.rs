//! Beat scheduler - the fixed-interval repeating timer behind the metronome.
//!
//! The scheduler is a two-state machine (Stopped / Running) that owns at
//! most one repeating [`Interval`]. It does not read the clock itself: the
//! host loop passes `now` into every call and sleeps until
//! [`BeatScheduler::next_deadline`]. All calls happen on one thread, so a
//! tick always runs to completion before the next reconfiguration and a
//! reschedule can never leave a stale tick behind.
//!
//! ```text
//!            start / start_after
//!   ┌─────────┐ ───────────────→ ┌─────────┐ ──┐ poll: tick when due
//!   │ Stopped │                  │ Running │ ←─┘ reconfigure_*: re-arm
//!   └─────────┘ ←─────────────── └─────────┘
//!                    stop
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::{
    sequencing::{AccentPattern, Tempo, TimeSignature},
    tone::{ClickRole, ClickSink},
};

/// One sounded beat, as reported to the visual callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Beat {
    /// Position in the bar, `0..beats`.
    pub index: usize,
    pub accented: bool,
}

/// Observer told about every beat right after it is sounded.
///
/// Runs synchronously inside the tick and must not block.
pub trait BeatListener {
    fn on_beat(&mut self, beat: Beat);
}

impl<F: FnMut(Beat)> BeatListener for F {
    fn on_beat(&mut self, beat: Beat) {
        self(beat)
    }
}

impl BeatListener for () {
    fn on_beat(&mut self, _beat: Beat) {}
}

/// Fan a beat out to two listeners, first then second.
impl<A: BeatListener, B: BeatListener> BeatListener for (A, B) {
    fn on_beat(&mut self, beat: Beat) {
        self.0.on_beat(beat);
        self.1.on_beat(beat);
    }
}

/// The live repeating timer. Exactly one exists while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interval {
    period: Duration,
    next_due: Instant,
    /// Nothing has fired yet; `next_due` is the delayed first beat.
    primed: bool,
}

impl Interval {
    fn arm(period: Duration, first_due: Instant) -> Self {
        Self {
            period,
            next_due: first_due,
            primed: true,
        }
    }

    /// Re-arm mid-run: the next beat follows one already sounded.
    fn arm_after_tick(period: Duration, next_due: Instant) -> Self {
        Self {
            primed: false,
            ..Self::arm(period, next_due)
        }
    }
}

/// Owns tempo, meter, accents and the beat cursor, and fires ticks.
pub struct BeatScheduler<C, L> {
    tempo: Tempo,
    signature: TimeSignature,
    accents: AccentPattern,
    volume: f32,
    cursor: usize,
    timer: Option<Interval>,
    sink: C,
    listener: L,
}

impl<C: ClickSink, L: BeatListener> BeatScheduler<C, L> {
    pub fn new(
        tempo: Tempo,
        signature: TimeSignature,
        accents: AccentPattern,
        sink: C,
        listener: L,
    ) -> Self {
        debug_assert_eq!(accents.len(), signature.beats());
        Self {
            tempo,
            signature,
            accents,
            volume: 1.0,
            cursor: 0,
            timer: None,
            sink,
            listener,
        }
    }

    /// Set the click gain (clamped to 0.0-1.0). Takes effect on the next tick.
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.set_volume(volume);
        self
    }

    /// Start ticking: one beat now at the current cursor, then one per interval.
    ///
    /// Does nothing if already running.
    pub fn start(&mut self, now: Instant) {
        self.start_after(now, Duration::ZERO);
    }

    /// Start ticking with the first beat `delay` after `now`.
    ///
    /// The scheduler counts as running from `now`; stopping before the first
    /// beat cancels it. Does nothing if already running.
    pub fn start_after(&mut self, now: Instant, delay: Duration) {
        if self.timer.is_some() {
            debug!("start ignored, scheduler already running");
            return;
        }

        let period = self.tempo.interval();
        self.timer = Some(Interval::arm(period, now + delay));
        debug!(
            tempo = self.tempo.bpm(),
            signature = %self.signature,
            ?period,
            ?delay,
            cursor = self.cursor,
            "scheduler started"
        );

        if delay.is_zero() {
            self.poll(now);
        }
    }

    /// Stop ticking and rewind to beat 0. Safe to call when stopped.
    pub fn stop(&mut self) {
        if self.timer.take().is_some() {
            debug!("scheduler stopped");
        }
        self.cursor = 0;
    }

    /// Change tempo. While running, the timer is re-armed at the new interval
    /// starting from `now`; the cursor is left where it is.
    pub fn reconfigure_tempo(&mut self, tempo: Tempo, now: Instant) {
        self.tempo = tempo;
        if self.timer.is_some() {
            self.rearm(now);
        }
        debug!(tempo = tempo.bpm(), running = self.is_running(), "tempo reconfigured");
    }

    /// Change meter and accents. The cursor goes back to 0, so the next beat
    /// is the downbeat of the new bar.
    pub fn reconfigure_time_signature(
        &mut self,
        signature: TimeSignature,
        accents: AccentPattern,
        now: Instant,
    ) {
        debug_assert_eq!(
            accents.len(),
            signature.beats(),
            "accent pattern must have one entry per beat"
        );
        self.signature = signature;
        self.accents = accents;
        self.cursor = 0;
        if self.timer.is_some() {
            self.rearm(now);
        }
        debug!(%signature, running = self.is_running(), "time signature reconfigured");
    }

    pub fn toggle_accent(&mut self, index: usize) {
        self.accents.toggle(index);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    /// Rewind to beat 0 without touching the timer.
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// Fire the pending tick if it is due. Returns the number of beats fired
    /// (0 or 1).
    ///
    /// Like a host interval timer, a late poll fires once rather than
    /// bursting through every missed tick. Lateness within one period is
    /// absorbed so the grid does not drift.
    pub fn poll(&mut self, now: Instant) -> usize {
        let Some(timer) = self.timer.as_mut() else {
            return 0;
        };
        if now < timer.next_due {
            return 0;
        }

        let mut next_due = timer.next_due + timer.period;
        if next_due <= now {
            next_due = now + timer.period;
        }
        timer.next_due = next_due;
        timer.primed = false;

        self.tick();
        1
    }

    /// When the next tick is due, if running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.map(|timer| timer.next_due)
    }

    fn rearm(&mut self, now: Instant) {
        let period = self.tempo.interval();
        // Still waiting out the start delay: the first beat keeps its slot
        if let Some(timer) = self.timer.as_mut().filter(|timer| timer.primed) {
            timer.period = period;
            return;
        }
        // Replacing the option cancels the old interval before the new one exists
        self.timer = Some(Interval::arm_after_tick(period, now + period));
    }

    fn tick(&mut self) {
        let index = self.cursor;
        let accented = self.accents.is_accented(index);

        self.sink.emit_click(ClickRole::from_accent(accented), self.volume);
        self.listener.on_beat(Beat { index, accented });
        trace!(index, accented, "tick");

        self.cursor = (index + 1) % self.signature.beats();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Index of the next beat to be played.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn signature(&self) -> TimeSignature {
        self.signature
    }

    pub fn accents(&self) -> &AccentPattern {
        &self.accents
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Current tick interval (whether or not the timer is armed).
    pub fn interval(&self) -> Duration {
        self.tempo.interval()
    }

    pub fn sink(&self) -> &C {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut C {
        &mut self.sink
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::RecordingSink;

    type Recorder = Vec<Beat>;

    impl BeatListener for Recorder {
        fn on_beat(&mut self, beat: Beat) {
            self.push(beat);
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn scheduler(bpm: u16, signature: TimeSignature) -> BeatScheduler<RecordingSink, Recorder> {
        BeatScheduler::new(
            Tempo::new(bpm).unwrap(),
            signature,
            AccentPattern::for_signature(signature),
            RecordingSink::new(),
            Vec::new(),
        )
    }

    fn indices(s: &BeatScheduler<RecordingSink, Recorder>) -> Vec<usize> {
        s.listener().iter().map(|b| b.index).collect()
    }

    #[test]
    fn start_fires_immediately() {
        let mut s = scheduler(120, TimeSignature::FOUR_FOUR);
        let t0 = Instant::now();
        s.start(t0);

        assert!(s.is_running());
        assert_eq!(indices(&s), vec![0]);
        assert_eq!(s.cursor(), 1);
        assert_eq!(s.next_deadline(), Some(t0 + ms(500)));
    }

    #[test]
    fn nothing_fires_before_the_deadline() {
        let mut s = scheduler(120, TimeSignature::FOUR_FOUR);
        let t0 = Instant::now();
        s.start(t0);

        assert_eq!(s.poll(t0 + ms(499)), 0);
        assert_eq!(s.poll(t0 + ms(500)), 1);
        assert_eq!(s.poll(t0 + ms(500)), 0);
        assert_eq!(indices(&s), vec![0, 1]);
    }

    #[test]
    fn click_then_visual_for_the_same_beat() {
        let mut s = scheduler(120, TimeSignature::THREE_FOUR);
        let t0 = Instant::now();
        s.start(t0);
        s.poll(t0 + ms(500));

        let clicks = s.sink().clicks();
        let beats = s.listener();
        assert_eq!(clicks.len(), beats.len());
        for (click, beat) in clicks.iter().zip(beats) {
            let expected = if beat.accented { 1_200.0 } else { 800.0 };
            assert_eq!(click.frequency_hz, expected);
        }
        assert!(beats[0].accented);
        assert!(!beats[1].accented);
    }

    #[test]
    fn click_sounds_before_the_beat_is_shown() {
        use std::{cell::RefCell, rc::Rc};

        struct LogSink(Rc<RefCell<Vec<&'static str>>>);

        impl ClickSink for LogSink {
            fn emit_click(&mut self, _role: ClickRole, _gain: f32) {
                self.0.borrow_mut().push("click");
            }
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let beats = log.clone();
        let mut s = BeatScheduler::new(
            Tempo::DEFAULT,
            TimeSignature::THREE_FOUR,
            AccentPattern::for_signature(TimeSignature::THREE_FOUR),
            LogSink(log.clone()),
            move |_: Beat| beats.borrow_mut().push("beat"),
        );
        let t0 = Instant::now();
        s.start(t0);
        s.poll(t0 + ms(500));
        s.poll(t0 + ms(1_000));

        assert_eq!(
            *log.borrow(),
            vec!["click", "beat", "click", "beat", "click", "beat"]
        );
    }

    #[test]
    fn stop_rewinds_and_is_idempotent() {
        let mut s = scheduler(120, TimeSignature::FOUR_FOUR);
        let t0 = Instant::now();
        s.start(t0);
        s.poll(t0 + ms(500));
        s.stop();

        assert!(!s.is_running());
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.next_deadline(), None);

        s.stop();
        assert!(!s.is_running());
        assert_eq!(s.poll(t0 + ms(5_000)), 0);
        assert_eq!(indices(&s), vec![0, 1]);
    }

    #[test]
    fn start_while_running_keeps_one_timer() {
        let mut s = scheduler(120, TimeSignature::FOUR_FOUR);
        let t0 = Instant::now();
        s.start(t0);
        s.start(t0 + ms(100));

        assert_eq!(indices(&s), vec![0]);
        assert_eq!(s.next_deadline(), Some(t0 + ms(500)));
    }

    #[test]
    fn delayed_start_waits_for_the_first_beat() {
        let mut s = scheduler(60, TimeSignature::FOUR_FOUR);
        let t0 = Instant::now();
        s.start_after(t0, ms(100));

        assert!(s.is_running());
        assert!(s.listener().is_empty());
        assert_eq!(s.poll(t0 + ms(99)), 0);
        assert_eq!(s.poll(t0 + ms(100)), 1);
        assert_eq!(s.next_deadline(), Some(t0 + ms(1_100)));
    }

    #[test]
    fn retune_during_delay_keeps_the_first_beat() {
        let mut s = scheduler(40, TimeSignature::FOUR_FOUR);
        let t0 = Instant::now();
        s.start_after(t0, ms(100));

        s.reconfigure_tempo(Tempo::new(120).unwrap(), t0 + ms(50));
        assert_eq!(s.next_deadline(), Some(t0 + ms(100)));

        s.reconfigure_time_signature(
            TimeSignature::THREE_FOUR,
            AccentPattern::for_signature(TimeSignature::THREE_FOUR),
            t0 + ms(60),
        );
        assert_eq!(s.next_deadline(), Some(t0 + ms(100)));

        assert_eq!(s.poll(t0 + ms(100)), 1);
        assert_eq!(indices(&s), vec![0]);
        assert_eq!(s.next_deadline(), Some(t0 + ms(600)));

        // Once a beat has sounded, a retune re-arms from now
        s.reconfigure_tempo(Tempo::new(60).unwrap(), t0 + ms(300));
        assert_eq!(s.next_deadline(), Some(t0 + ms(1_300)));
    }

    #[test]
    fn stop_during_delay_cancels_the_first_beat() {
        let mut s = scheduler(60, TimeSignature::FOUR_FOUR);
        let t0 = Instant::now();
        s.start_after(t0, ms(100));
        s.stop();
        assert_eq!(s.poll(t0 + ms(200)), 0);
        assert!(s.listener().is_empty());
    }

    #[test]
    fn late_poll_fires_once_and_realigns() {
        let mut s = scheduler(120, TimeSignature::FOUR_FOUR);
        let t0 = Instant::now();
        s.start(t0);

        // Host stalled for three intervals
        assert_eq!(s.poll(t0 + ms(1_600)), 1);
        assert_eq!(s.next_deadline(), Some(t0 + ms(2_100)));
    }

    #[test]
    fn small_lateness_does_not_drift() {
        let mut s = scheduler(120, TimeSignature::FOUR_FOUR);
        let t0 = Instant::now();
        s.start(t0);
        s.poll(t0 + ms(503));
        assert_eq!(s.next_deadline(), Some(t0 + ms(1_000)));
    }

    #[test]
    fn tempo_change_keeps_the_cursor() {
        let mut s = scheduler(120, TimeSignature::FOUR_FOUR);
        let t0 = Instant::now();
        s.start(t0);
        s.poll(t0 + ms(500));
        assert_eq!(s.cursor(), 2);

        s.reconfigure_tempo(Tempo::new(60).unwrap(), t0 + ms(700));
        assert_eq!(s.cursor(), 2);
        assert_eq!(s.next_deadline(), Some(t0 + ms(1_700)));
        assert_eq!(s.poll(t0 + ms(1_000)), 0);
        assert_eq!(s.poll(t0 + ms(1_700)), 1);
        assert_eq!(indices(&s), vec![0, 1, 2]);
    }

    #[test]
    fn tempo_change_while_stopped_only_stores() {
        let mut s = scheduler(120, TimeSignature::FOUR_FOUR);
        let t0 = Instant::now();
        s.reconfigure_tempo(Tempo::new(200).unwrap(), t0);
        assert!(!s.is_running());
        assert_eq!(s.next_deadline(), None);

        s.start(t0);
        assert_eq!(s.next_deadline(), Some(t0 + ms(300)));
    }

    #[test]
    fn signature_change_resets_to_downbeat() {
        let mut s = scheduler(120, TimeSignature::FOUR_FOUR);
        let t0 = Instant::now();
        s.start(t0);
        s.poll(t0 + ms(500));
        s.poll(t0 + ms(1_000));

        let three = TimeSignature::THREE_FOUR;
        s.reconfigure_time_signature(three, AccentPattern::for_signature(three), t0 + ms(1_200));
        assert_eq!(s.cursor(), 0);
        s.poll(t0 + ms(1_700));
        s.poll(t0 + ms(2_200));
        s.poll(t0 + ms(2_700));
        s.poll(t0 + ms(3_200));

        assert_eq!(indices(&s), vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn volume_scales_clicks() {
        let mut s = scheduler(120, TimeSignature::TWO_FOUR).with_volume(0.5);
        let t0 = Instant::now();
        s.start(t0);
        s.poll(t0 + ms(500));

        let clicks = s.sink().clicks();
        assert_eq!(clicks[0].amplitude, 0.5);
        assert_eq!(clicks[1].amplitude, 0.5 * 0.7);

        s.set_volume(3.0);
        assert_eq!(s.volume(), 1.0);
    }

    #[test]
    fn accent_toggle_applies_on_next_pass() {
        let mut s = scheduler(120, TimeSignature::TWO_FOUR);
        let t0 = Instant::now();
        s.start(t0);
        s.toggle_accent(1);
        s.poll(t0 + ms(500));

        let accented: Vec<bool> = s.listener().iter().map(|b| b.accented).collect();
        assert_eq!(accented, vec![true, true]);
    }

    #[test]
    fn unmetered_signature_repeats_beat_zero() {
        let mut s = scheduler(120, TimeSignature::NONE);
        let t0 = Instant::now();
        s.start(t0);
        for i in 1..4 {
            s.poll(t0 + ms(500 * i));
        }
        assert_eq!(indices(&s), vec![0, 0, 0, 0]);
        assert!(s.listener().iter().all(|b| b.accented));
    }

    #[test]
    fn closures_and_pairs_listen() {
        let mut count = 0usize;
        let mut last = None;
        {
            let listener = (|_: Beat| count += 1, |b: Beat| last = Some(b.index));
            let mut s = BeatScheduler::new(
                Tempo::DEFAULT,
                TimeSignature::FOUR_FOUR,
                AccentPattern::default(),
                RecordingSink::new(),
                listener,
            );
            let t0 = Instant::now();
            s.start(t0);
            s.poll(t0 + ms(500));
        }
        assert_eq!(count, 2);
        assert_eq!(last, Some(1));
    }
}
