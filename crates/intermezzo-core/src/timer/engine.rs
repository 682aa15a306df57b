//! Timer engine implementation.
//!
//! The interval timer is a tick-driven state machine. It does not use
//! internal threads or wall-clock reads - the caller is responsible for
//! calling `tick()` at a steady cadence while the timer is running.
//!
//! ## Phase cycle
//!
//! ```text
//! Work -> Relax -> Work -> ...
//! ```
//!
//! Every phase boundary pauses the timer; the user has to start the next
//! phase manually. That is a product decision, not an accident.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = IntervalTimer::new(TimerConfig::default());
//! timer.toggle_running();
//! // In a loop, `ticks_per_second` times per second:
//! let events = timer.tick(1); // PhaseCompleted/PhaseStarted on a boundary
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::config::TimerConfig;
use crate::events::Event;

/// Core interval timer.
///
/// Operates on caller-supplied tick counts -- no internal thread, no clock.
/// `ticks_per_second` accumulated ticks convert into one whole-second
/// decrement of the remaining time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalTimer {
    config: TimerConfig,
    phase: Phase,
    /// Remaining time in whole seconds for the current phase.
    remaining_secs: u64,
    /// Whether ticks currently advance the countdown. While false, ticks
    /// are ignored; the accumulator and remaining time stay frozen.
    running: bool,
    /// Sub-second tick counter. Invariant: always below `ticks_per_second`.
    #[serde(default)]
    tick_accumulator: u64,
}

impl IntervalTimer {
    /// Create a new timer in the `Work` phase, paused, at full duration.
    pub fn new(config: TimerConfig) -> Self {
        let remaining_secs = config.duration_secs(Phase::Work);
        Self {
            config,
            phase: Phase::Work,
            remaining_secs,
            running: false,
            tick_accumulator: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Total configured duration of the current phase, in seconds.
    pub fn total_secs(&self) -> u64 {
        self.config.duration_secs(self.phase)
    }

    /// Remaining time formatted as zero-padded `MM:SS`.
    pub fn remaining_label(&self) -> String {
        let minutes = (self.remaining_secs / 60) % 60;
        let seconds = self.remaining_secs % 60;
        format!("{minutes:02}:{seconds:02}")
    }

    /// 0.0 .. 1.0 progress within the current phase.
    ///
    /// Monotonically non-decreasing while a phase runs; drops back to 0.0
    /// on a phase change or cancel.
    pub fn progress_fraction(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            running: self.running,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            label: self.remaining_label(),
            progress: self.progress_fraction(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Flip between running and paused.
    ///
    /// Pausing freezes the countdown and the sub-second accumulator; nothing
    /// is reset. The caller is expected to stop issuing ticks while paused,
    /// but stray ticks are ignored either way.
    pub fn toggle_running(&mut self) -> Event {
        self.running = !self.running;
        Event::RunStateChanged {
            running: self.running,
            at: Utc::now(),
        }
    }

    /// Stop the timer and reload the *current* phase's full duration.
    ///
    /// Cancel never forces the timer back to `Work`; cancelling mid-relax
    /// reloads the relax duration. Calling it twice is the same as once.
    pub fn cancel(&mut self) -> Event {
        self.running = false;
        self.tick_accumulator = 0;
        self.remaining_secs = self.total_secs();
        Event::Reset {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance the timer by `units` driver ticks.
    ///
    /// Ignored while paused and for `units == 0`. Once the accumulator
    /// crosses `ticks_per_second`, one whole second is taken off the
    /// remaining time. The phase's last second completing flips the phase
    /// within the same call - remaining time never goes negative.
    ///
    /// With `catch_up` off (the default) at most one second is consumed per
    /// call and excess accumulation is capped; with it on, a backlog of
    /// ticks drains as multiple seconds, still bounded by one phase
    /// transition per call.
    pub fn tick(&mut self, units: u64) -> Vec<Event> {
        if !self.running || units == 0 {
            return Vec::new();
        }
        let tps = self.config.ticks_per_second.max(1);
        self.tick_accumulator = self.tick_accumulator.saturating_add(units);

        let mut events = Vec::new();
        while self.tick_accumulator >= tps {
            self.tick_accumulator -= tps;
            self.remaining_secs = self.remaining_secs.saturating_sub(1);
            if self.remaining_secs == 0 {
                events.extend(self.complete_phase());
                break;
            }
            if !self.config.catch_up {
                // One whole-second decrement per call; cap the excess so
                // the accumulator invariant holds.
                self.tick_accumulator = self.tick_accumulator.min(tps - 1);
                break;
            }
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Flip to the other phase and auto-pause.
    fn complete_phase(&mut self) -> [Event; 2] {
        let completed = self.phase;
        self.phase = completed.other();
        self.remaining_secs = self.config.duration_secs(self.phase);
        self.running = false;
        self.tick_accumulator = 0;
        [
            Event::PhaseCompleted {
                phase: completed,
                at: Utc::now(),
            },
            Event::PhaseStarted {
                phase: self.phase,
                duration_secs: self.remaining_secs,
                at: Utc::now(),
            },
        ]
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> TimerConfig {
        TimerConfig {
            work_secs: 3,
            relax_secs: 2,
            ticks_per_second: 10,
            catch_up: false,
        }
    }

    #[test]
    fn starts_paused_in_work_at_full_duration() {
        let timer = IntervalTimer::new(TimerConfig::default());
        assert_eq!(timer.phase(), Phase::Work);
        assert!(!timer.running());
        assert_eq!(timer.remaining_secs(), 20);
        assert_eq!(timer.remaining_label(), "00:20");
        assert_eq!(timer.progress_fraction(), 0.0);
    }

    #[test]
    fn toggle_flips_run_state() {
        let mut timer = IntervalTimer::new(fast_config());
        match timer.toggle_running() {
            Event::RunStateChanged { running, .. } => assert!(running),
            other => panic!("expected RunStateChanged, got {other:?}"),
        }
        assert!(timer.running());
        timer.toggle_running();
        assert!(!timer.running());
    }

    #[test]
    fn ticks_ignored_while_paused() {
        let mut timer = IntervalTimer::new(fast_config());
        for _ in 0..100 {
            assert!(timer.tick(1).is_empty());
        }
        assert_eq!(timer.remaining_secs(), 3);
    }

    #[test]
    fn accumulator_converts_ticks_to_seconds() {
        let mut timer = IntervalTimer::new(fast_config());
        timer.toggle_running();
        for _ in 0..9 {
            timer.tick(1);
        }
        assert_eq!(timer.remaining_secs(), 3); // Not yet a full second.
        timer.tick(1);
        assert_eq!(timer.remaining_secs(), 2);
    }

    #[test]
    fn pause_freezes_accumulator() {
        let mut timer = IntervalTimer::new(fast_config());
        timer.toggle_running();
        timer.tick(7);
        timer.toggle_running(); // Pause mid-second.
        timer.tick(50);
        timer.toggle_running(); // Resume: 3 more ticks complete the second.
        timer.tick(3);
        assert_eq!(timer.remaining_secs(), 2);
    }

    #[test]
    fn last_second_flips_phase_and_pauses() {
        let mut timer = IntervalTimer::new(fast_config());
        timer.toggle_running();
        for _ in 0..29 {
            assert!(timer.tick(1).is_empty());
        }
        let events = timer.tick(1);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            Event::PhaseCompleted { phase: Phase::Work, .. }
        ));
        assert!(matches!(
            events[1],
            Event::PhaseStarted { phase: Phase::Relax, duration_secs: 2, .. }
        ));
        assert_eq!(timer.phase(), Phase::Relax);
        assert_eq!(timer.remaining_secs(), 2);
        assert!(!timer.running());
        assert_eq!(timer.progress_fraction(), 0.0);
    }

    #[test]
    fn cancel_reloads_current_phase_duration() {
        let mut timer = IntervalTimer::new(fast_config());
        timer.toggle_running();
        timer.tick(25);
        timer.tick(5); // Consume a couple of seconds.
        let event = timer.cancel();
        match event {
            Event::Reset { phase, remaining_secs, .. } => {
                assert_eq!(phase, Phase::Work);
                assert_eq!(remaining_secs, 3);
            }
            other => panic!("expected Reset, got {other:?}"),
        }
        assert!(!timer.running());
        assert_eq!(timer.progress_fraction(), 0.0);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut timer = IntervalTimer::new(fast_config());
        timer.toggle_running();
        timer.tick(10);
        timer.cancel();
        let once = (timer.phase(), timer.remaining_secs(), timer.running());
        timer.cancel();
        assert_eq!(once, (timer.phase(), timer.remaining_secs(), timer.running()));
    }

    #[test]
    fn without_catch_up_one_second_per_call() {
        let mut timer = IntervalTimer::new(fast_config());
        timer.toggle_running();
        timer.tick(35); // 3.5 seconds' worth in one call.
        assert_eq!(timer.remaining_secs(), 2);
        // The excess was capped; one more full second of ticks still works.
        timer.tick(10);
        assert_eq!(timer.remaining_secs(), 1);
    }

    #[test]
    fn with_catch_up_backlog_drains_multiple_seconds() {
        let mut timer = IntervalTimer::new(TimerConfig {
            catch_up: true,
            ..fast_config()
        });
        timer.toggle_running();
        assert!(timer.tick(25).is_empty());
        assert_eq!(timer.remaining_secs(), 1);
        assert_eq!(timer.progress_fraction(), 1.0 - 1.0 / 3.0);
    }

    #[test]
    fn catch_up_still_stops_at_phase_boundary() {
        let mut timer = IntervalTimer::new(TimerConfig {
            catch_up: true,
            ..fast_config()
        });
        timer.toggle_running();
        // Far more ticks than the whole work phase: exactly one transition.
        let events = timer.tick(1000);
        let completions = events
            .iter()
            .filter(|e| matches!(e, Event::PhaseCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(timer.phase(), Phase::Relax);
        assert_eq!(timer.remaining_secs(), 2);
        assert!(!timer.running());
    }

    #[test]
    fn label_formats_minutes_and_seconds() {
        let mut timer = IntervalTimer::new(TimerConfig {
            work_secs: 125,
            ..TimerConfig::default()
        });
        assert_eq!(timer.remaining_label(), "02:05");
        timer.toggle_running();
        for _ in 0..6 {
            timer.tick(1000);
        }
        assert_eq!(timer.remaining_label(), "01:59");
    }

    #[test]
    fn snapshot_reflects_state() {
        let timer = IntervalTimer::new(fast_config());
        match timer.snapshot() {
            Event::StateSnapshot {
                phase,
                running,
                remaining_secs,
                total_secs,
                label,
                progress,
                ..
            } => {
                assert_eq!(phase, Phase::Work);
                assert!(!running);
                assert_eq!(remaining_secs, 3);
                assert_eq!(total_secs, 3);
                assert_eq!(label, "00:03");
                assert_eq!(progress, 0.0);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }
}
