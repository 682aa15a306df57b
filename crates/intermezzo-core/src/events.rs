use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change in the timer produces an Event.
/// The presentation layer consumes them to drive animation start/pause,
/// icon swaps, and countdown text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The timer was started or paused by the user.
    RunStateChanged {
        running: bool,
        at: DateTime<Utc>,
    },
    /// The timer was cancelled back to the current phase's full duration.
    Reset {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase ran down to zero.
    PhaseCompleted {
        phase: Phase,
        at: DateTime<Utc>,
    },
    /// The next phase is loaded and waiting for a manual start.
    PhaseStarted {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        label: String,
        progress: f64,
        at: DateTime<Utc>,
    },
}
