use serde::{Deserialize, Serialize};

/// One of the two named timer modes. Each phase has its own configured
/// duration; the timer alternates between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Relax,
}

impl Phase {
    /// The phase the timer moves to when this one completes.
    pub fn other(self) -> Self {
        match self {
            Phase::Work => Phase::Relax,
            Phase::Relax => Phase::Work,
        }
    }
}
