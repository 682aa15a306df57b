mod engine;
mod phase;

pub use engine::IntervalTimer;
pub use phase::Phase;
