//! # Intermezzo Core Library
//!
//! This library provides the core business logic for the Intermezzo interval
//! timer: alternating work/relax phases driven by an external tick source.
//! It implements a CLI-first philosophy where the full timer is usable from
//! a standalone binary, with any GUI being a thin presentation layer over
//! the same core library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine that requires the caller
//!   to periodically invoke `tick()` for progress updates
//! - **Config**: TOML-based configuration for phase durations and display
//! - **Events**: Every state change produces an [`Event`] the presentation
//!   layer consumes to update labels, progress rings, and button state
//!
//! ## Key Components
//!
//! - [`IntervalTimer`]: Core timer state machine
//! - [`TimerConfig`]: Phase durations and tick resolution
//! - [`Config`]: Persisted application configuration

pub mod config;
pub mod error;
pub mod events;
pub mod timer;

pub use config::{Config, DisplayConfig, TimerConfig};
pub use error::{ConfigError, CoreError, Result};
pub use events::Event;
pub use timer::{IntervalTimer, Phase};
