//! # Podium Core Library
//!
//! Core business logic for Podium, a pacing timer for timed speeches.
//! Follows a CLI-first philosophy: every operation is available through
//! the `podium-cli` binary, which is a thin surface over this crate.
//!
//! ## Architecture
//!
//! - **Profile catalog**: immutable signal schedules per speech category
//! - **Timer engine**: a background worker that converts wall-clock
//!   elapsed time into discrete signal transitions and grace-period
//!   edges, notifying an observer every tick
//! - **Timer controller**: lifecycle wrapper exposing start/stop/wait
//!   semantics to the menu layer
//! - **Record store**: JSON persistence for completed speeches
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: the timing loop and its snapshot reads
//! - [`TimerController`]: boolean-result lifecycle API
//! - [`Catalog`]: speech category to profile lookup
//! - [`RecordStore`]: append-only speech records

pub mod config;
pub mod error;
pub mod events;
pub mod profile;
pub mod records;
pub mod timer;

pub use config::Config;
pub use error::{ConfigError, CoreError, RecordError, TimerError};
pub use events::{EventSink, NullSink, TimerEvent};
pub use profile::{Catalog, Signal, SpeechCategory, SpeechProfile, Threshold};
pub use records::{format_duration, RecordStore, SpeechRecord};
pub use timer::{
    Clock, SystemClock, TickObserver, TimerController, TimerEngine, TimerSession, TimerStatus,
};
