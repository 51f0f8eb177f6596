use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::{Signal, SpeechCategory};

/// Every externally visible transition of a timer session produces an
/// event. Events are delivered synchronously from the timing loop, in
/// non-decreasing elapsed-time order, so a sink never sees a signal change
/// after the tick that reported it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimerEvent {
    Started {
        category: SpeechCategory,
        at: DateTime<Utc>,
    },
    SignalChanged {
        signal: Signal,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// Red threshold reached; the speaker has `grace_secs` left to conclude.
    GraceStarted {
        grace_secs: u64,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// Grace period exhausted; the speaker is disqualified in competition.
    GraceEnded {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    Stopped {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
}

/// Rendering collaborator: receives session events from the timing loop.
///
/// Delivery is synchronous from the loop thread; long-running sinks delay
/// subsequent ticks.
pub trait EventSink: Send + Sync {
    fn deliver(&self, event: &TimerEvent);
}

/// Sink that discards every event. Default when no renderer is attached.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn deliver(&self, _event: &TimerEvent) {}
}
