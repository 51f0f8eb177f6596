//! Speech categories and their signal schedules.
//!
//! Every speech category carries an ordered list of thresholds: at each
//! threshold offset the pacing signal steps up one color. The schedule is
//! fixed configuration -- built once at startup, never mutated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// The closed set of speech categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechCategory {
    IceBreaker,
    Prepared,
    Evaluation,
    TableTopic,
    /// Compressed schedule for manual verification (signals every 5s).
    Test,
}

impl SpeechCategory {
    pub const ALL: [SpeechCategory; 5] = [
        SpeechCategory::IceBreaker,
        SpeechCategory::Prepared,
        SpeechCategory::Evaluation,
        SpeechCategory::TableTopic,
        SpeechCategory::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeechCategory::IceBreaker => "ice_breaker",
            SpeechCategory::Prepared => "prepared",
            SpeechCategory::Evaluation => "evaluation",
            SpeechCategory::TableTopic => "table_topic",
            SpeechCategory::Test => "test",
        }
    }
}

impl fmt::Display for SpeechCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeechCategory {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ice_breaker" => Ok(SpeechCategory::IceBreaker),
            "prepared" => Ok(SpeechCategory::Prepared),
            "evaluation" => Ok(SpeechCategory::Evaluation),
            "table_topic" => Ok(SpeechCategory::TableTopic),
            "test" => Ok(SpeechCategory::Test),
            other => Err(TimerError::UnknownCategory(other.to_string())),
        }
    }
}

/// Pacing signal shown to the speaker.
///
/// Ordered by severity: `Blank < Green < Yellow < Red`. Within one session
/// the signal only ever steps up, never back down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Blank,
    Green,
    Yellow,
    Red,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Blank => "blank",
            Signal::Green => "green",
            Signal::Yellow => "yellow",
            Signal::Red => "red",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a profile's schedule: the signal activates once elapsed
/// time reaches `offset_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    pub offset_secs: u64,
    pub signal: Signal,
}

/// Signal schedule for one speech category.
///
/// Invariants: `thresholds` is non-empty, strictly increasing in offset,
/// and ends with the red entry (the grace period hangs off the last
/// threshold). `grace_secs == 0` means the category has no grace period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechProfile {
    pub category: SpeechCategory,
    pub name: String,
    pub duration_range: String,
    pub thresholds: Vec<Threshold>,
    pub grace_secs: u64,
}

impl SpeechProfile {
    /// Signal for a given elapsed time: the color of the last threshold
    /// whose offset is `<= elapsed`, or `Blank` before the first.
    ///
    /// Monotone step function of `elapsed`; on equal offsets the later
    /// entry wins.
    pub fn signal_at(&self, elapsed_secs: u64) -> Signal {
        let mut signal = Signal::Blank;
        for t in &self.thresholds {
            if elapsed_secs >= t.offset_secs {
                signal = t.signal;
            }
        }
        signal
    }

    /// Offset of the red (last) threshold.
    pub fn red_offset_secs(&self) -> u64 {
        self.thresholds.last().map(|t| t.offset_secs).unwrap_or(0)
    }

    /// When the grace period runs out, or `None` for categories without one.
    pub fn grace_end_offset_secs(&self) -> Option<u64> {
        if self.grace_secs > 0 {
            Some(self.red_offset_secs() + self.grace_secs)
        } else {
            None
        }
    }
}

/// Immutable lookup table from category to profile.
///
/// Safe to share across threads; profiles never change after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    profiles: Vec<SpeechProfile>,
}

impl Catalog {
    /// The built-in Toastmasters schedules.
    pub fn builtin() -> Self {
        fn t(offset_secs: u64, signal: Signal) -> Threshold {
            Threshold { offset_secs, signal }
        }
        Self {
            profiles: vec![
                SpeechProfile {
                    category: SpeechCategory::IceBreaker,
                    name: "Ice Breaker Speech".into(),
                    duration_range: "4-6 minutes".into(),
                    thresholds: vec![
                        t(240, Signal::Green),
                        t(300, Signal::Yellow),
                        t(360, Signal::Red),
                    ],
                    grace_secs: 30,
                },
                SpeechProfile {
                    category: SpeechCategory::Prepared,
                    name: "Prepared Speech".into(),
                    duration_range: "5-7 minutes".into(),
                    thresholds: vec![
                        t(300, Signal::Green),
                        t(360, Signal::Yellow),
                        t(420, Signal::Red),
                    ],
                    grace_secs: 30,
                },
                SpeechProfile {
                    category: SpeechCategory::Evaluation,
                    name: "Speech Evaluation".into(),
                    duration_range: "2-3 minutes".into(),
                    thresholds: vec![
                        t(120, Signal::Green),
                        t(150, Signal::Yellow),
                        t(180, Signal::Red),
                    ],
                    grace_secs: 30,
                },
                SpeechProfile {
                    category: SpeechCategory::TableTopic,
                    name: "Table Topic Speech".into(),
                    duration_range: "1-2 minutes".into(),
                    thresholds: vec![
                        t(60, Signal::Green),
                        t(90, Signal::Yellow),
                        t(120, Signal::Red),
                    ],
                    grace_secs: 0,
                },
                SpeechProfile {
                    category: SpeechCategory::Test,
                    name: "Test Speech".into(),
                    duration_range: "Color changes every 5s".into(),
                    thresholds: vec![
                        t(5, Signal::Green),
                        t(10, Signal::Yellow),
                        t(15, Signal::Red),
                    ],
                    grace_secs: 10,
                },
            ],
        }
    }

    pub fn get(&self, category: SpeechCategory) -> &SpeechProfile {
        self.profiles
            .iter()
            .find(|p| p.category == category)
            .expect("catalog contains a profile for every speech category")
    }

    /// Resolve a CLI-supplied identifier.
    pub fn lookup(&self, identifier: &str) -> Result<&SpeechProfile, TimerError> {
        let category = identifier.parse::<SpeechCategory>()?;
        Ok(self.get(category))
    }

    pub fn profiles(&self) -> &[SpeechProfile] {
        &self.profiles
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
