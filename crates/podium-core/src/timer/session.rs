//! Per-tick session state derivation.
//!
//! `TimerSession` is the pure half of the engine: given an elapsed time it
//! computes the signal transition and grace-period edges for one tick. No
//! threads, no clock -- the background loop in `engine` drives it.

use crate::profile::{Signal, SpeechProfile};

/// Grace-period edge crossed on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraceEdge {
    Started,
    Ended,
}

/// What one tick produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    pub elapsed_secs: u64,
    pub signal: Signal,
    /// Set when the signal stepped up on this tick.
    pub signal_changed: Option<Signal>,
    /// Grace edges crossed on this tick, `Started` always before `Ended`.
    pub grace_edges: Vec<GraceEdge>,
}

/// Mutable state of one timer run.
///
/// The signal is monotone non-decreasing for the lifetime of the session;
/// the grace flags are one-way latches and `grace_ended` can only follow
/// `grace_started`. A session is discarded on stop, never reused.
#[derive(Debug, Clone)]
pub struct TimerSession {
    profile: SpeechProfile,
    current_signal: Signal,
    grace_started: bool,
    grace_ended: bool,
}

impl TimerSession {
    pub fn new(profile: SpeechProfile) -> Self {
        Self {
            profile,
            current_signal: Signal::Blank,
            grace_started: false,
            grace_ended: false,
        }
    }

    pub fn profile(&self) -> &SpeechProfile {
        &self.profile
    }

    pub fn current_signal(&self) -> Signal {
        self.current_signal
    }

    pub fn grace_started(&self) -> bool {
        self.grace_started
    }

    pub fn grace_ended(&self) -> bool {
        self.grace_ended
    }

    /// Advance the session to `elapsed_secs` and report what changed.
    ///
    /// Thresholds are evaluated as "highest reached", so the signal never
    /// steps back down even if the caller hands in a smaller elapsed value.
    /// Each grace edge fires at most once per session no matter how many
    /// ticks land past its offset.
    pub fn advance(&mut self, elapsed_secs: u64) -> SessionUpdate {
        let derived = self.profile.signal_at(elapsed_secs);
        let signal_changed = if derived > self.current_signal {
            self.current_signal = derived;
            Some(derived)
        } else {
            None
        };

        let mut grace_edges = Vec::new();
        if self.profile.grace_secs > 0 {
            if !self.grace_started && elapsed_secs >= self.profile.red_offset_secs() {
                self.grace_started = true;
                grace_edges.push(GraceEdge::Started);
            }
            if self.grace_started && !self.grace_ended {
                if let Some(end) = self.profile.grace_end_offset_secs() {
                    if elapsed_secs >= end {
                        self.grace_ended = true;
                        grace_edges.push(GraceEdge::Ended);
                    }
                }
            }
        }

        SessionUpdate {
            elapsed_secs,
            signal: self.current_signal,
            signal_changed,
            grace_edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Catalog, SpeechCategory};

    fn session(category: SpeechCategory) -> TimerSession {
        TimerSession::new(Catalog::builtin().get(category).clone())
    }

    #[test]
    fn table_topic_walkthrough_without_grace() {
        let mut s = session(SpeechCategory::TableTopic);
        assert_eq!(s.advance(59).signal, Signal::Blank);

        let update = s.advance(60);
        assert_eq!(update.signal, Signal::Green);
        assert_eq!(update.signal_changed, Some(Signal::Green));

        assert_eq!(s.advance(119).signal, Signal::Yellow);
        assert_eq!(s.advance(120).signal, Signal::Red);

        // grace_secs == 0: the latches never engage.
        for elapsed in 120..200 {
            assert!(s.advance(elapsed).grace_edges.is_empty());
        }
        assert!(!s.grace_started());
        assert!(!s.grace_ended());
    }

    #[test]
    fn grace_edges_fire_exactly_once() {
        let mut s = session(SpeechCategory::Test);

        assert!(s.advance(14).grace_edges.is_empty());
        assert_eq!(s.advance(15).grace_edges, vec![GraceEdge::Started]);
        assert!(s.grace_started());

        // Ticks between the edges report nothing.
        for elapsed in 16..25 {
            assert!(s.advance(elapsed).grace_edges.is_empty());
        }

        assert_eq!(s.advance(25).grace_edges, vec![GraceEdge::Ended]);
        assert!(s.grace_ended());

        for elapsed in 26..60 {
            assert!(s.advance(elapsed).grace_edges.is_empty());
        }
    }

    #[test]
    fn large_jump_reports_started_before_ended() {
        let mut s = session(SpeechCategory::Test);
        let update = s.advance(100);
        assert_eq!(update.grace_edges, vec![GraceEdge::Started, GraceEdge::Ended]);
        assert_eq!(update.signal, Signal::Red);
    }

    #[test]
    fn signal_never_steps_back_down() {
        let mut s = session(SpeechCategory::Test);
        s.advance(12);
        assert_eq!(s.current_signal(), Signal::Yellow);
        // Smaller elapsed (clock anomaly upstream) must not demote.
        let update = s.advance(3);
        assert_eq!(update.signal, Signal::Yellow);
        assert_eq!(update.signal_changed, None);
    }

    #[test]
    fn no_change_reported_when_signal_is_stable() {
        let mut s = session(SpeechCategory::Evaluation);
        assert_eq!(s.advance(120).signal_changed, Some(Signal::Green));
        assert_eq!(s.advance(121).signal_changed, None);
        assert_eq!(s.advance(149).signal_changed, None);
        assert_eq!(s.advance(150).signal_changed, Some(Signal::Yellow));
    }
}
