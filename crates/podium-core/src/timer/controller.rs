//! High-level timer lifecycle wrapper.
//!
//! The controller owns the engine and the profile catalog and translates
//! engine errors into boolean results for the menu layer. It never panics
//! toward the caller; failures are logged and surfaced as `false`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::warn;

use super::engine::{TickObserver, TimerEngine, TimerStatus};
use crate::profile::{Catalog, SpeechCategory};

/// Poll interval for `wait_for_completion`. Short enough to stay
/// responsive to an external interrupt.
const COMPLETION_POLL: Duration = Duration::from_millis(100);

pub struct TimerController {
    engine: TimerEngine,
    catalog: Catalog,
}

impl TimerController {
    pub fn new(engine: TimerEngine) -> Self {
        Self {
            engine,
            catalog: Catalog::builtin(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Start a timer for `category` with the given per-tick observer.
    ///
    /// Returns `false` when a session is already live; the cause is
    /// logged rather than propagated.
    pub fn start_speech_timer(&mut self, category: SpeechCategory, observer: TickObserver) -> bool {
        let profile = self.catalog.get(category).clone();
        match self.engine.start(profile, observer) {
            Ok(()) => true,
            Err(err) => {
                warn!(category = %category, error = %err, "could not start speech timer");
                false
            }
        }
    }

    /// Start a timer from a CLI-supplied category identifier.
    pub fn start_speech_timer_named(&mut self, identifier: &str, observer: TickObserver) -> bool {
        match identifier.parse::<SpeechCategory>() {
            Ok(category) => self.start_speech_timer(category, observer),
            Err(err) => {
                warn!(identifier, error = %err, "could not start speech timer");
                false
            }
        }
    }

    /// Stop the running timer and return elapsed seconds (0 when idle).
    pub fn stop_speech_timer(&mut self) -> u64 {
        self.engine.stop()
    }

    pub fn is_timer_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn status(&self) -> TimerStatus {
        self.engine.snapshot()
    }

    /// Block until the engine stops running or `interrupt` is raised.
    ///
    /// Polls at a short fixed interval; callers flip `interrupt` (e.g. on
    /// user input) to unblock and then force a stop themselves.
    pub fn wait_for_completion(&self, interrupt: &AtomicBool) {
        while self.engine.is_running() && !interrupt.load(Ordering::SeqCst) {
            std::thread::sleep(COMPLETION_POLL);
        }
    }
}

impl Default for TimerController {
    fn default() -> Self {
        Self::new(TimerEngine::new())
    }
}
