//! Timer engine implementation.
//!
//! One background worker thread per session computes elapsed wall-clock
//! time once per tick, derives the pacing signal through [`TimerSession`],
//! and pushes effects out through an [`EventSink`] plus a per-tick
//! observer callback. The foreground only ever touches the engine through
//! `start`/`stop` and the non-blocking snapshot reads.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Running -> Idle            (session level)
//! Blank -> Green -> Yellow -> Red    (signal level, one-way)
//! ```
//!
//! There is no natural "expired" terminal state: the loop runs until
//! `stop()` sets the cancel flag. Disqualification is advisory state, not
//! an automatic stop.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::session::{GraceEdge, TimerSession};
use crate::error::TimerError;
use crate::events::{EventSink, NullSink, TimerEvent};
use crate::profile::{Signal, SpeechCategory, SpeechProfile};

/// Wall-clock source, injectable for tests.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// The real wall clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Per-tick observer: `(elapsed_secs, signal)`, called from the worker
/// thread once per tick whether or not the signal changed.
pub type TickObserver = Box<dyn FnMut(u64, Signal) + Send>;

/// Serializable snapshot of the engine state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerStatus {
    pub running: bool,
    pub category: Option<SpeechCategory>,
    pub elapsed_secs: u64,
    pub signal: Signal,
    pub grace_started: bool,
    pub grace_ended: bool,
}

/// State shared between the worker thread and snapshot readers.
///
/// Written only by the worker (and reset by `start`); read from any
/// thread.
#[derive(Debug)]
struct Shared {
    running: AtomicBool,
    cancel: AtomicBool,
    start_ms: AtomicU64,
    elapsed_secs: AtomicU64,
    signal: AtomicU8,
    grace_started: AtomicBool,
    grace_ended: AtomicBool,
    category: Mutex<Option<SpeechCategory>>,
}

impl Shared {
    fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            cancel: AtomicBool::new(false),
            start_ms: AtomicU64::new(0),
            elapsed_secs: AtomicU64::new(0),
            signal: AtomicU8::new(signal_to_u8(Signal::Blank)),
            grace_started: AtomicBool::new(false),
            grace_ended: AtomicBool::new(false),
            category: Mutex::new(None),
        }
    }
}

fn signal_to_u8(signal: Signal) -> u8 {
    match signal {
        Signal::Blank => 0,
        Signal::Green => 1,
        Signal::Yellow => 2,
        Signal::Red => 3,
    }
}

fn signal_from_u8(value: u8) -> Signal {
    match value {
        1 => Signal::Green,
        2 => Signal::Yellow,
        3 => Signal::Red,
        _ => Signal::Blank,
    }
}

/// Core timer engine.
///
/// Owns at most one live session. `start` rejects with
/// [`TimerError::AlreadyRunning`] while a session is live -- it never
/// silently replaces one.
pub struct TimerEngine {
    shared: Arc<Shared>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
    tick: Duration,
    dwell_ticks: u32,
    worker: Option<JoinHandle<()>>,
}

impl TimerEngine {
    /// Engine with the real clock, 1-second cadence and a discarding sink.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            clock: Arc::new(SystemClock),
            sink: Arc::new(NullSink),
            tick: Duration::from_secs(1),
            dwell_ticks: 2,
            worker: None,
        }
    }

    /// Attach a rendering collaborator.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Substitute the wall-clock source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override tick cadence and the post-notification dwell (in ticks).
    pub fn with_cadence(mut self, tick: Duration, dwell_ticks: u32) -> Self {
        self.tick = tick;
        self.dwell_ticks = dwell_ticks;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.shared.elapsed_secs.load(Ordering::SeqCst)
    }

    pub fn current_signal(&self) -> Signal {
        signal_from_u8(self.shared.signal.load(Ordering::SeqCst))
    }

    pub fn grace_started(&self) -> bool {
        self.shared.grace_started.load(Ordering::SeqCst)
    }

    pub fn grace_ended(&self) -> bool {
        self.shared.grace_ended.load(Ordering::SeqCst)
    }

    pub fn category(&self) -> Option<SpeechCategory> {
        *self.shared.category.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Build a full state snapshot.
    pub fn snapshot(&self) -> TimerStatus {
        TimerStatus {
            running: self.is_running(),
            category: self.category(),
            elapsed_secs: self.elapsed_secs(),
            signal: self.current_signal(),
            grace_started: self.grace_started(),
            grace_ended: self.grace_ended(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a session and launch the background loop.
    ///
    /// Returns immediately; ticks are emitted asynchronously until
    /// `stop()`. Fails with `AlreadyRunning` while a session is live,
    /// leaving that session untouched.
    pub fn start(
        &mut self,
        profile: SpeechProfile,
        mut observer: TickObserver,
    ) -> Result<(), TimerError> {
        if self.shared.running.load(Ordering::SeqCst) {
            return Err(TimerError::AlreadyRunning);
        }
        // Reap a worker left over from a previous session.
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        let category = profile.category;
        self.shared.cancel.store(false, Ordering::SeqCst);
        self.shared.elapsed_secs.store(0, Ordering::SeqCst);
        self.shared
            .signal
            .store(signal_to_u8(Signal::Blank), Ordering::SeqCst);
        self.shared.grace_started.store(false, Ordering::SeqCst);
        self.shared.grace_ended.store(false, Ordering::SeqCst);
        *self
            .shared
            .category
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(category);
        self.shared.running.store(true, Ordering::SeqCst);

        self.sink.deliver(&TimerEvent::Started {
            category,
            at: Utc::now(),
        });
        debug!(category = %category, "timer session started");

        let shared = Arc::clone(&self.shared);
        let clock = Arc::clone(&self.clock);
        let sink = Arc::clone(&self.sink);
        let tick = self.tick;
        let dwell_ticks = self.dwell_ticks;
        let mut session = TimerSession::new(profile);
        let start_ms = clock.now_ms();
        self.shared.start_ms.store(start_ms, Ordering::SeqCst);

        self.worker = Some(thread::spawn(move || {
            let mut last_elapsed = 0u64;
            while !shared.cancel.load(Ordering::SeqCst) {
                let computed = clock.now_ms().saturating_sub(start_ms) / 1000;
                // If the wall clock moved backward, hold the last known
                // elapsed value; elapsed never decreases within a session.
                let elapsed = computed.max(last_elapsed);
                last_elapsed = elapsed;

                let update = session.advance(elapsed);
                shared.elapsed_secs.store(elapsed, Ordering::SeqCst);

                if let Some(signal) = update.signal_changed {
                    shared.signal.store(signal_to_u8(signal), Ordering::SeqCst);
                    sink.deliver(&TimerEvent::SignalChanged {
                        signal,
                        elapsed_secs: elapsed,
                        at: Utc::now(),
                    });
                }

                for edge in &update.grace_edges {
                    match edge {
                        GraceEdge::Started => {
                            shared.grace_started.store(true, Ordering::SeqCst);
                            sink.deliver(&TimerEvent::GraceStarted {
                                grace_secs: session.profile().grace_secs,
                                elapsed_secs: elapsed,
                                at: Utc::now(),
                            });
                        }
                        GraceEdge::Ended => {
                            shared.grace_ended.store(true, Ordering::SeqCst);
                            sink.deliver(&TimerEvent::GraceEnded {
                                elapsed_secs: elapsed,
                                at: Utc::now(),
                            });
                        }
                    }
                    // Hold the cadence so the notification stays visible.
                    // Ticks missed during the dwell are skipped, not
                    // caught up.
                    let mut dwell = dwell_ticks;
                    while dwell > 0 && !shared.cancel.load(Ordering::SeqCst) {
                        thread::sleep(tick);
                        dwell -= 1;
                    }
                }

                // The observer runs caller code; a panic there must not
                // take the timing loop down with it.
                let result = catch_unwind(AssertUnwindSafe(|| {
                    observer(elapsed, update.signal);
                }));
                if result.is_err() {
                    warn!(elapsed_secs = elapsed, "tick observer panicked; loop continues");
                }

                if shared.cancel.load(Ordering::SeqCst) {
                    break;
                }
                thread::sleep(tick);
            }
            shared.running.store(false, Ordering::SeqCst);
        }));

        Ok(())
    }

    /// Stop the session and return elapsed seconds at the moment of stop.
    ///
    /// Blocks until the worker has observed the cancel flag and exited
    /// (at most one cadence interval plus any in-flight dwell). Idempotent:
    /// with no session live this returns 0.
    pub fn stop(&mut self) -> u64 {
        if !self.shared.running.load(Ordering::SeqCst) {
            if let Some(handle) = self.worker.take() {
                let _ = handle.join();
            }
            return 0;
        }
        self.shared.cancel.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
        self.shared.running.store(false, Ordering::SeqCst);
        // Recompute from the clock: the loop's stored value can lag the
        // real elapsed time by up to one cadence interval. The max keeps
        // the rollback clamp intact.
        let start_ms = self.shared.start_ms.load(Ordering::SeqCst);
        let at_stop = self.clock.now_ms().saturating_sub(start_ms) / 1000;
        let elapsed = at_stop.max(self.shared.elapsed_secs.load(Ordering::SeqCst));
        self.shared.elapsed_secs.store(elapsed, Ordering::SeqCst);
        self.sink.deliver(&TimerEvent::Stopped {
            elapsed_secs: elapsed,
            at: Utc::now(),
        });
        debug!(elapsed_secs = elapsed, "timer session stopped");
        elapsed
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.shared.cancel.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}
