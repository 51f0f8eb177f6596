//! End-to-end flow: pick a category, run the engine through every signal
//! and both grace edges on a manual clock, stop, and persist the record.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use podium_core::{
    Catalog, Clock, EventSink, RecordStore, Signal, SpeechCategory, TimerController, TimerEngine,
    TimerEvent,
};
use tempfile::TempDir;

struct ManualClock(AtomicU64);

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct RecordingSink(Mutex<Vec<TimerEvent>>);

impl EventSink for RecordingSink {
    fn deliver(&self, event: &TimerEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

fn settle() {
    thread::sleep(Duration::from_millis(30));
}

#[test]
fn full_speech_run_is_recorded() {
    let clock = Arc::new(ManualClock(AtomicU64::new(5_000_000)));
    let sink = Arc::new(RecordingSink::default());
    let engine = TimerEngine::new()
        .with_clock(Arc::clone(&clock) as Arc<dyn Clock>)
        .with_sink(Arc::clone(&sink) as Arc<dyn EventSink>)
        .with_cadence(Duration::from_millis(1), 2);
    let mut controller = TimerController::new(engine);

    let ticks: Arc<Mutex<Vec<(u64, Signal)>>> = Arc::new(Mutex::new(Vec::new()));
    let observer_ticks = Arc::clone(&ticks);
    assert!(controller.start_speech_timer(
        SpeechCategory::Test,
        Box::new(move |elapsed, signal| observer_ticks.lock().unwrap().push((elapsed, signal))),
    ));

    // Walk the Test schedule: green at 5, yellow at 10, red + grace at 15,
    // disqualification at 25.
    for _ in 0..5 {
        clock.0.fetch_add(5_000, Ordering::SeqCst);
        settle();
    }
    assert_eq!(controller.status().signal, Signal::Red);
    assert!(controller.status().grace_started);
    assert!(controller.status().grace_ended);

    let elapsed = controller.stop_speech_timer();
    assert_eq!(elapsed, 25);
    assert!(!controller.is_timer_running());

    // Event stream: one transition per color, each grace edge once, in
    // elapsed order.
    let events = sink.0.lock().unwrap();
    let changes: Vec<Signal> = events
        .iter()
        .filter_map(|e| match e {
            TimerEvent::SignalChanged { signal, .. } => Some(*signal),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![Signal::Green, Signal::Yellow, Signal::Red]);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, TimerEvent::GraceStarted { .. }))
            .count(),
        1
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, TimerEvent::GraceEnded { .. }))
            .count(),
        1
    );
    assert!(matches!(events.last(), Some(TimerEvent::Stopped { elapsed_secs: 25, .. })));

    // Observer saw ticks in non-decreasing elapsed order.
    let ticks = ticks.lock().unwrap();
    assert!(ticks.windows(2).all(|w| w[0].0 <= w[1].0));

    // The menu layer persists the result.
    let dir = TempDir::new().unwrap();
    let store = RecordStore::new(dir.path().join("speech_records.json"));
    let record = store
        .append(SpeechCategory::Test, "Alice", elapsed)
        .unwrap();
    assert_eq!(record.duration_formatted, "00:25");
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn catalog_red_times_match_published_schedules() {
    let catalog = Catalog::builtin();
    assert_eq!(catalog.get(SpeechCategory::IceBreaker).red_offset_secs(), 360);
    assert_eq!(catalog.get(SpeechCategory::Prepared).red_offset_secs(), 420);
    assert_eq!(catalog.get(SpeechCategory::Evaluation).red_offset_secs(), 180);
    assert_eq!(catalog.get(SpeechCategory::TableTopic).red_offset_secs(), 120);
}
