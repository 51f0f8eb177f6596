use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use podium_core::{Config, EventSink, RecordStore, TimerController, TimerEngine};

use crate::display::{self, TerminalDisplay};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run an interactive timer for a speech category
    Run {
        /// Category identifier (see `profiles list`)
        category: String,
        /// Speaker name to record; prompted for if omitted
        #[arg(long)]
        speaker: Option<String>,
    },
    /// Print current timer state as JSON
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run { category, speaker } => run_timer(&category, speaker),
        TimerAction::Status => {
            let controller = TimerController::default();
            println!("{}", serde_json::to_string_pretty(&controller.status())?);
            Ok(())
        }
    }
}

fn run_timer(category: &str, speaker: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let engine = TimerEngine::new()
        .with_sink(Arc::new(TerminalDisplay) as Arc<dyn EventSink>)
        .with_cadence(Duration::from_millis(config.tick_ms), config.dwell_ticks);
    let mut controller = TimerController::new(engine);

    let profile = controller.catalog().lookup(category)?.clone();
    println!("Selected: {} ({})", profile.name, profile.duration_range);

    countdown(config.countdown_secs);

    let started = controller.start_speech_timer(
        profile.category,
        Box::new(|elapsed, signal| display::tick_line(elapsed, signal)),
    );
    if !started {
        return Err("failed to start timer".into());
    }

    // Enter unblocks the wait; the reader thread just flips the flag.
    let interrupt = Arc::new(AtomicBool::new(false));
    let reader_interrupt = Arc::clone(&interrupt);
    std::thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
        reader_interrupt.store(true, Ordering::SeqCst);
    });

    controller.wait_for_completion(&interrupt);
    let elapsed = controller.stop_speech_timer();

    if elapsed > 0 {
        record_speech(&config, &profile, speaker, elapsed)?;
    }
    Ok(())
}

fn countdown(secs: u64) {
    if secs == 0 {
        return;
    }
    println!("Timer will begin in {secs} seconds...");
    for remaining in (1..=secs).rev() {
        print!("\r  {remaining}... ");
        let _ = std::io::stdout().flush();
        std::thread::sleep(Duration::from_secs(1));
    }
    println!();
}

fn record_speech(
    config: &Config,
    profile: &podium_core::SpeechProfile,
    speaker: Option<String>,
    elapsed: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let speaker = match speaker {
        Some(name) => name,
        None => {
            print!("Enter speaker name: ");
            std::io::stdout().flush()?;
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            line.trim().to_string()
        }
    };
    if speaker.is_empty() {
        println!("No speaker name provided. Speech not recorded.");
        return Ok(());
    }

    let store = RecordStore::new(config.records_path());
    let record = store.append(profile.category, &speaker, elapsed)?;
    println!("Speech recorded:");
    println!("  Speaker:  {}", record.speaker_name);
    println!("  Type:     {}", profile.name);
    println!("  Duration: {}", record.duration_formatted);
    Ok(())
}
