//! Terminal rendering of timer events.
//!
//! Signals are rendered as ANSI background colors; grace edges get a
//! full-width banner. All output goes to stdout from the timing loop
//! thread, so lines are printed whole.

use std::io::Write;

use podium_core::{format_duration, EventSink, Signal, TimerEvent};

const RESET: &str = "\x1b[0m";

fn style(signal: Signal) -> &'static str {
    match signal {
        Signal::Blank => "",
        // Black on green / black on yellow / white on red.
        Signal::Green => "\x1b[42;30m",
        Signal::Yellow => "\x1b[43;30m",
        Signal::Red => "\x1b[41;97m",
    }
}

fn banner(line: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {line}");
    println!("{}", "=".repeat(60));
}

/// One line per tick, rewritten in place.
pub fn tick_line(elapsed_secs: u64, signal: Signal) {
    let label = signal.as_str().to_uppercase();
    print!(
        "\r  ELAPSED {}   SIGNAL {}{:<8}{}",
        format_duration(elapsed_secs),
        style(signal),
        label,
        RESET
    );
    let _ = std::io::stdout().flush();
}

/// Renders timer events to the terminal.
pub struct TerminalDisplay;

impl EventSink for TerminalDisplay {
    fn deliver(&self, event: &TimerEvent) {
        match event {
            TimerEvent::Started { category, .. } => {
                println!("\nTimer running for '{category}'. Press Enter to stop.");
            }
            TimerEvent::SignalChanged { signal, elapsed_secs, .. } => {
                println!(
                    "\n  {}>> {} <<{}  at {}",
                    style(*signal),
                    signal.as_str().to_uppercase(),
                    RESET,
                    format_duration(*elapsed_secs)
                );
            }
            TimerEvent::GraceStarted { grace_secs, .. } => {
                banner(&format!(
                    "GRACE PERIOD STARTED! Speaker has {grace_secs} seconds to conclude"
                ));
            }
            TimerEvent::GraceEnded { .. } => {
                banner("GRACE PERIOD OVER! Speaker is now DISQUALIFIED in competitions");
            }
            TimerEvent::Stopped { elapsed_secs, .. } => {
                println!("\n\nTimer stopped at {}", format_duration(*elapsed_secs));
            }
        }
    }
}
