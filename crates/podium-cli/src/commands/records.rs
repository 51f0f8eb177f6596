use clap::Subcommand;
use podium_core::{Config, RecordStore, SpeechCategory, SpeechRecord};

#[derive(Subcommand)]
pub enum RecordsAction {
    /// List recorded speeches
    List {
        /// Filter by category identifier
        #[arg(long)]
        category: Option<String>,
        /// Filter by speaker name (case-insensitive)
        #[arg(long)]
        speaker: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all recorded speeches
    Clear,
}

pub fn run(action: RecordsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = RecordStore::new(config.records_path());

    match action {
        RecordsAction::List { category, speaker, json } => {
            let mut records = match category {
                Some(c) => store.by_category(c.parse::<SpeechCategory>()?)?,
                None => store.all()?,
            };
            if let Some(s) = speaker {
                let wanted = s.to_lowercase();
                records.retain(|r| r.speaker_name.to_lowercase() == wanted);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_table(&records);
            }
            Ok(())
        }
        RecordsAction::Clear => {
            store.clear()?;
            println!("All speech records cleared.");
            Ok(())
        }
    }
}

fn print_table(records: &[SpeechRecord]) {
    if records.is_empty() {
        println!("No speech records found.");
        return;
    }
    println!("{:<20} {:<20} {:<15} {:<10}", "Date/Time", "Speaker", "Type", "Duration");
    println!("{}", "-".repeat(68));
    for record in records {
        println!(
            "{:<20} {:<20} {:<15} {:<10}",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.speaker_name,
            record.speech_type,
            record.duration_formatted
        );
    }
}
