use clap::Subcommand;
use podium_core::{format_duration, Catalog};

#[derive(Subcommand)]
pub enum ProfilesAction {
    /// List the speech catalog with signal times
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ProfilesAction) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::builtin();
    match action {
        ProfilesAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(catalog.profiles())?);
                return Ok(());
            }
            for profile in catalog.profiles() {
                println!("{} - {} ({})", profile.category, profile.name, profile.duration_range);
                for t in &profile.thresholds {
                    println!("    {}  {}", format_duration(t.offset_secs), t.signal.as_str().to_uppercase());
                }
                if let Some(end) = profile.grace_end_offset_secs() {
                    println!(
                        "    {}  DISQUALIFIED (grace period {}s)",
                        format_duration(end),
                        profile.grace_secs
                    );
                }
                println!();
            }
            Ok(())
        }
    }
}
