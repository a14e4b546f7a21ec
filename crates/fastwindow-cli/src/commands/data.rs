use clap::Subcommand;
use fastwindow_core::storage::{Database, RecordStore};

#[derive(Subcommand)]
pub enum DataAction {
    /// Record counts and whether any data exists
    Status,
    /// Delete all weight and fasting records (preferences survive)
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        DataAction::Status => {
            let out = serde_json::json!({
                "has_data": db.has_data()?,
                "weight_records": db.load_weight_records()?.len(),
                "diet_records": db.load_diet_records()?.len(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        DataAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear data without --yes".into());
            }
            db.clear_all()?;
            println!("{}", serde_json::json!({ "cleared": true }));
        }
    }
    Ok(())
}
