use clap::Subcommand;
use fastwindow_core::storage::Database;
use fastwindow_core::ReminderScheduler;

#[derive(Subcommand)]
pub enum NotifyAction {
    /// List pending reminders as JSON
    Pending,
    /// Cancel all pending reminders
    CancelAll,
}

pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        NotifyAction::Pending => {
            let reminders = db.pending_reminders()?;
            println!("{}", serde_json::to_string_pretty(&reminders)?);
        }
        NotifyAction::CancelAll => {
            db.cancel_all()?;
            println!("{}", serde_json::json!({ "cancelled": true }));
        }
    }
    Ok(())
}
