use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::records::DietRecord;
use crate::session::SessionStatus;

/// State changes and snapshots the CLI prints as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    FastStarted {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        duration_hours: f64,
        at: DateTime<Utc>,
    },
    /// User-initiated early stop; `success` reflects the actual elapsed time.
    FastStopped {
        record: DietRecord,
        fasted_hours: f64,
        at: DateTime<Utc>,
    },
    /// The fast reached its scheduled end.
    FastCompleted {
        record: DietRecord,
        at: DateTime<Utc>,
    },
    WeightRecorded {
        date: DateTime<Utc>,
        weight: f64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionStatus,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        remaining_secs: i64,
        duration_hours: f64,
        at: DateTime<Utc>,
    },
}
