mod engine;

pub use engine::{FastingEngine, SessionState, SessionStatus, TickOutcome};
