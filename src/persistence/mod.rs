use crate::hours::Schedule;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("schedule '{0}' already exists")]
    Conflict(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Durable home of parsed schedules, keyed by entity name.
///
/// Every write replaces whole schedules; implementations must never leave a
/// schedule with only part of its entries stored.
pub trait ScheduleStore: Send + Sync {
    /// All schedules, ordered by name.
    fn list_schedules(&self) -> PersistenceResult<Vec<Schedule>>;
    fn get_schedule(&self, name: &str) -> PersistenceResult<Option<Schedule>>;
    /// Fails with [`PersistenceError::Conflict`] when the name is taken.
    fn insert_schedule(&self, schedule: &Schedule) -> PersistenceResult<()>;
    /// Swaps the schedule stored under `name` for `schedule`, which may carry a
    /// new name. Returns `false` when nothing is stored under `name`.
    fn replace_schedule(&self, name: &str, schedule: &Schedule) -> PersistenceResult<bool>;
    fn delete_schedule(&self, name: &str) -> PersistenceResult<bool>;
    fn count_entries(&self) -> PersistenceResult<usize>;
}

/// Rejects entries that could never match, such as zero-length intervals.
pub fn validate_schedule(schedule: &Schedule) -> PersistenceResult<()> {
    if schedule.name.trim().is_empty() {
        return Err(PersistenceError::InvalidData(
            "schedule name must not be empty".to_string(),
        ));
    }
    if let Some(entry) = schedule.hours.iter().find(|e| e.open == e.close) {
        return Err(PersistenceError::InvalidData(format!(
            "schedule '{}' has a zero-length interval on {} at {}",
            schedule.name, entry.weekday, entry.open
        )));
    }
    Ok(())
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    SeedRecord, load_schedules_from_json, load_seed_csv, save_schedules_to_json,
};
pub use memory::MemoryScheduleStore;
