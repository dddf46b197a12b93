use super::{PersistenceResult, validate_schedule};
use crate::hours::Schedule;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// One row of a seed CSV: an entity name and its raw hours notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRecord {
    #[serde(rename = "Restaurant Name")]
    pub name: String,
    #[serde(rename = "Hours")]
    pub hours: String,
}

pub fn load_seed_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<SeedRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

#[derive(Serialize, Deserialize)]
struct ScheduleSnapshot {
    schedules: Vec<Schedule>,
}

pub fn save_schedules_to_json<P: AsRef<Path>>(
    schedules: &[Schedule],
    path: P,
) -> PersistenceResult<()> {
    let snapshot = ScheduleSnapshot {
        schedules: schedules.to_vec(),
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_schedules_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Schedule>> {
    let file = File::open(path)?;
    let snapshot: ScheduleSnapshot = serde_json::from_reader(file)?;
    for schedule in &snapshot.schedules {
        validate_schedule(schedule)?;
    }
    Ok(snapshot.schedules)
}
