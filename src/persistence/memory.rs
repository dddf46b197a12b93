use super::{PersistenceError, PersistenceResult, ScheduleStore, validate_schedule};
use crate::hours::Schedule;
use parking_lot::RwLock;

/// Store kept entirely in process memory. Used by the CLI and tests.
#[derive(Default)]
pub struct MemoryScheduleStore {
    schedules: RwLock<Vec<Schedule>>,
}

impl MemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScheduleStore for MemoryScheduleStore {
    fn list_schedules(&self) -> PersistenceResult<Vec<Schedule>> {
        let mut schedules = self.schedules.read().clone();
        schedules.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(schedules)
    }

    fn get_schedule(&self, name: &str) -> PersistenceResult<Option<Schedule>> {
        Ok(self
            .schedules
            .read()
            .iter()
            .find(|schedule| schedule.name == name)
            .cloned())
    }

    fn insert_schedule(&self, schedule: &Schedule) -> PersistenceResult<()> {
        validate_schedule(schedule)?;
        let mut guard = self.schedules.write();
        if guard.iter().any(|existing| existing.name == schedule.name) {
            return Err(PersistenceError::Conflict(schedule.name.clone()));
        }
        guard.push(schedule.clone());
        Ok(())
    }

    fn replace_schedule(&self, name: &str, schedule: &Schedule) -> PersistenceResult<bool> {
        validate_schedule(schedule)?;
        let mut guard = self.schedules.write();
        let Some(position) = guard.iter().position(|existing| existing.name == name) else {
            return Ok(false);
        };
        if schedule.name != name && guard.iter().any(|existing| existing.name == schedule.name) {
            return Err(PersistenceError::Conflict(schedule.name.clone()));
        }
        guard[position] = schedule.clone();
        Ok(true)
    }

    fn delete_schedule(&self, name: &str) -> PersistenceResult<bool> {
        let mut guard = self.schedules.write();
        let before = guard.len();
        guard.retain(|schedule| schedule.name != name);
        Ok(guard.len() != before)
    }

    fn count_entries(&self) -> PersistenceResult<usize> {
        Ok(self
            .schedules
            .read()
            .iter()
            .map(|schedule| schedule.hours.len())
            .sum())
    }
}
