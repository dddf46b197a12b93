use crate::cache::{CacheKey, QueryCache};
use crate::evaluator::{QueryInstant, open_entities};
use crate::hours::Schedule;
use crate::parser::{ParseError, parse_schedule};
use crate::persistence::{PersistenceError, ScheduleStore, SeedRecord};
use log::{debug, error, info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("schedule '{0}' not found")]
    NotFound(String),
    #[error("schedule '{0}' already exists")]
    AlreadyExists(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Taken by the open-at query route, so no schedule may use it.
pub const RESERVED_NAME: &str = "open";

fn check_name(name: &str) -> ServiceResult<()> {
    if name.trim() == RESERVED_NAME {
        return Err(PersistenceError::InvalidData(format!(
            "schedule name '{RESERVED_NAME}' is reserved"
        ))
        .into());
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntryCount {
    pub name: String,
    pub hours_entries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingSummary {
    pub total_schedules: usize,
    pub total_hours_entries: usize,
    pub schedules: Vec<ScheduleEntryCount>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub added: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SeedSummary {
    pub fn to_cli_summary(&self) -> String {
        format!(
            "added={}, skipped={}, failed={}",
            self.added, self.skipped, self.failed
        )
    }
}

/// Front door for reads and writes of schedules.
///
/// Writes commit to the store and clear the query cache while holding the
/// exclusive side of `gate`; cache-filling reads hold the shared side, so a
/// cached answer is never older than the last committed write.
pub struct HoursService {
    store: Arc<dyn ScheduleStore>,
    cache: Arc<dyn QueryCache>,
    gate: RwLock<()>,
    cache_suspect: AtomicBool,
}

impl HoursService {
    pub fn new(store: Arc<dyn ScheduleStore>, cache: Arc<dyn QueryCache>) -> Self {
        Self {
            store,
            cache,
            gate: RwLock::new(()),
            cache_suspect: AtomicBool::new(false),
        }
    }

    /// Names of schedules open at `datetime`, sorted.
    pub fn open_at(&self, datetime: &str, use_cache: bool) -> ServiceResult<Vec<String>> {
        let instant = QueryInstant::parse(datetime)?;
        if !use_cache {
            return self.evaluate(instant);
        }

        let _read = self.gate.read();
        let key = CacheKey::for_instant(datetime);
        if self.cache_usable() {
            match self.cache.get(&key) {
                Ok(Some(names)) => {
                    debug!("cache hit for {key}");
                    return Ok(names);
                }
                Ok(None) => debug!("cache miss for {key}"),
                Err(err) => warn!("error reading cache for {key}: {err}"),
            }
        }

        let names = self.evaluate(instant)?;
        if self.cache_usable() {
            match self.cache.put(&key, &names) {
                Ok(()) => debug!("cached {} open schedules for {key}", names.len()),
                Err(err) => warn!("error writing cache for {key}: {err}"),
            }
        }
        Ok(names)
    }

    fn evaluate(&self, instant: QueryInstant) -> ServiceResult<Vec<String>> {
        let schedules = self.store.list_schedules()?;
        let names = open_entities(&schedules, instant);
        debug!("found {} open schedules at {instant}", names.len());
        Ok(names)
    }

    fn cache_usable(&self) -> bool {
        if !self.cache_suspect.load(Ordering::Acquire) {
            return true;
        }
        self.try_invalidate()
    }

    fn try_invalidate(&self) -> bool {
        match self.cache.invalidate_all() {
            Ok(()) => {
                self.cache_suspect.store(false, Ordering::Release);
                true
            }
            Err(err) => {
                warn!("error invalidating cache: {err}");
                self.cache_suspect.store(true, Ordering::Release);
                false
            }
        }
    }

    /// Cached answer for `datetime`, if any. Does not evaluate.
    pub fn cached(&self, datetime: &str) -> Option<Vec<String>> {
        if self.cache_suspect.load(Ordering::Acquire) {
            return None;
        }
        self.cache
            .get(&CacheKey::for_instant(datetime))
            .unwrap_or_else(|err| {
                warn!("error reading cache: {err}");
                None
            })
    }

    pub fn clear_cache(&self) {
        let _write = self.gate.write();
        if self.try_invalidate() {
            info!("cache invalidated");
        }
    }

    pub fn list(&self) -> ServiceResult<Vec<Schedule>> {
        Ok(self.store.list_schedules()?)
    }

    pub fn get(&self, name: &str) -> ServiceResult<Schedule> {
        self.store
            .get_schedule(name)?
            .ok_or_else(|| ServiceError::NotFound(name.to_string()))
    }

    pub fn create(&self, name: &str, hours: &str) -> ServiceResult<Schedule> {
        check_name(name)?;
        let schedule = Schedule::new(name.trim(), parse_schedule(hours)?);
        self.commit(|store| match store.insert_schedule(&schedule) {
            Err(PersistenceError::Conflict(name)) => Err(ServiceError::AlreadyExists(name)),
            other => Ok(other?),
        })?;
        info!(
            "created schedule '{}' with {} entries",
            schedule.name,
            schedule.hours.len()
        );
        Ok(schedule)
    }

    /// Replaces the whole schedule stored under `name`; `new_name` may rename it.
    pub fn update(&self, name: &str, new_name: &str, hours: &str) -> ServiceResult<Schedule> {
        check_name(new_name)?;
        let schedule = Schedule::new(new_name.trim(), parse_schedule(hours)?);
        self.commit(|store| match store.replace_schedule(name, &schedule) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ServiceError::NotFound(name.to_string())),
            Err(PersistenceError::Conflict(taken)) => Err(ServiceError::AlreadyExists(taken)),
            Err(err) => Err(err.into()),
        })?;
        info!(
            "updated schedule '{name}' -> '{}' with {} entries",
            schedule.name,
            schedule.hours.len()
        );
        Ok(schedule)
    }

    pub fn delete(&self, name: &str) -> ServiceResult<()> {
        self.commit(|store| {
            if store.delete_schedule(name)? {
                Ok(())
            } else {
                Err(ServiceError::NotFound(name.to_string()))
            }
        })?;
        info!("deleted schedule '{name}'");
        Ok(())
    }

    /// Stores already-parsed schedules, e.g. from a JSON snapshot. Existing
    /// names are replaced.
    ///
    /// Each schedule is written atomically on its own. A storage error part
    /// way through stops the import and leaves the schedules before it stored.
    pub fn import(&self, schedules: &[Schedule]) -> ServiceResult<usize> {
        for schedule in schedules {
            check_name(&schedule.name)?;
        }
        self.commit(|store| {
            for schedule in schedules {
                if !store.replace_schedule(&schedule.name, schedule)? {
                    store.insert_schedule(schedule)?;
                }
            }
            Ok(())
        })?;
        Ok(schedules.len())
    }

    /// Creates a schedule per record, skipping names that already exist.
    /// Rows that fail to parse are logged and counted, not fatal.
    pub fn seed(&self, records: &[SeedRecord]) -> ServiceResult<SeedSummary> {
        let mut summary = SeedSummary::default();
        for record in records {
            if self.store.get_schedule(&record.name)?.is_some() {
                debug!("schedule already exists: {}", record.name);
                summary.skipped += 1;
                continue;
            }
            match self.create(&record.name, &record.hours) {
                Ok(_) => summary.added += 1,
                Err(ServiceError::Persistence(err))
                    if !matches!(err, PersistenceError::InvalidData(_)) =>
                {
                    return Err(err.into());
                }
                Err(err) => {
                    error!("error adding schedule {}: {err}", record.name);
                    summary.failed += 1;
                }
            }
        }
        info!("seeded schedules ({})", summary.to_cli_summary());
        Ok(summary)
    }

    pub fn loading_summary(&self) -> ServiceResult<LoadingSummary> {
        let schedules = self.store.list_schedules()?;
        Ok(LoadingSummary {
            total_schedules: schedules.len(),
            total_hours_entries: self.store.count_entries()?,
            schedules: schedules
                .iter()
                .map(|schedule| ScheduleEntryCount {
                    name: schedule.name.clone(),
                    hours_entries: schedule.hours.len(),
                })
                .collect(),
        })
    }

    fn commit<F>(&self, write: F) -> ServiceResult<()>
    where
        F: FnOnce(&dyn ScheduleStore) -> ServiceResult<()>,
    {
        let _write = self.gate.write();
        let result = write(self.store.as_ref());
        self.try_invalidate();
        result
    }
}
