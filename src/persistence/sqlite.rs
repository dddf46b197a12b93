use super::{PersistenceError, PersistenceResult, ScheduleStore, validate_schedule};
use crate::hours::{ClockTime, HoursEntry, Schedule, WeekDay};
use log::debug;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Transaction, params};

/// Schedules stored as one `schedules` row per entity plus one
/// `schedule_hours` row per entry.
pub struct SqliteScheduleStore {
    connection: Mutex<Connection>,
}

impl SqliteScheduleStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::from_connection(connection)
    }

    pub fn open_in_memory() -> PersistenceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> PersistenceResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS schedules (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS schedule_hours (
                id INTEGER PRIMARY KEY,
                schedule_id INTEGER NOT NULL REFERENCES schedules(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                day_of_week INTEGER NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
                open_time TEXT NOT NULL,
                close_time TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_schedule_hours_lookup
                ON schedule_hours (schedule_id, day_of_week);
            CREATE INDEX IF NOT EXISTS idx_schedule_hours_search
                ON schedule_hours (day_of_week, open_time, close_time);
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn schedule_id(tx: &Connection, name: &str) -> PersistenceResult<Option<i64>> {
        let id = tx
            .query_row(
                "SELECT id FROM schedules WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn save_hours(tx: &Transaction, schedule_id: i64, hours: &[HoursEntry]) -> PersistenceResult<()> {
        tx.execute(
            "DELETE FROM schedule_hours WHERE schedule_id = ?1",
            params![schedule_id],
        )?;
        let mut stmt = tx.prepare(
            "INSERT INTO schedule_hours (schedule_id, position, day_of_week, open_time, close_time)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (position, entry) in hours.iter().enumerate() {
            stmt.execute(params![
                schedule_id,
                position as i64,
                entry.weekday.index(),
                entry.open.to_string(),
                entry.close.to_string(),
            ])?;
        }
        Ok(())
    }

    fn load_hours(conn: &Connection, schedule_id: i64) -> PersistenceResult<Vec<HoursEntry>> {
        let mut stmt = conn.prepare(
            "SELECT day_of_week, open_time, close_time FROM schedule_hours
             WHERE schedule_id = ?1 ORDER BY position ASC",
        )?;
        let rows = stmt.query_map(params![schedule_id], |row| {
            Ok((
                row.get::<_, u8>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut hours = Vec::new();
        for row in rows {
            let (day, open, close) = row?;
            let weekday = WeekDay::new(day).ok_or_else(|| {
                PersistenceError::InvalidData(format!("stored weekday {day} is out of range"))
            })?;
            let open: ClockTime = open.parse().map_err(PersistenceError::InvalidData)?;
            let close: ClockTime = close.parse().map_err(PersistenceError::InvalidData)?;
            hours.push(HoursEntry::new(weekday, open, close));
        }
        Ok(hours)
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn list_schedules(&self) -> PersistenceResult<Vec<Schedule>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare("SELECT id, name FROM schedules ORDER BY name ASC")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;

        let mut schedules = Vec::new();
        for row in rows {
            let (id, name) = row?;
            let hours = Self::load_hours(&conn, id)?;
            schedules.push(Schedule::new(name, hours));
        }
        Ok(schedules)
    }

    fn get_schedule(&self, name: &str) -> PersistenceResult<Option<Schedule>> {
        let conn = self.connection.lock();
        let Some(id) = Self::schedule_id(&conn, name)? else {
            return Ok(None);
        };
        let hours = Self::load_hours(&conn, id)?;
        Ok(Some(Schedule::new(name, hours)))
    }

    fn insert_schedule(&self, schedule: &Schedule) -> PersistenceResult<()> {
        validate_schedule(schedule)?;
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        if Self::schedule_id(&tx, &schedule.name)?.is_some() {
            return Err(PersistenceError::Conflict(schedule.name.clone()));
        }
        tx.execute(
            "INSERT INTO schedules (name) VALUES (?1)",
            params![schedule.name],
        )?;
        let id = tx.last_insert_rowid();
        Self::save_hours(&tx, id, &schedule.hours)?;
        tx.commit()?;
        debug!(
            "stored schedule '{}' with {} entries",
            schedule.name,
            schedule.hours.len()
        );
        Ok(())
    }

    fn replace_schedule(&self, name: &str, schedule: &Schedule) -> PersistenceResult<bool> {
        validate_schedule(schedule)?;
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        let Some(id) = Self::schedule_id(&tx, name)? else {
            return Ok(false);
        };
        if schedule.name != name {
            if Self::schedule_id(&tx, &schedule.name)?.is_some() {
                return Err(PersistenceError::Conflict(schedule.name.clone()));
            }
            tx.execute(
                "UPDATE schedules SET name = ?1 WHERE id = ?2",
                params![schedule.name, id],
            )?;
        }
        Self::save_hours(&tx, id, &schedule.hours)?;
        tx.commit()?;
        Ok(true)
    }

    fn delete_schedule(&self, name: &str) -> PersistenceResult<bool> {
        let conn = self.connection.lock();
        let removed = conn.execute("DELETE FROM schedules WHERE name = ?1", params![name])?;
        Ok(removed > 0)
    }

    fn count_entries(&self) -> PersistenceResult<usize> {
        let conn = self.connection.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM schedule_hours", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
