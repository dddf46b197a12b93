pub mod cache;
pub mod config;
pub mod evaluator;
pub mod hours;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod parser;
pub mod persistence;
pub mod service;

pub use cache::{CacheError, CacheKey, MemoryQueryCache, QueryCache};
pub use config::{ConfigError, ServiceConfig};
pub use evaluator::{QueryInstant, is_open, open_entities};
pub use hours::{ClockTime, HoursEntry, Schedule, WeekDay};
pub use parser::{ParseError, parse_day_range, parse_schedule, parse_time};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteScheduleStore;
pub use persistence::{
    MemoryScheduleStore, PersistenceError, ScheduleStore, SeedRecord, load_schedules_from_json,
    load_seed_csv, save_schedules_to_json,
};
pub use service::{HoursService, LoadingSummary, RESERVED_NAME, SeedSummary, ServiceError};
