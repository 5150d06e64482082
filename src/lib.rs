pub mod time;
pub mod range;
pub mod schedule;
pub mod day;
pub mod person;
pub mod weekly;
pub mod persistence;
pub mod config;
pub mod render;
pub mod logging;
pub mod cli;

pub use time::{ParseError, TimeValue};
pub use range::{BusyRange, InvalidRangeError, RangeError};
pub use schedule::Schedule;
pub use day::{DayIndex, DayIndexError};
pub use person::{People, Person};
pub use weekly::{Aggregation, WeeklyAggregation, WeeklyAggregator, Warning, aggregate};
pub use persistence::{JsonPeopleStore, PeopleStore, PersistenceError, PersistenceResult, save_week_to_csv};
#[cfg(feature = "sqlite")]
pub use persistence::SqlitePeopleStore;
pub use config::{Config, StoreKind};
