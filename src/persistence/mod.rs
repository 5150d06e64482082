use crate::People;
use serde_json::Error as SerdeJsonError;
use std::collections::HashSet;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    Csv(csv::Error),
    InvalidData(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub trait PeopleStore {
    fn load_people(&self) -> PersistenceResult<People>;
    fn save_people(&self, people: &People) -> PersistenceResult<()>;

    /// Drop everything stored and start over with nobody.
    fn truncate(&self) -> PersistenceResult<()> {
        self.save_people(&People::new())
    }
}

pub fn validate_people(people: &People) -> PersistenceResult<()> {
    let mut seen = HashSet::with_capacity(people.len());
    for person in people {
        if person.name.trim().is_empty() {
            return Err(PersistenceError::InvalidData(
                "person name must not be empty".into(),
            ));
        }
        if !seen.insert(person.name.as_str()) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate person '{}'",
                person.name
            )));
        }
    }
    Ok(())
}

#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod file;

pub use file::{JsonPeopleStore, save_week_to_csv};
#[cfg(feature = "sqlite")]
pub use sqlite::SqlitePeopleStore;
