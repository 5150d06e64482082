use crate::persistence::{JsonPeopleStore, PeopleStore, PersistenceResult};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DB_ENV: &str = "BUSY_SCHEDULE_DB";
pub const STORE_ENV: &str = "BUSY_SCHEDULE_STORE";
pub const DEFAULT_JSON_PATH: &str = "./db.json";
pub const DEFAULT_SQLITE_PATH: &str = "./db.sqlite3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Json,
    Sqlite,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Json => "json",
            StoreKind::Sqlite => "sqlite",
        }
    }

    fn default_path(&self) -> &'static str {
        match self {
            StoreKind::Json => DEFAULT_JSON_PATH,
            StoreKind::Sqlite => DEFAULT_SQLITE_PATH,
        }
    }
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StoreKind::Json),
            "sqlite" => Ok(StoreKind::Sqlite),
            other => Err(ConfigError::UnknownStore(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownStore(String),
    SqliteDisabled,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownStore(kind) => {
                write!(f, "unknown store '{kind}' (expected json or sqlite)")
            }
            ConfigError::SqliteDisabled => write!(f, "sqlite support was not compiled in"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where people are stored. Flags win over environment variables, which win over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub store: StoreKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_JSON_PATH),
            store: StoreKind::Json,
        }
    }
}

impl Config {
    pub fn resolve<F>(
        db_flag: Option<String>,
        store_flag: Option<String>,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match store_flag.or_else(|| env(STORE_ENV)) {
            Some(kind) => kind.parse()?,
            None => StoreKind::Json,
        };
        if store == StoreKind::Sqlite && !cfg!(feature = "sqlite") {
            return Err(ConfigError::SqliteDisabled);
        }
        let db_path = db_flag
            .or_else(|| env(DB_ENV))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(store.default_path()));
        Ok(Self { db_path, store })
    }

    pub fn open_store(&self) -> PersistenceResult<Box<dyn PeopleStore>> {
        match self.store {
            StoreKind::Json => Ok(Box::new(JsonPeopleStore::new(&self.db_path))),
            #[cfg(feature = "sqlite")]
            StoreKind::Sqlite => Ok(Box::new(crate::persistence::SqlitePeopleStore::new(
                &self.db_path,
            )?)),
            #[cfg(not(feature = "sqlite"))]
            StoreKind::Sqlite => Err(crate::persistence::PersistenceError::InvalidData(
                ConfigError::SqliteDisabled.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_json_in_working_directory() {
        let config = Config::resolve(None, None, |_| None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn flags_override_environment() {
        let env = |key: &str| match key {
            DB_ENV => Some("/tmp/env.json".to_string()),
            STORE_ENV => Some("json".to_string()),
            _ => None,
        };
        let config = Config::resolve(Some("/tmp/flag.json".into()), None, env).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/flag.json"));

        let config = Config::resolve(None, None, env).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/env.json"));
    }

    #[test]
    fn rejects_unknown_store() {
        assert_eq!(
            Config::resolve(None, Some("yaml".into()), |_| None),
            Err(ConfigError::UnknownStore("yaml".into()))
        );
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_store_gets_its_own_default_path() {
        let config = Config::resolve(None, Some("SQLite".into()), |_| None).unwrap();
        assert_eq!(config.store, StoreKind::Sqlite);
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_SQLITE_PATH));
    }
}
