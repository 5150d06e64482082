use super::{PeopleStore, PersistenceResult};
use crate::{People, Person};
use rusqlite::{Connection, params};
use std::sync::Mutex;
use tracing::debug;

pub struct SqlitePeopleStore {
    connection: Mutex<Connection>,
}

impl SqlitePeopleStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS people (
                name TEXT PRIMARY KEY,
                position INTEGER NOT NULL,
                schedule_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }
}

impl PeopleStore for SqlitePeopleStore {
    fn save_people(&self, people: &People) -> PersistenceResult<()> {
        super::validate_people(people)?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM people", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO people (name, position, schedule_json) VALUES (?1, ?2, ?3)",
            )?;
            for (position, person) in people.iter().enumerate() {
                let json = serde_json::to_string(&person.schedule)?;
                stmt.execute(params![person.name, position as i64, json])?;
            }
        }
        tx.commit()?;
        debug!(count = people.len(), "saved people to sqlite");
        Ok(())
    }

    fn load_people(&self) -> PersistenceResult<People> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let mut stmt = conn.prepare("SELECT name, schedule_json FROM people ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut people = Vec::new();
        for row in rows {
            let (name, json) = row?;
            let mut person = Person::new(name);
            person.schedule = serde_json::from_str(&json)?;
            people.push(person);
        }

        let people = People::from(people);
        super::validate_people(&people)?;
        debug!(count = people.len(), "loaded people from sqlite");
        Ok(people)
    }
}
