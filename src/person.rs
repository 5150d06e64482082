use crate::day::DayIndex;
use crate::schedule::Schedule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub schedule: BTreeMap<DayIndex, Schedule>,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schedule: BTreeMap::new(),
        }
    }

    pub fn with_day(mut self, day: DayIndex, schedule: Schedule) -> Self {
        self.schedule.insert(day, schedule);
        self
    }

    pub fn day(&self, day: DayIndex) -> Option<&Schedule> {
        self.schedule.get(&day)
    }

    pub fn set_day(&mut self, day: DayIndex, schedule: Schedule) {
        self.schedule.insert(day, schedule);
    }
}

/// Every person in the database, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct People {
    people: Vec<Person>,
}

impl People {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Person> {
        self.people.iter()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn as_slice(&self) -> &[Person] {
        &self.people
    }

    pub fn find(&self, name: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Person> {
        self.people.iter_mut().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Replace the person with the same name, or append a new one.
    pub fn upsert(&mut self, person: Person) {
        match self.find_mut(&person.name) {
            Some(existing) => *existing = person,
            None => self.people.push(person),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Person> {
        let idx = self.people.iter().position(|p| p.name == name)?;
        Some(self.people.remove(idx))
    }
}

impl From<Vec<Person>> for People {
    fn from(people: Vec<Person>) -> Self {
        Self { people }
    }
}

impl FromIterator<Person> for People {
    fn from_iter<I: IntoIterator<Item = Person>>(iter: I) -> Self {
        Self {
            people: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a People {
    type Item = &'a Person;
    type IntoIter = std::slice::Iter<'a, Person>;

    fn into_iter(self) -> Self::IntoIter {
        self.people.iter()
    }
}
