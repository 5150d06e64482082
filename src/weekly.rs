use crate::day::DayIndex;
use crate::person::Person;
use crate::schedule::Schedule;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    PersonNotFound { name: String },
    NoScheduleForDay { name: String, day: DayIndex },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PersonNotFound { name } => write!(f, "{name} is not in the database"),
            Warning::NoScheduleForDay { name, day } => {
                write!(f, "{name} has no schedule for {day}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub day: DayIndex,
    pub schedule: Schedule,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyAggregation {
    pub days: Vec<Aggregation>,
}

impl WeeklyAggregation {
    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.days.iter().flat_map(|d| d.warnings.iter())
    }
}

/// Folds the schedules of a group of people into one busy schedule per day.
#[derive(Debug, Clone, Copy)]
pub struct WeeklyAggregator<'a> {
    people: &'a [Person],
}

impl<'a> WeeklyAggregator<'a> {
    pub fn new(people: &'a [Person]) -> Self {
        Self { people }
    }

    /// Union of every named person's schedule on `day`.
    ///
    /// Unknown names and people without ranges on that day are skipped and
    /// reported as warnings, in the order the names were given.
    pub fn aggregate<S: AsRef<str>>(&self, day: DayIndex, names: &[S]) -> Aggregation {
        let mut seen = HashSet::with_capacity(names.len());
        let mut warnings = Vec::new();
        let mut found: Vec<&Schedule> = Vec::with_capacity(names.len());

        for name in names.iter().map(AsRef::as_ref) {
            if !seen.insert(name) {
                continue;
            }
            let Some(person) = self.people.iter().find(|p| p.name == name) else {
                warnings.push(Warning::PersonNotFound { name: name.to_string() });
                continue;
            };
            match person.day(day) {
                Some(schedule) if !schedule.is_empty() => found.push(schedule),
                _ => warnings.push(Warning::NoScheduleForDay {
                    name: name.to_string(),
                    day,
                }),
            }
        }

        for warning in &warnings {
            warn!(%day, "{warning}");
        }

        // union is commutative and associative, so any reduction order gives the same result
        let schedule = found
            .par_iter()
            .map(|s| s.normalized())
            .reduce(Schedule::empty, |a, b| a.union(&b));

        Aggregation {
            day,
            schedule,
            warnings,
        }
    }

    pub fn aggregate_week<S: AsRef<str>>(&self, names: &[S]) -> WeeklyAggregation {
        WeeklyAggregation {
            days: DayIndex::all().map(|day| self.aggregate(day, names)).collect(),
        }
    }
}

/// Free-function form of [`WeeklyAggregator::aggregate`].
pub fn aggregate<S: AsRef<str>>(day: DayIndex, people: &[Person], names: &[S]) -> Aggregation {
    WeeklyAggregator::new(people).aggregate(day, names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(i: u8) -> DayIndex {
        DayIndex::new(i).unwrap()
    }

    fn person(name: &str, d: u8, pairs: &[(&str, &str)]) -> Person {
        Person::new(name).with_day(day(d), Schedule::from_pairs(pairs).unwrap())
    }

    #[test]
    fn merges_found_people() {
        let people = vec![
            person("Alice", 0, &[("09:00", "13:00"), ("18:00", "20:00")]),
            person("Bob", 0, &[("11:00", "16:00"), ("20:00", "21:00")]),
        ];
        let result = aggregate(day(0), &people, &["Alice", "Bob"]);
        assert!(result.warnings.is_empty());
        assert_eq!(
            result.schedule,
            Schedule::from_pairs(&[("09:00", "16:00"), ("18:00", "21:00")]).unwrap()
        );
    }

    #[test]
    fn unknown_and_absent_people_become_warnings() {
        let people = vec![person("Alice", 1, &[("09:00", "10:00")]), Person::new("Carol")];
        let result = aggregate(day(1), &people, &["Alice", "Nobody", "Carol"]);
        assert_eq!(
            result.warnings,
            vec![
                Warning::PersonNotFound { name: "Nobody".into() },
                Warning::NoScheduleForDay { name: "Carol".into(), day: day(1) },
            ]
        );
        assert_eq!(result.schedule.format(), "09:00 — 10:00");
    }

    #[test]
    fn empty_day_schedule_counts_as_absent() {
        let people = vec![Person::new("Dan").with_day(day(4), Schedule::empty())];
        let result = aggregate(day(4), &people, &["Dan"]);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn duplicate_names_are_processed_once() {
        let people = vec![person("Alice", 2, &[("09:00", "10:00")])];
        let result = aggregate(day(2), &people, &["Alice", "Alice", "Ghost", "Ghost"]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.schedule.len(), 1);
    }

    #[test]
    fn single_person_is_normalized() {
        let people = vec![person("Eve", 3, &[("14:00", "16:00"), ("09:00", "15:00")])];
        let result = aggregate(day(3), &people, &["Eve"]);
        assert_eq!(result.schedule.format(), "09:00 — 16:00");
    }

    #[test]
    fn week_covers_all_days() {
        let people = vec![person("Alice", 6, &[("09:00", "10:00")])];
        let week = WeeklyAggregator::new(&people).aggregate_week(&["Alice"]);
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.warnings().count(), 6);
        assert_eq!(week.days[6].schedule.len(), 1);
    }
}
