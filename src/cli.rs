//! Single-shot command line front end.
//!
//! Argument parsing produces an [`Invocation`] value which is then handed to
//! [`run`] together with the input/output streams, so nothing is read from
//! process-wide state after parsing.

use crate::config::{Config, ConfigError};
use crate::persistence::{PeopleStore, PersistenceError, save_week_to_csv};
use crate::render::{render_people, render_week};
use crate::{BusyRange, DayIndex, People, Person, RangeError, Schedule, TimeValue, WeeklyAggregator};
use getopts::Options;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Show { names: Vec<String>, days: Vec<DayIndex> },
    Add { name: String, ranges: Vec<(DayIndex, BusyRange)> },
    Edit { name: String, ranges: Vec<(DayIndex, BusyRange)> },
    Delete { name: String },
    Export { path: PathBuf, names: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub config: Config,
    pub command: Command,
}

#[derive(Debug)]
pub enum CliError {
    Usage(String),
    Config(ConfigError),
    Range(RangeError),
    Persistence(PersistenceError),
    Io(io::Error),
    UnknownPerson(String),
    DuplicatePerson(String),
    Aborted,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Range(err) => write!(f, "{err}"),
            CliError::Persistence(err) => write!(f, "{err}"),
            CliError::Io(err) => write!(f, "io error: {err}"),
            CliError::UnknownPerson(name) => write!(f, "{name} is not in the database"),
            CliError::DuplicatePerson(name) => {
                write!(f, "{name} is already in the database, use 'edit' instead")
            }
            CliError::Aborted => write!(f, "aborted"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RangeError> for CliError {
    fn from(value: RangeError) -> Self {
        Self::Range(value)
    }
}

impl From<PersistenceError> for CliError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag("h", "help", "Print this help");
    opts.optopt(
        "",
        "db",
        "Database file [Default: ./db.json, or $BUSY_SCHEDULE_DB]",
        "PATH",
    );
    opts.optopt(
        "",
        "store",
        "Storage backend: json or sqlite [Default: json, or $BUSY_SCHEDULE_STORE]",
        "KIND",
    );
    opts.optmulti(
        "d",
        "day",
        "Only show this weekday (0-6, Monday first, or a name); repeatable",
        "DAY",
    );
    opts.optmulti(
        "r",
        "range",
        "Busy range for add/edit, e.g. mon=09:00-12:00; repeatable",
        "DAY=FROM-TO",
    );
    opts
}

pub fn usage() -> String {
    let brief = concat!(
        "Usage: ",
        env!("CARGO_PKG_NAME"),
        " [options] <command> [args]\n\n",
        "Commands:\n",
        "  list                 Show everyone in the database\n",
        "  show [NAME...]       Merged busy schedule per weekday (everyone if no names)\n",
        "  add NAME             Add a person (prompts for ranges unless --range is given)\n",
        "  edit NAME            Replace a person's ranges (given days, or prompt for all)\n",
        "  delete NAME          Remove a person\n",
        "  export PATH NAME...  Write the merged week as CSV"
    );
    opts().usage(brief)
}

fn parse_range_flag(value: &str) -> Result<(DayIndex, BusyRange), CliError> {
    let Some((day, range)) = value.split_once('=') else {
        return Err(CliError::Usage(format!(
            "invalid --range '{value}' (expected DAY=FROM-TO)"
        )));
    };
    let day = day
        .parse::<DayIndex>()
        .map_err(|err| CliError::Usage(err.to_string()))?;
    Ok((day, BusyRange::parse(range)?))
}

/// Parse command line arguments (without the program name).
pub fn parse<F>(args: &[String], env: F) -> Result<Invocation, CliError>
where
    F: Fn(&str) -> Option<String>,
{
    let matches = opts()
        .parse(args)
        .map_err(|fail| CliError::Usage(fail.to_string()))?;

    let config = Config::resolve(matches.opt_str("db"), matches.opt_str("store"), env)?;

    if matches.opt_present("help") {
        return Ok(Invocation {
            config,
            command: Command::Help,
        });
    }

    let days = matches
        .opt_strs("day")
        .iter()
        .map(|d| d.parse::<DayIndex>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| CliError::Usage(err.to_string()))?;
    let ranges = matches
        .opt_strs("range")
        .iter()
        .map(|r| parse_range_flag(r))
        .collect::<Result<Vec<_>, _>>()?;

    let mut free = matches.free.into_iter();
    let Some(name) = free.next() else {
        return Err(CliError::Usage("missing command".into()));
    };
    let rest: Vec<String> = free.collect();

    let single_name = |cmd: &str, rest: Vec<String>| -> Result<String, CliError> {
        match <[String; 1]>::try_from(rest) {
            Ok([name]) => Ok(name),
            Err(_) => Err(CliError::Usage(format!("'{cmd}' takes exactly one NAME"))),
        }
    };

    let command = match name.as_str() {
        "help" => Command::Help,
        "list" => Command::List,
        "show" => Command::Show { names: rest, days },
        "add" => Command::Add {
            name: single_name("add", rest)?,
            ranges,
        },
        "edit" => Command::Edit {
            name: single_name("edit", rest)?,
            ranges,
        },
        "delete" => Command::Delete {
            name: single_name("delete", rest)?,
        },
        "export" => {
            let mut rest = rest.into_iter();
            let Some(path) = rest.next() else {
                return Err(CliError::Usage("'export' needs PATH and at least one NAME".into()));
            };
            let names: Vec<String> = rest.collect();
            if names.is_empty() {
                return Err(CliError::Usage("'export' needs PATH and at least one NAME".into()));
            }
            Command::Export {
                path: PathBuf::from(path),
                names,
            }
        }
        other => return Err(CliError::Usage(format!("unknown command '{other}'"))),
    };

    Ok(Invocation { config, command })
}

/// Interactive console: prompts go to `out`, answers come from `input`.
struct Console<'a, R, W> {
    input: R,
    out: &'a mut W,
}

impl<R: BufRead, W: Write> Console<'_, R, W> {
    /// End of input aborts the whole command.
    fn ask(&mut self, prompt: &str) -> Result<String, CliError> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Err(CliError::Aborted);
        }
        Ok(line.trim().to_string())
    }

    /// `None` only for a blank answer when `allow_skip` is set.
    fn ask_time(&mut self, prompt: &str, allow_skip: bool) -> Result<Option<TimeValue>, CliError> {
        loop {
            let answer = self.ask(prompt)?;
            if answer.is_empty() {
                if allow_skip {
                    return Ok(None);
                }
                continue;
            }
            match TimeValue::parse(&answer) {
                Ok(time) => return Ok(Some(time)),
                Err(err) => writeln!(self.out, "\t{err}")?,
            }
        }
    }

    fn ask_day(&mut self, name: &str, day: DayIndex) -> Result<Schedule, CliError> {
        writeln!(self.out, "\tSchedule of {name} for {day}:")?;
        let mut schedule = Schedule::empty();
        loop {
            let Some(from) = self.ask_time("\tFrom? (Enter to skip) ", true)? else {
                return Ok(schedule);
            };
            let Some(to) = self.ask_time("\tTo? ", false)? else {
                continue;
            };
            match BusyRange::new(from, to) {
                Ok(range) => schedule.append(range),
                Err(err) => writeln!(self.out, "\t{err}")?,
            }
        }
    }

    fn ask_week(&mut self, name: &str) -> Result<BTreeMap<DayIndex, Schedule>, CliError> {
        DayIndex::all()
            .map(|day| -> Result<_, CliError> { Ok((day, self.ask_day(name, day)?)) })
            .collect()
    }
}

fn group_by_day(ranges: &[(DayIndex, BusyRange)]) -> BTreeMap<DayIndex, Schedule> {
    let mut days: BTreeMap<DayIndex, Schedule> = BTreeMap::new();
    for (day, range) in ranges {
        days.entry(*day).or_default().append(*range);
    }
    days
}

fn load_or_truncate<R: BufRead, W: Write>(
    store: &dyn PeopleStore,
    console: &mut Console<'_, R, W>,
) -> Result<People, CliError> {
    match store.load_people() {
        Ok(people) => Ok(people),
        Err(PersistenceError::Serialization(err)) => {
            writeln!(console.out, "{err}")?;
            let answer = console.ask(
                "Format is incorrect. Truncate db file? Y for truncate, n for exit the program. Y/n ",
            )?;
            if answer != "Y" {
                return Err(CliError::Aborted);
            }
            store.truncate()?;
            info!("database truncated");
            Ok(People::new())
        }
        Err(err) => Err(err.into()),
    }
}

/// Execute one command. Aggregation warnings go to `err`; everything else to `out`.
pub fn run<R, W, E>(invocation: Invocation, input: R, out: &mut W, err: &mut E) -> Result<(), CliError>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let Invocation { config, command } = invocation;
    if command == Command::Help {
        writeln!(out, "{}", usage())?;
        return Ok(());
    }

    debug!(path = %config.db_path.display(), store = config.store.as_str(), "opening store");
    let store = config.open_store()?;
    let mut console = Console { input, out };
    let mut people = load_or_truncate(store.as_ref(), &mut console)?;

    match command {
        Command::Help => {}
        Command::List => {
            writeln!(console.out, "People in {}:", config.db_path.display())?;
            write!(console.out, "{}", render_people(&people))?;
        }
        Command::Show { names, days } => {
            let names = if names.is_empty() {
                people.iter().map(|p| p.name.clone()).collect()
            } else {
                names
            };
            let mut week = WeeklyAggregator::new(people.as_slice()).aggregate_week(&names);
            if !days.is_empty() {
                week.days.retain(|a| days.contains(&a.day));
            }
            for warning in week.warnings() {
                writeln!(err, "warning: {warning}")?;
            }
            write!(console.out, "{}", render_week(&week))?;
        }
        Command::Add { name, ranges } => {
            if people.contains(&name) {
                return Err(CliError::DuplicatePerson(name));
            }
            let schedule = if ranges.is_empty() {
                console.ask_week(&name)?
            } else {
                group_by_day(&ranges)
            };
            people.upsert(Person { name: name.clone(), schedule });
            store.save_people(&people)?;
            writeln!(console.out, "Added {name}.")?;
        }
        Command::Edit { name, ranges } => {
            if !people.contains(&name) {
                return Err(CliError::UnknownPerson(name));
            }
            let replacement = if ranges.is_empty() {
                console.ask_week(&name)?
            } else {
                group_by_day(&ranges)
            };
            if let Some(person) = people.find_mut(&name) {
                for (day, schedule) in replacement {
                    person.set_day(day, schedule);
                }
            }
            store.save_people(&people)?;
            writeln!(console.out, "Updated {name}.")?;
        }
        Command::Delete { name } => {
            if people.remove(&name).is_none() {
                return Err(CliError::UnknownPerson(name));
            }
            store.save_people(&people)?;
            writeln!(console.out, "Deleted {name}.")?;
        }
        Command::Export { path, names } => {
            let week = WeeklyAggregator::new(people.as_slice()).aggregate_week(&names);
            for warning in week.warnings() {
                writeln!(err, "warning: {warning}")?;
            }
            save_week_to_csv(&week, &path)?;
            writeln!(console.out, "Exported merged schedule to {}.", path.display())?;
        }
    }
    Ok(())
}
