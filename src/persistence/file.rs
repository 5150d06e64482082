use super::{PeopleStore, PersistenceResult};
use crate::{People, WeeklyAggregation};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// People stored as one JSON array on disk.
pub struct JsonPeopleStore {
    path: PathBuf,
}

impl JsonPeopleStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn write_json(path: &Path, people: &People) -> PersistenceResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, people)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

impl PeopleStore for JsonPeopleStore {
    fn load_people(&self) -> PersistenceResult<People> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no database yet, starting empty");
                return Ok(People::new());
            }
            Err(err) => return Err(err.into()),
        };
        // an empty file is what a fresh `touch` leaves behind
        if file.metadata()?.len() == 0 {
            return Ok(People::new());
        }
        let people: People = serde_json::from_reader(BufReader::new(file))?;
        super::validate_people(&people)?;
        debug!(path = %self.path.display(), count = people.len(), "loaded people");
        Ok(people)
    }

    fn save_people(&self, people: &People) -> PersistenceResult<()> {
        super::validate_people(people)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // write beside the database, then swap it in
        let tmp = self.temp_path();
        if let Err(err) = write_json(&tmp, people) {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), count = people.len(), "saved people");
        Ok(())
    }
}

#[derive(Serialize)]
struct WeekCsvRecord<'a> {
    day: u8,
    weekday: &'a str,
    from: String,
    to: String,
}

const WEEK_CSV_HEADER: [&str; 4] = ["day", "weekday", "from", "to"];

/// One CSV row per merged range: `day,weekday,from,to`. The header is written even for an empty week.
pub fn save_week_to_csv<P: AsRef<Path>>(
    week: &WeeklyAggregation,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(WEEK_CSV_HEADER)?;
    for aggregation in &week.days {
        for range in aggregation.schedule.ranges() {
            writer.serialize(WeekCsvRecord {
                day: aggregation.day.index(),
                weekday: aggregation.day.name(),
                from: range.from().format(),
                to: range.to().format(),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}
