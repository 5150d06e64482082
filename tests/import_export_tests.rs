use busy_schedule::{
    DayIndex, JsonPeopleStore, PeopleStore, People, PersistenceError, Person, Schedule,
    WeeklyAggregator, save_week_to_csv,
};
use std::fs;
use tempfile::{NamedTempFile, tempdir};

fn day(i: u8) -> DayIndex {
    DayIndex::new(i).unwrap()
}

fn build_sample_people() -> People {
    People::from(vec![
        Person::new("Alice")
            .with_day(day(0), Schedule::from_pairs(&[("09:00", "13:00"), ("18:00", "20:00")]).unwrap())
            .with_day(day(4), Schedule::empty()),
        Person::new("Bob").with_day(day(0), Schedule::from_pairs(&[("11:00", "16:00")]).unwrap()),
    ])
}

#[test]
fn json_round_trip_preserves_people() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let store = JsonPeopleStore::new(tmp.path());
    let people = build_sample_people();

    store.save_people(&people).expect("save people");
    let loaded = store.load_people().expect("load people");

    assert_eq!(loaded, people);
}

#[test]
fn json_document_uses_day_index_keys() {
    let tmp = NamedTempFile::new().unwrap();
    let store = JsonPeopleStore::new(tmp.path());
    store.save_people(&build_sample_people()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(tmp.path()).unwrap()).unwrap();
    assert_eq!(value[0]["name"], "Alice");
    assert_eq!(value[0]["schedule"]["0"][1]["from"], "18:00");
    assert_eq!(value[0]["schedule"]["4"], serde_json::json!([]));
    assert_eq!(value[1]["schedule"]["0"][0]["to"], "16:00");
}

#[test]
fn loads_legacy_documents_with_seconds() {
    let tmp = NamedTempFile::new().unwrap();
    fs::write(
        tmp.path(),
        r#"[{"name": "Alice", "schedule": {"0": [{"from": "09:00:00", "to": "12:00:00"}], "1": []}}]"#,
    )
    .unwrap();

    let people = JsonPeopleStore::new(tmp.path()).load_people().unwrap();
    let alice = people.find("Alice").unwrap();
    assert_eq!(alice.day(day(0)).unwrap().format(), "09:00 — 12:00");
    assert!(alice.day(day(1)).unwrap().is_empty());
}

#[test]
fn missing_or_empty_file_loads_as_nobody() {
    let dir = tempdir().unwrap();
    let store = JsonPeopleStore::new(dir.path().join("nested").join("db.json"));
    assert!(store.load_people().unwrap().is_empty());

    store.save_people(&build_sample_people()).unwrap();
    assert_eq!(store.load_people().unwrap().len(), 2);

    let empty = NamedTempFile::new().unwrap();
    assert!(JsonPeopleStore::new(empty.path()).load_people().unwrap().is_empty());
}

#[test]
fn malformed_documents_are_rejected() {
    let tmp = NamedTempFile::new().unwrap();
    fs::write(tmp.path(), "{not json").unwrap();
    let store = JsonPeopleStore::new(tmp.path());
    assert!(matches!(store.load_people(), Err(PersistenceError::Serialization(_))));

    fs::write(tmp.path(), r#"[{"name": "A", "schedule": {"0": [{"from": "12:00", "to": "09:00"}]}}]"#).unwrap();
    assert!(matches!(store.load_people(), Err(PersistenceError::Serialization(_))));

    fs::write(tmp.path(), r#"[{"name": "A", "schedule": {"7": []}}]"#).unwrap();
    assert!(matches!(store.load_people(), Err(PersistenceError::Serialization(_))));

    store.truncate().unwrap();
    assert!(store.load_people().unwrap().is_empty());
}

#[test]
fn duplicate_names_are_invalid() {
    let tmp = NamedTempFile::new().unwrap();
    let store = JsonPeopleStore::new(tmp.path());
    let people = People::from(vec![Person::new("Alice"), Person::new("Alice")]);
    let err = store.save_people(&people).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
    assert_eq!(err.to_string(), "invalid data: duplicate person 'Alice'");
}

#[test]
fn csv_export_lists_merged_ranges_per_day() {
    let people = build_sample_people();
    let week = WeeklyAggregator::new(people.as_slice()).aggregate_week(&["Alice", "Bob"]);

    let tmp = NamedTempFile::new().unwrap();
    save_week_to_csv(&week, tmp.path()).expect("export csv");

    let text = fs::read_to_string(tmp.path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "day,weekday,from,to",
            "0,Monday,09:00,16:00",
            "0,Monday,18:00,20:00",
        ]
    );
}

#[test]
fn csv_export_of_a_free_week_keeps_the_header() {
    let people = build_sample_people();
    let week = WeeklyAggregator::new(people.as_slice()).aggregate_week(&["Nobody"]);

    let tmp = NamedTempFile::new().unwrap();
    save_week_to_csv(&week, tmp.path()).expect("export csv");

    assert_eq!(fs::read_to_string(tmp.path()).unwrap(), "day,weekday,from,to\n");
}

#[test]
fn json_save_replaces_the_file_without_leftovers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.json");
    fs::write(&path, "stale contents that are longer than nothing").unwrap();

    let store = JsonPeopleStore::new(&path);
    store.save_people(&People::from(vec![Person::new("Carol")])).unwrap();

    let loaded = store.load_people().unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(loaded.contains("Carol"));

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("db.json")]);
}
