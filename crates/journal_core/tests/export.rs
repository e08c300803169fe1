use chrono::{TimeZone, Utc};
use journal_core::{
    export_snapshot_at, JournalSnapshot, JournalStore, LogValue, NewEntry, NewTracker,
};
use serde_json::Value;

fn seeded_store() -> JournalStore {
    let store = JournalStore::open_in_memory().unwrap();

    let standup = store
        .create_entry(&NewEntry::new("event", "2024-01-02", "standup"))
        .unwrap();
    let report = store
        .create_entry(&NewEntry::new("task", "2024-01-01", "write report"))
        .unwrap();
    store
        .create_entry(&NewEntry::new("note", "2024-01-03", "loose note"))
        .unwrap();

    let work = store.create_collection("Work").unwrap();
    store.create_collection("Empty").unwrap();
    store.assign_entry_to_collection(standup.id, work.id).unwrap();
    store.assign_entry_to_collection(report.id, work.id).unwrap();

    let sleep = store
        .create_tracker(&NewTracker::new("Sleep", "numeric"))
        .unwrap();
    store
        .create_tracker(&NewTracker::new("Alcohol-free", "boolean"))
        .unwrap();
    store
        .log_tracker_value(sleep.id, "2024-01-02", &LogValue::from(7.5))
        .unwrap();
    store
        .log_tracker_value(sleep.id, "2024-01-01", &LogValue::from(8_i64))
        .unwrap();

    store
}

#[test]
fn snapshot_contains_every_entry_collection_and_tracker() {
    let store = seeded_store();
    let snapshot = store.export_data().unwrap();

    assert_eq!(snapshot.entries.len(), 3);
    assert_eq!(
        snapshot
            .entries
            .iter()
            .map(|entry| entry.content.as_str())
            .collect::<Vec<_>>(),
        vec!["loose note", "standup", "write report"]
    );

    let names = snapshot
        .collections
        .iter()
        .map(|item| item.collection.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Empty", "Work"]);
    assert!(snapshot.collections[0].entries.is_empty());
    let work_members = snapshot.collections[1]
        .entries
        .iter()
        .map(|entry| entry.content.as_str())
        .collect::<Vec<_>>();
    assert_eq!(work_members, vec!["standup", "write report"]);

    assert_eq!(snapshot.trackers.len(), 2);
    assert_eq!(snapshot.trackers[0].tracker.name, "Sleep");
    let sleep_values = snapshot.trackers[0]
        .values
        .iter()
        .map(|value| (value.date.as_str(), value.value.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(sleep_values, vec![("2024-01-01", "8"), ("2024-01-02", "7.5")]);
    assert!(snapshot.trackers[1].values.is_empty());
}

#[test]
fn snapshot_serializes_with_flattened_records() {
    let store = seeded_store();
    let exported_at = Utc.with_ymd_and_hms(2024, 1, 4, 9, 30, 0).unwrap();
    let snapshot = export_snapshot_at(store.connection(), exported_at).unwrap();

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["exportedAt"], "2024-01-04T09:30:00.000Z");
    assert_eq!(json["entries"][0]["type"], "note");
    assert_eq!(json["entries"][0]["status"], "open");
    assert_eq!(json["entries"][0]["tags"], Value::Null);
    assert_eq!(json["collections"][1]["name"], "Work");
    assert_eq!(json["collections"][1]["entries"][0]["content"], "standup");
    assert_eq!(json["trackers"][0]["type"], "numeric");
    assert_eq!(json["trackers"][0]["values"][1]["value"], "7.5");

    let decoded: JournalSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, snapshot);
}

#[test]
fn export_does_not_modify_data() {
    let store = seeded_store();
    let first = export_snapshot_at(store.connection(), Utc::now()).unwrap();
    let second = export_snapshot_at(store.connection(), Utc::now()).unwrap();

    assert_eq!(first.entries, second.entries);
    assert_eq!(first.collections, second.collections);
    assert_eq!(first.trackers, second.trackers);
}
