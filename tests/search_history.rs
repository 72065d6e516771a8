//! Search History
//!
//! Persistence round trip through the file-backed history store.

use envquery::history::{FileHistory, SearchHistory};
use envquery::{Criterion, FilterSet};

#[test]
fn history_survives_a_new_session() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("search_history.json");

    let mut filters = FilterSet::new();
    filters.set(Criterion::equals("species", "Oak"));
    filters.set(Criterion::between("dbh", 10.0, 50.0));

    // --------------------------------------------------
    // First session: record a search and save it by name.
    // --------------------------------------------------
    {
        let mut history = SearchHistory::open(FileHistory::new(&path)).expect("should open");
        history.record(&filters).expect("should record");
        history.save_search("big oaks", &filters).expect("should save");
    }

    // --------------------------------------------------
    // Second session: the persisted state comes back.
    // --------------------------------------------------
    let history = SearchHistory::open(FileHistory::new(&path)).expect("should reopen");

    assert_eq!(history.recent().len(), 1);
    assert_eq!(history.recent()[0].filters, filters);
    assert_eq!(history.saved().len(), 1);
    assert_eq!(history.saved()[0].name, "big oaks");
}

#[test]
fn missing_file_opens_empty() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("never_written.json");

    let history = SearchHistory::open(FileHistory::new(path)).expect("should open");
    assert!(history.recent().is_empty());
    assert!(history.saved().is_empty());
}

#[test]
fn deleting_entries_persists() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("search_history.json");

    let mut filters = FilterSet::new();
    filters.set(Criterion::contains("address", "Shattuck"));

    let mut history = SearchHistory::open(FileHistory::new(&path)).expect("should open");
    history.record(&filters).expect("should record");
    let id = history.recent()[0].id.clone();
    history.delete_recent(&id).expect("should delete");

    let reopened = SearchHistory::open(FileHistory::new(&path)).expect("should reopen");
    assert!(reopened.recent().is_empty());
}
