//! Bulk load of JSON documents into the store
//!
//! Startup data arrives as a directory of JSON documents named
//! `users_*.json`, `locations_*.json`, and `visits_*.json`, each holding
//! one array under the matching top-level key:
//!
//! ```json
//! { "users": [ { "id": 1, "email": "...", ... } ] }
//! ```
//!
//! Unrecognized file names are ignored. Files are parsed before any lock
//! is taken; each document then lands through one bulk insert batch.
//! Per-record id conflicts are reported in the summary and logged, never
//! fatal; unreadable or malformed files are.

use crate::store::{BulkOutcome, Store};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};
use traveldb_core::{Location, RecordKind, Result, User, Visit};

#[derive(Debug, Deserialize)]
struct UsersDoc {
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct LocationsDoc {
    locations: Vec<Location>,
}

#[derive(Debug, Deserialize)]
struct VisitsDoc {
    visits: Vec<Visit>,
}

/// Totals for one bulk load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Users inserted
    pub users: usize,
    /// Locations inserted
    pub locations: usize,
    /// Visits inserted
    pub visits: usize,
    /// Ids rejected as conflicts, with the collection they collided in
    pub conflicts: Vec<(RecordKind, i32)>,
}

impl LoadSummary {
    /// Total records inserted across all three collections
    pub fn inserted(&self) -> usize {
        self.users + self.locations + self.visits
    }

    fn absorb(&mut self, kind: RecordKind, outcome: BulkOutcome) {
        match kind {
            RecordKind::User => self.users += outcome.inserted,
            RecordKind::Location => self.locations += outcome.inserted,
            RecordKind::Visit => self.visits += outcome.inserted,
        }
        self.conflicts
            .extend(outcome.conflicts.into_iter().map(|id| (kind, id)));
    }
}

/// Load every data document found under `dir` into `store`
///
/// Files are visited in name order so repeated loads of the same
/// directory behave identically. Returns the per-collection totals and
/// the conflicting ids.
pub fn load_dir(store: &Store, dir: impl AsRef<Path>) -> Result<LoadSummary> {
    let dir = dir.as_ref();
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    paths.sort();

    let mut summary = LoadSummary::default();
    for path in paths {
        let name = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name,
            None => continue,
        };
        let kind = match record_kind_for(name) {
            Some(kind) => kind,
            None => continue,
        };

        info!(target: "traveldb::loader", file = name, "loading data file");
        let reader = BufReader::new(File::open(&path)?);
        let outcome = match kind {
            RecordKind::User => {
                let doc: UsersDoc = serde_json::from_reader(reader)?;
                store.insert_users(doc.users)
            }
            RecordKind::Location => {
                let doc: LocationsDoc = serde_json::from_reader(reader)?;
                store.insert_locations(doc.locations)
            }
            RecordKind::Visit => {
                let doc: VisitsDoc = serde_json::from_reader(reader)?;
                store.insert_visits(doc.visits)
            }
        };

        for &id in &outcome.conflicts {
            warn!(
                target: "traveldb::loader",
                file = name,
                kind = %kind,
                id,
                "duplicate id in bulk data, keeping the first record"
            );
        }
        summary.absorb(kind, outcome);
    }

    let stats = store.stats();
    info!(
        target: "traveldb::loader",
        users = stats.users,
        locations = stats.locations,
        visits = stats.visits,
        conflicts = summary.conflicts.len(),
        "bulk load complete"
    );
    Ok(summary)
}

fn record_kind_for(file_name: &str) -> Option<RecordKind> {
    if !file_name.ends_with(".json") {
        return None;
    }
    if file_name.starts_with("users") {
        Some(RecordKind::User)
    } else if file_name.starts_with("locations") {
        Some(RecordKind::Location)
    } else if file_name.starts_with("visits") {
        Some(RecordKind::Visit)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) {
        let mut file = File::create(dir.path().join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_all_three_collections() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "users_1.json",
            r#"{"users":[
                {"id":1,"email":"a@example.com","first_name":"A","last_name":"B","gender":"f","birth_date":100},
                {"id":2,"email":"c@example.com","first_name":"C","last_name":"D","gender":"m","birth_date":200}
            ]}"#,
        );
        write_file(
            &dir,
            "locations_1.json",
            r#"{"locations":[{"id":1,"place":"Bridge","country":"Italy","city":"Rome","distance":10}]}"#,
        );
        write_file(
            &dir,
            "visits_1.json",
            r#"{"visits":[{"id":1,"location":1,"user":1,"visited_at":500,"mark":4}]}"#,
        );

        let store = Store::new();
        let summary = load_dir(&store, dir.path()).unwrap();

        assert_eq!(summary.users, 2);
        assert_eq!(summary.locations, 1);
        assert_eq!(summary.visits, 1);
        assert_eq!(summary.inserted(), 4);
        assert!(summary.conflicts.is_empty());

        assert_eq!(store.get_user(2).unwrap().email, "c@example.com");
        assert_eq!(store.get_visit(1).unwrap().mark, 4);
    }

    #[test]
    fn test_load_reports_conflicts_without_aborting() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "users_1.json",
            r#"{"users":[{"id":1,"email":"first@example.com","first_name":"A","last_name":"B","gender":"f","birth_date":100}]}"#,
        );
        write_file(
            &dir,
            "users_2.json",
            r#"{"users":[
                {"id":1,"email":"dup@example.com","first_name":"X","last_name":"Y","gender":"m","birth_date":200},
                {"id":2,"email":"new@example.com","first_name":"C","last_name":"D","gender":"m","birth_date":300}
            ]}"#,
        );

        let store = Store::new();
        let summary = load_dir(&store, dir.path()).unwrap();

        assert_eq!(summary.users, 2);
        assert_eq!(summary.conflicts, vec![(RecordKind::User, 1)]);

        // First file wins, name order is the load order
        assert_eq!(store.get_user(1).unwrap().email, "first@example.com");
    }

    #[test]
    fn test_load_ignores_unrelated_files() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "README.txt", "not data");
        write_file(&dir, "options.json", r#"{"anything": true}"#);

        let store = Store::new();
        let summary = load_dir(&store, dir.path()).unwrap();
        assert_eq!(summary.inserted(), 0);
    }

    #[test]
    fn test_load_malformed_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "users_1.json", "{not json");

        let store = Store::new();
        let result = load_dir(&store, dir.path());
        assert!(matches!(result, Err(traveldb_core::Error::Json(_))));
    }

    #[test]
    fn test_load_missing_directory_is_an_error() {
        let store = Store::new();
        let result = load_dir(&store, "/definitely/not/here");
        assert!(matches!(result, Err(traveldb_core::Error::Io(_))));
    }

    #[test]
    fn test_record_kind_for_names() {
        assert_eq!(record_kind_for("users_7.json"), Some(RecordKind::User));
        assert_eq!(
            record_kind_for("locations_1.json"),
            Some(RecordKind::Location)
        );
        assert_eq!(record_kind_for("visits_12.json"), Some(RecordKind::Visit));
        assert_eq!(record_kind_for("users_7.csv"), None);
        assert_eq!(record_kind_for("notes.json"), None);
    }
}
