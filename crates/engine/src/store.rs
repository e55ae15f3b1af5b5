//! In-memory store for the three record collections
//!
//! ## Design
//!
//! One `parking_lot::RwLock` guards all three identity maps. The lock is
//! deliberately coarse: a write to visits excludes concurrent reads of
//! users. The dataset is read-mostly and fixed-size after bulk load, so
//! the simplicity wins over per-collection locking. Maps are
//! `FxHashMap` for O(1) id lookups with a fast non-crypto hash.
//!
//! ## Thread safety
//!
//! `Store` is `Send + Sync`; construct it once at process start and hand
//! out `Arc<Store>` (or `&Store`) to every component that needs it.
//! Readers share the lock; inserts and updates take it exclusively, and
//! an update's read-modify-write is a single critical section.
//!
//! ## Ownership
//!
//! `get_*` return owned clones. Callers never hold references into the
//! maps, so no record can be observed mid-mutation; all mutation goes
//! through `update_*` under the write lock.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use traveldb_core::{
    Error, Location, LocationPatch, RecordKind, Result, User, UserPatch, Visit, VisitPatch,
};

/// The three identity-keyed maps, guarded together
#[derive(Debug, Default)]
struct Tables {
    users: FxHashMap<i32, User>,
    locations: FxHashMap<i32, Location>,
    visits: FxHashMap<i32, Visit>,
}

/// Per-collection record counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    /// Number of stored users
    pub users: usize,
    /// Number of stored locations
    pub locations: usize,
    /// Number of stored visits
    pub visits: usize,
}

/// Outcome of a bulk insert batch
///
/// Conflicting records are rejected individually; the rest of the batch
/// still lands. The existing record for a conflicting id is untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Records inserted by this batch
    pub inserted: usize,
    /// Ids rejected because a record with that id already existed
    pub conflicts: Vec<i32>,
}

/// Exclusive owner of the users, locations, and visits collections
///
/// All mutation and all read access go through this type. See the module
/// docs for the locking discipline.
#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-collection record counts
    pub fn stats(&self) -> StoreStats {
        let tables = self.tables.read();
        StoreStats {
            users: tables.users.len(),
            locations: tables.locations.len(),
            visits: tables.visits.len(),
        }
    }

    // ========== Inserts ==========

    /// Insert a user, rejecting a duplicate id
    ///
    /// The existence check and the insert are one critical section; on
    /// conflict the stored record is left untouched.
    pub fn insert_user(&self, user: User) -> Result<()> {
        let mut tables = self.tables.write();
        insert_unique(&mut tables.users, RecordKind::User, user.id, user)
    }

    /// Insert a location, rejecting a duplicate id
    pub fn insert_location(&self, location: Location) -> Result<()> {
        let mut tables = self.tables.write();
        insert_unique(
            &mut tables.locations,
            RecordKind::Location,
            location.id,
            location,
        )
    }

    /// Insert a visit, rejecting a duplicate id
    ///
    /// The `location` and `user` foreign keys are not validated for
    /// existence; queries skip visits whose references do not resolve.
    pub fn insert_visit(&self, visit: Visit) -> Result<()> {
        let mut tables = self.tables.write();
        insert_unique(&mut tables.visits, RecordKind::Visit, visit.id, visit)
    }

    // ========== Bulk inserts ==========

    /// Insert many users under one write-lock acquisition
    ///
    /// Per-record conflicts are collected, not fatal.
    pub fn insert_users<I>(&self, users: I) -> BulkOutcome
    where
        I: IntoIterator<Item = User>,
    {
        let mut tables = self.tables.write();
        let mut outcome = BulkOutcome::default();
        for user in users {
            let id = user.id;
            match insert_unique(&mut tables.users, RecordKind::User, id, user) {
                Ok(()) => outcome.inserted += 1,
                Err(_) => outcome.conflicts.push(id),
            }
        }
        outcome
    }

    /// Insert many locations under one write-lock acquisition
    pub fn insert_locations<I>(&self, locations: I) -> BulkOutcome
    where
        I: IntoIterator<Item = Location>,
    {
        let mut tables = self.tables.write();
        let mut outcome = BulkOutcome::default();
        for location in locations {
            let id = location.id;
            match insert_unique(&mut tables.locations, RecordKind::Location, id, location) {
                Ok(()) => outcome.inserted += 1,
                Err(_) => outcome.conflicts.push(id),
            }
        }
        outcome
    }

    /// Insert many visits under one write-lock acquisition
    pub fn insert_visits<I>(&self, visits: I) -> BulkOutcome
    where
        I: IntoIterator<Item = Visit>,
    {
        let mut tables = self.tables.write();
        let mut outcome = BulkOutcome::default();
        for visit in visits {
            let id = visit.id;
            match insert_unique(&mut tables.visits, RecordKind::Visit, id, visit) {
                Ok(()) => outcome.inserted += 1,
                Err(_) => outcome.conflicts.push(id),
            }
        }
        outcome
    }

    // ========== Lookups ==========

    /// Look up a user by id
    ///
    /// Returns an owned snapshot; absence is a normal outcome, not an
    /// error.
    pub fn get_user(&self, id: i32) -> Option<User> {
        self.tables.read().users.get(&id).cloned()
    }

    /// Look up a location by id
    pub fn get_location(&self, id: i32) -> Option<Location> {
        self.tables.read().locations.get(&id).cloned()
    }

    /// Look up a visit by id
    pub fn get_visit(&self, id: i32) -> Option<Visit> {
        self.tables.read().visits.get(&id).cloned()
    }

    // ========== Partial updates ==========

    /// Apply a partial update to a user
    ///
    /// Returns `false` when no record with `id` exists; nothing is
    /// mutated in that case. The read-modify-write happens under one
    /// write-lock critical section.
    pub fn update_user(&self, id: i32, patch: &UserPatch) -> bool {
        let mut tables = self.tables.write();
        match tables.users.get_mut(&id) {
            Some(user) => {
                patch.apply(user);
                true
            }
            None => false,
        }
    }

    /// Apply a partial update to a location
    pub fn update_location(&self, id: i32, patch: &LocationPatch) -> bool {
        let mut tables = self.tables.write();
        match tables.locations.get_mut(&id) {
            Some(location) => {
                patch.apply(location);
                true
            }
            None => false,
        }
    }

    /// Apply a partial update to a visit
    pub fn update_visit(&self, id: i32, patch: &VisitPatch) -> bool {
        let mut tables = self.tables.write();
        match tables.visits.get_mut(&id) {
            Some(visit) => {
                patch.apply(visit);
                true
            }
            None => false,
        }
    }

    /// Run `f` over the tables under one read-lock acquisition
    ///
    /// The query scans use this so cross-references resolve from the same
    /// guard the visit iteration holds.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&StoreView<'_>) -> T) -> T {
        let tables = self.tables.read();
        let view = StoreView { tables: &tables };
        f(&view)
    }
}

/// Read-only view of the tables for the duration of one lock guard
pub(crate) struct StoreView<'a> {
    tables: &'a Tables,
}

impl StoreView<'_> {
    pub(crate) fn visits(&self) -> impl Iterator<Item = &Visit> {
        self.tables.visits.values()
    }

    pub(crate) fn location(&self, id: i32) -> Option<&Location> {
        self.tables.locations.get(&id)
    }

    pub(crate) fn user(&self, id: i32) -> Option<&User> {
        self.tables.users.get(&id)
    }
}

fn insert_unique<T>(
    map: &mut FxHashMap<i32, T>,
    kind: RecordKind,
    id: i32,
    record: T,
) -> Result<()> {
    use std::collections::hash_map::Entry;

    match map.entry(id) {
        Entry::Occupied(_) => Err(Error::conflict(kind, id)),
        Entry::Vacant(slot) => {
            slot.insert(record);
            Ok(())
        }
    }
}
