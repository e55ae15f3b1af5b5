//! traveldb: concurrent in-memory store for users, locations, and visits
//!
//! This facade crate re-exports the public surface of the workspace.
//! Embedding layers (HTTP handlers, startup code) depend on this crate
//! and construct one [`Store`] at process start, passing a handle into
//! every component that needs it.
//!
//! # Example
//!
//! ```
//! use traveldb::{Store, Gender, User, UserPatch, VisitsFilter};
//!
//! let store = Store::new();
//! store.insert_user(User {
//!     id: 1,
//!     email: "ada@example.com".to_string(),
//!     first_name: "Ada".to_string(),
//!     last_name: "Lovelace".to_string(),
//!     gender: Gender::Female,
//!     birth_date: 100,
//! }).unwrap();
//!
//! let patch = UserPatch {
//!     first_name: Some("A.".to_string()),
//!     ..Default::default()
//! };
//! assert!(store.update_user(1, &patch));
//! assert!(store.query_visits(1, &VisitsFilter::default()).is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Record and patch types
pub use traveldb_core::{Gender, Location, RecordKind, User, Visit, VisitPlace};
pub use traveldb_core::{LocationPatch, UserPatch, VisitPatch};

// Errors
pub use traveldb_core::{Error, Result};

// Store, queries, bulk load
pub use traveldb_engine::{load_dir, LoadSummary};
pub use traveldb_engine::{AverageFilter, VisitsFilter};
pub use traveldb_engine::{BulkOutcome, Store, StoreStats};
