//! Storage engine for traveldb
//!
//! This crate owns the shared in-memory state and everything that touches
//! it:
//! - Store: the three identity-keyed collections under one RwLock
//! - Query engine: the two analytical scans over visits
//! - Bulk loader: directory-of-JSON startup load with conflict reporting

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod loader;
pub mod query;
pub mod store;

pub use loader::{load_dir, LoadSummary};
pub use query::{AverageFilter, VisitsFilter};
pub use store::{BulkOutcome, Store, StoreStats};
