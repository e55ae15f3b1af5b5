//! Core types for traveldb
//!
//! This crate defines the foundational types used throughout the system:
//! - User, Location, Visit: the three stored record types
//! - VisitPlace: the join projection returned by the visits query
//! - Gender: single-character demographic code
//! - UserPatch, LocationPatch, VisitPatch: partial-update payloads
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod patch;
pub mod types;

pub use error::{Error, Result};
pub use patch::{LocationPatch, UserPatch, VisitPatch};
pub use types::{Gender, Location, RecordKind, User, Visit, VisitPlace};
