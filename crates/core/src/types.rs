//! Record types for the three stored collections
//!
//! All records are plain data with serde derives. Field names in JSON
//! match the bulk-load document format (`first_name`, `visited_at`, ...).
//! Identifiers are 32-bit signed integers, unique within a collection and
//! immutable after creation. Foreign keys on `Visit` are not validated
//! against the referenced collections at insert time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Single-character demographic code
///
/// Serialized as `"m"` / `"f"`, the only two values the dataset uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Code `"m"`
    #[serde(rename = "m")]
    Male,
    /// Code `"f"`
    #[serde(rename = "f")]
    Female,
}

impl Gender {
    /// The single-character wire code for this value
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "m",
            Gender::Female => "f",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered traveler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, immutable after creation
    pub id: i32,
    /// Contact email
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Demographic code
    pub gender: Gender,
    /// Birth date as Unix seconds, UTC
    pub birth_date: i64,
}

/// A place that can be visited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Unique identifier, immutable after creation
    pub id: i32,
    /// Human-readable place name
    pub place: String,
    /// Country the place is in
    pub country: String,
    /// City the place is in
    pub city: String,
    /// Distance from the city center; non-negative by convention, not enforced
    pub distance: i64,
}

/// A single visit of a user to a location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    /// Unique identifier, immutable after creation
    pub id: i32,
    /// Location id; existence is not validated at insert time
    pub location: i32,
    /// User id; existence is not validated at insert time
    pub user: i32,
    /// Visit time as Unix seconds
    pub visited_at: i64,
    /// Rating, conventionally 0-5, not range-enforced
    pub mark: i8,
}

/// Join projection of a visit and its location, returned by the visits query
///
/// Not stored; derived per query from `Visit` and the referenced `Location`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitPlace {
    /// Place name from the visit's location
    pub place: String,
    /// Visit time as Unix seconds
    pub visited_at: i64,
    /// Rating from the visit
    pub mark: i8,
}

/// Discriminates the three record collections
///
/// Used in conflict errors and load reporting to name the collection
/// an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// The users collection
    User,
    /// The locations collection
    Location,
    /// The visits collection
    Visit,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::User => f.write_str("user"),
            RecordKind::Location => f.write_str("location"),
            RecordKind::Visit => f.write_str("visit"),
        }
    }
}
