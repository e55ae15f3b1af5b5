//! Partial-update payloads
//!
//! Each patch carries one `Option` per mutable field: `Some` means the
//! caller explicitly supplied a value (including a valid-but-empty one,
//! e.g. an empty string), `None` means the field was omitted and the
//! stored value must be preserved. Record ids are immutable and have no
//! patch field.
//!
//! The parsing layer in front of the store is responsible for rejecting
//! explicit JSON nulls; by the time a patch reaches the core, `Some`
//! means "present with value".

use crate::types::{Gender, Location, User, Visit};
use serde::Deserialize;

/// Partial update for a [`User`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserPatch {
    /// New email, if supplied
    pub email: Option<String>,
    /// New given name, if supplied
    pub first_name: Option<String>,
    /// New family name, if supplied
    pub last_name: Option<String>,
    /// New demographic code, if supplied
    pub gender: Option<Gender>,
    /// New birth date (Unix seconds), if supplied
    pub birth_date: Option<i64>,
}

impl UserPatch {
    /// Overwrite exactly the supplied fields of `user`
    pub fn apply(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(gender) = self.gender {
            user.gender = gender;
        }
        if let Some(birth_date) = self.birth_date {
            user.birth_date = birth_date;
        }
    }

    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.gender.is_none()
            && self.birth_date.is_none()
    }
}

/// Partial update for a [`Location`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocationPatch {
    /// New place name, if supplied
    pub place: Option<String>,
    /// New country, if supplied
    pub country: Option<String>,
    /// New city, if supplied
    pub city: Option<String>,
    /// New distance, if supplied
    pub distance: Option<i64>,
}

impl LocationPatch {
    /// Overwrite exactly the supplied fields of `location`
    pub fn apply(&self, location: &mut Location) {
        if let Some(place) = &self.place {
            location.place = place.clone();
        }
        if let Some(country) = &self.country {
            location.country = country.clone();
        }
        if let Some(city) = &self.city {
            location.city = city.clone();
        }
        if let Some(distance) = self.distance {
            location.distance = distance;
        }
    }

    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.place.is_none()
            && self.country.is_none()
            && self.city.is_none()
            && self.distance.is_none()
    }
}

/// Partial update for a [`Visit`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VisitPatch {
    /// New location id, if supplied; existence is not validated
    pub location: Option<i32>,
    /// New user id, if supplied; existence is not validated
    pub user: Option<i32>,
    /// New visit time (Unix seconds), if supplied
    pub visited_at: Option<i64>,
    /// New rating, if supplied
    pub mark: Option<i8>,
}

impl VisitPatch {
    /// Overwrite exactly the supplied fields of `visit`
    pub fn apply(&self, visit: &mut Visit) {
        if let Some(location) = self.location {
            visit.location = location;
        }
        if let Some(user) = self.user {
            visit.user = user;
        }
        if let Some(visited_at) = self.visited_at {
            visit.visited_at = visited_at;
        }
        if let Some(mark) = self.mark {
            visit.mark = mark;
        }
    }

    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.user.is_none()
            && self.visited_at.is_none()
            && self.mark.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            gender: Gender::Female,
            birth_date: 100,
        }
    }

    #[test]
    fn test_user_patch_partial_apply() {
        let mut user = sample_user();
        let patch = UserPatch {
            first_name: Some("X".to_string()),
            ..Default::default()
        };

        patch.apply(&mut user);

        // Only the supplied field changed
        assert_eq!(user.first_name, "X");
        assert_eq!(user.gender, Gender::Female);
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.last_name, "Lovelace");
        assert_eq!(user.birth_date, 100);
    }

    #[test]
    fn test_user_patch_empty_string_overwrites() {
        let mut user = sample_user();
        let patch = UserPatch {
            last_name: Some(String::new()),
            ..Default::default()
        };

        patch.apply(&mut user);

        // Explicitly supplied empty value wins over the stored one
        assert_eq!(user.last_name, "");
    }

    #[test]
    fn test_user_patch_default_is_noop() {
        let mut user = sample_user();
        let before = user.clone();

        let patch = UserPatch::default();
        assert!(patch.is_empty());
        patch.apply(&mut user);

        assert_eq!(user, before);
    }

    #[test]
    fn test_user_patch_absent_json_fields_are_none() {
        let patch: UserPatch = serde_json::from_str(r#"{"first_name":"X"}"#).unwrap();
        assert_eq!(patch.first_name.as_deref(), Some("X"));
        assert!(patch.email.is_none());
        assert!(patch.gender.is_none());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_location_patch_apply_all() {
        let mut location = Location {
            id: 3,
            place: "Old Bridge".to_string(),
            country: "Italy".to_string(),
            city: "Florence".to_string(),
            distance: 12,
        };
        let patch = LocationPatch {
            place: Some("New Bridge".to_string()),
            country: Some("Spain".to_string()),
            city: Some("Madrid".to_string()),
            distance: Some(99),
        };

        patch.apply(&mut location);

        assert_eq!(location.place, "New Bridge");
        assert_eq!(location.country, "Spain");
        assert_eq!(location.city, "Madrid");
        assert_eq!(location.distance, 99);
        assert_eq!(location.id, 3);
    }

    #[test]
    fn test_visit_patch_retargets_foreign_keys() {
        let mut visit = Visit {
            id: 7,
            location: 3,
            user: 1,
            visited_at: 200,
            mark: 4,
        };
        let patch = VisitPatch {
            location: Some(8),
            user: Some(2),
            ..Default::default()
        };

        patch.apply(&mut visit);

        assert_eq!(visit.location, 8);
        assert_eq!(visit.user, 2);
        assert_eq!(visit.visited_at, 200);
        assert_eq!(visit.mark, 4);
    }

    #[test]
    fn test_visit_patch_is_empty() {
        assert!(VisitPatch::default().is_empty());
        let patch = VisitPatch {
            mark: Some(5),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
