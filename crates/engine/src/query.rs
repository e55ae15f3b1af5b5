//! Analytical queries over the visits collection
//!
//! Both queries are linear scans that run entirely under one read-lock
//! acquisition; cross-references to the other two collections resolve
//! from the same guard, so a scan always sees one consistent snapshot.
//!
//! All range bounds are exclusive. Absent bounds default to the full
//! representable range, absent filters mean "no filter".
//!
//! A visit whose foreign key does not resolve is skipped and logged; the
//! store never validates references at insert time, so scans must
//! tolerate dangling ones.

use crate::store::Store;
use chrono::{DateTime, Datelike, Utc};
use tracing::warn;
use traveldb_core::{Gender, VisitPlace};

/// Filters for the visits-by-user query
///
/// `None` bounds default to the full `i64` range; `None` country means
/// no country filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitsFilter {
    /// Exclusive lower bound on `visited_at`
    pub from_date: Option<i64>,
    /// Exclusive upper bound on `visited_at`
    pub to_date: Option<i64>,
    /// Exact-match filter on the visit's location country
    pub country: Option<String>,
    /// Exclusive upper bound on the visit's location distance
    pub to_distance: Option<i64>,
}

/// Filters for the average-mark-by-location query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AverageFilter {
    /// Exclusive lower bound on `visited_at`
    pub from_date: Option<i64>,
    /// Exclusive upper bound on `visited_at`
    pub to_date: Option<i64>,
    /// Exclusive lower bound on the visiting user's age
    pub from_age: Option<i64>,
    /// Exclusive upper bound on the visiting user's age
    pub to_age: Option<i64>,
    /// Exact-match filter on the visiting user's gender
    pub gender: Option<Gender>,
}

impl Store {
    /// Visits of one user, filtered and projected to places
    ///
    /// Scans all visits; a visit qualifies when it belongs to `user_id`,
    /// `from_date < visited_at < to_date`, its location resolves, the
    /// country matches (when a filter was given), and the location's
    /// `distance < to_distance`. Results are sorted ascending by
    /// `visited_at` with a stable sort, so repeated calls on an
    /// unmodified store return identical orderings.
    ///
    /// Whether `user_id` names an existing user is the caller's concern;
    /// an unknown user simply matches no visits.
    pub fn query_visits(&self, user_id: i32, filter: &VisitsFilter) -> Vec<VisitPlace> {
        let from_date = filter.from_date.unwrap_or(i64::MIN);
        let to_date = filter.to_date.unwrap_or(i64::MAX);
        let to_distance = filter.to_distance.unwrap_or(i64::MAX);

        let mut places = self.read(|view| {
            let mut places = Vec::new();
            for visit in view.visits() {
                if visit.user != user_id {
                    continue;
                }
                if visit.visited_at <= from_date || visit.visited_at >= to_date {
                    continue;
                }
                let location = match view.location(visit.location) {
                    Some(location) => location,
                    None => {
                        warn!(
                            target: "traveldb::query",
                            visit_id = visit.id,
                            location_id = visit.location,
                            "skipping visit with dangling location reference"
                        );
                        continue;
                    }
                };
                if let Some(country) = &filter.country {
                    if &location.country != country {
                        continue;
                    }
                }
                if location.distance >= to_distance {
                    continue;
                }
                places.push(VisitPlace {
                    place: location.place.clone(),
                    visited_at: visit.visited_at,
                    mark: visit.mark,
                });
            }
            places
        });

        // Stable: equal timestamps keep their scan order
        places.sort_by_key(|place| place.visited_at);
        places
    }

    /// Average mark at one location over a demographic slice
    ///
    /// Scans all visits at `location_id` within the exclusive date
    /// bounds; each one contributes when its user resolves, passes the
    /// gender filter, and the user's age at `now` passes the exclusive
    /// age bounds. `now` is injected rather than read from the wall
    /// clock so results are reproducible for a fixed dataset.
    ///
    /// Returns `0.0` when nothing qualifies, otherwise the mean mark
    /// rounded to 5 decimal digits (half away from zero).
    pub fn query_average(
        &self,
        location_id: i32,
        filter: &AverageFilter,
        now: DateTime<Utc>,
    ) -> f64 {
        let from_date = filter.from_date.unwrap_or(i64::MIN);
        let to_date = filter.to_date.unwrap_or(i64::MAX);
        let from_age = filter.from_age.unwrap_or(i64::MIN);
        let to_age = filter.to_age.unwrap_or(i64::MAX);

        let (count, sum) = self.read(|view| {
            let mut count = 0i64;
            let mut sum = 0i64;
            for visit in view.visits() {
                if visit.location != location_id {
                    continue;
                }
                if visit.visited_at <= from_date || visit.visited_at >= to_date {
                    continue;
                }
                let user = match view.user(visit.user) {
                    Some(user) => user,
                    None => {
                        warn!(
                            target: "traveldb::query",
                            visit_id = visit.id,
                            user_id = visit.user,
                            "skipping visit with dangling user reference"
                        );
                        continue;
                    }
                };
                if let Some(gender) = filter.gender {
                    if user.gender != gender {
                        continue;
                    }
                }
                let age = match age_at(user.birth_date, now) {
                    Some(age) => age,
                    None => {
                        warn!(
                            target: "traveldb::query",
                            user_id = user.id,
                            birth_date = user.birth_date,
                            "skipping visit, birth date is not a representable datetime"
                        );
                        continue;
                    }
                };
                if age <= from_age || age >= to_age {
                    continue;
                }
                count += 1;
                sum += i64::from(visit.mark);
            }
            (count, sum)
        });

        // Explicit branch: zero qualifying visits is a defined result,
        // not a division by zero
        if count == 0 {
            return 0.0;
        }
        round5(sum as f64 / count as f64)
    }
}

/// Age in whole calendar years at `now`
///
/// `now.year - birth.year`, minus one when the current month/day falls
/// before the birth month/day. No day counting, no leap-year shortcuts.
/// `None` when the birth timestamp is outside chrono's representable
/// range.
fn age_at(birth_date: i64, now: DateTime<Utc>) -> Option<i64> {
    let birth = DateTime::<Utc>::from_timestamp(birth_date, 0)?;
    let mut years = i64::from(now.year()) - i64::from(birth.year());
    if (now.month(), now.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    Some(years)
}

/// Round half away from zero to 5 decimal digits
///
/// `f64::round` rounds halves away from zero, which is the externally
/// observed contract for the average.
fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}
