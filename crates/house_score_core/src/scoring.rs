//! House score aggregation.
//!
//! # Responsibility
//! - Derive per-house totals and ranks from the full event set.
//! - Provide admin-facing counters and default point tables.
//!
//! # Invariants
//! - Standings are a pure function of `(events, known_houses)`.
//! - Only winners whose house is in `known_houses` contribute; unknown houses
//!   never produce a standing of their own.
//! - Equal scores keep `known_houses` declaration order (stable sort).
//! - Sum of all standing scores equals the sum of recognized winner points.
//! - Totals saturate at the `i64` bounds; aggregation never panics.

use crate::model::event::{Category, Event, Winner};
use serde::Serialize;

/// Derived rank and score for one house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HouseStanding {
    pub house: String,
    pub score: i64,
    /// 1-based position after sorting.
    pub rank: u32,
}

/// Aggregates winner points per known house and ranks houses by score.
///
/// Duplicate names in `known_houses` collapse to their first occurrence.
pub fn aggregate<H: AsRef<str>>(events: &[Event], known_houses: &[H]) -> Vec<HouseStanding> {
    let mut totals: Vec<(&str, i64)> = Vec::with_capacity(known_houses.len());
    for house in known_houses {
        let house = house.as_ref();
        if !totals.iter().any(|(name, _)| *name == house) {
            totals.push((house, 0));
        }
    }

    for winner in events.iter().flat_map(|event| event.winners.iter()) {
        if let Some((_, score)) = totals.iter_mut().find(|(name, _)| *name == winner.house) {
            *score = score.saturating_add(winner.points);
        }
    }

    // `sort_by` is stable, so ties keep declaration order.
    totals.sort_by(|(_, left), (_, right)| right.cmp(left));

    totals
        .into_iter()
        .zip(1u32..)
        .map(|((house, score), rank)| HouseStanding {
            house: house.to_string(),
            score,
            rank,
        })
        .collect()
}

/// Ranked standings plus display helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Standings {
    pub entries: Vec<HouseStanding>,
    /// Highest score, floored at 1 so it can scale progress bars.
    pub max_score: i64,
    pub total_points: i64,
}

impl Standings {
    pub fn from_events<H: AsRef<str>>(events: &[Event], known_houses: &[H]) -> Self {
        let entries = aggregate(events, known_houses);
        let max_score = entries.iter().map(|entry| entry.score).max().unwrap_or(0).max(1);
        let total_points = entries
            .iter()
            .fold(0i64, |total, entry| total.saturating_add(entry.score));
        Self {
            entries,
            max_score,
            total_points,
        }
    }

    /// First-ranked house, if any houses are configured.
    pub fn leader(&self) -> Option<&HouseStanding> {
        self.entries.first()
    }

    pub fn get(&self, house: &str) -> Option<&HouseStanding> {
        self.entries.iter().find(|entry| entry.house == house)
    }
}

/// Admin dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventStats {
    pub total_events: usize,
    /// Number of recorded placements across all events.
    pub total_awards: usize,
}

pub fn event_stats(events: &[Event]) -> EventStats {
    EventStats {
        total_events: events.len(),
        total_awards: events.iter().map(|event| event.winners.len()).sum(),
    }
}

/// Default points for 1st/2nd/3rd place.
pub fn default_points(category: Option<Category>) -> [i64; 3] {
    match category {
        Some(Category::Group) => [20, 15, 10],
        Some(Category::Individual) | None => [10, 7, 5],
    }
}

/// Three blank podium slots pre-filled with default points.
pub fn default_winner_slots(category: Option<Category>) -> Vec<Winner> {
    default_points(category)
        .into_iter()
        .zip(1u32..)
        .map(|(points, position)| Winner::new(position, "", "", points))
        .collect()
}
