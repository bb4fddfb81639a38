//! Tabular export of event results.
//!
//! # Invariants
//! - One row per winner, events in snapshot order, winners in stored order.
//! - Every CSV field is double-quoted; embedded quotes are doubled.
//! - Unknown houses are exported verbatim.

use crate::model::event::Event;
use serde::Serialize;

const CSV_HEADER: [&str; 6] = [
    "Event Name",
    "Event Date",
    "Winner Position",
    "House",
    "Winner Name",
    "Points",
];

/// One flattened (event, winner) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub event_name: String,
    pub event_date: String,
    pub position: u32,
    pub house: String,
    pub winner_name: String,
    pub points: i64,
}

/// Flattens events into result rows.
pub fn result_rows(events: &[Event]) -> Vec<ResultRow> {
    events
        .iter()
        .flat_map(|event| {
            event.winners.iter().map(move |winner| ResultRow {
                event_name: event.name.clone(),
                event_date: event.date.clone(),
                position: winner.position,
                house: winner.house.clone(),
                winner_name: winner.name.clone(),
                points: winner.points,
            })
        })
        .collect()
}

/// Renders results as CSV with a header row; lines are joined by `\n`.
pub fn to_csv(events: &[Event]) -> String {
    let header = csv_line(CSV_HEADER.iter().map(|field| field.to_string()));
    let rows = result_rows(events).into_iter().map(|row| {
        csv_line([
            row.event_name,
            row.event_date,
            row.position.to_string(),
            row.house,
            row.winner_name,
            row.points.to_string(),
        ])
    });

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

fn csv_line(fields: impl IntoIterator<Item = String>) -> String {
    fields
        .into_iter()
        .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}
