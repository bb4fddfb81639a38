//! Read-only projections over the event set.
//!
//! # Responsibility
//! - Re-derive display state synchronously on every store snapshot.
//! - Own the lifetime of subscriptions and timers attached to a view.
//!
//! # Invariants
//! - Projections never mutate events or store standings independently.
//! - Tearing a view down releases its subscription and stops its timer.

pub mod carousel;
pub mod spark;
pub mod standings;
