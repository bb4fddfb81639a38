//! Domain model for competition events and their winners.
//!
//! # Responsibility
//! - Define the persisted event document shape shared by every view.
//! - Provide pre-flight validation for admin-authored input.
//!
//! # Invariants
//! - An event exclusively owns its winners; updates replace the whole list.
//! - Absent optional fields are omitted from serialized documents.

pub mod event;
