//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validated store mutations into use-case level APIs.
//! - Keep host layers decoupled from store adapters.

pub mod admin_service;
