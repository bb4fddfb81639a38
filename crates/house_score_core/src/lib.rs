//! Core scoring logic for the inter-house competition dashboard.
//! This crate is the single source of truth for scoring invariants.

pub mod auth;
pub mod config;
pub mod db;
pub mod export;
pub mod feed;
pub mod logging;
pub mod model;
pub mod photo;
pub mod sample;
pub mod scoring;
pub mod service;
pub mod store;
pub mod view;

pub use auth::{AdminGate, AdminSession, AuthError, Credentials, IdentityVerifier, StaticAdminIdentity};
pub use config::{ConfigError, DashboardConfig, HouseConfig};
pub use export::{result_rows, to_csv, ResultRow};
pub use feed::{EventFeed, FeedMode};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::event::{
    Category, Event, EventDraft, EventId, EventInput, GradeLevel, ValidationError, Winner,
};
pub use sample::sample_events;
pub use scoring::{aggregate, event_stats, EventStats, HouseStanding, Standings};
pub use service::admin_service::{AdminAction, AdminError, AdminService};
pub use store::{
    EventStore, MemoryEventStore, SnapshotListener, SqliteEventStore, StoreAccess, StoreError,
    StoreResult, Subscription,
};
pub use view::carousel::{AutoAdvance, EventCarousel, EventSlide};
pub use view::spark::SparkView;
pub use view::standings::StandingsProjection;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
