//! Admin mutation facade.
//!
//! # Responsibility
//! - Validate admin input before any store call.
//! - Forward create/replace/remove to the injected `EventStore`.
//!
//! # Invariants
//! - Validation failures never reach the store.
//! - No local state is updated optimistically; subscribers observe the
//!   authoritative snapshot the store broadcasts after each mutation.
//! - Updates replace the whole record, including the winners list.
//! - Authorization is the host's concern; this facade does not check it.

use crate::model::event::{Event, EventDraft, EventId, ValidationError, Winner};
use crate::scoring::{event_stats, EventStats};
use crate::store::{EventStore, StoreError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Mutation that failed in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Add,
    Update,
    SaveResults,
    Delete,
    ReadStats,
}

impl AdminAction {
    fn describe(self) -> &'static str {
        match self {
            Self::Add => "add event",
            Self::Update => "update event",
            Self::SaveResults => "save results",
            Self::Delete => "delete event",
            Self::ReadStats => "read event stats",
        }
    }
}

#[derive(Debug)]
pub enum AdminError {
    Validation(ValidationError),
    Store {
        action: AdminAction,
        source: StoreError,
    },
}

impl AdminError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Display for AdminError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store { action, source } => {
                write!(f, "failed to {}: {source}", action.describe())
            }
        }
    }
}

impl Error for AdminError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store { source, .. } => Some(source),
        }
    }
}

impl From<ValidationError> for AdminError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Validated write surface over an event store.
pub struct AdminService<S: EventStore> {
    store: S,
}

impl<S: EventStore> AdminService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and creates a new event.
    pub fn add_event(&self, draft: EventDraft) -> Result<EventId, AdminError> {
        let input = draft.into_input()?;
        let id = self
            .store
            .create(&input)
            .map_err(|err| store_failure(AdminAction::Add, err))?;
        info!("event=admin_add_event module=service status=ok id={id}");
        Ok(id)
    }

    /// Validates and replaces a whole event record.
    pub fn update_event(&self, event: &Event) -> Result<(), AdminError> {
        self.replace_validated(event, AdminAction::Update)
    }

    /// Replaces the winners of `event` with `winners`.
    pub fn set_results(&self, event: &Event, winners: Vec<Winner>) -> Result<(), AdminError> {
        let updated = Event {
            winners,
            ..event.clone()
        };
        self.replace_validated(&updated, AdminAction::SaveResults)
    }

    /// Deletes an event. Confirmation is the caller's responsibility.
    pub fn delete_event(&self, id: &EventId) -> Result<(), AdminError> {
        self.store
            .remove(id)
            .map_err(|err| store_failure(AdminAction::Delete, err))?;
        info!("event=admin_delete_event module=service status=ok id={id}");
        Ok(())
    }

    /// Counts events and awards in the current store snapshot.
    pub fn stats(&self) -> Result<EventStats, AdminError> {
        let events = self
            .store
            .snapshot()
            .map_err(|err| store_failure(AdminAction::ReadStats, err))?;
        Ok(event_stats(&events))
    }

    fn replace_validated(&self, event: &Event, action: AdminAction) -> Result<(), AdminError> {
        event.validate()?;
        self.store
            .replace(event)
            .map_err(|err| store_failure(action, err))?;
        info!(
            "event=admin_replace_event module=service status=ok action={action:?} id={}",
            event.id
        );
        Ok(())
    }
}

fn store_failure(action: AdminAction, source: StoreError) -> AdminError {
    error!(
        "event=admin_mutation module=service status=error action={action:?} error={source}"
    );
    AdminError::Store { action, source }
}
