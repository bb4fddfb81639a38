//! Event and winner records.
//!
//! # Responsibility
//! - Define `Event`, `EventInput`, `EventDraft` and embedded `Winner`.
//! - Validate draft input before it is allowed near a store.
//!
//! # Invariants
//! - `name` is never blank and `date` is always present on stored events.
//! - Winner `position` is 1-based; `0` is rejected by validation.
//! - Serialized keys are camelCase (`gradeLevel`) to match the document shape.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque event identifier assigned by the store on creation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Wraps an identifier that already exists in a store.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh identifier for a newly created document.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether an event is contested by individuals or by teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Individual,
    Group,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Group => "Group",
        }
    }
}

/// School section an event is held for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeLevel {
    Junior,
    Middle,
    Senior,
}

impl GradeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::Middle => "Middle",
            Self::Senior => "Senior",
        }
    }
}

/// One ranked placement within an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    /// Rank within the event, 1 = first place.
    pub position: u32,
    /// House name; only known houses are counted in standings.
    pub house: String,
    /// Individual or team display name.
    pub name: String,
    /// Points added to the owning house total.
    pub points: i64,
    /// Inline `data:` URI or URL. Omitted from documents when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Winner {
    pub fn new(
        position: u32,
        house: impl Into<String>,
        name: impl Into<String>,
        points: i64,
    ) -> Self {
        Self {
            position,
            house: house.into(),
            name: name.into(),
            points,
            photo: None,
        }
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }
}

/// Event document without a store-assigned identifier.
///
/// This is the exact shape persisted by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub name: String,
    /// ISO date string (`YYYY-MM-DD`).
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<GradeLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default)]
    pub winners: Vec<Winner>,
}

impl EventInput {
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            description: None,
            category: None,
            grade_level: None,
            venue: None,
            winners: Vec::new(),
        }
    }

    /// Attaches a store-assigned identifier.
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            name: self.name,
            date: self.date,
            description: self.description,
            category: self.category,
            grade_level: self.grade_level,
            venue: self.venue,
            winners: self.winners,
        }
    }
}

/// A stored competition event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<GradeLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default)]
    pub winners: Vec<Winner>,
}

impl Event {
    /// Returns the document body without the identifier.
    pub fn to_input(&self) -> EventInput {
        EventInput {
            name: self.name.clone(),
            date: self.date.clone(),
            description: self.description.clone(),
            category: self.category,
            grade_level: self.grade_level,
            venue: self.venue.clone(),
            winners: self.winners.clone(),
        }
    }

    /// Validates a full record before it replaces a stored one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_header(&self.name, Some(self.date.as_str()))?;
        validate_winners(&self.winners)
    }
}

/// Admin form input; `date` may still be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub grade_level: Option<GradeLevel>,
    pub venue: Option<String>,
    pub winners: Vec<Winner>,
}

impl EventDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn on(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Validates the draft and converts it into a storable document.
    ///
    /// # Errors
    /// - `BlankName` when `name` is empty or whitespace.
    /// - `MissingDate` when `date` is absent or blank.
    /// - `InvalidWinnerPosition` when a winner has position `0`.
    pub fn into_input(self) -> Result<EventInput, ValidationError> {
        validate_header(&self.name, self.date.as_deref())?;
        validate_winners(&self.winners)?;

        Ok(EventInput {
            name: self.name,
            date: self.date.unwrap_or_default(),
            description: self.description,
            category: self.category,
            grade_level: self.grade_level,
            venue: self.venue,
            winners: self.winners,
        })
    }
}

/// Local pre-flight rejection of malformed event input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    BlankName,
    MissingDate,
    InvalidWinnerPosition { index: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "event name is required"),
            Self::MissingDate => write!(f, "event date is required"),
            Self::InvalidWinnerPosition { index } => {
                write!(f, "winner #{} must have a position of at least 1", index + 1)
            }
        }
    }
}

impl Error for ValidationError {}

fn validate_header(name: &str, date: Option<&str>) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::BlankName);
    }
    match date {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::MissingDate),
    }
}

fn validate_winners(winners: &[Winner]) -> Result<(), ValidationError> {
    match winners.iter().position(|winner| winner.position == 0) {
        Some(index) => Err(ValidationError::InvalidWinnerPosition { index }),
        None => Ok(()),
    }
}
