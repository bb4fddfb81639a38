//! Winner photo references.
//!
//! # Responsibility
//! - Classify stored photo references (inline data vs remote URL).
//! - Derive stable object-storage paths for uploaded winner photos.
//!
//! # Invariants
//! - A missing or blank reference always renders as `PLACEHOLDER_PHOTO`.
//! - Generated paths contain only `[A-Za-z0-9_]` in the winner-name segment.

use once_cell::sync::Lazy;
use regex::Regex;

/// Image shown when a winner has no photo.
pub const PLACEHOLDER_PHOTO: &str = "/placeholder.svg";

static NON_ALPHANUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("valid sanitize regex"));

/// Parsed form of a stored photo reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoRef<'a> {
    /// `data:<mime>;base64,<payload>` embedded in the document.
    Inline { mime: &'a str, payload: &'a str },
    /// Remote or relative URL.
    Url(&'a str),
}

impl<'a> PhotoRef<'a> {
    /// Classifies a stored reference; `None` for blank values.
    pub fn classify(value: &'a str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if let Some(rest) = value.strip_prefix("data:") {
            if let Some((header, payload)) = rest.split_once(',') {
                let mime = header.split(';').next().unwrap_or_default();
                return Some(Self::Inline { mime, payload });
            }
        }
        Some(Self::Url(value))
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }
}

/// Returns the reference to render, falling back to the placeholder.
pub fn photo_or_placeholder(photo: Option<&str>) -> &str {
    match photo {
        Some(value) if !value.trim().is_empty() => value,
        _ => PLACEHOLDER_PHOTO,
    }
}

/// Storage path for an uploaded winner photo:
/// `winners/{event_id}/{position}_{sanitized_name}_{timestamp_ms}.jpg`.
pub fn photo_storage_path(
    event_id: &str,
    winner_name: &str,
    position: u32,
    timestamp_ms: i64,
) -> String {
    let sanitized = NON_ALPHANUMERIC_RE.replace_all(winner_name, "_");
    format!("winners/{event_id}/{position}_{sanitized}_{timestamp_ms}.jpg")
}
