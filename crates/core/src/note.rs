//! Note entity and its creation payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted note.
///
/// `id` is a server-assigned, monotonically increasing surrogate key; every
/// persisted id is strictly positive. Absence of a note is expressed as
/// `Option<Note>` by callers, never as a zero-value `Note`.
///
/// Timestamps are set once at creation and never mutated afterwards (there
/// is no update path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a note.
///
/// No id and no timestamps; both are assigned downstream (id by the store,
/// timestamps by the command handler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub text: String,
}
