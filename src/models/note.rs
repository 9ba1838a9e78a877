use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp format used on the wire and in the store file.
/// Fixed-width UTC with microseconds, so lexicographic order is chronological order.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// A stored note. All fields are strings; timestamps use [`TIMESTAMP_FORMAT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The body-less projection returned by `list_notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Note {
    /// Create a note with a fresh UUIDv4 id and identical created/updated timestamps.
    /// The title is trimmed; the body is stored verbatim.
    pub fn new(title: &str, body: &str) -> Self {
        let now = now_utc();
        Note {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            body: body.to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn summary(&self) -> NoteSummary {
        NoteSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

/// Current UTC time in the store's wire format.
pub fn now_utc() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}
