use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::models::Note;

/// Errors surfaced by the note store. I/O and serialization failures are
/// propagated to callers; a corrupt store file is not an error (see [`NoteStore::open`]).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write note store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize note store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// JSON-file-backed note store.
///
/// The whole store lives in memory behind a lock and is mirrored to disk as a
/// pretty-printed JSON array of notes. Writes go through a `<path>.tmp` +
/// rename so the on-disk file is always a complete document.
pub struct NoteStore {
    path: PathBuf,
    notes: RwLock<HashMap<String, Note>>,
}

impl NoteStore {
    /// Open the store, loading `path` if it exists.
    ///
    /// A missing file yields an empty store. A corrupt or unreadable file also
    /// yields an empty store but leaves the file untouched on disk; it is only
    /// replaced by the next successful write.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let notes = match Self::load(&path) {
            Ok(notes) => notes,
            Err(e) => {
                tracing::warn!(
                    "note store at {} could not be loaded ({}); starting empty",
                    path.display(),
                    e
                );
                HashMap::new()
            }
        };
        NoteStore {
            path,
            notes: RwLock::new(notes),
        }
    }

    fn load(path: &Path) -> anyhow::Result<HashMap<String, Note>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let text = std::fs::read_to_string(path)?;
        let notes: Vec<Note> = serde_json::from_str(&text)?;
        Ok(notes.into_iter().map(|n| (n.id.clone(), n)).collect())
    }

    /// Serialize the map and atomically replace the store file.
    fn persist(&self, notes: &HashMap<String, Note>) -> Result<(), StoreError> {
        let mut all: Vec<&Note> = notes.values().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let json = serde_json::to_string_pretty(&all)?;

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Insert a new note and persist before returning it.
    pub fn add(&self, title: &str, body: &str) -> Result<Note, StoreError> {
        let note = Note::new(title, body);
        let mut notes = self.notes.write().expect("note store lock poisoned");
        notes.insert(note.id.clone(), note.clone());
        self.persist(&notes)?;
        Ok(note)
    }

    /// Summaries of every note, most recently updated first.
    pub fn list(&self) -> Vec<crate::models::NoteSummary> {
        let notes = self.notes.read().expect("note store lock poisoned");
        let mut all: Vec<_> = notes.values().map(Note::summary).collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        all
    }

    /// Full notes for the given ids (request order, unknown ids skipped),
    /// or every note (most recently updated first) when `ids` is `None`.
    pub fn get_many(&self, ids: Option<&[String]>) -> Vec<Note> {
        let notes = self.notes.read().expect("note store lock poisoned");
        match ids {
            Some(ids) => ids.iter().filter_map(|id| notes.get(id).cloned()).collect(),
            None => {
                let mut all: Vec<_> = notes.values().cloned().collect();
                all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
                all
            }
        }
    }

    pub fn len(&self) -> usize {
        self.notes.read().expect("note store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
