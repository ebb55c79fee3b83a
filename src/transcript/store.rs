//! Flat-file transcript store

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tokio::sync::{Mutex, MutexGuard};

use super::Turn;
use crate::persona::Persona;
use crate::{Error, Result};

/// Default location of the transcript document, relative to the working directory
pub const DEFAULT_TRANSCRIPT_PATH: &str = "database.json";

/// Append-only dialogue log persisted as a single JSON array
///
/// Every mutation rewrites the whole document through a temp file and rename,
/// so readers never observe a half-written array. Writers are serialized by
/// an internal lock; see [`TranscriptStore::session`].
#[derive(Debug)]
pub struct TranscriptStore {
    path: PathBuf,
    persona: Persona,
    lock: Mutex<()>,
}

impl TranscriptStore {
    /// Create a store backed by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, persona: Persona) -> Self {
        Self {
            path: path.into(),
            persona,
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persona used to seed an empty transcript
    #[must_use]
    pub const fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Acquire exclusive access to the transcript
    ///
    /// The returned session holds the writer lock until dropped, making a
    /// `load` followed by an `append` one critical section.
    pub async fn session(&self) -> TranscriptSession<'_> {
        let guard = self.lock.lock().await;
        TranscriptSession {
            store: self,
            _guard: guard,
        }
    }

    /// Load the transcript
    ///
    /// # Errors
    ///
    /// Returns `StorageCorrupt` if the document is not a JSON array of turns,
    /// or `StorageRead` if it cannot be read
    pub async fn load(&self) -> Result<Vec<Turn>> {
        self.session().await.load()
    }

    /// Append a user turn and an assistant turn
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` on I/O failure, or the load error if the
    /// existing document cannot be read
    pub async fn append(&self, user: &str, assistant: &str) -> Result<()> {
        self.session().await.append(user, assistant)
    }

    fn read(&self) -> Result<Vec<Turn>> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no transcript yet, seeding persona");
                return Ok(vec![self.persona.system_turn()]);
            }
            Err(source) => {
                return Err(Error::StorageRead {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if raw.is_empty() {
            tracing::debug!(path = %self.path.display(), "empty transcript, seeding persona");
            return Ok(vec![self.persona.system_turn()]);
        }

        serde_json::from_slice(&raw).map_err(|source| {
            tracing::error!(path = %self.path.display(), error = %source, "transcript is corrupt");
            Error::StorageCorrupt {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn write(&self, turns: &[Turn]) -> Result<()> {
        let write_err = |source| Error::StorageWrite {
            path: self.path.clone(),
            source,
        };

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let json = serde_json::to_vec(turns)?;
        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        file.write_all(&json).map_err(write_err)?;
        file.as_file().sync_all().map_err(write_err)?;
        file.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %self.path.display(), turns = turns.len(), "transcript saved");
        Ok(())
    }
}

/// Exclusive handle on a [`TranscriptStore`]
pub struct TranscriptSession<'a> {
    store: &'a TranscriptStore,
    _guard: MutexGuard<'a, ()>,
}

impl TranscriptSession<'_> {
    /// Load the transcript
    ///
    /// An absent or empty document yields the persona's system turn alone.
    ///
    /// # Errors
    ///
    /// Returns `StorageCorrupt` or `StorageRead`
    pub fn load(&self) -> Result<Vec<Turn>> {
        self.store.read()
    }

    /// Append a user turn and an assistant turn after everything stored
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` on I/O failure. A corrupt document is reported
    /// and left untouched.
    pub fn append(&self, user: &str, assistant: &str) -> Result<()> {
        let mut turns = self.store.read()?;
        turns.push(Turn::user(user));
        turns.push(Turn::assistant(assistant));
        self.store.write(&turns)
    }
}
