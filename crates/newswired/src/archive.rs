//! Optional on-disk archive of provider payloads.
//!
//! When an archive directory is configured, every successful list query
//! writes the full records to `<name>_<kind>s_<connection-id>.json`. Archive
//! failures are reported to the caller for logging and never affect the
//! client response.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use newswire_protocol::ResultKind;

use crate::session::Session;

/// Errors raised while persisting an archive entry.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to write archive file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode archive payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Writes raw list-query results beneath a fixed directory.
#[derive(Debug, Clone)]
pub struct Archive {
    root: PathBuf,
}

impl Archive {
    /// Creates an archive rooted at the given directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Persists the full records for one list query.
    ///
    /// # Errors
    ///
    /// Returns an [`ArchiveError`] when the directory cannot be created or
    /// the file cannot be written.
    pub fn store<T: Serialize>(
        &self,
        session: &Session,
        kind: ResultKind,
        records: &[T],
    ) -> Result<PathBuf, ArchiveError> {
        let file_name = format!(
            "{}_{kind}s_{}.json",
            sanitise(session.display_name()),
            session.connection_id()
        );
        let path = self.root.join(file_name);
        let payload = serde_json::to_vec_pretty(records)?;
        write_file(&self.root, &path, &payload)?;
        Ok(path)
    }
}

fn write_file(root: &Path, path: &Path, payload: &[u8]) -> Result<(), ArchiveError> {
    let wrap = |source: io::Error| ArchiveError::Write {
        path: path.to_path_buf(),
        source,
    };
    fs::create_dir_all(root).map_err(wrap)?;
    fs::write(path, payload).map_err(wrap)
}

/// Restricts archive file names to a safe character set.
fn sanitise(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "client".to_owned()
    } else {
        cleaned
    }
}
