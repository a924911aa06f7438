//! Sources of raw alert messages

use crate::error::{Result, ScrapeError};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One undecoded message as delivered by the mailbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub uid: u32,
    pub bytes: Vec<u8>,
}

/// Anything that can hand over the messages received since a point in time
pub trait Mailbox {
    /// Fetch every message received at or after `since`.
    ///
    /// An error here aborts the whole run.
    fn fetch_since(&mut self, since: DateTime<Utc>) -> Result<Vec<RawMessage>>;
}

/// Mailbox backed by a directory of `.eml` files, e.g. an exported folder
/// or the `cur/` directory of a maildir with renamed files.
#[derive(Debug, Clone)]
pub struct DirectoryMailbox {
    root: PathBuf,
}

impl DirectoryMailbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn received_at(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

impl Mailbox for DirectoryMailbox {
    fn fetch_since(&mut self, since: DateTime<Utc>) -> Result<Vec<RawMessage>> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            ScrapeError::Mailbox(format!("cannot open {}: {e}", self.root.display()))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("eml"))
            })
            .filter(|path| received_at(path).is_some_and(|at| at >= since))
            .collect();
        paths.sort();

        Ok(read_messages(paths))
    }
}

/// Read each file in order, numbering from 1. Unreadable files are skipped
/// and keep their number, so uids stay tied to the listing order.
fn read_messages(paths: Vec<PathBuf>) -> Vec<RawMessage> {
    let mut messages = Vec::with_capacity(paths.len());
    for (uid, path) in (1u32..).zip(paths) {
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping unreadable message {}: {e}", path.display());
                continue;
            }
        };
        debug!("Fetched #{uid} from {}", path.display());
        messages.push(RawMessage { uid, bytes });
    }
    messages
}
