//! Read-only inventory of pad store files, for the operator's overview of
//! what key material remains.

use log::warn;
use std::path::Path;

use crate::error::PadError;
use crate::locator;
use crate::store::PadStore;

/// Per-file inventory produced by [`examine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadSummary {
    /// Filename of the pad store (no directory component).
    pub file_name: String,
    /// Store identifier, when the file parsed.
    pub store_id: Option<String>,
    /// Entry count.
    pub total_entries: usize,
    /// Entries still available for encryption.
    pub unconsumed_entries: usize,
    /// Longest message the store's keys can carry, in bytes (taken from the
    /// first entry; all entries of a store share one key length).
    pub max_message_len: usize,
    /// Parse failure, for files that could not be read as a pad store.
    pub error: Option<String>,
}

/// Summarizes every pad store file in `root` (or `root/<scope>`).
///
/// Files are listed in the same lexicographic order the locator scans them
/// in. A file that fails to parse still gets a summary line, carrying the
/// failure text instead of counts. An empty directory yields an empty list.
///
/// # Errors
///
/// Returns [`PadError::DirectoryNotFound`] if the resolved directory does
/// not exist and [`PadError::Persistence`] if it cannot be read.
pub fn examine(root: &Path, scope: Option<&str>) -> Result<Vec<PadSummary>, PadError> {
    let dir = scope.map_or_else(|| root.to_path_buf(), |s| root.join(s));
    if !dir.is_dir() {
        return Err(PadError::DirectoryNotFound { path: dir });
    }

    let mut summaries = Vec::new();
    for name in locator::pad_file_names(&dir)? {
        let path = dir.join(&name);
        match PadStore::load(&path) {
            Ok(store) => summaries.push(PadSummary {
                file_name: name,
                store_id: Some(store.id().to_owned()),
                total_entries: store.len(),
                unconsumed_entries: store.unconsumed(),
                max_message_len: store.entries().next().map_or(0, |(_, e)| e.key_len()),
                error: None,
            }),
            Err(e) => {
                warn!("failed to examine pad file {}: {e}", path.display());
                summaries.push(PadSummary {
                    file_name: name,
                    store_id: None,
                    total_entries: 0,
                    unconsumed_entries: 0,
                    max_message_len: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }
    Ok(summaries)
}
