// File:    locator.rs
// Date:    2026-08-24
//
// Description: Finds the oldest eligible unconsumed pad entry across a directory of pad store files.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PadError;
use crate::store::PadStore;

/// Outcome of a successful pad lookup. Transient: recomputed on every call,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorResult {
    /// The pad store file the entry lives in.
    pub store_path: PathBuf,
    /// Index of the chosen entry within that store.
    pub entry_index: u32,
    /// Identifier of the store, for audit messages.
    pub store_id: String,
}

/// Searches `root` (or `root/<scope>`) for the oldest pad file holding an
/// eligible entry and returns the first such `{file, index}` pair.
///
/// Candidate files are matched by name (current `<scope>-<YYYY-MM-DD>.json`
/// and counter-suffixed forms plus legacy `one_time_pad_<digits>.json`) and
/// scanned in lexicographic order, which is chronological order because the
/// names embed a sortable date. Entries are scanned in index order. The scan
/// is deterministic: two runs against unmutated storage pick the same pad,
/// which keeps consumption auditable.
///
/// A candidate that fails to parse is logged and skipped; a single corrupt
/// file never aborts the search.
///
/// # Errors
///
/// Returns [`PadError::DirectoryNotFound`] if the resolved directory does
/// not exist, [`PadError::NoPadFiles`] if no filename matches,
/// [`PadError::Persistence`] if the directory cannot be read, and
/// [`PadError::NoEligiblePad`] if no entry passes the `require_unconsumed`
/// and `min_length` filters (the message distinguishes "all consumed" from
/// "none found at all").
pub fn find(
    root: &Path,
    scope: Option<&str>,
    min_length: Option<usize>,
    require_unconsumed: bool,
) -> Result<LocatorResult, PadError> {
    let dir = scope.map_or_else(|| root.to_path_buf(), |s| root.join(s));
    if !dir.is_dir() {
        return Err(PadError::DirectoryNotFound { path: dir });
    }

    let names = pad_file_names(&dir)?;
    if names.is_empty() {
        return Err(PadError::NoPadFiles { path: dir });
    }
    debug!("{} candidate pad file(s) in {}", names.len(), dir.display());

    let mut entries_seen = 0usize;
    for name in names {
        let path = dir.join(&name);
        let store = match PadStore::load(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!("skipping unreadable pad file {}: {e}", path.display());
                continue;
            }
        };
        if store.is_empty() {
            debug!("skipping {}: no entries", path.display());
            continue;
        }
        entries_seen += store.len();
        if require_unconsumed && store.unconsumed() == 0 {
            debug!("skipping {}: fully consumed", path.display());
            continue;
        }

        for (index, entry) in store.entries() {
            if require_unconsumed && entry.consumed {
                continue;
            }
            if min_length.is_some_and(|min| entry.key_len() < min) {
                continue;
            }
            debug!(
                "selected pad store {} entry {index} at {}",
                store.id(),
                path.display()
            );
            return Ok(LocatorResult {
                store_path: path,
                entry_index: index,
                store_id: store.id().to_owned(),
            });
        }
    }

    Err(PadError::NoEligiblePad {
        message: no_eligible_message(&dir, min_length, require_unconsumed, entries_seen),
    })
}

fn no_eligible_message(
    dir: &Path,
    min_length: Option<usize>,
    require_unconsumed: bool,
    entries_seen: usize,
) -> String {
    let constraint = min_length.map_or_else(String::new, |min| format!(" of at least {min} bytes"));
    if entries_seen == 0 {
        format!("no pad entries{constraint} found in {}", dir.display())
    } else if require_unconsumed {
        format!(
            "no unconsumed pad entry{constraint} available in {} ({entries_seen} entries scanned)",
            dir.display()
        )
    } else {
        format!(
            "no pad entry{constraint} available in {} ({entries_seen} entries scanned)",
            dir.display()
        )
    }
}

/// Lists pad-store filenames in `dir`, sorted lexicographically.
pub(crate) fn pad_file_names(dir: &Path) -> Result<Vec<String>, PadError> {
    let reader = fs::read_dir(dir).map_err(|source| PadError::Persistence {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut names = Vec::new();
    for dir_entry in reader {
        let dir_entry = dir_entry.map_err(|source| PadError::Persistence {
            path: dir.to_path_buf(),
            source,
        })?;
        if let Ok(name) = dir_entry.file_name().into_string() {
            if is_pad_file_name(&name) {
                names.push(name);
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Matches the filename conventions the station has used over time:
/// `<scope>-<YYYY-MM-DD>.json`, `<scope>-<YYYY-MM-DD>-<3-digit-counter>.json`,
/// and the legacy `one_time_pad_<digits>.json`.
fn is_pad_file_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".json") else {
        return false;
    };
    if !stem.is_ascii() {
        return false;
    }
    if let Some(digits) = stem.strip_prefix("one_time_pad_") {
        return !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
    }

    // Peel an optional "-NNN" counter, then require "<scope>-<date>".
    let bytes = stem.as_bytes();
    let body = if bytes.len() > 4
        && bytes[bytes.len() - 4] == b'-'
        && bytes[bytes.len() - 3..].iter().all(u8::is_ascii_digit)
    {
        &stem[..stem.len() - 4]
    } else {
        stem
    };
    let Some(scope_end) = body.len().checked_sub(11) else {
        return false;
    };
    scope_end > 0 && body.as_bytes()[scope_end] == b'-' && is_date(&body[scope_end + 1..])
}

fn is_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && [0, 1, 2, 3, 5, 6, 8, 9]
            .iter()
            .all(|&i| b[i].is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::is_pad_file_name;

    #[test]
    fn recognizes_current_and_legacy_names() {
        assert!(is_pad_file_name("NATASHA-2024-01-02.json"));
        assert!(is_pad_file_name("NATASHA-2024-01-02-001.json"));
        assert!(is_pad_file_name("one_time_pad-2024-01-02.json"));
        assert!(is_pad_file_name("one_time_pad_00042.json"));
    }

    #[test]
    fn rejects_foreign_names() {
        assert!(!is_pad_file_name("notes.txt"));
        assert!(!is_pad_file_name("NATASHA.json"));
        assert!(!is_pad_file_name("-2024-01-02.json"));
        assert!(!is_pad_file_name("NATASHA-2024-1-2.json"));
        assert!(!is_pad_file_name("one_time_pad_.json"));
        assert!(!is_pad_file_name("NATASHA-2024-01-02.json.tmp"));
    }
}
