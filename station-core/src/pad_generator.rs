// File:    pad_generator.rs
// Date:    2026-08-24
//
// Description: Creates new pad stores filled with cryptographically strong random key material.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use chrono::{DateTime, Utc};
use log::debug;
use rand::{TryRngCore, rngs::OsRng};
use std::collections::BTreeMap;
use std::fs;
use std::num::{NonZeroU32, NonZeroUsize};
use std::path::{Path, PathBuf};

use crate::error::PadError;
use crate::store::{PadEntry, PadStore};

/// Filename stem used when no recipient scope is given.
pub const UNSCOPED_BASENAME: &str = "one_time_pad";

/// Ceiling for the numeric disambiguation suffix on same-day filenames.
pub const COLLISION_LIMIT: u32 = 999;

/// Generates a new pad store and writes it below `root`.
///
/// The store holds `count` entries, each with `length` bytes of key material
/// from the operating system's CSPRNG. `length` is rounded up to the nearest
/// multiple of 5, a formatting convenience for manual-cipher print layouts.
/// When `scope` is given the file is placed in `root/<scope>/` (created if
/// missing); otherwise it lands directly in `root`.
///
/// The filename embeds the calendar date of `now`
/// (`<scope>-<YYYY-MM-DD>.json`), with a 3-digit counter suffix when that
/// name is already taken. An existing file is never overwritten.
///
/// # Errors
///
/// Returns [`PadError::Persistence`] if the target directory cannot be
/// created or the store cannot be written, and
/// [`PadError::TooManyCollisions`] if all [`COLLISION_LIMIT`] counter
/// suffixes for the day are taken.
pub fn generate(
    root: &Path,
    scope: Option<&str>,
    count: NonZeroU32,
    length: NonZeroUsize,
    now: DateTime<Utc>,
) -> Result<(PadStore, PathBuf), PadError> {
    let dir = scope.map_or_else(|| root.to_path_buf(), |s| root.join(s));
    fs::create_dir_all(&dir).map_err(|source| PadError::Persistence {
        path: dir.clone(),
        source,
    })?;

    let key_len = round_up_to_multiple_of_5(length.get());
    debug!(
        "generating {count} pad entries of {key_len} bytes under {}",
        dir.display()
    );

    let mut entries = BTreeMap::new();
    for index in 0..count.get() {
        entries.insert(index, PadEntry::fresh(random_bytes(key_len, &dir)?));
    }
    let store = PadStore::from_parts(new_store_id(now, &dir)?, entries);

    let path = free_file_path(&dir, scope, now)?;
    store.save(&path)?;
    debug!("created pad store {} at {}", store.id(), path.display());
    Ok((store, path))
}

/// Rounds up so hand-copied keys line up in blocks of five.
const fn round_up_to_multiple_of_5(n: usize) -> usize {
    n.div_ceil(5) * 5
}

fn random_bytes(len: usize, dir: &Path) -> Result<Vec<u8>, PadError> {
    let mut buffer = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut buffer)
        .map_err(|e| PadError::Persistence {
            path: dir.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
    Ok(buffer)
}

/// Store ids are `<epoch-seconds>-<4-digit-random>`: unique in practice
/// without coordinating with other stores.
fn new_store_id(now: DateTime<Utc>, dir: &Path) -> Result<String, PadError> {
    let nonce = OsRng.try_next_u32().map_err(|e| PadError::Persistence {
        path: dir.to_path_buf(),
        source: std::io::Error::other(e),
    })?;
    Ok(format!("{}-{}", now.timestamp(), 1000 + nonce % 9000))
}

fn free_file_path(
    dir: &Path,
    scope: Option<&str>,
    now: DateTime<Utc>,
) -> Result<PathBuf, PadError> {
    let base = format!(
        "{}-{}",
        scope.unwrap_or(UNSCOPED_BASENAME),
        now.format("%Y-%m-%d")
    );
    let first = dir.join(format!("{base}.json"));
    if !first.exists() {
        return Ok(first);
    }
    for counter in 1..=COLLISION_LIMIT {
        let candidate = dir.join(format!("{base}-{counter:03}.json"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(PadError::TooManyCollisions {
        prefix: base,
        limit: COLLISION_LIMIT,
    })
}
