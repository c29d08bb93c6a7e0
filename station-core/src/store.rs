// File:    store.rs
// Date:    2026-08-24
//
// Description: Durable representation of a pad store file: key material, consumption flags, and the JSON wire format.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::PadError;

/// One fixed-length random key plus its consumption state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadEntry {
    /// Raw key material. Its length is fixed at generation time.
    pub key: Vec<u8>,
    /// Whether this entry has been used for an encryption.
    pub consumed: bool,
    /// When the entry was consumed, if it has been.
    pub consumed_at: Option<DateTime<Utc>>,
}

impl PadEntry {
    pub(crate) const fn fresh(key: Vec<u8>) -> Self {
        Self {
            key,
            consumed: false,
            consumed_at: None,
        }
    }

    /// Key length in bytes (half the hex length on the wire).
    #[must_use]
    pub const fn key_len(&self) -> usize {
        self.key.len()
    }
}

/// An ordered collection of pad entries backed by a single JSON file.
///
/// The file on stable storage is the sole source of truth: every read
/// re-parses it and every consume-mutation rewrites it in full. At most one
/// writer at a time is assumed; two processes saving the same file
/// concurrently is a documented race (last writer wins).
#[derive(Debug, Clone)]
pub struct PadStore {
    id: String,
    entries: BTreeMap<u32, PadEntry>,
}

impl PadStore {
    pub(crate) const fn from_parts(id: String, entries: BTreeMap<u32, PadEntry>) -> Self {
        Self { id, entries }
    }

    /// The store identifier, generated once at creation and never mutated.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of entries in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries not yet consumed.
    #[must_use]
    pub fn unconsumed(&self) -> usize {
        self.entries.values().filter(|e| !e.consumed).count()
    }

    /// Looks up a single entry by index.
    #[must_use]
    pub fn entry(&self, index: u32) -> Option<&PadEntry> {
        self.entries.get(&index)
    }

    /// Iterates entries in ascending index order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &PadEntry)> {
        self.entries.iter().map(|(i, e)| (*i, e))
    }

    /// Parses a pad store file from disk, normalizing both the current
    /// entry-object schema and the legacy bare-hex-string schema into the one
    /// canonical in-memory shape.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Persistence`] if the file cannot be read and
    /// [`PadError::MalformedStore`] if the bytes do not deserialize into the
    /// expected shape (missing `id`, missing `pads`, non-numeric index,
    /// non-hex key material).
    pub fn load(path: &Path) -> Result<Self, PadError> {
        let raw = fs::read_to_string(path).map_err(|source| PadError::Persistence {
            path: path.to_path_buf(),
            source,
        })?;
        let wire: WireStore = serde_json::from_str(&raw).map_err(|e| malformed(path, e.to_string()))?;

        let mut entries = BTreeMap::new();
        for (index_text, wire_entry) in wire.pads {
            let index: u32 = index_text
                .parse()
                .map_err(|_| malformed(path, format!("non-numeric pad index '{index_text}'")))?;
            entries.insert(index, wire_entry.normalize(path, index)?);
        }

        Ok(Self {
            id: wire.id.into_text(),
            entries,
        })
    }

    /// Serializes the full store and rewrites the file at `path`.
    ///
    /// The write goes through a temporary sibling followed by a rename, so a
    /// crash mid-write cannot leave a truncated store behind.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Persistence`] if the write or rename fails. The
    /// caller must then treat the on-disk state as unknown and must not
    /// report the mutation as having taken effect.
    pub fn save(&self, path: &Path) -> Result<(), PadError> {
        let wire = WireStoreOut {
            id: &self.id,
            pads: self
                .entries
                .iter()
                .map(|(i, e)| {
                    (
                        i.to_string(),
                        WireEntryOut {
                            key: hex::encode(&e.key),
                            epoch_date: e.consumed_at.map(|t| t.timestamp()),
                            consumed: e.consumed,
                        },
                    )
                })
                .collect(),
        };
        let body = serde_json::to_string(&wire).map_err(|e| PadError::Persistence {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|source| PadError::Persistence {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| PadError::Persistence {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Flips one entry to consumed and stamps `now`, returning a snapshot of
    /// the entry as it was before the mutation. The caller is responsible
    /// for persisting the change with [`PadStore::save`].
    ///
    /// # Errors
    ///
    /// Returns [`PadError::AlreadyConsumed`] (with the recorded consumption
    /// time) if the entry was consumed by a prior encryption; this is the
    /// single-use guarantee, not a silent overwrite. Returns
    /// [`PadError::NoEligiblePad`] if no entry exists at `index`.
    pub fn mark_consumed(
        &mut self,
        index: u32,
        now: DateTime<Utc>,
    ) -> Result<PadEntry, PadError> {
        let id = self.id.clone();
        let entry = self
            .entries
            .get_mut(&index)
            .ok_or_else(|| PadError::NoEligiblePad {
                message: format!("pad store {id} has no entry at index {index}"),
            })?;
        if entry.consumed {
            return Err(PadError::AlreadyConsumed {
                index,
                consumed_at: entry.consumed_at,
            });
        }
        let previous = entry.clone();
        entry.consumed = true;
        entry.consumed_at = Some(now);
        Ok(previous)
    }
}

fn malformed(path: &Path, reason: String) -> PadError {
    PadError::MalformedStore {
        path: path.to_path_buf(),
        reason,
    }
}

// Wire format: { "id": "...", "pads": { "<index>": { "key": "<hex>",
// "epoch_date": <secs|null>, "consumed": <bool> }, ... } }. Legacy stores
// carried a bare hex string per index and a numeric id.

#[derive(Deserialize)]
struct WireStore {
    id: WireId,
    pads: BTreeMap<String, WireEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(i64),
}

impl WireId {
    fn into_text(self) -> String {
        match self {
            Self::Text(t) => t,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireEntry {
    Entry {
        key: String,
        #[serde(default)]
        epoch_date: Option<i64>,
        consumed: bool,
    },
    LegacyKey(String),
}

impl WireEntry {
    fn normalize(self, path: &Path, index: u32) -> Result<PadEntry, PadError> {
        let (key_hex, epoch_date, consumed) = match self {
            Self::Entry {
                key,
                epoch_date,
                consumed,
            } => (key, epoch_date, consumed),
            Self::LegacyKey(key) => (key, None, false),
        };
        let key = hex::decode(&key_hex)
            .map_err(|e| malformed(path, format!("non-hex key material at index {index}: {e}")))?;
        let consumed_at = match epoch_date {
            None => None,
            Some(secs) => Some(
                Utc.timestamp_opt(secs, 0)
                    .single()
                    .ok_or_else(|| malformed(path, format!("invalid epoch_date at index {index}")))?,
            ),
        };
        Ok(PadEntry {
            key,
            consumed,
            consumed_at,
        })
    }
}

#[derive(Serialize)]
struct WireStoreOut<'a> {
    id: &'a str,
    pads: BTreeMap<String, WireEntryOut>,
}

#[derive(Serialize)]
struct WireEntryOut {
    key: String,
    epoch_date: Option<i64>,
    consumed: bool,
}
