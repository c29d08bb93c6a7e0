//! Failure taxonomy for the pad lifecycle engine.
//!
//! Every fallible operation in this crate returns one of these kinds. Each
//! variant carries enough context (path, index, lengths) for a caller to
//! print a distinct, self-explanatory message.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by pad generation, lookup, and cipher operations.
#[derive(Debug, Error)]
pub enum PadError {
    /// The resolved pad directory does not exist.
    #[error("pad directory does not exist: {}", .path.display())]
    DirectoryNotFound {
        /// The directory that was searched for.
        path: PathBuf,
    },

    /// The pad directory exists but contains no recognizable pad files.
    #[error("no pad files found in {}", .path.display())]
    NoPadFiles {
        /// The directory that was scanned.
        path: PathBuf,
    },

    /// Pad files were found but none satisfied the lookup constraints.
    ///
    /// The message distinguishes "all entries consumed" from "no entries at
    /// all"; the kind is the same either way.
    #[error("{message}")]
    NoEligiblePad {
        /// Human-readable description of what was searched and why it failed.
        message: String,
    },

    /// A pad store file did not deserialize into the expected shape.
    #[error("malformed pad store {}: {reason}", .path.display())]
    MalformedStore {
        /// The file that failed to parse.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// The message is longer than the selected pad entry's key.
    #[error("message length {message_len} exceeds pad key length {key_len}")]
    MessageTooLong {
        /// Length of the message in bytes.
        message_len: usize,
        /// Length of the pad key in bytes.
        key_len: usize,
    },

    /// The selected pad entry has already been consumed by a prior encryption.
    #[error("pad entry {index} was already consumed{}", .consumed_at.map_or_else(String::new, |t| format!(" at {t}")))]
    AlreadyConsumed {
        /// Index of the entry within its store.
        index: u32,
        /// When the entry was consumed, if the store recorded it.
        consumed_at: Option<DateTime<Utc>>,
    },

    /// Reading or writing a pad store on stable storage failed.
    ///
    /// After a failed save the on-disk state must be treated as unknown;
    /// callers must not report the mutation as having taken effect.
    #[error("pad store i/o failed at {}: {source}", .path.display())]
    Persistence {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The date-based filename counter was exhausted without finding a free name.
    #[error("too many pad files sharing the prefix '{prefix}' (limit {limit})")]
    TooManyCollisions {
        /// The filename prefix that kept colliding.
        prefix: String,
        /// The counter ceiling that was reached.
        limit: u32,
    },

    /// Hex text supplied from outside the store could not be decoded.
    #[error("invalid hex in {context}: {source}")]
    InvalidHex {
        /// Which input failed to decode (e.g. "ciphertext").
        context: &'static str,
        /// The underlying decode failure.
        #[source]
        source: hex::FromHexError,
    },
}
