// File:    crypto.rs
// Date:    2026-08-24
//
// Description: XOR cipher engine: pad-based encryption with consumption tracking, and decryption of grouped-hex transmissions.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use chrono::{DateTime, Utc};
use log::debug;
use std::path::Path;

use crate::error::PadError;
use crate::store::PadStore;

/// Hex characters per cluster in transcription output.
pub const HEX_GROUP: usize = 5;

/// Performs a simple XOR operation between two byte slices.
///
/// # Panics
///
/// Panics if the slices are not of equal length.
#[must_use]
pub fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    assert_eq!(
        a.len(),
        b.len(),
        "Input slices must have the same length for XOR operation."
    );
    a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect()
}

/// Encrypts `plaintext` against one pad entry and records its consumption.
///
/// The entry is marked consumed and the store is rewritten at `store_path`
/// *before* any ciphertext is returned, so a successful result implies the
/// single-use flag is durably on disk. A shorter-than-key message is fine;
/// the unused tail of the key is never referenced again because the entry is
/// consumed as a whole.
///
/// The ciphertext is returned as lowercase hex in clusters of
/// [`HEX_GROUP`] characters for transcription; [`decrypt`] strips the
/// grouping whitespace before decoding.
///
/// # Errors
///
/// Returns [`PadError::MessageTooLong`] if the plaintext outruns the key
/// (the store is left untouched), [`PadError::AlreadyConsumed`] if the
/// entry was used by a prior encryption, and [`PadError::Persistence`] if
/// the consumption record cannot be written; in that case no ciphertext
/// is produced and the operation must be treated as not having happened.
pub fn encrypt(
    store: &mut PadStore,
    store_path: &Path,
    entry_index: u32,
    plaintext: &[u8],
    now: DateTime<Utc>,
) -> Result<String, PadError> {
    let entry = store
        .entry(entry_index)
        .ok_or_else(|| PadError::NoEligiblePad {
            message: format!(
                "pad store {} has no entry at index {entry_index}",
                store.id()
            ),
        })?;
    if plaintext.len() > entry.key_len() {
        return Err(PadError::MessageTooLong {
            message_len: plaintext.len(),
            key_len: entry.key_len(),
        });
    }
    let key_prefix = entry.key[..plaintext.len()].to_vec();

    store.mark_consumed(entry_index, now)?;
    store.save(store_path)?;
    debug!(
        "consumed entry {entry_index} of pad store {} at {}",
        store.id(),
        store_path.display()
    );

    let ciphertext = xor(plaintext, &key_prefix);
    Ok(group_hex(&hex::encode(ciphertext), HEX_GROUP))
}

/// Decrypts grouped-hex `ciphertext` against one pad entry.
///
/// All whitespace is stripped first, so both raw and transcription-grouped
/// hex are accepted. Decryption is a read-only operation against committed
/// key material: it neither requires nor checks the consumed flag, so a pad
/// consumed by a prior encryption remains decryptable. That asymmetry is by
/// design and means decrypt performs no reuse protection of its own.
///
/// # Errors
///
/// Returns [`PadError::InvalidHex`] if the normalized text is not valid
/// hex, [`PadError::MessageTooLong`] if it decodes to more bytes than the
/// key holds, and [`PadError::NoEligiblePad`] if no entry exists at
/// `entry_index`.
pub fn decrypt(store: &PadStore, entry_index: u32, ciphertext: &str) -> Result<Vec<u8>, PadError> {
    let normalized: String = ciphertext.chars().filter(|c| !c.is_whitespace()).collect();
    let message = hex::decode(&normalized).map_err(|source| PadError::InvalidHex {
        context: "ciphertext",
        source,
    })?;

    let entry = store
        .entry(entry_index)
        .ok_or_else(|| PadError::NoEligiblePad {
            message: format!(
                "pad store {} has no entry at index {entry_index}",
                store.id()
            ),
        })?;
    if message.len() > entry.key_len() {
        return Err(PadError::MessageTooLong {
            message_len: message.len(),
            key_len: entry.key_len(),
        });
    }

    Ok(xor(&message, &entry.key[..message.len()]))
}

/// Splits a hex string into space-separated clusters of `group` characters.
///
/// Purely a transcription convenience; stripping whitespace reverses it.
///
/// # Panics
///
/// Panics if `group` is zero.
#[must_use]
pub fn group_hex(text: &str, group: usize) -> String {
    assert!(group > 0, "group size must be positive");
    let mut out = String::with_capacity(text.len() + text.len() / group);
    for (i, ch) in text.chars().enumerate() {
        if i > 0 && i % group == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
