// File:    lib.rs
// Date:    2026-08-24
//
// Description: The main library crate for station-core: one-time-pad lifecycle management for a number-station operator.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # Station Core Library
//!
//! The pad lifecycle engine for a number-station operator tool: generating
//! one-time pads, locating an eligible unconsumed pad for a recipient,
//! applying the XOR transform, and durably recording pad consumption so no
//! key byte is ever reused.
//!
//! Operations take their storage root, recipient scope, and clock as
//! explicit arguments; the crate holds no ambient state. Execution is
//! single-threaded and synchronous, with the pad store file on disk as the
//! sole source of truth.
//!
//! ## Known limitation
//!
//! Single-writer discipline is assumed: no file locking is provided, so two
//! processes consuming from the same pad store concurrently race (last
//! writer wins and can double-spend a key). Multi-operator deployments are
//! out of scope.

/// XOR cipher engine: encryption with consumption tracking, decryption of
/// grouped-hex transmissions.
pub mod crypto;
/// The [`error::PadError`] failure taxonomy.
pub mod error;
/// Read-only inventory of pad store files.
pub mod examine;
/// Searches a pad directory for the oldest eligible unconsumed entry.
pub mod locator;
/// Creates new pad stores with cryptographically strong key material.
pub mod pad_generator;
/// Durable pad store representation and its JSON wire format.
pub mod store;
