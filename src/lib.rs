#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Key hashing for the probe table.
///
/// This module provides the `KeyHash` trait the table hashes keys through,
/// along with the default additive `CharSum` hash and an optional
/// `foldhash`-backed alternative.
pub mod hash;

pub mod table;

pub use hash::CharSum;
#[cfg(feature = "foldhash")]
pub use hash::FoldState;
pub use hash::KeyHash;
pub use table::DEFAULT_CAPACITY;
pub use table::ProbeTable;
pub use table::TableFull;
