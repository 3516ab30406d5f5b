//! Error types for lexifuse.
//!
//! This module defines the error type shared by every fallible operation in the
//! crate, following the same `thiserror`-derived, single-enum shape used throughout
//! the storage-engine workspaces this crate draws its ambient conventions from.

use thiserror::Error;

/// The error type for lexifuse operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An I/O error occurred while reading or writing a serialized index.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `TextIndex::contains` was given a search word that tokenized to zero tokens.
    #[error("search word is empty")]
    EmptySearchWord,

    /// `TextIndex::contains` was given a search word that tokenized to more than one
    /// token; `contains` only accepts a single word.
    #[error("search word contains more than one word")]
    MoreThanOneWord,

    /// The requested `(language, charenc)` pair has no matching Snowball stemmer.
    #[error("no stemmer for language {language:?} with encoding {charenc:?}")]
    UnknownStemmer { language: String, charenc: String },

    /// Binary-fuse filter construction did not converge on the supplied key set. Rare;
    /// generally indicates a duplicate key survived the uniqueness pass.
    #[error("binary-fuse filter construction failed to converge")]
    ConstructionFailed,

    /// A serialized stream ended before all expected fields could be read.
    #[error("unexpected end of stream while decoding")]
    EndOfStream,

    /// A serialized stream's format version does not match the version this build
    /// reads and writes.
    #[error("version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u16, found: u16 },

    /// A serialized stream's structural options (fingerprint width, mid-layer
    /// division count, or result payload shape) do not match this build's
    /// compile-time configuration.
    #[error("options mismatch: {detail}")]
    OptionsMismatch { detail: String },
}

/// A specialized `Result` type for lexifuse operations.
pub type Result<T> = std::result::Result<T, Error>;
