//! `lexifuse` is an in-memory, serializable full-text membership index for short
//! documents. It is built offline and queried either natively or from a hosted
//! (WebAssembly) runtime via the [`embed`] boundary.
//!
//! A caller inserts documents (raw text, stored as its own result payload), builds
//! the index once, and then issues single-word or multi-word queries that return the
//! documents likely to contain the given terms, under conjunctive (all terms) or
//! disjunctive (any term) semantics. False positives are possible, at a small,
//! compile-time-configurable rate; false negatives are not.
//!
//! # Example
//!
//! ```
//! use lexifuse::{QueryOptions, QueryType, TextIndex, TextIndexConfig};
//!
//! let mut index = TextIndex::init(TextIndexConfig::new()).unwrap();
//! index.insert("Hallo welt");
//! index.insert("dies ist ein test");
//! index.index().unwrap();
//!
//! assert!(index.contains("Hallo").unwrap());
//! assert!(!index.contains("boo").unwrap());
//!
//! let mut hits = Vec::new();
//! let count = index.query("Hallo test", &mut hits, QueryOptions { query_type: QueryType::Any });
//! assert_eq!(count, 2);
//! ```
//!
//! # Layout
//!
//! The index is a three-level tree of binary-fuse filters: one outer filter over
//! every key, a fixed number of mid-layer divisions that balance key counts for
//! pruning, and one inner filter per inserted document. See [`layered_filter`] for the
//! build and query algorithms, [`fuse`] for the fingerprint-width generic, and
//! [`persist`] for the on-disk format.

pub mod config;
pub mod error;
mod fuse;
mod hash;
pub mod layered_filter;
pub mod persist;
mod result_payload;
mod stemmer;
pub mod text_index;
mod tokenizer;

#[cfg(feature = "embed")]
pub mod embed;

pub use config::TextIndexConfig;
pub use error::{Error, Result};
pub use fuse::{FuseWidth, Width16, Width32, Width8};
pub use layered_filter::{LayeredFilter, LayeredFilterOptions, DEFAULT_DIVISIONS};
pub use result_payload::ResultPayload;
pub use text_index::{DocumentHandle, QueryOptions, QueryType, TextIndex};

/// The wire format version written by this build's [`persist`] module.
pub const VERSION: u16 = persist::FORMAT_VERSION;
