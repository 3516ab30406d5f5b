//! Couples the tokenizer, stemmer, and hasher with a [`LayeredFilter`] to provide the
//! insert/index/contains/query/save/load surface of the crate.

use crate::config::TextIndexConfig;
use crate::error::{Error, Result};
use crate::fuse::{FuseWidth, Width8};
use crate::hash::key_hash;
use crate::layered_filter::{LayeredFilter, LayeredFilterOptions, DEFAULT_DIVISIONS};
use crate::persist;
use crate::result_payload::ResultPayload;
use crate::stemmer::Stemmer;
use crate::tokenizer;
use log::debug;
use std::path::Path;

/// Whether [`TextIndex::query`] matches documents containing any query token, or all
/// of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryType {
    #[default]
    Any,
    All,
}

/// Options for [`TextIndex::query`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    pub query_type: QueryType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Building,
    Indexed,
}

/// An opaque handle to a document inserted into a [`TextIndex`].
///
/// Only useful for the caller's own bookkeeping; the index itself owns the
/// document's key buffer regardless of whether this handle is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentHandle(pub(crate) usize);

/// The full-text membership index: tokenizer, stemmer, and hasher wired into a
/// [`LayeredFilter`].
///
/// `W` selects the binary-fuse fingerprint width (default
/// [`Width8`](crate::fuse::Width8)); `D` is the number of mid-layer divisions
/// (default [`DEFAULT_DIVISIONS`]).
///
/// # Example
///
/// ```
/// use lexifuse::{QueryOptions, QueryType, TextIndex, TextIndexConfig};
///
/// let mut index = TextIndex::init(TextIndexConfig::new()).unwrap();
/// index.insert("Hallo welt");
/// index.insert("dies ist ein test");
/// index.index().unwrap();
///
/// assert!(index.contains("Hallo").unwrap());
/// assert!(!index.contains("boo").unwrap());
///
/// let mut hits = Vec::new();
/// let count = index.query("Hallo test", &mut hits, QueryOptions { query_type: QueryType::Any });
/// assert_eq!(count, 2);
/// ```
pub struct TextIndex<W: FuseWidth = Width8, const D: usize = DEFAULT_DIVISIONS> {
    layered: LayeredFilter<W, D>,
    stemmer: Stemmer,
    phase: Phase,
    next_handle: usize,
}

impl<W: FuseWidth, const D: usize> TextIndex<W, D> {
    /// Constructs an empty index from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStemmer`] if `config`'s `(language, charenc)` does not
    /// name a supported Snowball stemmer.
    pub fn init(config: TextIndexConfig) -> Result<Self> {
        let stemmer = Stemmer::new(&config.language, &config.charenc)?;
        let layered = LayeredFilter::new(config.estimated_keys);

        Ok(Self { layered, stemmer, phase: Phase::Building, next_handle: 0 })
    }

    /// Tokenizes, stems, and hashes `text`, then registers it as a new document. The
    /// text itself becomes the document's result payload.
    ///
    /// Returns an opaque handle for the caller's own bookkeeping.
    ///
    /// # Panics
    ///
    /// Panics if called after [`TextIndex::index`].
    pub fn insert(&mut self, text: &str) -> DocumentHandle {
        assert_eq!(
            self.phase,
            Phase::Building,
            "TextIndex::insert called after index() was called"
        );

        let keys: Box<[u64]> = tokenizer::tokenize(text)
            .map(|token| self.stemmer.stem(&token))
            .map(|stem| key_hash(stem.as_bytes()))
            .collect();

        self.layered.insert(keys, ResultPayload::from(text));

        let handle = DocumentHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Builds the layered filter. Must be called exactly once, after all inserts and
    /// before any `contains`/`query`/`save` call.
    ///
    /// # Panics
    ///
    /// Panics if called more than once.
    pub fn index(&mut self) -> Result<()> {
        assert_eq!(self.phase, Phase::Building, "TextIndex::index called more than once");

        debug!("building layered filter over {} keys", self.layered.keys());
        self.layered.index()?;
        self.phase = Phase::Indexed;
        Ok(())
    }

    fn query_keys(&self, text: &str) -> Vec<u64> {
        tokenizer::tokenize(text)
            .map(|token| self.stemmer.stem(&token))
            .map(|stem| key_hash(stem.as_bytes()))
            .collect()
    }

    /// Tests whether a single word is a (probable) member of the index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySearchWord`] if `word` tokenizes to zero tokens, or
    /// [`Error::MoreThanOneWord`] if it tokenizes to more than one.
    pub fn contains(&self, word: &str) -> Result<bool> {
        let tokens = tokenizer::tokenize_to_vec(word);

        match tokens.len() {
            0 => Err(Error::EmptySearchWord),
            1 => {
                let stem = self.stemmer.stem(&tokens[0]);
                Ok(self.layered.contains(key_hash(stem.as_bytes())))
            }
            _ => Err(Error::MoreThanOneWord),
        }
    }

    /// Runs a multi-word query, appending matching documents' result payloads to
    /// `sink` (in mid-division, then insertion, order) and returning the match count.
    pub fn query(&self, term: &str, sink: &mut Vec<ResultPayload>, options: QueryOptions) -> usize {
        let keys = self.query_keys(term);

        match options.query_type {
            QueryType::Any => self.layered.query_logical_or(&keys, Some(sink)),
            QueryType::All => self.layered.query_logical_and(&keys, Some(sink)),
        }
    }

    /// Serializes this index and atomically writes it to `dir/filename`.
    pub fn save(&self, dir: impl AsRef<Path>, filename: impl AsRef<Path>) -> Result<()> {
        persist::save_to_file(self, dir.as_ref(), filename.as_ref())
    }

    /// Deserializes a `TextIndex` previously written by [`TextIndex::save`].
    ///
    /// `config`'s `language`/`charenc` are used to reconstruct the stemmer; they are
    /// not themselves part of the serialized stream, so passing a different
    /// language than was used at build time silently produces an index whose
    /// queries never match anything.
    pub fn load(
        dir: impl AsRef<Path>,
        filename: impl AsRef<Path>,
        config: TextIndexConfig,
    ) -> Result<Self> {
        let path = dir.as_ref().join(filename.as_ref());
        let bytes = std::fs::read(path)?;
        Self::loads(&bytes, config)
    }

    /// Deserializes a `TextIndex` from an in-memory byte buffer.
    pub fn loads(bytes: &[u8], config: TextIndexConfig) -> Result<Self> {
        let stemmer = Stemmer::new(&config.language, &config.charenc)?;
        let layered = persist::decode::<W, D>(bytes)?;

        Ok(Self { layered, stemmer, phase: Phase::Indexed, next_handle: 0 })
    }

    /// The approximate heap footprint of this index, in bytes.
    pub fn size_in_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.layered.size_in_bytes()
    }

    pub fn options(&self) -> LayeredFilterOptions {
        self.layered.options()
    }

    pub(crate) fn layered_filter(&self) -> &LayeredFilter<W, D> {
        &self.layered
    }
}
