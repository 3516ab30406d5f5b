//! The three-level tree of binary-fuse filters at the heart of the index: an outer
//! filter over every key, `D` mid-layer divisions balancing key counts for pruning,
//! and one inner filter per inserted document.
//!
//! # Build protocol
//!
//! Call [`LayeredFilter::insert`] for each document, then [`LayeredFilter::index`]
//! exactly once. Queries before `index()` observe an empty filter (every `contains`
//! and query call returns no match); queries after `index()` see the fully built tree.
//!
//! # Query pruning
//!
//! [`LayeredFilter::query_logical_or`] and [`LayeredFilter::query_logical_and`] both
//! short-circuit at the outer filter, then at each mid-layer division's filter,
//! before ever touching an inner layer — most of a large corpus is pruned away by two
//! cheap filter tests per query.

mod inner_layer;
mod mid_layer;
mod producer;

pub use inner_layer::InnerLayer;
pub use mid_layer::MidLayer;

use crate::error::Result;
use crate::fuse::{FuseFilterOps, FuseWidth};
use crate::result_payload::ResultPayload;
use rayon::prelude::*;

/// Default number of mid-layer divisions.
pub const DEFAULT_DIVISIONS: usize = 8;

/// Structural options that are part of a [`LayeredFilter`]'s identity: they must
/// match between the filter that wrote a serialized stream and the one that reads it
/// back (see [`crate::persist`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayeredFilterOptions {
    pub fingerprint_bits: u16,
    pub mid_layer_divisions: usize,
}

/// The layered probabilistic membership filter.
///
/// `W` selects the fingerprint width (see [`crate::fuse::FuseWidth`]); `D` is the
/// number of mid-layer divisions.
pub struct LayeredFilter<W: FuseWidth, const D: usize = DEFAULT_DIVISIONS> {
    total_keys_estimate: u64,
    keys: u64,
    outer_layer: Option<W::Filter>,
    mid_layer: Vec<MidLayer<W>>,
}

impl<W: FuseWidth, const D: usize> LayeredFilter<W, D> {
    /// Constructs an empty filter. `total_keys_estimate` is an upper-bound estimate
    /// of the total number of keys that will be inserted, used to balance documents
    /// across divisions; it is clamped to at least 1.
    pub fn new(total_keys_estimate: u64) -> Self {
        Self {
            total_keys_estimate: total_keys_estimate.max(1),
            keys: 0,
            outer_layer: None,
            mid_layer: (0..D).map(|_| MidLayer::default()).collect(),
        }
    }

    /// The total number of keys (including duplicates, across every document)
    /// inserted so far.
    pub fn keys(&self) -> u64 {
        self.keys
    }

    pub fn total_keys_estimate(&self) -> u64 {
        self.total_keys_estimate
    }

    pub fn options(&self) -> LayeredFilterOptions {
        LayeredFilterOptions { fingerprint_bits: W::BITS, mid_layer_divisions: D }
    }

    pub fn mid_layer(&self) -> &[MidLayer<W>] {
        &self.mid_layer
    }

    /// Records a new document's key set and result payload, choosing a mid-layer
    /// division by greedily placing it in the first division whose running key count
    /// would stay under `total_keys_estimate / D`, falling back to a hash of the
    /// document's own key count if every division is already at or over that target.
    pub fn insert(&mut self, keys: Box<[u64]>, result: ResultPayload) {
        let keys_count_new = keys.len() as u64;
        let layer = InnerLayer::new(keys, result);

        let target_per_division = self.total_keys_estimate / D as u64;
        let division = self
            .mid_layer
            .iter()
            .position(|d| d.keys_count() + keys_count_new < target_per_division)
            .unwrap_or((keys_count_new % D as u64) as usize);

        self.mid_layer[division].push(layer);
        self.keys += keys_count_new;
    }

    /// Builds all three filter tiers: per-document and per-division filters in
    /// parallel (via `rayon`), then the outer filter once every key has been
    /// enumerated. Must be called exactly once, after every `insert`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::ConstructionFailed`] if any tier's
    /// binary-fuse construction does not converge.
    pub fn index(&mut self) -> Result<()> {
        self.mid_layer.par_iter_mut().try_for_each(MidLayer::build)?;

        let mut unique: Vec<u64> = producer::all_keys(&self.mid_layer).collect();
        unique.sort_unstable();
        unique.dedup();
        self.outer_layer = Some(W::Filter::populate(&unique)?);

        Ok(())
    }

    /// Whether `key` is (probably) present anywhere in the filter. A cheap shortcut
    /// over the full OR/AND query machinery for single-key membership tests.
    pub fn contains(&self, key: u64) -> bool {
        self.outer_layer.as_ref().is_some_and(|f| f.contain(key))
    }

    /// OR query: counts (and, if `sink` is given, appends the result payloads of)
    /// documents containing at least one of `keys`. An empty `keys` slice matches no
    /// document.
    pub fn query_logical_or(
        &self,
        keys: &[u64],
        mut sink: Option<&mut Vec<ResultPayload>>,
    ) -> usize {
        if !keys.iter().any(|&k| self.contains(k)) {
            return 0;
        }

        let mut count = 0;
        for division in &self.mid_layer {
            let division_hit =
                division.filter().is_some_and(|f| keys.iter().any(|&k| f.contain(k)));
            if !division_hit {
                continue;
            }

            for inner in division.inner_layers() {
                if inner.contains_any(keys) {
                    count += 1;
                    if let Some(sink) = sink.as_deref_mut() {
                        sink.push(inner.result().clone());
                    }
                }
            }
        }

        count
    }

    /// AND query: counts (and, if `sink` is given, appends the result payloads of)
    /// documents containing every one of `keys`. An empty `keys` slice trivially
    /// matches every document.
    pub fn query_logical_and(
        &self,
        keys: &[u64],
        mut sink: Option<&mut Vec<ResultPayload>>,
    ) -> usize {
        let outer_ok = match &self.outer_layer {
            Some(f) => keys.iter().all(|&k| f.contain(k)),
            None => keys.is_empty(),
        };
        if !outer_ok {
            return 0;
        }

        let mut count = 0;
        for division in &self.mid_layer {
            let division_ok = match division.filter() {
                Some(f) => keys.iter().all(|&k| f.contain(k)),
                None => keys.is_empty(),
            };
            if !division_ok {
                continue;
            }

            for inner in division.inner_layers() {
                if inner.contains_all(keys) {
                    count += 1;
                    if let Some(sink) = sink.as_deref_mut() {
                        sink.push(inner.result().clone());
                    }
                }
            }
        }

        count
    }

    /// The approximate heap footprint of this filter and everything it owns, in
    /// bytes.
    pub fn size_in_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.outer_layer.as_ref().map_or(0, FuseFilterOps::size_in_bytes)
            + self.mid_layer.iter().map(MidLayer::size_in_bytes).sum::<usize>()
    }

    pub(crate) fn outer_filter(&self) -> Option<&W::Filter> {
        self.outer_layer.as_ref()
    }

    pub(crate) fn from_parts(
        total_keys_estimate: u64,
        keys: u64,
        outer_layer: W::Filter,
        mid_layer: Vec<MidLayer<W>>,
    ) -> Self {
        Self { total_keys_estimate, keys, outer_layer: Some(outer_layer), mid_layer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuse::Width8;

    fn doc_keys(words: &[u64]) -> Box<[u64]> {
        words.iter().copied().collect()
    }

    #[test]
    fn balance_spreads_documents_once_a_division_fills_up() {
        const DIVISIONS: u64 = 4;
        const DOCS: u64 = 16;
        const MAX_SINGLE_DOC_KEYS: u64 = 1;
        let mut filter: LayeredFilter<Width8, 4> = LayeredFilter::new(20);

        for i in 0..DOCS {
            filter.insert(doc_keys(&[i]), ResultPayload::from(i));
        }

        // total_keys_estimate / D == 5: a correctly balancing insert never lets a
        // division exceed that target by more than one document's own key count. A
        // broken placement (e.g. always choosing division 0) would push this
        // division's count up toward the full 16 keys and fail the bound below.
        let target_per_division = filter.total_keys_estimate() / DIVISIONS;
        let max_division = filter.mid_layer().iter().map(MidLayer::keys_count).max().unwrap();
        assert!(
            max_division <= target_per_division + MAX_SINGLE_DOC_KEYS,
            "max_division = {max_division}, target_per_division = {target_per_division}"
        );
        let total: u64 = filter.mid_layer().iter().map(MidLayer::keys_count).sum();
        assert_eq!(total, DOCS);
    }

    #[test]
    fn key_count_is_conserved_through_index() {
        let mut filter: LayeredFilter<Width8, 4> = LayeredFilter::new(50);
        for i in 0..30u64 {
            filter.insert(doc_keys(&[i, i + 1000]), ResultPayload::from(i));
        }
        assert_eq!(filter.keys(), 60);
        filter.index().unwrap();
        assert_eq!(filter.keys(), 60);
    }

    #[test]
    fn empty_and_query_matches_every_document() {
        let mut filter: LayeredFilter<Width8, 2> = LayeredFilter::new(10);
        filter.insert(doc_keys(&[1, 2]), ResultPayload::from(1u64));
        filter.insert(doc_keys(&[3, 4]), ResultPayload::from(2u64));
        filter.index().unwrap();

        assert_eq!(filter.query_logical_and(&[], None), 2);
        assert_eq!(filter.query_logical_or(&[], None), 0);
    }

    #[test]
    fn size_in_bytes_grows_with_inserted_documents() {
        let mut filter: LayeredFilter<Width8, 2> = LayeredFilter::new(200);
        let empty_size = filter.size_in_bytes();

        for i in 0..50u64 {
            filter.insert(doc_keys(&[i]), ResultPayload::from(i));
        }
        filter.index().unwrap();

        assert!(filter.size_in_bytes() > empty_size);
    }
}
