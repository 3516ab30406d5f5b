//! One inserted document's own filter: the innermost tier of a [`super::LayeredFilter`].

use crate::error::Result;
use crate::fuse::{FuseFilterOps, FuseWidth};
use crate::result_payload::ResultPayload;

/// One inserted document's filter and result payload.
///
/// Owns its key buffer outright from the moment of insertion (rather than borrowing
/// from a shared side table), so it can be built, queried, and dropped independently
/// of anything else in the tree. After `TextIndex::load`/`loads`, the key buffer is
/// empty (not reconstructed from the stream) since only the built filter is needed to
/// answer queries.
pub struct InnerLayer<W: FuseWidth> {
    keys_count: u64,
    keys: Box<[u64]>,
    filter: Option<W::Filter>,
    result: ResultPayload,
}

impl<W: FuseWidth> InnerLayer<W> {
    pub(crate) fn new(keys: Box<[u64]>, result: ResultPayload) -> Self {
        let keys_count = keys.len() as u64;
        Self { keys_count, keys, filter: None, result }
    }

    pub(crate) fn from_parts(keys_count: u64, filter: W::Filter, result: ResultPayload) -> Self {
        Self { keys_count, keys: Box::new([]), filter: Some(filter), result }
    }

    /// The number of keys (including duplicates) this document was inserted with.
    pub fn keys_count(&self) -> u64 {
        self.keys_count
    }

    pub fn result(&self) -> &ResultPayload {
        &self.result
    }

    pub(crate) fn keys(&self) -> &[u64] {
        &self.keys
    }

    pub(crate) fn filter(&self) -> Option<&W::Filter> {
        self.filter.as_ref()
    }

    /// Builds this layer's filter from its de-duplicated key set.
    pub(crate) fn build_filter(&mut self) -> Result<()> {
        let mut unique: Vec<u64> = self.keys.to_vec();
        unique.sort_unstable();
        unique.dedup();
        self.filter = Some(W::Filter::populate(&unique)?);
        Ok(())
    }

    /// Whether every key in `keys` is a member of this layer's filter. An empty
    /// `keys` slice is vacuously true, matching the outer AND query's trivial-match
    /// edge case.
    pub fn contains_all(&self, keys: &[u64]) -> bool {
        match &self.filter {
            Some(f) => keys.iter().all(|&k| f.contain(k)),
            None => keys.is_empty(),
        }
    }

    /// Whether at least one key in `keys` is a member of this layer's filter.
    pub fn contains_any(&self, keys: &[u64]) -> bool {
        match &self.filter {
            Some(f) => keys.iter().any(|&k| f.contain(k)),
            None => false,
        }
    }

    pub(crate) fn size_in_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.keys.len() * std::mem::size_of::<u64>()
            + self.filter.as_ref().map_or(0, FuseFilterOps::size_in_bytes)
            + match &self.result {
                ResultPayload::U64(_) => 0,
                ResultPayload::Bytes(b) => b.len(),
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuse::Width8;

    #[test]
    fn empty_query_vacuously_matches_for_and_but_not_or() {
        let layer: InnerLayer<Width8> =
            InnerLayer::new(Box::new([1, 2, 3]), ResultPayload::from("doc"));
        assert!(layer.contains_all(&[]));
        assert!(!layer.contains_any(&[]));
    }

    #[test]
    fn build_filter_recognizes_every_inserted_key() {
        let keys: Box<[u64]> = (10..40).collect();
        let mut layer: InnerLayer<Width8> = InnerLayer::new(keys.clone(), ResultPayload::from("doc"));
        layer.build_filter().unwrap();

        assert!(layer.contains_all(&keys));
        assert!(layer.contains_any(&[15]));
    }

    #[test]
    fn keys_count_reflects_duplicates() {
        let keys: Box<[u64]> = Box::new([1, 1, 2, 3, 3, 3]);
        let layer: InnerLayer<Width8> = InnerLayer::new(keys, ResultPayload::from("doc"));
        assert_eq!(layer.keys_count(), 6);
    }
}
