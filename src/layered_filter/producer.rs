//! The two key-enumeration producers used while building a [`super::LayeredFilter`]:
//! a walk over every inserted key, and a walk restricted to one mid-layer division.
//!
//! Because inner layers own their keys outright, both are simple, restartable,
//! single-pass iterators over already-materialized data rather than stateful cursors.

use super::mid_layer::MidLayer;
use crate::fuse::FuseWidth;

/// Walks mid divisions in index order, and within each, inner layers in insertion
/// order, yielding every key ever inserted into the filter.
pub(crate) fn all_keys<W: FuseWidth>(mid_layer: &[MidLayer<W>]) -> impl Iterator<Item = u64> + '_ {
    mid_layer.iter().flat_map(MidLayer::all_keys)
}

/// Walks a single mid division's inner layers in insertion order.
pub(crate) fn mid_division_keys<W: FuseWidth>(
    mid_layer: &[MidLayer<W>],
    division: usize,
) -> impl Iterator<Item = u64> + '_ {
    mid_layer[division].all_keys()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuse::Width8;
    use crate::result_payload::ResultPayload;

    #[test]
    fn mid_division_keys_length_matches_division_keys_count() {
        let mut division: MidLayer<Width8> = MidLayer::default();
        division.push(super::super::inner_layer::InnerLayer::new(
            Box::new([1, 2, 3]),
            ResultPayload::from("a"),
        ));
        division.push(super::super::inner_layer::InnerLayer::new(
            Box::new([4, 5]),
            ResultPayload::from("b"),
        ));

        let mid_layer = vec![division];
        let collected: Vec<u64> = mid_division_keys(&mid_layer, 0).collect();
        assert_eq!(collected.len(), mid_layer[0].keys_count() as usize);
        assert_eq!(collected, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn all_keys_concatenates_every_division_in_order() {
        let mut a: MidLayer<Width8> = MidLayer::default();
        a.push(super::super::inner_layer::InnerLayer::new(
            Box::new([1]),
            ResultPayload::from("a"),
        ));
        let mut b: MidLayer<Width8> = MidLayer::default();
        b.push(super::super::inner_layer::InnerLayer::new(
            Box::new([2]),
            ResultPayload::from("b"),
        ));

        let mid_layer = vec![a, b];
        let collected: Vec<u64> = all_keys(&mid_layer).collect();
        assert_eq!(collected, vec![1, 2]);
    }
}
