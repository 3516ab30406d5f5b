//! One of the `D` horizontal partitions of documents used to balance key counts for
//! pruning: the middle tier of a [`super::LayeredFilter`].

use super::inner_layer::InnerLayer;
use crate::error::Result;
use crate::fuse::{FuseFilterOps, FuseWidth};
use rayon::prelude::*;

pub struct MidLayer<W: FuseWidth> {
    keys_count: u64,
    filter: Option<W::Filter>,
    inner_layers: Vec<InnerLayer<W>>,
}

impl<W: FuseWidth> Default for MidLayer<W> {
    fn default() -> Self {
        Self { keys_count: 0, filter: None, inner_layers: Vec::new() }
    }
}

impl<W: FuseWidth> MidLayer<W> {
    pub fn keys_count(&self) -> u64 {
        self.keys_count
    }

    pub fn inner_layers(&self) -> &[InnerLayer<W>] {
        &self.inner_layers
    }

    pub(crate) fn from_parts(
        keys_count: u64,
        filter: W::Filter,
        inner_layers: Vec<InnerLayer<W>>,
    ) -> Self {
        Self { keys_count, filter: Some(filter), inner_layers }
    }

    pub(crate) fn push(&mut self, layer: InnerLayer<W>) {
        self.keys_count += layer.keys_count();
        self.inner_layers.push(layer);
    }

    pub(crate) fn all_keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.inner_layers.iter().flat_map(|l| l.keys().iter().copied())
    }

    pub(crate) fn filter(&self) -> Option<&W::Filter> {
        self.filter.as_ref()
    }

    /// Builds every inner layer's filter (in parallel across documents), then this
    /// division's own filter over the union of their keys.
    pub(crate) fn build(&mut self) -> Result<()> {
        self.inner_layers.par_iter_mut().try_for_each(InnerLayer::build_filter)?;

        let mut unique: Vec<u64> = self.all_keys().collect();
        unique.sort_unstable();
        unique.dedup();
        self.filter = Some(W::Filter::populate(&unique)?);
        Ok(())
    }

    pub(crate) fn size_in_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.filter.as_ref().map_or(0, FuseFilterOps::size_in_bytes)
            + self.inner_layers.iter().map(InnerLayer::size_in_bytes).sum::<usize>()
    }
}
