//! Binary-fuse approximate-membership filters, and the compile-time fingerprint-width
//! parameter that selects between them.

use crate::error::{Error, Result};
use xorf::{BinaryFuse16, BinaryFuse32, BinaryFuse8, Filter};

/// The raw, width-independent shape of a binary-fuse filter's internal state, used
/// only by [`crate::persist`] to (de)serialize a filter without round-tripping
/// through its key set.
pub struct FuseRawParts {
    pub seed: u64,
    pub segment_length: u32,
    pub segment_length_mask: u32,
    pub segment_count_length: u32,
    pub fingerprint_bytes: Vec<u8>,
}

/// Operations common to every fingerprint width's concrete filter type.
///
/// Implemented for `xorf`'s [`BinaryFuse8`], [`BinaryFuse16`], and [`BinaryFuse32`].
/// Callers normally reach these through [`FuseWidth::Filter`] rather than naming a
/// concrete type directly.
pub trait FuseFilterOps: std::fmt::Debug + Send + Sync + Sized {
    /// Builds a filter over a de-duplicated key set.
    ///
    /// `xorf` draws no entropy from the OS or from `rand`; its internal seed-retry
    /// sequence is a pure function of the key set, so two calls with the same
    /// `unique_keys` always produce the same `seed` and fingerprints. This is what
    /// lets [`crate::persist::encode`] be byte-identical across independent builds
    /// from the same corpus (see the determinism property test in `tests/`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConstructionFailed`] if construction does not converge.
    fn populate(unique_keys: &[u64]) -> Result<Self>;

    /// Returns whether `key` is (probably) a member. May be a false positive; never a
    /// false negative.
    fn contain(&self, key: u64) -> bool;

    /// The heap footprint of this filter's fingerprint array, in bytes.
    fn size_in_bytes(&self) -> usize;

    /// Decomposes this filter into the width-independent shape [`crate::persist`]
    /// writes to a stream.
    fn raw_parts(&self) -> FuseRawParts;

    /// Reconstructs a filter from parts previously produced by [`Self::raw_parts`].
    fn from_raw_parts(parts: FuseRawParts) -> Self;
}

macro_rules! impl_fuse_filter_ops {
    ($filter:ty, $fingerprint:ty) => {
        impl FuseFilterOps for $filter {
            fn populate(unique_keys: &[u64]) -> Result<Self> {
                <$filter>::try_from(unique_keys).map_err(|_| Error::ConstructionFailed)
            }

            fn contain(&self, key: u64) -> bool {
                Filter::contains(self, &key)
            }

            fn size_in_bytes(&self) -> usize {
                std::mem::size_of::<Self>()
                    + self.fingerprints.len() * std::mem::size_of::<$fingerprint>()
            }

            fn raw_parts(&self) -> FuseRawParts {
                let fingerprint_bytes = self
                    .fingerprints
                    .iter()
                    .flat_map(|v| v.to_le_bytes())
                    .collect();

                FuseRawParts {
                    seed: self.seed,
                    segment_length: self.segment_length,
                    segment_length_mask: self.segment_length_mask,
                    segment_count_length: self.segment_count_length,
                    fingerprint_bytes,
                }
            }

            fn from_raw_parts(parts: FuseRawParts) -> Self {
                const WIDTH: usize = std::mem::size_of::<$fingerprint>();

                let fingerprints = parts
                    .fingerprint_bytes
                    .chunks_exact(WIDTH)
                    .map(|chunk| {
                        let mut bytes = [0u8; WIDTH];
                        bytes.copy_from_slice(chunk);
                        <$fingerprint>::from_le_bytes(bytes)
                    })
                    .collect();

                Self {
                    seed: parts.seed,
                    segment_length: parts.segment_length,
                    segment_length_mask: parts.segment_length_mask,
                    segment_count_length: parts.segment_count_length,
                    fingerprints,
                }
            }
        }
    };
}

impl_fuse_filter_ops!(BinaryFuse8, u8);
impl_fuse_filter_ops!(BinaryFuse16, u16);
impl_fuse_filter_ops!(BinaryFuse32, u32);

mod sealed {
    pub trait Sealed {}
}

/// A compile-time fingerprint width for binary-fuse filters. Not runtime-selectable:
/// selected by monomorphizing [`crate::layered_filter::LayeredFilter`] and
/// [`crate::text_index::TextIndex`] over [`Width8`], [`Width16`], or [`Width32`], the
/// same way this crate's generic-parameter ancestor chooses its suffix-array integer
/// width at the type level via a sealed trait.
pub trait FuseWidth: sealed::Sealed + Send + Sync + 'static {
    /// The concrete filter type for this width.
    type Filter: FuseFilterOps;

    /// The fingerprint width in bits; also the value stored in a persisted header.
    const BITS: u16;
}

/// 8-bit fingerprints: false-positive rate approximately 1/256. The default width.
#[derive(Debug, Clone, Copy)]
pub struct Width8;
/// 16-bit fingerprints: false-positive rate approximately 1/65536.
#[derive(Debug, Clone, Copy)]
pub struct Width16;
/// 32-bit fingerprints: false-positive rate approximately 1/4294967296.
#[derive(Debug, Clone, Copy)]
pub struct Width32;

impl sealed::Sealed for Width8 {}
impl sealed::Sealed for Width16 {}
impl sealed::Sealed for Width32 {}

impl FuseWidth for Width8 {
    type Filter = BinaryFuse8;
    const BITS: u16 = 8;
}

impl FuseWidth for Width16 {
    type Filter = BinaryFuse16;
    const BITS: u16 = 16;
}

impl FuseWidth for Width32 {
    type Filter = BinaryFuse32;
    const BITS: u16 = 32;
}

/// Checks a persisted header's runtime fingerprint-bit value against the width `W`
/// the reader is compiled for.
pub(crate) fn check_width<W: FuseWidth>(bits: u16) -> Result<()> {
    if bits == W::BITS {
        Ok(())
    } else {
        Err(Error::OptionsMismatch {
            detail: format!(
                "stream has fingerprint width {bits}, this build expects {}",
                W::BITS
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width8_round_trips_through_raw_parts() {
        let keys: Vec<u64> = (0..200).collect();
        let filter = BinaryFuse8::populate(&keys).unwrap();
        let parts = filter.raw_parts();
        let restored = BinaryFuse8::from_raw_parts(parts);

        for key in &keys {
            assert!(restored.contain(*key));
        }
    }

    #[test]
    fn width32_round_trips_through_raw_parts() {
        let keys: Vec<u64> = (0..500).map(|i| i * 7 + 3).collect();
        let filter = BinaryFuse32::populate(&keys).unwrap();
        let restored = BinaryFuse32::from_raw_parts(filter.raw_parts());

        for key in &keys {
            assert!(restored.contain(*key));
        }
    }

    #[test]
    fn check_width_rejects_mismatch() {
        assert!(check_width::<Width8>(16).is_err());
        assert!(check_width::<Width8>(8).is_ok());
    }
}
