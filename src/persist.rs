//! Little-endian framed binary (de)serialization of a [`LayeredFilter`], and atomic
//! file persistence for [`crate::text_index::TextIndex::save`]/`load`.
//!
//! The wire format is hand-rolled (explicit offset slicing and
//! `to_le_bytes`/`from_le_bytes`) rather than routed through a generic serde encoder,
//! because the format's exact byte layout is part of its contract and a
//! derive-based serializer does not give that level of control.
//!
//! ```text
//! u16  version
//! u64  total_keys_estimate
//! u16  fingerprint_bits
//! u64  mid_layer_divisions
//! u64  keys
//! FilterBlob outer_filter
//! mid_layer_divisions times:
//!     u64 keys_count
//!     FilterBlob filter
//!     u32 inner_layers_len
//!     inner_layers_len times:
//!         u64 keys_count
//!         FilterBlob filter
//!         Result result
//!
//! FilterBlob:
//!     u64 seed
//!     u32 segment_length
//!     u32 segment_length_mask
//!     u32 segment_count
//!     u32 segment_count_length
//!     u32 fingerprints_len
//!     fingerprints_len * (fingerprint_bits / 8) raw bytes
//!
//! Result (byte-string shape, the only shape this build's persistence supports):
//!     u32 len
//!     len raw bytes
//! ```

use crate::error::{Error, Result};
use crate::fuse::{check_width, FuseFilterOps, FuseRawParts, FuseWidth};
use crate::layered_filter::{InnerLayer, LayeredFilter, MidLayer};
use crate::result_payload::ResultPayload;
use crate::text_index::TextIndex;
use std::io::Write;
use std::path::Path;

/// The only wire format version this build writes or accepts.
pub const FORMAT_VERSION: u16 = 1;

/// Arity of the binary-fuse construction this format assumes when deriving the
/// advisory `segment_count` field from `segment_count_length`.
const BINARY_FUSE_ARITY: u32 = 3;

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(Error::EndOfStream)?;
        let slice = self.bytes.get(self.pos..end).ok_or(Error::EndOfStream)?;
        self.pos = end;
        Ok(slice)
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }
}

fn write_filter_blob<F: FuseFilterOps>(buf: &mut Vec<u8>, width_bytes: usize, filter: &F) {
    let parts = filter.raw_parts();
    let fingerprints_len = (parts.fingerprint_bytes.len() / width_bytes) as u32;
    let segment_count = parts.segment_count_length.saturating_sub(BINARY_FUSE_ARITY - 1);

    buf.extend_from_slice(&parts.seed.to_le_bytes());
    buf.extend_from_slice(&parts.segment_length.to_le_bytes());
    buf.extend_from_slice(&parts.segment_length_mask.to_le_bytes());
    buf.extend_from_slice(&segment_count.to_le_bytes());
    buf.extend_from_slice(&parts.segment_count_length.to_le_bytes());
    buf.extend_from_slice(&fingerprints_len.to_le_bytes());
    buf.extend_from_slice(&parts.fingerprint_bytes);
}

fn read_filter_blob<F: FuseFilterOps>(cursor: &mut Cursor, width_bytes: usize) -> Result<F> {
    let seed = cursor.u64()?;
    let segment_length = cursor.u32()?;
    let segment_length_mask = cursor.u32()?;
    let _segment_count = cursor.u32()?;
    let segment_count_length = cursor.u32()?;
    let fingerprints_len = cursor.u32()? as usize;
    let fingerprint_bytes = cursor.take(fingerprints_len * width_bytes)?.to_vec();

    Ok(F::from_raw_parts(FuseRawParts {
        seed,
        segment_length,
        segment_length_mask,
        segment_count_length,
        fingerprint_bytes,
    }))
}

fn write_result(buf: &mut Vec<u8>, result: &ResultPayload) -> Result<()> {
    match result {
        ResultPayload::Bytes(b) => {
            buf.extend_from_slice(&(b.len() as u32).to_le_bytes());
            buf.extend_from_slice(b);
            Ok(())
        }
        ResultPayload::U64(_) => Err(Error::OptionsMismatch {
            detail: "this build's persisted format only supports the byte-string Result shape"
                .to_string(),
        }),
    }
}

fn read_result(cursor: &mut Cursor) -> Result<ResultPayload> {
    let len = cursor.u32()? as usize;
    let bytes = cursor.take(len)?.to_vec();
    Ok(ResultPayload::Bytes(bytes))
}

fn width_bytes_for<W: FuseWidth>() -> usize {
    (W::BITS / 8) as usize
}

/// Encodes `filter` into this module's little-endian framed format.
///
/// # Errors
///
/// Returns [`Error::ConstructionFailed`] if `filter.index()` was never called (some
/// tier's filter is missing), or [`Error::OptionsMismatch`] if a document's result
/// payload is not the byte-string shape.
pub fn encode<W: FuseWidth, const D: usize>(filter: &LayeredFilter<W, D>) -> Result<Vec<u8>> {
    let width_bytes = width_bytes_for::<W>();
    let mut buf = Vec::new();

    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&filter.total_keys_estimate().to_le_bytes());
    buf.extend_from_slice(&W::BITS.to_le_bytes());
    buf.extend_from_slice(&(D as u64).to_le_bytes());
    buf.extend_from_slice(&filter.keys().to_le_bytes());

    let outer = filter.outer_filter().ok_or(Error::ConstructionFailed)?;
    write_filter_blob(&mut buf, width_bytes, outer);

    for division in filter.mid_layer() {
        buf.extend_from_slice(&division.keys_count().to_le_bytes());
        let division_filter = division.filter().ok_or(Error::ConstructionFailed)?;
        write_filter_blob(&mut buf, width_bytes, division_filter);

        buf.extend_from_slice(&(division.inner_layers().len() as u32).to_le_bytes());
        for inner in division.inner_layers() {
            buf.extend_from_slice(&inner.keys_count().to_le_bytes());
            let inner_filter = inner.filter().ok_or(Error::ConstructionFailed)?;
            write_filter_blob(&mut buf, width_bytes, inner_filter);
            write_result(&mut buf, inner.result())?;
        }
    }

    Ok(buf)
}

/// Decodes a [`LayeredFilter`] previously written by [`encode`].
///
/// # Errors
///
/// Returns [`Error::VersionMismatch`] if the stream's version is not
/// [`FORMAT_VERSION`], [`Error::OptionsMismatch`] if its fingerprint width or
/// division count do not match `W`/`D`, and [`Error::EndOfStream`] if the stream is
/// truncated.
pub fn decode<W: FuseWidth, const D: usize>(bytes: &[u8]) -> Result<LayeredFilter<W, D>> {
    let width_bytes = width_bytes_for::<W>();
    let mut cursor = Cursor::new(bytes);

    let version = cursor.u16()?;
    if version != FORMAT_VERSION {
        return Err(Error::VersionMismatch { expected: FORMAT_VERSION, found: version });
    }

    let total_keys_estimate = cursor.u64()?;
    let fingerprint_bits = cursor.u16()?;
    check_width::<W>(fingerprint_bits)?;

    let mid_layer_divisions = cursor.u64()? as usize;
    if mid_layer_divisions != D {
        return Err(Error::OptionsMismatch {
            detail: format!("expected {D} mid-layer divisions, found {mid_layer_divisions}"),
        });
    }

    let keys = cursor.u64()?;
    let outer_layer = read_filter_blob::<W::Filter>(&mut cursor, width_bytes)?;

    let mut mid_layer = Vec::with_capacity(D);
    for _ in 0..D {
        let division_keys_count = cursor.u64()?;
        let division_filter = read_filter_blob::<W::Filter>(&mut cursor, width_bytes)?;
        let inner_layers_len = cursor.u32()? as usize;

        let mut inner_layers = Vec::with_capacity(inner_layers_len);
        for _ in 0..inner_layers_len {
            let inner_keys_count = cursor.u64()?;
            let inner_filter = read_filter_blob::<W::Filter>(&mut cursor, width_bytes)?;
            let result = read_result(&mut cursor)?;
            inner_layers.push(InnerLayer::from_parts(inner_keys_count, inner_filter, result));
        }

        mid_layer.push(MidLayer::from_parts(division_keys_count, division_filter, inner_layers));
    }

    Ok(LayeredFilter::from_parts(total_keys_estimate, keys, outer_layer, mid_layer))
}

/// Atomically writes `index`'s serialized form to `dir/filename`: the bytes are
/// written to a temporary file in `dir` first, then renamed into place, so a reader
/// never observes a partially-written file.
pub fn save_to_file<W: FuseWidth, const D: usize>(
    index: &TextIndex<W, D>,
    dir: &Path,
    filename: &Path,
) -> Result<()> {
    let bytes = encode(index.layered_filter())?;

    let mut temp = tempfile::Builder::new().prefix(".lexifuse-tmp-").tempfile_in(dir)?;
    temp.write_all(&bytes)?;
    temp.flush()?;
    temp.persist(dir.join(filename)).map_err(|e| Error::Io(e.error))?;

    Ok(())
}
