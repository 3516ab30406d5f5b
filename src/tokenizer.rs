//! Unicode-aware case folding and whitespace tokenization.
//!
//! The tokenizer is the sole source of tokens for both index construction and
//! querying; its behavior is therefore part of the index's observable contract (see
//! [`crate::stemmer`] and [`crate::hash`] for the remaining steps of the ingestion
//! pipeline).

/// Splits `s` into maximal runs of non-space bytes, separated by the ASCII space
/// character `U+0020`, lower-cased with full Unicode case folding.
///
/// Runs of multiple spaces do not yield empty tokens. Case folding uses
/// [`str::to_lowercase`], which applies full Unicode case data rather than ASCII-only
/// folding (`"HELLO"` to `"hello"`, `"Ölung"` to `"ölung"`). No further normalization
/// (such as NFC/NFKC) is applied.
///
/// The returned iterator is lazy, deterministic, and pure.
pub fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(' ').filter(|t| !t.is_empty()).map(str::to_lowercase)
}

/// Collects [`tokenize`] into a `Vec`, for call sites that need the full token count
/// up front.
pub fn tokenize_to_vec(s: &str) -> Vec<String> {
    tokenize(s).collect()
}
