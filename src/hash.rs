//! Deterministic 64-bit hashing of stems into filter keys.

use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Fixed key for the `SipHash-1-3` instance used to turn stems into keys.
///
/// This key is a crate constant, not derived from any runtime randomness, so the hash
/// is identical across runs, across processes, and across the native/WebAssembly build
/// split. It must never change within a format version, or previously serialized
/// indexes would silently stop matching queries.
const HASH_KEY: (u64, u64) = (0x6c65_7869_6675_7365, 0x5f73_7465_6d5f_6b65);

/// Hashes a byte string (typically a stem) into a 64-bit filter key.
///
/// Deterministic and pure: the same bytes always produce the same key, regardless of
/// platform, process, or whether the call happens at build time or query time.
pub fn key_hash(bytes: &[u8]) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(HASH_KEY.0, HASH_KEY.1);
    hasher.write(bytes);
    hasher.finish()
}
