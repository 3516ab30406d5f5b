//! The exported surface for a hosted (e.g. WebAssembly) runtime: linear-memory
//! chunked upload, initialization, and query, plus the host-provided log callback.
//!
//! # Safety
//!
//! Every exported function here is `extern "C"` and trusts the host to respect a
//! single-threaded, sequential calling convention: zero or more `push_index_chunk`
//! calls, then exactly one `init`, then any number of `search` calls, all from one
//! cooperative thread. None of this is, or can be, enforced by the type system
//! across an FFI boundary.

use crate::fuse::Width8;
use crate::text_index::{QueryOptions, TextIndex};
use crate::TextIndexConfig;
use log::{error, info};
use std::slice;
use std::sync::{Mutex, OnceLock};

/// Size of the linear-memory chunk window the host writes serialized index bytes
/// into, per call to [`push_index_chunk`].
pub const CHUNK_WINDOW_SIZE: usize = 16384;

/// The byte window the host streams serialized index bytes through.
#[unsafe(no_mangle)]
pub static mut global_chunk: [u8; CHUNK_WINDOW_SIZE] = [0; CHUNK_WINDOW_SIZE];

unsafe extern "C" {
    /// Declared by the host environment: writes a UTF-8 diagnostic message to
    /// wherever the host surfaces logs (e.g. the browser console).
    fn log(offset: u32, len: u32);
}

struct EmbeddedSession {
    buffer: Vec<u8>,
    index: Option<TextIndex<Width8>>,
}

fn session() -> &'static Mutex<EmbeddedSession> {
    static SESSION: OnceLock<Mutex<EmbeddedSession>> = OnceLock::new();
    SESSION.get_or_init(|| Mutex::new(EmbeddedSession { buffer: Vec::new(), index: None }))
}

fn host_log(message: &str) {
    // SAFETY: `message` is a valid UTF-8 slice owned by this call frame; the host's
    // `log` import is documented to only read `len` bytes starting at `offset`.
    unsafe {
        log(message.as_ptr() as u32, message.len() as u32);
    }
}

/// Appends the first `len` bytes of [`global_chunk`] to the session's growable
/// upload buffer.
///
/// # Safety
///
/// `len` must not exceed [`CHUNK_WINDOW_SIZE`]. The host must not call this
/// concurrently with another exported function.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn push_index_chunk(len: u32) {
    let len = (len as usize).min(CHUNK_WINDOW_SIZE);
    let mut guard = session().lock().unwrap();
    // SAFETY: `global_chunk` is `CHUNK_WINDOW_SIZE` bytes and `len` is clamped to it.
    let chunk = unsafe { slice::from_raw_parts(global_chunk.as_ptr(), len) };
    guard.buffer.extend_from_slice(chunk);
}

/// Deserializes the accumulated upload buffer into a process-wide [`TextIndex`].
///
/// On failure, logs a diagnostic via the host's `log` import and leaves the module
/// uninitialized: the embedding boundary is the only place errors are converted to
/// log messages, since there is no channel back to the host otherwise.
///
/// # Safety
///
/// Must be called at most once, after every `push_index_chunk` call and before any
/// `search` call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn init() {
    let mut guard = session().lock().unwrap();

    match TextIndex::<Width8>::loads(&guard.buffer, TextIndexConfig::new()) {
        Ok(index) => {
            info!("index initialized ({} bytes)", guard.buffer.len());
            guard.index = Some(index);
        }
        Err(err) => {
            error!("failed to initialize index: {err}");
            host_log(&format!("lexifuse: failed to initialize index: {err}"));
        }
    }

    guard.buffer.clear();
    guard.buffer.shrink_to_fit();
}

/// Interprets the `query_len` bytes at `query_offset` in the module's linear memory
/// as a UTF-8 query, runs it disjunctively ("any term"), and emits each matching
/// document's text via the host `log` import. Callers needing conjunctive queries
/// should use [`TextIndex`] directly instead of the embedding boundary.
///
/// # Safety
///
/// `query_offset`/`query_len` must describe a valid, in-bounds byte range in this
/// module's linear memory. Should only be called after [`init`] has succeeded;
/// otherwise it logs a diagnostic and returns without searching.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn search(query_offset: u32, query_len: u32) {
    // SAFETY: caller's responsibility per this function's safety section.
    let query_bytes =
        unsafe { slice::from_raw_parts(query_offset as *const u8, query_len as usize) };

    let query = match std::str::from_utf8(query_bytes) {
        Ok(q) => q,
        Err(_) => {
            host_log("lexifuse: search query is not valid UTF-8");
            return;
        }
    };

    let guard = session().lock().unwrap();
    let Some(index) = guard.index.as_ref() else {
        host_log("lexifuse: search called before a successful init");
        return;
    };

    let mut hits = Vec::new();
    index.query(query, &mut hits, QueryOptions::default());

    for hit in &hits {
        if let Some(text) = hit.as_text() {
            host_log(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_starts_uninitialized() {
        let guard = session().lock().unwrap();
        assert!(guard.index.is_none());
        assert!(guard.buffer.is_empty());
    }
}
