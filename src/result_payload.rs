//! The opaque payload associated with one inserted document.

/// A document's result payload.
///
/// Two shapes are supported by the persisted format: a 64-bit integer, or a
/// length-prefixed byte string. Results are neither interpreted nor deduplicated by
/// the index; `TextIndex::insert` always produces the byte-string shape (the
/// document's own text), and the integer shape exists for direct `LayeredFilter`
/// users who want a compact handle instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPayload {
    U64(u64),
    Bytes(Vec<u8>),
}

impl ResultPayload {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ResultPayload::Bytes(b) => Some(b),
            ResultPayload::U64(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ResultPayload::U64(v) => Some(*v),
            ResultPayload::Bytes(_) => None,
        }
    }

    /// Convenience accessor for the common case of a document's text being stored as
    /// its own result payload.
    pub fn as_text(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }
}

impl From<u64> for ResultPayload {
    fn from(value: u64) -> Self {
        ResultPayload::U64(value)
    }
}

impl From<Vec<u8>> for ResultPayload {
    fn from(value: Vec<u8>) -> Self {
        ResultPayload::Bytes(value)
    }
}

impl From<&str> for ResultPayload {
    fn from(value: &str) -> Self {
        ResultPayload::Bytes(value.as_bytes().to_vec())
    }
}

impl From<String> for ResultPayload {
    fn from(value: String) -> Self {
        ResultPayload::Bytes(value.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_payload_round_trips_as_text() {
        let payload = ResultPayload::from("hallo welt");
        assert_eq!(payload.as_text(), Some("hallo welt"));
        assert_eq!(payload.as_u64(), None);
    }

    #[test]
    fn u64_payload_is_not_text() {
        let payload = ResultPayload::from(42u64);
        assert_eq!(payload.as_u64(), Some(42));
        assert_eq!(payload.as_bytes(), None);
    }
}
