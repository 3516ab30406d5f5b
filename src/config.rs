//! Builder-style configuration for a [`crate::text_index::TextIndex`].

/// Runtime options for constructing a [`crate::text_index::TextIndex`].
///
/// Fingerprint width and mid-layer division count are compile-time parameters in this
/// crate (the `W: FuseWidth` and `const D: usize` parameters of `TextIndex` and
/// `LayeredFilter`) and are not part of this struct.
#[derive(Debug, Clone)]
pub struct TextIndexConfig {
    pub(crate) estimated_keys: u64,
    pub(crate) language: String,
    pub(crate) charenc: String,
}

impl TextIndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// An upper-bound estimate of the total number of keys the finished index will
    /// hold, used to balance mid-layer divisions during `insert`. Default `100`.
    pub fn estimated_keys(mut self, estimated_keys: u64) -> Self {
        self.estimated_keys = estimated_keys;
        self
    }

    /// The Snowball stemmer algorithm name, e.g. `"german"` or `"english"`. Default
    /// `"german"`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// The stemmer's character encoding. Only `"UTF_8"` is supported. Default
    /// `"UTF_8"`.
    pub fn charenc(mut self, charenc: impl Into<String>) -> Self {
        self.charenc = charenc.into();
        self
    }
}

impl Default for TextIndexConfig {
    fn default() -> Self {
        Self {
            estimated_keys: 100,
            language: "german".to_string(),
            charenc: "UTF_8".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_german_utf8_with_a_modest_key_estimate() {
        let config = TextIndexConfig::new();
        assert_eq!(config.estimated_keys, 100);
        assert_eq!(config.language, "german");
        assert_eq!(config.charenc, "UTF_8");
    }

    #[test]
    fn builder_methods_override_defaults() {
        let config = TextIndexConfig::new().estimated_keys(5_000).language("english");
        assert_eq!(config.estimated_keys, 5_000);
        assert_eq!(config.language, "english");
    }
}
