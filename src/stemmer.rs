//! Thin adapter around a configured Snowball-family stemmer.

use crate::error::{Error, Result};
use rust_stemmers::{Algorithm, Stemmer as SnowballStemmer};

/// A stemmer bound to one Snowball algorithm and character encoding.
///
/// `stem` is pure and deterministic. The `(language, charenc)` pair is part of an
/// index's identity: querying an index with a stemmer configured for a different
/// language produces keys that will not match the ones produced at build time, and
/// this mismatch is not detectable from the serialized stream alone (the pair is not
/// serialized; see `crate::persist`).
pub struct Stemmer {
    language: String,
    charenc: String,
    inner: SnowballStemmer,
}

impl Stemmer {
    /// Constructs a stemmer for `language` (a Snowball algorithm name, e.g.
    /// `"german"`) and `charenc` (must be `"UTF_8"`, the only encoding `rust-stemmers`
    /// supports).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStemmer`] if `language` does not name a supported
    /// Snowball algorithm, or if `charenc` is not `"UTF_8"`.
    pub fn new(language: &str, charenc: &str) -> Result<Self> {
        if charenc != "UTF_8" {
            return Err(Error::UnknownStemmer {
                language: language.to_string(),
                charenc: charenc.to_string(),
            });
        }

        let algorithm = algorithm_for_name(language).ok_or_else(|| Error::UnknownStemmer {
            language: language.to_string(),
            charenc: charenc.to_string(),
        })?;

        Ok(Self {
            language: language.to_string(),
            charenc: charenc.to_string(),
            inner: SnowballStemmer::create(algorithm),
        })
    }

    /// Returns the stem of `token`.
    ///
    /// Deterministic and pure.
    pub fn stem(&self, token: &str) -> String {
        self.inner.stem(token).into_owned()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn charenc(&self) -> &str {
        &self.charenc
    }
}

fn algorithm_for_name(name: &str) -> Option<Algorithm> {
    Some(match name {
        "arabic" => Algorithm::Arabic,
        "danish" => Algorithm::Danish,
        "dutch" => Algorithm::Dutch,
        "english" => Algorithm::English,
        "finnish" => Algorithm::Finnish,
        "french" => Algorithm::French,
        "german" => Algorithm::German,
        "greek" => Algorithm::Greek,
        "hungarian" => Algorithm::Hungarian,
        "italian" => Algorithm::Italian,
        "norwegian" => Algorithm::Norwegian,
        "portuguese" => Algorithm::Portuguese,
        "romanian" => Algorithm::Romanian,
        "russian" => Algorithm::Russian,
        "spanish" => Algorithm::Spanish,
        "swedish" => Algorithm::Swedish,
        "tamil" => Algorithm::Tamil,
        "turkish" => Algorithm::Turkish,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stemming_is_deterministic() {
        let stemmer = Stemmer::new("german", "UTF_8").unwrap();
        assert_eq!(stemmer.stem("testen"), stemmer.stem("testen"));
    }

    #[test]
    fn rejects_unknown_language() {
        assert!(matches!(
            Stemmer::new("klingon", "UTF_8"),
            Err(Error::UnknownStemmer { .. })
        ));
    }

    #[test]
    fn rejects_unknown_encoding() {
        assert!(matches!(
            Stemmer::new("german", "LATIN1"),
            Err(Error::UnknownStemmer { .. })
        ));
    }

    #[test]
    fn exposes_the_configured_language_and_charenc() {
        let stemmer = Stemmer::new("english", "UTF_8").unwrap();
        assert_eq!(stemmer.language(), "english");
        assert_eq!(stemmer.charenc(), "UTF_8");
    }
}
