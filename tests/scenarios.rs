//! The literal build/query/persistence scenarios this crate is expected to satisfy.
//! Tokenizer-only behavior (Unicode case folding, space collapsing) is instead
//! covered by the unit tests colocated with `tokenizer::tokenize`, since the
//! tokenizer is not part of the public API.

use lexifuse::{Error, QueryOptions, QueryType, ResultPayload, TextIndex, TextIndexConfig};

fn build_basic_corpus() -> TextIndex {
    let mut index = TextIndex::init(TextIndexConfig::new()).unwrap();
    index.insert("Hallo welt");
    index.insert("dies ist ein test");
    index.index().unwrap();
    index
}

#[test]
fn contains_finds_inserted_words_case_insensitively() {
    let index = build_basic_corpus();

    assert!(index.contains("Hallo").unwrap());
    assert!(index.contains("hallo").unwrap());
    assert!(index.contains("test").unwrap());
    assert!(!index.contains("boo").unwrap());
}

#[test]
fn contains_rejects_malformed_search_words() {
    let index = build_basic_corpus();

    assert!(matches!(index.contains("Hallo googog)"), Err(Error::MoreThanOneWord)));
    assert!(matches!(index.contains("        "), Err(Error::EmptySearchWord)));
}

#[test]
fn or_query_returns_every_document_containing_any_term_in_insertion_order() {
    let index = build_basic_corpus();

    let mut hits = Vec::new();
    let count =
        index.query("Hallo test", &mut hits, QueryOptions { query_type: QueryType::Any });
    assert_eq!(count, 2);

    let texts: Vec<&str> = hits.iter().filter_map(ResultPayload::as_text).collect();
    assert_eq!(texts, vec!["Hallo welt", "dies ist ein test"]);

    let mut hits = Vec::new();
    let count = index.query("boo", &mut hits, QueryOptions { query_type: QueryType::Any });
    assert_eq!(count, 0);
    assert!(hits.is_empty());
}

#[test]
fn and_query_returns_only_documents_containing_every_term() {
    let mut index = TextIndex::init(TextIndexConfig::new()).unwrap();
    index.insert("Hallo welt test");
    index.insert("dies ist ein test");
    index.index().unwrap();

    let mut hits = Vec::new();
    let count =
        index.query("Hallo test", &mut hits, QueryOptions { query_type: QueryType::All });

    assert_eq!(count, 1);
    assert_eq!(hits[0].as_text(), Some("Hallo welt test"));
}

#[test]
fn save_and_load_round_trip_preserves_query_observations() {
    let index = build_basic_corpus();

    let dir = tempfile::tempdir().unwrap();
    index.save(dir.path(), "index.bin").unwrap();

    let loaded = TextIndex::load(dir.path(), "index.bin", TextIndexConfig::new()).unwrap();

    assert!(loaded.contains("Hallo").unwrap());
    assert!(loaded.contains("hallo").unwrap());
    assert!(loaded.contains("test").unwrap());
    assert!(!loaded.contains("boo").unwrap());

    let mut hits = Vec::new();
    let count =
        loaded.query("Hallo test", &mut hits, QueryOptions { query_type: QueryType::Any });
    assert_eq!(count, 2);
}

#[test]
fn loads_rejects_a_stream_with_the_wrong_format_version() {
    let mut bad_stream = vec![9u8, 0]; // version = 9
    bad_stream.extend_from_slice(&[0u8; 32]);

    let result = TextIndex::loads(&bad_stream, TextIndexConfig::new());
    assert!(matches!(result, Err(Error::VersionMismatch { .. })));
}
