use std::sync::Arc;
use std::thread;

use deepread_core::traits::{DocumentStore, Scorer};
use deepread_core::{Chunk, Document, Error};
use deepread_index::{MemoryStore, QueryTerms, TermOverlapScorer};

fn doc(id: &str, texts: &[&str]) -> Document {
    let chunks = texts
        .iter()
        .enumerate()
        .map(|(index, t)| Chunk { index, offset: index * 10, text: t.to_string() })
        .collect();
    Document::new(id, format!("{}.pdf", id), chunks)
}

#[test]
fn put_then_get_returns_document() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store.put(doc("d1", &["alpha"]))?;
    let got = store.get("d1")?;
    assert_eq!(got.filename, "d1.pdf");
    assert_eq!(got.chunks.len(), 1);
    Ok(())
}

#[test]
fn get_missing_is_not_found() {
    let store = MemoryStore::new();
    assert!(matches!(store.get("nope"), Err(Error::NotFound(_))));
}

#[test]
fn put_same_id_replaces_in_place() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store.put(doc("d1", &["first"]))?;
    store.put(doc("d2", &["second"]))?;
    store.put(doc("d1", &["replacement", "more"]))?;

    assert_eq!(store.len()?, 2);
    let ids: Vec<String> = store.all()?.map(|d| d.id.clone()).collect();
    assert_eq!(ids, vec!["d1", "d2"], "replacement keeps original position");
    assert_eq!(store.get("d1")?.chunks[0].text, "replacement");
    Ok(())
}

#[test]
fn clear_empties_store() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store.put(doc("d1", &["a"]))?;
    store.put(doc("d2", &["b"]))?;
    store.clear()?;
    assert!(store.is_empty()?);
    assert_eq!(store.all()?.count(), 0);
    assert!(store.get("d1").is_err());
    Ok(())
}

#[test]
fn snapshot_is_unaffected_by_later_writes() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store.put(doc("d1", &["a"]))?;
    let snapshot = store.all()?;
    store.clear()?;
    store.put(doc("d3", &["c"]))?;
    let ids: Vec<String> = snapshot.map(|d| d.id.clone()).collect();
    assert_eq!(ids, vec!["d1"]);
    Ok(())
}

#[test]
fn concurrent_writers_keep_one_record_per_id() -> anyhow::Result<()> {
    let store = MemoryStore::shared();
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    let id = format!("doc{}", i % 10);
                    let text = format!("writer {}", t);
                    store.put(doc(&id, &[text.as_str()])).expect("put");
                }
            })
        })
        .collect();
    for h in handles { h.join().expect("join"); }
    assert_eq!(store.len()?, 10);
    for d in store.all()? { assert_eq!(d.chunks.len(), 1); }
    Ok(())
}

#[test]
fn query_terms_drop_short_tokens() {
    let terms = QueryTerms::parse("  What IS the  Jumps\tlazy fox  ", 4);
    assert_eq!(terms.terms(), ["what", "jumps", "lazy"]);
    assert!(QueryTerms::parse("a an the", 4).is_empty());
    assert!(QueryTerms::parse("", 4).is_empty());
}

#[test]
fn score_counts_substring_matches_case_insensitively() {
    let scorer = TermOverlapScorer::default();
    let q = scorer.parse("jumps lazy");
    let chunk = Chunk { index: 0, offset: 0, text: "The quick brown fox JUMPS over the Lazy dog.".into() };
    assert_eq!(scorer.score(&q, &chunk), 2);

    let q = scorer.parse("category");
    assert_eq!(scorer.score_text(&q, "see the CATEGORY list"), 1);
    // Substring, not word boundary.
    let q = scorer.parse("cate");
    assert_eq!(scorer.score_text(&q, "category"), 1);
}

#[test]
fn score_is_zero_without_matches_or_terms() {
    let scorer = TermOverlapScorer::default();
    assert_eq!(scorer.score_text(&scorer.parse("elephant"), "no match here"), 0);
    assert_eq!(scorer.score_text(&scorer.parse("the fox"), "the fox"), 0);
}

#[test]
fn adding_matching_terms_never_lowers_score() {
    let scorer = TermOverlapScorer::default();
    let text = "retrieval augmented generation with overlapping chunks";
    let mut query = String::new();
    let mut last = 0;
    for word in ["retrieval", "banana", "chunks", "overlapping", "zebra", "generation"] {
        query.push_str(word);
        query.push(' ');
        let s = scorer.score_text(&scorer.parse(&query), text);
        assert!(s >= last, "score dropped after adding '{}'", word);
        last = s;
    }
    assert_eq!(last, 4);
}

#[test]
fn repeated_query_tokens_each_count() {
    let scorer = TermOverlapScorer::default();
    assert_eq!(scorer.score_text(&scorer.parse("jumps jumps"), "fox jumps"), 2);
}
