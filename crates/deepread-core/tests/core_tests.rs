use std::fs;
use std::io::Write;
use tempfile::TempDir;

use deepread_core::config::Config;
use deepread_core::data_processor::DataProcessor;
use deepread_core::{chunk_text, Chunker, ChunkingConfig, Error, ScoredResult};

fn fox_text() -> String {
    "The quick brown fox jumps over the lazy dog. ".repeat(3)
}

#[test]
fn short_text_becomes_single_chunk() {
    let text = fox_text();
    assert_eq!(text.chars().count(), 135);
    let chunks = chunk_text(&text, ChunkingConfig::default()).expect("chunk");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, text);
    assert_eq!(chunks[0].offset, 0);
}

#[test]
fn empty_text_yields_no_chunks() {
    let chunks = chunk_text("", ChunkingConfig::default()).expect("chunk");
    assert!(chunks.is_empty());
}

#[test]
fn windows_advance_by_size_minus_overlap() {
    let text: String = ('a'..='z').cycle().take(25).collect();
    let chunker = Chunker::new(ChunkingConfig::new(10, 4).expect("config")).expect("chunker");
    let chunks = chunker.chunk(&text);

    let offsets: Vec<usize> = chunks.iter().map(|c| c.offset).collect();
    assert_eq!(offsets, vec![0, 6, 12, 18, 24]);
    assert_eq!(chunks[0].text.len(), 10);
    // Last window runs to the end of the text.
    assert_eq!(chunks[4].text, "y");
    for (i, c) in chunks.iter().enumerate() { assert_eq!(c.index, i); }
}

#[test]
fn text_of_exact_chunk_length_keeps_trailing_overlap_window() {
    let text = "x".repeat(1000);
    let chunks = chunk_text(&text, ChunkingConfig::default()).expect("chunk");
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[1].offset, 800);
    assert_eq!(chunks[1].text.len(), 200);
}

#[test]
fn overlap_regions_are_reproduced_verbatim() {
    let text: String = (0..2600).map(|i| char::from(b'a' + (i % 23) as u8)).collect();
    let config = ChunkingConfig::default();
    let chunks = chunk_text(&text, config).expect("chunk");
    assert!(chunks.len() >= 3);
    for pair in chunks.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.text.chars().count() < config.chunk_size { continue; }
        let prev_tail: String = prev.text.chars().skip(config.chunk_size - config.overlap).collect();
        let next_head: String = next.text.chars().take(config.overlap).collect();
        assert_eq!(prev_tail, next_head, "overlap between chunk {} and {}", prev.index, next.index);
    }
}

#[test]
fn chunking_is_deterministic() {
    let text = "lorem ipsum dolor sit amet ".repeat(200);
    let a = chunk_text(&text, ChunkingConfig::default()).expect("chunk");
    let b = chunk_text(&text, ChunkingConfig::default()).expect("chunk");
    assert_eq!(a, b);
}

#[test]
fn multibyte_text_splits_on_character_boundaries() {
    let text = "héllo wörld ünïcödé ".repeat(10);
    let chunks = chunk_text(&text, ChunkingConfig::new(7, 2).expect("config")).expect("chunk");
    for c in &chunks {
        assert!(c.text.chars().count() <= 7);
    }
    // Concatenating each window's non-overlapping head rebuilds the text.
    let rebuilt: String = chunks.iter().map(|c| c.text.chars().take(5).collect::<String>()).collect();
    assert_eq!(rebuilt, text);
    assert_eq!(chunks[0].text, "héllo w");
    assert_eq!(chunks[1].offset, 5);
}

#[test]
fn offsets_count_characters_not_bytes() {
    // Three-byte characters: byte and character positions diverge quickly.
    let text = "日本語のテキスト".repeat(5);
    let chunks = chunk_text(&text, ChunkingConfig::new(12, 3).expect("config")).expect("chunk");
    let offsets: Vec<usize> = chunks.iter().map(|c| c.offset).collect();
    assert_eq!(offsets, vec![0, 9, 18, 27, 36]);
    for c in &chunks {
        let expected: String = text.chars().skip(c.offset).take(12).collect();
        assert_eq!(c.text, expected, "chunk {}", c.index);
    }
    assert_eq!(chunks[4].text.chars().count(), 4);
}

#[test]
fn overlap_not_smaller_than_length_is_config_error() {
    for (size, overlap) in [(100, 100), (100, 150), (0, 0)] {
        let err = chunk_text("some text", ChunkingConfig { chunk_size: size, overlap }).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "size={} overlap={} -> {:?}", size, overlap, err);
    }
    assert!(ChunkingConfig::new(10, 10).is_err());
}

#[test]
fn scored_result_serializes_with_camel_case_keys() {
    let r = ScoredResult { doc_id: "d1".into(), filename: "a.pdf".into(), text: "t".into(), score: 2, chunk_index: 3 };
    let v = serde_json::to_value(&r).expect("json");
    assert_eq!(v, serde_json::json!({ "docId": "d1", "filename": "a.pdf", "text": "t", "score": 2 }));
}

#[test]
fn settings_default_without_any_file() {
    let config = Config::from_toml_str("");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.retrieval.top_k, 5);
    assert_eq!(settings.retrieval.chunking(), ChunkingConfig::default());
    assert_eq!(settings.server.port, 3000);
    assert!(settings.providers.openai_api_key.is_none());
}

#[test]
fn settings_read_from_toml() {
    let config = Config::from_toml_str(
        r#"
        [server]
        port = 8088
        static_dir = "./public"

        [retrieval]
        chunk_size = 500
        chunk_overlap = 50
        top_k = 3
        "#,
    );
    let settings = config.settings().expect("settings");
    assert_eq!(settings.server.bind_addr(), "127.0.0.1:8088");
    assert_eq!(settings.retrieval.chunking(), ChunkingConfig { chunk_size: 500, overlap: 50 });
    assert_eq!(settings.retrieval.top_k, 3);
    assert_eq!(config.get::<usize>("retrieval.chunk_size").expect("key"), 500);
}

#[test]
fn settings_reject_non_terminating_chunking() {
    let config = Config::from_toml_str("[retrieval]\nchunk_size = 100\nchunk_overlap = 100\n");
    assert!(config.settings().is_err());
    let config = Config::from_toml_str("[retrieval]\ntop_k = 0\n");
    assert!(config.settings().is_err());
}

#[test]
fn process_directory_reads_txt_files_in_order() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("papers")).unwrap();
    let mut f = fs::File::create(dir.join("papers/b.txt")).unwrap();
    writeln!(f, "bravo text").unwrap();
    fs::write(dir.join("a.txt"), "alpha text").unwrap();
    fs::write(dir.join("notes.md"), "ignored").unwrap();

    let sources = DataProcessor::new().process_directory(dir).expect("process");
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].doc_id, "a");
    assert_eq!(sources[0].filename, "a.txt");
    assert_eq!(sources[1].doc_id, "papers/b");
    assert_eq!(sources[1].text.trim(), "bravo text");
}

#[test]
fn process_directory_with_limit() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "alpha bravo").unwrap();
    fs::write(dir.join("b.txt"), "charlie delta").unwrap();

    let sources = DataProcessor::with_limit(1).process_directory(dir).expect("process limited");
    assert_eq!(sources.len(), 1, "limited to one source document");
}
