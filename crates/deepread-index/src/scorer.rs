use deepread_core::traits::Scorer;
use deepread_core::types::Chunk;

/// Tokens shorter than this many characters are dropped from queries.
pub const DEFAULT_MIN_TERM_CHARS: usize = 4;

/// Lower-cased query tokens that survived the length filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryTerms {
    terms: Vec<String>,
}

impl QueryTerms {
    pub fn parse(query: &str, min_chars: usize) -> Self {
        let terms = query
            .to_lowercase()
            .split_whitespace()
            .filter(|t| t.chars().count() >= min_chars)
            .map(str::to_string)
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] { &self.terms }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
}

/// Counts how many query tokens occur as substrings of the lower-cased chunk.
///
/// Substring, not word match: "cat" hits "category". No term frequency, IDF
/// or stemming. Repeated query tokens each count.
#[derive(Debug, Clone, Copy)]
pub struct TermOverlapScorer {
    min_term_chars: usize,
}

impl Default for TermOverlapScorer {
    fn default() -> Self { Self { min_term_chars: DEFAULT_MIN_TERM_CHARS } }
}

impl TermOverlapScorer {
    pub fn new(min_term_chars: usize) -> Self { Self { min_term_chars } }

    pub fn score_text(&self, terms: &QueryTerms, text: &str) -> u32 {
        if terms.is_empty() { return 0; }
        let haystack = text.to_lowercase();
        terms.terms.iter().filter(|t| haystack.contains(t.as_str())).count() as u32
    }
}

impl Scorer for TermOverlapScorer {
    type Query = QueryTerms;

    fn parse(&self, query: &str) -> QueryTerms {
        QueryTerms::parse(query, self.min_term_chars)
    }

    fn score(&self, query: &QueryTerms, chunk: &Chunk) -> u32 {
        self.score_text(query, &chunk.text)
    }
}
