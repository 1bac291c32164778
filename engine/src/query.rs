use crate::bm25::{bm25_rank, Bm25Params};
use crate::boolean::boolean_retrieve;
use crate::error::QueryError;
use crate::index::InvertedIndex;
use crate::tfidf::tfidf_rank;
use crate::tokenizer;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Ranked queries return this many hits unless the caller asks otherwise.
pub const DEFAULT_TOP_K: usize = 5;

/// Retrieval strategy selector. String selectors parse through `FromStr`,
/// which is the only place `InvalidMode` can arise; past that boundary the
/// enum makes unrecognized modes unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingMode {
    Boolean,
    TfIdf,
    Bm25,
}

impl FromStr for RankingMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boolean" => Ok(Self::Boolean),
            "tfidf" => Ok(Self::TfIdf),
            "bm25" => Ok(Self::Bm25),
            _ => Err(QueryError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for RankingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::TfIdf => "tfidf",
            Self::Bm25 => "bm25",
        })
    }
}

/// One ranked hit at the query surface: external document id plus score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedHit {
    pub doc_id: String,
    pub score: f32,
}

/// What a dispatched query produces: an unranked matching set for Boolean
/// mode, a score-ordered list truncated to K for the ranked modes.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    Matches(Vec<String>),
    Ranked(Vec<RankedHit>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            Self::Matches(ids) => ids.len(),
            Self::Ranked(hits) => hits.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Run a raw query: normalize it through the same pipeline the corpus went
/// through, then dispatch on the selected mode. Empty post-normalization
/// queries are valid and flow to each component's own rule.
pub fn execute(index: &InvertedIndex, raw_query: &str, mode: RankingMode, k: usize) -> SearchResults {
    let terms = tokenizer::tokenize(raw_query);
    execute_tokens(index, &terms, mode, k)
}

/// Dispatch an already-normalized token sequence with default BM25 parameters.
pub fn execute_tokens(index: &InvertedIndex, terms: &[String], mode: RankingMode, k: usize) -> SearchResults {
    execute_tokens_with(index, terms, mode, k, &Bm25Params::default())
}

pub fn execute_tokens_with(
    index: &InvertedIndex,
    terms: &[String],
    mode: RankingMode,
    k: usize,
    bm25: &Bm25Params,
) -> SearchResults {
    match mode {
        RankingMode::Boolean => {
            let ids = boolean_retrieve(index, terms)
                .into_iter()
                .map(|doc_id| index.external_id(doc_id).to_string())
                .collect();
            SearchResults::Matches(ids)
        }
        RankingMode::TfIdf => ranked(index, tfidf_rank(index, terms), k),
        RankingMode::Bm25 => ranked(index, bm25_rank(index, terms, bm25), k),
    }
}

fn ranked(index: &InvertedIndex, hits: Vec<crate::score::ScoredDoc>, k: usize) -> SearchResults {
    let hits = hits
        .into_iter()
        .take(k)
        .map(|h| RankedHit { doc_id: index.external_id(h.doc_id).to_string(), score: h.score })
        .collect();
    SearchResults::Ranked(hits)
}
