use crate::index::InvertedIndex;
use crate::score::{ranked_from_scores, ScoredDoc};
use std::collections::HashSet;

/// Okapi BM25 parameters: `k1` controls term-frequency saturation, `b` the
/// strength of document-length normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// Okapi BM25 ranking over distinct query terms.
///
/// Uses the smoothed idf(t) = ln((N - df + 0.5) / (df + 0.5) + 1), which
/// stays non-negative for every df in [0, N]. When avgLen = 0 the length
/// normalization factor is held at 1 instead of dividing by zero. Inclusion
/// and tie-break rules match the TF-IDF scorer.
pub fn bm25_rank(index: &InvertedIndex, query_terms: &[String], params: &Bm25Params) -> Vec<ScoredDoc> {
    let n = index.num_docs();
    if n == 0 {
        return Vec::new();
    }
    let mut scores = vec![0.0f32; n as usize];
    let avg_len = index.stats().avg_doc_len();

    let distinct: HashSet<&str> = query_terms.iter().map(String::as_str).collect();
    for term in distinct {
        let Some(plist) = index.postings(term) else { continue };
        let df = plist.len() as f32;
        let idf = ((n as f32 - df + 0.5) / (df + 0.5) + 1.0).ln();
        for p in plist {
            let tf = p.tf as f32;
            let len_norm = if avg_len > 0.0 {
                1.0 - params.b + params.b * index.stats().doc_len(p.doc_id) as f32 / avg_len
            } else {
                1.0
            };
            scores[p.doc_id as usize] += idf * (tf * (params.k1 + 1.0)) / (tf + params.k1 * len_norm);
        }
    }

    ranked_from_scores(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::index::InvertedIndex;

    fn index(docs: &[(&str, &[&str])]) -> InvertedIndex {
        let corpus = Corpus::from_pairs(
            docs.iter().map(|(id, toks)| (*id, toks.iter().map(|t| t.to_string()).collect())),
        )
        .unwrap();
        InvertedIndex::build(&corpus)
    }

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn smoothed_idf_is_finite_when_df_equals_n() {
        // N = 1, df = 1: idf = ln(0.5 / 1.5 + 1) = ln(4/3)
        let idx = index(&[("A", &["term"])]);
        let hits = bm25_rank(&idx, &terms(&["term"]), &Bm25Params::default());
        assert_eq!(hits.len(), 1);
        let expected_idf = (4.0f32 / 3.0).ln(); // ~0.2877
        // single occurrence, len == avgLen, so tf-saturation factor is 1
        assert!((hits[0].score - expected_idf).abs() < 1e-4, "score {}", hits[0].score);
        assert!(hits[0].score > 0.0);
    }

    #[test]
    fn higher_tf_ranks_first() {
        let idx = index(&[("A", &["rust", "rust", "rust"]), ("B", &["rust", "go"])]);
        let hits = bm25_rank(&idx, &terms(&["rust"]), &Bm25Params::default());
        assert_eq!(hits[0].doc_id, 0);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn shorter_documents_win_at_equal_tf() {
        let idx = index(&[
            ("A", &["x", "pad", "pad", "pad", "pad", "pad"]),
            ("B", &["x"]),
        ]);
        let hits = bm25_rank(&idx, &terms(&["x"]), &Bm25Params::default());
        assert_eq!(hits[0].doc_id, 1);
    }

    #[test]
    fn b_zero_disables_length_normalization() {
        let idx = index(&[("A", &["x", "pad", "pad", "pad"]), ("B", &["x"])]);
        let params = Bm25Params { k1: 1.5, b: 0.0 };
        let hits = bm25_rank(&idx, &terms(&["x"]), &params);
        assert!((hits[0].score - hits[1].score).abs() < 1e-6);
    }

    #[test]
    fn all_empty_documents_score_zero_without_panicking() {
        // avgLen = 0 exercises the disabled-normalization branch
        let idx = index(&[("A", &[]), ("B", &[])]);
        assert_eq!(idx.stats().avg_doc_len(), 0.0);
        let hits = bm25_rank(&idx, &terms(&["anything"]), &Bm25Params::default());
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.score == 0.0 && h.score.is_finite()));
    }

    #[test]
    fn scores_are_non_negative_even_for_ubiquitous_terms() {
        let idx = index(&[("A", &["t"]), ("B", &["t"]), ("C", &["t"])]);
        for hit in bm25_rank(&idx, &terms(&["t"]), &Bm25Params::default()) {
            assert!(hit.score >= 0.0);
        }
    }

    #[test]
    fn empty_corpus_yields_empty_ranking() {
        let idx = InvertedIndex::build(&Corpus::new());
        assert!(bm25_rank(&idx, &terms(&["x"]), &Bm25Params::default()).is_empty());
    }

    #[test]
    fn duplicate_query_terms_do_not_double_count() {
        let idx = index(&[("A", &["x"]), ("B", &["y"])]);
        let once = bm25_rank(&idx, &terms(&["x"]), &Bm25Params::default());
        let twice = bm25_rank(&idx, &terms(&["x", "x"]), &Bm25Params::default());
        assert_eq!(once, twice);
    }
}
