use crate::index::DocId;

/// A ranked hit over internal doc ids. Drivers map to external identifiers
/// at the query boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f32,
}

/// Shared ordering rule for both ranked scorers: descending score, ties
/// broken ascending by doc id. Every document stays in the list, zero
/// scores included; callers truncate to top-K.
pub(crate) fn ranked_from_scores(scores: Vec<f32>) -> Vec<ScoredDoc> {
    let mut hits: Vec<ScoredDoc> = scores
        .into_iter()
        .enumerate()
        .map(|(doc_id, score)| ScoredDoc { doc_id: doc_id as DocId, score })
        .collect();
    hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.doc_id.cmp(&b.doc_id)));
    hits
}
