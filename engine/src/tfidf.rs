use crate::index::InvertedIndex;
use crate::score::{ranked_from_scores, ScoredDoc};
use std::collections::HashMap;

/// Vector-space TF-IDF ranking restricted to query terms.
///
/// idf(t) = ln(N / df(t)); a query term absent from the index contributes
/// nothing rather than erroring. Score(d) is the dot product of query and
/// document weights, i.e. per term qtf * tf * idf^2. The full corpus stays
/// in the ranked list, zero-scored documents included.
pub fn tfidf_rank(index: &InvertedIndex, query_terms: &[String]) -> Vec<ScoredDoc> {
    let n = index.num_docs();
    if n == 0 {
        return Vec::new();
    }
    let mut scores = vec![0.0f32; n as usize];

    let mut query_tf: HashMap<&str, u32> = HashMap::new();
    for term in query_terms {
        *query_tf.entry(term.as_str()).or_insert(0) += 1;
    }

    for (term, qtf) in query_tf {
        let Some(plist) = index.postings(term) else { continue };
        // postings are non-empty by construction, so df > 0 here
        let idf = (n as f32 / plist.len() as f32).ln();
        let query_weight = qtf as f32 * idf;
        for p in plist {
            scores[p.doc_id as usize] += query_weight * (p.tf as f32 * idf);
        }
    }

    ranked_from_scores(scores)
}
