use crate::index::{DocId, InvertedIndex, Posting};
use std::collections::HashSet;

/// Conjunctive (AND) retrieval: the set of doc ids containing every distinct
/// query term, ascending by doc id. Unranked.
///
/// An empty query matches no documents. A vacuous AND would match the whole
/// corpus, but an empty query carries no constraint the user meant to
/// express, so the engine treats it as matching nothing.
pub fn boolean_retrieve(index: &InvertedIndex, query_terms: &[String]) -> Vec<DocId> {
    if query_terms.is_empty() {
        return Vec::new();
    }

    // duplicate query tokens collapse to one constraint
    let distinct: HashSet<&str> = query_terms.iter().map(String::as_str).collect();
    let mut lists: Vec<&[Posting]> = Vec::with_capacity(distinct.len());
    for term in distinct {
        match index.postings(term) {
            Some(plist) => lists.push(plist),
            // a term with no postings empties the intersection outright
            None => return Vec::new(),
        }
    }

    // smallest list first bounds the candidate set
    lists.sort_by_key(|plist| plist.len());
    let mut result: Vec<DocId> = lists[0].iter().map(|p| p.doc_id).collect();
    for plist in &lists[1..] {
        result.retain(|&doc_id| plist.binary_search_by_key(&doc_id, |p| p.doc_id).is_ok());
        if result.is_empty() {
            break;
        }
    }
    // postings are ascending by doc_id, so the intersection already is
    result
}
