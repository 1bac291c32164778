use crate::corpus::Corpus;
use crate::stats::CorpusStats;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type TermId = u32;
pub type DocId = u32;

/// One entry in a term's postings list. `tf` is always >= 1; terms that do
/// not occur in a document have no posting for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub tf: u32,
}

/// Immutable inverted index over one corpus snapshot.
///
/// Terms are interned to dense `TermId`s through the dictionary; postings
/// lists are sorted ascending by doc id and each (term, doc) pair appears at
/// most once. A new corpus means a full rebuild, never in-place mutation.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    dictionary: HashMap<String, TermId>,
    df: Vec<u32>,
    postings: HashMap<TermId, Vec<Posting>>, // postings sorted by doc_id
    external_ids: Vec<String>,               // indexed by DocId
    stats: CorpusStats,
}

impl InvertedIndex {
    /// Single-pass build: count term occurrences per document, append one
    /// posting per distinct term, record every document's length.
    pub fn build(corpus: &Corpus) -> Self {
        let mut dictionary: HashMap<String, TermId> = HashMap::new();
        let mut df: Vec<u32> = Vec::new();
        let mut postings: HashMap<TermId, Vec<Posting>> = HashMap::new();
        let mut lengths: Vec<u32> = Vec::with_capacity(corpus.len());
        let mut external_ids: Vec<String> = Vec::with_capacity(corpus.len());

        for (doc_id, external_id, tokens) in corpus.iter() {
            lengths.push(tokens.len() as u32);
            external_ids.push(external_id.to_string());

            let mut tf_counts: HashMap<TermId, u32> = HashMap::new();
            for term in tokens {
                let tid = match dictionary.get(term.as_str()) {
                    Some(&id) => id,
                    None => {
                        let id = df.len() as TermId;
                        dictionary.insert(term.clone(), id);
                        df.push(0);
                        id
                    }
                };
                *tf_counts.entry(tid).or_insert(0) += 1;
            }
            // one df increment and one posting per distinct term
            for (tid, tf) in tf_counts {
                df[tid as usize] += 1;
                postings.entry(tid).or_default().push(Posting { doc_id, tf });
            }
        }

        tracing::debug!(num_docs = external_ids.len(), num_terms = dictionary.len(), "index built");
        Self {
            dictionary,
            df,
            postings,
            external_ids,
            stats: CorpusStats::from_lengths(lengths),
        }
    }

    /// Partitioned build: split the corpus into contiguous DocId ranges, let
    /// rayon workers build partial postings independently, then merge by
    /// term. Partitions hold disjoint doc ids, so merging concatenates and
    /// re-sorts each list; the result is identical to `build`.
    pub fn build_parallel(corpus: &Corpus) -> Self {
        if corpus.is_empty() {
            return Self::default();
        }
        let chunk = corpus.len().div_ceil(rayon::current_num_threads()).max(1);
        let partials: Vec<Partial> = corpus
            .docs()
            .par_chunks(chunk)
            .enumerate()
            .map(|(i, docs)| Partial::build((i * chunk) as DocId, docs))
            .collect();

        let mut dictionary: HashMap<String, TermId> = HashMap::new();
        let mut postings: HashMap<TermId, Vec<Posting>> = HashMap::new();
        let mut lengths: Vec<u32> = Vec::with_capacity(corpus.len());
        let mut external_ids: Vec<String> = Vec::with_capacity(corpus.len());
        for part in partials {
            lengths.extend(part.lengths);
            for (term, local_postings) in part.postings {
                let next = dictionary.len() as TermId;
                let tid = *dictionary.entry(term).or_insert(next);
                postings.entry(tid).or_default().extend(local_postings);
            }
        }
        for (_, ext, _) in corpus.iter() {
            external_ids.push(ext.to_string());
        }
        let mut df = vec![0u32; dictionary.len()];
        for (tid, plist) in postings.iter_mut() {
            plist.sort_by_key(|p| p.doc_id);
            df[*tid as usize] = plist.len() as u32;
        }

        tracing::debug!(num_docs = external_ids.len(), num_terms = dictionary.len(), "parallel index built");
        Self {
            dictionary,
            df,
            postings,
            external_ids,
            stats: CorpusStats::from_lengths(lengths),
        }
    }

    pub(crate) fn from_parts(
        dictionary: HashMap<String, TermId>,
        df: Vec<u32>,
        postings: HashMap<TermId, Vec<Posting>>,
        external_ids: Vec<String>,
        lengths: Vec<u32>,
    ) -> Self {
        Self { dictionary, df, postings, external_ids, stats: CorpusStats::from_lengths(lengths) }
    }

    pub fn num_docs(&self) -> u32 { self.stats.num_docs() }

    pub fn num_terms(&self) -> usize { self.dictionary.len() }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.dictionary.get(term).copied()
    }

    /// Document frequency; 0 for a term the index has never seen.
    pub fn df(&self, term: &str) -> u32 {
        match self.term_id(term) {
            Some(tid) => self.df[tid as usize],
            None => 0,
        }
    }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.term_id(term).and_then(|tid| self.postings.get(&tid)).map(Vec::as_slice)
    }

    pub(crate) fn postings_by_id(&self, tid: TermId) -> Option<&[Posting]> {
        self.postings.get(&tid).map(Vec::as_slice)
    }

    pub(crate) fn df_table(&self) -> &[u32] { &self.df }

    pub(crate) fn external_ids(&self) -> &[String] { &self.external_ids }

    pub fn stats(&self) -> &CorpusStats { &self.stats }

    pub fn external_id(&self, doc_id: DocId) -> &str { &self.external_ids[doc_id as usize] }

    pub fn terms(&self) -> impl Iterator<Item = (&str, TermId)> {
        self.dictionary.iter().map(|(t, &id)| (t.as_str(), id))
    }
}

/// Postings for one contiguous DocId range, keyed by term string until the
/// merge assigns global term ids.
struct Partial {
    postings: HashMap<String, Vec<Posting>>,
    lengths: Vec<u32>,
}

impl Partial {
    fn build(base: DocId, docs: &[(String, Vec<String>)]) -> Self {
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut lengths = Vec::with_capacity(docs.len());
        for (offset, (_, tokens)) in docs.iter().enumerate() {
            let doc_id = base + offset as DocId;
            lengths.push(tokens.len() as u32);
            let mut tf_counts: HashMap<&str, u32> = HashMap::new();
            for term in tokens {
                *tf_counts.entry(term.as_str()).or_insert(0) += 1;
            }
            for (term, tf) in tf_counts {
                postings.entry(term.to_string()).or_default().push(Posting { doc_id, tf });
            }
        }
        Self { postings, lengths }
    }
}
