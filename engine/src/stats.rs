use crate::index::DocId;

/// Per-corpus length statistics, recomputed on every rebuild and read-only
/// afterwards. Document frequency lives on the index itself (one counter per
/// dictionary entry); everything length-shaped lives here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusStats {
    doc_lengths: Vec<u32>,
    total_len: u64,
}

impl CorpusStats {
    pub fn from_lengths(doc_lengths: Vec<u32>) -> Self {
        let total_len = doc_lengths.iter().map(|&l| u64::from(l)).sum();
        Self { doc_lengths, total_len }
    }

    pub fn num_docs(&self) -> u32 { self.doc_lengths.len() as u32 }

    pub fn doc_len(&self, doc_id: DocId) -> u32 { self.doc_lengths[doc_id as usize] }

    pub fn lengths(&self) -> &[u32] { &self.doc_lengths }

    /// Arithmetic mean of document lengths; 0.0 for an empty corpus.
    pub fn avg_doc_len(&self) -> f32 {
        if self.doc_lengths.is_empty() {
            return 0.0;
        }
        self.total_len as f32 / self.doc_lengths.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_corpus_has_zero_average() {
        let stats = CorpusStats::from_lengths(Vec::new());
        assert_eq!(stats.num_docs(), 0);
        assert_eq!(stats.avg_doc_len(), 0.0);
    }

    #[test]
    fn average_is_arithmetic_mean() {
        let stats = CorpusStats::from_lengths(vec![2, 4, 0, 6]);
        assert_eq!(stats.num_docs(), 4);
        assert_eq!(stats.avg_doc_len(), 3.0);
        assert_eq!(stats.doc_len(2), 0);
    }
}
