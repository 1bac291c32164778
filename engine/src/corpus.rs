use crate::error::IndexError;
use crate::index::DocId;
use std::collections::HashMap;

/// One corpus snapshot: already-normalized documents in ingestion order,
/// owned for the lifetime of a single index build.
///
/// Internal `DocId`s are assigned densely in push order; external ids are
/// unique within the snapshot or the push fails.
#[derive(Debug, Default)]
pub struct Corpus {
    docs: Vec<(String, Vec<String>)>,
    id_map: HashMap<String, DocId>,
}

impl Corpus {
    pub fn new() -> Self { Self::default() }

    /// Add a document. A repeated external id aborts the build with
    /// `DuplicateDocument` rather than overwriting or merging.
    pub fn push(&mut self, external_id: impl Into<String>, tokens: Vec<String>) -> Result<DocId, IndexError> {
        let external_id = external_id.into();
        if self.id_map.contains_key(&external_id) {
            return Err(IndexError::DuplicateDocument(external_id));
        }
        let doc_id = self.docs.len() as DocId;
        self.id_map.insert(external_id.clone(), doc_id);
        self.docs.push((external_id, tokens));
        Ok(doc_id)
    }

    /// Assemble a snapshot from an ordered (id, tokens) stream.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: Into<String>,
    {
        let mut corpus = Self::new();
        for (id, tokens) in pairs {
            corpus.push(id, tokens)?;
        }
        Ok(corpus)
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn external_id(&self, doc_id: DocId) -> &str { &self.docs[doc_id as usize].0 }

    pub fn tokens(&self, doc_id: DocId) -> &[String] { &self.docs[doc_id as usize].1 }

    pub fn doc_id(&self, external_id: &str) -> Option<DocId> {
        self.id_map.get(external_id).copied()
    }

    /// Documents in `DocId` order, for partitioned builds.
    pub(crate) fn docs(&self) -> &[(String, Vec<String>)] { &self.docs }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &str, &[String])> {
        self.docs
            .iter()
            .enumerate()
            .map(|(i, (id, toks))| (i as DocId, id.as_str(), toks.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn assigns_dense_ids_in_order() {
        let mut c = Corpus::new();
        assert_eq!(c.push("a", toks(&["x"])).unwrap(), 0);
        assert_eq!(c.push("b", toks(&["y"])).unwrap(), 1);
        assert_eq!(c.doc_id("b"), Some(1));
        assert_eq!(c.external_id(0), "a");
    }

    #[test]
    fn rejects_duplicate_external_id() {
        let err = Corpus::from_pairs([("A", toks(&["x"])), ("A", toks(&["y"]))]).unwrap_err();
        assert_eq!(err, IndexError::DuplicateDocument("A".into()));
    }

    #[test]
    fn accepts_empty_documents() {
        let mut c = Corpus::new();
        c.push("empty", Vec::new()).unwrap();
        assert_eq!(c.len(), 1);
        assert!(c.tokens(0).is_empty());
    }
}
