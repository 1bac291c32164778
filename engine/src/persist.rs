use crate::index::{InvertedIndex, Posting, TermId};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
}

/// On-disk layout of one index snapshot: binary files per concern plus a
/// human-readable meta file.
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn dictionary(&self) -> PathBuf { self.root.join("dictionary.bin") }
    fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    fn postings_dir(&self) -> PathBuf { self.root.join("postings") }
    fn postings_file(&self, term_id: TermId) -> PathBuf {
        self.postings_dir().join(format!("{term_id:08}.postings.bin"))
    }
}

pub fn save_dictionary(paths: &IndexPaths, dict: &(HashMap<String, TermId>, Vec<u32>)) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.dictionary())?;
    let bytes = bincode::serialize(dict)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_dictionary(paths: &IndexPaths) -> Result<(HashMap<String, TermId>, Vec<u32>)> {
    let mut f = File::open(paths.dictionary())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let dict = bincode::deserialize(&buf)?;
    Ok(dict)
}

/// Document table: external ids and token-count lengths, both indexed by DocId.
pub fn save_docs(paths: &IndexPaths, docs: &(Vec<String>, Vec<u32>)) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.docs())?;
    let bytes = bincode::serialize(docs)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_docs(paths: &IndexPaths) -> Result<(Vec<String>, Vec<u32>)> {
    let mut f = File::open(paths.docs())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let docs = bincode::deserialize(&buf)?;
    Ok(docs)
}

pub fn save_postings_for_term(paths: &IndexPaths, term_id: TermId, postings: &[Posting]) -> Result<()> {
    create_dir_all(paths.postings_dir())?;
    let mut f = File::create(paths.postings_file(term_id))?;
    let bytes = bincode::serialize(postings)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_postings_for_term(paths: &IndexPaths, term_id: TermId) -> Result<Vec<Posting>> {
    let mut f = File::open(paths.postings_file(term_id))
        .with_context(|| format!("postings file for term {term_id}"))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let postings = bincode::deserialize(&buf)?;
    Ok(postings)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Persist a full snapshot. Postings keep their term frequency so TF-IDF and
/// BM25 can run from a loaded index without recomputation.
pub fn save_index(paths: &IndexPaths, index: &InvertedIndex, created_at: String) -> Result<()> {
    let dictionary: HashMap<String, TermId> =
        index.terms().map(|(t, id)| (t.to_string(), id)).collect();
    save_dictionary(paths, &(dictionary, index.df_table().to_vec()))?;
    save_docs(paths, &(index.external_ids().to_vec(), index.stats().lengths().to_vec()))?;
    for (_, tid) in index.terms() {
        let plist = index.postings_by_id(tid).unwrap_or(&[]);
        save_postings_for_term(paths, tid, plist)?;
    }
    let meta = MetaFile { num_docs: index.num_docs(), created_at, version: FORMAT_VERSION };
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, "index snapshot saved");
    Ok(())
}

/// Load a full snapshot, refusing anything internally inconsistent rather
/// than serving a corrupt index.
pub fn load_index(paths: &IndexPaths) -> Result<InvertedIndex> {
    let meta = load_meta(paths)?;
    if meta.version != FORMAT_VERSION {
        bail!("unsupported index format version {}", meta.version);
    }
    let (dictionary, df) = load_dictionary(paths)?;
    let (external_ids, lengths) = load_docs(paths)?;
    if external_ids.len() != lengths.len() || meta.num_docs as usize != lengths.len() {
        bail!("document table and meta disagree on document count");
    }

    let mut postings: HashMap<TermId, Vec<Posting>> = HashMap::with_capacity(dictionary.len());
    for (term, &tid) in &dictionary {
        let plist = load_postings_for_term(paths, tid)?;
        let expected = df.get(tid as usize).copied().unwrap_or(0);
        if plist.len() as u32 != expected {
            bail!("df mismatch for term {term:?}: dictionary says {expected}, postings hold {}", plist.len());
        }
        postings.insert(tid, plist);
    }

    Ok(InvertedIndex::from_parts(dictionary, df, postings, external_ids, lengths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use tempfile::tempdir;

    fn build_index() -> InvertedIndex {
        let corpus = Corpus::from_pairs([
            ("alpha", vec!["nlp".to_string(), "model".to_string(), "model".to_string()]),
            ("beta", vec!["nlp".to_string(), "vision".to_string()]),
            ("gamma", vec![]),
        ])
        .unwrap();
        InvertedIndex::build(&corpus)
    }

    #[test]
    fn round_trip_preserves_postings_and_stats() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path());
        let index = build_index();
        save_index(&paths, &index, "2026-01-01T00:00:00Z".into()).unwrap();

        let loaded = load_index(&paths).unwrap();
        assert_eq!(loaded.num_docs(), index.num_docs());
        assert_eq!(loaded.num_terms(), index.num_terms());
        assert_eq!(loaded.stats().avg_doc_len(), index.stats().avg_doc_len());
        for (term, _) in index.terms() {
            assert_eq!(loaded.postings(term).unwrap(), index.postings(term).unwrap());
            assert_eq!(loaded.df(term), index.df(term));
        }
        assert_eq!(loaded.external_id(2), "gamma");
    }

    #[test]
    fn df_mismatch_refuses_to_load() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path());
        let index = build_index();
        save_index(&paths, &index, "2026-01-01T00:00:00Z".into()).unwrap();

        // truncate one postings list behind the dictionary's back
        let tid = index.term_id("nlp").unwrap();
        save_postings_for_term(&paths, tid, &[]).unwrap();
        assert!(load_index(&paths).is_err());
    }

    #[test]
    fn empty_index_round_trips() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path());
        let index = InvertedIndex::build(&Corpus::new());
        save_index(&paths, &index, "2026-01-01T00:00:00Z".into()).unwrap();
        let loaded = load_index(&paths).unwrap();
        assert_eq!(loaded.num_docs(), 0);
        assert_eq!(loaded.num_terms(), 0);
    }
}
