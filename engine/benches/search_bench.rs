use criterion::{criterion_group, criterion_main, Criterion};
use engine::bm25::{bm25_rank, Bm25Params};
use engine::tfidf::tfidf_rank;
use engine::tokenizer::tokenize;
use engine::{Corpus, InvertedIndex};

fn synthetic_corpus(num_docs: usize) -> Corpus {
    let vocab = ["search", "index", "rank", "query", "score", "corpus", "term", "model"];
    let docs = (0..num_docs).map(|i| {
        let toks: Vec<String> = (0..20).map(|j| vocab[(i * 7 + j * 3) % vocab.len()].to_string()).collect();
        (format!("doc{i}"), toks)
    });
    Corpus::from_pairs(docs).unwrap()
}

fn bench_tokenize(c: &mut Criterion) {
    let text = "Ranked retrieval engines answer queries by intersecting postings \
                lists and scoring the surviving documents with TF-IDF or BM25, \
                normalizing for document length along the way.";
    c.bench_function("tokenize_paragraph", |b| b.iter(|| tokenize(text)));
}

fn bench_ranking(c: &mut Criterion) {
    let index = InvertedIndex::build(&synthetic_corpus(2000));
    let query: Vec<String> = vec!["search".into(), "rank".into(), "model".into()];
    let params = Bm25Params::default();
    c.bench_function("bm25_rank_2k_docs", |b| b.iter(|| bm25_rank(&index, &query, &params)));
    c.bench_function("tfidf_rank_2k_docs", |b| b.iter(|| tfidf_rank(&index, &query)));
}

criterion_group!(benches, bench_tokenize, bench_ranking);
criterion_main!(benches);
