pub mod bm25;
pub mod boolean;
pub mod corpus;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod score;
pub mod snapshot;
pub mod stats;
pub mod tfidf;
pub mod tokenizer;

pub use corpus::Corpus;
pub use error::{IndexError, QueryError};
pub use index::{DocId, InvertedIndex, Posting, TermId};
pub use query::{RankedHit, RankingMode, SearchResults, DEFAULT_TOP_K};
pub use score::ScoredDoc;
pub use snapshot::SharedIndex;
