//! In-memory retrieval core: whitespace tokenizer, positional inverted index,
//! BM25 and Dirichlet-smoothed query likelihood scoring, and top-k selection.

pub mod corpus;
pub mod error;
pub mod index;
pub mod query;
pub mod run;
pub mod scoring;
pub mod search;
pub mod tokenizer;

pub use error::{Error, Result};
pub use index::*;
pub use query::{ModelKind, Query, QueryFile, QueryTerms, RejectedRow};
pub use scoring::{Bm25, QueryLikelihood, RankingModel, RankingParams, ScoredDoc, Scorer};
pub use search::{evaluate_batch, QueryOutcome, Searcher};
