//! Ranking models and top-k selection.
//!
//! Every scorer is a pure function of (index, statistics, query terms): scores
//! accumulate in query-local maps and the index is only ever read, so the same
//! index can serve any number of concurrent queries.

pub mod bm25;
pub mod ql;
pub mod topk;

pub use bm25::Bm25;
pub use ql::QueryLikelihood;
pub use topk::top_k;

use crate::error::{Error, Result};
use crate::index::{CollectionStatistics, DocId, InvertedIndex};
use crate::query::{ModelKind, QueryTerms};

/// Number of results kept per query.
pub const DEFAULT_TOP_K: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

pub trait Scorer: Send + Sync {
    /// Score documents against `query`, in corpus order.
    fn score(
        &self,
        index: &InvertedIndex,
        stats: &CollectionStatistics,
        query: &QueryTerms,
    ) -> Result<Vec<ScoredDoc>>;
}

/// Closed set of ranking models with their parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RankingModel {
    Bm25(Bm25),
    QueryLikelihood(QueryLikelihood),
}

impl Scorer for RankingModel {
    fn score(
        &self,
        index: &InvertedIndex,
        stats: &CollectionStatistics,
        query: &QueryTerms,
    ) -> Result<Vec<ScoredDoc>> {
        match self {
            RankingModel::Bm25(m) => m.score(index, stats, query),
            RankingModel::QueryLikelihood(m) => m.score(index, stats, query),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingParams {
    pub bm25: Bm25,
    pub ql: QueryLikelihood,
    pub top_k: usize,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self { bm25: Bm25::default(), ql: QueryLikelihood::default(), top_k: DEFAULT_TOP_K }
    }
}

impl RankingParams {
    /// Reject parameters that would make scores NaN or meaningless:
    /// `k1`, `k2` and `mu` must be positive, `b` within `[0, 1]`, `top_k` at least 1.
    pub fn validate(&self) -> Result<()> {
        let positive = [("k1", self.bm25.k1), ("k2", self.bm25.k2), ("mu", self.ql.mu)];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParameter(format!("{name} must be positive, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.bm25.b) {
            return Err(Error::InvalidParameter(format!("b must be within [0, 1], got {}", self.bm25.b)));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidParameter("top_k must be at least 1".into()));
        }
        Ok(())
    }

    pub fn model(&self, kind: ModelKind) -> RankingModel {
        match kind {
            ModelKind::Bm25 => RankingModel::Bm25(self.bm25),
            ModelKind::Ql => RankingModel::QueryLikelihood(self.ql),
        }
    }
}
