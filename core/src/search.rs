use crate::error::Result;
use crate::index::{build_index_with, CollectionStatistics, Document, IndexOptions, InvertedIndex};
use crate::query::{ModelKind, Query, QueryTerms};
use crate::scoring::{top_k, RankingParams, ScoredDoc, Scorer};
use rayon::prelude::*;

/// A built index plus the parameters used to rank against it.
#[derive(Debug)]
pub struct Searcher {
    index: InvertedIndex,
    stats: CollectionStatistics,
    params: RankingParams,
}

impl Searcher {
    pub fn new(index: InvertedIndex, stats: CollectionStatistics, params: RankingParams) -> Self {
        Self { index, stats, params }
    }

    /// Validate `params`, then build the index from `documents`.
    pub fn from_documents(documents: &[Document], options: IndexOptions, params: RankingParams) -> Result<Self> {
        params.validate()?;
        let (index, stats) = build_index_with(documents, options)?;
        Ok(Self::new(index, stats, params))
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn stats(&self) -> &CollectionStatistics {
        &self.stats
    }

    pub fn params(&self) -> &RankingParams {
        &self.params
    }

    pub fn search(&self, query: &Query) -> Result<Vec<ScoredDoc>> {
        self.rank(query.model, &query.terms)
    }

    /// Score with the selected model, then keep the top `params.top_k`.
    pub fn rank(&self, model: ModelKind, terms: &QueryTerms) -> Result<Vec<ScoredDoc>> {
        let scored = self.params.model(model).score(&self.index, &self.stats, terms)?;
        let matched = scored.len();
        let results = top_k(scored, self.params.top_k);
        tracing::debug!(?model, terms = terms.len(), matched, returned = results.len(), "query ranked");
        Ok(results)
    }
}

#[derive(Debug)]
pub struct QueryOutcome<'q> {
    pub query: &'q Query,
    pub results: Result<Vec<ScoredDoc>>,
}

/// Evaluate every query in parallel. A failing query only fails its own
/// outcome. Outcomes come back in input order.
pub fn evaluate_batch<'q>(searcher: &Searcher, queries: &'q [Query]) -> Vec<QueryOutcome<'q>> {
    let outcomes: Vec<QueryOutcome<'q>> = queries
        .par_iter()
        .map(|query| QueryOutcome { query, results: searcher.search(query) })
        .collect();
    let failed = outcomes.iter().filter(|o| o.results.is_err()).count();
    tracing::info!(queries = outcomes.len(), failed, "batch evaluated");
    outcomes
}
