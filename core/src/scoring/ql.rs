//! Query likelihood with Dirichlet smoothing.

use super::{ScoredDoc, Scorer};
use crate::error::{Error, Result};
use crate::index::{find_posting, CollectionStatistics, DocId, InvertedIndex, Posting};
use crate::query::QueryTerms;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryLikelihood {
    /// Dirichlet prior strength.
    pub mu: f64,
}

impl Default for QueryLikelihood {
    fn default() -> Self {
        Self { mu: 300.0 }
    }
}

impl Scorer for QueryLikelihood {
    /// Every document gets exactly one entry. Each distinct query term adds
    /// `ln((fqi + mu * cqi / |C|) / (|D| + mu))` once per document; terms
    /// that never occur in the corpus are left out.
    fn score(
        &self,
        index: &InvertedIndex,
        stats: &CollectionStatistics,
        query: &QueryTerms,
    ) -> Result<Vec<ScoredDoc>> {
        if stats.num_docs == 0 || stats.collection_length == 0 {
            return Err(Error::EmptyCorpus);
        }
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let collection_length = stats.collection_length as f64;

        // (postings, mu * background probability) per scorable term
        let terms: Vec<(&[Posting], f64)> = query
            .iter()
            .filter_map(|(term, _)| {
                let cqi = stats.collection_frequency(term);
                (cqi > 0).then(|| (index.postings(term), self.mu * cqi as f64 / collection_length))
            })
            .collect();
        if terms.len() < query.len() {
            tracing::debug!(
                skipped = query.len() - terms.len(),
                "query terms absent from corpus left out of QL scoring"
            );
        }

        let results = index
            .docs()
            .iter()
            .enumerate()
            .map(|(i, meta)| {
                let doc_id = i as DocId;
                let denom = meta.length as f64 + self.mu;
                // fold from +0.0: an empty f64 sum is -0.0
                let score = terms.iter().fold(0.0, |acc, (postings, smoothing)| {
                    let fqi = find_posting(postings, doc_id).map_or(0, Posting::term_frequency);
                    acc + ((fqi as f64 + smoothing) / denom).ln()
                });
                ScoredDoc { doc_id, score }
            })
            .collect();
        Ok(results)
    }
}
