//! BM25 with query-term-frequency saturation.

use super::{ScoredDoc, Scorer};
use crate::error::{Error, Result};
use crate::index::{CollectionStatistics, DocId, InvertedIndex};
use crate::query::QueryTerms;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25 {
    /// Document term frequency saturation.
    pub k1: f64,
    /// Query term frequency saturation.
    pub k2: f64,
    /// Length normalization strength.
    pub b: f64,
}

impl Default for Bm25 {
    fn default() -> Self {
        Self { k1: 1.8, k2: 5.0, b: 0.75 }
    }
}

impl Bm25 {
    /// `ln((N - ni + 0.5) / (ni + 0.5))`. Negative once a term is in more
    /// than half the corpus; not clamped.
    pub fn idf(num_docs: f64, doc_freq: f64) -> f64 {
        ((num_docs - doc_freq + 0.5) / (doc_freq + 0.5)).ln()
    }

    pub fn tf_weight(&self, tf: f64, doc_len: f64, avgdl: f64) -> f64 {
        let k = self.k1 * ((1.0 - self.b) + self.b * (doc_len / avgdl));
        ((self.k1 + 1.0) * tf) / (k + tf)
    }

    pub fn qtf_weight(&self, qf: f64) -> f64 {
        ((self.k2 + 1.0) * qf) / (self.k2 + qf)
    }
}

impl Scorer for Bm25 {
    /// Only documents sharing at least one term with the query get an entry.
    fn score(
        &self,
        index: &InvertedIndex,
        stats: &CollectionStatistics,
        query: &QueryTerms,
    ) -> Result<Vec<ScoredDoc>> {
        let avgdl = stats.avgdl().ok_or(Error::EmptyCorpus)?;
        let n = stats.num_docs as f64;

        let mut scores: BTreeMap<DocId, f64> = BTreeMap::new();
        for (term, qf) in query.iter() {
            let postings = index.postings(term);
            if postings.is_empty() {
                continue;
            }
            let idf = Self::idf(n, postings.len() as f64);
            let qtf = self.qtf_weight(qf as f64);
            for p in postings {
                let tf = self.tf_weight(p.term_frequency() as f64, p.document_length as f64, avgdl);
                *scores.entry(p.doc_id).or_insert(0.0) += idf * tf * qtf;
            }
        }

        Ok(scores.into_iter().map(|(doc_id, score)| ScoredDoc { doc_id, score }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{build_index, Document};

    fn corpus(texts: &[&str]) -> Vec<Document> {
        texts.iter().enumerate().map(|(i, t)| Document::new(format!("d{i}"), *t)).collect()
    }

    fn query(terms: &[&str]) -> QueryTerms {
        terms.iter().copied().collect()
    }

    #[test]
    fn omits_documents_without_query_terms() {
        let (index, stats) = build_index(&corpus(&["the cat sat", "the dog sat"])).unwrap();
        let results = Bm25::default().score(&index, &stats, &query(&["cat"])).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id, 0);
    }

    #[test]
    fn unknown_terms_contribute_nothing() {
        let (index, stats) = build_index(&corpus(&["the cat sat", "the dog sat"])).unwrap();
        let results = Bm25::default().score(&index, &stats, &query(&["unicorn"])).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn higher_tf_scores_higher_at_equal_length() {
        let (index, stats) = build_index(&corpus(&[
            "cat cat dog",
            "cat dog dog",
            "bird fish eel",
            "bird fish eel",
            "bird fish eel",
        ]))
        .unwrap();
        let single = Bm25::default().score(&index, &stats, &query(&["cat"])).unwrap();
        assert_eq!(single.len(), 2);
        assert!(single[0].score > single[1].score);
        assert!(single[0].score > 0.0);
    }

    #[test]
    fn higher_tf_on_every_query_term_scores_higher() {
        let (index, stats) = build_index(&corpus(&[
            "cat cat dog dog",
            "cat dog owl bat",
            "bird fish eel owl",
            "bird fish eel bat",
            "bird fish eel ant",
        ]))
        .unwrap();
        let results = Bm25::default().score(&index, &stats, &query(&["cat", "dog"])).unwrap();
        let by_doc: BTreeMap<DocId, f64> = results.iter().map(|s| (s.doc_id, s.score)).collect();
        assert_eq!(by_doc.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert!(by_doc[&0] > by_doc[&1]);
        assert!(by_doc[&1] > 0.0);
    }

    #[test]
    fn matches_formula_by_hand() {
        let (index, stats) = build_index(&corpus(&["a b a", "b c", "c d e f"])).unwrap();
        let params = Bm25::default();
        let results = params.score(&index, &stats, &query(&["a", "a", "c"])).unwrap();

        let avgdl = 9.0 / 3.0;
        let idf_a = ((3.0 - 1.0 + 0.5) / (1.0 + 0.5_f64)).ln();
        let idf_c = ((3.0 - 2.0 + 0.5) / (2.0 + 0.5_f64)).ln();
        let k_for = |dl: f64| 1.8 * (0.25 + 0.75 * dl / avgdl);
        let qtf = |qf: f64| 6.0 * qf / (5.0 + qf);

        let d0 = idf_a * (2.8 * 2.0 / (k_for(3.0) + 2.0)) * qtf(2.0);
        let d1 = idf_c * (2.8 * 1.0 / (k_for(2.0) + 1.0)) * qtf(1.0);
        let d2 = idf_c * (2.8 * 1.0 / (k_for(4.0) + 1.0)) * qtf(1.0);

        assert_eq!(results.len(), 3);
        assert!((results[0].score - d0).abs() < 1e-12);
        assert!((results[1].score - d1).abs() < 1e-12);
        assert!((results[2].score - d2).abs() < 1e-12);
    }

    #[test]
    fn idf_goes_negative_for_common_terms() {
        let (index, stats) = build_index(&corpus(&["the cat", "the dog"])).unwrap();
        let results = Bm25::default().score(&index, &stats, &query(&["the"])).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|s| s.score < 0.0));
    }

    #[test]
    fn empty_corpus_is_an_error() {
        let (index, stats) = build_index(&[]).unwrap();
        let err = Bm25::default().score(&index, &stats, &query(&["cat"])).unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus));
    }
}
