use crate::error::{Error, Result};
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub type DocId = u32;

/// A corpus document as handed over by the corpus reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "sceneId", alias = "id")]
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocMeta {
    pub external_id: String,
    /// Token count at build time.
    pub length: u32,
}

/// Occurrences of one term within one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    /// Strictly increasing token offsets, never empty.
    pub positions: Vec<u32>,
    pub document_length: u32,
}

impl Posting {
    pub fn term_frequency(&self) -> u32 {
        self.positions.len() as u32
    }
}

/// Find the posting for `doc_id` in a list sorted by doc id.
pub fn find_posting(postings: &[Posting], doc_id: DocId) -> Option<&Posting> {
    postings
        .binary_search_by_key(&doc_id, |p| p.doc_id)
        .ok()
        .map(|i| &postings[i])
}

/// Term to postings mapping. Read-only once built.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>, // postings sorted by doc_id
    docs: Vec<DocMeta>,
}

impl InvertedIndex {
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn posting(&self, term: &str, doc_id: DocId) -> Option<&Posting> {
        find_posting(self.postings(term), doc_id)
    }

    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings(term).len()
    }

    pub fn term_frequency(&self, term: &str, doc_id: DocId) -> u32 {
        self.posting(term, doc_id).map_or(0, Posting::term_frequency)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn docs(&self) -> &[DocMeta] {
        &self.docs
    }

    pub fn doc(&self, doc_id: DocId) -> Option<&DocMeta> {
        self.docs.get(doc_id as usize)
    }

    pub fn external_id(&self, doc_id: DocId) -> Option<&str> {
        self.doc(doc_id).map(|d| d.external_id.as_str())
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }
}

/// Corpus-wide counts gathered while building the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStatistics {
    pub num_docs: u32,
    /// Total token count across the corpus.
    pub collection_length: u64,
    pub term_collection_frequency: HashMap<String, u64>,
}

impl CollectionStatistics {
    /// Average document length, `None` for an empty corpus.
    pub fn avgdl(&self) -> Option<f64> {
        if self.num_docs == 0 {
            return None;
        }
        Some(self.collection_length as f64 / self.num_docs as f64)
    }

    pub fn collection_frequency(&self, term: &str) -> u64 {
        self.term_collection_frequency.get(term).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexOptions {
    /// Reject documents that tokenize to nothing instead of indexing them
    /// with zero length.
    pub require_non_empty: bool,
}

pub fn build_index(documents: &[Document]) -> Result<(InvertedIndex, CollectionStatistics)> {
    build_index_with(documents, IndexOptions::default())
}

/// Build the index and statistics in one pass over `documents`.
///
/// Doc ids are assigned in corpus order, so every posting list comes out
/// sorted by doc id.
pub fn build_index_with(
    documents: &[Document],
    options: IndexOptions,
) -> Result<(InvertedIndex, CollectionStatistics)> {
    let mut index = InvertedIndex::default();
    let mut stats = CollectionStatistics::default();
    let mut seen_ids: HashSet<&str> = HashSet::with_capacity(documents.len());

    for (i, doc) in documents.iter().enumerate() {
        if doc.id.is_empty() {
            return Err(Error::InvalidDocument(format!("document #{i} has an empty identifier")));
        }
        if !seen_ids.insert(doc.id.as_str()) {
            return Err(Error::InvalidDocument(format!("duplicate identifier {:?}", doc.id)));
        }
        let doc_id = DocId::try_from(i)
            .map_err(|_| Error::InvalidDocument(format!("too many documents at {:?}", doc.id)))?;

        let tokens = tokenize(&doc.text);
        if tokens.is_empty() && options.require_non_empty {
            return Err(Error::InvalidDocument(format!("document {:?} has no tokens", doc.id)));
        }
        let doc_len = tokens.len() as u32;

        // Group positions per term so each (term, doc) pair yields one posting
        let mut doc_terms: HashMap<String, Vec<u32>> = HashMap::new();
        for (term, pos) in tokens {
            doc_terms.entry(term).or_default().push(pos as u32);
        }

        for (term, positions) in doc_terms {
            *stats.term_collection_frequency.entry(term.clone()).or_insert(0) += positions.len() as u64;
            index.postings.entry(term).or_default().push(Posting {
                doc_id,
                positions,
                document_length: doc_len,
            });
        }

        stats.collection_length += u64::from(doc_len);
        index.docs.push(DocMeta { external_id: doc.id.clone(), length: doc_len });
    }
    stats.num_docs = index.docs.len() as u32;

    tracing::info!(
        num_docs = stats.num_docs,
        num_terms = index.num_terms(),
        collection_length = stats.collection_length,
        "index built"
    );
    Ok((index, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[(&str, &str)]) -> Vec<Document> {
        texts.iter().map(|(id, text)| Document::new(*id, *text)).collect()
    }

    #[test]
    fn groups_positions_per_document() {
        let (index, stats) = build_index(&docs(&[("doc", "a b a")])).unwrap();
        assert_eq!(
            index.postings("a"),
            &[Posting { doc_id: 0, positions: vec![0, 2], document_length: 3 }]
        );
        assert_eq!(
            index.postings("b"),
            &[Posting { doc_id: 0, positions: vec![1], document_length: 3 }]
        );
        assert_eq!(index.postings("a")[0].term_frequency(), 2);
        assert_eq!(index.external_id(0), Some("doc"));
        assert_eq!(stats.collection_length, 3);
        assert_eq!(stats.collection_frequency("a"), 2);
    }

    #[test]
    fn postings_are_sorted_by_doc() {
        let (index, _) = build_index(&docs(&[("x", "sat"), ("y", "cat"), ("z", "sat cat sat")])).unwrap();
        let ids: Vec<DocId> = index.postings("sat").iter().map(|p| p.doc_id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(index.term_frequency("sat", 2), 2);
        assert_eq!(index.term_frequency("sat", 1), 0);
        assert!(index.posting("cat", 0).is_none());
    }

    #[test]
    fn empty_documents_count_but_add_no_postings() {
        let (index, stats) = build_index(&docs(&[("a", ""), ("b", "word")])).unwrap();
        assert_eq!(stats.num_docs, 2);
        assert_eq!(stats.collection_length, 1);
        assert_eq!(index.doc(0).unwrap().length, 0);
        assert_eq!(index.num_terms(), 1);
        assert_eq!(stats.avgdl(), Some(0.5));
    }

    #[test]
    fn empty_documents_rejected_when_required() {
        let opts = IndexOptions { require_non_empty: true };
        let err = build_index_with(&docs(&[("a", "  ")]), opts).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
    }

    #[test]
    fn rejects_duplicate_and_empty_ids() {
        assert!(matches!(
            build_index(&docs(&[("a", "x"), ("a", "y")])),
            Err(Error::InvalidDocument(_))
        ));
        assert!(matches!(build_index(&docs(&[("", "x")])), Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn empty_corpus_has_no_average_length() {
        let (index, stats) = build_index(&[]).unwrap();
        assert_eq!(index.num_docs(), 0);
        assert_eq!(stats.avgdl(), None);
    }
}
