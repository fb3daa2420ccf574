use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Ranking model named in a query row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Bm25,
    Ql,
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bm25" => Ok(ModelKind::Bm25),
            "ql" => Ok(ModelKind::Ql),
            _ => Err(Error::UnknownModel(s.to_string())),
        }
    }
}

/// Query term multiset. Iterates distinct terms in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTerms {
    terms: Vec<(String, u32)>,
}

impl QueryTerms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, term: impl Into<String>) {
        let term = term.into();
        match self.terms.iter_mut().find(|(t, _)| *t == term) {
            Some((_, count)) => *count += 1,
            None => self.terms.push((term, 1)),
        }
    }

    /// Distinct terms with their query frequency.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.terms.iter().map(|(t, c)| (t.as_str(), *c))
    }

    pub fn frequency(&self, term: &str) -> u32 {
        self.terms.iter().find(|(t, _)| t == term).map_or(0, |(_, c)| *c)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for QueryTerms {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut terms = QueryTerms::new();
        for t in iter {
            terms.add(t);
        }
        terms
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub id: String,
    pub label: String,
    pub model: ModelKind,
    pub terms: QueryTerms,
}

/// A query row that could not be turned into a [`Query`].
#[derive(Debug)]
pub struct RejectedRow {
    pub line: u64,
    /// First column of the row, possibly empty.
    pub query_id: String,
    pub error: Error,
}

/// Parsed query file. Bad rows are set aside so the rest of the batch runs.
#[derive(Debug, Default)]
pub struct QueryFile {
    pub queries: Vec<Query>,
    pub rejected: Vec<RejectedRow>,
}

pub fn read_queries<P: AsRef<Path>>(path: P) -> Result<QueryFile> {
    let f = File::open(path)?;
    parse_queries(f)
}

/// Parse `query_id<TAB>label<TAB>model<TAB>term...` rows. No header row.
///
/// Unreadable input fails the whole file; a row with too few columns, a
/// bad id or an unknown model only rejects that row.
pub fn parse_queries<R: Read>(reader: R) -> Result<QueryFile> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut file = QueryFile::default();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        match parse_row(&record, line) {
            Ok(query) => file.queries.push(query),
            Err(error) => {
                let query_id = record.get(0).unwrap_or_default().trim().to_string();
                tracing::warn!(line, query_id = %query_id, error = %error, "skipping query row");
                file.rejected.push(RejectedRow { line, query_id, error });
            }
        }
    }
    tracing::debug!(count = file.queries.len(), rejected = file.rejected.len(), "queries loaded");
    Ok(file)
}

fn parse_row(record: &csv::StringRecord, line: u64) -> Result<Query> {
    if record.len() < 3 {
        return Err(Error::MalformedQuery {
            line,
            reason: format!("expected at least 3 columns, got {}", record.len()),
        });
    }
    let id = record[0].trim();
    if id.is_empty() || id.contains(['/', '\\']) {
        return Err(Error::MalformedQuery { line, reason: format!("invalid query id {id:?}") });
    }
    let model: ModelKind = record[2].parse()?;
    let terms = record
        .iter()
        .skip(3)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<QueryTerms>();
    Ok(Query { id: id.to_string(), label: record[1].to_string(), model, terms })
}
