//! Run files: one `<query_id>.txt` per query with
//! `query_id<TAB>query_label<TAB>document_id<TAB>score` lines.

use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::query::Query;
use crate::scoring::ScoredDoc;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub fn format_run_line(query: &Query, external_id: &str, score: f64) -> String {
    format!("{}\t{}\t{}\t{}", query.id, query.label, external_id, score)
}

pub fn run_path(dir: &Path, query: &Query) -> PathBuf {
    dir.join(format!("{}.txt", query.id))
}

/// Write `results` for `query` under `dir`, replacing any previous run file.
pub fn write_run(dir: &Path, query: &Query, results: &[ScoredDoc], index: &InvertedIndex) -> Result<PathBuf> {
    let path = run_path(dir, query);
    let mut out = BufWriter::new(File::create(&path)?);
    for hit in results {
        let external_id = index
            .external_id(hit.doc_id)
            .ok_or_else(|| Error::InvalidDocument(format!("unknown doc id {}", hit.doc_id)))?;
        writeln!(out, "{}", format_run_line(query, external_id, hit.score))?;
    }
    out.flush()?;
    Ok(path)
}
