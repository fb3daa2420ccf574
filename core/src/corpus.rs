//! Corpus readers: JSON (`{"corpus": [{"sceneId", "text"}, ...]}`) and
//! `id<TAB>text` TSV, either optionally gzip-compressed.

use crate::error::{Error, Result};
use crate::index::Document;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CorpusFile {
    corpus: Vec<Document>,
}

/// Open `path`, transparently decompressing `.gz` files.
fn open(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    let reader: Box<dyn Read> = if has_extension(path, "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(reader)))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Read a corpus file, picking the format from its extension.
///
/// `*.tsv` and `*.tsv.gz` are read as TSV, everything else as JSON.
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let inner = if has_extension(path, "gz") { Path::new(path.file_stem().unwrap_or_default()) } else { path };
    let reader = open(path)?;
    let docs = if has_extension(inner, "tsv") {
        parse_tsv_corpus(reader)?
    } else {
        parse_json_corpus(reader)?
    };
    tracing::info!(path = %path.display(), num_docs = docs.len(), "corpus loaded");
    Ok(docs)
}

pub fn parse_json_corpus<R: Read>(reader: R) -> Result<Vec<Document>> {
    let file: CorpusFile = serde_json::from_reader(reader)?;
    Ok(file.corpus)
}

pub fn parse_tsv_corpus<R: BufRead>(reader: R) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let (id, text) = line
            .split_once('\t')
            .ok_or_else(|| Error::Corpus(format!("line {}: expected identifier<TAB>text", i + 1)))?;
        docs.push(Document::new(id, text));
    }
    Ok(docs)
}
