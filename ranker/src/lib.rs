use anyhow::{Context, Result};
use bardsearch_core::corpus::read_corpus;
use bardsearch_core::query::read_queries;
use bardsearch_core::run::write_run;
use bardsearch_core::scoring::{Bm25, QueryLikelihood, RankingParams};
use bardsearch_core::{evaluate_batch, IndexOptions, Searcher};
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ranker")]
#[command(about = "Rank a document collection against a batch of BM25 / query-likelihood queries", long_about = None)]
pub struct Cli {
    /// Corpus file (.json, .json.gz, .tsv)
    #[arg(long, default_value = "shakespeare-scenes.json.gz")]
    pub corpus: PathBuf,
    /// Tab-separated query file: id, label, model (bm25|ql), terms...
    #[arg(long, default_value = "trainQueries.tsv")]
    pub queries: PathBuf,
    /// Directory receiving one <query_id>.txt per query
    #[arg(long, default_value = "results/")]
    pub output: PathBuf,
    /// BM25 term frequency saturation
    #[arg(long, default_value_t = 1.8, value_parser = positive)]
    pub k1: f64,
    /// BM25 query term frequency saturation
    #[arg(long, default_value_t = 5.0, value_parser = positive)]
    pub k2: f64,
    /// BM25 length normalization
    #[arg(long, default_value_t = 0.75, value_parser = unit_interval)]
    pub b: f64,
    /// Dirichlet prior for query likelihood
    #[arg(long, default_value_t = 300.0, value_parser = positive)]
    pub mu: f64,
    /// Results kept per query
    #[arg(long, default_value_t = 100, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub top_k: usize,
    /// Fail on documents without tokens instead of indexing them empty
    #[arg(long, default_value_t = false)]
    pub require_non_empty: bool,
    /// Worker threads for query evaluation (0 = one per core)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

fn positive(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(format!("{v} is not a positive number"))
    }
}

fn unit_interval(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("{v} is not within [0, 1]"))
    }
}

impl Cli {
    pub fn ranking_params(&self) -> RankingParams {
        RankingParams {
            bm25: Bm25 { k1: self.k1, k2: self.k2, b: self.b },
            ql: QueryLikelihood { mu: self.mu },
            top_k: self.top_k,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<String>,
}

/// Build the index, evaluate every query and write one run file per
/// successful query. Failed queries are logged and listed in the summary.
pub fn run(cli: &Cli) -> Result<RunSummary> {
    let documents = read_corpus(&cli.corpus)
        .with_context(|| format!("reading corpus {}", cli.corpus.display()))?;
    let options = IndexOptions { require_non_empty: cli.require_non_empty };
    let searcher = Searcher::from_documents(&documents, options, cli.ranking_params())
        .context("building index")?;
    drop(documents);

    let query_file = read_queries(&cli.queries)
        .with_context(|| format!("reading queries {}", cli.queries.display()))?;
    let queries = query_file.queries;
    fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating output directory {}", cli.output.display()))?;

    let outcomes = if cli.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(cli.threads).build()?;
        pool.install(|| evaluate_batch(&searcher, &queries))
    } else {
        evaluate_batch(&searcher, &queries)
    };

    let mut summary = RunSummary::default();
    summary.failed.extend(query_file.rejected.into_iter().map(|row| row.query_id));
    for outcome in outcomes {
        match outcome.results {
            Ok(results) => {
                let path = write_run(&cli.output, outcome.query, &results, searcher.index())
                    .with_context(|| format!("writing results for {}", outcome.query.id))?;
                summary.written.push(path);
            }
            Err(e) => {
                tracing::warn!(query_id = %outcome.query.id, error = %e, "query failed");
                summary.failed.push(outcome.query.id.clone());
            }
        }
    }

    tracing::info!(
        output = %cli.output.display(),
        written = summary.written.len(),
        failed = summary.failed.len(),
        "run complete"
    );
    Ok(summary)
}
