use anyhow::Result;
use clap::Parser;
use ranker::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let summary = run(&cli)?;
    if !summary.failed.is_empty() {
        tracing::warn!(failed = ?summary.failed, "some queries produced no results file");
    }
    Ok(())
}
