pub mod completions;
pub mod entropy;
pub mod matrices;
pub mod stats;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use kinship_core::config::Config;
use kinship_core::graph::read_edge_file;
use kinship_core::{Analysis, LinePolicy, analyze_with, default_root};
use tracing::debug;

/// Input shared by every analysis command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Edge list, one `parent, child` pair per line (`-` reads stdin).
    pub file: PathBuf,

    /// Root node label. Defaults to config `analysis.root`, then the parent
    /// of the first edge.
    #[arg(long, short)]
    pub root: Option<String>,

    /// Fail on malformed lines instead of skipping them.
    #[arg(long)]
    pub strict: bool,
}

impl InputArgs {
    fn policy(&self, config: &Config) -> LinePolicy {
        if self.strict || config.strict() {
            LinePolicy::Strict
        } else {
            LinePolicy::Skip
        }
    }
}

/// Read the input and run the pipeline.
///
/// # Errors
///
/// Fails if the input cannot be read, or with the pipeline's
/// [`kinship_core::error::AnalysisError`].
pub fn run_analysis(args: &InputArgs, config: &Config) -> anyhow::Result<Analysis> {
    let text = read_input(&args.file)?;
    let root = resolve_root(args.root.as_deref(), config, &text);
    debug!(root = %root, file = %args.file.display(), "running analysis");
    Ok(analyze_with(&text, &root, args.policy(config))?)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read edge list from stdin")?;
        return Ok(text);
    }
    Ok(read_edge_file(path)?)
}

/// Root precedence: flag, config, parent of the first edge, then empty.
pub fn resolve_root(flag: Option<&str>, config: &Config, text: &str) -> String {
    flag.map(str::to_string)
        .or_else(|| config.analysis.root.clone())
        .or_else(|| default_root(text))
        .unwrap_or_default()
}
