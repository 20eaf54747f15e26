mod cmd;
mod output;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use kinship_core::config::{Config, resolve_config};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::output::{CliError, OutputMode, render_error, resolve_output_mode};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "kin: relation matrices and relational entropy for rooted edge lists",
    long_about = None
)]
struct Cli {
    /// Output format. Defaults to pretty on a terminal and text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Enable debug logging (overridden by KINSHIP_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors (overridden by KINSHIP_LOG).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Config file to use instead of ./kinship.toml.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Print the relational entropy H and its normalized value h",
        after_help = "EXAMPLES:\n    # Score an edge list rooted at its first parent\n    kin entropy edges.csv\n\n    # Choose the root explicitly\n    kin entropy edges.csv --root A\n\n    # Emit machine-readable output\n    kin entropy edges.csv --format json"
    )]
    Entropy(cmd::entropy::EntropyArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Print the five relation matrices",
        after_help = "EXAMPLES:\n    # All five matrices as 0/1 rows\n    kin matrices edges.csv --root A\n\n    # Only siblings and direct edges\n    kin matrices edges.csv --relation r5 --relation direct"
    )]
    Matrices(cmd::matrices::MatricesArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Show graph shape, relation counts and entropy breakdown",
        after_help = "EXAMPLES:\n    # Summary for an edge list read from stdin\n    cat edges.csv | kin stats - --root A"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Bash\n    kin completions bash > ~/.local/share/bash-completion/completions/kin"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Filter used when `KINSHIP_LOG` is unset. `kin` is the binary's own
/// target, `kinship` prefixes the library's.
const fn default_log_directives(verbose: bool, quiet: bool, debug_env: bool) -> &'static str {
    if verbose || debug_env {
        "kin=debug,kinship=debug,info"
    } else if quiet {
        "error"
    } else {
        "kin=info,kinship=info,warn"
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("KINSHIP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(default_log_directives(
            verbose,
            quiet,
            env::var("DEBUG").is_ok(),
        ))
    });

    let format = env::var("KINSHIP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: Cli, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    match cli.command {
        Commands::Entropy(ref args) => cmd::entropy::run_entropy(args, output, config),
        Commands::Matrices(ref args) => cmd::matrices::run_matrices(args, output, config),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, output, config),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let project_dir = env::current_dir()?;
    let config = match resolve_config(&project_dir, cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            let output = resolve_output_mode(cli.format, cli.json, None);
            render_error(output, &CliError::from_anyhow(&err))?;
            return Ok(ExitCode::FAILURE);
        }
    };
    debug!(?config, "resolved config");

    let output = resolve_output_mode(cli.format, cli.json, config.output.format.as_deref());
    if cli.verbose {
        info!(?output, "verbose mode enabled");
    }

    match run(cli, &config, output) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            render_error(output, &CliError::from_anyhow(&err))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_core::relations::Relation;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_entropy_with_root() {
        let cli = Cli::parse_from(["kin", "entropy", "edges.csv", "--root", "A"]);
        match cli.command {
            Commands::Entropy(args) => {
                assert_eq!(args.input.file, PathBuf::from("edges.csv"));
                assert_eq!(args.input.root.as_deref(), Some("A"));
                assert!(!args.input.strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["kin", "stats", "-", "--format", "json", "-v"]);
        assert_eq!(cli.format, Some(OutputMode::Json));
        assert!(cli.verbose);
    }

    #[test]
    fn hidden_json_flag_parses() {
        let cli = Cli::parse_from(["kin", "--json", "entropy", "edges.csv"]);
        assert!(cli.json);
    }

    #[test]
    fn matrices_relation_filter_parses_names() {
        let cli = Cli::parse_from([
            "kin",
            "matrices",
            "edges.csv",
            "--relation",
            "r5",
            "--relation",
            "direct",
        ]);
        match cli.command {
            Commands::Matrices(args) => {
                assert_eq!(args.relations, [Relation::Sibling, Relation::Direct]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_relation_is_rejected() {
        let result = Cli::try_parse_from(["kin", "matrices", "edges.csv", "--relation", "r9"]);
        assert!(result.is_err());
    }

    #[test]
    fn default_log_filter_covers_binary_and_library() {
        for directives in [
            default_log_directives(false, false, false),
            default_log_directives(true, false, false),
            default_log_directives(false, false, true),
        ] {
            assert!(directives.split(',').any(|d| d.starts_with("kin=")));
            assert!(directives.split(',').any(|d| d.starts_with("kinship=")));
        }
        assert_eq!(default_log_directives(false, true, false), "error");
    }

    #[test]
    fn completions_cover_kin_subcommands() {
        let mut buf = Vec::new();
        cmd::completions::write_completions(
            clap_complete::Shell::Bash,
            &mut Cli::command(),
            &mut buf,
        );
        let script = String::from_utf8(buf).expect("utf8");
        for word in ["kin", "entropy", "matrices", "stats", "--relation"] {
            assert!(script.contains(word), "missing {word}");
        }
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["kin", "-v", "-q", "entropy", "edges.csv"]);
        assert!(result.is_err());
    }
}
