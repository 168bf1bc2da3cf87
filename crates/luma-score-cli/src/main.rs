use clap::{Parser, Subcommand};
use luma_score_parser::{render, InMemoryRegistry, ParseResult};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "luma-score")]
#[command(about = "Luma pattern score checker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a score file and print diagnostics
    Check {
        /// Input score file
        path: String,

        /// JSON file listing the available patterns
        #[arg(long, short)]
        registry: String,
    },

    /// Parse a score file and print the document and diagnostics as JSON
    Parse {
        /// Input score file
        path: String,

        /// JSON file listing the available patterns
        #[arg(long, short)]
        registry: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the token stream of a score file as JSON
    Tokens {
        /// Input score file
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check { path, registry } => cmd_check(&path, &registry),
        Command::Parse {
            path,
            registry,
            pretty,
        } => cmd_parse(&path, &registry, pretty),
        Command::Tokens { path } => cmd_tokens(&path),
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn load_registry(path: &str) -> InMemoryRegistry {
    let json = read_source(path);
    match InMemoryRegistry::from_json(&json) {
        Ok(registry) => {
            tracing::debug!(patterns = registry.len(), path, "loaded pattern registry");
            registry
        }
        Err(e) => {
            eprintln!("Error loading registry {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn parse_file(path: &str, registry: &str) -> (String, ParseResult) {
    let registry = load_registry(registry);
    let source = read_source(path);
    let result = luma_score_parser::parse(&source, &registry);
    tracing::info!(
        path,
        bars = result.document().bars.len(),
        errors = result.errors().len(),
        warnings = result.warnings().len(),
        "parsed score"
    );
    (source, result)
}

fn cmd_check(path: &str, registry: &str) {
    let (source, result) = parse_file(path, registry);

    eprint!("{}", render::render_report(&source, &result));

    if !result.is_success() {
        std::process::exit(1);
    }
    eprintln!("OK: {path}");
}

fn cmd_parse(path: &str, registry: &str, pretty: bool) {
    let (_, result) = parse_file(path, registry);
    print_json(&result, pretty);

    if !result.is_success() {
        std::process::exit(1);
    }
}

fn cmd_tokens(path: &str) {
    let source = read_source(path);
    let tokens = luma_score_lexer::tokenize(&source);
    print_json(&tokens, true);
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match json {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            std::process::exit(1);
        }
    }
}
