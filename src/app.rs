// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use self::cli::Cli;
use self::config::{load_defaults_file, resolve_config};
use self::formatter::write_catalog;
use self::models::RuntimeConfig;
use self::scanner::{collect_paths, ExtensionFilter, Scanner};

/// Name to prefix diagnostics with: argv[0] as invoked.
pub fn program_name() -> String {
    env::args()
        .next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

/// Parses the command line, validates it, and runs the catalog pipeline
/// against the process streams.
pub fn run(program: &str) -> Result<()> {
    // 1. Parse Args
    let args = Cli::try_parse().map_err(cli::syntax_error)?;

    if args.help {
        eprint!("{}", cli::usage(program));
        return Ok(());
    }

    // 2. Validate before anything touches the filesystem
    args.validate()?;

    // 3. Resolve Configuration
    let defaults = load_defaults_file()?;
    let config = resolve_config(args, defaults);
    log::debug!("resolved config: {:?}", config);

    // 4. Open the destination
    let mut out = config.output.open()?;

    let stdin = io::stdin();
    let stderr = io::stderr();
    catalog(&config, program, stdin.lock(), &mut out, &mut stderr.lock())?;

    out.flush().context("Failed to flush catalog output")?;
    Ok(())
}

/// Collects, filters and checks the candidate paths, then renders the
/// catalog. Nothing is written to `out` when no path survives.
pub fn catalog<R: BufRead, W: Write + ?Sized, D: Write>(
    config: &RuntimeConfig,
    program: &str,
    input: R,
    out: &mut W,
    diag: &mut D,
) -> Result<()> {
    let mut files = collect_paths(&config.source, input)?;

    if config.filter {
        files = ExtensionFilter::new(&config.extensions).apply(files);
    }

    let cwd: PathBuf = env::current_dir().context("Failed to get current directory")?;
    let paths = Scanner::new(program, cwd).scan(&files, diag)?;

    if paths.is_empty() {
        log::info!("nothing to catalog");
        return Ok(());
    }

    write_catalog(
        config.format.writer().as_ref(),
        &paths,
        config.verbose,
        out,
        diag,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{CatalogFormat, OutputTarget, PathSource};
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn config(source: PathSource, format: CatalogFormat, filter: bool) -> RuntimeConfig {
        RuntimeConfig {
            output: OutputTarget::Stdout,
            format,
            source,
            filter,
            verbose: false,
            extensions: Vec::new(),
        }
    }

    fn run_catalog(config: &RuntimeConfig, input: &str) -> (String, String) {
        let mut out = Vec::new();
        let mut diag = Vec::new();
        catalog(config, "catalog", Cursor::new(input.to_string()), &mut out, &mut diag).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(diag).unwrap(),
        )
    }

    #[test]
    fn catalogs_existing_file() {
        let dir = TempDir::new().unwrap();
        let game = dir.path().join("zork_1.z5");
        fs::write(&game, b"").unwrap();

        let cfg = config(
            PathSource::Arguments(vec![game.clone()]),
            CatalogFormat::Rdf,
            false,
        );
        let (out, diag) = run_catalog(&cfg, "");

        assert!(out.contains(&format!("RDF:about=\"file://{}\"", game.display())));
        assert!(out.contains("IF:title=\"Zork 1\""));
        assert!(diag.is_empty());
    }

    #[test]
    fn all_missing_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.z5");

        let cfg = config(
            PathSource::Arguments(vec![missing.clone()]),
            CatalogFormat::Ifiction,
            false,
        );
        let (out, diag) = run_catalog(&cfg, "");

        assert!(out.is_empty());
        assert_eq!(
            diag,
            format!(
                "catalog: file {} could not be cataloged, not found\n",
                missing.display()
            )
        );
    }

    #[test]
    fn filter_drops_non_games_silently() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("a.txt");
        let game = dir.path().join("b.z5");
        fs::write(&notes, b"").unwrap();
        fs::write(&game, b"").unwrap();

        let cfg = config(PathSource::Stdin, CatalogFormat::Ini, true);
        let input = format!("{}\n{}\n", notes.display(), game.display());
        let (out, diag) = run_catalog(&cfg, &input);

        assert!(out.contains(&format!("[{}]\n", game.display())));
        assert!(!out.contains("a.txt"));
        assert!(diag.is_empty());
    }
}
