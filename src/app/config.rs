use crate::app::cli::Cli;
use crate::app::error::UsageError;
use crate::app::models::{CatalogFormat, OutputTarget, PathSource, RuntimeConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Per-user defaults, read from `~/.config/if_catalog/defaults.toml`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub format: Option<CatalogFormat>,
    pub filter: Option<bool>,
    pub verbose: Option<bool>,
    pub extensions: Option<Vec<String>>,
}

fn defaults_path(home: &Path) -> PathBuf {
    home.join(".config").join("if_catalog").join("defaults.toml")
}

pub fn load_defaults_file() -> Result<Defaults> {
    load_defaults_in(dirs::home_dir())
}

/// Without a home directory there is no defaults file to read.
fn load_defaults_in(home: Option<PathBuf>) -> Result<Defaults> {
    match home {
        Some(home) => load_defaults_from(&defaults_path(&home)),
        None => {
            log::debug!("no home directory, skipping defaults file");
            Ok(Defaults::default())
        }
    }
}

fn load_defaults_from(path: &Path) -> Result<Defaults> {
    if !path.exists() {
        return Ok(Defaults::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read defaults at {:?}", path))?;

    let parsed: Defaults = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {:?}", path))?;
    log::debug!("loaded defaults from {:?}: {:?}", path, parsed);

    Ok(parsed)
}

/// Merges validated CLI flags over the user defaults.
pub fn resolve_config(cli: Cli, defaults: Defaults) -> RuntimeConfig {
    let format = if cli.ini {
        CatalogFormat::Ini
    } else if cli.ifiction {
        CatalogFormat::Ifiction
    } else {
        defaults.format.unwrap_or_default()
    };

    let source = if cli.stdin {
        PathSource::Stdin
    } else {
        PathSource::Arguments(cli.files)
    };

    let output = match cli.output {
        Some(path) => OutputTarget::File(path),
        None => OutputTarget::Stdout,
    };

    let mut extensions = defaults.extensions.unwrap_or_default();
    let mut seen = HashSet::new();
    extensions.retain(|ext| seen.insert(ext.clone()));

    RuntimeConfig {
        output,
        format,
        source,
        filter: cli.filter || defaults.filter.unwrap_or(false),
        verbose: cli.verbose || defaults.verbose.unwrap_or(false),
        extensions,
    }
}

impl OutputTarget {
    /// Opens the destination for writing, truncating an existing file.
    pub fn open(&self) -> Result<Box<dyn Write>, UsageError> {
        match self {
            OutputTarget::Stdout => Ok(Box::new(io::stdout())),
            OutputTarget::File(path) => {
                let file = File::create(path).map_err(|source| UsageError::Output {
                    path: path.clone(),
                    source,
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("if_catalog").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn rdf_is_the_default_format() {
        let config = resolve_config(cli(&["game.z5"]), Defaults::default());
        assert_eq!(config.format, CatalogFormat::Rdf);
        assert_eq!(config.output, OutputTarget::Stdout);
        assert_eq!(
            config.source,
            PathSource::Arguments(vec![PathBuf::from("game.z5")])
        );
        assert!(!config.filter && !config.verbose);
    }

    #[test]
    fn flags_override_default_format() {
        let defaults = Defaults {
            format: Some(CatalogFormat::Ifiction),
            ..Defaults::default()
        };
        assert_eq!(
            resolve_config(cli(&["-a", "x"]), defaults.clone()).format,
            CatalogFormat::Ini
        );
        assert_eq!(
            resolve_config(cli(&["x"]), defaults).format,
            CatalogFormat::Ifiction
        );
    }

    #[test]
    fn defaults_enable_filter_and_verbose() {
        let defaults = Defaults {
            filter: Some(true),
            verbose: Some(true),
            extensions: Some(vec![".t3".into(), ".gblorb".into(), ".t3".into()]),
            ..Defaults::default()
        };
        let config = resolve_config(cli(&["-i"]), defaults);
        assert!(config.filter && config.verbose);
        assert_eq!(config.source, PathSource::Stdin);
        assert_eq!(config.extensions, vec![".t3", ".gblorb"]);
    }

    #[test]
    fn missing_defaults_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let defaults = load_defaults_from(&dir.path().join("defaults.toml")).unwrap();
        assert_eq!(defaults, Defaults::default());
    }

    #[test]
    fn no_home_directory_means_no_defaults() {
        assert_eq!(load_defaults_in(None).unwrap(), Defaults::default());
    }

    #[test]
    fn defaults_file_lives_under_home_config() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join(".config").join("if_catalog");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("defaults.toml"), "verbose = true\n").unwrap();

        let defaults = load_defaults_in(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(defaults.verbose, Some(true));
    }

    #[test]
    fn parses_defaults_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("defaults.toml");
        fs::write(&path, "format = \"ini\"\nfilter = true\nextensions = [\".t3\"]\n").unwrap();

        let defaults = load_defaults_from(&path).unwrap();
        assert_eq!(defaults.format, Some(CatalogFormat::Ini));
        assert_eq!(defaults.filter, Some(true));
        assert_eq!(defaults.verbose, None);
        assert_eq!(defaults.extensions, Some(vec![".t3".to_string()]));
    }

    #[test]
    fn malformed_defaults_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("defaults.toml");
        fs::write(&path, "format = \"html\"\n").unwrap();
        assert!(load_defaults_from(&path).is_err());
    }

    #[test]
    fn unwritable_output_is_a_usage_error() {
        let dir = TempDir::new().unwrap();
        let target = OutputTarget::File(dir.path().join("no/such/dir/catalog.xml"));
        assert!(matches!(target.open(), Err(UsageError::Output { .. })));
    }
}
