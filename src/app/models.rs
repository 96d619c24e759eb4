use serde::Deserialize;
use std::path::PathBuf;

/// Which of the three catalog dialects to emit.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    /// IFMES RDF+XML
    #[default]
    Rdf,
    /// IFMES INI
    Ini,
    /// Treaty of Babel iFiction XML
    Ifiction,
}

/// Where the candidate paths come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSource {
    Arguments(Vec<PathBuf>),
    Stdin,
}

/// Where the finished document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// Represents the final configuration after merging defaults and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub output: OutputTarget,
    pub format: CatalogFormat,
    pub source: PathSource,
    pub filter: bool,
    pub verbose: bool,
    pub extensions: Vec<String>, // extra allow-list entries on top of the built-in set
}

/// One cataloged game, derived from its absolute path at render time.
#[derive(Debug)]
pub struct CatalogEntry<'a> {
    pub path: &'a [u8],
    pub title: Vec<u8>,
}
