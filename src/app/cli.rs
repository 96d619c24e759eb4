use crate::app::error::UsageError;
use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    about = "Catalog IF games in IFMES or iFiction format for Gamebox",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Specify the catalog output file (default: stdout)
    #[arg(short = 'o', value_name = "OUTFILE", allow_hyphen_values = true)]
    pub output: Option<PathBuf>,

    /// Write out IFMES INI format rather than IFMES RDF+XML
    #[arg(short = 'a')]
    pub ini: bool,

    /// Write out iFiction XML format rather than IFMES RDF+XML
    #[arg(short = 'b')]
    pub ifiction: bool,

    /// Read files to catalog from stdin (default: "files" args)
    #[arg(short = 'i')]
    pub stdin: bool,

    /// Filter for likely IF games only
    #[arg(short = 'f')]
    pub filter: bool,

    /// List each file cataloged to stderr
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Print this message
    #[arg(short = 'h')]
    pub help: bool,

    /// Files to catalog. Option parsing stops at the first one.
    #[arg(
        trailing_var_arg = true,
        value_parser = OsStringValueParser::new().map(PathBuf::from)
    )]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Rejects flag combinations that cannot produce a catalog.
    pub fn validate(&self) -> Result<(), UsageError> {
        if self.ini && self.ifiction {
            return Err(UsageError::ConflictingFormats);
        }
        if self.stdin && !self.files.is_empty() {
            return Err(UsageError::FilesWithStdin);
        }
        if !self.stdin && self.files.is_empty() {
            return Err(UsageError::NoFiles);
        }
        Ok(())
    }
}

/// Turns a clap failure into a one-line usage error.
pub fn syntax_error(err: clap::Error) -> UsageError {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    UsageError::Syntax(first.trim_start_matches("error: ").to_string())
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [options] [files]\n\n\
         \x20 -o outfile  Specify the catalog output file (default: stdout)\n\
         \x20 -a          Write out IFMES INI format rather than IFMES RDF+XML\n\
         \x20 -b          Write out iFiction XML format rather than IFMES RDF+XML\n\
         \x20 -i          Read files to catalog from stdin (default: \"files\" args)\n\
         \x20 -f          Filter for likely IF games only (.z[1-9], .dat, .acd, .gam,\n\
         \x20             .taf, .blb, .ulx, .zip, .hex, .sna, .mag, .lev, .d$$, .xml)\n\
         \x20 -v          List each file cataloged to stderr\n\
         \x20 -h          Print this message\n"
    )
}
