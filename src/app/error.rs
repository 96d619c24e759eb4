use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration problems. These are reported with a usage hint.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("{0}")]
    Syntax(String),
    #[error("-a and -b are mutually exclusive")]
    ConflictingFormats,
    #[error("files given, but -i option used")]
    FilesWithStdin,
    #[error("no files given, and no -i option used")]
    NoFiles,
    #[error("cannot open {} for writing", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
