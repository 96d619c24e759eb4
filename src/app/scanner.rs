use crate::app::models::PathSource;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::{Component, Path, PathBuf};

/// Filename extensions that usually mean "this is a game".
pub const GAME_EXTENSIONS: &[&str] = &[
    ".z1", ".z2", ".z3", ".z4", ".z5", ".z6", ".z7", ".z8", ".z9", ".dat", ".acd", ".gam",
    ".taf", ".blb", ".ulx", ".zip", ".hex", ".sna", ".mag", ".lev", ".d$$", ".xml",
];

/// Builds the raw candidate list, in input order.
pub fn collect_paths<R: BufRead>(source: &PathSource, mut input: R) -> Result<Vec<PathBuf>> {
    let files = match source {
        PathSource::Arguments(files) => files.clone(),
        PathSource::Stdin => {
            let mut files = Vec::new();
            let mut line = Vec::new();
            loop {
                line.clear();
                let read = input
                    .read_until(b'\n', &mut line)
                    .context("Failed to read file list from stdin")?;
                if read == 0 {
                    break;
                }
                while matches!(line.last(), Some(b'\r' | b'\n')) {
                    line.pop();
                }
                files.push(path_from_bytes(&line));
            }
            files
        }
    };
    log::debug!("collected {} candidate paths", files.len());
    Ok(files)
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    PathBuf::from(OsString::from_vec(bytes.to_vec()))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Case-sensitive extension allow-list.
pub struct ExtensionFilter {
    extensions: HashSet<String>,
}

impl ExtensionFilter {
    pub fn new(extra: &[String]) -> Self {
        let extensions = GAME_EXTENSIONS
            .iter()
            .map(|ext| ext.to_string())
            .chain(extra.iter().cloned())
            .collect();
        Self { extensions }
    }

    pub fn is_gamelike(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let dotted = format!(".{}", ext.to_string_lossy());
                self.extensions.contains(&dotted)
            }
            None => false,
        }
    }

    pub fn apply(&self, files: Vec<PathBuf>) -> Vec<PathBuf> {
        files.into_iter().filter(|f| self.is_gamelike(f)).collect()
    }
}

/// Makes `path` absolute against `cwd` and folds away `.` and `..` without
/// touching the filesystem.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // pop() is a no-op at the root
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

pub struct Scanner<'a> {
    program: &'a str,
    cwd: PathBuf,
}

impl<'a> Scanner<'a> {
    pub fn new(program: &'a str, cwd: PathBuf) -> Self {
        Self { program, cwd }
    }

    /// Resolves every candidate and keeps the ones that exist. Missing
    /// entries are reported to `diag` and dropped.
    pub fn scan<D: Write>(&self, files: &[PathBuf], diag: &mut D) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(files.len());

        for file in files {
            let path = absolutize(file, &self.cwd);
            if path.exists() {
                log::debug!("accepted {}", path.display());
                paths.push(path);
            } else {
                let report = [
                    self.program.as_bytes(),
                    b": file ".as_slice(),
                    file.as_os_str().as_encoded_bytes(),
                    b" could not be cataloged, not found\n".as_slice(),
                ]
                .concat();
                diag.write_all(&report)
                    .context("Failed to write diagnostics")?;
            }
        }

        Ok(paths)
    }
}
