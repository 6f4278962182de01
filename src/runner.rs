//! Provides file-level processing: choosing output paths and replacing files safely.
//!
//! The operators themselves never touch the filesystem. This module reads an
//! input model, runs an [`Operation`] on it and writes the results, always via
//! a temporary file in the destination directory that is moved into place
//! once complete, so a failed run never leaves a half-written model behind.
//!
//! # Examples
//! ```
//! use std::path::{Path, PathBuf};
//!
//! use modeltools::runner::OutputTarget;
//!
//! let target = OutputTarget::Suffix("_big".to_string());
//! assert_eq!(target.resolve(Path::new("block/lamp.json")), PathBuf::from("block/lamp_big.json"));
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::formatter::FormatOptions;
use crate::tools::{self, Operation, ToolError, ToolResult};

/// Where the output for an input file goes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputTarget {
    /// Replace the input file.
    #[default]
    InPlace,
    /// Write next to the input, with this suffix added to the file stem.
    Suffix(String),
    /// Write to this exact path.
    Path(PathBuf),
}

impl OutputTarget {
    /// Returns the output path for `input`.
    pub fn resolve(&self, input: &Path) -> PathBuf {
        match self {
            OutputTarget::InPlace => input.to_path_buf(),
            OutputTarget::Path(path) => path.clone(),
            OutputTarget::Suffix(suffix) => {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let name = match input.extension() {
                    Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
                    None => format!("{stem}{suffix}"),
                };
                input.with_file_name(name)
            }
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Writes `contents` to `path` through a temporary file in the same directory.
///
/// # Errors
/// Returns [`ToolError::Io`] if the temporary file cannot be created, written
/// or moved over `path`.
pub fn write_atomic(path: &Path, contents: &str) -> ToolResult<()> {
    stage(path, contents)?.persist(path)
}

/// A fully written temporary file waiting to be moved over its destination.
struct Staged {
    temp: NamedTempFile,
}

impl Staged {
    fn persist(self, path: &Path) -> ToolResult<()> {
        self.temp.persist(path).map_err(|e| ToolError::Io(e.error))?;
        Ok(())
    }
}

fn stage(path: &Path, contents: &str) -> ToolResult<Staged> {
    if path.is_dir() {
        return Err(ToolError::Io(std::io::Error::other(format!(
            "`{}` is a directory",
            path.display()
        ))));
    }
    let mut temp = NamedTempFile::new_in(parent_dir(path))?;
    temp.write_all(contents.as_bytes())?;
    temp.flush()?;
    Ok(Staged { temp })
}

/// Runs `op` on one file and writes its outputs.
///
/// Transforming tools write to `target`. Combine leaves `target` alone and
/// writes one `<stem>_<member>....json` file per variant beside it.
///
/// Every output is written to a temporary file before any of them is moved
/// into place, so a combine that cannot write one variant writes none. Only a
/// failed rename after staging can leave earlier variants in place.
///
/// # Errors
/// Returns an error if the input cannot be read, the tool fails, or an output
/// cannot be written.
pub fn process_file(
    input: &Path,
    target: &OutputTarget,
    op: &Operation,
    options: &FormatOptions,
) -> ToolResult<Vec<PathBuf>> {
    let output = target.resolve(input);
    let base_name = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        tool = op.name(),
        "processing"
    );
    let data = std::fs::read(input)?;
    let rendered = tools::run(&data, op, &base_name, options)?;

    let staged = rendered
        .into_iter()
        .map(|model| {
            let path = match &model.variant {
                Some(name) => parent_dir(&output).join(format!("{name}.json")),
                None => output.clone(),
            };
            let file = stage(&path, &model.text)?;
            Ok((path, file))
        })
        .collect::<ToolResult<Vec<_>>>()?;

    let mut written = Vec::with_capacity(staged.len());
    for (path, file) in staged {
        file.persist(&path)?;
        tracing::info!(path = %path.display(), "wrote model");
        written.push(path);
    }
    Ok(written)
}

/// The outcome of processing several files.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Every file written.
    pub written: Vec<PathBuf>,
    /// Inputs that failed, with their error.
    pub failed: Vec<(PathBuf, ToolError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs `op` on every input; one file failing does not stop the others.
pub fn process_files<P: AsRef<Path>>(
    inputs: &[P],
    target: &OutputTarget,
    op: &Operation,
    options: &FormatOptions,
) -> BatchReport {
    let mut report = BatchReport::default();
    for input in inputs {
        let input = input.as_ref();
        match process_file(input, target, op, options) {
            Ok(paths) => report.written.extend(paths),
            Err(e) => {
                tracing::error!(
                    input = %input.display(),
                    error = %e,
                    "error executing tool on file"
                );
                report.failed.push((input.to_path_buf(), e));
            }
        }
    }
    report
}
