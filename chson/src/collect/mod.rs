// File collection - resolve CLI inputs into document files

use crate::error::{ChsonError, Result};
use std::path::{Path, PathBuf};

/// File name suffix that marks a ChSON document.
pub const CHSON_SUFFIX: &str = ".chson.json";

/// Strip a case-insensitive `.chson.json` suffix from a file name.
pub fn strip_chson_suffix(file_name: &str) -> Option<&str> {
    let split = file_name.len().checked_sub(CHSON_SUFFIX.len())?;
    let (stem, suffix) = (file_name.get(..split)?, file_name.get(split..)?);
    suffix.eq_ignore_ascii_case(CHSON_SUFFIX).then_some(stem)
}

/// Recursively find every `*.chson.json` file below `dir`.
pub fn find_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/**/*{}",
        glob::Pattern::escape(&dir.display().to_string()),
        CHSON_SUFFIX
    );
    let files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| ChsonError::Glob(format!("{pattern}: {e}")))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    log::debug!("Found {} document(s) under {}", files.len(), dir.display());
    Ok(files)
}

/// Resolve one input path: a directory yields every document below it, a
/// file is taken as-is whatever its name.
pub fn collect_files(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(ChsonError::PathNotFound(input.to_path_buf()));
    }

    if input.is_dir() {
        find_documents(input)
    } else {
        Ok(vec![input.to_path_buf()])
    }
}

/// Resolve several inputs in order. Fails on the first missing path before
/// any file is processed.
pub fn collect_all(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        files.extend(collect_files(input)?);
    }
    Ok(files)
}

/// A file to render, with the directory its output path is relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    pub path: PathBuf,
    pub base_dir: PathBuf,
}

impl RenderTarget {
    /// Where the rendered Markdown goes under `out_dir`: the input's path
    /// relative to its base directory, with `.chson.json` swapped for `.md`.
    pub fn output_path(&self, out_dir: &Path) -> PathBuf {
        let relative = self.path.strip_prefix(&self.base_dir).unwrap_or(&self.path);
        let file_name = relative
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let relative = match strip_chson_suffix(&file_name) {
            Some(stem) => relative.with_file_name(format!("{stem}.md")),
            None => relative.with_extension("md"),
        };
        out_dir.join(relative)
    }
}

/// Resolve one input into render targets. Files found in a directory are
/// relative to that directory; a plain file is relative to its parent.
pub fn render_targets(input: &Path) -> Result<Vec<RenderTarget>> {
    if !input.exists() {
        return Err(ChsonError::PathNotFound(input.to_path_buf()));
    }

    if input.is_dir() {
        Ok(find_documents(input)?
            .into_iter()
            .map(|path| RenderTarget {
                path,
                base_dir: input.to_path_buf(),
            })
            .collect())
    } else {
        let base_dir = input.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(vec![RenderTarget {
            path: input.to_path_buf(),
            base_dir,
        }])
    }
}
