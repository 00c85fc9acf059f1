use crate::collect::{find_documents, strip_chson_suffix};
use crate::document::{load_document, Document};
use crate::error::{ChsonError, Result};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Environment variable that points at the registry directory.
pub const REGISTRY_ENV: &str = "CHSON_REGISTRY_DIR";

/// Registry location relative to the repository root.
pub const REGISTRY_SUBDIR: &str = "packages/chson-registry/cheatsheets";

/// A cheatsheet found in the registry, keyed by product and name.
#[derive(Debug, Clone, Serialize)]
pub struct CheatsheetRef {
    /// First path segment under the registry root (e.g. `git`).
    pub product: String,
    /// File name without the `.chson.json` suffix.
    pub name: String,
    pub file_path: PathBuf,
    /// The document, normalized to the v2 shape.
    pub data: Document,
}

/// A directory tree of cheatsheets organised as `<product>/.../<name>.chson.json`.
#[derive(Debug, Clone)]
pub struct Registry {
    root: PathBuf,
}

impl Registry {
    /// Open a registry rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ChsonError::PathNotFound(root));
        }
        Ok(Registry { root })
    }

    /// Locate the registry from `CHSON_REGISTRY_DIR`, falling back to the
    /// usual locations relative to the current directory.
    pub fn discover() -> Result<Self> {
        if let Ok(dir) = std::env::var(REGISTRY_ENV) {
            log::debug!("Using registry from {REGISTRY_ENV}: {dir}");
            return Registry::open(dir);
        }
        let cwd = std::env::current_dir()?;
        Registry::discover_from(&cwd)
    }

    /// Look for the registry at the repository root (`cwd`) or two levels up
    /// (when `cwd` is an app directory inside the repository).
    pub fn discover_from(cwd: &Path) -> Result<Self> {
        let from_repo_root = cwd.join(REGISTRY_SUBDIR);
        if from_repo_root.is_dir() {
            return Registry::open(from_repo_root);
        }

        let from_app = cwd.join("../..").join(REGISTRY_SUBDIR);
        if from_app.is_dir() {
            let resolved = from_app.canonicalize()?;
            return Registry::open(resolved);
        }

        Err(ChsonError::Registry(format!(
            "Could not find cheatsheets at {} or {}",
            from_repo_root.display(),
            from_app.display()
        )))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every document file in the registry. Directories named `node_modules`
    /// or starting with a dot are skipped.
    pub fn list_paths(&self) -> Result<Vec<PathBuf>> {
        let paths = find_documents(&self.root)?
            .into_iter()
            .filter(|path| {
                let keep = !self.in_skipped_dir(path);
                if !keep {
                    log::debug!("Skipping {}", path.display());
                }
                keep
            })
            .collect();
        Ok(paths)
    }

    fn in_skipped_dir(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let Some(parent) = relative.parent() else {
            return false;
        };
        parent.components().any(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                name == "node_modules" || name.starts_with('.')
            }
            _ => false,
        })
    }

    /// Load a document and normalize it to the v2 shape.
    pub fn load(&self, path: &Path) -> Result<Document> {
        load_document(path)
    }

    /// Load every cheatsheet in the registry. Files whose product or name
    /// would be empty are left out.
    pub fn all_cheatsheets(&self) -> Result<Vec<CheatsheetRef>> {
        let mut refs = Vec::new();

        for file_path in self.list_paths()? {
            let relative = file_path.strip_prefix(&self.root).unwrap_or(&file_path);
            let product = relative
                .components()
                .next()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .unwrap_or_default();
            let file_name = relative
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let name = strip_chson_suffix(&file_name)
                .unwrap_or(&file_name)
                .to_string();

            if product.is_empty() || name.is_empty() {
                log::warn!("Skipping cheatsheet without product or name: {}", file_path.display());
                continue;
            }

            let data = self.load(&file_path)?;
            refs.push(CheatsheetRef {
                product,
                name,
                file_path,
                data,
            });
        }

        Ok(refs)
    }
}
