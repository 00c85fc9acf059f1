use crate::document::parse_json;
use crate::error::{ChsonError, Result};
use crate::schema::{detect_version, SchemaVersion};
use jsonschema::{Draft, Validator};
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

static V1_VALIDATOR: OnceCell<Validator> = OnceCell::new();
static V2_VALIDATOR: OnceCell<Validator> = OnceCell::new();

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// JSON pointer to the offending value; `/` for the document root.
    pub path: String,
    pub message: String,
}

/// Result of validating one document against one schema version
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub version: SchemaVersion,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compiled validator for `version`, built on first use and shared afterwards.
fn validator(version: SchemaVersion) -> Result<&'static Validator> {
    let cell = match version {
        SchemaVersion::V1 => &V1_VALIDATOR,
        SchemaVersion::V2 => &V2_VALIDATOR,
    };
    cell.get_or_try_init(|| compile(version))
}

fn compile(version: SchemaVersion) -> Result<Validator> {
    log::debug!("Compiling {version} schema from {}", version.schema_path());
    let schema = version.schema()?;
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .should_validate_formats(true)
        .build(&schema)
        .map_err(|e| ChsonError::Schema(format!("{}: {e}", version.schema_path())))
}

/// Validate a parsed document against the schema of `version`.
/// The document is checked as-is; v1 input is never normalized first.
pub fn validate(document: &Value, version: SchemaVersion) -> Result<ValidationReport> {
    let validator = validator(version)?;

    let errors = validator
        .iter_errors(document)
        .map(|error| {
            let path = error.instance_path.to_string();
            ValidationIssue {
                path: if path.is_empty() { "/".to_string() } else { path },
                message: error.to_string(),
            }
        })
        .collect();

    Ok(ValidationReport { version, errors })
}

/// Validate a parsed document against the schema selected by its `$schema`.
pub fn validate_document(document: &Value) -> Result<ValidationReport> {
    validate(document, detect_version(document))
}

/// Read, parse and validate a single file.
pub fn validate_file(path: &Path) -> Result<ValidationReport> {
    let bytes = std::fs::read(path)?;
    let document = parse_json(&bytes, &path.display().to_string())?;
    validate_document(&document)
}

/// What happened to one file in a batch.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was parsed and checked against its schema.
    Checked(ValidationReport),
    /// The file could not be read or parsed.
    Failed(ChsonError),
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        matches!(&self.outcome, FileOutcome::Checked(report) if report.is_valid())
    }
}

/// Validate every file in order, handing each report to `on_file` as soon as
/// it is produced. A failing file never stops the batch.
/// Returns true only if every file is valid.
pub fn validate_files<F>(paths: &[PathBuf], mut on_file: F) -> bool
where
    F: FnMut(&FileReport),
{
    let mut ok = true;

    for path in paths {
        let outcome = match validate_file(path) {
            Ok(report) => FileOutcome::Checked(report),
            Err(e) => FileOutcome::Failed(e),
        };
        let report = FileReport {
            path: path.clone(),
            outcome,
        };

        if !report.is_valid() {
            ok = false;
        }
        on_file(&report);
    }

    ok
}
