//! Schema versions and the bundled JSON Schema documents.

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

const V1_SCHEMA: &str = include_str!("../../schema/v1/chson.schema.json");
const V2_SCHEMA: &str = include_str!("../../schema/v2/chson.schema.json");

/// The `$schema` URL fragment that marks a v2 document.
const V2_MARKER: &str = "/v2/";

/// ChSON schema generation a document is written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// Legacy shape: sections of `items` with `title`/`description`/`example`.
    V1,
    /// Current shape: sections of `entries` with `anchor`/`content`/`label`.
    V2,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::V1, SchemaVersion::V2];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVersion::V1 => "v1",
            SchemaVersion::V2 => "v2",
        }
    }

    /// Canonical URL authors put in `$schema`.
    pub fn schema_url(self) -> &'static str {
        match self {
            SchemaVersion::V1 => "https://chson.dev/schema/v1/chson.schema.json",
            SchemaVersion::V2 => "https://chson.dev/schema/v2/chson.schema.json",
        }
    }

    /// Location of the bundled schema asset, as shown in validation reports.
    pub fn schema_path(self) -> &'static str {
        match self {
            SchemaVersion::V1 => "chson/schema/v1/chson.schema.json",
            SchemaVersion::V2 => "chson/schema/v2/chson.schema.json",
        }
    }

    pub fn schema_source(self) -> &'static str {
        match self {
            SchemaVersion::V1 => V1_SCHEMA,
            SchemaVersion::V2 => V2_SCHEMA,
        }
    }

    /// Parse the bundled schema document for this version.
    pub fn schema(self) -> Result<Value> {
        Ok(serde_json::from_str(self.schema_source())?)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a parsed document by its `$schema` URL.
///
/// Anything whose `$schema` contains `/v2/` is v2. A missing, non-string or
/// unrecognised `$schema` falls back to v1 so legacy files keep working.
pub fn detect_version(raw: &Value) -> SchemaVersion {
    let is_v2 = raw
        .get("$schema")
        .and_then(Value::as_str)
        .map_or(false, |url| url.contains(V2_MARKER));

    if is_v2 {
        SchemaVersion::V2
    } else {
        SchemaVersion::V1
    }
}
