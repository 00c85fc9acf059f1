// Document model - v1 and v2 cheatsheet shapes, normalization, loading

use crate::error::{ChsonError, Result};
use crate::schema::{detect_version, SchemaVersion};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

pub const DEFAULT_ANCHOR_LABEL: &str = "Anchor";
pub const DEFAULT_CONTENT_LABEL: &str = "Content";

/// How readers scan a cheatsheet: by syntax to find meaning, or by goal to
/// find syntax.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RetrievalDirection {
    #[default]
    MechanismToMeaning,
    IntentToMechanism,
    /// A value outside the schema enum. Kept verbatim so it can be echoed back.
    Other(String),
}

impl RetrievalDirection {
    pub fn as_str(&self) -> &str {
        match self {
            RetrievalDirection::MechanismToMeaning => "mechanism-to-meaning",
            RetrievalDirection::IntentToMechanism => "intent-to-mechanism",
            RetrievalDirection::Other(value) => value,
        }
    }

    /// True when the anchor column holds the mechanism (code).
    pub fn anchor_is_mechanism(&self) -> bool {
        matches!(self, RetrievalDirection::MechanismToMeaning)
    }
}

impl From<String> for RetrievalDirection {
    fn from(value: String) -> Self {
        match value.as_str() {
            "mechanism-to-meaning" => RetrievalDirection::MechanismToMeaning,
            "intent-to-mechanism" => RetrievalDirection::IntentToMechanism,
            _ => RetrievalDirection::Other(value),
        }
    }
}

impl From<RetrievalDirection> for String {
    fn from(value: RetrievalDirection) -> Self {
        match value {
            RetrievalDirection::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RetrievalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One table row: the cue a reader scans for and what it retrieves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    #[serde(deserialize_with = "null_as_default")]
    pub anchor: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub entries: Vec<Entry>,
}

/// A cheatsheet in the canonical (v2) shape.
///
/// Every field is lenient on input: missing values take their defaults so
/// schema-invalid documents can still be rendered best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Version of the documented product, unrelated to the schema version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub publication_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_direction: Option<RetrievalDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
}

impl Document {
    pub fn anchor_label(&self) -> &str {
        self.anchor_label.as_deref().unwrap_or(DEFAULT_ANCHOR_LABEL)
    }

    pub fn content_label(&self) -> &str {
        self.content_label.as_deref().unwrap_or(DEFAULT_CONTENT_LABEL)
    }

    pub fn retrieval_direction(&self) -> RetrievalDirection {
        self.retrieval_direction.clone().unwrap_or_default()
    }
}

/// Legacy item: a titled description with an optional example value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemV1 {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// `Some(Value::Null)` when the key is present with an explicit `null`.
    #[serde(
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionV1 {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<ItemV1>,
}

/// A cheatsheet in the legacy (v1) shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentV1 {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub publication_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(deserialize_with = "null_as_default")]
    pub sections: Vec<SectionV1>,
}

impl ItemV1 {
    /// Convert to a v2 entry. A non-empty formatted example becomes the
    /// anchor, otherwise the title does. The title moves to the label only
    /// when the example is truthy, so `0` or `false` anchor without a label.
    pub fn to_entry(&self) -> Entry {
        let example = self.example.as_ref().map(format_example).unwrap_or_default();
        let anchor = if example.is_empty() {
            self.title.clone()
        } else {
            example
        };
        let label = self
            .example
            .as_ref()
            .filter(|example| is_truthy(example))
            .map(|_| self.title.clone());

        Entry {
            anchor,
            content: self.description.clone(),
            label,
            comments: self.comments.clone(),
        }
    }
}

impl From<DocumentV1> for Document {
    fn from(doc: DocumentV1) -> Self {
        let sections = doc
            .sections
            .into_iter()
            .map(|section| Section {
                entries: section.items.iter().map(ItemV1::to_entry).collect(),
                title: section.title,
                description: section.description,
            })
            .collect();

        Document {
            schema: doc.schema,
            title: doc.title,
            version: doc.version,
            publication_date: doc.publication_date,
            description: doc.description,
            retrieval_direction: None,
            anchor_label: None,
            content_label: None,
            metadata: doc.metadata,
            sections,
        }
    }
}

/// Normalize a legacy document into the canonical v2 shape.
pub fn normalize_to_v2(doc: DocumentV1) -> Document {
    Document::from(doc)
}

/// A parsed document tagged with the schema version detected from `$schema`.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionedDocument {
    V1(DocumentV1),
    V2(Document),
}

impl VersionedDocument {
    /// Build the typed document from an already-parsed JSON value.
    /// `source_id` names the origin (usually a file path) in error messages.
    pub fn from_value(raw: Value, source_id: &str) -> Result<Self> {
        let shape_error = |e: serde_json::Error| ChsonError::Shape {
            source_id: source_id.to_string(),
            message: e.to_string(),
        };

        match detect_version(&raw) {
            SchemaVersion::V1 => Ok(VersionedDocument::V1(
                serde_json::from_value(raw).map_err(shape_error)?,
            )),
            SchemaVersion::V2 => Ok(VersionedDocument::V2(
                serde_json::from_value(raw).map_err(shape_error)?,
            )),
        }
    }

    pub fn version(&self) -> SchemaVersion {
        match self {
            VersionedDocument::V1(_) => SchemaVersion::V1,
            VersionedDocument::V2(_) => SchemaVersion::V2,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            VersionedDocument::V1(doc) => &doc.title,
            VersionedDocument::V2(doc) => &doc.title,
        }
    }

    /// Convert into the canonical v2 shape, normalizing v1 input.
    pub fn into_normalized(self) -> Document {
        match self {
            VersionedDocument::V1(doc) => normalize_to_v2(doc),
            VersionedDocument::V2(doc) => doc,
        }
    }
}

/// JavaScript truthiness of a JSON value: `null`, `false`, `0` and `""` are
/// falsy; arrays and objects are always truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Deserialize a field whose explicit `null` means the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Deserialize an optional value, keeping an explicit `null` as `Some(Null)`.
/// A missing key still falls back to `None` through the container default.
fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Render an example value as display text.
///
/// Strings pass through unchanged, `null` becomes empty, anything else is
/// pretty-printed JSON with two-space indentation.
pub fn format_example(example: &Value) -> String {
    match example {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => format!("{other:#}"),
    }
}

/// Parse raw bytes into a JSON value, attributing failures to `source_id`.
pub fn parse_json(bytes: &[u8], source_id: &str) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| ChsonError::Parse {
        source_id: source_id.to_string(),
        message: e.to_string(),
    })
}

/// Parse raw bytes into a version-tagged document without normalizing.
pub fn parse_document(bytes: &[u8], source_id: &str) -> Result<VersionedDocument> {
    let raw = parse_json(bytes, source_id)?;
    VersionedDocument::from_value(raw, source_id)
}

/// Read a document file as-is, tagged with its detected version.
pub fn read_document(path: &Path) -> Result<VersionedDocument> {
    let bytes = std::fs::read(path)?;
    parse_document(&bytes, &path.display().to_string())
}

/// Read a document file and normalize it into the canonical v2 shape.
pub fn load_document(path: &Path) -> Result<Document> {
    Ok(read_document(path)?.into_normalized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn v1_doc(items: Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "title": "Git",
            "publicationDate": "2026-01-16",
            "description": "Everyday git",
            "sections": [{ "title": "Basics", "items": items }]
        }))
        .unwrap()
    }

    fn first_entry(doc: &Document) -> &Entry {
        &doc.sections[0].entries[0]
    }

    #[test]
    fn test_format_example() {
        assert_eq!(format_example(&Value::Null), "");
        assert_eq!(format_example(&json!("git status")), "git status");
        assert_eq!(format_example(&json!({ "foo": "bar" })), "{\n  \"foo\": \"bar\"\n}");
        assert_eq!(format_example(&json!([1, 2])), "[\n  1,\n  2\n]");
        assert_eq!(format_example(&json!(42)), "42");
    }

    #[test]
    fn test_format_example_keeps_key_order() {
        let value: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": 2}"#).unwrap();
        assert_eq!(format_example(&value), "{\n  \"zeta\": 1,\n  \"alpha\": 2\n}");
    }

    #[test]
    fn test_normalize_example_becomes_anchor() {
        let bytes = v1_doc(json!([
            { "title": "Status", "example": "git status", "description": "Shows status" }
        ]));
        let doc = parse_document(&bytes, "git.chson.json").unwrap().into_normalized();

        assert_eq!(
            first_entry(&doc),
            &Entry {
                anchor: "git status".into(),
                content: "Shows status".into(),
                label: Some("Status".into()),
                comments: None,
            }
        );
    }

    #[test]
    fn test_normalize_without_example_uses_title() {
        let bytes = v1_doc(json!([{ "title": "Status", "description": "Shows status" }]));
        let doc = parse_document(&bytes, "git.chson.json").unwrap().into_normalized();

        let entry = first_entry(&doc);
        assert_eq!(entry.anchor, "Status");
        assert_eq!(entry.label, None);
    }

    #[test]
    fn test_normalize_empty_or_null_example_uses_title() {
        let bytes = v1_doc(json!([
            { "title": "Empty", "example": "", "description": "a" },
            { "title": "Null", "example": null, "description": "b" }
        ]));
        let doc = parse_document(&bytes, "git.chson.json").unwrap().into_normalized();

        let entries = &doc.sections[0].entries;
        assert_eq!(entries[0].anchor, "Empty");
        assert_eq!(entries[0].label, None);
        assert_eq!(entries[1].anchor, "Null");
        assert_eq!(entries[1].label, None);
    }

    #[test]
    fn test_normalize_structured_example_is_pretty_printed() {
        let bytes = v1_doc(json!([
            { "title": "Config", "example": { "core": { "editor": "vim" } }, "description": "c" }
        ]));
        let doc = parse_document(&bytes, "git.chson.json").unwrap().into_normalized();

        let entry = first_entry(&doc);
        assert_eq!(entry.anchor, "{\n  \"core\": {\n    \"editor\": \"vim\"\n  }\n}");
        assert_eq!(entry.label.as_deref(), Some("Config"));
    }

    #[test]
    fn test_normalize_keeps_comments_and_header() {
        let bytes = serde_json::to_vec(&json!({
            "$schema": "https://chson.dev/schema/v1/chson.schema.json",
            "title": "Git",
            "version": "2.43",
            "publicationDate": "2026-01-16",
            "description": "Everyday git",
            "metadata": { "category": "cli" },
            "sections": [{
                "title": "Basics",
                "description": "Start here",
                "items": [{ "title": "Status", "description": "s", "comments": ["note"] }]
            }]
        }))
        .unwrap();
        let doc = parse_document(&bytes, "git.chson.json").unwrap().into_normalized();

        assert_eq!(doc.schema.as_deref(), Some("https://chson.dev/schema/v1/chson.schema.json"));
        assert_eq!(doc.version.as_deref(), Some("2.43"));
        assert_eq!(doc.metadata.as_ref().unwrap()["category"], json!("cli"));
        assert_eq!(doc.sections[0].description.as_deref(), Some("Start here"));
        assert_eq!(first_entry(&doc).comments, Some(json!(["note"])));
        assert_eq!(doc.retrieval_direction, None);
        assert_eq!(doc.anchor_label(), "Anchor");
        assert_eq!(doc.content_label(), "Content");
    }

    #[test]
    fn test_normalize_preserves_order() {
        let bytes = v1_doc(json!([
            { "title": "c", "description": "3" },
            { "title": "a", "description": "1" },
            { "title": "b", "description": "2" }
        ]));
        let doc = parse_document(&bytes, "git.chson.json").unwrap().into_normalized();

        let anchors: Vec<&str> =
            doc.sections[0].entries.iter().map(|e| e.anchor.as_str()).collect();
        assert_eq!(anchors, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_v1_projection_of_v2_entry_normalizes_back() {
        let originals = vec![
            Entry {
                anchor: "gg".into(),
                content: "Jump to top".into(),
                label: Some("Go to start".into()),
                comments: None,
            },
            Entry {
                anchor: "G".into(),
                content: "Jump to bottom".into(),
                label: None,
                comments: None,
            },
        ];

        for original in originals {
            let item = match &original.label {
                Some(label) => ItemV1 {
                    title: label.clone(),
                    description: original.content.clone(),
                    example: Some(Value::String(original.anchor.clone())),
                    comments: None,
                },
                None => ItemV1 {
                    title: original.anchor.clone(),
                    description: original.content.clone(),
                    example: None,
                    comments: None,
                },
            };
            assert_eq!(item.to_entry(), original);
        }
    }

    #[test]
    fn test_v2_is_returned_unchanged() {
        let raw = json!({
            "$schema": "https://chson.dev/schema/v2/chson.schema.json",
            "title": "Atuin",
            "publicationDate": "2026-02-15",
            "description": "Keybindings",
            "retrievalDirection": "intent-to-mechanism",
            "anchorLabel": "Shortcut",
            "contentLabel": "Action",
            "sections": [{
                "title": "Nav",
                "entries": [{ "anchor": "enter", "content": "Execute", "label": "Run" }]
            }]
        });
        let parsed = parse_document(&serde_json::to_vec(&raw).unwrap(), "atuin").unwrap();
        assert_eq!(parsed.version(), SchemaVersion::V2);

        let doc = parsed.into_normalized();
        assert_eq!(doc.retrieval_direction(), RetrievalDirection::IntentToMechanism);
        assert_eq!(doc.anchor_label(), "Shortcut");
        assert_eq!(doc.content_label(), "Action");
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn test_unknown_retrieval_direction_is_kept() {
        let raw = br#"{"$schema": "/v2/", "retrievalDirection": "sideways"}"#;
        let doc = parse_document(raw, "odd").unwrap().into_normalized();

        let direction = doc.retrieval_direction();
        assert_eq!(direction, RetrievalDirection::Other("sideways".into()));
        assert!(!direction.anchor_is_mechanism());
        assert_eq!(direction.to_string(), "sideways");
    }

    #[test]
    fn test_missing_fields_default() {
        let doc = parse_document(br#"{"$schema": "/v2/"}"#, "empty").unwrap().into_normalized();
        assert_eq!(doc.title, "");
        assert!(doc.sections.is_empty());
        assert_eq!(doc.retrieval_direction(), RetrievalDirection::MechanismToMeaning);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = parse_document(b"{ not json", "broken.chson.json").unwrap_err();
        match &err {
            ChsonError::Parse { source_id, .. } => assert_eq!(source_id, "broken.chson.json"),
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(err.to_string().starts_with("Invalid JSON in broken.chson.json: "));
    }

    #[test]
    fn test_wrong_value_type_is_shape_error() {
        let err = parse_document(br#"{"title": 42}"#, "bad.chson.json").unwrap_err();
        assert!(matches!(err, ChsonError::Shape { .. }));
    }

    #[test]
    fn test_load_document_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("git.chson.json");
        std::fs::write(
            &path,
            v1_doc(json!([{ "title": "Status", "example": "git status", "description": "s" }])),
        )
        .unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(first_entry(&doc).anchor, "git status");
        assert_eq!(read_document(&path).unwrap().version(), SchemaVersion::V1);
    }

    #[test]
    fn test_falsy_example_anchors_without_label() {
        let bytes = v1_doc(json!([
            { "title": "Zero", "example": 0, "description": "a" },
            { "title": "False", "example": false, "description": "b" },
            { "title": "One", "example": 1, "description": "c" },
            { "title": "Empty list", "example": [], "description": "d" }
        ]));
        let doc = parse_document(&bytes, "git.chson.json").unwrap().into_normalized();

        let entries = &doc.sections[0].entries;
        assert_eq!((entries[0].anchor.as_str(), entries[0].label.as_deref()), ("0", None));
        assert_eq!((entries[1].anchor.as_str(), entries[1].label.as_deref()), ("false", None));
        assert_eq!((entries[2].anchor.as_str(), entries[2].label.as_deref()), ("1", Some("One")));
        assert_eq!(
            (entries[3].anchor.as_str(), entries[3].label.as_deref()),
            ("[]", Some("Empty list"))
        );
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_explicit_null_example_is_kept() {
        let bytes = v1_doc(json!([{ "title": "Null", "example": null, "description": "b" }]));
        match parse_document(&bytes, "git.chson.json").unwrap() {
            VersionedDocument::V1(doc) => {
                assert_eq!(doc.sections[0].items[0].example, Some(Value::Null));
            }
            other => panic!("expected v1, got {other:?}"),
        }

        let bytes = v1_doc(json!([{ "title": "Absent", "description": "b" }]));
        match parse_document(&bytes, "git.chson.json").unwrap() {
            VersionedDocument::V1(doc) => assert_eq!(doc.sections[0].items[0].example, None),
            other => panic!("expected v1, got {other:?}"),
        }
    }

    #[test]
    fn test_null_text_fields_default() {
        let raw = br#"{
            "$schema": "/v2/",
            "title": "T",
            "publicationDate": null,
            "description": null,
            "sections": [{ "title": null, "entries": [{ "anchor": "a", "content": null }] }]
        }"#;
        let doc = parse_document(raw, "p").unwrap().into_normalized();

        assert_eq!(doc.publication_date, "");
        assert_eq!(doc.description, "");
        assert_eq!(doc.sections[0].title, "");
        assert_eq!(doc.sections[0].entries[0].content, "");

        let raw = br#"{"title": null, "description": null, "sections": [{ "title": "S", "items": null }]}"#;
        let doc = parse_document(raw, "p").unwrap().into_normalized();
        assert_eq!(doc.title, "");
        assert!(doc.sections[0].entries.is_empty());
    }
}
