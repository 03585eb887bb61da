//! # Structural Validation
//!
//! Three JSON Schema documents guard the edges of the pipeline:
//!
//! - [`SchemaKind::Input`]: the whole input catalog.
//! - [`SchemaKind::Patch`]: the whole changes file.
//! - [`SchemaKind::PatchPlaylist`]: the `value` of each `add /playlists/-` patch.
//!
//! Validation here is purely structural. Cross references (does this user exist?)
//! belong to [`crate::catalog`].

use crate::error::{MixtapeError, Result};
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Input,
    Patch,
    PatchPlaylist,
}

impl SchemaKind {
    pub fn document(self) -> &'static Value {
        match self {
            SchemaKind::Input => &INPUT_SCHEMA,
            SchemaKind::Patch => &PATCH_SCHEMA,
            SchemaKind::PatchPlaylist => &PATCH_PLAYLIST_SCHEMA,
        }
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaKind::Input => write!(f, "input"),
            SchemaKind::Patch => write!(f, "patch"),
            SchemaKind::PatchPlaylist => write!(f, "playlist"),
        }
    }
}

fn id_schema() -> Value {
    json!({ "type": "string", "minLength": 1, "maxLength": 10 })
}

fn text_schema() -> Value {
    json!({ "type": "string", "minLength": 1, "maxLength": 512 })
}

fn playlist_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": id_schema(),
            "user_id": id_schema(),
            "song_ids": {
                "type": "array",
                "items": id_schema(),
                "minItems": 1,
                "maxItems": 512,
                "uniqueItems": true
            }
        },
        "additionalProperties": false,
        "required": ["id", "user_id", "song_ids"]
    })
}

static INPUT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "definitions": {
            "user": {
                "type": "object",
                "properties": { "id": id_schema(), "name": text_schema() },
                "additionalProperties": false,
                "required": ["id", "name"]
            },
            "playlist": playlist_schema(),
            "song": {
                "type": "object",
                "properties": {
                    "id": id_schema(),
                    "artist": text_schema(),
                    "title": text_schema()
                },
                "additionalProperties": false,
                "required": ["id", "artist", "title"]
            }
        },
        "type": "object",
        "properties": {
            "users": { "type": "array", "items": { "$ref": "#/definitions/user" } },
            "playlists": { "type": "array", "items": { "$ref": "#/definitions/playlist" } },
            "songs": { "type": "array", "items": { "$ref": "#/definitions/song" } }
        },
        "additionalProperties": false,
        "required": ["users", "playlists", "songs"]
    })
});

static PATCH_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "op": { "type": "string", "enum": ["add", "remove"] },
                "path": {
                    "type": "string",
                    "maxLength": 32,
                    "pattern": "^(/playlists/-|/playlists/[0-9]+|/playlists/[0-9]+/song_ids/-)$"
                },
                "value": {}
            },
            "additionalProperties": false,
            "required": ["op", "path"]
        }
    })
});

static PATCH_PLAYLIST_SCHEMA: Lazy<Value> = Lazy::new(playlist_schema);

/// Compiled form of all three schemas.
pub struct SchemaValidator {
    input: JSONSchema,
    patch: JSONSchema,
    patch_playlist: JSONSchema,
}

fn compile(kind: SchemaKind) -> Result<JSONSchema> {
    JSONSchema::compile(kind.document())
        .map_err(|e| MixtapeError::Schema(format!("{} schema does not compile: {}", kind, e)))
}

impl SchemaValidator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            input: compile(SchemaKind::Input)?,
            patch: compile(SchemaKind::Patch)?,
            patch_playlist: compile(SchemaKind::PatchPlaylist)?,
        })
    }

    fn compiled(&self, kind: SchemaKind) -> &JSONSchema {
        match kind {
            SchemaKind::Input => &self.input,
            SchemaKind::Patch => &self.patch,
            SchemaKind::PatchPlaylist => &self.patch_playlist,
        }
    }

    /// Validate a textual JSON document.
    ///
    /// Text that is not JSON at all is reported as a single violation.
    pub fn validate(
        &self,
        kind: SchemaKind,
        document: &[u8],
    ) -> std::result::Result<(), Vec<String>> {
        let value: Value = serde_json::from_slice(document)
            .map_err(|e| vec![format!("document is not valid JSON: {}", e)])?;
        self.validate_value(kind, &value)
    }

    /// Validate an already parsed document.
    pub fn validate_value(
        &self,
        kind: SchemaKind,
        value: &Value,
    ) -> std::result::Result<(), Vec<String>> {
        self.compiled(kind).validate(value).map_err(|errors| {
            errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        format!("(root): {}", e)
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect()
        })
    }
}

/// Join violations into one line for fatal error messages.
pub fn summarize(violations: &[String]) -> String {
    const SHOWN: usize = 3;
    let mut summary = violations
        .iter()
        .take(SHOWN)
        .cloned()
        .collect::<Vec<_>>()
        .join("; ");
    if violations.len() > SHOWN {
        summary.push_str(&format!(" (and {} more)", violations.len() - SHOWN));
    }
    summary
}
