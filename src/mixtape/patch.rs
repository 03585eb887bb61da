//! # Patch Engine
//!
//! Replays the changes file against a [`Catalog`], one patch at a time, in file order.
//!
//! ## Grammar
//!
//! Only three `(op, path)` shapes are understood. They are matched in this order:
//!
//! | op       | path                        | value             |
//! |----------|-----------------------------|-------------------|
//! | `add`    | `/playlists/-`              | playlist object   |
//! | `add`    | `/playlists/{N}/song_ids/-` | song id string    |
//! | `remove` | `/playlists/{N}`            | ignored           |
//!
//! This is not a JSON Pointer implementation; anything else is ignored.
//!
//! ## Failure Policy
//!
//! The list as a whole must pass the patch schema, otherwise nothing is applied
//! and the run fails. Past that point every patch stands alone: a patch with a bad
//! value or a dangling reference is skipped with a warning and the next patch runs.

use crate::catalog::Catalog;
use crate::error::{MixtapeError, Result};
use crate::model::{Patch, PatchOp, Playlist};
use crate::schema::{summarize, SchemaKind, SchemaValidator};
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// A recognised patch path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchPath {
    /// `/playlists/-`
    NewPlaylist,
    /// `/playlists/{N}/song_ids/-`
    PlaylistSongs(String),
    /// `/playlists/{N}`
    Playlist(String),
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for PatchPath {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("/playlists/")
            .ok_or_else(|| format!("Unsupported path: {}", s))?;

        if rest == "-" {
            return Ok(PatchPath::NewPlaylist);
        }
        if let Some(id) = rest.strip_suffix("/song_ids/-") {
            if is_digits(id) {
                return Ok(PatchPath::PlaylistSongs(id.to_string()));
            }
        }
        if is_digits(rest) {
            return Ok(PatchPath::Playlist(rest.to_string()));
        }
        Err(format!("Unsupported path: {}", s))
    }
}

/// What happened to a single patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied { index: usize, summary: String },
    Skipped { index: usize, reason: String },
    Ignored { index: usize },
}

#[derive(Debug, Default)]
pub struct PatchReport {
    pub outcomes: Vec<PatchOutcome>,
}

impl PatchReport {
    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, PatchOutcome::Applied { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, PatchOutcome::Skipped { .. }))
    }

    pub fn ignored(&self) -> usize {
        self.count(|o| matches!(o, PatchOutcome::Ignored { .. }))
    }

    fn count(&self, pred: impl Fn(&PatchOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Validate the changes file and decode it.
pub fn parse_patch_list(validator: &SchemaValidator, bytes: &[u8]) -> Result<Vec<Patch>> {
    if let Err(violations) = validator.validate(SchemaKind::Patch, bytes) {
        for violation in &violations {
            debug!("patch schema violation: {}", violation);
        }
        return Err(MixtapeError::InvalidPatchList(summarize(&violations)));
    }
    serde_json::from_slice(bytes).map_err(|e| MixtapeError::InvalidPatchList(e.to_string()))
}

pub struct PatchEngine<'a> {
    validator: &'a SchemaValidator,
}

impl<'a> PatchEngine<'a> {
    pub fn new(validator: &'a SchemaValidator) -> Self {
        Self { validator }
    }

    /// Apply every patch in order. Individual failures never abort the batch.
    pub fn apply(&self, catalog: &mut Catalog, patches: &[Patch]) -> PatchReport {
        let mut report = PatchReport::default();

        for (index, patch) in patches.iter().enumerate() {
            let outcome = match self.apply_one(catalog, patch) {
                Some(Ok(summary)) => {
                    debug!(index, op = %patch.op, path = %patch.path, "{}", summary);
                    PatchOutcome::Applied { index, summary }
                }
                Some(Err(reason)) => {
                    warn!(
                        "Skipping patch #{} ({} {}): {}",
                        index, patch.op, patch.path, reason
                    );
                    PatchOutcome::Skipped { index, reason }
                }
                None => {
                    info!("Ignoring patch #{} ({} {})", index, patch.op, patch.path);
                    PatchOutcome::Ignored { index }
                }
            };
            report.outcomes.push(outcome);
        }

        report
    }

    /// `None` when the patch matches no known shape.
    fn apply_one(
        &self,
        catalog: &mut Catalog,
        patch: &Patch,
    ) -> Option<std::result::Result<String, String>> {
        let path = patch.path.parse::<PatchPath>().ok()?;

        let result = match (patch.op, path) {
            (PatchOp::Add, PatchPath::NewPlaylist) => {
                self.add_playlist(catalog, patch.value.as_ref())
            }
            (PatchOp::Add, PatchPath::PlaylistSongs(id)) => {
                add_song(catalog, &id, patch.value.as_ref())
            }
            (PatchOp::Remove, PatchPath::Playlist(id)) => catalog
                .remove_playlist(&id)
                .map(|_| format!("Removed playlist {}", id))
                .map_err(|e| e.to_string()),
            _ => return None,
        };
        Some(result)
    }

    fn add_playlist(
        &self,
        catalog: &mut Catalog,
        value: Option<&Value>,
    ) -> std::result::Result<String, String> {
        let value = value.ok_or("Missing playlist value")?;

        self.validator
            .validate_value(SchemaKind::PatchPlaylist, value)
            .map_err(|v| format!("Invalid playlist value: {}", summarize(&v)))?;

        let playlist: Playlist = serde_json::from_value(value.clone())
            .map_err(|e| format!("Invalid playlist value: {}", e))?;

        let id = catalog.add_playlist(playlist).map_err(|e| e.to_string())?;
        Ok(format!("Added playlist {}", id))
    }
}

fn add_song(
    catalog: &mut Catalog,
    playlist_id: &str,
    value: Option<&Value>,
) -> std::result::Result<String, String> {
    let song_id = match value {
        None => return Err("Missing song ID value".to_string()),
        Some(Value::String(s)) => s,
        Some(_) => return Err("Invalid song ID value".to_string()),
    };

    catalog
        .add_song_to_playlist(playlist_id, song_id)
        .map_err(|e| e.to_string())?;
    Ok(format!("Added song {} to playlist {}", song_id, playlist_id))
}
