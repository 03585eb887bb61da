//! # API Facade
//!
//! [`MixtapeApi`] is the single entry point for a run. It wires the byte
//! collaborators to the core and owns the order of operations:
//!
//! 1. **Ingest input**: read, validate against the input schema, build the [`Catalog`]
//! 2. **Ingest changes**: read, validate against the patch schema, decode
//! 3. **Apply**: replay the patches with the [`PatchEngine`]
//! 4. **Produce output**: serialize the catalog and hand it to the sink
//!
//! Any failure in steps 1, 2 or 4 is fatal. Nothing is written unless steps 1–3
//! succeeded, so a bad run never leaves a half-written output behind.
//!
//! ## Generic Over Collaborators
//!
//! `MixtapeApi<I, C, O>` is generic over its source and sink types:
//! - Production: `FileClient`/`HttpSource` in, `FileClient` out
//! - Testing: `MemoryBuffer` everywhere
//!
//! Like the rest of the library, the facade never prints and never exits.

use crate::catalog::Catalog;
use crate::error::{MixtapeError, Result};
use crate::io::{ByteSink, ByteSource};
use crate::model::Patch;
use crate::patch::{parse_patch_list, PatchEngine, PatchReport};
use crate::schema::SchemaValidator;
use tracing::info;

pub struct MixtapeApi<I: ByteSource, C: ByteSource, O: ByteSink> {
    input: I,
    changes: C,
    output: O,
    validator: SchemaValidator,
}

impl<I: ByteSource, C: ByteSource, O: ByteSink> MixtapeApi<I, C, O> {
    pub fn new(input: I, changes: C, output: O) -> Result<Self> {
        Ok(Self {
            input,
            changes,
            output,
            validator: SchemaValidator::new()?,
        })
    }

    pub fn ingest_input(&self) -> Result<Catalog> {
        let bytes = self.input.read().map_err(|e| match e {
            MixtapeError::InputFetch(msg) => MixtapeError::InputFetch(msg),
            other => {
                MixtapeError::InputFetch(format!("{}: {}", self.input.describe(), other))
            }
        })?;
        info!("Read {} bytes from {}", bytes.len(), self.input.describe());
        Catalog::load(&self.validator, &bytes)
    }

    pub fn ingest_changes(&self) -> Result<Vec<Patch>> {
        let bytes = self.changes.read().map_err(|e| {
            MixtapeError::ChangesRead(format!("{}: {}", self.changes.describe(), e))
        })?;
        let patches = parse_patch_list(&self.validator, &bytes)?;
        info!("Read {} changes from {}", patches.len(), self.changes.describe());
        Ok(patches)
    }

    pub fn apply_changes(&self, catalog: &mut Catalog, patches: &[Patch]) -> PatchReport {
        PatchEngine::new(&self.validator).apply(catalog, patches)
    }

    pub fn produce_output(&mut self, catalog: &Catalog) -> Result<()> {
        let bytes = catalog
            .serialize()
            .map_err(|e| MixtapeError::OutputWrite(e.to_string()))?;
        let target = self.output.describe();
        self.output
            .write(&bytes)
            .map_err(|e| MixtapeError::OutputWrite(format!("{}: {}", target, e)))
    }

    /// Run the whole pipeline once.
    pub fn run(&mut self) -> Result<PatchReport> {
        let mut catalog = self.ingest_input()?;
        let patches = self.ingest_changes()?;
        let report = self.apply_changes(&mut catalog, &patches);
        info!(
            "Applied {} changes, skipped {}, ignored {}",
            report.applied(),
            report.skipped(),
            report.ignored()
        );
        self.produce_output(&catalog)?;
        Ok(report)
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
