//! # Mixtape Architecture
//!
//! Mixtape is a one-shot batch tool: it reads a catalog of users, songs and
//! playlists, replays an ordered list of changes against it, and writes the
//! resulting catalog back out in the same shape.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, wired by main.rs)                      │
//! │  - Parses flags, sets up logging                            │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Read → validate → load → apply → serialize → write       │
//! │  - Decides which failures are fatal                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (catalog.rs, patch.rs, schema.rs)                     │
//! │  - Catalog store with referential integrity                 │
//! │  - Patch engine with skip-on-error semantics                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Byte Collaborators (io/)                                   │
//! │  - ByteSource / ByteSink traits                             │
//! │  - FileClient, HttpSource (production), MemoryBuffer (tests)│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! bytes → [`schema`] → [`catalog::Catalog`] → [`patch::PatchEngine`] →
//! [`catalog::Catalog::serialize`] → bytes
//!
//! ## Failure Model
//!
//! Structural problems with either input file are fatal. Semantic problems with a
//! single patch (unknown playlist, dangling song, bad value) skip that patch only.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for a run
//! - [`catalog`]: In-memory store and id allocation
//! - [`patch`]: Patch path grammar and the engine
//! - [`schema`]: JSON Schema documents and validator
//! - [`model`]: Wire types (`User`, `Song`, `Playlist`, `Mixtape`, `Patch`)
//! - [`io`]: Byte source/sink abstraction and implementations
//! - [`config`]: Run settings and defaults
//! - [`error`]: Error types

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod patch;
pub mod schema;
