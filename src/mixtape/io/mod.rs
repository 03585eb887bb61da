//! # Byte Collaborators
//!
//! The catalog core never touches files or sockets directly. It consumes bytes
//! through [`ByteSource`] and emits bytes through [`ByteSink`], so the same
//! pipeline runs against local files, a remote catalog, or memory in tests.
//!
//! ## Implementations
//!
//! - [`file::FileClient`]: reads and writes a local path. Used for the input
//!   catalog (`-p`), the changes file (`-c`) and the output (`-o`).
//! - [`http::HttpSource`]: blocking GET of a remote catalog (`-u`).
//! - [`memory::MemoryBuffer`]: in-memory source/sink for testing.

use crate::error::Result;

pub mod file;
pub mod http;
pub mod memory;

/// Something that can deliver a whole document as bytes, once.
pub trait ByteSource {
    fn read(&self) -> Result<Vec<u8>>;

    /// Human-readable location used in log lines and error messages.
    fn describe(&self) -> String;
}

/// Something that can accept a whole document as bytes.
pub trait ByteSink {
    fn write(&mut self, data: &[u8]) -> Result<()>;

    fn describe(&self) -> String;
}
