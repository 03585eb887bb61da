use super::{ByteSink, ByteSource};
use crate::error::{MixtapeError, Result};

/// In-memory document for testing.
///
/// Acts as a source (returns its contents) and as a sink (replaces them).
#[derive(Debug, Default, Clone)]
pub struct MemoryBuffer {
    data: Option<Vec<u8>>,
    simulate_write_error: bool,
}

impl MemoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(data.into()),
            simulate_write_error: false,
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    /// Bytes last written, if any.
    pub fn contents(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }
}

impl ByteSource for MemoryBuffer {
    fn read(&self) -> Result<Vec<u8>> {
        self.data.clone().ok_or_else(|| {
            MixtapeError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "memory buffer is empty",
            ))
        })
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

impl ByteSink for MemoryBuffer {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        if self.simulate_write_error {
            return Err(MixtapeError::OutputWrite("Simulated write error".to_string()));
        }
        self.data = Some(data.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
