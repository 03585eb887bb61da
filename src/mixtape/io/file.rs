use super::{ByteSink, ByteSource};
use crate::error::{MixtapeError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Local file used as either a source or a sink.
#[derive(Debug, Clone)]
pub struct FileClient {
    path: PathBuf,
}

impl FileClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileClient {
    fn read(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(MixtapeError::Io)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl ByteSink for FileClient {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        fs::write(&self.path, data).map_err(MixtapeError::Io)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
