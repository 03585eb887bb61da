use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INPUT_URL: &str = "https://gist.githubusercontent.com/jmodjeska/0679cf6cd670f76f07f1874ce00daaeb/raw/a4ac53fa86452ac26d706df2e851fb7d02697b4b/mixtape-data.json";
pub const DEFAULT_CHANGES_PATH: &str = "changes.json";
pub const DEFAULT_OUTPUT_PATH: &str = "output.json";

/// Where the input catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLocation {
    Path(PathBuf),
    Url(String),
}

impl InputLocation {
    /// A non-empty path wins over the URL.
    pub fn resolve(path: Option<&str>, url: Option<&str>) -> Self {
        match path {
            Some(p) if !p.is_empty() => InputLocation::Path(PathBuf::from(p)),
            _ => InputLocation::Url(
                url.filter(|u| !u.is_empty())
                    .unwrap_or(DEFAULT_INPUT_URL)
                    .to_string(),
            ),
        }
    }
}

impl std::fmt::Display for InputLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputLocation::Path(p) => write!(f, "{}", p.display()),
            InputLocation::Url(u) => write!(f, "{}", u),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// TCP connect deadline
    pub connect: Duration,
    /// Deadline for the whole request, body included
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(3),
            request: Duration::from_secs(3 * 60),
        }
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixtapeConfig {
    pub input: InputLocation,
    pub changes: PathBuf,
    pub output: PathBuf,
    pub http: HttpTimeouts,
}

impl Default for MixtapeConfig {
    fn default() -> Self {
        Self {
            input: InputLocation::Url(DEFAULT_INPUT_URL.to_string()),
            changes: PathBuf::from(DEFAULT_CHANGES_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            http: HttpTimeouts::default(),
        }
    }
}

impl MixtapeConfig {
    pub fn with_input(mut self, input: InputLocation) -> Self {
        self.input = input;
        self
    }

    pub fn with_changes(mut self, changes: impl Into<PathBuf>) -> Self {
        self.changes = changes.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}
