use clap::Parser;
use mixtape::config::{
    InputLocation, MixtapeConfig, DEFAULT_CHANGES_PATH, DEFAULT_INPUT_URL, DEFAULT_OUTPUT_PATH,
};

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "mixtape", bin_name = "mixtape", version = get_version())]
#[command(
    about = "Apply a changes file to a mixtape catalog and write the result",
    long_about = None
)]
pub struct Cli {
    /// The input file URL (used when no input path is given)
    #[arg(short = 'u', long = "url", default_value = DEFAULT_INPUT_URL)]
    pub url: String,

    /// The input file path (takes precedence over the URL)
    #[arg(short = 'p', long = "path")]
    pub path: Option<String>,

    /// The changes file
    #[arg(short = 'c', long = "changes", default_value = DEFAULT_CHANGES_PATH)]
    pub changes: String,

    /// The output file path
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: String,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn to_config(&self) -> MixtapeConfig {
        let input = InputLocation::resolve(self.path.as_deref(), Some(self.url.as_str()));
        MixtapeConfig::default()
            .with_input(input)
            .with_changes(&self.changes)
            .with_output(&self.output)
    }
}
