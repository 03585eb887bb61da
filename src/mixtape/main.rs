use clap::Parser;
use colored::*;
use mixtape::api::MixtapeApi;
use mixtape::config::{InputLocation, MixtapeConfig};
use mixtape::error::Result;
use mixtape::io::file::FileClient;
use mixtape::io::http::HttpSource;
use mixtape::patch::PatchReport;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod args;
use args::Cli;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli.to_config()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr; `MIXTAPE_LOG` overrides the level picked by `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .with_env_var("MIXTAPE_LOG")
                .from_env_lossy(),
        )
        .try_init();
}

fn run(config: &MixtapeConfig) -> Result<()> {
    let changes = FileClient::new(&config.changes);
    let output = FileClient::new(&config.output);

    let report = match &config.input {
        InputLocation::Path(path) => {
            MixtapeApi::new(FileClient::new(path), changes, output)?.run()?
        }
        InputLocation::Url(url) => {
            MixtapeApi::new(HttpSource::new(url, &config.http)?, changes, output)?.run()?
        }
    };

    print_report(&report);
    println!(
        "{}",
        format!(
            "The output file {} was successfully created.",
            config.output.display()
        )
        .green()
    );
    Ok(())
}

fn print_report(report: &PatchReport) {
    let line = format!(
        "{} applied, {} skipped, {} ignored",
        report.applied(),
        report.skipped(),
        report.ignored()
    );
    if report.skipped() > 0 {
        println!("{}", line.yellow());
    } else {
        println!("{}", line.dimmed());
    }
}
