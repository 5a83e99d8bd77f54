//! `padron-validate` -- checks a beneficiary-registry spreadsheet and writes
//! a `<SCHEMA>_VALIDATED.zip` with the original rows and detected errors.
//!
//! # Usage
//!
//! ```text
//! padron-validate <FILE>             validate, print summary, write export
//! padron-validate --json <FILE>      same, but print the report as JSON
//! padron-validate --ask <QUESTION>   answer a form-filling question
//! ```
//!
//! # Environment variables
//!
//! See [`ValidatorConfig::from_env`] for the full table; `RUST_LOG` controls
//! log verbosity (default `padron_validator=info`).

use std::path::{Path, PathBuf};

use padron_core::matcher::{answer_or_fallback, KnowledgeBase};
use padron_validator::codec::CsvZipCodec;
use padron_validator::config::ValidatorConfig;
use padron_validator::error::AppError;
use padron_validator::matcher::FuzzyMatcher;
use padron_validator::session::ValidationSession;

use clap::{ArgGroup, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Validate a beneficiary-registry spreadsheet or ask a form-filling question.
#[derive(Parser, Debug)]
#[command(name = "padron-validate", version)]
#[command(group(ArgGroup::new("input").required(true).args(["file", "ask"])))]
struct Cli {
    /// Spreadsheet to validate (.xlsx, .csv or a previous export .zip)
    file: Option<PathBuf>,

    /// Print the report as JSON instead of the text summary
    #[arg(long, requires = "file")]
    json: bool,

    /// Answer a question about how to fill in the form
    #[arg(long, value_name = "QUESTION", num_args = 1.., conflicts_with = "file")]
    ask: Option<Vec<String>>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "padron_validator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ValidatorConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    if let Some(words) = cli.ask {
        let matcher = FuzzyMatcher::new(KnowledgeBase::default(), config.match_cutoff);
        println!("{}", answer_or_fallback(&matcher, &words.join(" ")));
        return;
    }

    let Some(path) = cli.file else {
        return;
    };
    match run_validation(&config, &path, cli.json).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "Validation failed");
            println!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}

/// Validate `path` and write the export. Returns `false` when validation
/// stopped at table level (unrecognized file or missing columns), in which
/// case no export is produced.
async fn run_validation(config: &ValidatorConfig, path: &Path, json: bool) -> Result<bool, AppError> {
    let mut session = ValidationSession::from_config(config, CsvZipCodec)?;
    session.load_file(path).await?;

    let validated = {
        let report = session.validate()?;
        if json {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        report.notice.is_none()
    };
    if !json {
        println!("{}", session.summary()?);
    }
    if !validated {
        return Ok(false);
    }

    let written = session.export_to_dir(&config.output_dir).await?;
    println!("{}", written.display());
    Ok(true)
}
