//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::{Extracted, Formatter};
use crate::source;
use crate::submit::Submitter;
use dme_extractor::{ErrorKind, OrderExtractor};
use std::path::PathBuf;
use tracing::{info, warn};

/// A note that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Note file
    pub path: PathBuf,
    /// Short failure class
    pub kind: &'static str,
    /// Error message
    pub message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct Report {
    /// Notes that produced a record
    pub extracted: Vec<Extracted>,
    /// Notes that failed to read, extract or submit
    pub failures: Vec<Failure>,
}

/// Execute the extract command.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let mut extractor_config = config.extractor.clone();
    if let Some(strategy) = args.strategy {
        extractor_config.strategy = strategy.into();
    }
    let extractor = OrderExtractor::from_config(&extractor_config)?;

    let submitter = if args.submit {
        let endpoint = args
            .endpoint
            .or_else(|| config.submission.endpoint.clone())
            .ok_or_else(|| {
                CliError::Config(
                    "--submit needs --endpoint, DME_SUBMIT_ENDPOINT or submission.endpoint"
                        .to_string(),
                )
            })?;
        Some(Submitter::new(endpoint)?)
    } else {
        None
    };

    let files = source::discover(&args.paths)?;
    let report = run_extraction(&extractor, submitter.as_ref(), &files).await;

    for failure in &report.failures {
        eprintln!(
            "{}",
            formatter.error(&format!(
                "{} [{}]: {}",
                failure.path.display(),
                failure.kind,
                failure.message
            ))
        );
    }

    println!("{}", formatter.format_orders(&report.extracted)?);

    if let Some(submitter) = &submitter {
        let submitted = report.extracted.len()
            - report.failures.iter().filter(|f| f.kind == "submission").count();
        eprintln!(
            "{}",
            formatter.success(&format!(
                "Submitted {} record(s) to {}",
                submitted,
                submitter.endpoint()
            ))
        );
    }

    if report.failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::Extraction(format!(
            "{} of {} note(s) failed",
            report.failures.len(),
            files.len()
        )))
    }
}

/// Extract, and optionally submit, every note in order.
///
/// A failing note is recorded and the run continues.
pub async fn run_extraction(
    extractor: &OrderExtractor,
    submitter: Option<&Submitter>,
    files: &[PathBuf],
) -> Report {
    let mut report = Report::default();

    for path in files {
        let note = match source::read_note(path) {
            Ok(note) => note,
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                report.failures.push(Failure {
                    path: path.clone(),
                    kind: "read",
                    message: e.to_string(),
                });
                continue;
            }
        };

        let order = match extractor.extract(&note.text).await {
            Ok(order) => order,
            Err(e) => {
                warn!("Extraction failed for {}: {}", path.display(), e);
                report.failures.push(Failure {
                    path: path.clone(),
                    kind: error_kind_label(e.kind()),
                    message: e.to_string(),
                });
                continue;
            }
        };

        if let Some(submitter) = submitter {
            if let Err(e) = submitter.submit(&order).await {
                report.failures.push(Failure {
                    path: path.clone(),
                    kind: "submission",
                    message: e.to_string(),
                });
            }
        }

        report.extracted.push(Extracted {
            path: note.path,
            order,
        });
    }

    info!(
        "Processed {} note(s): {} extracted, {} failure(s)",
        files.len(),
        report.extracted.len(),
        report.failures.len()
    );

    report
}

fn error_kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidInput => "invalid-input",
        ErrorKind::Upstream => "upstream",
        ErrorKind::Config => "config",
    }
}
