//! Batch orchestration: collect, convert and write, one file at a time.

use crate::collect::collect_candidates;
use crate::dispatch::Dispatcher;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use txtify_core::{render, Error, OutputFormat, Result};

/// Settings for a batch conversion.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Root directory receiving converted files.
    pub output_dir: PathBuf,

    /// Format of the written files.
    pub format: OutputFormat,
}

impl BatchConfig {
    /// Plain-text output below `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: OutputFormat::default(),
        }
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// What happened to one candidate file.
#[derive(Debug)]
pub enum ConversionOutcome {
    /// Text was extracted and written to `destination`.
    Converted { source: PathBuf, destination: PathBuf },
    /// Conversion failed; nothing was written for this file.
    Failed { source: PathBuf, error: Error },
}

impl ConversionOutcome {
    /// The candidate file this outcome belongs to.
    pub fn source(&self) -> &Path {
        match self {
            Self::Converted { source, .. } | Self::Failed { source, .. } => source,
        }
    }

    /// Whether the file was written.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Converted { .. })
    }
}

/// Outcomes of a finished batch, in processing order.
#[derive(Debug)]
pub struct BatchReport {
    /// Root directory that received the converted files.
    pub output_dir: PathBuf,

    /// One entry per candidate file.
    pub outcomes: Vec<ConversionOutcome>,
}

impl BatchReport {
    fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            outcomes: Vec::new(),
        }
    }

    /// Number of files written.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of files that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Where the converted form of `candidate` is written.
///
/// The candidate's path relative to `input_root` is re-rooted under
/// `output_dir` with its extension replaced. A candidate that is the input
/// root itself keeps only its file name. Each input root is mirrored
/// independently, so equal relative paths from different roots map to the
/// same destination and the later one overwrites the earlier.
pub fn output_location(
    input_root: &Path,
    candidate: &Path,
    output_dir: &Path,
    format: OutputFormat,
) -> PathBuf {
    let relative = match candidate.strip_prefix(input_root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => candidate
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| candidate.to_path_buf()),
    };

    output_dir.join(relative).with_extension(format.extension())
}

/// Converts candidate files and writes the results.
pub struct Converter {
    dispatcher: Dispatcher,
    config: BatchConfig,
}

impl Converter {
    /// Converter using the built-in extractors.
    pub fn new(config: BatchConfig) -> Self {
        Self::with_dispatcher(Dispatcher::new(), config)
    }

    /// Converter using a custom dispatcher.
    pub fn with_dispatcher(dispatcher: Dispatcher, config: BatchConfig) -> Self {
        Self { dispatcher, config }
    }

    /// Convert every candidate under every input root.
    ///
    /// Only failing to create the output directory aborts the run; every
    /// other error is recorded against its file and the batch continues.
    /// `on_outcome` sees each outcome as soon as the file is done.
    pub fn run<P, F>(&self, inputs: &[P], mut on_outcome: F) -> Result<BatchReport>
    where
        P: AsRef<Path>,
        F: FnMut(&ConversionOutcome),
    {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| Error::OutputRoot {
            path: output_dir.clone(),
            source,
        })?;

        let mut report = BatchReport::new(output_dir.clone());

        for input in inputs {
            let input_root = input.as_ref();
            let candidates = collect_candidates(input_root);
            debug!(
                "{}: {} candidate files",
                input_root.display(),
                candidates.len()
            );

            for candidate in candidates {
                let outcome = self.convert_file(input_root, &candidate);
                log_outcome(&outcome);
                on_outcome(&outcome);
                report.outcomes.push(outcome);
            }
        }

        info!(
            "Batch finished: {} converted, {} failed",
            report.succeeded(),
            report.failed()
        );

        Ok(report)
    }

    /// Convert a single candidate found under `input_root`.
    pub fn convert_file(&self, input_root: &Path, candidate: &Path) -> ConversionOutcome {
        match self.try_convert(input_root, candidate) {
            Ok(destination) => ConversionOutcome::Converted {
                source: candidate.to_path_buf(),
                destination,
            },
            Err(error) => ConversionOutcome::Failed {
                source: candidate.to_path_buf(),
                error,
            },
        }
    }

    fn try_convert(&self, input_root: &Path, candidate: &Path) -> Result<PathBuf> {
        let (kind, text) = self.dispatcher.dispatch(candidate)?;
        let contents = render(self.config.format, candidate, kind, &text)?;

        let destination = output_location(
            input_root,
            candidate,
            &self.config.output_dir,
            self.config.format,
        );

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&destination, contents).map_err(|source| Error::WriteOutput {
            path: destination.clone(),
            source,
        })?;

        Ok(destination)
    }
}

fn log_outcome(outcome: &ConversionOutcome) {
    match outcome {
        ConversionOutcome::Converted {
            source,
            destination,
        } => info!("Converted {} -> {}", source.display(), destination.display()),
        ConversionOutcome::Failed { source, error } => {
            warn!("Failed to convert {}: {}", source.display(), error)
        }
    }
}

/// Convert `inputs` to plain text below `output_dir` with the built-in
/// extractors.
pub fn batch_convert<P: AsRef<Path>>(inputs: &[P], output_dir: impl Into<PathBuf>) -> Result<BatchReport> {
    Converter::new(BatchConfig::new(output_dir)).run(inputs, |_| {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_location_mirrors_relative_path() {
        let dest = output_location(
            Path::new("a/b"),
            Path::new("a/b/x/y.pptx"),
            Path::new("out"),
            OutputFormat::Text,
        );
        assert_eq!(dest, PathBuf::from("out/x/y.txt"));
    }

    #[test]
    fn test_output_location_for_file_root_uses_file_name() {
        let dest = output_location(
            Path::new("docs/report.pdf"),
            Path::new("docs/report.pdf"),
            Path::new("out"),
            OutputFormat::Text,
        );
        assert_eq!(dest, PathBuf::from("out/report.txt"));
    }

    #[test]
    fn test_output_location_only_replaces_last_extension() {
        let dest = output_location(
            Path::new("in"),
            Path::new("in/q3.final.xlsx"),
            Path::new("out"),
            OutputFormat::Markdown,
        );
        assert_eq!(dest, PathBuf::from("out/q3.final.md"));
    }

    #[test]
    fn test_report_counts() {
        let mut report = BatchReport::new(PathBuf::from("out"));
        report.outcomes.push(ConversionOutcome::Converted {
            source: PathBuf::from("a.pdf"),
            destination: PathBuf::from("out/a.txt"),
        });
        report.outcomes.push(ConversionOutcome::Failed {
            source: PathBuf::from("b.docx"),
            error: Error::ZipError("bad".to_string()),
        });

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.outcomes[1].source(), Path::new("b.docx"));
    }
}
