//! CLI tool for converting office documents and PDFs to plain text.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use txtify::{BatchConfig, ConversionOutcome, Converter, OutputFormat};

/// Convert PowerPoint, Word, Excel, and PDF files to text.
///
/// Directories are searched recursively; their structure is mirrored below
/// the output directory.
#[derive(Parser, Debug)]
#[command(name = "txtify")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files or directories to convert (.pptx, .docx, .xlsx, .pdf)
    #[arg(required = true, value_parser = existing_path)]
    inputs: Vec<PathBuf>,

    /// Output directory for converted files
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Output format (txt, markdown, json)
    #[arg(long, default_value = "txt")]
    output_format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn existing_path(s: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("path '{}' does not exist", s))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    log::debug!(
        "Converting {} input(s) to {:?} in {}",
        args.inputs.len(),
        args.output_format,
        args.output.display()
    );

    let config = BatchConfig::new(&args.output).with_format(args.output_format);
    let converter = Converter::new(config);

    let report = converter
        .run(&args.inputs, print_outcome)
        .with_context(|| format!("Conversion aborted for {}", args.output.display()))?;

    log::debug!(
        "{} converted, {} failed",
        report.succeeded(),
        report.failed()
    );
    println!(
        "Conversion complete. Output saved to: {}",
        report.output_dir.display()
    );

    Ok(())
}

fn print_outcome(outcome: &ConversionOutcome) {
    match outcome {
        ConversionOutcome::Converted {
            source,
            destination,
        } => println!(
            "Successfully converted {} to {}",
            source.display(),
            destination.display()
        ),
        ConversionOutcome::Failed { source, error } => {
            eprintln!("Error converting {}: {}", source.display(), error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["txtify", "."]).unwrap();
        assert_eq!(args.output, PathBuf::from("output"));
        assert_eq!(args.output_format, OutputFormat::Text);
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_format_and_output() {
        let args =
            Args::try_parse_from(["txtify", ".", "-o", "converted", "--output-format", "markdown"])
                .unwrap();
        assert_eq!(args.output, PathBuf::from("converted"));
        assert_eq!(args.output_format, OutputFormat::Markdown);
    }

    #[test]
    fn test_missing_input_is_rejected() {
        assert!(Args::try_parse_from(["txtify", "/definitely/not/here.pptx"]).is_err());
        assert!(Args::try_parse_from(["txtify"]).is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["txtify", ".", "--output-format", "html"]).is_err());
    }

    #[test]
    fn test_args_are_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
