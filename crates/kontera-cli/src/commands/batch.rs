//! Batch processing command for multiple invoice files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use kontera_core::{InvoicePipeline, InvoiceResult, RawDocument, RegistryCache};

use crate::registry;
use crate::text;

use super::process::{format_result, status_label, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Cost-bearer registry CSV
    #[arg(short, long)]
    registry: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Signature store path (default: config directory)
    #[arg(long)]
    signatures: Option<PathBuf>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::process::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| text::is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let mut pipeline = InvoicePipeline::new(config);
    super::train::apply_stored_signatures(pipeline.detector_mut(), args.signatures.as_ref())?;

    let cache = RegistryCache::new();
    let registry_snapshot = match &args.registry {
        Some(path) => Some(registry::load_cached(&cache, path)?),
        None => None,
    };

    // Text acquisition is sequential and drives the progress bar; the
    // pipeline itself fans out across cores.
    let acquire_pb = ProgressBar::new(files.len() as u64);
    acquire_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let docs: Vec<RawDocument> = files
        .iter()
        .map(|path| {
            let doc = text::extract_document(path);
            acquire_pb.inc(1);
            doc
        })
        .collect();
    acquire_pb.finish_with_message("Text acquired");

    let results = pipeline.process_batch(&docs, registry_snapshot.as_deref().map(|v| v.as_slice()));

    // Per-file outputs
    if let Some(ref output_dir) = args.output_dir {
        for (path, result) in files.iter().zip(&results) {
            let output_name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("invoice");
            let extension = match args.format {
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
                OutputFormat::Text => "txt",
            };
            let output_path = output_dir.join(format!("{}.{}", output_name, extension));
            fs::write(&output_path, format_result(result, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &files, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let review_count = results.iter().filter(|r| r.quality.requires_manual_review).count();
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} clean, {} flagged for review",
        style(results.len() - review_count).green(),
        style(review_count).yellow()
    );

    if review_count > 0 {
        println!();
        println!("{}", style("Flagged files:").yellow());
        for (path, result) in files.iter().zip(&results) {
            if result.quality.requires_manual_review {
                println!(
                    "  - {}: {}",
                    path.display(),
                    result
                        .quality
                        .validation_errors
                        .first()
                        .map(String::as_str)
                        .unwrap_or("requires manual review")
                );
            }
        }
    }

    Ok(())
}

fn write_summary(
    path: &PathBuf,
    files: &[PathBuf],
    results: &[InvoiceResult],
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "supplier",
        "invoice_number",
        "issue_date",
        "total_amount",
        "currency",
        "lines",
        "matched",
        "match_rate",
        "confidence",
        "manual_review",
        "first_issue",
    ])?;

    for (file, result) in files.iter().zip(results) {
        let filename = file.file_name().and_then(|s| s.to_str()).unwrap_or("");
        wtr.write_record([
            filename,
            result.supplier.supplier.as_deref().unwrap_or(""),
            result.metadata.invoice_number.as_deref().unwrap_or(""),
            result.metadata.issue_date.as_deref().unwrap_or(""),
            &result
                .metadata
                .total_amount
                .map(|a| a.to_string())
                .unwrap_or_default(),
            &result.metadata.currency,
            &result.quality.lines_processed.to_string(),
            &result.quality.lines_matched.to_string(),
            &format!("{:.2}", result.quality.match_rate),
            &format!("{:.2}", result.quality.confidence),
            if result.quality.requires_manual_review { "yes" } else { "no" },
            result
                .quality
                .validation_errors
                .first()
                .map(String::as_str)
                .unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
