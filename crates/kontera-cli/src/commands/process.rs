//! Process command - extract and reconcile a single invoice file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::debug;

use kontera_core::{InvoicePipeline, InvoiceResult, KonteraConfig, MatchStatus};

use crate::registry;
use crate::text;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input invoice file (PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Cost-bearer registry CSV
    #[arg(short, long)]
    registry: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Signature store path (default: config directory)
    #[arg(long)]
    signatures: Option<PathBuf>,

    /// Show confidence summary
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per billing line
    Csv,
    /// Plain text summary
    Text,
}

/// Load configuration from an explicit path, or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<KonteraConfig> {
    let config = if let Some(path) = config_path {
        KonteraConfig::from_file(Path::new(path))?
    } else {
        KonteraConfig::default()
    };
    config.validate()?;
    Ok(config)
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut pipeline = InvoicePipeline::new(config);
    super::train::apply_stored_signatures(pipeline.detector_mut(), args.signatures.as_ref())?;

    let doc = text::extract_document(&args.input);

    let registry_records = match &args.registry {
        Some(path) => Some(registry::load_registry(path)?),
        None => None,
    };

    let result = pipeline.process_document(&doc, registry_records.as_deref());

    let output = format_result(&result, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Reconciliation confidence: {:.1}%",
            style("ℹ").blue(),
            result.quality.confidence * 100.0
        );
        if result.quality.requires_manual_review {
            println!("{} Flagged for manual review", style("⚠").yellow());
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_result(result: &InvoiceResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

pub fn status_label(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Matched => "MATCHED",
        MatchStatus::Unmatched => "UNMATCHED",
        MatchStatus::MultipleMatches => "MULTIPLE_MATCHES",
    }
}

fn format_csv(result: &InvoiceResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "source",
        "invoice_number",
        "person",
        "phone",
        "amount",
        "currency",
        "category",
        "status",
        "cost_center",
        "score",
    ])?;

    for (line, matched) in result.line_items.iter().zip(&result.matches) {
        wtr.write_record([
            result.source.as_deref().unwrap_or(""),
            result.metadata.invoice_number.as_deref().unwrap_or(""),
            &line.full_name(),
            line.phone.as_deref().unwrap_or(""),
            &line.amount.to_string(),
            &line.currency,
            line.category.as_deref().unwrap_or(""),
            status_label(matched.status),
            matched.cost_center().unwrap_or(""),
            &format!("{:.3}", matched.score),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &InvoiceResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Invoice: {}\n",
        result.metadata.invoice_number.as_deref().unwrap_or("(unknown)")
    ));
    output.push_str(&format!(
        "Supplier: {} ({:.0}%)\n",
        result.supplier.supplier.as_deref().unwrap_or("(undetected)"),
        result.supplier.confidence * 100.0
    ));
    if let Some(date) = &result.metadata.issue_date {
        output.push_str(&format!("Date: {}\n", date));
    }
    if let Some(total) = &result.metadata.total_amount {
        output.push_str(&format!("Total: {} {}\n", total, result.metadata.currency));
    }
    output.push('\n');

    output.push_str("Billing lines:\n");
    for (line, matched) in result.line_items.iter().zip(&result.matches) {
        output.push_str(&format!(
            "  {} {} {} -> {}\n",
            line.full_name(),
            line.amount,
            line.currency,
            match matched.status {
                MatchStatus::Matched => format!(
                    "cost center {} ({:.0}%)",
                    matched.cost_center().unwrap_or("?"),
                    matched.score * 100.0
                ),
                _ => status_label(matched.status).to_string(),
            }
        ));
    }
    output.push('\n');

    output.push_str("Quality:\n");
    output.push_str(&format!(
        "  Confidence: {:.1}%\n",
        result.quality.confidence * 100.0
    ));
    output.push_str(&format!(
        "  Matched: {}/{} lines\n",
        result.quality.lines_matched, result.quality.lines_processed
    ));
    if !result.quality.validation_errors.is_empty() {
        output.push_str("  Issues:\n");
        for error in &result.quality.validation_errors {
            output.push_str(&format!("    - {}\n", error));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use kontera_core::{InvoiceResult, RawDocument, RegistryRecord};

    fn sample_result() -> InvoiceResult {
        let pipeline = InvoicePipeline::new(KonteraConfig::default());
        let doc = RawDocument::new(
            "Telia Norge AS\n\
             Fakturanummer: 123456789\n\
             Tjenestespesifikasjon for bedrift\n\
             Annlaug Amundsen - 920 78 335 153,13\n\
             SUM DENNE PERIODE 153,13\n\
             Å betale: 153,13\n",
            Some("invoice.txt".to_string()),
        );
        let registry = vec![RegistryRecord {
            given_name: "Annlaug".to_string(),
            family_name: "Amundsen".to_string(),
            cost_center: "4501".to_string(),
            phone: None,
            department: None,
        }];
        pipeline.process_document(&doc, Some(&registry))
    }

    #[test]
    fn test_csv_output_one_row_per_line() {
        let result = sample_result();
        let output = format_csv(&result).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("source,invoice_number,person"));
        assert!(lines[1].contains("Annlaug Amundsen"));
        assert!(lines[1].contains("MATCHED"));
        assert!(lines[1].contains("4501"));
    }

    #[test]
    fn test_text_output_shows_cost_center() {
        let result = sample_result();
        let output = format_text(&result);
        assert!(output.contains("Invoice: 123456789"));
        assert!(output.contains("cost center 4501"));
    }

    #[test]
    fn test_json_output_round_trips() {
        let result = sample_result();
        let json = format_result(&result, OutputFormat::Json).unwrap();
        let parsed: InvoiceResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.line_items.len(), result.line_items.len());
    }
}
