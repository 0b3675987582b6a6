//! Train command - teach the detector from an example invoice.
//!
//! Also owns the on-disk signature store shared with process and batch.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use kontera_core::supplier::SupplierDetector;
use kontera_core::InvoicePipeline;

use crate::text;

/// Arguments for the train command.
#[derive(Args)]
pub struct TrainArgs {
    /// Supplier key the example belongs to (e.g. "telia")
    #[arg(required = true)]
    supplier: String,

    /// Example invoice file (PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Signature store path (default: config directory)
    #[arg(short, long)]
    store: Option<PathBuf>,
}

pub fn run(args: TrainArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::process::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut pipeline = InvoicePipeline::new(config);
    if pipeline.detector().profile(&args.supplier).is_none() {
        anyhow::bail!("Unknown supplier key: {}", args.supplier);
    }

    let doc = text::extract_document(&args.input);
    if doc.text.trim().is_empty() {
        anyhow::bail!("No text could be extracted from {}", args.input.display());
    }

    let signature = pipeline.detector_mut().add_example(&args.supplier, &doc.text);

    let store_path = args.store.unwrap_or_else(default_store_path);
    let mut store = load_store(&store_path)?;
    store.entry(args.supplier.clone()).or_default().push(signature.clone());

    if let Some(parent) = store_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&store_path, serde_json::to_string_pretty(&store)?)?;

    println!(
        "{} Learned signature for '{}': {}",
        style("✓").green(),
        args.supplier,
        signature
    );
    println!("  Stored in {}", store_path.display());

    Ok(())
}

/// Default location of the signature store.
pub fn default_store_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kontera")
        .join("signatures.json")
}

/// Feed all stored signatures into a detector. A missing store is fine.
pub fn apply_stored_signatures(
    detector: &mut SupplierDetector,
    store_path: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let path = store_path.cloned().unwrap_or_else(default_store_path);
    let store = load_store(&path)?;
    for (supplier, signatures) in store {
        debug!(supplier, count = signatures.len(), "loaded stored signatures");
        for signature in signatures {
            detector.add_signature(&supplier, signature);
        }
    }
    Ok(())
}

fn load_store(path: &PathBuf) -> anyhow::Result<HashMap<String, Vec<String>>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kontera_core::models::config::DetectionConfig;

    #[test]
    fn test_apply_signatures_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("signatures.json");
        fs::write(
            &store_path,
            r#"{"telia": ["has_invoice_number|telia_norge_as"]}"#,
        )
        .unwrap();

        let mut detector = SupplierDetector::new(DetectionConfig::default());
        apply_stored_signatures(&mut detector, Some(&store_path)).unwrap();
        assert_eq!(detector.signatures().get("telia").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("absent.json");
        let mut detector = SupplierDetector::new(DetectionConfig::default());
        apply_stored_signatures(&mut detector, Some(&store_path)).unwrap();
        assert!(detector.signatures().is_empty());
    }
}
