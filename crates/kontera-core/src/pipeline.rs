//! End-to-end invoice processing pipeline.
//!
//! Detection, extraction, matching and reconciliation in one pass. The
//! pipeline is infallible per document: anything that cannot be processed
//! becomes a degraded result flagged for manual review, never an error.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::invoice::{extract_line_items, extract_metadata, find_itemized_segment};
use crate::matching::{normalize_for_match, CostBearerMatcher};
use crate::models::config::KonteraConfig;
use crate::models::invoice::{InvoiceResult, LineItem, RawDocument};
use crate::models::matching::MatchResult;
use crate::models::registry::RegistryRecord;
use crate::reconcile::ReconciliationEngine;
use crate::supplier::SupplierDetector;

pub struct InvoicePipeline {
    detector: SupplierDetector,
    matcher: CostBearerMatcher,
    engine: ReconciliationEngine,
}

impl InvoicePipeline {
    pub fn new(config: KonteraConfig) -> Self {
        Self {
            detector: SupplierDetector::new(config.detection.clone()),
            matcher: CostBearerMatcher::new(&config.matching),
            engine: ReconciliationEngine::new(config.reconciliation.clone()),
        }
    }

    pub fn detector(&self) -> &SupplierDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut SupplierDetector {
        &mut self.detector
    }

    /// Process one document against an optional registry snapshot.
    ///
    /// A missing registry classifies every line `UNMATCHED` with an explicit
    /// reason instead of failing; reconciliation still runs so the sum check
    /// against the declared total is reported either way.
    pub fn process_document(
        &self,
        doc: &RawDocument,
        registry: Option<&[RegistryRecord]>,
    ) -> InvoiceResult {
        if doc.text.trim().is_empty() {
            warn!(source = ?doc.source, "document has no text content");
            return InvoiceResult::degraded(doc.source.clone(), "document has no text content");
        }

        let supplier = self.detector.detect(&doc.text);

        // Supplier-specific extractors when detected, the generic layout
        // otherwise. Extraction still runs for undetected documents.
        let (metadata, line_items) = match supplier
            .supplier
            .as_deref()
            .and_then(|key| self.detector.profile(key))
        {
            Some(profile) => (
                (profile.extract_metadata)(&doc.text),
                (profile.extract_lines)(&doc.text),
            ),
            None => (extract_metadata(&doc.text), default_extract_lines(&doc.text)),
        };

        let matches = self.match_lines(&line_items, registry);
        let quality = self.engine.reconcile(
            &metadata,
            &line_items,
            &line_items
                .iter()
                .map(|l| normalize_for_match(&l.full_name()))
                .zip(matches.iter().cloned())
                .collect(),
        );

        info!(
            source = ?doc.source,
            supplier = ?supplier.supplier,
            lines = line_items.len(),
            confidence = quality.confidence,
            "document processed"
        );

        InvoiceResult {
            supplier,
            metadata,
            line_items,
            matches,
            quality,
            source: doc.source.clone(),
        }
    }

    /// Process a batch of documents in parallel. Output order follows input
    /// order regardless of scheduling.
    pub fn process_batch(
        &self,
        docs: &[RawDocument],
        registry: Option<&[RegistryRecord]>,
    ) -> Vec<InvoiceResult> {
        let results: Vec<InvoiceResult> = docs
            .par_iter()
            .map(|doc| self.process_document(doc, registry))
            .collect();
        info!(documents = results.len(), "batch processed");
        results
    }

    /// One match result per line, index-aligned. Repeated names are scored
    /// once and share the result.
    fn match_lines(
        &self,
        line_items: &[LineItem],
        registry: Option<&[RegistryRecord]>,
    ) -> Vec<MatchResult> {
        match registry {
            Some(registry) => {
                let names: Vec<String> = line_items.iter().map(|l| l.full_name()).collect();
                let by_name = self.matcher.match_all(&names, registry);
                names
                    .iter()
                    .map(|name| {
                        by_name
                            .get(&normalize_for_match(name))
                            .cloned()
                            .unwrap_or_else(|| MatchResult::unmatched("not found in registry", 0.0))
                    })
                    .collect()
            }
            None => line_items
                .iter()
                .map(|_| MatchResult::unmatched("registry unavailable", 0.0))
                .collect(),
        }
    }
}

fn default_extract_lines(text: &str) -> Vec<LineItem> {
    find_itemized_segment(text).map(extract_line_items).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matching::MatchStatus;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const INVOICE: &str = "\
Telia Norge AS
Fakturanummer: INV0123456789
Fakturadato: 15.01.2024
Forfallsdato: 30.01.2024
Periode: 01.12.2023 - 31.12.2023
KID: 1234567890
Kontonummer: 1234.56.78901

Tjenestespesifikasjon for bedriftsavtale

Annlaug Amundsen - 920 78 335 153,13
Mobilabonnement inkludert tale

Allan Simonsen - 900 63 358 373,75
Mobilabonnement databruk

SUM DENNE PERIODE 526,88
Å betale: 526,88
";

    fn record(given: &str, family: &str, cost_center: &str) -> RegistryRecord {
        RegistryRecord {
            given_name: given.to_string(),
            family_name: family.to_string(),
            cost_center: cost_center.to_string(),
            phone: None,
            department: None,
        }
    }

    fn registry() -> Vec<RegistryRecord> {
        vec![
            record("Annlaug", "Amundsen", "4501"),
            record("Allan", "Simonsen", "4502"),
        ]
    }

    fn pipeline() -> InvoicePipeline {
        InvoicePipeline::new(KonteraConfig::default())
    }

    #[test]
    fn test_clean_invoice_full_confidence() {
        let doc = RawDocument::new(INVOICE, Some("telia_jan.txt".to_string()));
        let result = pipeline().process_document(&doc, Some(&registry()));

        assert_eq!(result.supplier.supplier.as_deref(), Some("telia"));
        assert_eq!(result.metadata.invoice_number.as_deref(), Some("INV0123456789"));
        assert_eq!(result.metadata.issue_date.as_deref(), Some("2024-01-15"));
        assert_eq!(
            result.metadata.total_amount,
            Some(Decimal::from_str("526.88").unwrap())
        );

        assert_eq!(result.line_items.len(), 2);
        assert!(result.is_aligned());
        assert!(result.matches.iter().all(|m| m.status == MatchStatus::Matched));
        assert_eq!(result.matches[0].cost_center(), Some("4501"));

        assert_eq!(result.quality.confidence, 1.0);
        assert!(!result.quality.requires_manual_review);
        assert!(result.quality.validation_errors.is_empty());
    }

    #[test]
    fn test_unknown_person_flags_review() {
        let mut reg = registry();
        reg.retain(|r| r.given_name != "Allan");
        let doc = RawDocument::new(INVOICE, None);
        let result = pipeline().process_document(&doc, Some(&reg));

        assert_eq!(result.unmatched_count(), 1);
        assert!(result.quality.requires_manual_review);
        assert!(result
            .quality
            .validation_errors
            .iter()
            .any(|e| e.contains("Allan Simonsen")));
        // Line sum still reconciles; only the match-dependent checks fail.
        assert!(result.quality.checks.line_sum_matches_declared_total);
        assert!(!result.quality.checks.matched_sum_matches_declared_total);
    }

    #[test]
    fn test_missing_registry_classifies_unmatched() {
        let doc = RawDocument::new(INVOICE, None);
        let result = pipeline().process_document(&doc, None);

        assert_eq!(result.line_items.len(), 2);
        assert!(result
            .matches
            .iter()
            .all(|m| m.status == MatchStatus::Unmatched
                && m.reason.as_deref() == Some("registry unavailable")));
        assert!(result.quality.requires_manual_review);
        assert!(result.quality.checks.line_sum_matches_declared_total);
    }

    #[test]
    fn test_empty_document_degrades() {
        let doc = RawDocument::new("", Some("blank.pdf".to_string()));
        let result = pipeline().process_document(&doc, Some(&registry()));
        assert!(result.supplier.supplier.is_none());
        assert!(result.quality.requires_manual_review);
        assert_eq!(result.source.as_deref(), Some("blank.pdf"));
    }

    #[test]
    fn test_undetected_supplier_still_extracts() {
        let text = "\
Ukjent leverandør
Fakturanummer: 987654321
Totalt 100,00
";
        let doc = RawDocument::new(text, None);
        let result = pipeline().process_document(&doc, Some(&registry()));
        assert!(result.supplier.supplier.is_none());
        assert_eq!(result.metadata.invoice_number.as_deref(), Some("987654321"));
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let docs = vec![
            RawDocument::new(INVOICE, Some("a.txt".to_string())),
            RawDocument::new("", Some("b.txt".to_string())),
            RawDocument::new(INVOICE, Some("c.txt".to_string())),
        ];
        let results = pipeline().process_batch(&docs, Some(&registry()));
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].source.as_deref(), Some("a.txt"));
        assert_eq!(results[1].source.as_deref(), Some("b.txt"));
        assert!(results[1].quality.requires_manual_review);
        assert_eq!(results[2].source.as_deref(), Some("c.txt"));
    }
}
