//! Supplier detection using a blended pattern/signature score.
//!
//! Each known supplier is one [`SupplierProfile`] entry in a dispatch table:
//! identification patterns plus pure extraction functions. Adding a supplier
//! means adding a table entry, not a new type.

use std::collections::HashMap;

use regex::Regex;
use strsim::normalized_levenshtein;
use tracing::{debug, info};

use crate::invoice::{extract_line_items, extract_metadata, find_itemized_segment};
use crate::models::config::DetectionConfig;
use crate::models::invoice::{InvoiceMetadata, LineItem, SupplierIdentity};

/// Structural markers used to build document signatures. A signature is the
/// sorted, `|`-joined list of tokens whose marker phrase occurs in the text.
const SIGNATURE_MARKERS: &[(&str, &str)] = &[
    ("fakturanummer", "has_invoice_number"),
    ("fakturadato", "has_invoice_date"),
    ("kundenummer", "has_customer_number"),
    ("tjenestespesifikasjon", "has_service_spec"),
    ("sum denne periode", "has_period_totals"),
    ("å betale", "has_payment_section"),
    ("sergel norge as", "sergel_norge_as"),
    ("samlefaktura", "samlefaktura"),
    ("retur:", "retur_address"),
];

/// One known supplier: identification patterns plus the pure functions used
/// to extract its fields and line items.
pub struct SupplierProfile {
    /// Stable supplier key used in results and configuration.
    pub key: &'static str,

    /// Full legal name. Its verbatim presence is unambiguous proof of the
    /// supplier and bypasses the detection threshold.
    pub legal_name: &'static str,

    /// Identification patterns expected in this supplier's invoices.
    patterns: Vec<Regex>,

    /// Scalar metadata extractor for this supplier's layout.
    pub extract_metadata: fn(&str) -> InvoiceMetadata,

    /// Line-item extractor for this supplier's layout.
    pub extract_lines: fn(&str) -> Vec<LineItem>,
}

fn telia_extract_lines(text: &str) -> Vec<LineItem> {
    find_itemized_segment(text).map(extract_line_items).unwrap_or_default()
}

/// The built-in supplier table.
pub fn builtin_profiles() -> Vec<SupplierProfile> {
    let telia_patterns = [
        r"telia norge as",
        r"fakturanummer\s*:",
        r"fakturadato\s*:",
        r"kundenummer",
        r"tjenestespesifikasjon",
        r"sum denne periode",
        r"sergel norge as",
        r"samlefaktura",
        r"retur:",
    ];

    vec![SupplierProfile {
        key: "telia",
        legal_name: "Telia Norge AS",
        patterns: telia_patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
            .collect(),
        extract_metadata,
        extract_lines: telia_extract_lines,
    }]
}

/// Build a document's signature from the fixed structural markers.
pub fn extract_signature(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut parts: Vec<&str> = SIGNATURE_MARKERS
        .iter()
        .filter(|(marker, _)| lower.contains(marker))
        .map(|(_, token)| *token)
        .collect();

    if lower.contains("telia norge as") {
        parts.push("telia_norge_as");
    } else if lower.contains("telia") {
        parts.push("telia_general");
    }

    parts.sort_unstable();
    parts.join("|")
}

/// Classifies raw document text against the supplier table.
///
/// Scoring blends the share of matched identification patterns with the best
/// similarity against stored example signatures. `add_example` is the only
/// learning mechanism: it appends a signature for future runs.
pub struct SupplierDetector {
    profiles: Vec<SupplierProfile>,
    signatures: HashMap<String, Vec<String>>,
    config: DetectionConfig,
}

impl SupplierDetector {
    /// Detector over the built-in supplier table.
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            profiles: builtin_profiles(),
            signatures: HashMap::new(),
            config,
        }
    }

    /// Look up a profile by supplier key.
    pub fn profile(&self, key: &str) -> Option<&SupplierProfile> {
        self.profiles.iter().find(|p| p.key == key)
    }

    /// Classify document text. Never fails: an unrecognized document yields
    /// an explicit undetected identity.
    pub fn detect(&self, text: &str) -> SupplierIdentity {
        if text.trim().is_empty() {
            return SupplierIdentity::undetected();
        }

        let lower = text.to_lowercase();
        let signature = extract_signature(text);

        let mut best: Option<(&str, f64)> = None;
        for profile in &self.profiles {
            let matched = profile.patterns.iter().filter(|p| p.is_match(text)).count();
            let pattern_score = matched as f64 / profile.patterns.len() as f64;

            let signature_score = self
                .signatures
                .get(profile.key)
                .into_iter()
                .flatten()
                .map(|stored| normalized_levenshtein(&signature, stored))
                .fold(0.0f64, f64::max);

            let score = self.config.pattern_weight * pattern_score
                + self.config.signature_weight * signature_score;
            debug!(
                supplier = profile.key,
                pattern_score, signature_score, score, "supplier candidate scored"
            );

            // The full legal name verbatim is unambiguous proof; return it
            // even when the blended score sits below the threshold.
            if lower.contains(&profile.legal_name.to_lowercase()) {
                return SupplierIdentity { supplier: Some(profile.key.to_string()), confidence: score };
            }

            if best.map_or(true, |(_, s)| score > s) {
                best = Some((profile.key, score));
            }
        }

        match best {
            Some((key, score)) if score >= self.config.confidence_threshold => {
                SupplierIdentity { supplier: Some(key.to_string()), confidence: score }
            }
            _ => SupplierIdentity::undetected(),
        }
    }

    /// Learn from an example document of a known supplier.
    pub fn add_example(&mut self, supplier: &str, text: &str) -> String {
        let signature = extract_signature(text);
        self.add_signature(supplier, signature.clone());
        info!(supplier, "added example signature");
        signature
    }

    /// Register a previously extracted signature (e.g. loaded from disk).
    pub fn add_signature(&mut self, supplier: &str, signature: String) {
        self.signatures.entry(supplier.to_string()).or_default().push(signature);
    }

    /// Stored signatures per supplier.
    pub fn signatures(&self) -> &HashMap<String, Vec<String>> {
        &self.signatures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TELIA_DOC: &str = "\
Telia Norge AS
Fakturanummer: INV0123456789
Fakturadato: 15.01.2024
Kundenummer: 123456
Tjenestespesifikasjon for bedriftsavtale
SUM DENNE PERIODE: 526,88
Å betale: 526,88 kr
";

    #[test]
    fn test_detects_telia_invoice() {
        let detector = SupplierDetector::new(DetectionConfig::default());
        let identity = detector.detect(TELIA_DOC);
        assert_eq!(identity.supplier.as_deref(), Some("telia"));
        assert!(identity.confidence > 0.25);
    }

    #[test]
    fn test_legal_name_overrides_threshold() {
        // Nothing else recognizable: pattern score is 1/9, well below the
        // threshold, but the legal name is proof.
        let detector = SupplierDetector::new(DetectionConfig::default());
        let identity = detector.detect("Telia Norge AS\nhelt ustrukturert tekst");
        assert_eq!(identity.supplier.as_deref(), Some("telia"));
    }

    #[test]
    fn test_unrelated_text_is_undetected() {
        let detector = SupplierDetector::new(DetectionConfig::default());
        let identity = detector.detect("handleliste: melk, brød, ost");
        assert_eq!(identity, SupplierIdentity::undetected());
    }

    #[test]
    fn test_empty_text_is_undetected() {
        let detector = SupplierDetector::new(DetectionConfig::default());
        assert_eq!(detector.detect(""), SupplierIdentity::undetected());
    }

    #[test]
    fn test_signature_extraction() {
        let signature = extract_signature(TELIA_DOC);
        assert_eq!(
            signature,
            "has_customer_number|has_invoice_date|has_invoice_number|has_payment_section|has_period_totals|has_service_spec|telia_norge_as"
        );
    }

    #[test]
    fn test_example_raises_signature_score() {
        let mut detector = SupplierDetector::new(DetectionConfig::default());
        // Without the legal name the blended score relies on patterns alone.
        let doc = "Fakturanummer: 12345678\nKundenummer: 4\nSamlefaktura\nSUM DENNE PERIODE 1,00";
        let before = detector.detect(doc);

        detector.add_example("telia", doc);
        let after = detector.detect(doc);
        assert!(after.confidence > before.confidence);
        assert_eq!(after.supplier.as_deref(), Some("telia"));
    }
}
