//! Invoice data models for the extraction pipeline output.
//!
//! Field names on the serialized types are a stable contract for downstream
//! accounting systems and must not be renamed without a version bump.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::matching::{MatchResult, MatchStatus};

/// An opaque text blob for one invoice, as handed over by the
/// text-extraction collaborator. An empty string is a valid document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    /// Full textual content of the invoice.
    pub text: String,

    /// Source identifier (usually the originating file path).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl RawDocument {
    pub fn new(text: impl Into<String>, source: Option<String>) -> Self {
        Self { text: text.into(), source }
    }
}

/// Detected supplier with a blended confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierIdentity {
    /// Supplier key, or `None` when no supplier was detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// Combined pattern/signature score in [0, 1].
    pub confidence: f64,
}

impl SupplierIdentity {
    /// No supplier could be identified.
    pub fn undetected() -> Self {
        Self { supplier: None, confidence: 0.0 }
    }
}

/// Scalar invoice metadata, populated incrementally as patterns match.
///
/// No field is mandatory; partial extraction is expected and handled by the
/// quality layer, not by early termination. Dates are ISO `YYYY-MM-DD` when
/// the source date parsed, otherwise the source text unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Billing period start, for subscription invoices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<String>,

    /// Supplier bank account number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,

    /// Structured payment reference (KID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,

    /// Declared net amount, before VAT.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_net: Option<Decimal>,

    /// Declared VAT amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_vat: Option<Decimal>,

    /// Declared invoice total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,

    /// Currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "NOK".to_string()
}

impl InvoiceMetadata {
    /// All-absent metadata with the default currency.
    pub fn empty() -> Self {
        Self { currency: default_currency(), ..Default::default() }
    }
}

/// One billed individual detected in the itemized segment.
///
/// Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// The raw name-and-phone token as it appeared on the invoice.
    pub raw_token: String,

    /// Normalized given name.
    pub given_name: String,

    /// Normalized family name, possibly multi-part.
    pub family_name: String,

    /// Digits-only phone number, if present on the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Billed amount for this line.
    pub amount: Decimal,

    /// Currency code.
    pub currency: String,

    /// Cost category derived from the line text, when derivable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Byte offset of the line within the itemized segment.
    pub position: usize,
}

impl LineItem {
    /// Full personal name as "given family".
    pub fn full_name(&self) -> String {
        if self.family_name.is_empty() {
            self.given_name.clone()
        } else {
            format!("{} {}", self.given_name, self.family_name)
        }
    }
}

/// The three reconciliation checks, each with an epsilon tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationChecks {
    /// Sum of line-item amounts equals the declared total.
    pub line_sum_matches_declared_total: bool,

    /// Sum of amounts on `MATCHED` lines equals the declared total.
    pub matched_sum_matches_declared_total: bool,

    /// Share of `MATCHED` lines meets the configured floor.
    pub match_rate_acceptable: bool,
}

/// Aggregate quality control for one invoice.
///
/// Derived purely from the other parts of the result; holds no state of its
/// own. Confidence is a heuristic triage scalar, not a probability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Weighted sum of passed checks, in [0, 1].
    pub confidence: f64,

    /// The individual reconciliation checks.
    pub checks: ReconciliationChecks,

    /// One entry per failed check plus one per non-matched line.
    /// Never truncated, never deduplicated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<String>,

    /// True iff any line is not `MATCHED`.
    pub requires_manual_review: bool,

    /// Number of line items processed.
    pub lines_processed: usize,

    /// Number of lines classified `MATCHED`.
    pub lines_matched: usize,

    /// `lines_matched / lines_processed`, 0 when there are no lines.
    pub match_rate: f64,
}

/// Root aggregate produced by the pipeline for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceResult {
    /// Detected supplier.
    pub supplier: SupplierIdentity,

    /// Extracted scalar metadata.
    pub metadata: InvoiceMetadata,

    /// Billed individuals, in document order.
    pub line_items: Vec<LineItem>,

    /// Match results, index-aligned with `line_items`.
    pub matches: Vec<MatchResult>,

    /// Aggregate quality control.
    pub quality: QualityReport,

    /// Source identifier of the document, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl InvoiceResult {
    /// Degraded result for a document that could not be processed at all.
    ///
    /// Used at the batch boundary so one failing document never aborts the
    /// rest of the batch.
    pub fn degraded(source: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            supplier: SupplierIdentity::undetected(),
            metadata: InvoiceMetadata::empty(),
            line_items: Vec::new(),
            matches: Vec::new(),
            quality: QualityReport {
                confidence: 0.0,
                checks: ReconciliationChecks::default(),
                validation_errors: vec![reason.into()],
                requires_manual_review: true,
                lines_processed: 0,
                lines_matched: 0,
                match_rate: 0.0,
            },
            source,
        }
    }

    /// `line_items` and `matches` must stay index-aligned.
    pub fn is_aligned(&self) -> bool {
        self.line_items.len() == self.matches.len()
    }

    /// Number of lines that did not classify as `MATCHED`.
    pub fn unmatched_count(&self) -> usize {
        self.matches.iter().filter(|m| m.status != MatchStatus::Matched).count()
    }
}
