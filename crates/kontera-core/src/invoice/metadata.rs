//! Scalar metadata extraction from invoice text.

use tracing::debug;

use crate::models::invoice::InvoiceMetadata;

use super::rules::patterns::{
    ACCOUNT_NUMBER, BILLING_PERIOD, DUE_DATE, INVOICE_NUMBER, ISSUE_DATE, PAYMENT_REFERENCE,
};
use super::rules::{extract_totals, normalize_date};

/// Extract invoice metadata from document text.
///
/// Every field is optional: each pattern is tried once and a miss simply
/// leaves the field unset. Partial extraction is expected and surfaces only
/// through the quality layer, never as an error.
pub fn extract_metadata(text: &str) -> InvoiceMetadata {
    let mut metadata = InvoiceMetadata::empty();

    if let Some(caps) = INVOICE_NUMBER.captures(text) {
        metadata.invoice_number = Some(caps[1].trim().to_string());
    }

    if let Some(caps) = ISSUE_DATE.captures(text) {
        metadata.issue_date = Some(normalize_date(&caps[1]));
    }
    if let Some(caps) = DUE_DATE.captures(text) {
        metadata.due_date = Some(normalize_date(&caps[1]));
    }
    if let Some(caps) = BILLING_PERIOD.captures(text) {
        metadata.period_start = Some(normalize_date(&caps[1]));
        metadata.period_end = Some(normalize_date(&caps[2]));
    }

    if let Some(caps) = ACCOUNT_NUMBER.captures(text) {
        metadata.account_number = Some(caps[1].trim().to_string());
    }
    if let Some(caps) = PAYMENT_REFERENCE.captures(text) {
        metadata.payment_reference = Some(caps[1].trim().to_string());
    }

    let totals = extract_totals(text);
    metadata.total_net = totals.net;
    metadata.total_vat = totals.vat;
    metadata.total_amount = totals.total;

    debug!(
        invoice_number = metadata.invoice_number.as_deref().unwrap_or("<none>"),
        has_total = metadata.total_amount.is_some(),
        "extracted invoice metadata"
    );

    metadata
}
