//! Amount extraction and Norwegian numeral parsing.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

use super::patterns::{NET_AMOUNT, TOTAL_AMOUNT, VAT_AMOUNT};

/// Declared totals extracted from invoice text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclaredTotals {
    /// Net amount, before VAT.
    pub net: Option<Decimal>,
    /// VAT amount.
    pub vat: Option<Decimal>,
    /// Invoice total.
    pub total: Option<Decimal>,
}

/// Extract labeled totals from invoice text.
///
/// Missing values are derived from the others where possible
/// (net = total - vat, vat = total - net).
pub fn extract_totals(text: &str) -> DeclaredTotals {
    let mut totals = DeclaredTotals::default();

    if let Some(caps) = TOTAL_AMOUNT.captures(text) {
        totals.total = parse_amount(&caps[1]);
    }
    if let Some(caps) = NET_AMOUNT.captures(text) {
        totals.net = parse_amount(&caps[1]);
    }
    if let Some(caps) = VAT_AMOUNT.captures(text) {
        totals.vat = parse_amount(&caps[1]);
    }

    if totals.vat.is_none() {
        if let (Some(total), Some(net)) = (totals.total, totals.net) {
            totals.vat = Some(total - net);
        }
    }
    if totals.net.is_none() {
        if let (Some(total), Some(vat)) = (totals.total, totals.vat) {
            totals.net = Some(total - vat);
        }
    }

    totals
}

/// Parse a Norwegian-formatted amount (e.g. "1 234,56" or "1.234,56").
///
/// Space, non-breaking space and dot act as thousands separators; comma is
/// the decimal separator. Invalid input yields `None`, logged by the caller
/// where the field matters.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') {
        // Comma is the decimal separator; dots are thousands separators.
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    match Decimal::from_str(&normalized) {
        Ok(amount) => Some(amount.round_dp(2)),
        Err(_) => {
            warn!("unparseable amount: {:?}", s);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount_formats_agree() {
        assert_eq!(parse_amount("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1 234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("12 345 678,90"), Some(dec("12345678.90")));
    }

    #[test]
    fn test_parse_amount_without_decimals() {
        assert_eq!(parse_amount("526"), Some(dec("526")));
        assert_eq!(parse_amount("kr 373,75"), Some(dec("373.75")));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_extract_totals_derives_net() {
        let text = "Å betale: 526,88 kr\nMVA 25%: 105,38";
        let totals = extract_totals(text);
        assert_eq!(totals.total, Some(dec("526.88")));
        assert_eq!(totals.vat, Some(dec("105.38")));
        assert_eq!(totals.net, Some(dec("421.50")));
    }

    #[test]
    fn test_extract_totals_all_labeled() {
        let text = "Netto: 421,50\nMVA: 105,38\nTotalt: 526,88 NOK";
        let totals = extract_totals(text);
        assert_eq!(totals.net, Some(dec("421.50")));
        assert_eq!(totals.vat, Some(dec("105.38")));
        assert_eq!(totals.total, Some(dec("526.88")));
    }

    #[test]
    fn test_extract_totals_empty_text() {
        assert_eq!(extract_totals(""), DeclaredTotals::default());
    }
}
