//! Itemized-segment location and per-line extraction.

use tracing::{debug, warn};

use crate::models::invoice::LineItem;
use crate::name;

use super::rules::category;
use super::rules::parse_amount;
use super::rules::patterns::{LINE_ITEM, SEGMENT_END, SEGMENT_START};

/// Locate the itemized service-specification segment in document text.
///
/// The segment starts at the service-specification header and runs to the
/// first total/summary phrase after it. When no end marker is found the
/// segment runs to the end of the document (graceful degradation, not a
/// failure).
pub fn find_itemized_segment(text: &str) -> Option<&str> {
    let start = SEGMENT_START.find(text)?.start();
    let rest = &text[start..];

    // Skip the header itself when looking for the end marker.
    let header_len = SEGMENT_START.find(rest).map(|m| m.end()).unwrap_or(0);
    let end = SEGMENT_END
        .find(&rest[header_len..])
        .map(|m| header_len + m.start())
        .unwrap_or(rest.len());

    Some(&rest[..end])
}

/// Extract one [`LineItem`] per billed individual from the itemized segment.
///
/// Each line is parsed independently: a malformed amount is logged and the
/// line skipped, never discarding the rest of the segment.
pub fn extract_line_items(segment: &str) -> Vec<LineItem> {
    let matches: Vec<regex::Captures<'_>> = LINE_ITEM.captures_iter(segment).collect();
    let mut items = Vec::with_capacity(matches.len());

    for (index, caps) in matches.iter().enumerate() {
        let full = caps.get(0).unwrap();
        let name_block = caps.get(1).unwrap();
        let phone_block = caps.get(2).unwrap();
        let amount_block = caps.get(3).unwrap();

        let amount = match parse_amount(amount_block.as_str()) {
            Some(amount) => amount,
            None => {
                warn!("skipping malformed line at offset {}: {:?}", full.start(), full.as_str());
                continue;
            }
        };

        let raw_token = segment[name_block.start()..phone_block.end()].trim().to_string();
        let normalized = name::normalize(&raw_token);

        // Service details for this person sit between this line and the next.
        let context_end = matches
            .get(index + 1)
            .map(|next| next.get(0).unwrap().start())
            .unwrap_or(segment.len());
        let context = &segment[full.end()..context_end];

        items.push(LineItem {
            raw_token,
            given_name: normalized.given_name,
            family_name: normalized.family_name,
            phone: normalized.phone,
            amount,
            currency: "NOK".to_string(),
            category: category::classify(context).map(str::to_string),
            position: full.start(),
        });
    }

    debug!("extracted {} line items from segment", items.len());
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const SEGMENT_DOC: &str = "\
Faktura for desember
Tjenestespesifikasjon for bedriftsavtale
Annlaug Amundsen - 918 54 560 373,75
Mobilabonnement Bedrift
Ks Andreas . - 920 78 335 153,13
Allan Simonsen \u{2013} 900 63 358 120,00
SUM DENNE PERIODE: 646,88
Å betale: 646,88 kr
";

    #[test]
    fn test_segment_bounded_by_end_marker() {
        let segment = find_itemized_segment(SEGMENT_DOC).unwrap();
        assert!(segment.starts_with("Tjenestespesifikasjon"));
        assert!(segment.contains("Allan Simonsen"));
        assert!(!segment.contains("SUM DENNE PERIODE"));
    }

    #[test]
    fn test_segment_without_end_marker_runs_to_document_end() {
        let text = "Tjenestespesifikasjon for avtale\nAnnlaug Amundsen - 918 54 560 373,75\n";
        let segment = find_itemized_segment(text).unwrap();
        assert!(segment.ends_with("373,75\n"));
    }

    #[test]
    fn test_no_segment_found() {
        assert_eq!(find_itemized_segment("no itemized section here"), None);
    }

    #[test]
    fn test_extract_line_items() {
        let segment = find_itemized_segment(SEGMENT_DOC).unwrap();
        let items = extract_line_items(segment);
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].given_name, "Annlaug");
        assert_eq!(items[0].family_name, "Amundsen");
        assert_eq!(items[0].phone.as_deref(), Some("91854560"));
        assert_eq!(items[0].amount, Decimal::from_str("373.75").unwrap());
        assert_eq!(items[0].category, Some("Mobil".to_string()));

        // Title stripped by normalization, raw token preserved.
        assert_eq!(items[1].given_name, "Andreas");
        assert_eq!(items[1].family_name, "");
        assert!(items[1].raw_token.starts_with("Ks Andreas"));

        // En-dash separator.
        assert_eq!(items[2].full_name(), "Allan Simonsen");
        assert_eq!(items[2].amount, Decimal::from_str("120.00").unwrap());
    }

    #[test]
    fn test_line_positions_are_ascending() {
        let segment = find_itemized_segment(SEGMENT_DOC).unwrap();
        let items = extract_line_items(segment);
        assert!(items.windows(2).all(|w| w[0].position < w[1].position));
    }
}
