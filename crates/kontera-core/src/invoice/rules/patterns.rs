//! Common regex patterns for Norwegian telecom invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Organization number (Norwegian org.nr)
    pub static ref ORG_NUMBER: Regex = Regex::new(
        r"(?i)(?:Org\.?\s*nr\.?|Organisasjonsnummer)[\s:]*(\d{3}\s?\d{3}\s?\d{3})"
    ).unwrap();

    // Invoice number (Telia Norge format: optional letter prefix + 8-12 digits)
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)(?:Fakturanummer|Invoice\s+Number|Faktura\s*nr\.?)[\s:]*([A-Z]{0,3}\d{8,12})"
    ).unwrap();

    // Norwegian date labels, DD.MM.YYYY with . / - separators
    pub static ref ISSUE_DATE: Regex = Regex::new(
        r"(?i)(?:Fakturadato|Faktureringsdato|Dato)[\s:]*(\d{1,2}[./-]\d{1,2}[./-]\d{4})"
    ).unwrap();

    pub static ref DUE_DATE: Regex = Regex::new(
        r"(?i)(?:Forfallsdato|Forfall|Due\s+date)[\s:]*(\d{1,2}[./-]\d{1,2}[./-]\d{4})"
    ).unwrap();

    pub static ref BILLING_PERIOD: Regex = Regex::new(
        r"(?i)(?:Faktureringsperiode|Periode)[\s:]*(\d{1,2}[./-]\d{1,2}[./-]\d{4})\s*[-\u{2013}]\s*(\d{1,2}[./-]\d{1,2}[./-]\d{4})"
    ).unwrap();

    // Amount patterns (Norwegian format: 1 234,56 or 1.234,56)
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(\d{1,3}(?:[\s.\u{00a0}]?\d{3})*,\d{2})\b"
    ).unwrap();

    // Labeled totals
    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)(?:Å\s+betale|Totalt?|Sum)[\s:]*(?:kr|NOK)?\s*(\d{1,3}(?:[\s.\u{00a0}]?\d{3})*,\d{2})"
    ).unwrap();

    pub static ref NET_AMOUNT: Regex = Regex::new(
        r"(?i)(?:Netto|Ekskl\.?\s*mva|Eks\.?\s*MVA)[\s:]*(?:kr|NOK)?\s*(\d{1,3}(?:[\s.\u{00a0}]?\d{3})*,\d{2})"
    ).unwrap();

    pub static ref VAT_AMOUNT: Regex = Regex::new(
        r"(?i)(?:MVA|Moms)\s*(?:25\s*%|15\s*%|12\s*%)?[\s:]*(?:kr|NOK)?\s*(\d{1,3}(?:[\s.\u{00a0}]?\d{3})*,\d{2})"
    ).unwrap();

    // KID payment reference
    pub static ref PAYMENT_REFERENCE: Regex = Regex::new(
        r"(?i)(?:KID|Kundeidentifikasjon)[\s:]*(\d{4,25})"
    ).unwrap();

    // Bank account number (Norwegian format: 4-2-5 digits)
    pub static ref ACCOUNT_NUMBER: Regex = Regex::new(
        r"(?i)(?:Kontonummer|Konto)[\s:]*(\d{4}[\s.]?\d{2}[\s.]?\d{5})"
    ).unwrap();

    // Itemized segment markers
    pub static ref SEGMENT_START: Regex = Regex::new(
        r"(?i)Tjenestespesifikasjon\s+for"
    ).unwrap();

    pub static ref SEGMENT_END: Regex = Regex::new(
        r"(?i)SUM DENNE PERIODE|Totalt|Å betale"
    ).unwrap();

    // One itemized line: (name block)(dash separator)(phone block)(amount block).
    // Name block tolerates Latin-extended diacritics but never crosses a
    // newline; the separator may be a hyphen, en-dash or em-dash.
    pub static ref LINE_ITEM: Regex = Regex::new(
        r"(\p{Lu}[\p{L} .]+?) *[-\u{2013}\u{2014}] *((?:\+?47 ?)?\d{3} ?\d{2} ?\d{3})\s+(\d{1,3}(?:[ .\u{00a0}]?\d{3})*(?:,\d{2})?)"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_pattern() {
        let caps = INVOICE_NUMBER.captures("Fakturanummer: INV0123456789").unwrap();
        assert_eq!(&caps[1], "INV0123456789");
    }

    #[test]
    fn test_billing_period_pattern() {
        let caps = BILLING_PERIOD.captures("Periode: 01.12.2023 - 31.12.2023").unwrap();
        assert_eq!(&caps[1], "01.12.2023");
        assert_eq!(&caps[2], "31.12.2023");
    }

    #[test]
    fn test_line_item_pattern_with_diacritics() {
        let caps = LINE_ITEM.captures("Bjørn Håkon Sæther - 918 54 560 1 234,56").unwrap();
        assert_eq!(caps[1].trim(), "Bjørn Håkon Sæther");
        assert_eq!(&caps[2], "918 54 560");
        assert_eq!(&caps[3], "1 234,56");
    }

    #[test]
    fn test_line_item_pattern_em_dash() {
        assert!(LINE_ITEM.is_match("Allan Simonsen \u{2014} 900 63 358 373,75"));
    }

    #[test]
    fn test_account_number_pattern() {
        let caps = ACCOUNT_NUMBER.captures("Kontonummer: 1234.56.78901").unwrap();
        assert_eq!(&caps[1], "1234.56.78901");
    }
}
