//! Cost-category classification from line descriptions.

/// Keyword map from description substrings to accounting cost categories.
const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("mobilabonnement", "Mobil"),
    ("mobil", "Mobil"),
    ("fasttelefon", "Fasttelefon"),
    ("fast", "Fasttelefon"),
    ("bredbånd", "Internett"),
    ("internet", "Internett"),
    ("databruk", "Data"),
    ("data", "Data"),
];

/// Classify a line description into a cost category, when one of the known
/// service keywords is present.
pub fn classify(description: &str) -> Option<&'static str> {
    let lower = description.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, category)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_services() {
        assert_eq!(classify("Mobilabonnement - Bedrift"), Some("Mobil"));
        assert_eq!(classify("Ekstra databruk"), Some("Data"));
        assert_eq!(classify("Bredbånd 100/100"), Some("Internett"));
    }

    #[test]
    fn test_classify_unknown_service() {
        assert_eq!(classify("Annlaug Amundsen"), None);
    }
}
