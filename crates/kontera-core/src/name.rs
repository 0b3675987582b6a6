//! Personal-name normalization for invoice name-and-phone tokens.
//!
//! Telia bills individuals as `"Name - phone"` tokens, sometimes with a
//! title or stray punctuation in the name block, e.g. `"Ks Andreas . - 920
//! 78 335"`. Normalization is deterministic, stateless and idempotent.

/// Title abbreviations dropped from name tokens. Compared case-sensitively
/// after stripping trailing periods.
const TITLES: &[&str] = &["Ks", "Dr", "Prof", "Mr", "Mrs", "Ms"];

/// A canonicalized personal name with its phone number split off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedName {
    /// First remaining token of the name block.
    pub given_name: String,

    /// Remaining tokens joined with a space; supports multi-part family names.
    pub family_name: String,

    /// Digits-only phone number, if the token carried one.
    pub phone: Option<String>,
}

impl NormalizedName {
    /// Full name as "given family".
    pub fn full_name(&self) -> String {
        if self.family_name.is_empty() {
            self.given_name.clone()
        } else {
            format!("{} {}", self.given_name, self.family_name)
        }
    }
}

/// Canonicalize a raw `"name (+ phone)"` token.
///
/// The phone block is the text after the final dash-like separator, when
/// that text contains digits only; internal whitespace is stripped from it.
/// Title tokens and bare punctuation are dropped from the name block.
pub fn normalize(raw_token: &str) -> NormalizedName {
    let (name_part, phone) = split_phone(raw_token);

    let mut words: Vec<&str> = Vec::new();
    for word in name_part.split_whitespace() {
        let word = word.trim_end_matches('.');
        if word.is_empty() || TITLES.contains(&word) {
            continue;
        }
        if !word.chars().any(|c| c.is_alphanumeric()) {
            continue;
        }
        words.push(word);
    }

    let (given_name, family_name) = match words.split_first() {
        None => (String::new(), String::new()),
        Some((first, rest)) => (first.to_string(), rest.join(" ")),
    };

    NormalizedName { given_name, family_name, phone }
}

/// Split the trailing phone block off a raw token.
///
/// Only a suffix consisting of digits and whitespace counts as a phone
/// block; a dash inside a name never does.
fn split_phone(raw_token: &str) -> (&str, Option<String>) {
    for separator in ['-', '\u{2013}', '\u{2014}'] {
        if let Some(index) = raw_token.rfind(separator) {
            let candidate = &raw_token[index + separator.len_utf8()..];
            let trimmed = candidate.trim();
            if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
                let phone: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
                return (&raw_token[..index], Some(phone));
            }
        }
    }
    (raw_token, None)
}
