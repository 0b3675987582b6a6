//! Match results for cost-bearer identification.

use serde::{Deserialize, Serialize};

use super::registry::RegistryRecord;

/// Terminal classification of one name-matching attempt.
///
/// Ambiguity is terminal: a `MultipleMatches` result is surfaced for manual
/// resolution and never auto-resolved by taking the best score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// Exactly one registry entry scored at or above the acceptance threshold.
    Matched,
    /// No registry entry scored at or above the threshold.
    Unmatched,
    /// Two or more registry entries scored at or above the threshold.
    MultipleMatches,
}

/// A registry candidate that scored above the acceptance threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Full name of the registry entry.
    pub full_name: String,

    /// Cost-center identifier of the registry entry.
    pub cost_center: String,

    /// Similarity score in [0, 1].
    pub score: f64,
}

/// Outcome of matching one line item's person name against the registry.
///
/// Created once per line item and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Match classification.
    pub status: MatchStatus,

    /// The matched registry record, present only when `status` is `MATCHED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<RegistryRecord>,

    /// Best similarity score obtained, in [0, 1].
    pub score: f64,

    /// All candidates above the threshold, best first. Populated for
    /// `MULTIPLE_MATCHES` so a human can resolve the ambiguity.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<MatchCandidate>,

    /// Human-readable reason when not matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MatchResult {
    /// A successful single match.
    pub fn matched(record: RegistryRecord, score: f64) -> Self {
        Self {
            status: MatchStatus::Matched,
            matched: Some(record),
            score,
            candidates: Vec::new(),
            reason: None,
        }
    }

    /// No acceptable candidate.
    pub fn unmatched(reason: impl Into<String>, best_score: f64) -> Self {
        Self {
            status: MatchStatus::Unmatched,
            matched: None,
            score: best_score,
            candidates: Vec::new(),
            reason: Some(reason.into()),
        }
    }

    /// More than one acceptable candidate; requires manual resolution.
    pub fn ambiguous(candidates: Vec<MatchCandidate>, best_score: f64) -> Self {
        Self {
            status: MatchStatus::MultipleMatches,
            matched: None,
            score: best_score,
            candidates,
            reason: Some("multiple registry candidates above threshold".to_string()),
        }
    }

    /// Cost center of the matched record, if any.
    pub fn cost_center(&self) -> Option<&str> {
        self.matched.as_ref().map(|r| r.cost_center.as_str())
    }
}
