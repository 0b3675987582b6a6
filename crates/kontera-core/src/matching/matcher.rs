//! Name matching with similarity scoring and terminal classification.

use std::collections::HashMap;

use strsim::normalized_levenshtein;
use tracing::{debug, info};

use crate::models::config::MatchingConfig;
use crate::models::matching::{MatchCandidate, MatchResult};
use crate::models::registry::RegistryRecord;

/// Normalize a name for scoring: lower-case, trimmed, collapsed whitespace.
///
/// Queries and registry names go through the same normalization; scores are
/// only meaningful when both sides are treated symmetrically.
pub fn normalize_for_match(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fuzzy matcher for billed names against the cost-bearer registry.
pub struct CostBearerMatcher {
    threshold: f64,
}

impl CostBearerMatcher {
    pub fn new(config: &MatchingConfig) -> Self {
        Self { threshold: config.acceptance_threshold }
    }

    /// Match one person name against the registry.
    ///
    /// Zero candidates at or above the threshold classify `UNMATCHED`,
    /// exactly one `MATCHED`, more than one `MULTIPLE_MATCHES`. The
    /// classification is terminal; ambiguity is never resolved by taking
    /// the best score.
    pub fn match_name(&self, person_name: &str, registry: &[RegistryRecord]) -> MatchResult {
        let query = normalize_for_match(person_name);
        if query.is_empty() {
            return MatchResult::unmatched("empty name", 0.0);
        }

        let mut best_score = 0.0f64;
        let mut candidates: Vec<(usize, f64)> = Vec::new();

        for (index, record) in registry.iter().enumerate() {
            let corpus = normalize_for_match(&record.full_name());
            let score = normalized_levenshtein(&query, &corpus);
            best_score = best_score.max(score);
            if score >= self.threshold {
                candidates.push((index, score));
            }
        }

        match candidates.len() {
            0 => {
                debug!(name = person_name, best_score, "no registry candidate above threshold");
                MatchResult::unmatched("not found in registry", best_score)
            }
            1 => {
                let (index, score) = candidates[0];
                MatchResult::matched(registry[index].clone(), score)
            }
            _ => {
                candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                let listed = candidates
                    .iter()
                    .map(|&(index, score)| MatchCandidate {
                        full_name: registry[index].full_name(),
                        cost_center: registry[index].cost_center.clone(),
                        score,
                    })
                    .collect();
                debug!(name = person_name, count = candidates.len(), "ambiguous registry match");
                MatchResult::ambiguous(listed, candidates[0].1)
            }
        }
    }

    /// Match a batch of names, scoring each unique name once.
    ///
    /// Returns results keyed by the normalized name, so repeated billing
    /// lines for the same person share one scoring pass.
    pub fn match_all(
        &self,
        names: &[String],
        registry: &[RegistryRecord],
    ) -> HashMap<String, MatchResult> {
        let mut results: HashMap<String, MatchResult> = HashMap::new();
        for name in names {
            let key = normalize_for_match(name);
            if !results.contains_key(&key) {
                let result = self.match_name(name, registry);
                results.insert(key, result);
            }
        }

        let matched = results
            .values()
            .filter(|r| r.status == crate::models::matching::MatchStatus::Matched)
            .count();
        info!(
            unique_names = results.len(),
            matched, "cost-bearer matching completed"
        );
        results
    }
}
