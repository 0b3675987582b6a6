//! Financial reconciliation and quality scoring.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::matching::normalize_for_match;
use crate::models::config::ReconciliationConfig;
use crate::models::invoice::{InvoiceMetadata, LineItem, QualityReport, ReconciliationChecks};
use crate::models::matching::{MatchResult, MatchStatus};

/// Runs the reconciliation checks and produces the quality report.
///
/// Three independent checks, each carrying a configured weight:
/// the line sum against the declared total, the matched-lines sum against
/// the declared total, and the match rate against its floor. Confidence is
/// the sum of the weights of the checks that passed.
pub struct ReconciliationEngine {
    config: ReconciliationConfig,
}

impl ReconciliationEngine {
    pub fn new(config: ReconciliationConfig) -> Self {
        Self { config }
    }

    pub fn reconcile(
        &self,
        metadata: &InvoiceMetadata,
        line_items: &[LineItem],
        matches: &HashMap<String, MatchResult>,
    ) -> QualityReport {
        let mut validation_errors = Vec::new();

        let line_sum: Decimal = line_items.iter().map(|l| l.amount).sum();
        let matched_sum: Decimal = line_items
            .iter()
            .filter(|l| self.status_of(l, matches) == MatchStatus::Matched)
            .map(|l| l.amount)
            .sum();

        let (line_sum_ok, matched_sum_ok) = match metadata.total_amount {
            Some(total) => {
                let line_sum_ok = (line_sum - total).abs() <= self.config.epsilon;
                let matched_sum_ok = (matched_sum - total).abs() <= self.config.epsilon;
                if !line_sum_ok {
                    validation_errors.push(format!(
                        "line item sum {} differs from declared total {}",
                        line_sum, total
                    ));
                }
                if !matched_sum_ok {
                    validation_errors.push(format!(
                        "matched cost-bearer sum {} differs from declared total {}",
                        matched_sum, total
                    ));
                }
                (line_sum_ok, matched_sum_ok)
            }
            None => {
                validation_errors.push("declared total amount missing".to_string());
                (false, false)
            }
        };

        let lines_processed = line_items.len();
        let lines_matched = line_items
            .iter()
            .filter(|l| self.status_of(l, matches) == MatchStatus::Matched)
            .count();
        let match_rate = if lines_processed == 0 {
            0.0
        } else {
            lines_matched as f64 / lines_processed as f64
        };
        let match_rate_ok = lines_processed > 0 && match_rate >= self.config.match_rate_floor;
        if !match_rate_ok {
            validation_errors.push(format!(
                "match rate {:.2} below acceptable floor {:.2}",
                match_rate, self.config.match_rate_floor
            ));
        }

        for line in line_items {
            match self.status_of(line, matches) {
                MatchStatus::Matched => {}
                MatchStatus::Unmatched => {
                    validation_errors
                        .push(format!("no cost bearer found for '{}'", line.full_name()));
                }
                MatchStatus::MultipleMatches => {
                    validation_errors
                        .push(format!("ambiguous cost bearer for '{}'", line.full_name()));
                }
            }
        }

        let checks = ReconciliationChecks {
            line_sum_matches_declared_total: line_sum_ok,
            matched_sum_matches_declared_total: matched_sum_ok,
            match_rate_acceptable: match_rate_ok,
        };

        let mut confidence = 0.0;
        if checks.line_sum_matches_declared_total {
            confidence += self.config.line_sum_weight;
        }
        if checks.matched_sum_matches_declared_total {
            confidence += self.config.matched_sum_weight;
        }
        if checks.match_rate_acceptable {
            confidence += self.config.match_rate_weight;
        }

        // Review is driven by match status alone; a failed sum check lowers
        // confidence and records an error but does not force review.
        let requires_manual_review = lines_matched < lines_processed;
        debug!(%line_sum, %matched_sum, match_rate, confidence, "reconciliation checks evaluated");
        info!(
            lines_processed,
            lines_matched, confidence, requires_manual_review, "invoice reconciled"
        );

        QualityReport {
            confidence,
            checks,
            validation_errors,
            requires_manual_review,
            lines_processed,
            lines_matched,
            match_rate,
        }
    }

    fn status_of(&self, line: &LineItem, matches: &HashMap<String, MatchResult>) -> MatchStatus {
        matches
            .get(&normalize_for_match(&line.full_name()))
            .map(|r| r.status)
            .unwrap_or(MatchStatus::Unmatched)
    }
}
