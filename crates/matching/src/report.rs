use ledgermatch_core::{BankTransaction, Receipt};
use serde::{Deserialize, Serialize};

use crate::config::HIGH_CONFIDENCE;
use crate::score::{MatchFactor, ScoreBreakdown};

/// A receipt paired with the transaction it most likely paid for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub receipt_id: String,
    pub transaction_id: String,
    #[serde(rename = "confidence_score")]
    pub confidence: f64,
    #[serde(rename = "matching_factors")]
    pub factors: Vec<MatchFactor>,
    pub breakdown: ScoreBreakdown,
    pub receipt: Receipt,
    pub transaction: BankTransaction,
}

impl Match {
    pub fn is_high_confidence(&self) -> bool {
        self.confidence > HIGH_CONFIDENCE
    }

    pub fn has_factor(&self, factor: MatchFactor) -> bool {
        self.factors.contains(&factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub total_receipts: usize,
    pub total_transactions: usize,
    pub matched_count: usize,
    pub unmatched_receipts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub matches: Vec<Match>,
    pub summary: MatchSummary,
}

impl MatchReport {
    /// Sort `matches` (given in receipt order) by descending confidence and
    /// derive the summary counts.
    pub fn assemble(mut matches: Vec<Match>, total_receipts: usize, total_transactions: usize) -> Self {
        // `sort_by` is stable: equal confidences keep receipt order.
        matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let matched_count = matches.len();
        Self {
            matches,
            summary: MatchSummary {
                total_receipts,
                total_transactions,
                matched_count,
                unmatched_receipts: total_receipts.saturating_sub(matched_count),
            },
        }
    }

    pub fn high_confidence(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| m.is_high_confidence())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledgermatch_core::Money;

    fn m(receipt_id: &str, confidence: f64) -> Match {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Match {
            receipt_id: receipt_id.to_string(),
            transaction_id: "t".to_string(),
            confidence,
            factors: vec![MatchFactor::AmountExact],
            breakdown: ScoreBreakdown::default(),
            receipt: Receipt::new(receipt_id, "m", Money::from_cents(100), d),
            transaction: BankTransaction::new("t", "m", Money::from_cents(-100), d),
        }
    }

    #[test]
    fn assemble_sorts_descending_and_stable() {
        let report = MatchReport::assemble(
            vec![m("a", 0.6), m("b", 0.9), m("c", 0.6), m("d", 0.75)],
            5,
            3,
        );
        let order: Vec<&str> = report.matches.iter().map(|x| x.receipt_id.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
        assert_eq!(
            report.summary,
            MatchSummary {
                total_receipts: 5,
                total_transactions: 3,
                matched_count: 4,
                unmatched_receipts: 1,
            }
        );
    }

    #[test]
    fn empty_report() {
        let report = MatchReport::assemble(Vec::new(), 0, 0);
        assert!(report.matches.is_empty());
        assert_eq!(report.summary.unmatched_receipts, 0);
    }

    #[test]
    fn high_confidence_is_strict() {
        assert!(!m("a", 0.8).is_high_confidence());
        assert!(m("a", 0.81).is_high_confidence());
        let report = MatchReport::assemble(vec![m("a", 0.8), m("b", 0.95)], 2, 2);
        assert_eq!(report.high_confidence().count(), 1);
    }

    #[test]
    fn wire_names() {
        let json = serde_json::to_value(m("a", 0.75)).unwrap();
        assert_eq!(json["receipt_id"], "a");
        assert_eq!(json["transaction_id"], "t");
        assert_eq!(json["confidence_score"], 0.75);
        assert_eq!(json["matching_factors"][0], "amount_exact");
        assert_eq!(json["receipt"]["merchant"], "m");
        assert_eq!(json["transaction"]["amount"], -1.0);
    }
}
