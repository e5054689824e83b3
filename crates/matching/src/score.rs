use ledgermatch_core::{BankTransaction, Receipt};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::MatchConfig;
use crate::similarity::{amount_similarity, amounts_match, date_delta_days, similarity};

/// Label for a sub-comparison that contributed meaningfully to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFactor {
    AmountExact,
    AmountClose,
    DateExact,
    DateClose,
    MerchantHigh,
    MerchantMedium,
}

impl fmt::Display for MatchFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchFactor::AmountExact => write!(f, "amount_exact"),
            MatchFactor::AmountClose => write!(f, "amount_close"),
            MatchFactor::DateExact => write!(f, "date_exact"),
            MatchFactor::DateClose => write!(f, "date_close"),
            MatchFactor::MerchantHigh => write!(f, "merchant_high"),
            MatchFactor::MerchantMedium => write!(f, "merchant_medium"),
        }
    }
}

/// Weighted contribution of each term; the three sum to the confidence before clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub amount: f64,
    pub date: f64,
    pub text: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.amount + self.date + self.text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    pub confidence: f64,
    /// Ordered amount, date, merchant.
    pub factors: Vec<MatchFactor>,
    pub breakdown: ScoreBreakdown,
}

/// Score how likely `receipt` and `transaction` describe the same purchase.
pub fn score(receipt: &Receipt, transaction: &BankTransaction, config: &MatchConfig) -> PairScore {
    let weights = &config.weights;
    let mut factors = Vec::with_capacity(3);
    let mut breakdown = ScoreBreakdown::default();

    // Amount: a missing amount on either side earns nothing.
    if let (Some(r), Some(t)) = (receipt.amount, transaction.amount) {
        let (r, t) = (r.abs().to_f64(), t.abs().to_f64());
        if amounts_match(r, t, config.amount_tolerance) {
            breakdown.amount = weights.amount;
            factors.push(MatchFactor::AmountExact);
        } else {
            let sim = amount_similarity(r, t);
            breakdown.amount = weights.amount * sim;
            if sim > config.amount_close_threshold {
                factors.push(MatchFactor::AmountClose);
            }
        }
    }

    if let (Some(r), Some(t)) = (receipt.date, transaction.date) {
        let days = date_delta_days(r, t);
        if days == 0 {
            breakdown.date = weights.date;
            factors.push(MatchFactor::DateExact);
        } else if days <= config.date_window_days {
            let window = config.date_window_days as f64;
            breakdown.date = weights.date * (1.0 - days as f64 / window);
            factors.push(MatchFactor::DateClose);
        }
    }

    let sim = similarity(&receipt.merchant, &transaction.description);
    breakdown.text = weights.text * sim;
    if sim > config.merchant_high_threshold {
        factors.push(MatchFactor::MerchantHigh);
    } else if sim > config.merchant_medium_threshold {
        factors.push(MatchFactor::MerchantMedium);
    }

    PairScore {
        confidence: breakdown.total().clamp(0.0, 1.0),
        factors,
        breakdown,
    }
}
