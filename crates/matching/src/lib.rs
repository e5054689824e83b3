pub mod config;
pub mod engine;
pub mod report;
pub mod request;
pub mod score;
pub mod similarity;
pub(crate) mod util;

pub use config::{AssignmentStrategy, ConfigError, MatchConfig, Weights};
pub use engine::{MatchCandidate, ReconciliationEngine};
pub use report::{Match, MatchReport, MatchSummary};
pub use request::{MatchRequest, ReconcileError};
pub use score::{score, MatchFactor, PairScore, ScoreBreakdown};
pub use similarity::{amount_similarity, amounts_match, date_delta_days, similarity};

/// Reconcile `receipts` against `transactions` with the default configuration.
pub fn reconcile(
    receipts: &[ledgermatch_core::Receipt],
    transactions: &[ledgermatch_core::BankTransaction],
) -> MatchReport {
    ReconciliationEngine::default().reconcile(receipts, transactions)
}
