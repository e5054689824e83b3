use ledgermatch_core::{BankTransaction, Receipt};

use crate::config::{AssignmentStrategy, MatchConfig};
use crate::report::{Match, MatchReport};
use crate::request::{MatchRequest, ReconcileError};
use crate::score::{score, PairScore};

/// A scored (receipt, transaction) pair that cleared the confidence threshold.
#[derive(Debug, Clone)]
pub struct MatchCandidate<'a> {
    pub receipt_index: usize,
    pub transaction_index: usize,
    pub receipt: &'a Receipt,
    pub transaction: &'a BankTransaction,
    pub score: PairScore,
}

impl MatchCandidate<'_> {
    pub fn confidence(&self) -> f64 {
        self.score.confidence
    }

    /// The echoed transaction always carries a type, inferred from the sign
    /// of its amount when the statement parser supplied none.
    pub fn into_match(self) -> Match {
        let mut transaction = self.transaction.clone();
        transaction.transaction_type = Some(transaction.kind());
        Match {
            receipt_id: self.receipt.id.clone(),
            transaction_id: self.transaction.id.clone(),
            confidence: self.score.confidence,
            factors: self.score.factors,
            breakdown: self.score.breakdown,
            receipt: self.receipt.clone(),
            transaction,
        }
    }
}

/// Pairs receipts with bank transactions. Holds only configuration, so one
/// engine can serve any number of concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: MatchConfig,
}

impl ReconciliationEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Validate a request and reconcile it. Nothing is computed when either
    /// list is missing.
    pub fn run(&self, request: MatchRequest) -> Result<MatchReport, ReconcileError> {
        let user_id = request.user_id.clone().unwrap_or_default();
        let (receipts, transactions) = request.into_parts().map_err(|e| {
            tracing::warn!(user_id = %user_id, "Rejected match request: {e}");
            e
        })?;

        tracing::info!(
            user_id = %user_id,
            "Matching {} receipts with {} transactions",
            receipts.len(),
            transactions.len()
        );
        Ok(self.reconcile(&receipts, &transactions))
    }

    pub fn reconcile(&self, receipts: &[Receipt], transactions: &[BankTransaction]) -> MatchReport {
        let matches: Vec<Match> = match self.config.strategy {
            AssignmentStrategy::Greedy => self
                .per_receipt(receipts, |(idx, receipt)| self.best_match(idx, receipt, transactions))
                .into_iter()
                .flatten()
                .map(MatchCandidate::into_match)
                .collect(),
            AssignmentStrategy::Exclusive => self.exclusive(receipts, transactions),
        };

        for m in &matches {
            tracing::debug!(
                receipt_id = %m.receipt_id,
                transaction_id = %m.transaction_id,
                confidence = m.confidence,
                "Matched receipt"
            );
        }

        let report = MatchReport::assemble(matches, receipts.len(), transactions.len());
        tracing::info!(
            matched = report.summary.matched_count,
            unmatched = report.summary.unmatched_receipts,
            "Found {} potential matches",
            report.summary.matched_count
        );
        report
    }

    /// The transaction with the strictly highest confidence above the
    /// threshold. On ties the earliest transaction wins.
    pub fn best_match<'a>(
        &self,
        receipt_index: usize,
        receipt: &'a Receipt,
        transactions: &'a [BankTransaction],
    ) -> Option<MatchCandidate<'a>> {
        transactions
            .iter()
            .enumerate()
            .filter_map(|(idx, transaction)| self.candidate(receipt_index, receipt, idx, transaction))
            .fold(None, |best: Option<MatchCandidate<'a>>, candidate| match best {
                Some(b) if candidate.confidence() <= b.confidence() => Some(b),
                _ => Some(candidate),
            })
    }

    /// Every transaction scoring strictly above the threshold, in input order.
    pub fn candidates<'a>(
        &self,
        receipt_index: usize,
        receipt: &'a Receipt,
        transactions: &'a [BankTransaction],
    ) -> Vec<MatchCandidate<'a>> {
        transactions
            .iter()
            .enumerate()
            .filter_map(|(idx, transaction)| self.candidate(receipt_index, receipt, idx, transaction))
            .collect()
    }

    fn candidate<'a>(
        &self,
        receipt_index: usize,
        receipt: &'a Receipt,
        transaction_index: usize,
        transaction: &'a BankTransaction,
    ) -> Option<MatchCandidate<'a>> {
        let score = score(receipt, transaction, &self.config);
        tracing::trace!(
            receipt_id = %receipt.id,
            transaction_id = %transaction.id,
            confidence = score.confidence,
            "Scored pair"
        );
        (score.confidence > self.config.min_confidence).then_some(MatchCandidate {
            receipt_index,
            transaction_index,
            receipt,
            transaction,
            score,
        })
    }

    /// One-to-one assignment: accept qualifying pairs in descending
    /// confidence, skipping any whose receipt or transaction is taken.
    fn exclusive(&self, receipts: &[Receipt], transactions: &[BankTransaction]) -> Vec<Match> {
        let mut pool: Vec<MatchCandidate<'_>> = self
            .per_receipt(receipts, |(idx, receipt)| self.candidates(idx, receipt, transactions))
            .into_iter()
            .flatten()
            .collect();
        // Stable, so ties stay in (receipt, transaction) input order.
        pool.sort_by(|a, b| b.confidence().total_cmp(&a.confidence()));

        let mut receipt_taken = vec![false; receipts.len()];
        let mut transaction_taken = vec![false; transactions.len()];
        let mut accepted = Vec::new();
        for candidate in pool {
            if receipt_taken[candidate.receipt_index] || transaction_taken[candidate.transaction_index] {
                continue;
            }
            receipt_taken[candidate.receipt_index] = true;
            transaction_taken[candidate.transaction_index] = true;
            accepted.push(candidate);
        }

        accepted.sort_by_key(|c| c.receipt_index);
        accepted.into_iter().map(MatchCandidate::into_match).collect()
    }

    /// Map every receipt in order, on the rayon pool when `parallel` is on.
    fn per_receipt<'a, T, F>(&self, receipts: &'a [Receipt], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn((usize, &'a Receipt)) -> T + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            receipts.par_iter().enumerate().map(f).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            receipts.iter().enumerate().map(f).collect()
        }
    }
}
