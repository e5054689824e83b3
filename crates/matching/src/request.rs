use ledgermatch_core::decode::optional_text;
use ledgermatch_core::{BankTransaction, Receipt};
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Receipts and transactions data required: missing receipts")]
    MissingReceipts,
    #[error("Receipts and transactions data required: missing transactions")]
    MissingTransactions,
    #[error("Malformed match request: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Body of a reconciliation call. A `null` or absent list is a caller bug and
/// is rejected; an empty list is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub receipts: Option<Vec<Receipt>>,
    #[serde(default)]
    pub transactions: Option<Vec<BankTransaction>>,
    #[serde(
        default,
        rename = "userId",
        alias = "user_id",
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
}

impl MatchRequest {
    pub fn new(receipts: Vec<Receipt>, transactions: Vec<BankTransaction>) -> Self {
        Self {
            receipts: Some(receipts),
            transactions: Some(transactions),
            user_id: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ReconcileError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReconcileError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Split into the two input lists, failing fast if either is absent.
    pub fn into_parts(self) -> Result<(Vec<Receipt>, Vec<BankTransaction>), ReconcileError> {
        let receipts = self.receipts.ok_or(ReconcileError::MissingReceipts)?;
        let transactions = self.transactions.ok_or(ReconcileError::MissingTransactions)?;
        Ok((receipts, transactions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_edge_function_body() {
        let req = MatchRequest::from_json(
            r#"{"receipts": [{"id": "r-1", "merchant": "Spar", "amount": 100, "date": "2024-03-01"}],
                "transactions": [],
                "userId": "u-1"}"#,
        )
        .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u-1"));
        let (receipts, transactions) = req.into_parts().unwrap();
        assert_eq!(receipts.len(), 1);
        assert!(transactions.is_empty());
    }

    #[test]
    fn snake_case_user_id_alias() {
        let req = MatchRequest::from_json(r#"{"receipts": [], "transactions": [], "user_id": "u-2"}"#)
            .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u-2"));
    }

    #[test]
    fn wrong_typed_record_fields_still_decode() {
        let req = MatchRequest::from_json(
            r#"{"receipts": [{"id": 1, "merchant": "Spar", "amount": 100, "date": "2024-03-01"}],
                "transactions": [{"id": 2, "description": 12345, "transaction_type": 1}],
                "userId": 7}"#,
        )
        .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("7"));
        let (receipts, transactions) = req.into_parts().unwrap();
        assert_eq!(receipts[0].id, "1");
        assert_eq!(transactions[0].id, "2");
        assert_eq!(transactions[0].description, "12345");
        assert_eq!(transactions[0].transaction_type, None);
    }

    #[test]
    fn missing_lists_are_contract_violations() {
        let err = MatchRequest::from_json(r#"{"transactions": []}"#)
            .unwrap()
            .into_parts()
            .unwrap_err();
        assert!(matches!(err, ReconcileError::MissingReceipts));

        let err = MatchRequest::from_json(r#"{"receipts": [], "transactions": null}"#)
            .unwrap()
            .into_parts()
            .unwrap_err();
        assert!(matches!(err, ReconcileError::MissingTransactions));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = MatchRequest::from_json("{not json").unwrap_err();
        assert!(matches!(err, ReconcileError::Malformed(_)));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ReconcileError::MissingReceipts.to_string(),
            "Receipts and transactions data required: missing receipts"
        );
    }
}
