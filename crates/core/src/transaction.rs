use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::decode::{lenient_amount, lenient_date, lenient_text, optional_text};
use crate::money::Money;

/// Direction tag attached to a bank ledger entry by the statement parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionType {
    Debit,
    Credit,
    Other(String),
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Debit => write!(f, "debit"),
            TransactionType::Credit => write!(f, "credit"),
            TransactionType::Other(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Err("Empty transaction type".to_string()),
            "debit" | "dr" | "withdrawal" => Ok(TransactionType::Debit),
            "credit" | "cr" | "deposit" => Ok(TransactionType::Credit),
            _ => Ok(TransactionType::Other(s.trim().to_string())),
        }
    }
}

impl Serialize for TransactionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single bank ledger entry as extracted from an imported statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<Money>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(default, deserialize_with = "tag")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub balance: Option<Money>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub bank_type: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Only a non-empty string is a tag; anything else leaves the type to `kind`.
fn tag<'de, D>(deserializer: D) -> Result<Option<TransactionType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}

impl BankTransaction {
    pub fn new(id: impl Into<String>, description: impl Into<String>, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            amount: Some(amount),
            date: Some(date),
            category: String::new(),
            transaction_type: None,
            balance: None,
            bank_type: None,
            user_id: None,
        }
    }

    pub fn with_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// The explicit tag if the parser supplied one, otherwise inferred from
    /// the sign of the amount (negative is money leaving the account).
    pub fn kind(&self) -> TransactionType {
        match (&self.transaction_type, self.amount) {
            (Some(t), _) => t.clone(),
            (None, Some(amount)) if amount.is_negative() => TransactionType::Debit,
            (None, _) => TransactionType::Credit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn kind_falls_back_to_amount_sign() {
        let debit = BankTransaction::new("t-1", "POS", Money::from_cents(-500), date(2024, 3, 1));
        assert_eq!(debit.kind(), TransactionType::Debit);

        let credit = BankTransaction::new("t-2", "Salary", Money::from_cents(500), date(2024, 3, 1));
        assert_eq!(credit.kind(), TransactionType::Credit);

        let tagged = credit.with_type(TransactionType::Debit);
        assert_eq!(tagged.kind(), TransactionType::Debit);
    }

    #[test]
    fn transaction_type_parse_and_display() {
        assert_eq!("DEBIT".parse::<TransactionType>().unwrap(), TransactionType::Debit);
        assert_eq!("deposit".parse::<TransactionType>().unwrap(), TransactionType::Credit);
        assert_eq!(
            "transfer".parse::<TransactionType>().unwrap(),
            TransactionType::Other("transfer".into())
        );
        assert!("  ".parse::<TransactionType>().is_err());
        assert_eq!(TransactionType::Other("fee".into()).to_string(), "fee");
    }

    #[test]
    fn decodes_statement_row() {
        let json = r#"{
            "id": "t-1",
            "description": "SHOPRITE LEKKI PHASE 1",
            "amount": -15000,
            "balance": "120,500.00",
            "date": "2024-03-01T00:00:00Z",
            "category": "Food",
            "transaction_type": "debit",
            "bank_type": "gtbank"
        }"#;
        let tx: BankTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount, Some(Money::from_cents(-1_500_000)));
        assert_eq!(tx.balance, Some(Money::from_cents(12_050_000)));
        assert_eq!(tx.date, Some(date(2024, 3, 1)));
        assert_eq!(tx.transaction_type, Some(TransactionType::Debit));
        assert_eq!(tx.bank_type.as_deref(), Some("gtbank"));
    }

    #[test]
    fn missing_fields_degrade() {
        let tx: BankTransaction =
            serde_json::from_str(r#"{"id":"t-2","description":null,"transaction_type":""}"#).unwrap();
        assert_eq!(tx.description, "");
        assert_eq!(tx.amount, None);
        assert_eq!(tx.transaction_type, None);
        assert_eq!(tx.kind(), TransactionType::Credit);
    }

    #[test]
    fn numeric_fields_do_not_abort_decoding() {
        let tx: BankTransaction = serde_json::from_str(
            r#"{"id": 17, "description": 12345, "amount": "-0.001", "transaction_type": 1, "bank_type": 3}"#,
        )
        .unwrap();
        assert_eq!(tx.id, "17");
        assert_eq!(tx.description, "12345");
        assert_eq!(tx.transaction_type, None);
        assert_eq!(tx.kind(), TransactionType::Debit);
        assert_eq!(tx.bank_type.as_deref(), Some("3"));
        assert_eq!(serde_json::to_value(&tx).unwrap()["amount"], -0.001);
    }

    #[test]
    fn type_serializes_lowercase() {
        let tx = BankTransaction::new("t-3", "ATM", Money::from_cents(-100), date(2024, 1, 2))
            .with_type(TransactionType::Debit);
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["transaction_type"], "debit");
        assert_eq!(json["amount"], -1.0);
        assert!(json.get("balance").is_none());
    }
}
