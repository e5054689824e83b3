use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decode::{lenient_amount, lenient_date, lenient_text, lenient_text_list, optional_text};
use crate::money::Money;

/// A single purchase as extracted from an uploaded receipt image or PDF.
///
/// `amount` and `date` are optional because extraction can fail to read
/// them; such a receipt still takes part in matching, it just scores lower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub merchant: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<Money>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub items: Vec<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Receipt {
    pub fn new(id: impl Into<String>, merchant: impl Into<String>, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            merchant: merchant.into(),
            amount: Some(amount),
            date: Some(date),
            category: String::new(),
            items: Vec::new(),
            currency: None,
            user_id: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }
}
