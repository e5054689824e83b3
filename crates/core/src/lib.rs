pub mod decode;
pub mod money;
pub mod receipt;
pub mod transaction;

pub use money::Money;
pub use receipt::Receipt;
pub use transaction::{BankTransaction, TransactionType};
