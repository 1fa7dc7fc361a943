//! Banking service models

pub mod account;
pub mod session;
pub mod transaction;
pub mod user;

// Re-export for convenience
pub use account::{Account, AccountStatus, AccountType};
pub use session::{NewSession, Session};
pub use transaction::{Transaction, TransactionStatus, TransactionType, TransactionWithAccount};
pub use user::{NewUser, User, UserResponse};
