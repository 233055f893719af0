//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod currency;
pub mod transaction;
pub mod user;

pub use currency::{CurrencyRepository, CurrencySeed, DEFAULT_CURRENCIES};
pub use transaction::{TransactionError, TransactionRepository, TransactionWithRelations};
pub use user::{UserError, UserRepository, UserUpdate, UserWithTransactionCount};
