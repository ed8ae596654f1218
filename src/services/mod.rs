//! Service layer for kasboek
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, derived figures, and cross-entity operations.

pub mod category;
pub mod classify;
pub mod import;
pub mod rollup;
pub mod transaction;

pub use category::CategoryService;
pub use classify::ClassifyService;
pub use import::ImportService;
pub use rollup::RollupService;
pub use transaction::{CreateTransactionInput, TransactionFilter, TransactionService};
