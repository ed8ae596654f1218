//! Core data models for kasboek
//!
//! This module contains the data structures that represent the budgeting
//! domain: categories, transactions, and money amounts.

pub mod category;
pub mod ids;
pub mod money;
pub mod transaction;

pub use category::Category;
pub use ids::{CategoryId, TransactionId};
pub use money::Money;
pub use transaction::Transaction;
