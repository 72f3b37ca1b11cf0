//! Domain module
//!
//! Core domain types and validation rules.

pub mod account;
pub mod card;
pub mod error;

pub use account::{Account, AccountType, BalancePatch, ClientType, NewAccount};
pub use card::Card;
pub use error::DomainError;
