//! bank-account Library
//!
//! Account management service: creation, balance edits, card assignment
//! and composite-key lookups over a pluggable account store.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod service;
pub mod store;

mod error;

pub use config::Config;
pub use domain::{Account, AccountType, BalancePatch, Card, ClientType, DomainError, NewAccount};
pub use error::{AppError, AppResult};
pub use service::{AccountService, OperationResult, ServiceError};
pub use store::{AccountFilter, AccountStore, InMemoryAccountStore, PgAccountStore, StoreError};
