//! Account Store module
//!
//! Persistence boundary for accounts.
//! The service talks to an `AccountStore` trait object; adapters for
//! in-process memory and PostgreSQL are provided.

mod error;
mod filter;
mod memory;
mod postgres;
mod traits;

pub use error::{StoreError, StoreResult};
pub use filter::AccountFilter;
pub use memory::InMemoryAccountStore;
pub use postgres::PgAccountStore;
pub use traits::{AccountStore, AccountStream};
