//! Store trait
//!
//! The contract every account store adapter fulfils.

use async_trait::async_trait;
use futures::stream::BoxStream;
use uuid::Uuid;

use crate::domain::Account;

use super::{AccountFilter, StoreResult};

/// Lazy, finite sequence of accounts.
///
/// Nothing is read from the store until the stream is first polled, and
/// each call produces a fresh stream.
pub type AccountStream = BoxStream<'static, StoreResult<Account>>;

/// Keyed record store for accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Get an account by ID
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Account>>;

    /// Stream every account, in no particular order
    fn get_all(&self) -> AccountStream;

    /// Stream accounts matching every field set on `filter`
    fn query(&self, filter: AccountFilter) -> AccountStream;

    /// Insert or overwrite an account by ID, returning the stored record.
    ///
    /// Must fail with `StoreError::Conflict` if another account already
    /// holds the same (client code, account number) pair.
    async fn put(&self, account: Account) -> StoreResult<Account>;

    /// Remove an account. Removing an absent account is not an error.
    async fn delete(&self, account: &Account) -> StoreResult<()>;
}
