//! In-memory account store.
//!
//! Thread-safe with `Arc<RwLock<...>>`; clones share the same map.
//! Used when no database is configured and in tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::Account;

use super::{AccountFilter, AccountStore, AccountStream, StoreError, StoreResult};

/// In-memory implementation of `AccountStore`
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl InMemoryAccountStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }

    /// Snapshot matching accounts when first polled
    fn snapshot(&self, filter: AccountFilter) -> AccountStream {
        let accounts = Arc::clone(&self.accounts);

        stream::once(async move {
            let accounts = accounts.read().await;
            accounts
                .values()
                .filter(|account| filter.matches(account))
                .cloned()
                .collect::<Vec<_>>()
        })
        .flat_map(|matching| stream::iter(matching.into_iter().map(Ok)))
        .boxed()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    fn get_all(&self) -> AccountStream {
        self.snapshot(AccountFilter::default())
    }

    fn query(&self, filter: AccountFilter) -> AccountStream {
        self.snapshot(filter)
    }

    async fn put(&self, account: Account) -> StoreResult<Account> {
        let mut accounts = self.accounts.write().await;

        let duplicate = accounts.values().any(|other| {
            other.id() != account.id()
                && other.client_code() == account.client_code()
                && other.account_number() == account.account_number()
        });
        if duplicate {
            return Err(StoreError::duplicate_account_number(
                account.client_code(),
                account.account_number(),
            ));
        }

        accounts.insert(account.id(), account.clone());
        Ok(account)
    }

    async fn delete(&self, account: &Account) -> StoreResult<()> {
        self.accounts.write().await.remove(&account.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountType, BalancePatch, ClientType, NewAccount};
    use chrono::Utc;
    use futures::TryStreamExt;
    use rust_decimal_macros::dec;

    fn account(client: &str, number: &str) -> Account {
        NewAccount::new(client, ClientType::Personal, AccountType::Savings)
            .with_account_number(number)
            .into_account(Uuid::new_v4(), Utc::now())
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryAccountStore::new();
        let stored = store.put(account("C1", "AN1")).await.unwrap();

        let found = store.get_by_id(stored.id()).await.unwrap();
        assert_eq!(found, Some(stored));
    }

    #[tokio::test]
    async fn test_put_overwrites_by_id() {
        let store = InMemoryAccountStore::new();
        let stored = store.put(account("C1", "AN1")).await.unwrap();

        let updated = BalancePatch::new(dec!(42)).merge(stored.clone());
        store.put(updated).await.unwrap();

        assert_eq!(store.len().await, 1);
        let found = store.get_by_id(stored.id()).await.unwrap().unwrap();
        assert_eq!(found.balance(), dec!(42));
    }

    #[tokio::test]
    async fn test_duplicate_account_number_conflicts() {
        let store = InMemoryAccountStore::new();
        store.put(account("C1", "AN1")).await.unwrap();

        let result = store.put(account("C1", "AN1")).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        // Same number under another client is fine
        assert!(store.put(account("C2", "AN1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_query_filters() {
        let store = InMemoryAccountStore::new();
        store.put(account("C1", "AN1")).await.unwrap();
        store.put(account("C1", "AN2")).await.unwrap();
        store.put(account("C2", "AN3")).await.unwrap();

        let c1: Vec<Account> = store
            .query(AccountFilter::client("C1"))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(c1.len(), 2);

        let all: Vec<Account> = store.get_all().try_collect().await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let store = InMemoryAccountStore::new();
        let stream = store.get_all();

        // Written after the stream was built but before it is polled
        store.put(account("C1", "AN1")).await.unwrap();

        let all: Vec<Account> = stream.try_collect().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_absent_is_ok() {
        let store = InMemoryAccountStore::new();
        let never_stored = account("C1", "AN1");

        assert!(store.delete(&never_stored).await.is_ok());
        assert!(store.is_empty().await);
    }
}
