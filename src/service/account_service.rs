//! Account Service
//!
//! Owns every business rule on accounts: creation stamping, partial
//! balance updates, wholesale card replacement, composite-key lookups and
//! main account resolution.

use std::sync::Arc;

use chrono::Utc;
use futures::{StreamExt, TryStreamExt};
use uuid::Uuid;

use crate::domain::{Account, AccountType, BalancePatch, Card, ClientType, NewAccount};
use crate::store::{AccountFilter, AccountStore, AccountStream, StoreError};

use super::{select_main_account, OperationResult, ServiceResult};

/// Message attached to a successful create
pub const ACCOUNT_CREATED_MESSAGE: &str = "Bank account created";

/// Service for bank account operations
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// All accounts, unordered
    pub fn find_all(&self) -> AccountStream {
        self.store.get_all()
    }

    /// Find an account by ID
    pub async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Account>> {
        let account = self.store.get_by_id(id).await?;
        tracing::debug!(account_id = %id, found = account.is_some(), "Lookup by id");
        Ok(account)
    }

    /// All accounts of a client
    pub fn find_by_code_client(&self, client_code: &str) -> AccountStream {
        self.store.query(AccountFilter::client(client_code))
    }

    pub fn find_by_code_client_and_type_client(
        &self,
        client_code: &str,
        client_type: ClientType,
    ) -> AccountStream {
        self.store
            .query(AccountFilter::client(client_code).with_client_type(client_type))
    }

    pub fn find_by_code_client_and_type_account(
        &self,
        client_code: &str,
        account_type: AccountType,
    ) -> AccountStream {
        self.store
            .query(AccountFilter::client(client_code).with_account_type(account_type))
    }

    /// Find the single account for (client, account number).
    ///
    /// The store guarantees uniqueness of the pair; if it ever yields two
    /// records this fails with `StoreError::Conflict` rather than guessing.
    pub async fn find_by_code_client_and_account_number(
        &self,
        client_code: &str,
        account_number: &str,
    ) -> ServiceResult<Option<Account>> {
        let filter = AccountFilter::client(client_code).with_account_number(account_number);
        let mut matches = self.store.query(filter).take(2);

        let first = matches.try_next().await?;
        if first.is_some() && matches.try_next().await?.is_some() {
            tracing::error!(
                client_code = %client_code,
                account_number = %account_number,
                "Store returned more than one account for a unique key"
            );
            return Err(StoreError::duplicate_account_number(client_code, account_number).into());
        }

        Ok(first)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create an account.
    ///
    /// Generates the ID (and the account number when none is supplied) and
    /// stamps `membership_date` with the current instant.
    pub async fn create(&self, payload: NewAccount) -> ServiceResult<OperationResult<Account>> {
        payload.validate()?;

        let account = payload.into_account(Uuid::new_v4(), Utc::now());
        let stored = self.store.put(account).await?;

        tracing::info!(
            account_id = %stored.id(),
            client_code = %stored.client_code(),
            account_number = %stored.account_number(),
            "Bank account created"
        );

        Ok(OperationResult::new(stored, ACCOUNT_CREATED_MESSAGE))
    }

    /// Overwrite the balance of an existing account, keeping every other field.
    ///
    /// Returns `None` if the account does not exist.
    pub async fn edit_balance(
        &self,
        id: Uuid,
        patch: BalancePatch,
    ) -> ServiceResult<Option<Account>> {
        patch.validate()?;

        let existing = match self.store.get_by_id(id).await? {
            Some(account) => account,
            None => {
                tracing::warn!(account_id = %id, "Balance edit on unknown account");
                return Ok(None);
            }
        };

        let previous = existing.balance();
        let stored = self.store.put(patch.merge(existing)).await?;

        tracing::info!(
            account_id = %id,
            previous = %previous,
            balance = %stored.balance(),
            "Balance updated"
        );

        Ok(Some(stored))
    }

    /// Replace the card on the account identified by (client, account number).
    ///
    /// Returns `None` if no such account exists.
    pub async fn assign_card(
        &self,
        client_code: &str,
        account_number: &str,
        card: Card,
    ) -> ServiceResult<Option<Account>> {
        card.validate()?;

        let existing = match self
            .find_by_code_client_and_account_number(client_code, account_number)
            .await?
        {
            Some(account) => account,
            None => {
                tracing::warn!(
                    client_code = %client_code,
                    account_number = %account_number,
                    "Card assignment on unknown account"
                );
                return Ok(None);
            }
        };

        let masked = card.masked_number();
        let stored = self.store.put(existing.with_card(card)).await?;

        tracing::info!(account_id = %stored.id(), card = %masked, "Card assigned");

        Ok(Some(stored))
    }

    /// Delete an account by ID, returning the removed record.
    ///
    /// An unknown ID is a no-op and returns `None`.
    pub async fn delete(&self, id: Uuid) -> ServiceResult<Option<Account>> {
        let existing = match self.find_by_id(id).await? {
            Some(account) => account,
            None => return Ok(None),
        };

        self.store.delete(&existing).await?;
        tracing::info!(account_id = %id, "Bank account deleted");

        Ok(Some(existing))
    }

    // =========================================================================
    // Main account
    // =========================================================================

    /// Resolve the client's main account for a card.
    ///
    /// See [`select_main_account`] for the tie-break rule.
    pub async fn main_account(
        &self,
        client_code: &str,
        card_number: &str,
    ) -> ServiceResult<Option<Account>> {
        let accounts: Vec<Account> = self
            .store
            .query(AccountFilter::client(client_code))
            .try_collect()
            .await?;

        let main = select_main_account(accounts, card_number);
        tracing::debug!(
            client_code = %client_code,
            found = main.is_some(),
            "Main account lookup"
        );

        Ok(main)
    }
}
