//! Query predicate for account lookups.

use crate::domain::{Account, AccountType, ClientType};

/// Secondary-key predicate. Unset fields match anything; set fields are
/// combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub client_code: Option<String>,
    pub client_type: Option<ClientType>,
    pub account_type: Option<AccountType>,
    pub account_number: Option<String>,
}

impl AccountFilter {
    /// Filter on the owning client
    pub fn client(client_code: impl Into<String>) -> Self {
        Self {
            client_code: Some(client_code.into()),
            ..Self::default()
        }
    }

    pub fn with_client_type(mut self, client_type: ClientType) -> Self {
        self.client_type = Some(client_type);
        self
    }

    pub fn with_account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    pub fn with_account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(account_number.into());
        self
    }

    /// Evaluate the predicate in memory
    pub fn matches(&self, account: &Account) -> bool {
        self.client_code
            .as_deref()
            .map_or(true, |code| account.client_code() == code)
            && self
                .client_type
                .map_or(true, |client_type| account.client_type() == client_type)
            && self
                .account_type
                .map_or(true, |account_type| account.account_type() == account_type)
            && self
                .account_number
                .as_deref()
                .map_or(true, |number| account.account_number() == number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewAccount;
    use chrono::Utc;
    use uuid::Uuid;

    fn account(client: &str, number: &str, account_type: AccountType) -> Account {
        NewAccount::new(client, ClientType::Personal, account_type)
            .with_account_number(number)
            .into_account(Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = AccountFilter::default();
        assert!(filter.matches(&account("C1", "AN1", AccountType::Savings)));
        assert!(filter.matches(&account("C2", "AN2", AccountType::Current)));
    }

    #[test]
    fn test_fields_are_and_combined() {
        let filter = AccountFilter::client("C1").with_account_type(AccountType::Savings);

        assert!(filter.matches(&account("C1", "AN1", AccountType::Savings)));
        assert!(!filter.matches(&account("C1", "AN2", AccountType::Current)));
        assert!(!filter.matches(&account("C2", "AN3", AccountType::Savings)));
    }

    #[test]
    fn test_client_type_filter() {
        let filter = AccountFilter::client("C1").with_client_type(ClientType::Business);
        assert!(!filter.matches(&account("C1", "AN1", AccountType::Savings)));
    }

    #[test]
    fn test_account_number_filter() {
        let filter = AccountFilter::client("C1").with_account_number("AN1");

        assert!(filter.matches(&account("C1", "AN1", AccountType::Savings)));
        assert!(!filter.matches(&account("C1", "AN10", AccountType::Savings)));
    }
}
