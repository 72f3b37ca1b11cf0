//! Bank account entity
//!
//! `Account` is the record every service operation reads or writes.
//! Identity fields (id, account number) and the membership date are fixed
//! at creation; only the balance and the card change afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Card, DomainError};

/// Maximum decimal places accepted on a balance
const MAX_BALANCE_SCALE: u32 = 8;

/// Maximum integer digits on a balance (`NUMERIC(28, 8)` column)
const MAX_BALANCE_INTEGER_DIGITS: u32 = 20;

/// Length of generated account numbers
const ACCOUNT_NUMBER_DIGITS: usize = 14;

// =========================================================================
// Enumerations
// =========================================================================

/// Kind of client owning the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    Personal,
    Business,
}

impl ClientType {
    /// Numeric code used on URL paths and in storage
    pub fn code(self) -> i32 {
        match self {
            Self::Personal => 1,
            Self::Business => 2,
        }
    }

    pub fn from_code(code: i32) -> Result<Self, DomainError> {
        match code {
            1 => Ok(Self::Personal),
            2 => Ok(Self::Business),
            other => Err(DomainError::UnknownClientType(other)),
        }
    }
}

/// Product type of the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Savings,
    Current,
    FixedTerm,
}

impl AccountType {
    /// Numeric code used on URL paths and in storage
    pub fn code(self) -> i32 {
        match self {
            Self::Savings => 1,
            Self::Current => 2,
            Self::FixedTerm => 3,
        }
    }

    pub fn from_code(code: i32) -> Result<Self, DomainError> {
        match code {
            1 => Ok(Self::Savings),
            2 => Ok(Self::Current),
            3 => Ok(Self::FixedTerm),
            other => Err(DomainError::UnknownAccountType(other)),
        }
    }
}

// =========================================================================
// Account
// =========================================================================

/// A client's bank account.
///
/// # Invariants
/// - `id` and `account_number` never change after creation
/// - `membership_date` is stamped once, at creation
/// - `card` is replaced whole, never patched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account ID
    id: Uuid,

    /// Business-visible account number
    account_number: String,

    /// Owning client
    client_code: String,

    client_type: ClientType,

    account_type: AccountType,

    /// Current balance
    balance: Decimal,

    /// When the account was opened
    membership_date: DateTime<Utc>,

    /// Attached card, if any
    card: Option<Card>,
}

impl Account {
    /// Rebuild an account from stored state.
    /// Used by store adapters; performs no validation.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        account_number: String,
        client_code: String,
        client_type: ClientType,
        account_type: AccountType,
        balance: Decimal,
        membership_date: DateTime<Utc>,
        card: Option<Card>,
    ) -> Self {
        Self {
            id,
            account_number,
            client_code,
            client_type,
            account_type,
            balance,
            membership_date,
            card,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn client_code(&self) -> &str {
        &self.client_code
    }

    pub fn client_type(&self) -> ClientType {
        self.client_type
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn membership_date(&self) -> DateTime<Utc> {
        self.membership_date
    }

    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    /// Replace the card wholesale
    pub fn with_card(mut self, card: Card) -> Self {
        self.card = Some(card);
        self
    }

    /// Whether the attached card carries the given number
    pub fn has_card_number(&self, card_number: &str) -> bool {
        self.card.as_ref().is_some_and(|card| card.matches(card_number))
    }
}

// =========================================================================
// NewAccount: create payload
// =========================================================================

/// Caller-supplied data for a new account.
///
/// `membership_date` is accepted so payloads round-trip, but it is always
/// overwritten with the creation instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    /// Omit to have one generated
    #[serde(default)]
    pub account_number: Option<String>,

    #[serde(default)]
    pub client_code: String,

    pub client_type: ClientType,

    pub account_type: AccountType,

    #[serde(default)]
    pub balance: Decimal,

    #[serde(default)]
    pub membership_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub card: Option<Card>,
}

impl NewAccount {
    pub fn new(
        client_code: impl Into<String>,
        client_type: ClientType,
        account_type: AccountType,
    ) -> Self {
        Self {
            account_number: None,
            client_code: client_code.into(),
            client_type,
            account_type,
            balance: Decimal::ZERO,
            membership_date: None,
            card: None,
        }
    }

    pub fn with_account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(account_number.into());
        self
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_card(mut self, card: Card) -> Self {
        self.card = Some(card);
        self
    }

    /// Validate required and well-formed fields.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.client_code.trim().is_empty() {
            return Err(DomainError::MissingField("client_code"));
        }

        if let Some(number) = &self.account_number {
            if number.trim().is_empty() {
                return Err(DomainError::MissingField("account_number"));
            }
        }

        validate_balance(self.balance)?;

        if let Some(card) = &self.card {
            card.validate()?;
        }

        Ok(())
    }

    /// Turn the payload into a persisted-shape account.
    ///
    /// The caller's `membership_date` is discarded in favour of `created_at`.
    pub fn into_account(self, id: Uuid, created_at: DateTime<Utc>) -> Account {
        let account_number = self
            .account_number
            .map(|n| n.trim().to_string())
            .unwrap_or_else(generate_account_number);

        Account {
            id,
            account_number,
            client_code: self.client_code.trim().to_string(),
            client_type: self.client_type,
            account_type: self.account_type,
            balance: self.balance,
            membership_date: created_at,
            card: self.card,
        }
    }
}

// =========================================================================
// BalancePatch: partial update
// =========================================================================

/// Incoming balance edit. Only `balance` is taken from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancePatch {
    pub balance: Decimal,
}

impl BalancePatch {
    pub fn new(balance: Decimal) -> Self {
        Self { balance }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_balance(self.balance)
    }

    /// Merge the patch onto the stored record.
    ///
    /// Every field except `balance` comes from `existing`.
    pub fn merge(&self, existing: Account) -> Account {
        Account {
            balance: self.balance,
            ..existing
        }
    }
}

fn validate_balance(balance: Decimal) -> Result<(), DomainError> {
    if balance.scale() > MAX_BALANCE_SCALE {
        return Err(DomainError::invalid(
            "balance",
            format!(
                "too many decimal places (max {}, got {})",
                MAX_BALANCE_SCALE,
                balance.scale()
            ),
        ));
    }

    let limit = Decimal::from_i128_with_scale(10_i128.pow(MAX_BALANCE_INTEGER_DIGITS), 0);
    if balance.abs() >= limit {
        return Err(DomainError::invalid(
            "balance",
            format!(
                "too many integer digits (max {})",
                MAX_BALANCE_INTEGER_DIGITS
            ),
        ));
    }
    Ok(())
}

/// Generate a numeric account number from a random UUID
pub fn generate_account_number() -> String {
    let modulus = 10u128.pow(ACCOUNT_NUMBER_DIGITS as u32);
    format!(
        "{:0width$}",
        Uuid::new_v4().as_u128() % modulus,
        width = ACCOUNT_NUMBER_DIGITS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_account() -> Account {
        NewAccount::new("C1", ClientType::Personal, AccountType::Savings)
            .with_account_number("AN1")
            .with_balance(dec!(100))
            .with_card(Card::new("4111111111111111"))
            .into_account(Uuid::new_v4(), Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
    }

    #[test]
    fn test_client_type_codes() {
        assert_eq!(ClientType::from_code(1), Ok(ClientType::Personal));
        assert_eq!(ClientType::from_code(2), Ok(ClientType::Business));
        assert_eq!(ClientType::from_code(3), Err(DomainError::UnknownClientType(3)));
        assert_eq!(ClientType::Business.code(), 2);
    }

    #[test]
    fn test_account_type_codes() {
        for account_type in [AccountType::Savings, AccountType::Current, AccountType::FixedTerm] {
            assert_eq!(AccountType::from_code(account_type.code()), Ok(account_type));
        }
        assert!(AccountType::from_code(0).is_err());
    }

    #[test]
    fn test_enum_json_names() {
        assert_eq!(serde_json::to_string(&AccountType::FixedTerm).unwrap(), "\"FIXED_TERM\"");
        assert_eq!(serde_json::to_string(&ClientType::Personal).unwrap(), "\"PERSONAL\"");
    }

    #[test]
    fn test_missing_client_code_rejected() {
        let payload = NewAccount::new("  ", ClientType::Personal, AccountType::Savings);
        assert_eq!(payload.validate(), Err(DomainError::MissingField("client_code")));
    }

    #[test]
    fn test_blank_account_number_rejected() {
        let payload = NewAccount::new("C1", ClientType::Personal, AccountType::Savings)
            .with_account_number("");
        assert_eq!(payload.validate(), Err(DomainError::MissingField("account_number")));
    }

    #[test]
    fn test_balance_scale_rejected() {
        let payload = NewAccount::new("C1", ClientType::Personal, AccountType::Savings)
            .with_balance(Decimal::new(123456789, 9));
        assert!(matches!(
            payload.validate(),
            Err(DomainError::InvalidField { field: "balance", .. })
        ));
    }

    #[test]
    fn test_balance_magnitude_rejected() {
        let too_large = Decimal::from_i128_with_scale(10_i128.pow(20), 0);
        let patch = BalancePatch::new(too_large);
        assert!(matches!(
            patch.validate(),
            Err(DomainError::InvalidField { field: "balance", .. })
        ));
        assert!(BalancePatch::new(-too_large).validate().is_err());

        let largest = Decimal::from_i128_with_scale(10_i128.pow(28) - 1, 8);
        assert!(BalancePatch::new(largest).validate().is_ok());
        assert!(BalancePatch::new(-largest).validate().is_ok());
    }

    #[test]
    fn test_invalid_card_rejected_on_create() {
        let payload = NewAccount::new("C1", ClientType::Business, AccountType::Current)
            .with_card(Card::new("not-a-number"));
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_into_account_overrides_membership_date() {
        let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut payload = NewAccount::new("C1", ClientType::Personal, AccountType::Savings);
        payload.membership_date = Some(Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap());

        let account = payload.into_account(Uuid::new_v4(), created_at);
        assert_eq!(account.membership_date(), created_at);
    }

    #[test]
    fn test_into_account_generates_account_number() {
        let account = NewAccount::new("C1", ClientType::Personal, AccountType::Savings)
            .into_account(Uuid::new_v4(), Utc::now());

        assert_eq!(account.account_number().len(), ACCOUNT_NUMBER_DIGITS);
        assert!(account.account_number().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_merge_only_touches_balance() {
        let existing = sample_account();
        let merged = BalancePatch::new(dec!(250)).merge(existing.clone());

        assert_eq!(merged.balance(), dec!(250));
        assert_eq!(merged.id(), existing.id());
        assert_eq!(merged.account_number(), existing.account_number());
        assert_eq!(merged.client_code(), existing.client_code());
        assert_eq!(merged.client_type(), existing.client_type());
        assert_eq!(merged.account_type(), existing.account_type());
        assert_eq!(merged.membership_date(), existing.membership_date());
        assert_eq!(merged.card(), existing.card());
    }

    #[test]
    fn test_with_card_replaces_whole_card() {
        let account = sample_account()
            .with_card(Card::new("1111").with_expiration_date(
                chrono::NaiveDate::from_ymd_opt(2030, 1, 31).unwrap(),
            ))
            .with_card(Card::new("2222"));

        assert_eq!(account.card(), Some(&Card::new("2222")));
        assert!(account.has_card_number("2222"));
        assert!(!account.has_card_number("1111"));
    }
}
