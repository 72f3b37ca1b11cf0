//! Card value object
//!
//! A payment card attached to at most one account. Cards are never
//! mutated in place: assigning a card replaces the previous one whole.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Longest accepted card number (digits)
const MAX_CARD_DIGITS: usize = 19;

/// Payment card attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Card number (digits only)
    pub number: String,

    /// Expiration date, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

impl Card {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            expiration_date: None,
        }
    }

    pub fn with_expiration_date(mut self, date: NaiveDate) -> Self {
        self.expiration_date = Some(date);
        self
    }

    /// Check the card number is present and well formed.
    ///
    /// # Errors
    /// - `DomainError::MissingField` if the number is blank
    /// - `DomainError::InvalidField` if it holds non-digits or is too long
    pub fn validate(&self) -> Result<(), DomainError> {
        let number = self.number.as_str();
        if number.trim().is_empty() {
            return Err(DomainError::MissingField("card.number"));
        }

        if !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::invalid("card.number", "must contain digits only"));
        }

        if number.len() > MAX_CARD_DIGITS {
            return Err(DomainError::invalid(
                "card.number",
                format!("must have at most {} digits (got {})", MAX_CARD_DIGITS, number.len()),
            ));
        }

        Ok(())
    }

    /// Whether this card carries the given number
    pub fn matches(&self, card_number: &str) -> bool {
        self.number == card_number.trim()
    }

    /// Number with everything but the last four digits hidden, for logs
    pub fn masked_number(&self) -> String {
        let hidden = self.number.chars().count().saturating_sub(4);
        let tail: String = self.number.chars().skip(hidden).collect();
        format!("{}{}", "*".repeat(hidden), tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_card() {
        let card = Card::new("4111111111111111");
        assert!(card.validate().is_ok());
    }

    #[test]
    fn test_blank_number_rejected() {
        let card = Card::new("   ");
        assert_eq!(card.validate(), Err(DomainError::MissingField("card.number")));
    }

    #[test]
    fn test_non_digit_number_rejected() {
        let card = Card::new("4111-1111-1111-1111");
        assert!(matches!(
            card.validate(),
            Err(DomainError::InvalidField { field: "card.number", .. })
        ));
    }

    #[test]
    fn test_long_number_rejected() {
        let card = Card::new("41111111111111111111");
        assert!(matches!(card.validate(), Err(DomainError::InvalidField { .. })));
    }

    #[test]
    fn test_masked_number() {
        let card = Card::new("4111111111111234");
        assert_eq!(card.masked_number(), "************1234");
    }

    #[test]
    fn test_matches_ignores_surrounding_whitespace() {
        let card = Card::new("4111111111111111");
        assert!(card.matches(" 4111111111111111 "));
        assert!(!card.matches("4111111111111112"));
    }
}
