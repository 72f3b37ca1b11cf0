//! Main account resolution.
//!
//! A client's main account for a card is chosen among the client's
//! accounts carrying that card number. When several qualify, the rule is:
//!
//! 1. earliest `membership_date`
//! 2. then lexicographically smallest `account_number`
//! 3. then smallest `id`
//!
//! The ordering is total, so the result does not depend on the order the
//! store returns candidates in.

use std::cmp::Ordering;

use crate::domain::Account;

/// Pick the main account for `card_number` out of a client's accounts.
pub fn select_main_account<I>(accounts: I, card_number: &str) -> Option<Account>
where
    I: IntoIterator<Item = Account>,
{
    accounts
        .into_iter()
        .filter(|account| account.has_card_number(card_number))
        .min_by(main_account_order)
}

fn main_account_order(a: &Account, b: &Account) -> Ordering {
    a.membership_date()
        .cmp(&b.membership_date())
        .then_with(|| a.account_number().cmp(b.account_number()))
        .then_with(|| a.id().cmp(&b.id()))
}
