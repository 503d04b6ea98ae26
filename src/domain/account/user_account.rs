//! UserAccount - the authoritative ledger row for one user.

use crate::domain::foundation::{UserId, ValidationError};

use super::ReferralCode;

/// Balance and entitlement state of a single user.
///
/// Balances are unsigned: a stored negative value never makes it past the
/// store adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub coins: u64,
    pub weekly_coins: u64,
    pub referral_code: Option<ReferralCode>,
    pub is_vip: bool,
    pub dva_bank_name: Option<String>,
    pub dva_account_number: Option<String>,
}

impl UserAccount {
    /// Creates a fresh account with zero balances.
    pub fn new(id: UserId, email: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        Ok(Self {
            id,
            email,
            display_name: None,
            photo_url: None,
            coins: 0,
            weekly_coins: 0,
            referral_code: None,
            is_vip: false,
            dva_bank_name: None,
            dva_account_number: None,
        })
    }

    /// Name shown on the public leaderboard.
    pub fn public_name(&self) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "Anonymous".to_string(),
        }
    }

    /// True when both payment-routing identifiers are present.
    pub fn has_dedicated_account(&self) -> bool {
        self.dva_bank_name.is_some() && self.dva_account_number.is_some()
    }
}

#[cfg(test)]
impl UserAccount {
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_balances(mut self, coins: u64, weekly_coins: u64) -> Self {
        self.coins = coins;
        self.weekly_coins = weekly_coins;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> UserAccount {
        UserAccount::new(UserId::new("U1").unwrap(), "u1@example.com").unwrap()
    }

    #[test]
    fn new_account_starts_empty() {
        let acc = account();
        assert_eq!(acc.coins, 0);
        assert_eq!(acc.weekly_coins, 0);
        assert!(!acc.is_vip);
        assert!(!acc.has_dedicated_account());
    }

    #[test]
    fn new_account_requires_email() {
        assert!(UserAccount::new(UserId::new("U1").unwrap(), " ").is_err());
    }

    #[test]
    fn public_name_falls_back_when_blank() {
        assert_eq!(account().public_name(), "Anonymous");
        assert_eq!(account().with_display_name("  ").public_name(), "Anonymous");
        assert_eq!(account().with_display_name("Ada").public_name(), "Ada");
    }
}
