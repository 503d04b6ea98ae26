//! Account domain module.
//!
//! The user ledger row and the referral code it is addressed by.

mod referral_code;
mod user_account;

pub use referral_code::ReferralCode;
pub use user_account::UserAccount;

/// Collection holding one document per user, keyed by user id.
pub const USERS_COLLECTION: &str = "users";

/// Stored field names of a user document.
pub mod fields {
    pub const EMAIL: &str = "email";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const PHOTO_URL: &str = "photoURL";
    pub const COINS: &str = "coins";
    pub const WEEKLY_COINS: &str = "weeklyCoins";
    pub const REFERRAL_CODE: &str = "referralCode";
    pub const IS_VIP: &str = "isVip";
    pub const DVA_BANK_NAME: &str = "dvaBankName";
    pub const DVA_ACCOUNT_NUMBER: &str = "dvaAccountNumber";
}
