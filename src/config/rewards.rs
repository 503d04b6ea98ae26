//! Reward rules configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::leaderboard::DEFAULT_LEADERBOARD_SIZE;
use crate::domain::referral::DEFAULT_REFERRAL_BONUS;
use crate::domain::verification::DEFAULT_CODE_TTL_MINUTES;

use super::error::ValidationError;

/// Tunable reward rules.
#[derive(Debug, Clone, Deserialize)]
pub struct RewardsConfig {
    /// Coins credited to a referrer
    #[serde(default = "default_referral_bonus")]
    pub referral_bonus: u32,

    /// Accounts published on the leaderboard
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,

    #[serde(default = "default_verification_ttl")]
    pub verification_ttl_minutes: i64,

    /// Hours between scheduled leaderboard resets; 0 disables the scheduler
    #[serde(default = "default_reset_interval")]
    pub reset_interval_hours: u64,
}

impl RewardsConfig {
    /// Scheduler period, `None` when disabled.
    pub fn reset_interval(&self) -> Option<Duration> {
        match self.reset_interval_hours {
            0 => None,
            hours => Some(Duration::from_secs(hours * 3600)),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.referral_bonus == 0 {
            return Err(ValidationError::InvalidReferralBonus);
        }
        if self.leaderboard_size == 0 || self.leaderboard_size > 500 {
            return Err(ValidationError::InvalidLeaderboardSize);
        }
        if !(1..=1440).contains(&self.verification_ttl_minutes) {
            return Err(ValidationError::InvalidVerificationTtl);
        }
        Ok(())
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            referral_bonus: default_referral_bonus(),
            leaderboard_size: default_leaderboard_size(),
            verification_ttl_minutes: default_verification_ttl(),
            reset_interval_hours: default_reset_interval(),
        }
    }
}

fn default_referral_bonus() -> u32 {
    DEFAULT_REFERRAL_BONUS
}

fn default_leaderboard_size() -> usize {
    DEFAULT_LEADERBOARD_SIZE
}

fn default_verification_ttl() -> i64 {
    DEFAULT_CODE_TTL_MINUTES
}

fn default_reset_interval() -> u64 {
    168
}
