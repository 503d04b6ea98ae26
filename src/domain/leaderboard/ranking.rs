//! Dense ranking of accounts by weekly score.

use crate::domain::account::UserAccount;
use crate::domain::foundation::Timestamp;

use super::{LeaderboardEntry, LeaderboardUser};

/// Builds ranking entries from accounts, best weekly score first.
///
/// Ranks are dense and 1-based, assigned purely by position. The sort is
/// stable, so equal scores keep the order the store returned them in; no
/// further tie-break is applied.
pub fn rank_accounts(
    accounts: &[UserAccount],
    limit: usize,
    published_at: Timestamp,
) -> Vec<LeaderboardEntry> {
    let mut ordered: Vec<&UserAccount> = accounts.iter().collect();
    ordered.sort_by(|a, b| b.weekly_coins.cmp(&a.weekly_coins));

    ordered
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, account)| LeaderboardEntry {
            rank: (idx + 1) as u32,
            score: account.weekly_coins,
            user: LeaderboardUser {
                id: account.id.to_string(),
                name: account.public_name(),
                avatar: account.photo_url.clone(),
                email: account.email.clone(),
            },
            published_at,
        })
        .collect()
}
