//! Typed access to the ledger's document store.

use std::sync::Arc;

use crate::domain::account::{fields, ReferralCode, UserAccount, USERS_COLLECTION};
use crate::domain::entitlement::{PaymentRecord, PAYMENTS_COLLECTION};
use crate::domain::foundation::{new_document_id, PaymentReference, UserId};
use crate::domain::leaderboard::{LeaderboardEntry, LEADERBOARD_COLLECTION};
use crate::domain::verification::{
    VerificationCodeRecord, CODES_SUBCOLLECTION, VERIFICATIONS_COLLECTION,
};
use crate::ports::{
    CommitReceipt, Direction, DocumentPath, DocumentStore, Query, StoreError, WriteBatch,
};

use super::documents::{account_from_document, from_document};

/// Ledger reads and batched writes over an injected [`DocumentStore`].
///
/// Reads are snapshot reads. Writes go through [`LedgerStore::commit`] as a
/// single batch; there is no other write path.
#[derive(Clone)]
pub struct LedgerStore {
    store: Arc<dyn DocumentStore>,
}

impl LedgerStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    // === Paths ===

    pub fn user_path(user_id: &UserId) -> Result<DocumentPath, StoreError> {
        DocumentPath::in_collection(USERS_COLLECTION, user_id.as_str())
    }

    pub fn payment_path(reference: &PaymentReference) -> Result<DocumentPath, StoreError> {
        DocumentPath::in_collection(PAYMENTS_COLLECTION, reference.as_str())
    }

    /// A fresh auto-id path for a new ranking entry.
    pub fn new_leaderboard_path() -> Result<DocumentPath, StoreError> {
        DocumentPath::in_collection(LEADERBOARD_COLLECTION, &new_document_id())
    }

    /// A fresh auto-id path under `verifications/{uid}/codes`.
    pub fn new_verification_code_path(user_id: &UserId) -> Result<DocumentPath, StoreError> {
        DocumentPath::in_collection(&Self::verification_codes_collection(user_id), &new_document_id())
    }

    fn verification_codes_collection(user_id: &UserId) -> String {
        format!(
            "{}/{}/{}",
            VERIFICATIONS_COLLECTION,
            user_id.as_str(),
            CODES_SUBCOLLECTION
        )
    }

    // === Accounts ===

    pub async fn get_account(&self, user_id: &UserId) -> Result<Option<UserAccount>, StoreError> {
        let path = Self::user_path(user_id)?;
        match self.store.get(&path).await? {
            Some(doc) => Ok(Some(account_from_document(&doc)?)),
            None => Ok(None),
        }
    }

    /// Accounts whose stored code equals `code` ignoring case, in scan order.
    pub async fn find_accounts_by_referral_code(
        &self,
        code: &ReferralCode,
    ) -> Result<Vec<UserAccount>, StoreError> {
        let query = Query::collection(USERS_COLLECTION)
            .where_eq_ignore_case(fields::REFERRAL_CODE, code.as_str());
        self.decode_accounts(&query).await
    }

    /// Accounts whose stored email equals `email` ignoring case and padding.
    pub async fn find_accounts_by_email(&self, email: &str) -> Result<Vec<UserAccount>, StoreError> {
        let query =
            Query::collection(USERS_COLLECTION).where_eq_ignore_case(fields::EMAIL, email.trim());
        self.decode_accounts(&query).await
    }

    /// Paths of every account document, without decoding them.
    pub async fn list_account_paths(&self) -> Result<Vec<DocumentPath>, StoreError> {
        let docs = self.store.query(&Query::collection(USERS_COLLECTION)).await?;
        Ok(docs.into_iter().map(|doc| doc.path).collect())
    }

    /// The `limit` accounts with the most weekly coins; ties in scan order.
    pub async fn top_accounts_by_weekly_coins(
        &self,
        limit: usize,
    ) -> Result<Vec<UserAccount>, StoreError> {
        let query = Query::collection(USERS_COLLECTION)
            .order_by(fields::WEEKLY_COINS, Direction::Descending)
            .limit(limit);
        self.decode_accounts(&query).await
    }

    async fn decode_accounts(&self, query: &Query) -> Result<Vec<UserAccount>, StoreError> {
        self.store
            .query(query)
            .await?
            .iter()
            .map(account_from_document)
            .collect()
    }

    // === Leaderboard ===

    /// Published ranking, best rank first.
    pub async fn list_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let query = Query::collection(LEADERBOARD_COLLECTION).order_by("rank", Direction::Ascending);
        self.store
            .query(&query)
            .await?
            .iter()
            .map(from_document)
            .collect()
    }

    /// Paths of the current ranking entries, decodable or not.
    pub async fn list_leaderboard_paths(&self) -> Result<Vec<DocumentPath>, StoreError> {
        let docs = self.store.query(&Query::collection(LEADERBOARD_COLLECTION)).await?;
        Ok(docs.into_iter().map(|doc| doc.path).collect())
    }

    // === Payments ===

    pub async fn get_payment_record(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        let path = Self::payment_path(reference)?;
        match self.store.get(&path).await? {
            Some(doc) => Ok(Some(from_document(&doc)?)),
            None => Ok(None),
        }
    }

    // === Verification codes ===

    /// Every code issued to `user_id`, oldest first.
    pub async fn list_verification_codes(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<VerificationCodeRecord>, StoreError> {
        let query = Query::collection(Self::verification_codes_collection(user_id));
        let mut records: Vec<VerificationCodeRecord> = self
            .store
            .query(&query)
            .await?
            .iter()
            .map(from_document)
            .collect::<Result<_, _>>()?;
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }

    // === Writes ===

    /// Commits `batch` atomically. An empty batch never reaches the store.
    pub async fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError> {
        if batch.is_empty() {
            return Ok(CommitReceipt { writes: 0 });
        }
        self.store.commit(batch).await
    }
}
