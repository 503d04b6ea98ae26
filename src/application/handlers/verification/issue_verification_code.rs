//! IssueVerificationCodeHandler - stores a one-time code and emails it.

use std::sync::Arc;

use crate::application::ledger::{to_fields, LedgerStore};
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::verification::{
    SignupProfile, VerificationCode, VerificationCodeRecord, VerificationEmail, VerificationError,
};
use crate::ports::{MailSender, OutboundEmail, WriteBatch};

/// Command to issue a code to a signing-up user.
#[derive(Debug, Clone, Default)]
pub struct IssueVerificationCodeCommand {
    pub uid: String,
    pub email: String,
    pub referral_code: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Result of an issued and delivered code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueVerificationCodeResult {
    pub user_id: UserId,
    pub expires_at: Timestamp,
}

/// Handler for verification code issuance.
///
/// The code is persisted before the mail is sent. A send failure after the
/// write is still a failure; the stored code is left to expire.
pub struct IssueVerificationCodeHandler {
    ledger: LedgerStore,
    mailer: Arc<dyn MailSender>,
    from: String,
    ttl_minutes: i64,
}

impl IssueVerificationCodeHandler {
    pub fn new(
        ledger: LedgerStore,
        mailer: Arc<dyn MailSender>,
        from: impl Into<String>,
        ttl_minutes: i64,
    ) -> Self {
        Self {
            ledger,
            mailer,
            from: from.into(),
            ttl_minutes,
        }
    }

    pub async fn handle(
        &self,
        cmd: IssueVerificationCodeCommand,
    ) -> Result<IssueVerificationCodeResult, VerificationError> {
        // 1. Validate input
        let user_id = UserId::new(cmd.uid).map_err(|_| VerificationError::MissingFields("uid"))?;
        let email = cmd.email.trim().to_string();
        if email.is_empty() {
            return Err(VerificationError::MissingFields("email"));
        }

        // 2. Generate and persist
        let code = VerificationCode::generate(&mut rand::thread_rng());
        let record = VerificationCodeRecord::issue(
            code,
            email.clone(),
            SignupProfile {
                referral_code: cmd.referral_code,
                display_name: cmd.display_name,
                photo_url: cmd.photo_url,
            },
            Timestamp::now(),
            self.ttl_minutes,
        );

        let path = LedgerStore::new_verification_code_path(&user_id)?;
        let mut batch = WriteBatch::new();
        batch.set(path.clone(), to_fields(&path, &record)?);
        if let Err(e) = self.ledger.commit(batch).await {
            tracing::error!(user_id = %user_id, error = %e, "Failed to store verification code");
            return Err(e.into());
        }

        // 3. Deliver
        let rendered =
            VerificationEmail::render(&record.code, record.display_name.as_deref(), self.ttl_minutes);
        let message = OutboundEmail {
            from: self.from.clone(),
            to: email,
            subject: rendered.subject,
            html: rendered.html,
        };
        if let Err(e) = self.mailer.send(message).await {
            tracing::error!(
                user_id = %user_id,
                path = %path,
                error = %e,
                "Verification code stored but mail delivery failed"
            );
            return Err(e.into());
        }

        tracing::info!(user_id = %user_id, expires_at = %record.expires_at.to_rfc3339(), "Verification code sent");
        Ok(IssueVerificationCodeResult {
            user_id,
            expires_at: record.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mail::InMemoryMailSender;
    use crate::adapters::store::InMemoryDocumentStore;
    use crate::domain::verification::DEFAULT_CODE_TTL_MINUTES;
    use chrono::Duration;

    const FROM: &str = "Rewards <noreply@example.com>";

    fn setup(
        mailer: InMemoryMailSender,
    ) -> (Arc<InMemoryDocumentStore>, Arc<InMemoryMailSender>, IssueVerificationCodeHandler) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mailer = Arc::new(mailer);
        let handler = IssueVerificationCodeHandler::new(
            LedgerStore::new(store.clone()),
            mailer.clone(),
            FROM,
            DEFAULT_CODE_TTL_MINUTES,
        );
        (store, mailer, handler)
    }

    fn cmd() -> IssueVerificationCodeCommand {
        IssueVerificationCodeCommand {
            uid: "U1".to_string(),
            email: "ada@example.com".to_string(),
            referral_code: Some("ALPHA7".to_string()),
            display_name: Some("Ada".to_string()),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn stores_code_and_mails_it() {
        let (store, mailer, handler) = setup(InMemoryMailSender::new());

        handler.handle(cmd()).await.unwrap();

        let records = LedgerStore::new(store.clone())
            .list_verification_codes(&UserId::new("U1").unwrap())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.email, "ada@example.com");
        assert_eq!(record.referral_code.as_deref(), Some("ALPHA7"));
        assert_eq!(record.expires_at.duration_since(&record.created_at), Duration::minutes(15));

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ada@example.com");
        assert_eq!(sent[0].from, FROM);
        assert!(sent[0].html.contains(record.code.as_str()));
        assert!(sent[0].html.contains("15 minutes"));
    }

    #[tokio::test]
    async fn repeated_requests_keep_every_code() {
        let (store, _, handler) = setup(InMemoryMailSender::new());

        handler.handle(cmd()).await.unwrap();
        handler.handle(cmd()).await.unwrap();

        assert_eq!(store.count("verifications/U1/codes"), 2);
    }

    #[tokio::test]
    async fn missing_fields_touch_nothing() {
        let (store, mailer, handler) = setup(InMemoryMailSender::new());

        let mut no_uid = cmd();
        no_uid.uid = " ".to_string();
        assert_eq!(
            handler.handle(no_uid).await,
            Err(VerificationError::MissingFields("uid"))
        );

        let mut no_email = cmd();
        no_email.email = String::new();
        assert_eq!(
            handler.handle(no_email).await,
            Err(VerificationError::MissingFields("email"))
        );

        assert_eq!(store.commit_count(), 0);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn store_failure_sends_no_mail() {
        let (store, mailer, handler) = setup(InMemoryMailSender::new());
        store.fail_commits(true);

        let result = handler.handle(cmd()).await;

        assert!(matches!(result, Err(VerificationError::Store(_))));
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn mail_failure_after_write_is_an_overall_failure() {
        let (store, _, handler) = setup(InMemoryMailSender::failing());

        let result = handler.handle(cmd()).await;

        assert!(matches!(result, Err(VerificationError::MailDelivery(_))));
        assert_eq!(store.count("verifications/U1/codes"), 1);
    }
}
