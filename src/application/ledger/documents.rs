//! Conversion between stored documents and typed ledger records.
//!
//! Every document read by a processor passes through here; a document that
//! does not describe a valid record is reported as `StoreError::Decode`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::account::{fields, ReferralCode, UserAccount};
use crate::domain::foundation::UserId;
use crate::ports::{Document, DocumentPath, StoreError};

/// Decodes a `users/{uid}` document.
pub fn account_from_document(doc: &Document) -> Result<UserAccount, StoreError> {
    let id = UserId::new(doc.id()).map_err(|e| StoreError::decode(&doc.path, e.to_string()))?;

    let email = optional_string(doc, fields::EMAIL)?
        .ok_or_else(|| StoreError::decode(&doc.path, "missing email"))?;
    let mut account =
        UserAccount::new(id, email).map_err(|e| StoreError::decode(&doc.path, e.to_string()))?;

    account.display_name = optional_string(doc, fields::DISPLAY_NAME)?;
    account.photo_url = optional_string(doc, fields::PHOTO_URL)?;
    account.coins = balance(doc, fields::COINS)?;
    account.weekly_coins = balance(doc, fields::WEEKLY_COINS)?;
    // Stored codes are normalized, never rejected.
    account.referral_code = optional_string(doc, fields::REFERRAL_CODE)?
        .and_then(|raw| ReferralCode::parse(&raw).ok());
    account.is_vip = match doc.fields.get(fields::IS_VIP) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => return Err(StoreError::decode(&doc.path, "isVip is not a boolean")),
    };
    account.dva_bank_name = optional_string(doc, fields::DVA_BANK_NAME)?;
    account.dva_account_number = optional_string(doc, fields::DVA_ACCOUNT_NUMBER)?;

    Ok(account)
}

/// Encodes a record with serde into document fields.
pub fn to_fields<T: Serialize>(
    path: &DocumentPath,
    record: &T,
) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StoreError::decode(path, "record is not an object")),
        Err(e) => Err(StoreError::decode(path, e.to_string())),
    }
}

/// Decodes a document into a serde record.
pub fn from_document<T: DeserializeOwned>(doc: &Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(doc.fields.clone()))
        .map_err(|e| StoreError::decode(&doc.path, e.to_string()))
}

fn optional_string(doc: &Document, field: &str) -> Result<Option<String>, StoreError> {
    match doc.fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(StoreError::decode(
            &doc.path,
            format!("{} is not a string", field),
        )),
    }
}

/// Non-negative integer balance; absent counts as zero.
fn balance(doc: &Document, field: &str) -> Result<u64, StoreError> {
    let value = match doc.fields.get(field) {
        None | Some(Value::Null) => return Ok(0),
        Some(value) => value,
    };
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(n) if n < 0.0 => Err(StoreError::decode(
            &doc.path,
            format!("{} is negative", field),
        )),
        Some(n) if n.fract() == 0.0 && n <= u64::MAX as f64 => Ok(n as u64),
        _ => Err(StoreError::decode(
            &doc.path,
            format!("{} is not a whole number", field),
        )),
    }
}
