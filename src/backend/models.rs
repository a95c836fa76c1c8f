use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Snapshot of one account as reported by the identity backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub email_verified: bool,
    pub disabled: bool,
    pub creation_time: DateTime<Utc>,
    pub last_sign_in_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
impl UserRecord {
    /// Minimal record for fakes and tests
    pub fn new(uid: &str, email: &str, display_name: &str) -> Self {
        Self {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            email_verified: false,
            disabled: false,
            creation_time: DateTime::<Utc>::UNIX_EPOCH,
            last_sign_in_time: None,
        }
    }
}

impl UserRecord {
    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }
}

/// Account shape returned by the Identity Toolkit REST API.
///
/// Every field is optional on the wire; `into_record` decides what survives.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawAccount {
    pub local_id: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub disabled: bool,
    /// Milliseconds since the epoch, encoded as a string
    pub created_at: Option<String>,
    pub last_login_at: Option<String>,
}

impl RawAccount {
    /// Map to a typed record. Accounts without a uid are rejected.
    pub fn into_record(self) -> Option<UserRecord> {
        let uid = self.local_id.filter(|id| !id.is_empty())?;
        Some(UserRecord {
            uid,
            email: self.email.unwrap_or_default(),
            display_name: self.display_name.unwrap_or_default(),
            email_verified: self.email_verified,
            disabled: self.disabled,
            creation_time: self
                .created_at
                .as_deref()
                .and_then(parse_millis)
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            last_sign_in_time: self.last_login_at.as_deref().and_then(parse_millis),
        })
    }
}

fn parse_millis(value: &str) -> Option<DateTime<Utc>> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

/// Fields to change on an account. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn display_name(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.password.is_none()
    }
}

/// Tokens returned by a sign-in exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInTokens {
    /// Not every exchange reports the uid
    pub uid: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in_secs: u64,
}
