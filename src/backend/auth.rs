//! Signed JWTs for the service account.
//!
//! Two kinds are produced: the OAuth2 JWT-bearer assertion exchanged for an
//! access token, and custom tokens handed to clients for sign-in.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;

use crate::credentials::ServiceAccount;
use crate::error::{AdminError, AdminResult};

pub(crate) const CUSTOM_TOKEN_AUDIENCE: &str =
    "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";

pub(crate) const OAUTH_SCOPES: &str = "https://www.googleapis.com/auth/cloud-platform \
     https://www.googleapis.com/auth/identitytoolkit \
     https://www.googleapis.com/auth/userinfo.email";

/// Both token kinds are valid for one hour, the maximum the backend accepts.
pub(crate) const TOKEN_LIFETIME_SECS: u64 = 3600;

/// Uids longer than this are refused by the backend
const MAX_UID_LEN: usize = 128;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Serialize)]
struct CustomTokenClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
    uid: &'a str,
}

pub(crate) fn now_secs() -> AdminResult<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| AdminError::BackendUnavailable(format!("system clock error: {e}")))
}

fn header(account: &ServiceAccount) -> Header {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = account.private_key_id.clone();
    header
}

/// Assertion for the `urn:ietf:params:oauth:grant-type:jwt-bearer` grant
pub(crate) fn oauth_assertion(
    account: &ServiceAccount,
    key: &EncodingKey,
    now: u64,
) -> AdminResult<String> {
    let claims = AssertionClaims {
        iss: &account.client_email,
        scope: OAUTH_SCOPES,
        aud: &account.token_uri,
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
    };
    encode(&header(account), &claims, key)
        .map_err(|e| AdminError::BackendUnavailable(format!("signing OAuth assertion: {e}")))
}

pub(crate) fn custom_token(
    account: &ServiceAccount,
    key: &EncodingKey,
    uid: &str,
    now: u64,
) -> AdminResult<String> {
    if uid.is_empty() || uid.len() > MAX_UID_LEN {
        return Err(AdminError::Validation(format!(
            "uid must be 1 to {MAX_UID_LEN} characters"
        )));
    }
    let claims = CustomTokenClaims {
        iss: &account.client_email,
        sub: &account.client_email,
        aud: CUSTOM_TOKEN_AUDIENCE,
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
        uid,
    };
    encode(&header(account), &claims, key)
        .map_err(|e| AdminError::BackendUnavailable(format!("signing custom token: {e}")))
}
