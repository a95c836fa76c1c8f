//! Service-account credentials loading
//!
//! The credentials file is the JSON key downloaded from the Firebase console
//! (Project Settings > Service Accounts). It is validated completely before
//! the backend client is built so that a bad file never reaches the menu.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use jsonwebtoken::EncodingKey;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Fields every service-account file must carry
pub const REQUIRED_FIELDS: [&str; 4] = ["type", "project_id", "private_key", "client_email"];

#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    #[serde(rename = "type")]
    pub account_type: String,
    pub project_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("account_type", &self.account_type)
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("client_id", &self.client_id)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccount {
    /// Parse the PEM private key into a signing key
    pub fn encoding_key(&self) -> Result<EncodingKey, ConfigError> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))
    }
}

/// Load and validate a service-account file
pub fn load(path: &Path) -> Result<ServiceAccount, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    parse(path, &contents)
}

fn parse(path: &Path, contents: &str) -> Result<ServiceAccount, ConfigError> {
    let malformed = |reason: String| ConfigError::Malformed {
        path: PathBuf::from(path),
        reason,
    };

    let value: serde_json::Value =
        serde_json::from_str(contents).map_err(|e| malformed(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| malformed("top-level value is not an object".to_string()))?;

    for field in REQUIRED_FIELDS {
        match object.get(field).and_then(|v| v.as_str()) {
            Some(s) if !s.trim().is_empty() => {}
            _ => return Err(ConfigError::MissingField(field)),
        }
    }

    let account: ServiceAccount =
        serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;

    // Fail here rather than on the first signed request.
    account.encoding_key()?;

    Ok(account)
}
