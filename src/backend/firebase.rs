//! Firebase Authentication over the Identity Toolkit REST API.

use std::sync::Mutex;
use std::time::Duration;

use jsonwebtoken::EncodingKey;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::auth;
use super::models::{RawAccount, SignInTokens, UserRecord, UserUpdate};
use super::IdentityBackend;
use crate::credentials::ServiceAccount;
use crate::error::{AdminError, AdminResult};
use crate::ui::prelude::*;

const PRODUCTION_BASE: &str = "https://identitytoolkit.googleapis.com";

/// Largest page `accounts:batchGet` will return
const LIST_PAGE_SIZE: u32 = 1000;

/// Refresh the access token this long before it actually expires
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

/// The emulator accepts any key, but the parameter must be present
const EMULATOR_API_KEY: &str = "emulator-api-key";

/// Where requests are sent and how they authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseEndpoints {
    base_url: String,
    emulator: bool,
}

impl FirebaseEndpoints {
    pub fn production() -> Self {
        Self::custom(PRODUCTION_BASE)
    }

    /// Auth emulator at `host:port`
    pub fn emulator(host: &str) -> Self {
        Self {
            base_url: format!(
                "http://{}/identitytoolkit.googleapis.com",
                host.trim_end_matches('/')
            ),
            emulator: true,
        }
    }

    /// Any Identity Toolkit compatible base URL, authenticated with OAuth
    pub fn custom(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            emulator: false,
        }
    }

    pub fn is_emulator(&self) -> bool {
        self.emulator
    }
}

struct AccessToken {
    value: String,
    expires_at: u64,
}

#[derive(Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    auth::TOKEN_LIFETIME_SECS
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountsPage {
    #[serde(default)]
    users: Vec<RawAccount>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
    expires_in: Option<String>,
}

impl From<SignInResponse> for SignInTokens {
    fn from(r: SignInResponse) -> Self {
        SignInTokens {
            uid: r.local_id,
            id_token: r.id_token,
            refresh_token: r.refresh_token,
            expires_in_secs: r
                .expires_in
                .and_then(|s| s.parse().ok())
                .unwrap_or(auth::TOKEN_LIFETIME_SECS),
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct FirebaseClient {
    http: Client,
    account: ServiceAccount,
    key: EncodingKey,
    endpoints: FirebaseEndpoints,
    api_key: Option<String>,
    access_token: Mutex<Option<AccessToken>>,
}

impl FirebaseClient {
    pub fn new(
        account: ServiceAccount,
        endpoints: FirebaseEndpoints,
        api_key: Option<String>,
        timeout: Duration,
    ) -> AdminResult<Self> {
        let key = account.encoding_key()?;
        let http = Client::builder()
            .user_agent(concat!("fireadmin/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            account,
            key,
            endpoints,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            access_token: Mutex::new(None),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.account.project_id
    }

    fn admin_url(&self, action: &str) -> String {
        format!(
            "{}/v1/projects/{}/{}",
            self.endpoints.base_url, self.account.project_id, action
        )
    }

    fn public_url(&self, action: &str) -> AdminResult<String> {
        let key = match (&self.api_key, self.endpoints.is_emulator()) {
            (Some(key), _) => key.as_str(),
            (None, true) => EMULATOR_API_KEY,
            (None, false) => {
                return Err(AdminError::Validation(
                    "sign-in needs a Web API key (pass --api-key or set FIREBASE_API_KEY)"
                        .to_string(),
                ));
            }
        };
        Ok(format!(
            "{}/v1/{}?key={}",
            self.endpoints.base_url, action, key
        ))
    }

    /// Bearer credential for admin calls, cached until shortly before expiry
    fn bearer(&self) -> AdminResult<String> {
        if self.endpoints.is_emulator() {
            return Ok("owner".to_string());
        }

        let now = auth::now_secs()?;
        let mut cached = self
            .access_token
            .lock()
            .map_err(|_| AdminError::BackendUnavailable("access token cache poisoned".into()))?;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > now + TOKEN_EXPIRY_MARGIN_SECS {
                return Ok(token.value.clone());
            }
        }

        emit(
            Level::Debug,
            "backend.oauth",
            &format!("requesting access token from {}", self.account.token_uri),
        );
        let assertion = auth::oauth_assertion(&self.account, &self.key, now)?;
        let response = self
            .http
            .post(&self.account.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(AdminError::BackendUnavailable(format!(
                "OAuth token exchange failed (HTTP {status}): {body}"
            )));
        }

        let token: OAuthTokenResponse = response.json()?;
        let value = token.access_token.clone();
        *cached = Some(AccessToken {
            value: token.access_token,
            expires_at: now + token.expires_in,
        });
        Ok(value)
    }

    fn admin_call<T: DeserializeOwned>(&self, request: RequestBuilder) -> AdminResult<T> {
        let bearer = self.bearer()?;
        self.execute(request.bearer_auth(bearer))
    }

    fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> AdminResult<T> {
        let response = request.send()?;
        emit(
            Level::Debug,
            "backend.response",
            &format!("{} {}", response.status(), redact_key(response.url().as_str())),
        );
        decode_response(response)
    }
}

fn decode_response<T: DeserializeOwned>(response: Response) -> AdminResult<T> {
    let status = response.status();
    if status.is_success() {
        return response.json().map_err(|e| {
            AdminError::BackendUnavailable(format!("unexpected response shape: {e}"))
        });
    }

    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);
    Err(classify_error(status, &message))
}

/// Map an Identity Toolkit error message onto the local taxonomy.
///
/// Messages look like `USER_NOT_FOUND` or `WEAK_PASSWORD : Password should be
/// at least 6 characters`.
fn classify_error(status: StatusCode, message: &str) -> AdminError {
    let code = message
        .split(|c: char| c == ':' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    match code {
        "USER_NOT_FOUND" => AdminError::NotFound(message.to_string()),
        "EMAIL_NOT_FOUND"
        | "INVALID_PASSWORD"
        | "INVALID_LOGIN_CREDENTIALS"
        | "USER_DISABLED"
        | "INVALID_CUSTOM_TOKEN"
        | "CREDENTIAL_MISMATCH"
        | "TOO_MANY_ATTEMPTS_TRY_LATER" => AdminError::Authentication(message.to_string()),
        "WEAK_PASSWORD" | "INVALID_EMAIL" | "MISSING_PASSWORD" | "INVALID_DISPLAY_NAME" => {
            AdminError::Validation(message.to_string())
        }
        _ => AdminError::BackendUnavailable(format!("HTTP {status}: {message}")),
    }
}

fn redact_key(url: &str) -> String {
    match url.find("key=") {
        Some(idx) => format!("{}key=***", &url[..idx]),
        None => url.to_string(),
    }
}

impl IdentityBackend for FirebaseClient {
    fn list_users(&self) -> AdminResult<Vec<UserRecord>> {
        let url = self.admin_url("accounts:batchGet");
        let mut users = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("maxResults", LIST_PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("nextPageToken", token.clone()));
            }

            emit(Level::Debug, "backend.request", &format!("GET {url}"));
            let page: AccountsPage = self.admin_call(self.http.get(&url).query(&query))?;

            for raw in page.users {
                match raw.into_record() {
                    Some(record) => users.push(record),
                    None => emit(
                        Level::Warn,
                        "backend.list.rejected",
                        &format!("{} Skipping account without a uid", Glyph::Warning),
                    ),
                }
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(users)
    }

    fn get_user(&self, uid: &str) -> AdminResult<UserRecord> {
        let url = self.admin_url("accounts:lookup");
        emit(Level::Debug, "backend.request", &format!("POST {url}"));
        let page: AccountsPage =
            self.admin_call(self.http.post(&url).json(&json!({ "localId": [uid] })))?;

        page.users
            .into_iter()
            .find_map(RawAccount::into_record)
            .ok_or_else(|| AdminError::NotFound(format!("no user with uid {uid}")))
    }

    fn update_user(&self, uid: &str, update: &UserUpdate) -> AdminResult<UserRecord> {
        if update.is_empty() {
            return Err(AdminError::Validation("nothing to update".to_string()));
        }

        let mut body = json!({ "localId": uid });
        match update.display_name.as_deref() {
            // An empty name has to be deleted rather than set
            Some(name) if name.is_empty() => {
                body["deleteAttribute"] = json!(["DISPLAY_NAME"]);
            }
            Some(name) => body["displayName"] = json!(name),
            None => {}
        }
        if let Some(password) = &update.password {
            body["password"] = json!(password);
        }

        let url = self.admin_url("accounts:update");
        emit(Level::Debug, "backend.request", &format!("POST {url}"));
        let _: Value = self.admin_call(self.http.post(&url).json(&body))?;

        self.get_user(uid)
    }

    fn create_custom_token(&self, uid: &str) -> AdminResult<String> {
        auth::custom_token(&self.account, &self.key, uid, auth::now_secs()?)
    }

    fn verify_password(&self, email: &str, password: &str) -> AdminResult<SignInTokens> {
        let url = self.public_url("accounts:signInWithPassword")?;
        emit(
            Level::Debug,
            "backend.request",
            &format!("POST {}", redact_key(&url)),
        );
        let response: SignInResponse = self.execute(self.http.post(&url).json(&json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        })))?;
        Ok(response.into())
    }

    fn sign_in_with_custom_token(&self, token: &str) -> AdminResult<SignInTokens> {
        let url = self.public_url("accounts:signInWithCustomToken")?;
        emit(
            Level::Debug,
            "backend.request",
            &format!("POST {}", redact_key(&url)),
        );
        let response: SignInResponse = self.execute(self.http.post(&url).json(&json!({
            "token": token,
            "returnSecureToken": true,
        })))?;
        Ok(response.into())
    }

    fn supports_sign_in(&self) -> bool {
        self.api_key.is_some() || self.endpoints.is_emulator()
    }
}
