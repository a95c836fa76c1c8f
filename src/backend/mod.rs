//! Identity backend access
//!
//! The console only talks to the backend through [`IdentityBackend`], so the
//! Firebase REST client can be swapped for an in-memory fake in tests.

mod auth;
mod firebase;
mod models;

pub use firebase::{FirebaseClient, FirebaseEndpoints};
pub use models::{SignInTokens, UserRecord, UserUpdate};

use crate::error::AdminResult;

pub trait IdentityBackend {
    /// Every account, in the order the backend lists them
    fn list_users(&self) -> AdminResult<Vec<UserRecord>>;

    fn get_user(&self, uid: &str) -> AdminResult<UserRecord>;

    /// Apply `update` and return the account as it is afterwards
    fn update_user(&self, uid: &str, update: &UserUpdate) -> AdminResult<UserRecord>;

    /// Mint a custom token that signs in as `uid`
    fn create_custom_token(&self, uid: &str) -> AdminResult<String>;

    /// Email/password sign-in
    fn verify_password(&self, email: &str, password: &str) -> AdminResult<SignInTokens>;

    /// Exchange a custom token for an ID token
    fn sign_in_with_custom_token(&self, token: &str) -> AdminResult<SignInTokens>;

    /// Whether the sign-in endpoints can be used (they need a Web API key)
    fn supports_sign_in(&self) -> bool;
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory backend used by directory and console tests

    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::error::AdminError;

    #[derive(Default)]
    pub(crate) struct FakeBackend {
        pub users: RefCell<Vec<UserRecord>>,
        pub passwords: RefCell<Vec<(String, String)>>,
        pub fail_listing: Cell<bool>,
        pub fail_updates: Cell<bool>,
        pub list_calls: Cell<usize>,
        pub calls: Cell<usize>,
        pub sign_in: Cell<bool>,
    }

    impl FakeBackend {
        pub fn with_users(users: Vec<UserRecord>) -> Self {
            let backend = Self::default();
            *backend.users.borrow_mut() = users;
            backend.sign_in.set(true);
            backend
        }

        pub fn alice_and_bob() -> Self {
            Self::with_users(vec![
                UserRecord::new("a1", "alice@x.com", "Alice"),
                UserRecord::new("b2", "bob@x.com", "Bob"),
            ])
        }

        pub fn password_of(&self, uid: &str) -> Option<String> {
            self.passwords
                .borrow()
                .iter()
                .rev()
                .find(|(id, _)| id == uid)
                .map(|(_, pw)| pw.clone())
        }

        fn touch(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    impl IdentityBackend for FakeBackend {
        fn list_users(&self) -> AdminResult<Vec<UserRecord>> {
            self.touch();
            self.list_calls.set(self.list_calls.get() + 1);
            if self.fail_listing.get() {
                return Err(AdminError::BackendUnavailable("listing offline".into()));
            }
            Ok(self.users.borrow().clone())
        }

        fn get_user(&self, uid: &str) -> AdminResult<UserRecord> {
            self.touch();
            self.users
                .borrow()
                .iter()
                .find(|u| u.uid == uid)
                .cloned()
                .ok_or_else(|| AdminError::NotFound(format!("no user {uid}")))
        }

        fn update_user(&self, uid: &str, update: &UserUpdate) -> AdminResult<UserRecord> {
            self.touch();
            if self.fail_updates.get() {
                return Err(AdminError::BackendUnavailable("update rejected".into()));
            }
            let mut users = self.users.borrow_mut();
            let user = users
                .iter_mut()
                .find(|u| u.uid == uid)
                .ok_or_else(|| AdminError::NotFound(format!("no user {uid}")))?;
            if let Some(name) = &update.display_name {
                user.display_name = name.clone();
            }
            if let Some(password) = &update.password {
                self.passwords
                    .borrow_mut()
                    .push((uid.to_string(), password.clone()));
            }
            Ok(user.clone())
        }

        fn create_custom_token(&self, uid: &str) -> AdminResult<String> {
            self.touch();
            Ok(format!("custom-token-for-{uid}"))
        }

        fn verify_password(&self, email: &str, password: &str) -> AdminResult<SignInTokens> {
            self.touch();
            let users = self.users.borrow();
            let user = users
                .iter()
                .find(|u| u.email == email)
                .ok_or_else(|| AdminError::Authentication("EMAIL_NOT_FOUND".into()))?;
            if self.password_of(&user.uid).as_deref() != Some(password) {
                return Err(AdminError::Authentication("INVALID_PASSWORD".into()));
            }
            Ok(SignInTokens {
                uid: Some(user.uid.clone()),
                id_token: format!("id-token-for-{}", user.uid),
                refresh_token: "refresh".into(),
                expires_in_secs: 3600,
            })
        }

        fn sign_in_with_custom_token(&self, token: &str) -> AdminResult<SignInTokens> {
            self.touch();
            let uid = token
                .strip_prefix("custom-token-for-")
                .ok_or_else(|| AdminError::Authentication("INVALID_CUSTOM_TOKEN".into()))?;
            Ok(SignInTokens {
                uid: Some(uid.to_string()),
                id_token: format!("id-token-for-{uid}"),
                refresh_token: "refresh".into(),
                expires_in_secs: 3600,
            })
        }

        fn supports_sign_in(&self) -> bool {
            self.sign_in.get()
        }
    }
}
