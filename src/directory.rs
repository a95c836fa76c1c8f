//! In-memory user directory
//!
//! A snapshot of every account, replaced wholesale by each refresh. Lookups
//! and searches only ever read the snapshot.

use chrono::{DateTime, Utc};

use crate::backend::{IdentityBackend, UserRecord};
use crate::error::{AdminError, AdminResult};

#[derive(Debug, Default)]
pub struct UserDirectory {
    users: Vec<UserRecord>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot with the backend's current listing.
    ///
    /// On failure the previous snapshot is kept as it was.
    pub fn refresh<B: IdentityBackend + ?Sized>(&mut self, backend: &B) -> AdminResult<usize> {
        let users = backend.list_users().map_err(|err| match err {
            AdminError::BackendUnavailable(_) => err,
            other => AdminError::BackendUnavailable(other.to_string()),
        })?;
        self.users = users;
        self.refreshed_at = Some(Utc::now());
        Ok(self.users.len())
    }

    /// Case-insensitive substring match on display name or email.
    ///
    /// A blank query matches everything; any other query is matched as
    /// given, surrounding whitespace included. Results keep snapshot order.
    pub fn search(&self, query: &str) -> Vec<&UserRecord> {
        if query.trim().is_empty() {
            return self.users.iter().collect();
        }

        let needle = query.to_lowercase();
        self.users
            .iter()
            .filter(|user| {
                user.display_name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn find_by_uid(&self, uid: &str) -> AdminResult<&UserRecord> {
        self.users
            .iter()
            .find(|user| user.uid == uid)
            .ok_or_else(|| AdminError::NotFound(format!("no user with uid {uid}")))
    }

    pub fn all(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }
}
