//! Password rules and strength scoring for the reset flow

use crate::error::{AdminError, AdminResult};

pub const MIN_PASSWORD_LEN: usize = 8;

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLevel {
    pub fn label(self) -> &'static str {
        match self {
            StrengthLevel::Weak => "Weak",
            StrengthLevel::Medium => "Medium",
            StrengthLevel::Strong => "Strong",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
    pub length: usize,
    pub has_upper: bool,
    pub has_lower: bool,
    pub has_digit: bool,
    pub has_special: bool,
    /// 0..=6, one point per satisfied criterion
    pub score: u8,
}

impl PasswordStrength {
    pub fn analyze(password: &str) -> Self {
        let length = password.chars().count();
        let has_upper = password.chars().any(char::is_uppercase);
        let has_lower = password.chars().any(char::is_lowercase);
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_special = password.chars().any(|c| SPECIAL_CHARS.contains(c));

        let score = [
            length >= MIN_PASSWORD_LEN,
            length >= 12,
            has_upper,
            has_lower,
            has_digit,
            has_special,
        ]
        .iter()
        .filter(|ok| **ok)
        .count() as u8;

        Self {
            length,
            has_upper,
            has_lower,
            has_digit,
            has_special,
            score,
        }
    }

    pub fn level(&self) -> StrengthLevel {
        match (self.score / 2).min(2) {
            0 => StrengthLevel::Weak,
            1 => StrengthLevel::Medium,
            _ => StrengthLevel::Strong,
        }
    }

    /// Filled segments of a three-segment meter
    pub fn meter(&self) -> usize {
        usize::from(self.score / 2).min(3)
    }
}

/// Check a new password against its confirmation and the local rules
pub fn validate_new_password(password: &str, confirmation: &str) -> AdminResult<()> {
    if password.is_empty() {
        return Err(AdminError::Validation("Password cannot be empty.".to_string()));
    }
    if password != confirmation {
        return Err(AdminError::Validation("Passwords don't match.".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AdminError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        )));
    }
    Ok(())
}
