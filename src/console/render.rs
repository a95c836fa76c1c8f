//! Terminal output for the console: tables, detail panels and notices.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ColumnConstraint, ContentArrangement, Table};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

use super::menu::MenuChoice;
use super::password::{PasswordStrength, StrengthLevel};
use crate::backend::{SignInTokens, UserRecord};
use crate::ui::{self, prelude::*};

const EMAIL_WIDTH: usize = 35;
const NAME_WIDTH: usize = 25;

pub trait TableRenderer {
    fn clear(&mut self);

    fn header(&mut self);

    fn menu(&mut self, choices: &[MenuChoice]);

    fn users(&mut self, title: &str, users: &[&UserRecord]);

    fn user_details(&mut self, user: &UserRecord);

    fn password_strength(&mut self, strength: &PasswordStrength);

    fn custom_token(&mut self, uid: &str, token: &str);

    fn sign_in_tokens(&mut self, tokens: &SignInTokens);

    fn notice(&mut self, level: Level, code: &str, message: &str);
}

/// Cut `value` to `max` characters, marking the cut with `...`
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        let head: String = value.chars().take(max).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}

pub fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

pub fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "Never".to_string(),
    }
}

/// Users listing. The UID column never wraps so it can be copied whole.
pub fn users_table(users: &[&UserRecord]) -> Table {
    let mut table = TerminalRenderer::table();
    table.set_header(vec![
        Cell::new("UID").add_attribute(Attribute::Bold),
        Cell::new("Email").add_attribute(Attribute::Bold),
        Cell::new("Display Name").add_attribute(Attribute::Bold),
        Cell::new("Verified").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
    ]);

    for user in users {
        let (verified, verified_color) = if user.email_verified {
            (format!("{} Yes", Glyph::Check), Color::Green)
        } else {
            (format!("{} No", Glyph::Cross), Color::Yellow)
        };
        let (status, status_color) = if user.disabled {
            (format!("{} Disabled", Glyph::Lock), Color::Red)
        } else {
            (format!("{} Active", Glyph::Active), Color::Green)
        };

        table.add_row(vec![
            Cell::new(&user.uid)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(truncate(or_placeholder(&user.email, "No email"), EMAIL_WIDTH))
                .fg(Color::Green),
            Cell::new(truncate(
                or_placeholder(&user.display_name, "No name"),
                NAME_WIDTH,
            ))
            .fg(Color::Magenta),
            Cell::new(verified).fg(verified_color),
            Cell::new(status).fg(status_color),
        ]);
    }

    if let Some(column) = table.column_mut(0) {
        column.set_constraint(ColumnConstraint::ContentWidth);
    }
    table
}

pub struct TerminalRenderer;

impl TerminalRenderer {
    fn table() -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !ui::color_enabled() {
            table.force_no_tty();
        }
        table
    }

    fn print(&self, text: impl std::fmt::Display) {
        let _ = writeln!(io::stdout(), "{text}");
    }
}

impl TableRenderer for TerminalRenderer {
    fn clear(&mut self) {
        let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
    }

    fn header(&mut self) {
        separator(false);
        self.print(format!(
            "  {}  {}",
            "Firebase Admin Console".bold().blue(),
            "User Management".italic().green()
        ));
        separator(false);
    }

    fn menu(&mut self, choices: &[MenuChoice]) {
        self.print("");
        self.print("Main Menu".bold().green());
        separator(true);
        for choice in choices {
            self.print(format!(
                "  {} {} {}",
                format!("{}.", choice.number()).bold().cyan(),
                choice.glyph(),
                choice.label()
            ));
        }
        separator(true);
        self.print(
            "Type 'back' at any prompt to return here. UIDs are shown in full for copying."
                .dimmed(),
        );
    }

    fn users(&mut self, title: &str, users: &[&UserRecord]) {
        if users.is_empty() {
            emit(Level::Warn, "console.users.empty", "No users found.");
            return;
        }

        self.print("");
        self.print(title.bold());
        self.print(users_table(users));
        self.print(format!("Total users: {}", users.len()).dimmed());
    }

    fn user_details(&mut self, user: &UserRecord) {
        let mut table = Self::table();
        table.set_header(vec![
            Cell::new("User Details").add_attribute(Attribute::Bold),
            Cell::new(""),
        ]);
        let rows = [
            ("UID", user.uid.clone(), Color::Cyan),
            (
                "Email",
                or_placeholder(&user.email, "No email").to_string(),
                Color::Green,
            ),
            (
                "Display Name",
                or_placeholder(&user.display_name, "No name").to_string(),
                Color::Magenta,
            ),
            (
                "Email Verified",
                if user.email_verified { "Yes" } else { "No" }.to_string(),
                Color::Yellow,
            ),
            (
                "Account Status",
                if user.disabled { "Disabled" } else { "Active" }.to_string(),
                Color::Red,
            ),
            ("Created", format_time(Some(user.creation_time)), Color::Blue),
            ("Last Sign In", format_time(user.last_sign_in_time), Color::Blue),
        ];
        for (label, value, color) in rows {
            table.add_row(vec![
                Cell::new(label).fg(color).add_attribute(Attribute::Bold),
                Cell::new(value),
            ]);
        }
        self.print(table);
    }

    fn password_strength(&mut self, strength: &PasswordStrength) {
        let level = strength.level();
        let filled = strength.meter();
        let meter: String = (0..3)
            .map(|i| {
                if i < filled {
                    Glyph::Filled.to_string()
                } else {
                    Glyph::Empty.to_string()
                }
            })
            .collect();
        let tick = |ok: bool| if ok { Glyph::Check } else { Glyph::Cross };

        let headline = format!("Password Strength: {} {}", level.label(), meter);
        let headline = match level {
            StrengthLevel::Weak => headline.red().bold(),
            StrengthLevel::Medium => headline.yellow().bold(),
            StrengthLevel::Strong => headline.green().bold(),
        };
        self.print(headline);
        self.print(format!("Length: {} characters", strength.length).dimmed());
        self.print(
            format!(
                "Uppercase: {} Lowercase: {} Numbers: {} Special chars: {}",
                tick(strength.has_upper),
                tick(strength.has_lower),
                tick(strength.has_digit),
                tick(strength.has_special)
            )
            .dimmed(),
        );
    }

    fn custom_token(&mut self, uid: &str, token: &str) {
        self.print(format!("Custom token for {}:", uid.bold().cyan()));
        self.print(token);
        self.print("Valid for one hour. Exchange it with signInWithCustomToken.".dimmed());
    }

    fn sign_in_tokens(&mut self, tokens: &SignInTokens) {
        if let Some(uid) = &tokens.uid {
            self.print(format!("Signed in as {}", uid.bold().cyan()));
        }
        self.print("ID token:".bold());
        self.print(&tokens.id_token);
        if !tokens.refresh_token.is_empty() {
            self.print("Refresh token:".bold());
            self.print(&tokens.refresh_token);
        }
        self.print(format!("Expires in {} seconds", tokens.expires_in_secs).dimmed());
    }

    fn notice(&mut self, level: Level, code: &str, message: &str) {
        emit(level, code, message);
    }
}

#[cfg(test)]
pub(crate) mod recording {
    //! Renderer that records what would have been drawn

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Drawn {
        Clear,
        Menu,
        Users { title: String, uids: Vec<String> },
        Details(UserRecord),
        Strength(u8),
        CustomToken { uid: String, token: String },
        SignIn(SignInTokens),
        Notice { level: Level, code: String },
    }

    #[derive(Default)]
    pub(crate) struct RecordingRenderer {
        pub drawn: Vec<Drawn>,
    }

    impl RecordingRenderer {
        pub fn notices(&self) -> Vec<&str> {
            self.drawn
                .iter()
                .filter_map(|d| match d {
                    Drawn::Notice { code, .. } => Some(code.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn menus(&self) -> usize {
            self.drawn.iter().filter(|d| **d == Drawn::Menu).count()
        }

        pub fn last_details(&self) -> Option<&UserRecord> {
            self.drawn.iter().rev().find_map(|d| match d {
                Drawn::Details(user) => Some(user),
                _ => None,
            })
        }
    }

    impl TableRenderer for RecordingRenderer {
        fn clear(&mut self) {
            self.drawn.push(Drawn::Clear);
        }

        fn header(&mut self) {}

        fn menu(&mut self, _choices: &[MenuChoice]) {
            self.drawn.push(Drawn::Menu);
        }

        fn users(&mut self, title: &str, users: &[&UserRecord]) {
            self.drawn.push(Drawn::Users {
                title: title.to_string(),
                uids: users.iter().map(|u| u.uid.clone()).collect(),
            });
        }

        fn user_details(&mut self, user: &UserRecord) {
            self.drawn.push(Drawn::Details(user.clone()));
        }

        fn password_strength(&mut self, strength: &PasswordStrength) {
            self.drawn.push(Drawn::Strength(strength.score));
        }

        fn custom_token(&mut self, uid: &str, token: &str) {
            self.drawn.push(Drawn::CustomToken {
                uid: uid.to_string(),
                token: token.to_string(),
            });
        }

        fn sign_in_tokens(&mut self, tokens: &SignInTokens) {
            self.drawn.push(Drawn::SignIn(tokens.clone()));
        }

        fn notice(&mut self, level: Level, code: &str, _message: &str) {
            self.drawn.push(Drawn::Notice {
                level,
                code: code.to_string(),
            });
        }
    }
}
