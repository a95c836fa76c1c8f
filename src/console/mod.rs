//! Interactive user management console
//!
//! A single-threaded menu loop. Each iteration handles one [`State`]; the
//! operator's answers decide the next one. Recoverable errors are reported
//! and the loop goes back to the main menu.

pub mod menu;
pub mod password;
pub mod prompter;
pub mod render;

use crate::backend::{IdentityBackend, UserRecord, UserUpdate};
use crate::directory::UserDirectory;
use crate::error::{AdminError, AdminResult};
use crate::ui::prelude::*;

use menu::{MenuChoice, TokenMethod};
use password::{PasswordStrength, validate_new_password};
use prompter::{Prompter, is_back};
use render::TableRenderer;

/// What a selected uid will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    ViewDetails,
    UpdatePassword,
    UpdateDisplayName,
    GenerateTokens,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    MainMenu,
    AwaitSearchInput,
    AwaitUidSelection(UserAction),
    AwaitNewPassword(String),
    AwaitNewName(String),
    AwaitTokenMethod(String),
    Exit,
}

pub struct Console<B, P, R> {
    backend: B,
    prompter: P,
    renderer: R,
    directory: UserDirectory,
    /// Query behind the listing shown above the menu; blank lists everyone
    view: String,
}

fn view_title(query: &str) -> String {
    if query.trim().is_empty() {
        "All Users".to_string()
    } else {
        format!("Search Results for: '{}'", query.trim())
    }
}

impl<B, P, R> Console<B, P, R>
where
    B: IdentityBackend,
    P: Prompter,
    R: TableRenderer,
{
    pub fn new(backend: B, prompter: P, renderer: R) -> Self {
        Self {
            backend,
            prompter,
            renderer,
            directory: UserDirectory::new(),
            view: String::new(),
        }
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Load the directory, then serve the menu until the operator exits.
    ///
    /// Only non-recoverable errors (a broken terminal) are returned.
    pub fn run(&mut self) -> AdminResult<()> {
        self.renderer.clear();
        self.renderer.header();
        self.load_users();

        let mut state = State::MainMenu;
        while state != State::Exit {
            state = match self.step(state) {
                Ok(next) => next,
                Err(err) if err.is_recoverable() => {
                    self.report(&err);
                    self.finish()?
                }
                Err(err) => return Err(err),
            };
        }
        Ok(())
    }

    fn step(&mut self, state: State) -> AdminResult<State> {
        match state {
            State::MainMenu => self.main_menu(),
            State::AwaitSearchInput => self.search(),
            State::AwaitUidSelection(action) => self.select_user(action),
            State::AwaitNewPassword(uid) => self.update_password(uid),
            State::AwaitNewName(uid) => self.update_name(uid),
            State::AwaitTokenMethod(uid) => self.generate_tokens(uid),
            State::Exit => Ok(State::Exit),
        }
    }

    fn redraw(&mut self) {
        self.renderer.clear();
        self.renderer.header();
    }

    /// Wait for the operator, then go back to the main menu
    fn finish(&mut self) -> AdminResult<State> {
        self.prompter.pause()?;
        Ok(State::MainMenu)
    }

    fn report(&mut self, err: &AdminError) {
        let code = match err {
            AdminError::BackendUnavailable(_) => "backend.unavailable",
            AdminError::Authentication(_) => "backend.auth_failed",
            AdminError::NotFound(_) => "console.not_found",
            AdminError::Validation(_) => "console.invalid_input",
            AdminError::Configuration(_) | AdminError::Terminal(_) => "console.fatal",
        };
        self.renderer
            .notice(Level::Error, code, &format!("{} {}", Glyph::Cross, err));
    }

    fn load_users(&mut self) {
        self.renderer.notice(
            Level::Info,
            "directory.refresh.start",
            "Loading users from Firebase...",
        );
        match self.directory.refresh(&self.backend) {
            Ok(count) => {
                if let Some(at) = self.directory.refreshed_at() {
                    emit(
                        Level::Debug,
                        "directory.refresh.at",
                        &format!("snapshot taken {}", at.to_rfc3339()),
                    );
                }
                self.renderer.notice(
                    Level::Success,
                    "directory.refresh.done",
                    &format!("{} Loaded {} users successfully!", Glyph::Check, count),
                )
            }
            Err(err) => self.renderer.notice(
                Level::Error,
                "directory.refresh.failed",
                &format!("{} Error loading users: {}", Glyph::Cross, err),
            ),
        }
    }

    /// Draw the current listing, re-evaluated against the latest snapshot
    fn show_view(&mut self) {
        if self.directory.is_empty() {
            self.renderer.notice(
                Level::Warn,
                "directory.empty",
                &format!("{} No users loaded. Choose 2 to refresh.", Glyph::Warning),
            );
            return;
        }
        let title = view_title(&self.view);
        let users = self.directory.search(&self.view);
        self.renderer.users(&title, &users);
    }

    fn main_menu(&mut self) -> AdminResult<State> {
        self.redraw();
        self.show_view();
        self.renderer.menu(&MenuChoice::ALL);

        // Re-prompt in place so the warning stays on screen.
        let choice = loop {
            let answer = self
                .prompter
                .input(&format!("Select an option [1-{}]", MenuChoice::ALL.len()))?;
            match MenuChoice::parse(&answer) {
                Some(choice) => break choice,
                None => self.renderer.notice(
                    Level::Warn,
                    "console.menu.invalid",
                    &format!(
                        "Please enter a number between 1 and {}.",
                        MenuChoice::ALL.len()
                    ),
                ),
            }
        };

        emit(
            Level::Debug,
            "console.menu.choice",
            &format!("selected {}", choice.label()),
        );

        match choice {
            MenuChoice::Search => Ok(State::AwaitSearchInput),
            MenuChoice::Refresh => {
                self.load_users();
                self.finish()
            }
            MenuChoice::ViewDetails => Ok(State::AwaitUidSelection(UserAction::ViewDetails)),
            MenuChoice::UpdatePassword => {
                Ok(State::AwaitUidSelection(UserAction::UpdatePassword))
            }
            MenuChoice::UpdateDisplayName => {
                Ok(State::AwaitUidSelection(UserAction::UpdateDisplayName))
            }
            MenuChoice::GenerateTokens => {
                Ok(State::AwaitUidSelection(UserAction::GenerateTokens))
            }
            MenuChoice::ShowAll => {
                self.view.clear();
                self.redraw();
                let users: Vec<&UserRecord> = self.directory.all().iter().collect();
                self.renderer.users(&view_title(&self.view), &users);
                self.finish()
            }
            MenuChoice::Exit => {
                self.renderer
                    .notice(Level::Success, "console.exit", "Goodbye!");
                Ok(State::Exit)
            }
        }
    }

    fn search(&mut self) -> AdminResult<State> {
        let query = self.prompter.input("Enter search query (name or email)")?;
        if is_back(&query) {
            return Ok(State::MainMenu);
        }

        self.redraw();
        let results = self.directory.search(&query);
        self.renderer.users(&view_title(&query), &results);
        self.view = query;
        self.finish()
    }

    fn select_user(&mut self, action: UserAction) -> AdminResult<State> {
        let uid = self
            .prompter
            .input("Enter user UID (or 'back' to return to menu)")?;
        if is_back(&uid) {
            return Ok(State::MainMenu);
        }

        let user = match self.directory.find_by_uid(uid.trim()) {
            Ok(user) => user.clone(),
            Err(AdminError::NotFound(_)) => {
                self.renderer.notice(
                    Level::Error,
                    "console.uid.not_found",
                    &format!("{} User not found!", Glyph::Cross),
                );
                return Ok(State::AwaitUidSelection(action));
            }
            Err(err) => return Err(err),
        };

        self.redraw();
        self.renderer.user_details(&user);

        let question = match action {
            UserAction::ViewDetails => return self.finish(),
            UserAction::UpdatePassword => "Do you want to update this user's password?",
            UserAction::UpdateDisplayName => "Do you want to update this user's display name?",
            UserAction::GenerateTokens => "Do you want to generate a token for this user?",
        };
        if !self.prompter.confirm(question, false)? {
            return self.finish();
        }

        Ok(match action {
            UserAction::UpdatePassword => State::AwaitNewPassword(user.uid),
            UserAction::UpdateDisplayName => State::AwaitNewName(user.uid),
            UserAction::GenerateTokens | UserAction::ViewDetails => {
                State::AwaitTokenMethod(user.uid)
            }
        })
    }

    /// Ask whether to retry after invalid input
    fn retry_or_menu(&mut self, err: &AdminError, retry: State) -> AdminResult<State> {
        self.renderer.notice(
            Level::Error,
            "console.invalid_input",
            &format!("{} {}", Glyph::Cross, err),
        );
        if self.prompter.confirm("Do you want to try again?", true)? {
            Ok(retry)
        } else {
            Ok(State::MainMenu)
        }
    }

    fn update_password(&mut self, uid: String) -> AdminResult<State> {
        self.renderer.notice(
            Level::Info,
            "console.password.rules",
            &format!(
                "Password requirements: at least {} characters; mix upper/lowercase, numbers and symbols. Type 'back' to cancel.",
                password::MIN_PASSWORD_LEN
            ),
        );

        let new_password = self.prompter.password("Enter new password")?;
        if is_back(&new_password) {
            return Ok(State::MainMenu);
        }
        self.renderer
            .password_strength(&PasswordStrength::analyze(&new_password));

        let confirmation = self.prompter.password("Confirm new password")?;
        if is_back(&confirmation) {
            return Ok(State::MainMenu);
        }

        if let Err(err) = validate_new_password(&new_password, &confirmation) {
            return self.retry_or_menu(&err, State::AwaitNewPassword(uid));
        }

        match self
            .backend
            .update_user(&uid, &UserUpdate::password(new_password))
        {
            Ok(record) => {
                self.renderer.notice(
                    Level::Success,
                    "console.password.updated",
                    &format!("{} Password updated successfully!", Glyph::Check),
                );
                self.after_mutation(record)
            }
            Err(err @ AdminError::Validation(_)) => {
                self.retry_or_menu(&err, State::AwaitNewPassword(uid))
            }
            Err(err) => Err(err),
        }
    }

    fn update_name(&mut self, uid: String) -> AdminResult<State> {
        let new_name = self
            .prompter
            .input("Enter new display name (or 'back' to return)")?;
        if is_back(&new_name) {
            return Ok(State::MainMenu);
        }

        let new_name = new_name.trim().to_string();
        if new_name.is_empty()
            && !self
                .prompter
                .confirm("Remove this user's display name?", false)?
        {
            return Ok(State::AwaitNewName(uid));
        }

        match self
            .backend
            .update_user(&uid, &UserUpdate::display_name(new_name))
        {
            Ok(record) => {
                self.renderer.notice(
                    Level::Success,
                    "console.name.updated",
                    &format!("{} Display name updated successfully!", Glyph::Check),
                );
                self.after_mutation(record)
            }
            Err(err @ AdminError::Validation(_)) => {
                self.retry_or_menu(&err, State::AwaitNewName(uid))
            }
            Err(err) => Err(err),
        }
    }

    fn generate_tokens(&mut self, uid: String) -> AdminResult<State> {
        let mut items: Vec<String> = TokenMethod::ALL
            .iter()
            .map(|m| m.label().to_string())
            .collect();
        items.push("Back".to_string());

        let picked = self.prompter.select("Choose a token method", &items)?;
        let Some(method) = TokenMethod::ALL.get(picked).copied() else {
            return Ok(State::MainMenu);
        };

        if method.needs_sign_in() && !self.backend.supports_sign_in() {
            self.renderer.notice(
                Level::Warn,
                "console.token.sign_in_unavailable",
                &format!(
                    "{} Sign-in methods need a Web API key (--api-key or FIREBASE_API_KEY).",
                    Glyph::Warning
                ),
            );
            return self.finish();
        }

        match method {
            TokenMethod::CustomToken => {
                let token = self.backend.create_custom_token(&uid)?;
                self.renderer.custom_token(&uid, &token);
            }
            TokenMethod::IdTokenFromCustomToken => {
                let token = self.backend.create_custom_token(&uid)?;
                let tokens = self.backend.sign_in_with_custom_token(&token)?;
                self.renderer.sign_in_tokens(&tokens);
            }
            TokenMethod::IdTokenFromPassword => {
                let user = self.directory.find_by_uid(&uid)?;
                if !user.has_email() {
                    self.renderer.notice(
                        Level::Warn,
                        "console.token.no_email",
                        &format!(
                            "{} This user has no email, so password sign-in is unavailable.",
                            Glyph::Warning
                        ),
                    );
                    return self.finish();
                }
                let email = user.email.clone();

                let password = self.prompter.password("Enter the user's password")?;
                if is_back(&password) {
                    return Ok(State::MainMenu);
                }
                if password.is_empty() {
                    let err = AdminError::Validation("Password cannot be empty.".to_string());
                    return self.retry_or_menu(&err, State::AwaitTokenMethod(uid));
                }

                let tokens = self.backend.verify_password(&email, &password)?;
                self.renderer.sign_in_tokens(&tokens);
            }
        }

        let record = self.backend.get_user(&uid)?;
        self.after_mutation(record)
    }

    /// Refresh the directory and show the account as it now stands.
    ///
    /// If the refresh fails the backend's own copy of the record is shown.
    fn after_mutation(&mut self, record: UserRecord) -> AdminResult<State> {
        let current = match self.directory.refresh(&self.backend) {
            Ok(_) => self
                .directory
                .find_by_uid(&record.uid)
                .cloned()
                .unwrap_or(record),
            Err(err) => {
                self.renderer.notice(
                    Level::Warn,
                    "directory.refresh.failed",
                    &format!(
                        "{} Change applied, but reloading users failed ({}). The listing may be stale.",
                        Glyph::Warning,
                        err
                    ),
                );
                record
            }
        };
        self.renderer.user_details(&current);
        self.finish()
    }
}
