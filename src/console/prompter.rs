//! Operator input.
//!
//! The console asks questions through [`Prompter`]; the terminal
//! implementation uses dialoguer, tests use a scripted one.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input, Password, Select};

use crate::error::{AdminError, AdminResult};

/// Typed at any prompt to abandon the current action
pub const BACK_KEYWORD: &str = "back";

pub fn is_back(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(BACK_KEYWORD)
}

pub trait Prompter {
    /// Free text, may be empty
    fn input(&mut self, prompt: &str) -> AdminResult<String>;

    /// Masked entry; nothing typed is echoed
    fn password(&mut self, prompt: &str) -> AdminResult<String>;

    fn confirm(&mut self, prompt: &str, default: bool) -> AdminResult<bool>;

    /// Index of the chosen item
    fn select(&mut self, prompt: &str, items: &[String]) -> AdminResult<usize>;

    /// Block until the operator acknowledges
    fn pause(&mut self) -> AdminResult<()>;
}

pub struct TerminalPrompter;

impl TerminalPrompter {
    /// Fails when stdin or stdout is not a terminal.
    pub fn new() -> AdminResult<Self> {
        if !(std::io::stdin().is_terminal() && std::io::stdout().is_terminal()) {
            return Err(AdminError::Terminal(
                "the console needs an interactive terminal".to_string(),
            ));
        }
        Ok(Self)
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str) -> AdminResult<String> {
        let value: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    fn password(&mut self, prompt: &str) -> AdminResult<String> {
        Ok(Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> AdminResult<bool> {
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> AdminResult<usize> {
        Ok(Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?)
    }

    fn pause(&mut self) -> AdminResult<()> {
        let _: String = Input::new()
            .with_prompt("Press Enter to continue...")
            .allow_empty(true)
            .interact_text()?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    //! Prompter that replays canned answers

    use std::collections::VecDeque;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Answer {
        Text(String),
        Secret(String),
        Yes,
        No,
        Pick(usize),
    }

    #[derive(Default)]
    pub(crate) struct ScriptedPrompter {
        answers: VecDeque<Answer>,
        pub prompts: Vec<String>,
        pub pauses: usize,
    }

    impl ScriptedPrompter {
        pub fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: answers.into(),
                ..Self::default()
            }
        }

        pub fn remaining(&self) -> usize {
            self.answers.len()
        }

        fn next(&mut self, prompt: &str) -> AdminResult<Answer> {
            self.prompts.push(prompt.to_string());
            self.answers
                .pop_front()
                .ok_or_else(|| AdminError::Terminal(format!("script exhausted at '{prompt}'")))
        }
    }

    impl Prompter for ScriptedPrompter {
        fn input(&mut self, prompt: &str) -> AdminResult<String> {
            match self.next(prompt)? {
                Answer::Text(s) => Ok(s),
                other => panic!("expected text for '{prompt}', script had {other:?}"),
            }
        }

        fn password(&mut self, prompt: &str) -> AdminResult<String> {
            match self.next(prompt)? {
                Answer::Secret(s) => Ok(s),
                other => panic!("expected secret for '{prompt}', script had {other:?}"),
            }
        }

        fn confirm(&mut self, prompt: &str, _default: bool) -> AdminResult<bool> {
            match self.next(prompt)? {
                Answer::Yes => Ok(true),
                Answer::No => Ok(false),
                other => panic!("expected yes/no for '{prompt}', script had {other:?}"),
            }
        }

        fn select(&mut self, prompt: &str, items: &[String]) -> AdminResult<usize> {
            match self.next(prompt)? {
                Answer::Pick(i) if i < items.len() => Ok(i),
                other => panic!("expected a pick for '{prompt}', script had {other:?}"),
            }
        }

        fn pause(&mut self) -> AdminResult<()> {
            self.pauses += 1;
            Ok(())
        }
    }

    pub(crate) fn text(s: &str) -> Answer {
        Answer::Text(s.to_string())
    }

    pub(crate) fn secret(s: &str) -> Answer {
        Answer::Secret(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_keyword_is_case_insensitive() {
        assert!(is_back("back"));
        assert!(is_back("  BACK "));
        assert!(!is_back("backup"));
    }
}
