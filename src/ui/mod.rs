//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{ReleaseError, Result};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_missing_bump, display_release_plan, display_status, display_success,
};

/// Asks the maintainer yes/no questions at the release gates
pub trait Prompter {
    /// Ask `question`; `Ok(true)` only for an explicit yes
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Whether an answer line means yes: `y` in any case, surrounding whitespace ignored.
pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Prompts on stdout and reads answers from stdin
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        print!("\n{} [y/n] ", question);
        io::stdout().flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Err(ReleaseError::precondition(format!(
                "no answer to '{}' (stdin closed)",
                question
            )));
        }

        Ok(is_yes(&input))
    }
}

/// Prompter answering from a fixed script, for tests and non-interactive use
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    /// Answer each question with the next entry of `answers`
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompter {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        self.asked.borrow_mut().push(question.to_string());
        let answer = self.answers.borrow_mut().pop_front().ok_or_else(|| {
            ReleaseError::precondition(format!("no scripted answer for '{}'", question))
        })?;
        Ok(is_yes(&answer))
    }
}
