use crate::error::{ReleaseError, Result};
use crate::runner::CommandRunner;
use std::cell::RefCell;
use std::collections::HashMap;

enum Response {
    Output(String),
    Failure { code: i32, stderr: String },
}

/// Runner that records commands instead of executing them
pub struct MockRunner {
    responses: HashMap<String, Response>,
    executed: RefCell<Vec<String>>,
    shown: RefCell<Vec<String>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds with empty output
    pub fn new() -> Self {
        MockRunner {
            responses: HashMap::new(),
            executed: RefCell::new(Vec::new()),
            shown: RefCell::new(Vec::new()),
        }
    }

    /// Make `command` succeed with the given stdout
    pub fn respond(&mut self, command: impl Into<String>, stdout: impl Into<String>) {
        self.responses
            .insert(command.into(), Response::Output(stdout.into()));
    }

    /// Make `command` fail with the given exit code and stderr
    pub fn fail(&mut self, command: impl Into<String>, code: i32, stderr: impl Into<String>) {
        self.responses.insert(
            command.into(),
            Response::Failure {
                code,
                stderr: stderr.into(),
            },
        );
    }

    /// Commands passed to `run`, in order
    pub fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }

    /// Commands passed to `show`, in order
    pub fn shown(&self) -> Vec<String> {
        self.shown.borrow().clone()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &str) -> Result<String> {
        self.executed.borrow_mut().push(command.to_string());

        match self.responses.get(command) {
            Some(Response::Output(stdout)) => Ok(stdout.clone()),
            Some(Response::Failure { code, stderr }) => Err(ReleaseError::Command {
                command: command.to_string(),
                code: *code,
                stderr: stderr.clone(),
            }),
            None => Ok(String::new()),
        }
    }

    fn show(&self, command: &str) -> Result<()> {
        self.shown.borrow_mut().push(command.to_string());
        Ok(())
    }
}
