pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod logging;
pub mod patch;
pub mod release;
pub mod runner;
pub mod ui;

pub use error::{ReleaseError, Result};
