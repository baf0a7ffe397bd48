//! Structured logging setup.
//!
//! Log lines go to stderr and are prefixed with the milliseconds elapsed since
//! the previous line, which makes slow release steps stand out.

use console::{style, StyledObject};
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

/// Logger context holding the instant of the previous log line.
#[derive(Debug)]
pub struct RelativeTimer {
    last: Mutex<Instant>,
}

impl RelativeTimer {
    pub fn new() -> Self {
        RelativeTimer {
            last: Mutex::new(Instant::now()),
        }
    }

    /// Milliseconds since the previous call (or since creation), resetting the mark.
    pub fn tick(&self) -> u128 {
        let now = Instant::now();
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let delta = now.duration_since(*last).as_millis();
        *last = now;
        delta
    }
}

impl Default for RelativeTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatTime for RelativeTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{:>6}", self.tick())
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` decides whether this crate logs
/// at debug level (command echo, captured output, exit codes).
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "info,tint2_release=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(RelativeTimer::new())
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Style a shell command for the "Executing" log line
pub fn command(cmd: &str) -> StyledObject<&str> {
    style(cmd).yellow()
}

/// Style one line of captured command output
pub fn output(line: &str) -> StyledObject<&str> {
    style(line).magenta()
}
