//! Diagnostic logging setup.
//!
//! The interactive UI owns the terminal, so it only logs when a file is given.
//! One-shot commands log to stderr.

use std::error::Error;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the `EnvFilter` directives.
pub const LOG_ENV_VAR: &str = "MINDEASE_LOG";

const DEFAULT_DIRECTIVES: &str = "warn";

/// Where diagnostic output should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// Discard everything.
    Disabled,
    /// Write to standard error.
    Stderr,
    /// Append to the given file.
    File(&'a Path),
}

impl<'a> LogTarget<'a> {
    /// Pick a target for a command. Interactive sessions never log to stderr.
    pub fn for_command(log_file: Option<&'a Path>, interactive: bool) -> Self {
        match (log_file, interactive) {
            (Some(path), _) => LogTarget::File(path),
            (None, true) => LogTarget::Disabled,
            (None, false) => LogTarget::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global tracing subscriber. Safe to call once per process.
pub fn init_tracing(target: LogTarget<'_>) -> Result<(), Box<dyn Error>> {
    match target {
        LogTarget::Disabled => Ok(()),
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_writer(io::stderr)
                .try_init()
                .map_err(|err| format!("failed to initialize logging: {err}"))?;
            Ok(())
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| format!("failed to initialize logging: {err}"))?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_sessions_without_file_stay_silent() {
        assert_eq!(LogTarget::for_command(None, true), LogTarget::Disabled);
        assert_eq!(LogTarget::for_command(None, false), LogTarget::Stderr);
    }

    #[test]
    fn explicit_file_wins() {
        let path = Path::new("/tmp/mindease.log");
        assert_eq!(
            LogTarget::for_command(Some(path), true),
            LogTarget::File(path)
        );
        assert_eq!(
            LogTarget::for_command(Some(path), false),
            LogTarget::File(path)
        );
    }
}
