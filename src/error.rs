use std::io;
use std::time::Duration;
use thiserror::Error;

/// Everything that turns a check run into UNKNOWN.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("`{command}` exited with {}: {}", fmt_code(*code), first_line(output))]
    CommandFailed {
        command: String,
        code:    Option<i32>,
        output:  String,
    },

    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("could not start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source:  io::Error,
    },

    #[error("parse failure: {0}")]
    ParseFailure(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

fn fmt_code(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None    => "a signal".to_string(),
    }
}

fn first_line(output: &str) -> &str {
    output.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("(no output)")
}
