//! Errors that abort a run.
//!
//! These mean the test environment is broken (bad arguments, unreadable or
//! corrupt fixtures). CPU mismatches are not errors; they are reported as
//! [`Mismatch`](crate::compare::Mismatch) values.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed fixture {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("malformed fixture {} at byte {offset}: {reason}", path.display())]
    Binary {
        path: PathBuf,
        offset: usize,
        reason: String,
    },
    #[error("no fixtures found under {}", path.display())]
    NoFixtures { path: PathBuf },
    #[error("invalid fixture pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("failed to write diagnostics: {0}")]
    Output(#[from] std::io::Error),
}
