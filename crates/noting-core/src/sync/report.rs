//! Per-pass reconciliation results

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::models::NoteId;
use crate::remote::RemoteError;

/// One of the best-effort reconciliation passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    PullRemote,
    PushPending,
    PushPendingDeletions,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PullRemote => "pull remote notes",
            Self::PushPending => "push pending notes",
            Self::PushPendingDeletions => "push pending deletions",
        };
        f.write_str(name)
    }
}

/// Error that stopped a whole pass, as opposed to a single item
#[derive(Debug, Error)]
pub enum PassError {
    #[error(transparent)]
    Local(#[from] crate::Error),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// A note the pass could not reconcile; it stays pending for the next pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub id: NoteId,
    pub message: String,
}

/// What a pass attempted and how each item ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub pass: Pass,
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<ItemFailure>,
}

impl PassReport {
    pub const fn new(pass: Pass) -> Self {
        Self {
            pass,
            attempted: 0,
            succeeded: 0,
            failures: Vec::new(),
        }
    }

    pub(crate) fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    pub(crate) fn record_failure(&mut self, id: NoteId, error: &RemoteError) {
        self.attempted += 1;
        self.failures.push(ItemFailure {
            id,
            message: error.to_string(),
        });
    }
}

/// A pass that could not obtain its work list; later passes still ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassFailure {
    pub pass: Pass,
    pub message: String,
}

impl fmt::Display for PassFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to {}: {}", self.pass, self.message)
    }
}

/// Result of an explicit full sync.
///
/// `passes` holds one report per completed pass in run order, `failed_passes`
/// the passes that errored out as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub passes: Vec<PassReport>,
    pub failed_passes: Vec<PassFailure>,
}

impl SyncReport {
    pub fn pass(&self, pass: Pass) -> Option<&PassReport> {
        self.passes.iter().find(|report| report.pass == pass)
    }

    /// Items left pending across all passes
    pub fn pending_failures(&self) -> usize {
        self.passes.iter().map(|report| report.failures.len()).sum()
    }

    pub(crate) fn record(
        &mut self,
        pass: Pass,
        result: std::result::Result<PassReport, PassError>,
    ) {
        match result {
            Ok(report) => self.passes.push(report),
            Err(error) => self.failed_passes.push(PassFailure {
                pass,
                message: error.to_string(),
            }),
        }
    }

    /// Pass-level failures joined into one status message
    pub fn failure_message(&self) -> Option<String> {
        if self.failed_passes.is_empty() {
            return None;
        }
        Some(
            self.failed_passes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
