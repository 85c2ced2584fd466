//! Batch results.

use serde::Serialize;

use std::path::{Path, PathBuf};

/// A job that failed, with the message of the error that stopped it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobFailure {
    pub source_path: PathBuf,
    pub message: String,
}

/// Overall verdict of a batch, for the caller to surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Success,
    PartialFailure,
}

/// Summary of one batch run. Failures keep input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    total: usize,
    succeeded: usize,
    failures: Vec<JobFailure>,
}

impl BatchResult {
    pub(crate) fn new(total: usize, succeeded: usize, failures: Vec<JobFailure>) -> Self {
        Self { total, succeeded, failures }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failures(&self) -> &[JobFailure] {
        &self.failures
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &Path> {
        self.failures.iter().map(|failure| failure.source_path.as_path())
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.failures.is_empty() {
            BatchOutcome::Success
        } else {
            BatchOutcome::PartialFailure
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome() == BatchOutcome::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_follows_failures() {
        let ok = BatchResult::new(2, 2, Vec::new());
        assert!(ok.is_success());

        let partial = BatchResult::new(
            2,
            1,
            vec![JobFailure { source_path: PathBuf::from("b.avi"), message: "boom".into() }],
        );
        assert_eq!(partial.outcome(), BatchOutcome::PartialFailure);
        assert_eq!(partial.failed_sources().collect::<Vec<_>>(), vec![Path::new("b.avi")]);
    }
}
