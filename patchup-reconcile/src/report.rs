//! Per-target outcomes and the run report.

use std::path::PathBuf;

use serde::Serialize;

use patchup_core::types::TargetPath;

use crate::planner::StaleReason;

/// What the executor did (or, in a dry run, would do) for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Apply,
    ResetAndDrop,
    UpToDate,
}

/// Outcome of one target's plan item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetOutcome {
    pub target: TargetPath,
    /// Patch file involved, when one still exists on disk.
    pub patch: Option<PathBuf>,
    pub action: Action,
    pub reason: Option<StaleReason>,
    /// `None` means the action completed (or was skipped in a dry run).
    pub error: Option<String>,
}

impl TargetOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// All outcomes for one submodule scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeReport {
    pub scope: String,
    pub outcomes: Vec<TargetOutcome>,
}

/// The whole run, across every configured scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub scopes: Vec<ScopeReport>,
}

/// Aggregate counts for summary lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunTotals {
    pub applied: usize,
    pub dropped: usize,
    pub up_to_date: usize,
    pub failed: usize,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.totals().failed > 0
    }

    pub fn totals(&self) -> RunTotals {
        let mut totals = RunTotals::default();
        for outcome in self.scopes.iter().flat_map(|s| &s.outcomes) {
            if !outcome.is_success() {
                totals.failed += 1;
                continue;
            }
            match outcome.action {
                Action::Apply => totals.applied += 1,
                Action::ResetAndDrop => totals.dropped += 1,
                Action::UpToDate => totals.up_to_date += 1,
            }
        }
        totals
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(action: Action, error: Option<&str>) -> TargetOutcome {
        TargetOutcome {
            target: TargetPath::from("a.cc"),
            patch: None,
            action,
            reason: None,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn totals_bucket_by_action_and_failure() {
        let report = RunReport {
            dry_run: false,
            scopes: vec![ScopeReport {
                scope: "s".to_string(),
                outcomes: vec![
                    outcome(Action::Apply, None),
                    outcome(Action::ResetAndDrop, None),
                    outcome(Action::UpToDate, None),
                    outcome(Action::Apply, Some("boom")),
                ],
            }],
        };

        let totals = report.totals();
        assert_eq!(totals.applied, 1);
        assert_eq!(totals.dropped, 1);
        assert_eq!(totals.up_to_date, 1);
        assert_eq!(totals.failed, 1);
        assert!(report.has_failures());
    }

    #[test]
    fn empty_report_has_no_failures() {
        let report = RunReport {
            dry_run: true,
            scopes: vec![],
        };
        assert!(!report.has_failures());
        assert_eq!(report.totals(), RunTotals::default());
    }
}
