//! Configuration for scheduling runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::ConflictSeverity;

/// Options for one `compute_schedule` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
    /// Calendar date of day 0. Planned dates are measured from here; when
    /// unset, the earliest planned start among the activities is used.
    pub project_start: Option<NaiveDate>,
    /// Upper bound on enumerated critical chains.
    pub max_critical_paths: usize,
    /// Whether to run conflict detection at all.
    pub detect_conflicts: bool,
    /// Combined crew size at which a conflict is graded medium.
    pub severity_medium_crew: u32,
    /// Combined crew size at which a conflict is graded high.
    pub severity_high_crew: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            project_start: None,
            max_critical_paths: 64,
            detect_conflicts: true,
            severity_medium_crew: 10,
            severity_high_crew: 20,
        }
    }
}

impl ScheduleConfig {
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_project_start(mut self, project_start: NaiveDate) -> Self {
        self.project_start = Some(project_start);
        self
    }

    pub fn with_max_critical_paths(mut self, max_critical_paths: usize) -> Self {
        self.max_critical_paths = max_critical_paths;
        self
    }

    pub fn with_conflict_detection(mut self, enabled: bool) -> Self {
        self.detect_conflicts = enabled;
        self
    }

    /// Grade a conflict by the crews working it. Unknown crews grade low.
    pub fn severity_for(&self, combined_crew_size: Option<u32>) -> ConflictSeverity {
        match combined_crew_size {
            Some(crew) if crew >= self.severity_high_crew => ConflictSeverity::High,
            Some(crew) if crew >= self.severity_medium_crew => ConflictSeverity::Medium,
            _ => ConflictSeverity::Low,
        }
    }
}
