//! Core data types for the scheduling engine.
//!
//! Inputs (`Activity`, `Dependency`) are owned by the caller and only ever read.
//! Outputs (`ActivityTiming`, `ConflictRecord`, `ScheduleResult`) are freshly
//! allocated per run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::calendar::ActivityDates;

// Note: We use std HashMap in results so they serialize and cross the Python boundary as-is

/// Precedence relationship type between two activities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    #[default]
    #[serde(rename = "FS")]
    FinishToStart,
    #[serde(rename = "SS")]
    StartToStart,
    #[serde(rename = "FF")]
    FinishToFinish,
    #[serde(rename = "SF")]
    StartToFinish,
}

impl DependencyType {
    /// Two-letter code used in exports and by the Python bindings.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FinishToStart => "FS",
            Self::StartToStart => "SS",
            Self::FinishToFinish => "FF",
            Self::StartToFinish => "SF",
        }
    }

    /// Parse a two-letter code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "FS" => Some(Self::FinishToStart),
            "SS" => Some(Self::StartToStart),
            "FF" => Some(Self::FinishToFinish),
            "SF" => Some(Self::StartToFinish),
            _ => None,
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A unit of construction work.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    /// Display label, never used in computation.
    #[serde(default)]
    pub name: String,
    /// Duration in days. Missing durations are timed as milestones.
    pub duration: Option<u32>,
    pub planned_start: Option<NaiveDate>,
    pub planned_finish: Option<NaiveDate>,
    /// Position along the linear extent (e.g. a station range).
    pub location_start: Option<f64>,
    pub location_end: Option<f64>,
    pub resource_crew_size: Option<u32>,
}

impl Activity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration: Some(duration),
            planned_start: None,
            planned_finish: None,
            location_start: None,
            location_end: None,
            resource_crew_size: None,
        }
    }

    pub fn with_planned_window(mut self, start: NaiveDate, finish: NaiveDate) -> Self {
        self.planned_start = Some(start);
        self.planned_finish = Some(finish);
        self
    }

    pub fn with_location(mut self, start: f64, end: f64) -> Self {
        self.location_start = Some(start);
        self.location_end = Some(end);
        self
    }

    pub fn with_crew_size(mut self, crew: u32) -> Self {
        self.resource_crew_size = Some(crew);
        self
    }

    /// Duration used by the timing passes (missing = 0).
    #[inline]
    pub fn effective_duration(&self) -> i64 {
        i64::from(self.duration.unwrap_or(0))
    }

    /// Location range with `start <= end`, if both endpoints are present.
    pub fn location_window(&self) -> Option<(f64, f64)> {
        match (self.location_start, self.location_end) {
            (Some(a), Some(b)) if a <= b => Some((a, b)),
            (Some(a), Some(b)) => Some((b, a)),
            _ => None,
        }
    }

    /// Planned calendar window with `start <= finish`, if both dates are present.
    pub fn planned_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.planned_start, self.planned_finish) {
            (Some(a), Some(b)) => Some((a.min(b), a.max(b))),
            _ => None,
        }
    }
}

/// A precedence constraint between two activities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub predecessor_id: String,
    pub successor_id: String,
    #[serde(rename = "type", default)]
    pub dependency_type: DependencyType,
    /// Offset in days: positive = lag, negative = lead.
    #[serde(default)]
    pub lag: i64,
}

impl Dependency {
    /// Finish-to-start dependency with no lag.
    pub fn new(predecessor_id: impl Into<String>, successor_id: impl Into<String>) -> Self {
        Self {
            predecessor_id: predecessor_id.into(),
            successor_id: successor_id.into(),
            dependency_type: DependencyType::default(),
            lag: 0,
        }
    }

    pub fn with_type(mut self, dependency_type: DependencyType) -> Self {
        self.dependency_type = dependency_type;
        self
    }

    pub fn with_lag(mut self, lag: i64) -> Self {
        self.lag = lag;
        self
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -[{} {:+}]-> {}",
            self.predecessor_id, self.dependency_type, self.lag, self.successor_id
        )
    }
}

/// Computed CPM timing for one activity, in day offsets from project start.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTiming {
    /// Effective duration used by the passes.
    pub duration: i64,
    pub early_start: i64,
    pub early_finish: i64,
    pub late_start: i64,
    pub late_finish: i64,
    /// Slack before the project finish moves (late_start - early_start).
    pub total_float: i64,
    /// Slack before any immediate successor moves.
    pub free_float: i64,
    pub is_critical: bool,
}

/// How disruptive a spatial/time clash is, graded by combined crew size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
}

impl fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(label)
    }
}

/// Two activities working the same stretch at the same time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRecord {
    /// The activity that comes first in input order.
    pub activity_a: String,
    pub activity_b: String,
    /// Shared time extent in day offsets, half-open.
    pub time_overlap: (i64, i64),
    /// Shared location extent, half-open.
    pub location_overlap: (f64, f64),
    /// Sum of the known crew sizes (None if neither activity has one).
    pub combined_crew_size: Option<u32>,
    pub severity: ConflictSeverity,
}

/// Non-fatal data-quality problems found in the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    /// No duration given; timed as a milestone.
    MissingDuration,
    /// Only one location endpoint; excluded from conflict detection.
    IncompleteLocation,
    /// Only one planned date; computed times are used for conflict detection.
    IncompletePlannedWindow,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWarning {
    pub kind: WarningKind,
    pub activity_id: String,
}

impl fmt::Display for ScheduleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::MissingDuration => {
                write!(f, "activity {} has no duration, treated as 0", self.activity_id)
            }
            WarningKind::IncompleteLocation => write!(
                f,
                "activity {} has only one location endpoint, skipped for conflicts",
                self.activity_id
            ),
            WarningKind::IncompletePlannedWindow => write!(
                f,
                "activity {} has only one planned date, using computed window",
                self.activity_id
            ),
        }
    }
}

/// Full output of one scheduling run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub timing: HashMap<String, ActivityTiming>,
    /// Zero-float activities, in input order.
    pub critical_activities: Vec<String>,
    /// Every critical chain, each ordered from first to last activity.
    pub critical_paths: Vec<Vec<String>>,
    pub conflicts: Vec<ConflictRecord>,
    /// max(early_finish) over all activities.
    pub project_duration: i64,
    pub warnings: Vec<ScheduleWarning>,
    /// Set when more critical chains exist than the configured limit.
    pub critical_paths_truncated: bool,
}

impl ScheduleResult {
    pub fn is_critical(&self, activity_id: &str) -> bool {
        self.timing
            .get(activity_id)
            .is_some_and(|timing| timing.is_critical)
    }

    /// Map every activity's offsets onto calendar days counted from `project_start`.
    ///
    /// Activities whose dates fall outside chrono's range are left out.
    pub fn calendar_dates(&self, project_start: NaiveDate) -> HashMap<String, ActivityDates> {
        self.timing
            .iter()
            .filter_map(|(id, timing)| {
                ActivityDates::from_timing(project_start, timing).map(|dates| (id.clone(), dates))
            })
            .collect()
    }
}
