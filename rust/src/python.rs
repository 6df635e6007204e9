//! Python bindings for the scheduling engine.
//!
//! Thin wrapper classes convert to and from the engine's Rust types; all
//! computation happens in `compute_schedule`.

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::calendar::ActivityDates;
use crate::models::{
    Activity, ActivityTiming, ConflictRecord, Dependency, DependencyType, ScheduleResult,
    ScheduleWarning, WarningKind,
};
use crate::{compute_schedule, ScheduleConfig};

/// A unit of work (PyO3 wrapper).
#[pyclass(name = "Activity")]
#[derive(Clone, Debug)]
pub struct PyActivity {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub duration: Option<u32>,
    #[pyo3(get, set)]
    pub planned_start: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub planned_finish: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub location_start: Option<f64>,
    #[pyo3(get, set)]
    pub location_end: Option<f64>,
    #[pyo3(get, set)]
    pub resource_crew_size: Option<u32>,
}

#[pymethods]
impl PyActivity {
    #[new]
    #[pyo3(signature = (
        id,
        name=String::new(),
        duration=None,
        planned_start=None,
        planned_finish=None,
        location_start=None,
        location_end=None,
        resource_crew_size=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: String,
        name: String,
        duration: Option<u32>,
        planned_start: Option<NaiveDate>,
        planned_finish: Option<NaiveDate>,
        location_start: Option<f64>,
        location_end: Option<f64>,
        resource_crew_size: Option<u32>,
    ) -> Self {
        Self {
            id,
            name,
            duration,
            planned_start,
            planned_finish,
            location_start,
            location_end,
            resource_crew_size,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Activity(id={:?}, duration={:?}, location={:?}..{:?})",
            self.id, self.duration, self.location_start, self.location_end
        )
    }
}

impl From<PyActivity> for Activity {
    fn from(a: PyActivity) -> Self {
        Self {
            id: a.id,
            name: a.name,
            duration: a.duration,
            planned_start: a.planned_start,
            planned_finish: a.planned_finish,
            location_start: a.location_start,
            location_end: a.location_end,
            resource_crew_size: a.resource_crew_size,
        }
    }
}

/// A precedence constraint (PyO3 wrapper). `type` is "FS", "SS", "FF" or "SF".
#[pyclass(name = "Dependency")]
#[derive(Clone, Debug)]
pub struct PyDependency {
    #[pyo3(get, set)]
    pub predecessor_id: String,
    #[pyo3(get, set)]
    pub successor_id: String,
    #[pyo3(get, set, name = "type")]
    pub dependency_type: String,
    #[pyo3(get, set)]
    pub lag: i64,
}

#[pymethods]
impl PyDependency {
    #[new]
    #[pyo3(signature = (predecessor_id, successor_id, dependency_type="FS".to_string(), lag=0))]
    fn new(predecessor_id: String, successor_id: String, dependency_type: String, lag: i64) -> Self {
        Self {
            predecessor_id,
            successor_id,
            dependency_type,
            lag,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Dependency({:?} -> {:?}, type={}, lag={})",
            self.predecessor_id, self.successor_id, self.dependency_type, self.lag
        )
    }
}

impl TryFrom<PyDependency> for Dependency {
    type Error = PyErr;

    fn try_from(d: PyDependency) -> PyResult<Self> {
        let dependency_type = DependencyType::from_code(&d.dependency_type).ok_or_else(|| {
            PyValueError::new_err(format!("Unknown dependency type: {}", d.dependency_type))
        })?;
        Ok(Self {
            predecessor_id: d.predecessor_id,
            successor_id: d.successor_id,
            dependency_type,
            lag: d.lag,
        })
    }
}

/// Scheduling options (PyO3 wrapper).
#[pyclass(name = "ScheduleConfig")]
#[derive(Clone, Debug)]
pub struct PyScheduleConfig {
    #[pyo3(get, set)]
    pub verbosity: u8,
    #[pyo3(get, set)]
    pub project_start: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub max_critical_paths: usize,
    #[pyo3(get, set)]
    pub detect_conflicts: bool,
    #[pyo3(get, set)]
    pub severity_medium_crew: u32,
    #[pyo3(get, set)]
    pub severity_high_crew: u32,
}

#[pymethods]
impl PyScheduleConfig {
    #[new]
    #[pyo3(signature = (
        verbosity=None,
        project_start=None,
        max_critical_paths=None,
        detect_conflicts=None,
        severity_medium_crew=None,
        severity_high_crew=None
    ))]
    fn new(
        verbosity: Option<u8>,
        project_start: Option<NaiveDate>,
        max_critical_paths: Option<usize>,
        detect_conflicts: Option<bool>,
        severity_medium_crew: Option<u32>,
        severity_high_crew: Option<u32>,
    ) -> Self {
        let defaults = ScheduleConfig::default();
        Self {
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            project_start: project_start.or(defaults.project_start),
            max_critical_paths: max_critical_paths.unwrap_or(defaults.max_critical_paths),
            detect_conflicts: detect_conflicts.unwrap_or(defaults.detect_conflicts),
            severity_medium_crew: severity_medium_crew.unwrap_or(defaults.severity_medium_crew),
            severity_high_crew: severity_high_crew.unwrap_or(defaults.severity_high_crew),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleConfig(verbosity={}, project_start={:?}, max_critical_paths={})",
            self.verbosity, self.project_start, self.max_critical_paths
        )
    }
}

impl From<PyScheduleConfig> for ScheduleConfig {
    fn from(c: PyScheduleConfig) -> Self {
        Self {
            verbosity: c.verbosity,
            project_start: c.project_start,
            max_critical_paths: c.max_critical_paths,
            detect_conflicts: c.detect_conflicts,
            severity_medium_crew: c.severity_medium_crew,
            severity_high_crew: c.severity_high_crew,
        }
    }
}

/// Computed timing for one activity.
#[pyclass(name = "ActivityTiming")]
#[derive(Clone, Debug)]
pub struct PyActivityTiming {
    #[pyo3(get)]
    pub duration: i64,
    #[pyo3(get)]
    pub early_start: i64,
    #[pyo3(get)]
    pub early_finish: i64,
    #[pyo3(get)]
    pub late_start: i64,
    #[pyo3(get)]
    pub late_finish: i64,
    #[pyo3(get)]
    pub total_float: i64,
    #[pyo3(get)]
    pub free_float: i64,
    #[pyo3(get)]
    pub is_critical: bool,
}

#[pymethods]
impl PyActivityTiming {
    fn __repr__(&self) -> String {
        format!(
            "ActivityTiming(ES={}, EF={}, LS={}, LF={}, TF={}, critical={})",
            self.early_start,
            self.early_finish,
            self.late_start,
            self.late_finish,
            self.total_float,
            self.is_critical
        )
    }
}

impl From<&ActivityTiming> for PyActivityTiming {
    fn from(t: &ActivityTiming) -> Self {
        Self {
            duration: t.duration,
            early_start: t.early_start,
            early_finish: t.early_finish,
            late_start: t.late_start,
            late_finish: t.late_finish,
            total_float: t.total_float,
            free_float: t.free_float,
            is_critical: t.is_critical,
        }
    }
}

/// Two activities sharing time and location.
#[pyclass(name = "ConflictRecord")]
#[derive(Clone, Debug)]
pub struct PyConflictRecord {
    #[pyo3(get)]
    pub activity_a: String,
    #[pyo3(get)]
    pub activity_b: String,
    #[pyo3(get)]
    pub time_overlap: (i64, i64),
    #[pyo3(get)]
    pub location_overlap: (f64, f64),
    #[pyo3(get)]
    pub combined_crew_size: Option<u32>,
    /// "low", "medium" or "high".
    #[pyo3(get)]
    pub severity: String,
}

#[pymethods]
impl PyConflictRecord {
    fn __repr__(&self) -> String {
        format!(
            "ConflictRecord({:?} / {:?}, days={:?}, location={:?}, severity={})",
            self.activity_a, self.activity_b, self.time_overlap, self.location_overlap, self.severity
        )
    }
}

impl From<&ConflictRecord> for PyConflictRecord {
    fn from(c: &ConflictRecord) -> Self {
        Self {
            activity_a: c.activity_a.clone(),
            activity_b: c.activity_b.clone(),
            time_overlap: c.time_overlap,
            location_overlap: c.location_overlap,
            combined_crew_size: c.combined_crew_size,
            severity: c.severity.to_string(),
        }
    }
}

/// Non-fatal data-quality warning.
#[pyclass(name = "ScheduleWarning")]
#[derive(Clone, Debug)]
pub struct PyScheduleWarning {
    /// "missing_duration", "incomplete_location" or "incomplete_planned_window".
    #[pyo3(get)]
    pub kind: String,
    #[pyo3(get)]
    pub activity_id: String,
    #[pyo3(get)]
    pub message: String,
}

impl From<&ScheduleWarning> for PyScheduleWarning {
    fn from(w: &ScheduleWarning) -> Self {
        let kind = match w.kind {
            WarningKind::MissingDuration => "missing_duration",
            WarningKind::IncompleteLocation => "incomplete_location",
            WarningKind::IncompletePlannedWindow => "incomplete_planned_window",
        };
        Self {
            kind: kind.to_string(),
            activity_id: w.activity_id.clone(),
            message: w.to_string(),
        }
    }
}

/// Result of `compute_schedule`.
#[pyclass(name = "ScheduleResult")]
#[derive(Clone, Debug)]
pub struct PyScheduleResult {
    inner: ScheduleResult,
}

#[pymethods]
impl PyScheduleResult {
    #[getter]
    fn timing(&self) -> HashMap<String, PyActivityTiming> {
        self.inner
            .timing
            .iter()
            .map(|(id, t)| (id.clone(), PyActivityTiming::from(t)))
            .collect()
    }

    #[getter]
    fn critical_activities(&self) -> Vec<String> {
        self.inner.critical_activities.clone()
    }

    #[getter]
    fn critical_paths(&self) -> Vec<Vec<String>> {
        self.inner.critical_paths.clone()
    }

    #[getter]
    fn conflicts(&self) -> Vec<PyConflictRecord> {
        self.inner.conflicts.iter().map(PyConflictRecord::from).collect()
    }

    #[getter]
    fn project_duration(&self) -> i64 {
        self.inner.project_duration
    }

    #[getter]
    fn warnings(&self) -> Vec<PyScheduleWarning> {
        self.inner.warnings.iter().map(PyScheduleWarning::from).collect()
    }

    #[getter]
    fn critical_paths_truncated(&self) -> bool {
        self.inner.critical_paths_truncated
    }

    /// Early/late dates per activity as (ES, EF, LS, LF), counted from `project_start`.
    fn calendar_dates(
        &self,
        project_start: NaiveDate,
    ) -> HashMap<String, (NaiveDate, NaiveDate, NaiveDate, NaiveDate)> {
        self.inner
            .calendar_dates(project_start)
            .into_iter()
            .map(|(id, d): (String, ActivityDates)| {
                (id, (d.early_start, d.early_finish, d.late_start, d.late_finish))
            })
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleResult(duration={}, activities={}, critical={}, conflicts={})",
            self.inner.project_duration,
            self.inner.timing.len(),
            self.inner.critical_activities.len(),
            self.inner.conflicts.len()
        )
    }
}

/// Compute CPM timing, critical paths and conflicts.
///
/// # Raises
/// * ValueError on an unknown dependency type, out-of-range lag, duplicate activity id,
///   dangling dependency, or circular dependency
#[pyfunction]
#[pyo3(name = "compute_schedule", signature = (activities, dependencies, config=None))]
fn py_compute_schedule(
    activities: Vec<PyActivity>,
    dependencies: Vec<PyDependency>,
    config: Option<PyScheduleConfig>,
) -> PyResult<PyScheduleResult> {
    let activities: Vec<Activity> = activities.into_iter().map(Activity::from).collect();
    let dependencies = dependencies
        .into_iter()
        .map(Dependency::try_from)
        .collect::<PyResult<Vec<Dependency>>>()?;
    let config = config.map(ScheduleConfig::from).unwrap_or_default();

    match compute_schedule(&activities, &dependencies, &config) {
        Ok(inner) => Ok(PyScheduleResult { inner }),
        Err(e) => Err(PyValueError::new_err(e.to_string())),
    }
}

/// The cpm_engine Python module.
#[pymodule]
fn cpm_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Input types
    m.add_class::<PyActivity>()?;
    m.add_class::<PyDependency>()?;
    m.add_class::<PyScheduleConfig>()?;

    // Result types
    m.add_class::<PyActivityTiming>()?;
    m.add_class::<PyConflictRecord>()?;
    m.add_class::<PyScheduleWarning>()?;
    m.add_class::<PyScheduleResult>()?;

    m.add_function(wrap_pyfunction!(py_compute_schedule, m)?)?;

    Ok(())
}
