//! Scheduling facade: one call from activities and dependencies to a full result.

use std::collections::HashMap;

use crate::config::ScheduleConfig;
use crate::conflicts::detect_conflicts;
use crate::critical_path::extract_critical_path;
use crate::interner::ActivityIdx;
use crate::models::{
    Activity, ActivityTiming, Dependency, ScheduleResult, ScheduleWarning, WarningKind,
};
use crate::network::{Network, NetworkError};
use crate::timing::compute_timing;
use crate::{log_changes, log_checks, log_debug};

/// Collect non-fatal data-quality warnings, in input order.
pub fn collect_warnings(activities: &[Activity]) -> Vec<ScheduleWarning> {
    let mut warnings = Vec::new();
    for activity in activities {
        let mut warn = |kind| {
            warnings.push(ScheduleWarning {
                kind,
                activity_id: activity.id.clone(),
            })
        };
        if activity.duration.is_none() {
            warn(WarningKind::MissingDuration);
        }
        if activity.location_start.is_some() != activity.location_end.is_some() {
            warn(WarningKind::IncompleteLocation);
        }
        if activity.planned_start.is_some() != activity.planned_finish.is_some() {
            warn(WarningKind::IncompletePlannedWindow);
        }
    }
    warnings
}

fn ids_of(network: &Network, indices: &[ActivityIdx]) -> Vec<String> {
    indices.iter().map(|&i| network.id(i).to_string()).collect()
}

/// Compute CPM timing, critical paths and conflicts for one project.
///
/// The inputs are only read; every call with the same inputs produces the
/// same result.
///
/// # Errors
/// Returns a `NetworkError` if an activity id is duplicated, a dependency
/// references an unknown activity, or the dependencies form a cycle. No
/// partial schedule is produced in that case.
pub fn compute_schedule(
    activities: &[Activity],
    dependencies: &[Dependency],
    config: &ScheduleConfig,
) -> Result<ScheduleResult, NetworkError> {
    let verbosity = config.verbosity;

    let warnings = collect_warnings(activities);
    for warning in &warnings {
        log_checks!(verbosity, "[cpm] warning: {}", warning);
    }

    let network = Network::build(activities, dependencies)?;
    log_changes!(
        verbosity,
        "[cpm] network: {} activities, {} dependencies",
        network.len(),
        network.edge_count()
    );

    let passes = compute_timing(&network);
    let extracted = extract_critical_path(&network, &passes, config.max_critical_paths, verbosity);

    let timing: HashMap<String, ActivityTiming> = network
        .indices()
        .zip(extracted.timings)
        .map(|(idx, t)| {
            log_debug!(
                verbosity,
                "[cpm] {}: ES={} EF={} LS={} LF={} TF={} FF={}",
                network.id(idx),
                t.early_start,
                t.early_finish,
                t.late_start,
                t.late_finish,
                t.total_float,
                t.free_float
            );
            (network.id(idx).to_string(), t)
        })
        .collect();

    let critical_activities = ids_of(&network, &extracted.critical_activities);
    let critical_paths: Vec<Vec<String>> = extracted
        .critical_paths
        .iter()
        .map(|path| ids_of(&network, path))
        .collect();

    let conflicts = if config.detect_conflicts {
        detect_conflicts(activities, Some(&timing), config)
    } else {
        Vec::new()
    };
    for conflict in &conflicts {
        log_checks!(
            verbosity,
            "[cpm] conflict: {} / {} days {:?} location {:?} ({})",
            conflict.activity_a,
            conflict.activity_b,
            conflict.time_overlap,
            conflict.location_overlap,
            conflict.severity
        );
    }

    log_changes!(
        verbosity,
        "[cpm] duration {} days, {} critical, {} conflicts",
        passes.project_finish,
        critical_activities.len(),
        conflicts.len()
    );

    Ok(ScheduleResult {
        timing,
        critical_activities,
        critical_paths,
        conflicts,
        project_duration: passes.project_finish,
        warnings,
        critical_paths_truncated: extracted.truncated,
    })
}
