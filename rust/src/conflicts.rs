//! Spatial/time conflict detection between activities.
//!
//! Two activities conflict when their time windows and their location
//! windows both overlap. Intervals are half-open, so windows that only touch
//! (or have zero width) never conflict.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::calendar::date_to_offset;
use crate::config::ScheduleConfig;
use crate::log_checks;
use crate::models::{Activity, ActivityTiming, ConflictRecord};

/// Where an activity's time window came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WindowSource {
    Planned,
    Computed,
}

/// An activity that has both a time and a location window.
struct Placed<'a> {
    activity: &'a Activity,
    time: (i64, i64),
    source: WindowSource,
    location: (f64, f64),
}

/// Overlap of two half-open intervals, if non-empty.
fn overlap<T: PartialOrd + Copy>(a: (T, T), b: (T, T)) -> Option<(T, T)> {
    let start = if a.0 > b.0 { a.0 } else { b.0 };
    let end = if a.1 < b.1 { a.1 } else { b.1 };
    (start < end).then_some((start, end))
}

/// Reference date for planned windows: the configured project start, or the
/// earliest planned start in the set.
fn planned_anchor(activities: &[Activity], config: &ScheduleConfig) -> Option<NaiveDate> {
    config.project_start.or_else(|| {
        activities
            .iter()
            .filter_map(|a| a.planned_window())
            .map(|(start, _)| start)
            .min()
    })
}

fn time_window(
    activity: &Activity,
    anchor: Option<NaiveDate>,
    timing: Option<&HashMap<String, ActivityTiming>>,
) -> Option<((i64, i64), WindowSource)> {
    if let (Some((start, finish)), Some(anchor)) = (activity.planned_window(), anchor) {
        let window = (date_to_offset(anchor, start), date_to_offset(anchor, finish));
        return Some((window, WindowSource::Planned));
    }
    timing?
        .get(&activity.id)
        .map(|t| ((t.early_start, t.early_finish), WindowSource::Computed))
}

fn place<'a>(
    activity: &'a Activity,
    anchor: Option<NaiveDate>,
    timing: Option<&HashMap<String, ActivityTiming>>,
) -> Option<Placed<'a>> {
    let (time, source) = time_window(activity, anchor, timing)?;
    Some(Placed {
        activity,
        time,
        source,
        location: activity.location_window()?,
    })
}

/// True when planned and computed windows are compared without a configured
/// project start, so day 0 of the planned windows is only a guess.
fn unanchored_mix(placed: &[Placed], config: &ScheduleConfig) -> bool {
    config.project_start.is_none()
        && placed.iter().any(|p| p.source == WindowSource::Planned)
        && placed.iter().any(|p| p.source == WindowSource::Computed)
}

fn combined_crew_size(a: &Activity, b: &Activity) -> Option<u32> {
    match (a.resource_crew_size, b.resource_crew_size) {
        (None, None) => None,
        (x, y) => Some(x.unwrap_or(0).saturating_add(y.unwrap_or(0))),
    }
}

/// Find every pair of activities overlapping in both time and location.
///
/// Time windows come from planned dates when both are present, otherwise from
/// `timing` (computed early start/finish). Activities lacking either window
/// are skipped. Records are ordered by the first activity's input position,
/// then the second's.
pub fn detect_conflicts(
    activities: &[Activity],
    timing: Option<&HashMap<String, ActivityTiming>>,
    config: &ScheduleConfig,
) -> Vec<ConflictRecord> {
    let anchor = planned_anchor(activities, config);

    let placed: Vec<Placed> = activities
        .iter()
        .filter_map(|activity| place(activity, anchor, timing))
        .collect();

    if unanchored_mix(&placed, config) {
        if let Some(anchor) = anchor {
            log_checks!(
                config.verbosity,
                "[conflicts] no project start set: planned windows counted from {}, computed windows from day 0",
                anchor
            );
        }
    }

    let mut conflicts = Vec::new();
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            let Some(time_overlap) = overlap(a.time, b.time) else {
                continue;
            };
            let Some(location_overlap) = overlap(a.location, b.location) else {
                continue;
            };

            let crew = combined_crew_size(a.activity, b.activity);
            conflicts.push(ConflictRecord {
                activity_a: a.activity.id.clone(),
                activity_b: b.activity.id.clone(),
                time_overlap,
                location_overlap,
                combined_crew_size: crew,
                severity: config.severity_for(crew),
            });
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConflictSeverity;

    fn placed_activity(id: &str, time: (i64, i64), location: (f64, f64)) -> (Activity, ActivityTiming) {
        let activity = Activity::new(id, id, (time.1 - time.0) as u32).with_location(location.0, location.1);
        let timing = ActivityTiming {
            duration: time.1 - time.0,
            early_start: time.0,
            early_finish: time.1,
            late_start: time.0,
            late_finish: time.1,
            ..Default::default()
        };
        (activity, timing)
    }

    fn run(entries: Vec<(Activity, ActivityTiming)>) -> Vec<ConflictRecord> {
        let timing: HashMap<String, ActivityTiming> = entries
            .iter()
            .map(|(a, t)| (a.id.clone(), t.clone()))
            .collect();
        let activities: Vec<Activity> = entries.into_iter().map(|(a, _)| a).collect();
        detect_conflicts(&activities, Some(&timing), &ScheduleConfig::default())
    }

    #[test]
    fn test_overlap_on_both_axes() {
        let conflicts = run(vec![
            placed_activity("x", (0, 10), (0.0, 50.0)),
            placed_activity("y", (5, 15), (40.0, 60.0)),
            placed_activity("z", (0, 10), (60.0, 100.0)),
        ]);

        assert_eq!(conflicts.len(), 1);
        let c = &conflicts[0];
        assert_eq!((c.activity_a.as_str(), c.activity_b.as_str()), ("x", "y"));
        assert_eq!(c.time_overlap, (5, 10));
        assert_eq!(c.location_overlap, (40.0, 50.0));
        assert_eq!(c.combined_crew_size, None);
        assert_eq!(c.severity, ConflictSeverity::Low);
    }

    #[test]
    fn test_touching_windows_do_not_conflict() {
        let conflicts = run(vec![
            placed_activity("a", (0, 5), (0.0, 10.0)),
            placed_activity("b", (5, 9), (0.0, 10.0)),
            placed_activity("c", (0, 5), (10.0, 20.0)),
        ]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_reversed_location_is_normalized() {
        let conflicts = run(vec![
            placed_activity("a", (0, 4), (30.0, 10.0)),
            placed_activity("b", (2, 6), (15.0, 20.0)),
        ]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].location_overlap, (15.0, 20.0));
    }

    #[test]
    fn test_activities_without_location_skipped() {
        let (mut a, ta) = placed_activity("a", (0, 4), (0.0, 10.0));
        a.location_end = None;
        let conflicts = run(vec![(a, ta), placed_activity("b", (0, 4), (0.0, 10.0))]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_planned_dates_take_precedence() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
        // computed windows overlap, planned windows do not
        let (a, ta) = placed_activity("a", (0, 10), (0.0, 10.0));
        let (b, tb) = placed_activity("b", (0, 10), (0.0, 10.0));
        let a = a.with_planned_window(d(1), d(5));
        let b = b.with_planned_window(d(5), d(9));
        assert!(run(vec![(a, ta), (b, tb)]).is_empty());
    }

    #[test]
    fn test_planned_only_without_timing() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
        let activities = vec![
            Activity::new("a", "Paving", 5)
                .with_planned_window(d(1), d(10))
                .with_location(0.0, 100.0),
            Activity::new("b", "Line painting", 2)
                .with_planned_window(d(8), d(12))
                .with_location(90.0, 200.0),
            // no planned window and no timing: skipped
            Activity::new("c", "Signage", 1).with_location(0.0, 200.0),
        ];
        let conflicts = detect_conflicts(&activities, None, &ScheduleConfig::default());

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].time_overlap, (7, 9));
    }

    #[test]
    fn test_project_start_anchor() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
        let activities = vec![
            Activity::new("a", "a", 5)
                .with_planned_window(d(3), d(8))
                .with_location(0.0, 1.0),
            Activity::new("b", "b", 5)
                .with_planned_window(d(6), d(11))
                .with_location(0.0, 1.0),
        ];
        let config = ScheduleConfig::default().with_project_start(d(1));
        let conflicts = detect_conflicts(&activities, None, &config);
        assert_eq!(conflicts[0].time_overlap, (5, 7));
    }

    #[test]
    fn test_severity_from_crews() {
        let (a, ta) = placed_activity("a", (0, 4), (0.0, 10.0));
        let (b, tb) = placed_activity("b", (0, 4), (0.0, 10.0));
        let (c, tc) = placed_activity("c", (0, 4), (0.0, 10.0));
        let conflicts = run(vec![
            (a.with_crew_size(12), ta),
            (b.with_crew_size(9), tb),
            (c, tc),
        ]);

        assert_eq!(conflicts.len(), 3);
        assert_eq!(conflicts[0].combined_crew_size, Some(21));
        assert_eq!(conflicts[0].severity, ConflictSeverity::High);
        assert_eq!(conflicts[1].combined_crew_size, Some(12));
        assert_eq!(conflicts[1].severity, ConflictSeverity::Medium);
        assert_eq!(conflicts[2].severity, ConflictSeverity::Low);
    }

    #[test]
    fn test_unanchored_mix_of_planned_and_computed() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
        let (computed, tc) = placed_activity("computed", (0, 4), (0.0, 10.0));
        let (planned, tp) = placed_activity("planned", (0, 4), (0.0, 10.0));
        let planned = planned.with_planned_window(d(2), d(6));
        let activities = vec![computed, planned];
        let timing: HashMap<String, ActivityTiming> = [tc, tp]
            .into_iter()
            .zip(&activities)
            .map(|(t, a)| (a.id.clone(), t))
            .collect();

        let config = ScheduleConfig::default();
        let anchor = planned_anchor(&activities, &config);
        let placed: Vec<Placed> = activities
            .iter()
            .filter_map(|activity| place(activity, anchor, Some(&timing)))
            .collect();

        assert_eq!(placed[0].source, WindowSource::Computed);
        assert_eq!(placed[1].source, WindowSource::Planned);
        assert!(unanchored_mix(&placed, &config));
        assert!(!unanchored_mix(&placed, &config.clone().with_project_start(d(1))));
        assert!(!unanchored_mix(&placed[..1], &config));
    }
}
