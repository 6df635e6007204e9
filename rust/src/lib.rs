//! Critical Path Method scheduling engine for construction activity networks.
//!
//! Given activities and their precedence relationships (FS/SS/FF/SF with
//! lag or lead), the engine computes early/late start and finish, total and
//! free float, the critical chains, and pairs of activities that occupy the
//! same stretch of site at the same time.
//!
//! ```
//! use cpm_engine::{compute_schedule, Activity, Dependency, ScheduleConfig};
//!
//! let activities = vec![
//!     Activity::new("A", "Excavate", 3),
//!     Activity::new("B", "Pour footings", 5),
//!     Activity::new("C", "Backfill", 2),
//! ];
//! let dependencies = vec![Dependency::new("A", "B"), Dependency::new("B", "C")];
//!
//! let result = compute_schedule(&activities, &dependencies, &ScheduleConfig::default()).unwrap();
//! assert_eq!(result.project_duration, 10);
//! assert_eq!(result.critical_paths, vec![vec!["A", "B", "C"]]);
//! ```
//!
//! Python bindings are available behind the `python` feature.

// Allow clippy warning triggered by PyO3 macro expansion
#![cfg_attr(feature = "python", allow(clippy::useless_conversion))]

pub mod calendar;
mod config;
pub mod conflicts;
pub mod critical_path;
mod interner;
pub mod logging;
mod models;
pub mod network;
#[cfg(feature = "python")]
mod python;
mod schedule;
pub mod timing;

pub use calendar::ActivityDates;
pub use config::ScheduleConfig;
pub use conflicts::detect_conflicts;
pub use critical_path::{extract_critical_path, CriticalPathResult};
pub use interner::ActivityIdx;
pub use models::{
    Activity, ActivityTiming, ConflictRecord, ConflictSeverity, Dependency, DependencyType,
    ScheduleResult, ScheduleWarning, WarningKind,
};
pub use network::{Network, NetworkError};
pub use schedule::{collect_warnings, compute_schedule};
pub use timing::{compute_timing, NetworkTiming};
