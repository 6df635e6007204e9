//! Mapping between day offsets and calendar dates.
//!
//! The engine works in plain day counts; day 0 is the project start. These
//! helpers place planned dates on that axis and turn computed offsets back
//! into dates. Every day counts (no working-time calendar).

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::ActivityTiming;

/// Days from `anchor` to `date` (negative if `date` is earlier).
pub fn date_to_offset(anchor: NaiveDate, date: NaiveDate) -> i64 {
    (date - anchor).num_days()
}

/// The date `offset` days after `anchor`, or None outside chrono's range.
pub fn offset_to_date(anchor: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = Days::new(offset.unsigned_abs());
    if offset >= 0 {
        anchor.checked_add_days(days)
    } else {
        anchor.checked_sub_days(days)
    }
}

/// Calendar form of an activity's computed timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDates {
    pub early_start: NaiveDate,
    pub early_finish: NaiveDate,
    pub late_start: NaiveDate,
    pub late_finish: NaiveDate,
}

impl ActivityDates {
    pub fn from_timing(project_start: NaiveDate, timing: &ActivityTiming) -> Option<Self> {
        Some(Self {
            early_start: offset_to_date(project_start, timing.early_start)?,
            early_finish: offset_to_date(project_start, timing.early_finish)?,
            late_start: offset_to_date(project_start, timing.late_start)?,
            late_finish: offset_to_date(project_start, timing.late_finish)?,
        })
    }
}
