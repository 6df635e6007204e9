//! Forward and backward CPM passes.
//!
//! Both passes walk the network's topological order once (forward) or in
//! reverse (backward), so each activity is computed exactly once and after
//! every activity it depends on. All values are whole-day offsets from
//! project start (day 0).

use crate::models::DependencyType;
use crate::network::{Edge, Network};

/// A start/finish pair in day offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Window {
    pub start: i64,
    pub finish: i64,
}

impl Window {
    #[inline]
    fn from_start(start: i64, duration: i64) -> Self {
        Self {
            start,
            finish: start + duration,
        }
    }
}

/// Raw output of the two passes, indexed by `ActivityIdx`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkTiming {
    pub early: Vec<Window>,
    pub late: Vec<Window>,
    /// max(early finish) over all activities.
    pub project_finish: i64,
}

/// Slack of a single relationship, given both endpoints' windows.
///
/// Zero means the edge is driving: the successor sits exactly where this
/// edge pushes it. Never negative for windows produced by the forward pass.
pub fn relationship_slack(edge: &Edge, pred: Window, succ: Window) -> i64 {
    match edge.kind {
        DependencyType::FinishToStart => succ.start - edge.lag - pred.finish,
        DependencyType::StartToStart => succ.start - edge.lag - pred.start,
        DependencyType::FinishToFinish => succ.finish - edge.lag - pred.finish,
        DependencyType::StartToFinish => succ.finish - edge.lag - pred.start,
    }
}

/// Forward pass: earliest start/finish for every activity.
///
/// FS and SS edges bound the early start, FF and SF edges bound the early
/// finish. Activities are not split, so a binding finish bound pushes the
/// start to `finish - duration`. Nothing starts before day 0.
pub fn forward_pass(network: &Network) -> Vec<Window> {
    let mut early = vec![Window::default(); network.len()];

    for &idx in network.topo_order() {
        let duration = network.duration(idx);
        let mut start_bound = 0;
        let mut finish_bound = i64::MIN;

        for edge in network.predecessors(idx) {
            let pred = early[edge.from as usize];
            match edge.kind {
                DependencyType::FinishToStart => start_bound = start_bound.max(pred.finish + edge.lag),
                DependencyType::StartToStart => start_bound = start_bound.max(pred.start + edge.lag),
                DependencyType::FinishToFinish => finish_bound = finish_bound.max(pred.finish + edge.lag),
                DependencyType::StartToFinish => finish_bound = finish_bound.max(pred.start + edge.lag),
            }
        }

        let early_start = if finish_bound == i64::MIN {
            start_bound
        } else {
            start_bound.max(finish_bound - duration)
        };
        early[idx as usize] = Window::from_start(early_start, duration);
    }

    early
}

/// Backward pass: latest start/finish for every activity.
///
/// Mirrors the forward pass: FS and FF edges bound the late finish, SS and
/// SF edges bound the late start, and every activity must finish by
/// `project_finish`.
pub fn backward_pass(network: &Network, project_finish: i64) -> Vec<Window> {
    let mut late = vec![Window::default(); network.len()];

    for &idx in network.topo_order().iter().rev() {
        let duration = network.duration(idx);
        let mut finish_bound = project_finish;
        let mut start_bound = project_finish;

        for edge in network.successors(idx) {
            let succ = late[edge.to as usize];
            match edge.kind {
                DependencyType::FinishToStart => finish_bound = finish_bound.min(succ.start - edge.lag),
                DependencyType::StartToStart => start_bound = start_bound.min(succ.start - edge.lag),
                DependencyType::FinishToFinish => finish_bound = finish_bound.min(succ.finish - edge.lag),
                DependencyType::StartToFinish => start_bound = start_bound.min(succ.finish - edge.lag),
            }
        }

        let late_start = (finish_bound - duration).min(start_bound);
        late[idx as usize] = Window::from_start(late_start, duration);
    }

    late
}

/// Run both passes over a validated network.
pub fn compute_timing(network: &Network) -> NetworkTiming {
    let early = forward_pass(network);
    let project_finish = early.iter().map(|w| w.finish).max().unwrap_or(0);
    let late = backward_pass(network, project_finish);

    NetworkTiming {
        early,
        late,
        project_finish,
    }
}
