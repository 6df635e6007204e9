//! Float calculation and critical path extraction.

use crate::interner::ActivityIdx;
use crate::models::ActivityTiming;
use crate::network::Network;
use crate::timing::{relationship_slack, NetworkTiming};
use crate::{log_changes, log_error};

/// Result of float and critical path extraction, indexed by `ActivityIdx`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CriticalPathResult {
    /// Complete timing (passes + floats) per activity.
    pub timings: Vec<ActivityTiming>,
    /// Zero-float activities in input order.
    pub critical_activities: Vec<ActivityIdx>,
    /// Critical chains, each ordered from first to last activity.
    pub critical_paths: Vec<Vec<ActivityIdx>>,
    /// True if enumeration stopped at the path limit.
    pub truncated: bool,
}

/// Derive total/free float and walk the critical chains.
///
/// Total float is `late_start - early_start`. Free float is the smallest
/// relationship slack over the outgoing edges (capped at total float);
/// activities without successors get the project's remaining float instead.
///
/// A chain follows driving edges (zero relationship slack) between critical
/// activities. It starts at a critical activity with no critical driving
/// predecessor and ends at one with no critical driving successor. At most
/// `max_paths` chains are returned.
pub fn extract_critical_path(
    network: &Network,
    timing: &NetworkTiming,
    max_paths: usize,
    verbosity: u8,
) -> CriticalPathResult {
    let timings: Vec<ActivityTiming> = network
        .indices()
        .map(|idx| activity_timing(network, timing, idx))
        .collect();

    let critical_activities: Vec<ActivityIdx> = network
        .indices()
        .filter(|&idx| timings[idx as usize].is_critical)
        .collect();

    // Driving edges between critical activities, both directions
    let n = network.len();
    let mut driving_out: Vec<Vec<ActivityIdx>> = vec![Vec::new(); n];
    let mut has_driving_in = vec![false; n];
    for &from in &critical_activities {
        for edge in network.successors(from) {
            let to = edge.to as usize;
            if !timings[to].is_critical {
                continue;
            }
            let slack = relationship_slack(edge, timing.early[from as usize], timing.early[to]);
            // Repeated dependencies between the same pair drive once
            if slack == 0 && !driving_out[from as usize].contains(&edge.to) {
                driving_out[from as usize].push(edge.to);
                has_driving_in[to] = true;
            }
        }
    }

    let starts: Vec<ActivityIdx> = critical_activities
        .iter()
        .copied()
        .filter(|&idx| !has_driving_in[idx as usize])
        .collect();
    let (critical_paths, truncated) = enumerate_chains(&driving_out, &starts, max_paths);

    if truncated {
        log_changes!(
            verbosity,
            "[cpm] critical path enumeration stopped at {} chains",
            max_paths
        );
    }

    CriticalPathResult {
        timings,
        critical_activities,
        critical_paths,
        truncated,
    }
}

fn activity_timing(
    network: &Network,
    timing: &NetworkTiming,
    idx: ActivityIdx,
) -> ActivityTiming {
    let i = idx as usize;
    let early = timing.early[i];
    let late = timing.late[i];
    let total_float = late.start - early.start;

    if total_float < 0 {
        log_error!(
            "[cpm] negative total float {} on activity {} (ES={}, LS={})",
            total_float,
            network.id(idx),
            early.start,
            late.start
        );
    }
    debug_assert!(
        total_float >= 0,
        "negative total float on activity {}",
        network.id(idx)
    );

    let free_float = if network.is_terminal(idx) {
        timing.project_finish - early.finish
    } else {
        network
            .successors(idx)
            .map(|edge| relationship_slack(edge, early, timing.early[edge.to as usize]))
            .min()
            .unwrap_or(0)
            .min(total_float)
    };

    ActivityTiming {
        duration: network.duration(idx),
        early_start: early.start,
        early_finish: early.finish,
        late_start: late.start,
        late_finish: late.finish,
        total_float,
        free_float,
        is_critical: total_float == 0,
    }
}

/// Depth-first enumeration of start-to-end chains with an explicit stack.
fn enumerate_chains(
    driving_out: &[Vec<ActivityIdx>],
    starts: &[ActivityIdx],
    max_paths: usize,
) -> (Vec<Vec<ActivityIdx>>, bool) {
    let mut paths: Vec<Vec<ActivityIdx>> = Vec::new();

    for &start in starts {
        let mut path = vec![start];
        // Next successor position to explore for each element of `path`
        let mut cursor: Vec<usize> = vec![0];

        while let Some(pos) = cursor.last_mut() {
            let node = path[path.len() - 1] as usize;
            let successors = &driving_out[node];

            if successors.is_empty() {
                if paths.len() == max_paths {
                    return (paths, true);
                }
                paths.push(path.clone());
                cursor.pop();
                path.pop();
            } else if let Some(&next) = successors.get(*pos) {
                *pos += 1;
                path.push(next);
                cursor.push(0);
            } else {
                cursor.pop();
                path.pop();
            }
        }
    }

    (paths, false)
}
