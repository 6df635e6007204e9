//! Activity network construction and structural validation.
//!
//! The network is an arena: activities are addressed by `ActivityIdx`, edges
//! live in one vector and each activity keeps the indices of its incoming and
//! outgoing edges. Building the network validates that every dependency
//! resolves and that the graph is acyclic, and records a topological order
//! for the timing passes.

use thiserror::Error;

use crate::interner::{ActivityIdInterner, ActivityIdx};
use crate::models::{Activity, Dependency, DependencyType};

/// Largest lag or lead magnitude accepted on a dependency, in days.
///
/// Together with `u32` durations this keeps every offset the timing passes
/// compute well inside `i64`.
pub const MAX_LAG_DAYS: i64 = u32::MAX as i64;

/// Structural problems that make a network unschedulable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Duplicate activity id: {0}")]
    DuplicateActivity(String),
    #[error(
        "Dependency {predecessor_id} -> {successor_id} references unknown activity {missing_id}"
    )]
    DanglingReference {
        predecessor_id: String,
        successor_id: String,
        missing_id: String,
    },
    #[error("Circular dependency detected involving activity {0}")]
    Cycle(String),
    #[error("Dependency {predecessor_id} -> {successor_id} has out-of-range lag {lag}")]
    LagOutOfRange {
        predecessor_id: String,
        successor_id: String,
        lag: i64,
    },
}

/// A resolved precedence edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: ActivityIdx,
    pub to: ActivityIdx,
    pub kind: DependencyType,
    pub lag: i64,
}

/// Validated, acyclic activity network over caller-owned activities.
#[derive(Debug)]
pub struct Network<'a> {
    activities: &'a [Activity],
    index: ActivityIdInterner,
    edges: Vec<Edge>,
    incoming: Vec<Vec<usize>>,
    outgoing: Vec<Vec<usize>>,
    topo_order: Vec<ActivityIdx>,
}

impl<'a> Network<'a> {
    /// Build and validate the network.
    ///
    /// # Errors
    /// * `DuplicateActivity` if two activities share an id
    /// * `DanglingReference` if a dependency endpoint is not a known activity
    /// * `Cycle` if the dependencies contain a self-loop or a cycle
    /// * `LagOutOfRange` if a lag or lead exceeds `MAX_LAG_DAYS`
    pub fn build(
        activities: &'a [Activity],
        dependencies: &[Dependency],
    ) -> Result<Self, NetworkError> {
        let n = activities.len();
        let mut index = ActivityIdInterner::with_capacity(n);
        for activity in activities {
            if index.insert_unique(&activity.id).is_none() {
                return Err(NetworkError::DuplicateActivity(activity.id.clone()));
            }
        }

        let mut edges = Vec::with_capacity(dependencies.len());
        let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); n];

        for dep in dependencies {
            let from = resolve_endpoint(&index, dep, &dep.predecessor_id)?;
            let to = resolve_endpoint(&index, dep, &dep.successor_id)?;
            if from == to {
                return Err(NetworkError::Cycle(dep.predecessor_id.clone()));
            }
            if dep.lag.unsigned_abs() > MAX_LAG_DAYS as u64 {
                return Err(NetworkError::LagOutOfRange {
                    predecessor_id: dep.predecessor_id.clone(),
                    successor_id: dep.successor_id.clone(),
                    lag: dep.lag,
                });
            }

            let edge_idx = edges.len();
            edges.push(Edge {
                from,
                to,
                kind: dep.dependency_type,
                lag: dep.lag,
            });
            outgoing[from as usize].push(edge_idx);
            incoming[to as usize].push(edge_idx);
        }

        let topo_order = match topological_order(&edges, &outgoing) {
            Ok(order) => order,
            Err(participant) => {
                let id = index.resolve(participant).unwrap_or_default().to_string();
                return Err(NetworkError::Cycle(id));
            }
        };

        Ok(Self {
            activities,
            index,
            edges,
            incoming,
            outgoing,
            topo_order,
        })
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn activity(&self, idx: ActivityIdx) -> &'a Activity {
        &self.activities[idx as usize]
    }

    #[inline]
    pub fn id(&self, idx: ActivityIdx) -> &'a str {
        &self.activities[idx as usize].id
    }

    #[inline]
    pub fn duration(&self, idx: ActivityIdx) -> i64 {
        self.activities[idx as usize].effective_duration()
    }

    pub fn index_of(&self, id: &str) -> Option<ActivityIdx> {
        self.index.get(id)
    }

    /// Edges ending at `idx`.
    pub fn predecessors(&self, idx: ActivityIdx) -> impl Iterator<Item = &Edge> + '_ {
        self.incoming[idx as usize].iter().map(|&e| &self.edges[e])
    }

    /// Edges starting at `idx`.
    pub fn successors(&self, idx: ActivityIdx) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing[idx as usize].iter().map(|&e| &self.edges[e])
    }

    pub fn is_start(&self, idx: ActivityIdx) -> bool {
        self.incoming[idx as usize].is_empty()
    }

    pub fn is_terminal(&self, idx: ActivityIdx) -> bool {
        self.outgoing[idx as usize].is_empty()
    }

    /// Activities ordered so every predecessor precedes its successors.
    pub fn topo_order(&self) -> &[ActivityIdx] {
        &self.topo_order
    }

    /// All activity indices in input order.
    pub fn indices(&self) -> impl Iterator<Item = ActivityIdx> {
        0..self.activities.len() as ActivityIdx
    }
}

fn resolve_endpoint(
    index: &ActivityIdInterner,
    dep: &Dependency,
    endpoint: &str,
) -> Result<ActivityIdx, NetworkError> {
    index
        .get(endpoint)
        .ok_or_else(|| NetworkError::DanglingReference {
            predecessor_id: dep.predecessor_id.clone(),
            successor_id: dep.successor_id.clone(),
            missing_id: endpoint.to_string(),
        })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Depth-first topological sort with an explicit stack.
///
/// Reaching a node that is still on the stack means a back edge; that node is
/// returned as the cycle participant. Stack depth never exceeds the node count.
fn topological_order(edges: &[Edge], outgoing: &[Vec<usize>]) -> Result<Vec<ActivityIdx>, ActivityIdx> {
    let n = outgoing.len();
    let mut marks = vec![Mark::Unvisited; n];
    let mut post_order: Vec<ActivityIdx> = Vec::with_capacity(n);
    // (node, position of the next outgoing edge to explore)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    // Roots in reverse so unrelated activities come out in input order
    for root in (0..n).rev() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::OnStack;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, pos) = *frame;
            match outgoing[node].get(pos) {
                Some(&edge_idx) => {
                    frame.1 += 1;
                    let next = edges[edge_idx].to as usize;
                    match marks[next] {
                        Mark::Unvisited => {
                            marks[next] = Mark::OnStack;
                            stack.push((next, 0));
                        }
                        Mark::OnStack => return Err(next as ActivityIdx),
                        Mark::Done => {}
                    }
                }
                None => {
                    marks[node] = Mark::Done;
                    post_order.push(node as ActivityIdx);
                    stack.pop();
                }
            }
        }
    }

    post_order.reverse();
    Ok(post_order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_activity(id: &str, duration: u32) -> Activity {
        Activity::new(id, id.to_uppercase(), duration)
    }

    fn position(network: &Network, id: &str) -> usize {
        let idx = network.index_of(id).unwrap();
        network
            .topo_order()
            .iter()
            .position(|&i| i == idx)
            .unwrap()
    }

    #[test]
    fn test_build_chain() {
        let activities = vec![
            make_activity("c", 2),
            make_activity("a", 3),
            make_activity("b", 5),
        ];
        let deps = vec![Dependency::new("a", "b"), Dependency::new("b", "c")];
        let network = Network::build(&activities, &deps).unwrap();

        assert_eq!(network.len(), 3);
        assert_eq!(network.edge_count(), 2);
        assert!(position(&network, "a") < position(&network, "b"));
        assert!(position(&network, "b") < position(&network, "c"));

        let b = network.index_of("b").unwrap();
        assert_eq!(network.predecessors(b).count(), 1);
        assert_eq!(network.successors(b).count(), 1);
        assert!(network.is_start(network.index_of("a").unwrap()));
        assert!(network.is_terminal(network.index_of("c").unwrap()));
    }

    #[test]
    fn test_unrelated_activities_keep_input_order() {
        let activities = vec![
            make_activity("x", 1),
            make_activity("y", 1),
            make_activity("z", 1),
        ];
        let network = Network::build(&activities, &[]).unwrap();
        assert_eq!(network.topo_order(), &[0, 1, 2]);
    }

    #[test]
    fn test_dangling_successor() {
        let activities = vec![make_activity("a", 1)];
        let deps = vec![Dependency::new("a", "ghost")];
        let err = Network::build(&activities, &deps).unwrap_err();

        assert_eq!(
            err,
            NetworkError::DanglingReference {
                predecessor_id: "a".to_string(),
                successor_id: "ghost".to_string(),
                missing_id: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_dangling_predecessor() {
        let activities = vec![make_activity("a", 1)];
        let deps = vec![Dependency::new("ghost", "a")];
        match Network::build(&activities, &deps) {
            Err(NetworkError::DanglingReference { missing_id, .. }) => {
                assert_eq!(missing_id, "ghost")
            }
            other => panic!("expected dangling reference, got {:?}", other),
        }
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let activities = vec![make_activity("a", 1)];
        let deps = vec![Dependency::new("a", "a")];
        let err = Network::build(&activities, &deps).unwrap_err();
        assert_eq!(err, NetworkError::Cycle("a".to_string()));
    }

    #[test]
    fn test_cycle_detected() {
        let activities = vec![
            make_activity("a", 1),
            make_activity("b", 1),
            make_activity("c", 1),
            make_activity("d", 1),
        ];
        let deps = vec![
            Dependency::new("a", "b"),
            Dependency::new("b", "c"),
            Dependency::new("c", "d"),
            Dependency::new("d", "b"),
        ];
        match Network::build(&activities, &deps) {
            Err(NetworkError::Cycle(id)) => {
                assert!(["b", "c", "d"].contains(&id.as_str()), "got {}", id)
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_activity() {
        let activities = vec![make_activity("a", 1), make_activity("a", 2)];
        let err = Network::build(&activities, &[]).unwrap_err();
        assert_eq!(err, NetworkError::DuplicateActivity("a".to_string()));
    }

    #[test]
    fn test_lag_bounds() {
        let activities = vec![make_activity("a", 1), make_activity("b", 1)];
        let lagged = |lag| vec![Dependency::new("a", "b").with_lag(lag)];

        assert!(Network::build(&activities, &lagged(MAX_LAG_DAYS)).is_ok());
        assert!(Network::build(&activities, &lagged(-MAX_LAG_DAYS)).is_ok());
        assert!(matches!(
            Network::build(&activities, &lagged(i64::MAX)),
            Err(NetworkError::LagOutOfRange { lag: i64::MAX, .. })
        ));
        assert!(matches!(
            Network::build(&activities, &lagged(i64::MIN)),
            Err(NetworkError::LagOutOfRange { lag: i64::MIN, .. })
        ));
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let n = 50_000;
        let activities: Vec<Activity> = (0..n).map(|i| make_activity(&format!("t{i}"), 1)).collect();
        let deps: Vec<Dependency> = (1..n)
            .map(|i| Dependency::new(format!("t{}", i - 1), format!("t{i}")))
            .collect();
        let network = Network::build(&activities, &deps).unwrap();
        assert_eq!(network.topo_order().len(), n);
        assert_eq!(network.topo_order()[0], 0);
    }

    #[test]
    fn test_long_cycle_detected() {
        let n = 20_000;
        let activities: Vec<Activity> = (0..n).map(|i| make_activity(&format!("t{i}"), 1)).collect();
        let mut deps: Vec<Dependency> = (1..n)
            .map(|i| Dependency::new(format!("t{}", i - 1), format!("t{i}")))
            .collect();
        deps.push(Dependency::new(format!("t{}", n - 1), "t0"));
        assert!(matches!(
            Network::build(&activities, &deps),
            Err(NetworkError::Cycle(_))
        ));
    }
}
