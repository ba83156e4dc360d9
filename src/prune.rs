//! Removal of redundant plants from a finished selection.
//!
//! Both passes walk the selection in pick order and drop a vertex when the vertices still
//! kept continue to dominate the graph without it. The result is irredundant with respect to
//! that order, not a minimum.

use crate::coverage::ReachTable;
use crate::error::{try_vec, SolveError};
use crate::graph::Graph;

/// Bitset pass: recomputes the union of the kept reach sets for every tentative removal.
///
/// `O(|selection|² · ⌈n / 64⌉)`, only used for small graphs.
pub fn prune(reach: &ReachTable, selection: &[u32]) -> Result<Vec<u32>, SolveError> {
    prune_while(reach, selection, || true)
}

/// [`prune`] that stops considering removals once `in_budget` returns `false`.
///
/// The kept plants dominate the graph after every removal, so an interrupted pass still
/// returns a dominating set.
pub fn prune_while(
    reach: &ReachTable,
    selection: &[u32],
    mut in_budget: impl FnMut() -> bool,
) -> Result<Vec<u32>, SolveError> {
    let mut keep = reach.empty_set()?;
    for &plant in selection {
        keep.set(plant as usize);
    }

    let mut covered = reach.empty_set()?;
    let mut dropped = 0usize;
    for &plant in selection {
        if !in_budget() {
            log::debug!("pruning interrupted after {dropped} removals");
            break;
        }
        keep.clear(plant as usize);
        reach.cover_of(keep.iter_ones().map(|v| v as u32), &mut covered);
        if covered.is_full() {
            dropped += 1;
        } else {
            keep.set(plant as usize);
        }
    }
    log::debug!("pruned {dropped} of {} plants", selection.len());

    Ok(selection
        .iter()
        .copied()
        .filter(|&plant| keep.get(plant as usize))
        .collect())
}

/// Counting pass over the adjacency lists: tracks how many kept plants power each vertex.
///
/// `O(n + Σ deg)`, cheap enough for the degree-ordered and linear regimes.
pub fn prune_linear(graph: &Graph, selection: &[u32]) -> Result<Vec<u32>, SolveError> {
    let n = graph.vertex_count() as usize;
    let mut powered_by = try_vec::<u32>("power counters", n)?;
    powered_by.resize(n, 0);
    let mut closed = ClosedNeighbourhoods::new(n)?;

    for &plant in selection {
        for &v in closed.of(graph, plant) {
            powered_by[v as usize] += 1;
        }
    }

    let mut kept = Vec::with_capacity(selection.len());
    for &plant in selection {
        let members = closed.of(graph, plant);
        if members.iter().all(|&v| powered_by[v as usize] > 1) {
            for &v in members {
                powered_by[v as usize] -= 1;
            }
        } else {
            kept.push(plant);
        }
    }
    log::debug!("pruned {} of {} plants", selection.len() - kept.len(), selection.len());
    Ok(kept)
}

/// Closed neighbourhoods with duplicate edges collapsed, so every member counts once.
struct ClosedNeighbourhoods {
    stamp: Vec<u32>,
    members: Vec<u32>,
}

impl ClosedNeighbourhoods {
    fn new(n: usize) -> Result<Self, SolveError> {
        let mut stamp = try_vec::<u32>("neighbourhood stamps", n)?;
        stamp.resize(n, u32::MAX);
        Ok(ClosedNeighbourhoods {
            stamp,
            members: Vec::new(),
        })
    }

    fn of(&mut self, graph: &Graph, vertex: u32) -> &[u32] {
        self.members.clear();
        for v in graph.closed_neighbours(vertex) {
            if self.stamp[v as usize] != vertex {
                self.stamp[v as usize] = vertex;
                self.members.push(v);
            }
        }
        // reset so the same vertex can be queried again
        for &v in &self.members {
            self.stamp[v as usize] = u32::MAX;
        }
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Solution;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn path4() -> Graph {
        Graph::build(4, vec![(0, 1), (1, 2), (2, 3)]).unwrap()
    }

    fn random_graph(rng: &mut StdRng, n: u32, m: usize) -> Graph {
        let edges = (0..m)
            .map(|_| (rng.gen_range(0..n), rng.gen_range(0..n)))
            .collect();
        Graph::build(n, edges).unwrap()
    }

    #[test]
    fn test_necessary_plants_survive() {
        let graph = path4();
        let table = ReachTable::build(&graph).unwrap();
        assert_eq!(prune(&table, &[1, 3]).unwrap(), vec![1, 3]);
        assert_eq!(prune_linear(&graph, &[1, 3]).unwrap(), vec![1, 3]);
    }

    #[test]
    fn test_redundant_plants_dropped() {
        let graph = path4();
        let table = ReachTable::build(&graph).unwrap();
        assert_eq!(prune(&table, &[0, 1, 2, 3]).unwrap(), vec![1, 3]);
        assert_eq!(prune_linear(&graph, &[0, 1, 2, 3]).unwrap(), vec![1, 3]);
    }

    #[test]
    fn test_order_dependent() {
        let graph = path4();
        let table = ReachTable::build(&graph).unwrap();
        assert_eq!(prune(&table, &[3, 2, 1, 0]).unwrap(), vec![2, 0]);
        assert_eq!(prune_linear(&graph, &[3, 2, 1, 0]).unwrap(), vec![2, 0]);
    }

    #[test]
    fn test_interrupted_pass_still_dominates() {
        let graph = path4();
        let table = ReachTable::build(&graph).unwrap();
        assert_eq!(prune_while(&table, &[0, 1, 2, 3], || false).unwrap(), vec![0, 1, 2, 3]);

        let mut budget = 1;
        let kept = prune_while(&table, &[0, 1, 2, 3], || {
            budget -= 1;
            budget >= 0
        })
        .unwrap();
        assert_eq!(kept, vec![1, 2, 3]);
        assert!(graph.validate_solution(&Solution::from_vertices(4, kept)));
    }

    #[test]
    fn test_duplicate_edges_counted_once() {
        let graph = Graph::build(2, vec![(0, 1), (0, 1)]).unwrap();
        let kept = prune_linear(&graph, &[0, 1]).unwrap();
        assert_eq!(kept, vec![1]);
        assert!(graph.validate_solution(&Solution::from_vertices(2, kept)));
    }

    #[test]
    fn test_pruning_is_idempotent_and_valid() {
        let mut rng = StdRng::seed_from_u64(123456);
        for _ in 0..50 {
            let graph = random_graph(&mut rng, 80, 120);
            let table = ReachTable::build(&graph).unwrap();
            let everything: Vec<u32> = (0..80).collect();

            let once = prune(&table, &everything).unwrap();
            assert!(graph.validate_solution(&Solution::from_vertices(80, once.clone())));
            assert_eq!(prune(&table, &once).unwrap(), once);

            let once = prune_linear(&graph, &everything).unwrap();
            assert!(graph.validate_solution(&Solution::from_vertices(80, once.clone())));
            assert_eq!(prune_linear(&graph, &once).unwrap(), once);
        }
    }
}
