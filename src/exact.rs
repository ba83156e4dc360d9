//! Exact minimum dominating set by branch and bound, under a wall-clock budget.
//!
//! Every dominating set contains a vertex of `Reach(u)` for the first uncovered `u`, so the
//! search branches on those candidates, best gain first. The incumbent starts as the pruned
//! greedy solution, and a branch is cut once `selected + ⌈uncovered / (Δ + 1)⌉` cannot beat it.
//!
//! The budget covers the whole call, including the greedy start. When it runs out the best
//! dominating set found so far travels back inside [`SolveError::Timeout`].

use std::time::{Duration, Instant};

use smallvec::SmallVec;

use crate::coverage::{Bits, ReachTable};
use crate::error::SolveError;
use crate::graph::Graph;
use crate::greedy::{Candidate, GreedySelector, Phase};
use crate::prune::prune_while;
use crate::Solution;

/// Largest graph the exact search accepts. Its reach table takes `n² / 8` bytes.
pub const EXACT_MAX_N: u32 = 20_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactConfig {
    pub time_limit: Duration,
    /// Only accept dominating sets with at most this many vertices.
    pub max_size: Option<usize>,
    /// Larger graphs time out immediately without an answer.
    pub max_n: u32,
}

impl Default for ExactConfig {
    fn default() -> Self {
        ExactConfig {
            time_limit: Duration::from_millis(200),
            max_size: None,
            max_n: EXACT_MAX_N,
        }
    }
}

/// The deadline passed inside the search.
struct OutOfTime;

struct Search<'a> {
    reach: &'a ReachTable,
    deadline: Option<Instant>,
    max_reach: usize,
    /// Size every new solution has to stay below.
    bound: usize,
    best: Option<Vec<u32>>,
    nodes: u64,
}

impl Search<'_> {
    fn branch(&mut self, selection: &mut Vec<u32>, covered: Bits) -> Result<(), OutOfTime> {
        self.nodes += 1;
        let Some(target) = covered.first_zero() else {
            if selection.len() < self.bound {
                log::debug!("improved to {} vertices after {} nodes", selection.len(), self.nodes);
                self.bound = selection.len();
                self.best = Some(selection.clone());
            }
            return Ok(());
        };
        if expired(self.deadline) {
            return Err(OutOfTime);
        }

        let uncovered = covered.len() - covered.count_ones();
        if selection.len() + uncovered.div_ceil(self.max_reach) >= self.bound {
            return Ok(());
        }

        let mut branches: SmallVec<[Candidate; 8]> = self
            .reach
            .reach_ones(target as u32)
            .map(|vertex| Candidate {
                gain: covered.gain(self.reach.reach(vertex)),
                vertex,
            })
            .collect();
        branches.sort_unstable_by(|a, b| b.cmp(a));

        for candidate in branches {
            if selection.len() + 1 >= self.bound {
                break;
            }
            let mut next = covered.clone();
            next.union(self.reach.reach(candidate.vertex));
            selection.push(candidate.vertex);
            self.branch(selection, next)?;
            selection.pop();
        }
        Ok(())
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

fn sorted(n: u32, mut vertices: Vec<u32>) -> Solution {
    vertices.sort_unstable();
    Solution::from_vertices(n, vertices)
}

/// Finds a minimum dominating set.
///
/// Fails with [`SolveError::Infeasible`] when `max_size` is below the optimum, and with
/// [`SolveError::Timeout`] when the budget runs out or the graph has more than `max_n`
/// vertices.
pub fn solve_exact(graph: &Graph, config: &ExactConfig) -> Result<Solution, SolveError> {
    let n = graph.vertex_count();
    let timeout = |best: Option<Solution>| SolveError::Timeout {
        budget: config.time_limit,
        best,
    };
    if n > config.max_n {
        log::warn!("{n} vertices exceed the exact search limit of {}", config.max_n);
        return Err(timeout(None));
    }

    let deadline = Instant::now().checked_add(config.time_limit);
    let reach = ReachTable::build(graph)?;
    let mut greedy = GreedySelector::new(&reach)?;
    while greedy.phase() == Phase::Selecting {
        if expired(deadline) {
            log::warn!(
                "budget ran out after {} greedy picks, before any dominating set",
                greedy.selection().len()
            );
            return Err(timeout(None));
        }
        greedy.step();
    }
    let incumbent = prune_while(&reach, greedy.selection(), || !expired(deadline))?;

    let (best, bound) = match config.max_size {
        Some(max_size) if incumbent.len() > max_size => (None, max_size + 1),
        _ => {
            let bound = incumbent.len();
            (Some(incumbent), bound)
        }
    };
    log::debug!("exact search starts below {bound} vertices");

    let mut search = Search {
        reach: &reach,
        deadline,
        max_reach: graph.max_degree() + 1,
        bound,
        best,
        nodes: 0,
    };
    let finished = search.branch(&mut Vec::new(), reach.empty_set()?);
    let best = search.best.map(|vertices| sorted(n, vertices));

    match (finished, best) {
        (Err(OutOfTime), best) => {
            log::warn!(
                "exact search stopped after {} nodes, best so far: {:?} vertices",
                search.nodes,
                best.as_ref().map(Solution::len)
            );
            Err(timeout(best))
        }
        (Ok(()), Some(solution)) => {
            log::info!("exact search finished after {} nodes", search.nodes);
            Ok(solution)
        }
        (Ok(()), None) => Err(SolveError::Infeasible {
            bound: config.max_size.unwrap_or(n as usize),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{generate, GeneratorConfig};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn optimum_by_enumeration(graph: &Graph) -> usize {
        let n = graph.vertex_count();
        (0u32..1 << n)
            .filter(|mask| {
                let vertices = (0..n).filter(|v| mask & (1 << v) != 0).collect();
                graph.validate_solution(&Solution::from_vertices(n, vertices))
            })
            .map(|mask| mask.count_ones() as usize)
            .min()
            .unwrap()
    }

    fn relaxed() -> ExactConfig {
        ExactConfig {
            time_limit: Duration::from_secs(60),
            ..Default::default()
        }
    }

    #[test]
    fn test_path() {
        let graph = Graph::build(4, vec![(0, 1), (1, 2), (2, 3)]).unwrap();
        let solution = solve_exact(&graph, &relaxed()).unwrap();
        assert_eq!(solution.vertices().len(), 2);
        assert!(graph.validate_solution(&solution));
    }

    #[test]
    fn test_unique_optimum() {
        // greedy opens with vertex 0, which no minimum set contains; the only optimum is {1, 2}
        let graph = Graph::build(
            8,
            vec![(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 3), (2, 6), (2, 4), (1, 7)],
        )
        .unwrap();
        let solution = solve_exact(&graph, &relaxed()).unwrap();
        assert_eq!(solution.vertices(), &[1, 2]);
    }

    #[test]
    fn test_matches_enumeration() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..30 {
            let n = rng.gen_range(1..=12);
            let m = rng.gen_range(0..=2 * n as usize);
            let edges = (0..m)
                .map(|_| (rng.gen_range(0..n), rng.gen_range(0..n)))
                .collect();
            let graph = Graph::build(n, edges).unwrap();
            let solution = solve_exact(&graph, &relaxed()).unwrap();
            assert!(graph.validate_solution(&solution));
            assert_eq!(solution.vertices().len(), optimum_by_enumeration(&graph));
        }
    }

    #[test]
    fn test_size_bound() {
        let graph = Graph::build(4, vec![(0, 1), (1, 2), (2, 3)]).unwrap();
        let result = solve_exact(
            &graph,
            &ExactConfig {
                max_size: Some(1),
                ..relaxed()
            },
        );
        assert!(matches!(result, Err(SolveError::Infeasible { bound: 1 })));

        let solution = solve_exact(
            &graph,
            &ExactConfig {
                max_size: Some(2),
                ..relaxed()
            },
        )
        .unwrap();
        assert_eq!(solution.vertices().len(), 2);
    }

    #[test]
    fn test_zero_budget_times_out() {
        let graph = Graph::build(4, vec![(0, 1), (1, 2), (2, 3)]).unwrap();
        let result = solve_exact(
            &graph,
            &ExactConfig {
                time_limit: Duration::ZERO,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(SolveError::Timeout { best: None, .. })));
    }

    #[test]
    fn test_timeout_keeps_best_solution() {
        let graph = generate(&GeneratorConfig {
            nodes: 300,
            edges: 600,
            seed: 42,
        })
        .unwrap();
        let result = solve_exact(
            &graph,
            &ExactConfig {
                time_limit: Duration::from_millis(50),
                ..Default::default()
            },
        );
        let Err(SolveError::Timeout { best: Some(best), .. }) = result else {
            panic!("expected a timeout with a solution, got {result:?}");
        };
        assert!(graph.validate_solution(&best));
        assert!(best.vertices().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_budget_covers_greedy_start() {
        let graph = generate(&GeneratorConfig {
            nodes: 6000,
            edges: 12_000,
            seed: 7,
        })
        .unwrap();
        let started = Instant::now();
        let result = solve_exact(
            &graph,
            &ExactConfig {
                time_limit: Duration::from_millis(1),
                ..Default::default()
            },
        );
        assert!(started.elapsed() < Duration::from_secs(1));
        match result {
            Err(SolveError::Timeout { best, .. }) => {
                assert!(best.map_or(true, |best| graph.validate_solution(&best)));
            }
            other => panic!("expected a timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_size_cap() {
        let graph = Graph::build(4, vec![(0, 1), (1, 2), (2, 3)]).unwrap();
        let result = solve_exact(
            &graph,
            &ExactConfig {
                max_n: 3,
                ..relaxed()
            },
        );
        assert!(matches!(result, Err(SolveError::Timeout { best: None, .. })));
        assert!(solve_exact(&graph, &ExactConfig { max_n: 4, ..relaxed() }).is_ok());
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::build(0, vec![]).unwrap();
        let solution = solve_exact(&graph, &ExactConfig::default()).unwrap();
        assert!(solution.vertices().is_empty());
    }
}
