//! Size-adaptive choice between the bitset greedy and the linear-time passes.

use std::cmp::Reverse;
use std::fmt;

use crate::coverage::{Bits, ReachTable};
use crate::error::{try_vec, SolveError};
use crate::graph::Graph;
use crate::greedy::GreedySelector;
use crate::prune::{prune, prune_linear};
use crate::Solution;

/// Largest graph handled by the bitset greedy.
pub const SMALL_N: u32 = 1000;
/// Largest graph handled by the degree-ordered pass.
pub const MEDIUM_N: u32 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub small_n: u32,
    pub medium_n: u32,
    /// Worker count for the greedy scan. `None` uses the global rayon pool.
    pub threads: Option<usize>,
    /// Run the counting redundancy pass after the medium and large regimes.
    pub prune_linear: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            small_n: SMALL_N,
            medium_n: MEDIUM_N,
            threads: None,
            prune_linear: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Bitset greedy followed by the bitset pruner.
    Small,
    /// Single pass in descending degree order.
    Medium,
    /// Single pass in id order.
    Large,
}

impl Regime {
    pub fn for_size(n: u32, config: &SolverConfig) -> Regime {
        if n <= config.small_n {
            Regime::Small
        } else if n <= config.medium_n {
            Regime::Medium
        } else {
            Regime::Large
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Regime::Small => "small (greedy + prune)",
            Regime::Medium => "medium (degree order)",
            Regime::Large => "large (linear)",
        };
        f.write_str(name)
    }
}

/// Computes a dominating set of `graph` with the regime picked by its vertex count.
pub fn solve(graph: &Graph, config: &SolverConfig) -> Result<Solution, SolveError> {
    let n = graph.vertex_count();
    let regime = Regime::for_size(n, config);
    log::info!(
        "{n} vertices, {} edges: using the {regime} regime",
        graph.edge_count()
    );

    let vertices = match regime {
        Regime::Small => solve_small(graph, config)?,
        Regime::Medium => solve_medium(graph)?,
        Regime::Large => solve_large(graph)?,
    };
    let vertices = if config.prune_linear && regime != Regime::Small {
        prune_linear(graph, &vertices)?
    } else {
        vertices
    };

    log::info!("selected {} of {n} vertices", vertices.len());
    Ok(Solution::from_vertices(n, vertices))
}

pub fn solve_small(graph: &Graph, config: &SolverConfig) -> Result<Vec<u32>, SolveError> {
    let reach = ReachTable::build(graph)?;
    let selection = match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| SolveError::ThreadPool(e.to_string()))?;
            pool.install(|| GreedySelector::new(&reach).map(GreedySelector::run))?
        }
        None => GreedySelector::new(&reach)?.run(),
    };
    log::debug!("greedy selected {} vertices", selection.len());
    prune(&reach, &selection)
}

pub fn solve_medium(graph: &Graph) -> Result<Vec<u32>, SolveError> {
    let n = graph.vertex_count();
    let mut order = try_vec::<u32>("vertex order", n as usize)?;
    order.extend(0..n);
    order.sort_by_key(|&v| (Reverse(graph.deg(v)), v));
    single_pass(graph, order)
}

pub fn solve_large(graph: &Graph) -> Result<Vec<u32>, SolveError> {
    single_pass(graph, 0..graph.vertex_count())
}

/// Picks every vertex that is still unpowered when visited and powers its closed
/// neighbourhood.
fn single_pass(
    graph: &Graph,
    order: impl IntoIterator<Item = u32>,
) -> Result<Vec<u32>, SolveError> {
    let mut powered = Bits::zeros(graph.vertex_count() as usize)?;
    let mut remaining = graph.vertex_count() as usize;
    let mut plants = Vec::new();
    for u in order {
        if remaining == 0 {
            break;
        }
        if powered.get(u as usize) {
            continue;
        }
        plants.push(u);
        for v in graph.closed_neighbours(u) {
            if !powered.get(v as usize) {
                powered.set(v as usize);
                remaining -= 1;
            }
        }
    }
    Ok(plants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_graph(seed: u64, n: u32, m: usize) -> Graph {
        let mut rng = StdRng::seed_from_u64(seed);
        let edges = (0..m)
            .map(|_| (rng.gen_range(0..n), rng.gen_range(0..n)))
            .collect();
        Graph::build(n, edges).unwrap()
    }

    #[test]
    fn test_regime_thresholds() {
        let config = SolverConfig::default();
        assert_eq!(Regime::for_size(0, &config), Regime::Small);
        assert_eq!(Regime::for_size(SMALL_N, &config), Regime::Small);
        assert_eq!(Regime::for_size(SMALL_N + 1, &config), Regime::Medium);
        assert_eq!(Regime::for_size(MEDIUM_N, &config), Regime::Medium);
        assert_eq!(Regime::for_size(MEDIUM_N + 1, &config), Regime::Large);
    }

    #[test]
    fn test_path_scenario() {
        let graph = Graph::build(4, vec![(0, 1), (1, 2), (2, 3)]).unwrap();
        let solution = solve(&graph, &SolverConfig::default()).unwrap();
        assert_eq!(solution.vertices(), &[1, 3]);
        assert_eq!(solution.format(), "0101\n");
    }

    #[test]
    fn test_isolated_scenario() {
        let graph = Graph::build(2, vec![]).unwrap();
        let solution = solve(&graph, &SolverConfig::default()).unwrap();
        assert_eq!(solution.format(), "11\n");
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::build(0, vec![]).unwrap();
        for config in [
            SolverConfig::default(),
            SolverConfig {
                small_n: 0,
                medium_n: 0,
                ..Default::default()
            },
        ] {
            let solution = solve(&graph, &config).unwrap();
            assert!(solution.vertices().is_empty());
            assert_eq!(solution.format(), "\n");
        }
    }

    #[test]
    fn test_medium_prefers_high_degree() {
        // star with centre 3: the degree order picks the centre first
        let graph = Graph::build(5, vec![(3, 0), (3, 1), (3, 2), (3, 4)]).unwrap();
        assert_eq!(solve_medium(&graph).unwrap(), vec![3]);
        assert_eq!(solve_large(&graph).unwrap(), vec![0, 1, 2, 4]);
    }

    #[test]
    fn test_regime_boundary() {
        let config = SolverConfig {
            small_n: 60,
            medium_n: 120,
            ..Default::default()
        };
        for (seed, n) in [(1, 60), (2, 61), (3, 120), (4, 121)] {
            let graph = random_graph(seed, n, n as usize);
            let solution = solve(&graph, &config).unwrap();
            assert!(graph.validate_solution(&solution), "n = {n}");
        }
    }

    #[test]
    fn test_all_regimes_dominate() {
        for seed in 0..20 {
            let graph = random_graph(seed, 300, 450);
            let reach_based = solve_small(&graph, &SolverConfig::default()).unwrap();
            let medium = solve_medium(&graph).unwrap();
            let large = solve_large(&graph).unwrap();
            for vertices in [reach_based, medium, large] {
                assert!(graph.validate_solution(&Solution::from_vertices(300, vertices)));
            }
        }
    }

    #[test]
    fn test_linear_pruning_option() {
        let graph = random_graph(7, 400, 800);
        let plain = SolverConfig {
            small_n: 10,
            medium_n: 10,
            ..Default::default()
        };
        let pruned = SolverConfig {
            prune_linear: true,
            ..plain.clone()
        };
        let a = solve(&graph, &plain).unwrap();
        let b = solve(&graph, &pruned).unwrap();
        assert!(graph.validate_solution(&a));
        assert!(graph.validate_solution(&b));
        assert!(b.vertices().len() <= a.vertices().len());
    }

    #[test]
    fn test_deterministic() {
        let graph = random_graph(11, 500, 900);
        let config = SolverConfig {
            threads: Some(3),
            ..Default::default()
        };
        let first = solve(&graph, &config).unwrap().format();
        for _ in 0..3 {
            assert_eq!(solve(&graph, &config).unwrap().format(), first);
        }
        assert_eq!(solve(&graph, &SolverConfig::default()).unwrap().format(), first);
    }
}
