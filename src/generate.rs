//! Synthetic instances: a path through all vertices plus seeded random edges.

use fxhash::FxHashSet;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{try_vec, SolveError};
use crate::graph::Graph;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub nodes: u32,
    /// Total edge count. Never below `nodes - 1`, the path backbone.
    pub edges: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            nodes: 1000,
            edges: 2000,
            seed: 42,
        }
    }
}

/// Builds a connected simple graph with edges `(i, i + 1)` and distinct random extras.
pub fn generate(config: &GeneratorConfig) -> Result<Graph, SolveError> {
    let n = config.nodes;
    let max_edges = n as u64 * n.saturating_sub(1) as u64 / 2;
    if config.edges as u64 > max_edges {
        return Err(SolveError::invalid(format!(
            "a simple graph on {n} vertices has at most {max_edges} edges, {} requested",
            config.edges
        )));
    }

    let backbone = n.saturating_sub(1) as usize;
    let total = config.edges.max(backbone);
    let mut edges = try_vec::<(u32, u32)>("edge list", total)?;
    let mut seen = FxHashSet::default();
    for i in 1..n {
        edges.push((i - 1, i));
        seen.insert((i - 1, i));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    while edges.len() < total {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        if u == v {
            continue;
        }
        let edge = (u.min(v), u.max(v));
        if seen.insert(edge) {
            edges.push(edge);
        }
    }
    log::debug!("generated {n} vertices, {} edges (seed {})", edges.len(), config.seed);
    Graph::build(n, edges)
}
