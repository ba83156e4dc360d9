//! The `(Graph) -> Solution` contract shared by the heuristic and exact backends.

use crate::error::SolveError;
use crate::exact::{solve_exact, ExactConfig};
use crate::graph::Graph;
use crate::strategy::{solve, SolverConfig};
use crate::Solution;

pub trait Solver {
    fn name(&self) -> &'static str;

    fn solve(&self, graph: &Graph) -> Result<Solution, SolveError>;
}

/// Size-adaptive greedy. Never fails on a structurally valid graph.
#[derive(Debug, Clone, Default)]
pub struct Heuristic {
    pub config: SolverConfig,
}

impl Solver for Heuristic {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn solve(&self, graph: &Graph) -> Result<Solution, SolveError> {
        solve(graph, &self.config)
    }
}

/// Branch and bound. May fail with `Infeasible`, or with `Timeout` carrying the best set found.
#[derive(Debug, Clone, Default)]
pub struct Exact {
    pub config: ExactConfig,
}

impl Solver for Exact {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn solve(&self, graph: &Graph) -> Result<Solution, SolveError> {
        solve_exact(graph, &self.config)
    }
}
