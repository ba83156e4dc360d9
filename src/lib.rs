//! Approximate minimum dominating sets ("power plant placement").
//!
//! A [`Graph`] is built once from an edge list; [`solve`] then picks one of three regimes by
//! vertex count: a bit-parallel maximum-gain greedy with a pruning pass for small graphs, and
//! two linear single passes for larger ones. [`exact::solve_exact`] offers a budgeted exact
//! alternative behind the same [`Solver`] contract.

use std::fmt::Write;

pub mod coverage;
pub mod error;
pub mod exact;
pub mod generate;
pub mod graph;
pub mod greedy;
pub mod io;
pub mod prune;
pub mod solver;
pub mod strategy;

pub use error::SolveError;
pub use graph::Graph;
pub use io::parse_input;
pub use solver::{Exact, Heuristic, Solver};
pub use strategy::{solve, Regime, SolverConfig};

/// Selected vertices of a graph with `vertex_count` vertices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    vertices: Vec<u32>,
    vertex_count: u32,
}

impl Solution {
    /// Fails with [`SolveError::InvalidInput`] when a vertex id is not below `vertex_count`.
    pub fn new(vertex_count: u32, vertices: Vec<u32>) -> Result<Solution, SolveError> {
        if let Some(&vertex) = vertices.iter().find(|&&v| v >= vertex_count) {
            return Err(SolveError::invalid(format!(
                "vertex {vertex} out of range for {vertex_count} vertices"
            )));
        }
        Ok(Solution::from_vertices(vertex_count, vertices))
    }

    /// Callers guarantee every id is below `vertex_count`.
    pub(crate) fn from_vertices(vertex_count: u32, vertices: Vec<u32>) -> Solution {
        Solution {
            vertices,
            vertex_count,
        }
    }

    pub fn full(n: u32) -> Solution {
        Solution {
            vertices: (0..n).collect(),
            vertex_count: n,
        }
    }

    pub fn vertices(&self) -> &[u32] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// One `'0'`/`'1'` per vertex followed by a newline.
    pub fn format(&self) -> String {
        let mut bits = vec![b'0'; self.vertex_count as usize];
        for &vertex in &self.vertices {
            bits[vertex as usize] = b'1';
        }
        let mut output = String::with_capacity(bits.len() + 1);
        output.extend(bits.iter().map(|&b| b as char));
        let _ = writeln!(&mut output);
        output
    }
}
