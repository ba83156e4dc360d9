use crate::error::{try_vec, SolveError};
use crate::Solution;

/// Undirected graph in compressed adjacency form.
///
/// `neighbours[neighbour_indices[v]..neighbour_indices[v + 1]]` lists the neighbours of `v`
/// in edge-list order. Self loops are dropped while building, duplicate edges are kept.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    edges: Vec<(u32, u32)>,
    neighbours: Vec<u32>,
    neighbour_indices: Vec<u32>,
    vertices: u32,
}

impl Graph {
    /// Builds the adjacency of an `n` vertex graph from an undirected edge list.
    pub fn build(n: u32, edges: Vec<(u32, u32)>) -> Result<Graph, SolveError> {
        if let Some(&(start, end)) = edges.iter().find(|&&(s, e)| s >= n || e >= n) {
            return Err(SolveError::invalid(format!(
                "edge ({start}, {end}) has an endpoint outside [0, {n})"
            )));
        }

        let mut degrees = try_vec::<u32>("degree counters", n as usize)?;
        degrees.resize(n as usize, 0);
        for &(start, end) in &edges {
            if start != end {
                degrees[start as usize] += 1;
                degrees[end as usize] += 1;
            }
        }

        let mut neighbour_indices = try_vec::<u32>("adjacency offsets", n as usize + 1)?;
        let mut total = 0usize;
        neighbour_indices.push(0);
        for degree in &degrees {
            total += *degree as usize;
            let offset = u32::try_from(total).map_err(|_| SolveError::AllocationFailure {
                what: "adjacency",
                count: total,
            })?;
            neighbour_indices.push(offset);
        }

        let mut neighbours = try_vec::<u32>("adjacency", total)?;
        neighbours.resize(total, 0);
        // reuse the counters as insertion cursors
        let mut cursor = degrees;
        cursor.copy_from_slice(&neighbour_indices[..n as usize]);
        for &(start, end) in &edges {
            if start == end {
                continue;
            }
            neighbours[cursor[start as usize] as usize] = end;
            cursor[start as usize] += 1;
            neighbours[cursor[end as usize] as usize] = start;
            cursor[end as usize] += 1;
        }

        Ok(Graph {
            edges,
            neighbours,
            neighbour_indices,
            vertices: n,
        })
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    pub fn neighbours(&self, vertex: u32) -> &[u32] {
        let start = self.neighbour_indices[vertex as usize] as usize;
        let end = self.neighbour_indices[vertex as usize + 1] as usize;
        &self.neighbours[start..end]
    }

    /// `vertex` followed by its neighbours.
    pub fn closed_neighbours(&self, vertex: u32) -> impl Iterator<Item = u32> + '_ {
        std::iter::once(vertex).chain(self.neighbours(vertex).iter().copied())
    }

    pub fn deg(&self, vertex: u32) -> usize {
        self.neighbours(vertex).len()
    }

    pub fn max_degree(&self) -> usize {
        (0..self.vertices).map(|v| self.deg(v)).max().unwrap_or(0)
    }

    /// Checks that every vertex is selected or adjacent to a selected vertex.
    pub fn validate_solution(&self, solution: &Solution) -> bool {
        if solution.vertex_count() != self.vertices {
            log::debug!(
                "solution is sized for {} vertices, graph has {}",
                solution.vertex_count(),
                self.vertices
            );
            return false;
        }
        let mut powered = vec![false; self.vertices as usize];
        for &plant in solution.vertices() {
            if plant >= self.vertices {
                return false;
            }
            for v in self.closed_neighbours(plant) {
                powered[v as usize] = true;
            }
        }
        match powered.iter().position(|p| !p) {
            Some(vertex) => {
                log::debug!("vertex {vertex} is not powered");
                false
            }
            None => true,
        }
    }
}
