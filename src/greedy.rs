//! Maximum-gain greedy selection over a [`ReachTable`].

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::coverage::{gain, Bits, ReachTable};
use crate::error::SolveError;

/// Vertices scanned by one task per iteration.
const SCAN_CHUNK: usize = 64;

/// A vertex together with the number of uncovered vertices it would cover.
///
/// Ordered by gain, then by *smaller* vertex id, so the maximum is the deterministic pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub gain: u32,
    pub vertex: u32,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gain
            .cmp(&other.gain)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Selecting,
    Done,
}

/// One completed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub vertex: u32,
    pub gain: u32,
    /// Covered vertices after the step.
    pub covered: usize,
    /// The pick came from the no-gain fallback rather than the argmax.
    pub forced: bool,
}

/// Repeatedly selects the uncovered vertex whose closed neighbourhood covers the most
/// uncovered vertices until everything is covered.
///
/// Candidates are restricted to uncovered vertices; a chosen vertex is covered by its own
/// reach, so it never comes up again.
///
/// The scan of each iteration runs on the current rayon pool; call [`GreedySelector::run`]
/// inside `ThreadPool::install` to bound the worker count.
pub struct GreedySelector<'a> {
    reach: &'a ReachTable,
    covered: Bits,
    selection: Vec<u32>,
    phase: Phase,
}

impl<'a> GreedySelector<'a> {
    pub fn new(reach: &'a ReachTable) -> Result<Self, SolveError> {
        let covered = reach.empty_set()?;
        let phase = if covered.is_full() {
            Phase::Done
        } else {
            Phase::Selecting
        };
        Ok(GreedySelector {
            reach,
            covered,
            selection: Vec::new(),
            phase,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn covered(&self) -> &Bits {
        &self.covered
    }

    pub fn selection(&self) -> &[u32] {
        &self.selection
    }

    /// Performs one selection, or returns `None` once every vertex is covered.
    pub fn step(&mut self) -> Option<Step> {
        if self.phase == Phase::Done {
            return None;
        }

        let (vertex, gain, forced) = match self.best_candidate() {
            Some(best) if best.gain > 0 => (best.vertex, best.gain, false),
            _ => {
                // Only reachable with an exhausted candidate pool; any uncovered vertex
                // still covers at least itself.
                let Some(vertex) = self.covered.first_zero() else {
                    self.phase = Phase::Done;
                    return None;
                };
                let vertex = vertex as u32;
                (vertex, self.covered.gain(self.reach.reach(vertex)), true)
            }
        };

        self.selection.push(vertex);
        self.covered.par_union(self.reach.reach(vertex));
        let covered = self.covered.count_ones();
        log::trace!("picked {vertex} (gain {gain}, forced {forced}), {covered} covered");

        if covered == self.reach.vertex_count() {
            self.phase = Phase::Done;
        }
        Some(Step {
            vertex,
            gain,
            covered,
            forced,
        })
    }

    /// Runs to completion and returns the selected vertices in pick order.
    pub fn run(mut self) -> Vec<u32> {
        while self.step().is_some() {}
        self.selection
    }

    /// Fan-out over disjoint vertex ranges, fan-in by a sequential max over the local bests.
    fn best_candidate(&self) -> Option<Candidate> {
        let n = self.reach.vertex_count();
        let reach = self.reach;
        let uncovered = |v: usize| !self.covered.get(v);
        let covered = self.covered.words();

        let local_bests: Vec<Option<Candidate>> = (0..n.div_ceil(SCAN_CHUNK))
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * SCAN_CHUNK;
                let end = (start + SCAN_CHUNK).min(n);
                (start..end)
                    .filter(|&v| uncovered(v))
                    .map(|v| Candidate {
                        gain: gain(reach.reach(v as u32), covered),
                        vertex: v as u32,
                    })
                    .max()
            })
            .collect();

        local_bests.into_iter().flatten().max()
    }
}
