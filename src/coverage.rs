//! Word-parallel coverage arithmetic.
//!
//! Every set over the vertices is an array of `⌈n / 64⌉` `u64` words. The bits past `n` in
//! the last word are always zero, so whole-word popcounts never over count.

use bitvec::prelude::*;
use rayon::prelude::*;

use crate::error::{try_vec, SolveError};
use crate::graph::Graph;

pub const WORD_BITS: usize = u64::BITS as usize;

/// Below this many words a union is done on the calling thread.
const PAR_UNION_MIN_WORDS: usize = 1024;
const UNION_CHUNK_WORDS: usize = 256;

pub fn word_count(bits: usize) -> usize {
    bits.div_ceil(WORD_BITS)
}

/// `dst |= src`
#[inline]
pub fn union(dst: &mut [u64], src: &[u64]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d |= *s;
    }
}

/// Number of bits set in `reach` but not in `covered`.
#[inline]
pub fn gain(reach: &[u64], covered: &[u64]) -> u32 {
    debug_assert_eq!(reach.len(), covered.len());
    reach
        .iter()
        .zip(covered)
        .map(|(r, c)| (r & !c).count_ones())
        .sum()
}

#[inline]
pub fn popcount(words: &[u64]) -> u32 {
    words.iter().map(|w| w.count_ones()).sum()
}

/// Fixed-capacity bit vector over the vertices of one graph.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Bits {
    bits: BitVec<u64, Lsb0>,
}

impl std::fmt::Debug for Bits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bits")
            .field("len", &self.bits.len())
            .field("ones", &self.iter_ones().collect::<Vec<_>>())
            .finish()
    }
}

impl Bits {
    pub fn zeros(len: usize) -> Result<Self, SolveError> {
        let words = word_count(len);
        let mut raw = try_vec::<u64>("bitset", words)?;
        raw.resize(words, 0);
        let mut bits = BitVec::from_vec(raw);
        bits.truncate(len);
        Ok(Bits { bits })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        self.bits.set(index, true);
    }

    #[inline]
    pub fn clear(&mut self, index: usize) {
        self.bits.set(index, false);
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        self.bits[index]
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// True when every bit is set. Trivially true for a zero-length set.
    pub fn is_full(&self) -> bool {
        self.bits.all()
    }

    pub fn first_zero(&self) -> Option<usize> {
        self.bits.first_zero()
    }

    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    pub fn words(&self) -> &[u64] {
        self.bits.as_raw_slice()
    }

    /// Resets every bit without releasing the storage.
    pub fn clear_all(&mut self) {
        self.bits.as_raw_mut_slice().fill(0);
    }

    pub fn union(&mut self, src: &[u64]) {
        union(self.bits.as_raw_mut_slice(), src);
    }

    /// Union split across the current rayon pool by word range. Each word is written by
    /// exactly one task.
    pub fn par_union(&mut self, src: &[u64]) {
        let dst = self.bits.as_raw_mut_slice();
        if dst.len() < PAR_UNION_MIN_WORDS {
            union(dst, src);
            return;
        }
        dst.par_chunks_mut(UNION_CHUNK_WORDS)
            .zip(src.par_chunks(UNION_CHUNK_WORDS))
            .for_each(|(d, s)| union(d, s));
    }

    /// Vertices `reach` would newly cover if added on top of `self`.
    #[inline]
    pub fn gain(&self, reach: &[u64]) -> u32 {
        gain(reach, self.words())
    }
}

/// `Reach(v) = {v} ∪ neighbours(v)` for every vertex, stored in one arena sized to the graph.
#[derive(Debug, Clone)]
pub struct ReachTable {
    vertices: usize,
    stride: usize,
    words: Vec<u64>,
}

impl ReachTable {
    pub fn build(graph: &Graph) -> Result<Self, SolveError> {
        let vertices = graph.vertex_count() as usize;
        let stride = word_count(vertices);
        let total = vertices
            .checked_mul(stride)
            .ok_or(SolveError::AllocationFailure {
                what: "reach table",
                count: usize::MAX,
            })?;
        let mut words = try_vec::<u64>("reach table", total)?;
        words.resize(total, 0);

        for v in 0..graph.vertex_count() {
            let start = v as usize * stride;
            let row = words[start..start + stride].view_bits_mut::<Lsb0>();
            for u in graph.closed_neighbours(v) {
                row.set(u as usize, true);
            }
        }
        Ok(ReachTable {
            vertices,
            stride,
            words,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices
    }

    /// Words per set.
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn reach(&self, vertex: u32) -> &[u64] {
        let start = vertex as usize * self.stride;
        &self.words[start..start + self.stride]
    }

    /// Vertices in `Reach(vertex)`, ascending.
    pub fn reach_ones(&self, vertex: u32) -> impl Iterator<Item = u32> + '_ {
        self.reach(vertex).view_bits::<Lsb0>()[..self.vertices]
            .iter_ones()
            .map(|x| x as u32)
    }

    pub fn reach_size(&self, vertex: u32) -> u32 {
        popcount(self.reach(vertex))
    }

    /// An all-zero set sized for this table.
    pub fn empty_set(&self) -> Result<Bits, SolveError> {
        Bits::zeros(self.vertices)
    }

    /// Union of `Reach(v)` over `selection`, written into `covered`.
    pub fn cover_of(&self, selection: impl IntoIterator<Item = u32>, covered: &mut Bits) {
        covered.clear_all();
        for v in selection {
            covered.union(self.reach(v));
        }
    }
}
