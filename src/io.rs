//! Instance and solution formats.
//!
//! An instance is `n m` followed by `m` pairs `u v`, all separated by arbitrary ASCII
//! whitespace. A solution is one line of `n` characters, `'1'` for a selected vertex.

use std::io::{BufRead, Read, Write};

use crate::error::{try_vec, SolveError};
use crate::graph::Graph;
use crate::Solution;

/// Whitespace-separated tokens over an in-memory buffer.
struct Tokens<'a> {
    bytes: &'a [u8],
    pos: usize,
    read: usize,
}

impl<'a> Tokens<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Tokens {
            bytes,
            pos: 0,
            read: 0,
        }
    }

    fn next_token(&mut self) -> Option<&'a [u8]> {
        let bytes = self.bytes;
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos == bytes.len() {
            return None;
        }
        let start = self.pos;
        while self.pos < bytes.len() && !bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        Some(&bytes[start..self.pos])
    }

    fn next_int(&mut self, what: &str) -> Result<i64, SolveError> {
        let token = self.next_token().ok_or_else(|| {
            SolveError::invalid(format!("unexpected end of input, expected {what}"))
        })?;
        self.read += 1;
        std::str::from_utf8(token)
            .ok()
            .and_then(|token| token.parse().ok())
            .ok_or_else(|| {
                SolveError::invalid(format!(
                    "token {} ({}) is not an integer {what}",
                    self.read,
                    String::from_utf8_lossy(token)
                ))
            })
    }

    fn next_count<T: TryFrom<i64>>(&mut self, what: &str) -> Result<T, SolveError> {
        let value = self.next_int(what)?;
        if value < 0 {
            return Err(SolveError::invalid(format!("{what} is negative ({value})")));
        }
        T::try_from(value).map_err(|_| SolveError::invalid(format!("{what} {value} is too large")))
    }
}

/// Reads a whole instance and builds its graph.
pub fn parse_input(mut reader: impl Read) -> Result<Graph, SolveError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let mut tokens = Tokens::new(&bytes);

    let vertex_count: u32 = tokens.next_count("vertex count")?;
    let edge_count: usize = tokens.next_count("edge count")?;

    let mut edges = try_vec::<(u32, u32)>("edge list", edge_count)?;
    for _ in 0..edge_count {
        let start = tokens.next_count("edge endpoint")?;
        let end = tokens.next_count("edge endpoint")?;
        edges.push((start, end));
    }
    if tokens.next_token().is_some() {
        return Err(SolveError::invalid(format!(
            "trailing data after {edge_count} edges"
        )));
    }
    Graph::build(vertex_count, edges)
}

pub fn write_instance(graph: &Graph, mut writer: impl Write) -> std::io::Result<()> {
    writeln!(writer, "{}", graph.vertex_count())?;
    writeln!(writer, "{}", graph.edge_count())?;
    for (start, end) in graph.edges() {
        writeln!(writer, "{start} {end}")?;
    }
    writer.flush()
}

pub fn write_solution(solution: &Solution, mut writer: impl Write) -> std::io::Result<()> {
    writer.write_all(solution.format().as_bytes())?;
    writer.flush()
}

/// Reads a solution for an `n` vertex graph from the last non-empty line of `reader`.
pub fn read_solution(reader: impl BufRead, n: u32) -> Result<Solution, SolveError> {
    let mut last = String::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            last = line.trim().to_owned();
        }
    }
    if last.len() != n as usize {
        return Err(SolveError::invalid(format!(
            "solution has {} characters, expected {n}",
            last.len()
        )));
    }
    let mut vertices = Vec::new();
    for (vertex, c) in last.bytes().enumerate() {
        match c {
            b'1' => vertices.push(vertex as u32),
            b'0' => {}
            other => {
                return Err(SolveError::invalid(format!(
                    "unexpected character {:?} at position {vertex}",
                    other as char
                )))
            }
        }
    }
    Ok(Solution::from_vertices(n, vertices))
}
