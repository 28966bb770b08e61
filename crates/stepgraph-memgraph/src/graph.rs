//! The in-memory graph: labelled, keyed vertices and labelled directed edges
//! with forward and backward indexes.

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use stepgraph_steps::{Hop, TraversalEngine, TraversalPlan};

use crate::error::{MemGraphError, MemGraphResult};
use crate::interner::{LabelId, LabelInterner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct VertexId(u32);

impl VertexId {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct VertexRecord {
    label: LabelId,
    key: String,
}

#[derive(Debug, Clone, Copy)]
struct EdgeRecord {
    source: u32,
    target: u32,
}

/// The id for the entry after `len` existing ones.
fn next_id(len: usize, what: &'static str) -> MemGraphResult<u32> {
    u32::try_from(len).map_err(|_| MemGraphError::Capacity(what))
}

/// Edge storage indexed in both directions.
#[derive(Debug, Default)]
struct EdgeStore {
    edges: Vec<EdgeRecord>,
    /// (source, label) -> edge ids, in insertion order
    forward_index: HashMap<(u32, LabelId), Vec<u32>>,
    /// (target, label) -> edge ids, in insertion order
    backward_index: HashMap<(u32, LabelId), Vec<u32>>,
    /// label -> edge ids
    label_index: HashMap<LabelId, RoaringBitmap>,
}

impl EdgeStore {
    fn add(&mut self, label: LabelId, source: u32, target: u32) -> MemGraphResult<u32> {
        let id = next_id(self.edges.len(), "edges")?;
        self.forward_index.entry((source, label)).or_default().push(id);
        self.backward_index.entry((target, label)).or_default().push(id);
        self.label_index.entry(label).or_default().insert(id);
        self.edges.push(EdgeRecord { source, target });
        Ok(id)
    }

    fn targets(&self, source: u32, label: LabelId) -> impl Iterator<Item = u32> + '_ {
        self.forward_index
            .get(&(source, label))
            .into_iter()
            .flatten()
            .filter_map(|&id| self.edges.get(id as usize))
            .map(|edge| edge.target)
    }

    fn sources(&self, target: u32, label: LabelId) -> impl Iterator<Item = u32> + '_ {
        self.backward_index
            .get(&(target, label))
            .into_iter()
            .flatten()
            .filter_map(|&id| self.edges.get(id as usize))
            .map(|edge| edge.source)
    }

    fn label_count(&self, label: LabelId) -> u64 {
        self.label_index.get(&label).map(RoaringBitmap::len).unwrap_or(0)
    }
}

/// Reference [`TraversalEngine`] over [`VertexId`]s.
///
/// Hop semantics, applied to each origin independently:
/// - `out(L)` / `in(L)`: follow `L` edges forward / backward, in insertion order;
/// - `both(L)`: outgoing targets then incoming sources;
/// - `dedup()`: keep the first occurrence of each vertex;
/// - `limit(n)`: keep the first `n` vertices.
///
/// Results are multisets until a `dedup()` hop removes repeats.
#[derive(Debug, Default)]
pub struct MemGraph {
    labels: LabelInterner,
    vertices: Vec<VertexRecord>,
    keys: HashMap<(LabelId, String), VertexId>,
    edges: EdgeStore,
}

impl MemGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex, or return the existing one with the same label and key.
    /// Ids are `u32`; the graph holds at most `u32::MAX + 1` vertices.
    pub fn add_vertex(&mut self, label: &str, key: &str) -> MemGraphResult<VertexId> {
        let label = self.labels.intern(label);
        if let Some(&id) = self.keys.get(&(label, key.to_string())) {
            return Ok(id);
        }
        let id = VertexId(next_id(self.vertices.len(), "vertices")?);
        self.vertices.push(VertexRecord {
            label,
            key: key.to_string(),
        });
        self.keys.insert((label, key.to_string()), id);
        Ok(id)
    }

    pub fn add_edge(&mut self, label: &str, from: VertexId, to: VertexId) -> MemGraphResult<()> {
        for id in [from, to] {
            self.check(id)?;
        }
        let label_id = self.labels.intern(label);
        let edge = self.edges.add(label_id, from.0, to.0)?;
        tracing::trace!(edge, label, %from, %to, "added edge");
        Ok(())
    }

    pub fn lookup(&self, label: &str, key: &str) -> Option<VertexId> {
        let label = self.labels.id_of(label)?;
        self.keys.get(&(label, key.to_string())).copied()
    }

    /// Label and key of a vertex.
    pub fn vertex(&self, id: VertexId) -> MemGraphResult<(String, &str)> {
        let record = self
            .vertices
            .get(id.0 as usize)
            .ok_or(MemGraphError::UnknownVertex(id))?;
        let label = self.labels.lookup(record.label).unwrap_or_default();
        Ok((label, record.key.as_str()))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.edges.len()
    }

    /// Number of edges carrying `label`.
    pub fn edge_count_for(&self, label: &str) -> u64 {
        self.labels
            .id_of(label)
            .map(|id| self.edges.label_count(id))
            .unwrap_or(0)
    }

    fn check(&self, id: VertexId) -> MemGraphResult<()> {
        if (id.0 as usize) < self.vertices.len() {
            Ok(())
        } else {
            Err(MemGraphError::UnknownVertex(id))
        }
    }

    fn apply(&self, frontier: Vec<u32>, hop: &Hop) -> Vec<u32> {
        let edges_for = |label: &str| self.labels.id_of(label);
        match hop {
            Hop::Out { label } => match edges_for(label.as_str()) {
                Some(label) => frontier
                    .iter()
                    .flat_map(|&v| self.edges.targets(v, label))
                    .collect(),
                None => Vec::new(),
            },
            Hop::In { label } => match edges_for(label.as_str()) {
                Some(label) => frontier
                    .iter()
                    .flat_map(|&v| self.edges.sources(v, label))
                    .collect(),
                None => Vec::new(),
            },
            Hop::Both { label } => match edges_for(label.as_str()) {
                Some(label) => frontier
                    .iter()
                    .flat_map(|&v| self.edges.targets(v, label).chain(self.edges.sources(v, label)))
                    .collect(),
                None => Vec::new(),
            },
            Hop::Dedup => {
                let mut seen = RoaringBitmap::new();
                frontier.into_iter().filter(|&v| seen.insert(v)).collect()
            }
            Hop::Limit { max } => {
                let mut frontier = frontier;
                frontier.truncate(*max);
                frontier
            }
        }
    }
}

impl TraversalEngine for MemGraph {
    type Element = VertexId;
    type Error = MemGraphError;

    fn traverse(
        &self,
        origins: Vec<VertexId>,
        plan: &TraversalPlan,
    ) -> Result<Vec<Vec<VertexId>>, MemGraphError> {
        tracing::debug!(origins = origins.len(), %plan, "memgraph traversal");
        origins
            .into_iter()
            .map(|origin| -> MemGraphResult<Vec<VertexId>> {
                self.check(origin)?;
                let reached = plan
                    .hops()
                    .iter()
                    .fold(vec![origin.0], |frontier, hop| self.apply(frontier, hop));
                Ok(reached.into_iter().map(VertexId).collect())
            })
            .collect()
    }
}
