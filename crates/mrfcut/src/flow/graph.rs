//! Directed capacitated graph used by the min-cut solver.

use std::collections::HashMap;

use super::{ArcId, EdgeId, FlowError, VertexId};

/// Attribute name under which capacities are stored unless told otherwise.
pub const DEFAULT_CAPACITY_KEY: &str = "capacity";

/// Vertex with a display name and a scratch value for solver bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct Vertex {
    pub name: String,
    pub value: f64,
}

/// Directed arc `tail → head` with named numeric attributes.
#[derive(Clone, Debug)]
pub struct Arc {
    pub tail: VertexId,
    pub head: VertexId,
    pub name: String,
    pub values: HashMap<String, f64>,
    /// Undirected edge this arc was lowered from, if any.
    pub edge: Option<EdgeId>,
}

/// Directed graph with per-vertex in/out adjacency.
#[derive(Clone, Debug, Default)]
pub struct FlowGraph {
    vertices: Vec<Vertex>,
    arcs: Vec<Arc>,
    incoming: Vec<Vec<ArcId>>,
    outgoing: Vec<Vec<ArcId>>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, name: impl Into<String>) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex {
            name: name.into(),
            value: 0.0,
        });
        self.incoming.push(Vec::new());
        self.outgoing.push(Vec::new());
        id
    }

    /// Add `tail → head` with `capacity` stored under [`DEFAULT_CAPACITY_KEY`].
    pub fn add_arc(
        &mut self,
        tail: VertexId,
        head: VertexId,
        capacity: f64,
    ) -> Result<ArcId, FlowError> {
        let name = format!("{}_{}", self.vertex(tail)?.name, self.vertex(head)?.name);
        self.add_named_arc(tail, head, name, capacity)
    }

    pub fn add_named_arc(
        &mut self,
        tail: VertexId,
        head: VertexId,
        name: impl Into<String>,
        capacity: f64,
    ) -> Result<ArcId, FlowError> {
        self.vertex(tail)?;
        self.vertex(head)?;
        if capacity.is_nan() {
            return Err(FlowError::InvalidCapacity { value: capacity });
        }
        let id = ArcId(self.arcs.len());
        let mut values = HashMap::with_capacity(1);
        values.insert(DEFAULT_CAPACITY_KEY.to_string(), capacity);
        self.arcs.push(Arc {
            tail,
            head,
            name: name.into(),
            values,
            edge: None,
        });
        self.outgoing[tail.0].push(id);
        self.incoming[head.0].push(id);
        Ok(id)
    }

    pub(crate) fn tag_edge(&mut self, arc: ArcId, edge: EdgeId) {
        self.arcs[arc.0].edge = Some(edge);
    }

    pub fn vertex(&self, v: VertexId) -> Result<&Vertex, FlowError> {
        self.vertices
            .get(v.0)
            .ok_or(FlowError::UnknownVertex { vertex: v })
    }

    #[inline]
    pub fn arc(&self, a: ArcId) -> &Arc {
        &self.arcs[a.0]
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId)
    }

    pub fn arc_ids(&self) -> impl Iterator<Item = ArcId> {
        (0..self.arcs.len()).map(ArcId)
    }

    #[inline]
    pub fn incoming(&self, v: VertexId) -> &[ArcId] {
        &self.incoming[v.0]
    }

    #[inline]
    pub fn outgoing(&self, v: VertexId) -> &[ArcId] {
        &self.outgoing[v.0]
    }

    /// Arcs `from → to` (parallel arcs are allowed).
    pub fn arcs_between(&self, from: VertexId, to: VertexId) -> impl Iterator<Item = ArcId> + '_ {
        self.outgoing[from.0]
            .iter()
            .copied()
            .filter(move |&a| self.arcs[a.0].head == to)
    }

    pub fn find_vertex(&self, name: &str) -> Option<VertexId> {
        self.vertices
            .iter()
            .position(|v| v.name == name)
            .map(VertexId)
    }

    pub fn arc_value(&self, a: ArcId, key: &str) -> Option<f64> {
        self.arcs[a.0].values.get(key).copied()
    }

    pub fn set_arc_value(&mut self, a: ArcId, key: &str, value: f64) {
        self.arcs[a.0].values.insert(key.to_string(), value);
    }

    /// Capacity under [`DEFAULT_CAPACITY_KEY`] (0 if unset).
    #[inline]
    pub fn capacity(&self, a: ArcId) -> f64 {
        self.arc_value(a, DEFAULT_CAPACITY_KEY).unwrap_or(0.0)
    }

    #[inline]
    pub fn vertex_value(&self, v: VertexId) -> f64 {
        self.vertices[v.0].value
    }

    #[inline]
    pub fn set_vertex_value(&mut self, v: VertexId, value: f64) {
        self.vertices[v.0].value = value;
    }

    /// Drop all vertices, arcs and adjacency, releasing their storage.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
