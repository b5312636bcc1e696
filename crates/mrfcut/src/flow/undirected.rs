//! Undirected capacitated graph, lowered to a `FlowGraph` for solving.

use std::collections::HashMap;

use super::graph::{FlowGraph, DEFAULT_CAPACITY_KEY};
use super::{EdgeId, FlowError, VertexId};

/// Undirected edge `{a, b}` with named numeric attributes.
#[derive(Clone, Debug)]
pub struct Edge {
    pub ends: (VertexId, VertexId),
    pub name: String,
    pub values: HashMap<String, f64>,
}

impl Edge {
    /// The endpoint opposite to `v` (`v` itself for a loop).
    #[inline]
    pub fn other(&self, v: VertexId) -> VertexId {
        if self.ends.0 == v {
            self.ends.1
        } else {
            self.ends.0
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UndirectedGraph {
    names: Vec<String>,
    edges: Vec<Edge>,
    incident: Vec<Vec<EdgeId>>,
}

impl UndirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, name: impl Into<String>) -> VertexId {
        let id = VertexId(self.names.len());
        self.names.push(name.into());
        self.incident.push(Vec::new());
        id
    }

    /// Add edge `{a, b}` with `capacity` under [`DEFAULT_CAPACITY_KEY`].
    pub fn add_edge(
        &mut self,
        a: VertexId,
        b: VertexId,
        name: impl Into<String>,
        capacity: f64,
    ) -> Result<EdgeId, FlowError> {
        for v in [a, b] {
            if v.0 >= self.names.len() {
                return Err(FlowError::UnknownVertex { vertex: v });
            }
        }
        if capacity.is_nan() {
            return Err(FlowError::InvalidCapacity { value: capacity });
        }
        let id = EdgeId(self.edges.len());
        let mut values = HashMap::with_capacity(1);
        values.insert(DEFAULT_CAPACITY_KEY.to_string(), capacity);
        self.edges.push(Edge {
            ends: (a, b),
            name: name.into(),
            values,
        });
        self.incident[a.0].push(id);
        if b != a {
            self.incident[b.0].push(id);
        }
        Ok(id)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn name(&self, v: VertexId) -> &str {
        &self.names[v.0]
    }

    #[inline]
    pub fn edge(&self, e: EdgeId) -> &Edge {
        &self.edges[e.0]
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    #[inline]
    pub fn incident(&self, v: VertexId) -> &[EdgeId] {
        &self.incident[v.0]
    }

    pub fn edge_value(&self, e: EdgeId, key: &str) -> Option<f64> {
        self.edges[e.0].values.get(key).copied()
    }

    pub fn set_edge_value(&mut self, e: EdgeId, key: &str, value: f64) {
        self.edges[e.0].values.insert(key.to_string(), value);
    }

    /// Directed view: same vertices, and for every edge `{a, b}` the arcs
    /// `a → b` and `b → a`, both carrying the edge's `key` value as capacity.
    pub fn to_directed(&self, key: &str) -> Result<FlowGraph, FlowError> {
        let mut g = FlowGraph::new();
        for name in &self.names {
            g.add_vertex(name.as_str());
        }
        for (id, e) in self.edges() {
            let cap = e.values.get(key).copied().unwrap_or(0.0);
            let (a, b) = e.ends;
            for (tail, head) in [(a, b), (b, a)] {
                let arc = g.add_named_arc(tail, head, e.name.as_str(), cap)?;
                g.set_arc_value(arc, key, cap);
                g.tag_edge(arc, id);
            }
        }
        Ok(g)
    }

    /// Drop all vertices and edges, releasing their storage.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
