//! Edmonds-Karp maximum flow / minimum s-t cut on a `FlowGraph`.
//!
//! Labeling runs FIFO from the source. A vertex's scratch value holds the
//! signed amount that can reach it: positive when labeled along an arc with
//! spare capacity, negative when labeled backwards along an arc carrying flow
//! (a correction that pushes flow back). Once the sink is labeled the chain of
//! recorded arcs is augmented by the sink's value and labeling restarts. When
//! the worklist drains without reaching the sink, the labeled vertices form
//! the source side of a minimum cut.

use std::collections::VecDeque;

use super::graph::{FlowGraph, DEFAULT_CAPACITY_KEY};
use super::{ArcId, FlowError, VertexId};

/// Value given to the source when labeling starts; only ever enters
/// `min(|value|, residual)`.
pub const DEFAULT_INFINITY: f64 = f64::MAX;

/// Solver configuration.
#[derive(Clone, Debug)]
pub struct MinCutCfg {
    /// Arc attribute read as capacity.
    pub capacity_key: String,
    /// Must exceed the total capacity of the graph.
    pub infinity: f64,
}

impl Default for MinCutCfg {
    fn default() -> Self {
        Self {
            capacity_key: DEFAULT_CAPACITY_KEY.to_string(),
            infinity: DEFAULT_INFINITY,
        }
    }
}

/// Outcome of a min-cut run: max flow per arc plus the cut it certifies.
#[derive(Clone, Debug)]
pub struct MinCutResult {
    source: VertexId,
    sink: VertexId,
    source_side: Vec<bool>,
    cut_arcs: Vec<ArcId>,
    cut_value: f64,
    flow: Vec<f64>,
    flow_value: f64,
    augmentations: usize,
}

impl MinCutResult {
    /// Vertices labeled at termination (source side; contains the source, never the sink).
    pub fn vertex_set_cut_min(&self) -> Vec<VertexId> {
        self.source_side
            .iter()
            .enumerate()
            .filter(|(_, &on)| on)
            .map(|(i, _)| VertexId(i))
            .collect()
    }

    #[inline]
    pub fn is_source_side(&self, v: VertexId) -> bool {
        self.source_side.get(v.0).copied().unwrap_or(false)
    }

    /// Arcs from a labeled to an unlabeled vertex; all saturated.
    #[inline]
    pub fn arc_set_cut_min(&self) -> &[ArcId] {
        &self.cut_arcs
    }

    /// Sum of capacities over `arc_set_cut_min`.
    #[inline]
    pub fn min_cut_value(&self) -> f64 {
        self.cut_value
    }

    /// Flow per arc, indexed by `ArcId`.
    #[inline]
    pub fn flow(&self) -> &[f64] {
        &self.flow
    }

    /// Net flow leaving the source.
    #[inline]
    pub fn flow_value(&self) -> f64 {
        self.flow_value
    }

    #[inline]
    pub fn augmentations(&self) -> usize {
        self.augmentations
    }

    #[inline]
    pub fn source(&self) -> VertexId {
        self.source
    }

    #[inline]
    pub fn sink(&self) -> VertexId {
        self.sink
    }
}

/// Compute a maximum `s`-`t` flow and the corresponding minimum cut.
///
/// Uses the vertices' scratch values for labeling; their previous contents are
/// overwritten. A sink unreachable from the source yields the cut `{s}` with
/// value 0.
pub fn min_cut(
    g: &mut FlowGraph,
    s: VertexId,
    t: VertexId,
    cfg: &MinCutCfg,
) -> Result<MinCutResult, FlowError> {
    MinCut::new(g, s, t, cfg)?.run()
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Label {
    Unlabeled,
    Root,
    Via(ArcId),
}

struct MinCut<'a> {
    g: &'a mut FlowGraph,
    s: VertexId,
    t: VertexId,
    infinity: f64,
    capacity: Vec<f64>,
    flow: Vec<f64>,
    label: Vec<Label>,
}

impl<'a> MinCut<'a> {
    fn new(
        g: &'a mut FlowGraph,
        s: VertexId,
        t: VertexId,
        cfg: &MinCutCfg,
    ) -> Result<Self, FlowError> {
        g.vertex(s)?;
        g.vertex(t)?;
        if s == t {
            return Err(FlowError::SourceIsSink { vertex: s });
        }
        let capacity = g
            .arc_ids()
            .map(|a| match g.arc_value(a, &cfg.capacity_key) {
                Some(c) if c.is_nan() => Err(FlowError::InvalidCapacity { value: c }),
                Some(c) => Ok(c),
                None => Err(FlowError::MissingCapacity {
                    arc: a,
                    key: cfg.capacity_key.clone(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let n = g.vertex_count();
        Ok(Self {
            flow: vec![0.0; capacity.len()],
            capacity,
            label: vec![Label::Unlabeled; n],
            g,
            s,
            t,
            infinity: cfg.infinity,
        })
    }

    fn run(mut self) -> Result<MinCutResult, FlowError> {
        let mut scan = VecDeque::new();
        let mut augmentations = 0usize;
        self.restart(&mut scan);
        while let Some(v) = scan.pop_front() {
            self.scan_vertex(v, &mut scan);
            if self.label[self.t.0] != Label::Unlabeled {
                self.augment();
                augmentations += 1;
                self.restart(&mut scan);
            }
        }
        Ok(self.finish(augmentations))
    }

    fn scan_vertex(&mut self, v: VertexId, scan: &mut VecDeque<VertexId>) {
        let reach = self.g.vertex_value(v).abs();
        for i in 0..self.g.incoming(v).len() {
            let a = self.g.incoming(v)[i];
            let u = self.g.arc(a).tail;
            let x = self.flow[a.0];
            if x > 0.0 && self.label[u.0] == Label::Unlabeled {
                self.g.set_vertex_value(u, -reach.min(x));
                self.label[u.0] = Label::Via(a);
                scan.push_back(u);
            }
        }
        for i in 0..self.g.outgoing(v).len() {
            let a = self.g.outgoing(v)[i];
            let w = self.g.arc(a).head;
            let residual = self.capacity[a.0] - self.flow[a.0];
            if residual > 0.0 && self.label[w.0] == Label::Unlabeled {
                self.g.set_vertex_value(w, reach.min(residual));
                self.label[w.0] = Label::Via(a);
                scan.push_back(w);
            }
        }
    }

    /// Push the sink's value back along the recorded chain.
    fn augment(&mut self) {
        let delta = self.g.vertex_value(self.t).abs();
        let mut v = self.t;
        while v != self.s {
            let Label::Via(a) = self.label[v.0] else {
                break;
            };
            let arc = self.g.arc(a);
            if self.g.vertex_value(v) > 0.0 {
                self.flow[a.0] += delta;
                v = arc.tail;
            } else {
                self.flow[a.0] -= delta;
                v = arc.head;
            }
        }
    }

    fn restart(&mut self, scan: &mut VecDeque<VertexId>) {
        for i in 0..self.label.len() {
            if self.label[i] != Label::Unlabeled {
                self.label[i] = Label::Unlabeled;
                self.g.set_vertex_value(VertexId(i), 0.0);
            }
        }
        self.label[self.s.0] = Label::Root;
        self.g.set_vertex_value(self.s, self.infinity);
        scan.clear();
        scan.push_back(self.s);
    }

    fn finish(self, augmentations: usize) -> MinCutResult {
        let source_side: Vec<bool> = self.label.iter().map(|l| *l != Label::Unlabeled).collect();
        let mut cut_arcs = Vec::new();
        let mut cut_value = 0.0;
        for a in self.g.arc_ids() {
            let arc = self.g.arc(a);
            if source_side[arc.tail.0] && !source_side[arc.head.0] {
                cut_arcs.push(a);
                cut_value += self.capacity[a.0];
            }
        }
        let out: f64 = self.g.outgoing(self.s).iter().map(|a| self.flow[a.0]).sum();
        let back: f64 = self.g.incoming(self.s).iter().map(|a| self.flow[a.0]).sum();
        tracing::trace!(augmentations, cut_value, "min cut");
        MinCutResult {
            source: self.s,
            sink: self.t,
            source_side,
            cut_arcs,
            cut_value,
            flow: self.flow,
            flow_value: out - back,
            augmentations,
        }
    }
}
