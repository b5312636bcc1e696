//! PyO3 bindings for selected `mrfcut` functions.
//!
//! Notes
//! - Keep bindings thin and predictable: MRFs cross the boundary as plain
//!   tuples of indices and potentials; errors surface as `ValueError`.

use mrfcut::api::{score, st_min_cut, AlphaExpander, ExpansionCfg, MinCutCfg, UndirectedGraph};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

mod common;

use common::{map_expansion_err, map_flow_err, mrf_from_py, PyEdge, PyNode};

/// Run alpha-expansion; returns `(assignment, score)` in node order.
#[pyfunction]
#[pyo3(signature = (nodes, edges, num_labels, start=None, check_expandable=false))]
fn expand_labels(
    nodes: Vec<PyNode>,
    edges: Vec<PyEdge>,
    num_labels: usize,
    start: Option<Vec<usize>>,
    check_expandable: bool,
) -> PyResult<(Vec<usize>, f64)> {
    let mrf = mrf_from_py(nodes, edges)?;
    let start = start.unwrap_or_else(|| vec![0; mrf.node_count()]);
    let cfg = ExpansionCfg {
        check_expandable,
        ..ExpansionCfg::new(num_labels)
    };
    let out = AlphaExpander::new(cfg)
        .expand(&mrf, &start)
        .map_err(map_expansion_err)?;
    Ok((out.assignment, out.score))
}

/// Move score of an assignment (endpoint node energies summed per edge).
#[pyfunction]
fn mrf_score(nodes: Vec<PyNode>, edges: Vec<PyEdge>, assignment: Vec<usize>) -> PyResult<f64> {
    let mrf = mrf_from_py(nodes, edges)?;
    if assignment.len() != mrf.node_count() {
        return Err(PyValueError::new_err("assignment needs one label per node"));
    }
    mrf.validate(assignment.iter().map(|&l| l + 1).max().unwrap_or(0))
        .map_err(common::map_mrf_err)?;
    Ok(score(&mrf, &assignment))
}

/// Minimum s-t cut of an undirected graph on vertices `0..num_vertices`.
/// Returns `(value, source_side_vertices)`.
#[pyfunction]
fn st_min_cut_value(
    num_vertices: usize,
    edges: Vec<(usize, usize, f64)>,
    source: usize,
    sink: usize,
) -> PyResult<(f64, Vec<usize>)> {
    let mut g = UndirectedGraph::new();
    let ids: Vec<_> = (0..num_vertices).map(|i| g.add_vertex(i.to_string())).collect();
    let vertex = |i: usize| {
        ids.get(i)
            .copied()
            .ok_or_else(|| PyValueError::new_err(format!("vertex {i} out of range")))
    };
    for (k, &(a, b, cap)) in edges.iter().enumerate() {
        g.add_edge(vertex(a)?, vertex(b)?, format!("e{k}"), cap)
            .map_err(map_flow_err)?;
    }
    let cut = st_min_cut(&g, vertex(source)?, vertex(sink)?, &MinCutCfg::default())
        .map_err(map_flow_err)?;
    Ok((
        cut.min_cut_value(),
        cut.vertex_set_cut_min().into_iter().map(|v| v.0).collect(),
    ))
}

#[pymodule]
fn mrfcut_native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(expand_labels, m)?)?;
    m.add_function(wrap_pyfunction!(mrf_score, m)?)?;
    m.add_function(wrap_pyfunction!(st_min_cut_value, m)?)?;
    m.add("VERSION", mrfcut::VERSION)?;
    Ok(())
}
