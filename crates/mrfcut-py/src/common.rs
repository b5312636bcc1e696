use mrfcut::api::{ExpansionError, FlowError, MrfEdge, MrfError, MrfGraph, MrfNode};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// `(index, potentials)`; `None` marks an impossible label.
pub type PyNode = (usize, Vec<Option<f64>>);
/// `(first, second, row-major L*L potentials)`.
pub type PyEdge = (usize, usize, Vec<Option<f64>>);

pub fn mrf_from_py(nodes: Vec<PyNode>, edges: Vec<PyEdge>) -> PyResult<MrfGraph> {
    let mut mrf = MrfGraph::new();
    for (index, potentials) in nodes {
        let node = MrfNode::new(index, potentials).map_err(map_mrf_err)?;
        mrf.add_node(node).map_err(map_mrf_err)?;
    }
    for (first, second, potentials) in edges {
        let edge = MrfEdge::new(first, second, potentials).map_err(map_mrf_err)?;
        mrf.add_edge(edge).map_err(map_mrf_err)?;
    }
    Ok(mrf)
}

pub fn map_mrf_err(err: MrfError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

pub fn map_flow_err(err: FlowError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

pub fn map_expansion_err(err: ExpansionError) -> PyErr {
    PyValueError::new_err(err.to_string())
}
