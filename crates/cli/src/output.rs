//! Assignment tables: written as CSV or Parquet, start labels read from CSV.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use mrfcut::api::MrfGraph;
use polars::prelude::*;

/// One row per node in graph order: `node`, `label`, `energy` (unary energy at
/// the label).
pub fn assignment_frame(mrf: &MrfGraph, assignment: &[usize]) -> PolarsResult<DataFrame> {
    let nodes: Vec<u64> = mrf.nodes().iter().map(|n| n.index() as u64).collect();
    let labels: Vec<u64> = assignment.iter().map(|&l| l as u64).collect();
    let energies: Vec<f64> = mrf
        .nodes()
        .iter()
        .zip(assignment)
        .map(|(n, &l)| n.energy(l))
        .collect();
    df!(
        "node" => nodes,
        "label" => labels,
        "energy" => energies
    )
}

/// Write `df` as Parquet when `path` ends in `.parquet`, CSV otherwise.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    if path.extension().is_some_and(|ext| ext == "parquet") {
        ParquetWriter::new(file).finish(df)?;
    } else {
        CsvWriter::new(file).include_header(true).finish(df)?;
    }
    Ok(())
}

/// Read a start assignment from a CSV with columns `node,label`. Every graph
/// node must appear; the result follows graph order.
pub fn read_start(path: &Path, mrf: &MrfGraph) -> Result<Vec<usize>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .select([
            col("node").cast(DataType::UInt64),
            col("label").cast(DataType::UInt64),
        ])
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!(rows = df.height(), "start_csv_shape");

    let mut start: Vec<Option<usize>> = vec![None; mrf.node_count()];
    let nodes = df.column("node")?.u64()?;
    let labels = df.column("label")?.u64()?;
    for (node, label) in nodes.into_iter().zip(labels.into_iter()) {
        let (Some(node), Some(label)) = (node, label) else {
            bail!("{}: empty node or label cell", path.display());
        };
        let position = mrf
            .position_of(node as usize)
            .ok_or_else(|| anyhow!("{}: unknown node {node}", path.display()))?;
        start[position] = Some(label as usize);
    }
    start
        .into_iter()
        .enumerate()
        .map(|(pos, label)| {
            label.ok_or_else(|| {
                anyhow!(
                    "{}: no label for node {}",
                    path.display(),
                    mrf.nodes()[pos].index()
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrfcut::api::MrfNode;
    use tempfile::tempdir;

    fn three_nodes() -> MrfGraph {
        let mut mrf = MrfGraph::new();
        for index in [5, 2, 9] {
            mrf.add_node(MrfNode::from_potentials(index, &[0.5, 0.25]).unwrap())
                .unwrap();
        }
        mrf
    }

    #[test]
    fn frame_has_one_row_per_node() {
        let mrf = three_nodes();
        let df = assignment_frame(&mrf, &[0, 1, 0]).unwrap();
        assert_eq!(df.shape(), (3, 3));
        assert_eq!(df.get_column_names(), &["node", "label", "energy"]);
    }

    #[test]
    fn written_csv_reads_back_as_start() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/assign.csv");
        let mrf = three_nodes();
        let mut df = assignment_frame(&mrf, &[1, 0, 1]).unwrap();
        write_table(&mut df, &path).unwrap();
        assert_eq!(read_start(&path, &mrf).unwrap(), vec![1, 0, 1]);
    }

    #[test]
    fn start_rows_may_come_in_any_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("start.csv");
        fs::write(&path, "node,label\n9,1\n5,0\n2,1\n").unwrap();
        assert_eq!(read_start(&path, &three_nodes()).unwrap(), vec![0, 1, 1]);
    }

    #[test]
    fn missing_node_in_start_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("start.csv");
        fs::write(&path, "node,label\n9,1\n5,0\n").unwrap();
        let err = read_start(&path, &three_nodes()).unwrap_err();
        assert!(err.to_string().contains("no label for node 2"));
    }

    #[test]
    fn parquet_extension_selects_parquet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assign.parquet");
        let mrf = three_nodes();
        let mut df = assignment_frame(&mrf, &[0, 0, 0]).unwrap();
        write_table(&mut df, &path).unwrap();
        let back = ParquetReader::new(File::open(&path).unwrap())
            .finish()
            .unwrap();
        assert_eq!(back.shape(), (3, 3));
    }
}
