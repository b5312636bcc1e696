//! Criterion benchmarks for alpha-expansion on random Potts grids.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mrfcut::expansion::{AlphaExpander, ExpansionCfg};
use mrfcut::generate::{PottsGenerator, PottsParams, Topology};

fn bench_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("expansion_grid");
    for &side in &[4usize, 8, 12] {
        let params = PottsParams {
            nodes: side * side,
            labels: 4,
            topology: Topology::Grid { width: side },
            smoothness: 0.5,
            missing_prob: 0.0,
        };
        let mrf = PottsGenerator::generate_single(&params, 99).unwrap();
        let start = vec![0usize; mrf.node_count()];
        let expander = AlphaExpander::new(ExpansionCfg::new(params.labels));
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            b.iter(|| black_box(expander.expand(&mrf, &start).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_expansion);
criterion_main!(benches);
