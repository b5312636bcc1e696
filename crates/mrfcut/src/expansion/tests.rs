use super::*;
use crate::generate::{PottsGenerator, PottsParams, Topology};
use crate::mrf::{MrfEdge, MrfGraph, MrfNode};
use proptest::prelude::*;

fn node(index: usize, potentials: &[f64]) -> MrfNode {
    MrfNode::from_potentials(index, potentials).unwrap()
}

fn graph(nodes: Vec<MrfNode>, edges: Vec<MrfEdge>) -> MrfGraph {
    let mut g = MrfGraph::new();
    for n in nodes {
        g.add_node(n).unwrap();
    }
    for e in edges {
        g.add_edge(e).unwrap();
    }
    g
}

fn potts(first: usize, second: usize, same: f64, diff: f64) -> MrfEdge {
    MrfEdge::from_potentials(first, second, &[same, diff, diff, same]).unwrap()
}

#[test]
fn isolated_node_moves_to_likelier_label() {
    let mrf = graph(vec![node(0, &[0.9, 0.1])], vec![]);
    let out = AlphaExpander::new(ExpansionCfg::new(2))
        .expand(&mrf, &[1])
        .unwrap();
    assert_eq!(out.assignment, vec![0]);
    assert_eq!(out.score, 0.0);
    assert_eq!(out.energy, 0.0);
}

#[test]
fn strong_smoothing_yields_equal_labels() {
    let mrf = graph(
        vec![node(0, &[0.6, 0.4]), node(1, &[0.4, 0.6])],
        vec![potts(0, 1, 0.9, 0.1)],
    );
    let out = AlphaExpander::new(ExpansionCfg::new(2))
        .expand(&mrf, &[0, 0])
        .unwrap();
    assert_eq!(out.assignment[0], out.assignment[1]);
    assert!(out.score <= out.initial_score);
}

#[test]
fn disagreeing_start_at_unary_minimum_is_kept() {
    let mrf = graph(
        vec![node(0, &[0.6, 0.4]), node(1, &[0.4, 0.6])],
        vec![potts(0, 1, 0.9, 0.1)],
    );
    let out = AlphaExpander::new(ExpansionCfg::new(2))
        .expand(&mrf, &[0, 1])
        .unwrap();
    // Pairwise cost is not scored, so no candidate can beat this start.
    assert_eq!(out.assignment, vec![0, 1]);
    assert_eq!(out.score, 0.0);
    assert!(out.history.is_empty());
    assert_eq!(out.sweeps, 1);
}

#[test]
fn chain_with_peaked_unaries_follows_them() {
    let mrf = graph(
        vec![
            node(0, &[0.8, 0.1, 0.1]),
            node(1, &[0.1, 0.8, 0.1]),
            node(2, &[0.1, 0.1, 0.8]),
        ],
        vec![potts(0, 1, 0.55, 0.45), potts(1, 2, 0.55, 0.45)],
    );
    let out = AlphaExpander::new(ExpansionCfg::new(3))
        .expand(&mrf, &[0, 0, 0])
        .unwrap();
    assert_eq!(out.assignment, vec![0, 1, 2]);
    assert!(out.score.abs() < 1e-12);
    assert_eq!(out.history.len(), 2);
    assert!(out.history[0] > out.history[1]);
}

#[test]
fn repeated_final_candidate_ends_expansion() {
    let params = PottsParams {
        nodes: 6,
        labels: 4,
        topology: Topology::Random { edge_prob: 0.5 },
        smoothness: 0.6,
        missing_prob: 0.1,
    };
    let mrf = PottsGenerator::generate_single(&params, 239).unwrap();
    let out = AlphaExpander::new(ExpansionCfg::new(4))
        .expand(&mrf, &[3, 2, 1, 0, 3, 2])
        .unwrap();
    assert_eq!(out.assignment, vec![0, 0, 0, 2, 0, 0]);
    assert_eq!(out.sweeps, 2);
}

#[test]
fn reduction_builds_named_st_graph() {
    let mrf = graph(
        vec![node(10, &[0.1, 0.9]), node(20, &[0.9, 0.1])],
        vec![potts(10, 20, 0.55, 0.45)],
    );
    let mut binary = alpha_graph(&mrf, &[0, 0], 1);
    assert_eq!(binary.nodes.len(), 2);
    assert_eq!(binary.edges[0].first, 0);
    assert_eq!(binary.edges[0].second, 1);
    assert_eq!(binary.non_submodular_edges(), 0);

    let d = (0.55f64 / 0.45).ln();
    assert!((binary.edges[0].capacity() - 2.0 * d).abs() < 1e-12);

    let st = binary.st_graph().unwrap();
    assert_eq!(st.graph.name(st.source), SOURCE);
    assert_eq!(st.graph.name(st.sink), SINK);
    let names: Vec<&str> = st.graph.edges().map(|(_, e)| e.name.as_str()).collect();
    assert_eq!(names, vec!["10_20", "S_10", "10_T", "S_20", "20_T"]);

    // Node 10 prefers to switch; node 20 prefers to stay.
    let cap = |name: &str| {
        st.graph
            .edges()
            .find(|(_, e)| e.name == name)
            .and_then(|(id, _)| st.graph.edge_value(id, "capacity"))
            .unwrap()
    };
    assert_eq!(cap("S_10"), 0.0);
    assert!(cap("10_T") > 0.0);
    assert!(cap("S_20") > 0.0);
    assert_eq!(cap("20_T"), 0.0);
    assert_eq!(source_edge_name(20), "S_20");
}

#[test]
fn single_step_switches_only_the_willing_node() {
    let mrf = graph(
        vec![node(10, &[0.1, 0.9]), node(20, &[0.9, 0.1])],
        vec![potts(10, 20, 0.55, 0.45)],
    );
    let expander = AlphaExpander::new(ExpansionCfg::new(2));
    assert_eq!(expander.step(&mrf, &[0, 0], 1).unwrap(), vec![1, 0]);
    assert_eq!(expander.step(&mrf, &[0, 0], 0).unwrap(), vec![0, 0]);
}

#[test]
fn single_step_checks_its_inputs() {
    let mrf = graph(
        vec![node(10, &[0.1, 0.9]), node(20, &[0.9, 0.1])],
        vec![potts(10, 20, 0.55, 0.45)],
    );
    let expander = AlphaExpander::new(ExpansionCfg::new(2));
    assert_eq!(
        expander.step(&mrf, &[0, 0], 2).unwrap_err(),
        ExpansionError::AlphaOutOfRange {
            alpha: 2,
            num_labels: 2
        }
    );
    assert_eq!(
        expander.step(&mrf, &[0], 1).unwrap_err(),
        ExpansionError::StartLength {
            expected: 2,
            got: 1
        }
    );
    assert!(matches!(
        expander.step(&mrf, &[0, 5], 1),
        Err(ExpansionError::LabelOutOfRange { position: 1, .. })
    ));
}

#[test]
fn score_counts_endpoints_per_edge() {
    let mut mrf = graph(
        vec![node(0, &[0.5, 0.5]), node(2, &[0.2, 0.8])],
        vec![],
    );
    mrf.add_node(MrfNode::new(1, vec![Some(1.0), None]).unwrap())
        .unwrap();
    mrf.add_edge(potts(0, 1, 0.9, 0.1)).unwrap();

    // Node 2 is isolated and never scored.
    assert_eq!(score(&mrf, &[0, 0, 0]), 0.0);
    // Impossible label costs the fixed penalty.
    assert_eq!(score(&mrf, &[0, 0, 1]), 1.0);

    let unary = (0.8f64 / 0.2).ln();
    assert!((total_energy(&mrf, &[0, 0, 0]) - unary).abs() < 1e-12);
}

#[test]
fn star_center_is_scored_once_per_edge() {
    let mrf = graph(
        vec![
            node(0, &[0.2, 0.8]),
            node(1, &[0.5, 0.5]),
            node(2, &[0.5, 0.5]),
            node(3, &[0.5, 0.5]),
        ],
        vec![
            potts(0, 1, 0.9, 0.1),
            potts(0, 2, 0.9, 0.1),
            potts(0, 3, 0.9, 0.1),
        ],
    );
    let center = (0.8f64 / 0.2).ln();
    assert!((score(&mrf, &[0, 0, 0, 0]) - 3.0 * center).abs() < 1e-12);
    assert_eq!(score(&mrf, &[1, 0, 0, 0]), 0.0);
    // Unary energy counts the center once.
    let pairwise = 3.0 * (0.9f64 / 0.1).ln();
    assert!((total_energy(&mrf, &[1, 0, 0, 0]) - pairwise).abs() < 1e-12);
}

#[test]
fn start_is_validated() {
    let mrf = graph(
        vec![node(0, &[0.5, 0.5]), node(1, &[0.5, 0.5])],
        vec![potts(0, 1, 0.6, 0.4)],
    );
    let expander = AlphaExpander::new(ExpansionCfg::new(2));
    assert_eq!(
        expander.expand(&mrf, &[0]).unwrap_err(),
        ExpansionError::StartLength {
            expected: 2,
            got: 1
        }
    );
    assert!(matches!(
        expander.expand(&mrf, &[0, 2]),
        Err(ExpansionError::LabelOutOfRange { position: 1, .. })
    ));
    assert_eq!(
        AlphaExpander::new(ExpansionCfg::new(0))
            .expand(&mrf, &[0, 0])
            .unwrap_err(),
        ExpansionError::NoLabels
    );
    assert!(matches!(
        AlphaExpander::new(ExpansionCfg::new(3)).expand(&mrf, &[0, 0]),
        Err(ExpansionError::Mrf(MrfError::TooFewLabels { .. }))
    ));
}

#[test]
fn expandability_check_is_opt_in() {
    let mrf = graph(
        vec![node(0, &[0.5, 0.5]), node(1, &[0.5, 0.5])],
        vec![potts(0, 1, 0.1, 0.9)],
    );
    let mut cfg = ExpansionCfg::new(2);
    assert!(AlphaExpander::new(cfg.clone()).expand(&mrf, &[0, 0]).is_ok());
    cfg.check_expandable = true;
    assert!(matches!(
        AlphaExpander::new(cfg).expand(&mrf, &[0, 0]),
        Err(ExpansionError::Mrf(MrfError::NotExpandable { .. }))
    ));
}

#[test]
fn empty_graph_is_a_fixed_point() {
    let mrf: MrfGraph = MrfGraph::new();
    let out = expand(&mrf, &[], 3).unwrap();
    assert!(out.is_empty());
}

fn instance_strategy() -> impl Strategy<Value = (PottsParams, u64, Vec<usize>)> {
    (1usize..8, 1usize..4, 0usize..3, 0.0f64..0.95, any::<u64>()).prop_flat_map(
        |(nodes, labels, topo, smoothness, seed)| {
            let topology = match topo {
                0 => Topology::Chain,
                1 => Topology::Grid { width: 3 },
                _ => Topology::Random { edge_prob: 0.5 },
            };
            let params = PottsParams {
                nodes,
                labels,
                topology,
                smoothness,
                missing_prob: 0.1,
            };
            (
                Just(params),
                Just(seed),
                prop::collection::vec(0..labels, nodes),
            )
        },
    )
}

proptest! {
    #[test]
    fn accepted_scores_never_increase((params, seed, start) in instance_strategy()) {
        let mrf = PottsGenerator::generate_single(&params, seed).unwrap();
        let cfg = ExpansionCfg::new(params.labels);
        let out = AlphaExpander::new(cfg.clone()).expand(&mrf, &start).unwrap();

        prop_assert_eq!(out.assignment.len(), params.nodes);
        prop_assert!(out.assignment.iter().all(|&l| l < params.labels));
        prop_assert!(out.sweeps <= cfg.max_sweeps);
        prop_assert!(out.score <= out.initial_score);
        prop_assert_eq!(out.score, score(&mrf, &out.assignment));
        for w in out.history.windows(2) {
            prop_assert!(w[1] <= w[0]);
        }
        if let Some(&last) = out.history.last() {
            prop_assert_eq!(last, out.score);
        }
    }
}
