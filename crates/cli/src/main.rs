use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mrfcut::api::{
    score, AlphaExpander, ExpansionCfg, MrfGenerator, PottsGenerator, PottsParams, Topology,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod output;
mod provenance;

use input::MrfFile;
use provenance::{code_rev, Sidecar};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Alpha-expansion labeling of pairwise MRFs")]
struct Cmd {
    /// Free-form run tag; propagated to provenance sidecars and logs
    #[arg(long, global = true)]
    tag: Option<String>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Label an MRF read from JSON and write the assignment table
    Solve {
        #[arg(long)]
        input: PathBuf,
        /// `.csv` or `.parquet`
        #[arg(long)]
        out: PathBuf,
        /// Label count; defaults to the file's `num_labels`
        #[arg(long)]
        labels: Option<usize>,
        /// CSV with columns `node,label`; all zeros if omitted
        #[arg(long)]
        start: Option<PathBuf>,
        /// Reject pairwise tables that are not expandable
        #[arg(long)]
        check: bool,
        #[arg(long, default_value_t = mrfcut::expansion::DEFAULT_MAX_SWEEPS)]
        max_sweeps: usize,
    },
    /// Write a random Potts MRF as JSON
    Random {
        #[arg(long)]
        nodes: usize,
        #[arg(long)]
        labels: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = TopologyArg::Chain)]
        topology: TopologyArg,
        /// Row length for `grid`
        #[arg(long, default_value_t = 8)]
        width: usize,
        /// Edge probability for `random`
        #[arg(long, default_value_t = 0.2)]
        edge_prob: f64,
        #[arg(long, default_value_t = 0.3)]
        smoothness: f64,
        #[arg(long, default_value_t = 0.0)]
        missing_prob: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TopologyArg {
    Chain,
    Grid,
    Random,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Solve {
            input,
            out,
            labels,
            start,
            check,
            max_sweeps,
        } => solve(
            SolveArgs {
                input,
                out,
                labels,
                start,
                check,
                max_sweeps,
            },
            cmd.tag,
        ),
        Action::Random {
            nodes,
            labels,
            seed,
            topology,
            width,
            edge_prob,
            smoothness,
            missing_prob,
            out,
        } => {
            let topology = match topology {
                TopologyArg::Chain => Topology::Chain,
                TopologyArg::Grid => Topology::Grid { width },
                TopologyArg::Random => Topology::Random { edge_prob },
            };
            let params = PottsParams {
                nodes,
                labels,
                topology,
                smoothness,
                missing_prob,
            };
            random(params, seed, out, cmd.tag)
        }
        Action::Report => report(cmd.tag),
    }
}

struct SolveArgs {
    input: PathBuf,
    out: PathBuf,
    labels: Option<usize>,
    start: Option<PathBuf>,
    check: bool,
    max_sweeps: usize,
}

fn solve(args: SolveArgs, tag: Option<String>) -> Result<()> {
    tracing::info!(input = %args.input.display(), out = %args.out.display(), tag = ?tag, "solve");
    let file = MrfFile::load(&args.input)?;
    let num_labels = args.labels.unwrap_or(file.num_labels);
    let mrf = file.to_graph()?;
    tracing::info!(
        nodes = mrf.node_count(),
        edges = mrf.edge_count(),
        labels = num_labels,
        "loaded"
    );

    let start = match &args.start {
        Some(path) => output::read_start(path, &mrf)?,
        None => vec![0; mrf.node_count()],
    };
    if start.iter().any(|&l| l >= num_labels) {
        bail!("start labels must be below {num_labels}");
    }

    let cfg = ExpansionCfg {
        check_expandable: args.check,
        max_sweeps: args.max_sweeps,
        ..ExpansionCfg::new(num_labels)
    };
    let result = AlphaExpander::new(cfg)
        .expand(&mrf, &start)
        .context("expansion failed")?;

    let mut df = output::assignment_frame(&mrf, &result.assignment)?;
    output::write_table(&mut df, &args.out)?;

    let sidecar = Sidecar::new(
        "solve",
        json!({
            "input": args.input.to_string_lossy(),
            "labels": num_labels,
            "start": args.start.as_ref().map(|p| p.to_string_lossy().into_owned()),
            "check_expandable": args.check,
            "max_sweeps": args.max_sweeps,
        }),
    )
    .with_result(json!({
        "initial_score": result.initial_score,
        "score": result.score,
        "energy": result.energy,
        "sweeps": result.sweeps,
        "moves": result.history.len(),
    }))
    .with_tag(tag)
    .write(&args.out)?;
    tracing::info!(
        score = result.score,
        energy = result.energy,
        sidecar = %sidecar.display(),
        "solved"
    );
    Ok(())
}

fn random(params: PottsParams, seed: u64, out: PathBuf, tag: Option<String>) -> Result<()> {
    tracing::info!(nodes = params.nodes, labels = params.labels, seed, tag = ?tag, "random");
    let mut generator = PottsGenerator::new(params.clone(), seed)?;
    let sample = generator.generate_next()?;
    let file = MrfFile::from_graph(&sample.mrf, params.labels);
    file.save(&out)?;

    let zeros = vec![0; sample.mrf.node_count()];
    Sidecar::new(
        "random",
        json!({
            "nodes": params.nodes,
            "labels": params.labels,
            "topology": format!("{:?}", params.topology),
            "smoothness": params.smoothness,
            "missing_prob": params.missing_prob,
            "seed": seed,
            "sample_seed": sample.replay.seed,
        }),
    )
    .with_result(json!({
        "edges": sample.mrf.edge_count(),
        "zero_start_score": score(&sample.mrf, &zeros),
    }))
    .with_tag(tag)
    .write(&out)?;
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let obj = json!({
        "code_rev": code_rev(),
        "mrfcut_version": mrfcut::VERSION,
        "tags": tag.into_iter().collect::<Vec<_>>(),
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
