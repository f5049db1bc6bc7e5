//! Market Network Sim - Main binary
//!
//! Builds a directed trader network, runs the price simulation and prints
//! the price series.
//!
//! # Output
//!
//! Without `--output`, prices go to stdout as `step,price` CSV. With
//! `--output`, a JSON report (config, seed, prices, metrics, final trader
//! states) is written to the given file. A short summary is always logged.

mod config;
mod topology;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use agents::{AveragingRule, InfluenceThresholdRule, UpdateRule};
use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use simulation::{
    ClearingQuote, MeanSignal, MetricsHook, MetricsSnapshot, PriceAggregator, Simulation,
    SimulationConfig,
};
use tracing::info;
use types::Position;

use config::{Preset, RuleKind, SimConfig, Topology};

/// Market Network Sim - trader network price simulation
#[derive(Parser, Debug)]
#[command(name = "market-network-sim")]
#[command(about = "Simulate prices produced by a network of interacting traders")]
#[command(version)]
struct Args {
    /// JSON config file (missing fields take defaults)
    #[arg(long, env = "SIM_CONFIG", conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Start from a named preset
    #[arg(long, value_enum, env = "SIM_PRESET")]
    preset: Option<Preset>,

    /// Number of traders
    #[arg(long, env = "SIM_TRADERS")]
    traders: Option<usize>,

    /// Edge probability for the random topology
    #[arg(long, env = "SIM_EDGE_PROBABILITY")]
    edge_probability: Option<f64>,

    /// Network shape
    #[arg(long, value_enum, env = "SIM_TOPOLOGY")]
    topology: Option<Topology>,

    /// Steps to run
    #[arg(long, env = "SIM_STEPS")]
    steps: Option<u64>,

    /// RNG seed (random if unset)
    #[arg(long, env = "SIM_SEED")]
    seed: Option<u64>,

    /// Update rule
    #[arg(long, value_enum, env = "SIM_RULE")]
    rule: Option<RuleKind>,

    /// Write a JSON report here instead of CSV to stdout
    #[arg(short, long, env = "SIM_OUTPUT")]
    output: Option<PathBuf>,

    /// Log every step
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Resolve the run config: file or preset first, then overrides.
    fn resolve(&self) -> anyhow::Result<SimConfig> {
        let mut config = match (&self.config, self.preset) {
            (Some(path), _) => SimConfig::load(path)?,
            (None, Some(preset)) => SimConfig::from_preset(preset),
            (None, None) => SimConfig::default(),
        };

        if let Some(traders) = self.traders {
            config.traders = traders;
        }
        if let Some(p) = self.edge_probability {
            config.edge_probability = p;
        }
        if let Some(topology) = self.topology {
            config.topology = topology;
        }
        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(rule) = self.rule {
            config.rule = rule;
        }
        config.verbose |= self.verbose;

        config.validate()?;
        Ok(config)
    }
}

/// Final state of one trader, for the report.
#[derive(Debug, Serialize)]
struct TraderSummary {
    label: usize,
    signal: f64,
    position: Position,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    config: &'a SimConfig,
    seed: u64,
    prices: Vec<f64>,
    metrics: MetricsSnapshot,
    traders: Vec<TraderSummary>,
}

fn build_strategy(config: &SimConfig) -> (Box<dyn UpdateRule>, Box<dyn PriceAggregator>) {
    match config.rule {
        RuleKind::Threshold => (
            Box::new(InfluenceThresholdRule::new()),
            Box::new(ClearingQuote),
        ),
        RuleKind::Averaging => (
            Box::new(AveragingRule::new(config.self_weight)),
            Box::new(MeanSignal),
        ),
    }
}

fn write_csv(prices: &[f64], steps: impl Iterator<Item = u64>) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "step,price")?;
    for (step, price) in steps.zip(prices) {
        writeln!(out, "{step},{price}")?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = args.resolve()?;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());

    info!(
        traders = config.traders,
        topology = ?config.topology,
        rule = ?config.rule,
        steps = config.steps,
        seed,
        "Starting market network simulation"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let graph = topology::build(config.topology, config.traders, config.edge_probability, &mut rng);
    let network =
        network::populate_graph(graph, &config.trader, &mut rng).context("building traders")?;

    let (rule, aggregator) = build_strategy(&config);
    let sim_config = SimulationConfig::seeded(seed)
        .with_initial_price(config.initial_price)
        .with_verbose(config.verbose);
    let mut sim = Simulation::new(network, rule, aggregator, sim_config)?;

    let metrics = Arc::new(MetricsHook::new());
    sim.add_hook(metrics.clone());

    let prices = sim.run(1..=config.steps).context("running simulation")?;
    let snapshot = metrics.snapshot();

    info!(
        steps = snapshot.total_steps,
        mean_price = ?snapshot.mean_price,
        volatility = ?snapshot.price_volatility,
        mean_signal = ?sim.network().mean_signal(),
        "Simulation complete"
    );

    match &args.output {
        Some(path) => {
            let network = sim.network();
            let traders = network
                .traders()
                .zip(network.labels())
                .map(|(trader, &label)| TraderSummary {
                    label,
                    signal: trader.signal(),
                    position: trader.position(),
                })
                .collect();
            let report = Report {
                config: &config,
                seed,
                prices,
                metrics: snapshot,
                traders,
            };

            let file = File::create(path)
                .with_context(|| format!("creating report {}", path.display()))?;
            serde_json::to_writer_pretty(BufWriter::new(file), &report)
                .with_context(|| format!("writing report {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => write_csv(&prices, 1..=config.steps)?,
    }

    Ok(())
}
