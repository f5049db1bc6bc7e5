//! Central configuration for the market network simulation binary.
//!
//! A config comes from a preset or a JSON file, then command-line and
//! environment overrides are applied on top.

use std::path::Path;

use agents::{ParamSource, TraderConfig};
use anyhow::{Context, ensure};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Network shape built for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Directed G(n, p): every ordered pair linked with probability p.
    #[default]
    Random,
    /// 0 -> 1 -> ... -> n-1 -> 0
    Cycle,
    /// 0 -> 1 -> ... -> n-1
    Path,
    /// Every trader watches trader 0.
    Star,
}

/// Update rule driving the traders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Buy/hold/sell thresholds, priced by market clearing.
    #[default]
    Threshold,
    /// Weighted belief averaging, priced by the mean signal.
    Averaging,
}

/// Named starting configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Paper,
    Averaging,
    Demo,
}

/// Master configuration for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Network
    // ─────────────────────────────────────────────────────────────────────────
    /// Number of traders.
    pub traders: usize,
    /// Edge probability for the random topology.
    pub edge_probability: f64,
    pub topology: Topology,

    // ─────────────────────────────────────────────────────────────────────────
    // Simulation Control
    // ─────────────────────────────────────────────────────────────────────────
    /// Steps to run, labelled 1..=steps.
    pub steps: u64,
    /// Seed for graph, traders and per-step draws. Random if unset.
    pub seed: Option<u64>,
    pub rule: RuleKind,
    /// Own-signal weight for the averaging rule.
    pub self_weight: f64,
    /// Reference price before the first clearing.
    pub initial_price: f64,
    /// Enable verbose logging.
    pub verbose: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Traders
    // ─────────────────────────────────────────────────────────────────────────
    pub trader: TraderConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            traders: 100,
            edge_probability: 0.05,
            topology: Topology::Random,

            steps: 200,
            seed: None,
            rule: RuleKind::Threshold,
            self_weight: 1.0,
            initial_price: 0.0,
            verbose: false,

            trader: TraderConfig::paper(),
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON config. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Reject settings no run can use.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.traders > 0, "traders must be at least 1");
        ensure!(self.steps > 0, "steps must be at least 1");
        ensure!(
            (0.0..=1.0).contains(&self.edge_probability),
            "edge probability {} outside [0, 1]",
            self.edge_probability
        );
        self.trader
            .validate(self.traders)
            .context("invalid trader config")?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder-style setters for fluent configuration
    // ─────────────────────────────────────────────────────────────────────────

    pub fn traders(mut self, count: usize) -> Self {
        self.traders = count;
        self
    }

    pub fn edge_probability(mut self, p: f64) -> Self {
        self.edge_probability = p;
        self
    }

    pub fn topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn steps(mut self, steps: u64) -> Self {
        self.steps = steps;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn rule(mut self, rule: RuleKind) -> Self {
        self.rule = rule;
        self
    }

    pub fn trader(mut self, trader: TraderConfig) -> Self {
        self.trader = trader;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preset Configurations
// ─────────────────────────────────────────────────────────────────────────────

impl SimConfig {
    /// Published model defaults on a sparse random network.
    pub fn paper() -> Self {
        Self::default()
    }

    /// Continuous beliefs averaged over a random network.
    pub fn averaging() -> Self {
        Self::default()
            .rule(RuleKind::Averaging)
            .trader(TraderConfig::default().with_initial_signal(ParamSource::uniform(-1.0, 1.0)))
    }

    /// Small seeded run for a quick look.
    pub fn demo() -> Self {
        Self::default()
            .traders(20)
            .edge_probability(0.2)
            .steps(50)
            .seed(42)
    }

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Paper => Self::paper(),
            Preset::Averaging => Self::averaging(),
            Preset::Demo => Self::demo(),
        }
    }
}
