//! Trader network: a directed graph whose nodes are traders.
//!
//! Edge `i -> j` means trader `i` watches trader `j`. Topology is fixed once
//! the network is built; the simulator only rewrites node state.

use std::collections::HashMap;
use std::hash::Hash;

use agents::{Neighborhood, Trader, TraderConfig, TraderUpdate};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use rand::RngCore;
use tracing::debug;
use types::TraderId;

use crate::error::Result;

/// Traders on a directed graph, plus the labels of the nodes they came from.
#[derive(Debug, Clone)]
pub struct TraderNetwork<L> {
    graph: DiGraph<Trader, ()>,
    labels: Vec<L>,
}

impl<L> TraderNetwork<L> {
    /// Wrap a graph of traders. `labels[i]` belongs to node `i`.
    pub(crate) fn from_parts(graph: DiGraph<Trader, ()>, labels: Vec<L>) -> Self {
        debug_assert_eq!(graph.node_count(), labels.len());
        Self { graph, labels }
    }

    /// Number of traders.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Underlying graph.
    pub fn graph(&self) -> &DiGraph<Trader, ()> {
        &self.graph
    }

    /// Traders in node index order.
    pub fn traders(&self) -> impl Iterator<Item = &Trader> {
        self.graph.raw_nodes().iter().map(|node| &node.weight)
    }

    /// Mutable traders in node index order. Topology stays untouched.
    pub fn traders_mut(&mut self) -> impl Iterator<Item = &mut Trader> {
        self.graph.node_weights_mut()
    }

    pub fn trader(&self, id: TraderId) -> Option<&Trader> {
        self.graph.node_weight(NodeIndex::new(id.index()))
    }

    /// Label of the original node.
    pub fn label(&self, id: TraderId) -> Option<&L> {
        self.labels.get(id.index())
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Traders watched by `id`, one entry per outgoing edge.
    pub fn successors(&self, id: TraderId) -> impl Iterator<Item = TraderId> + '_ {
        self.graph
            .neighbors_directed(NodeIndex::new(id.index()), Direction::Outgoing)
            .map(|n| TraderId(n.index()))
    }

    /// Read-only view of every trader with its successors, in index order.
    pub fn neighborhoods(&self) -> Vec<Neighborhood<'_>> {
        self.graph
            .node_indices()
            .map(|idx| {
                Neighborhood::new(
                    &self.graph[idx],
                    self.graph
                        .neighbors_directed(idx, Direction::Outgoing)
                        .map(|n| &self.graph[n]),
                )
            })
            .collect()
    }

    /// Write one buffered update per trader, in index order.
    pub fn commit(&mut self, updates: Vec<TraderUpdate>) {
        debug_assert_eq!(updates.len(), self.len());
        for (trader, update) in self.graph.node_weights_mut().zip(updates) {
            trader.apply(update);
        }
    }

    /// Current signals in index order.
    pub fn signals(&self) -> Vec<f64> {
        self.traders().map(Trader::signal).collect()
    }

    /// Arithmetic mean of all signals. `None` for an empty network.
    pub fn mean_signal(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.traders().map(Trader::signal).sum::<f64>() / self.len() as f64)
    }

    /// Replace every trader with a fresh one drawn from `config`.
    ///
    /// Nodes and edges are kept; all previous trader state is overwritten.
    pub fn repopulate(&mut self, config: &TraderConfig, rng: &mut dyn RngCore) -> Result<()> {
        config.validate(self.len())?;
        let mut fresh = Vec::with_capacity(self.len());
        for index in 0..self.len() {
            fresh.push(config.build_trader(index, rng)?);
        }
        for (slot, trader) in self.graph.node_weights_mut().zip(fresh) {
            *slot = trader;
        }
        debug!(traders = self.len(), "network repopulated");
        Ok(())
    }

    /// Give back the trader graph and the original labels.
    pub fn into_parts(self) -> (DiGraph<Trader, ()>, Vec<L>) {
        (self.graph, self.labels)
    }
}

impl<L: Hash + Eq> TraderNetwork<L> {
    /// Original label to trader id.
    pub fn node_map(&self) -> HashMap<&L, TraderId> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label, TraderId(i)))
            .collect()
    }
}
