//! Directed graphs to feed the trader network.
//!
//! Node weights are the node's position, so reports can name traders by
//! the label the adapter keeps.

use petgraph::graph::{DiGraph, NodeIndex};
use rand::Rng;

use crate::config::Topology;

/// Build an `n`-node directed graph of the given shape.
///
/// `p` is only used by [`Topology::Random`].
pub fn build<R: Rng + ?Sized>(topology: Topology, n: usize, p: f64, rng: &mut R) -> DiGraph<usize, ()> {
    let mut graph = DiGraph::with_capacity(n, 0);
    let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i)).collect();

    match topology {
        Topology::Random => {
            for &a in &nodes {
                for &b in &nodes {
                    if a != b && rng.random_bool(p) {
                        graph.add_edge(a, b, ());
                    }
                }
            }
        }
        Topology::Cycle => {
            if n > 1 {
                for (i, &node) in nodes.iter().enumerate() {
                    graph.add_edge(node, nodes[(i + 1) % n], ());
                }
            }
        }
        Topology::Path => {
            for pair in nodes.windows(2) {
                graph.add_edge(pair[0], pair[1], ());
            }
        }
        Topology::Star => {
            for &leaf in nodes.iter().skip(1) {
                graph.add_edge(leaf, nodes[0], ());
            }
        }
    }
    graph
}
