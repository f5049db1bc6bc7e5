//! Graph adapter: caller graph in, trader network out.
//!
//! The input graph is consumed. Every node becomes a [`Trader`] built from a
//! [`TraderConfig`]; node indices, node count and every edge survive
//! unchanged, so `NodeIndex` handles the caller kept still address the same
//! nodes. The original node weights are retained as labels.

use agents::{Trader, TraderConfig};
use petgraph::EdgeType;
use petgraph::graph::{DiGraph, Graph, IndexType, NodeIndex};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::info;

use crate::error::{NetworkError, Result};
use crate::network::TraderNetwork;

/// Turn a directed graph into a trader network.
///
/// Traders are built in node index order, so a seeded `rng` gives the same
/// population for the same graph.
///
/// # Errors
/// - [`NetworkError::InvalidGraphKind`] if `graph` is undirected
/// - [`NetworkError::InvalidTraderConfig`] if a parameter source cannot
///   serve every node
pub fn populate_graph<N, E, Ty, Ix>(
    graph: Graph<N, E, Ty, Ix>,
    config: &TraderConfig,
    rng: &mut dyn RngCore,
) -> Result<TraderNetwork<N>>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    if !graph.is_directed() {
        return Err(NetworkError::InvalidGraphKind);
    }
    config.validate(graph.node_count())?;

    let (nodes, edges) = graph.into_nodes_edges();
    let mut traders: DiGraph<Trader, ()> = DiGraph::with_capacity(nodes.len(), edges.len());
    let mut labels = Vec::with_capacity(nodes.len());

    for (index, node) in nodes.into_iter().enumerate() {
        traders.add_node(config.build_trader(index, rng)?);
        labels.push(node.weight);
    }
    for edge in &edges {
        traders.add_edge(
            NodeIndex::new(edge.source().index()),
            NodeIndex::new(edge.target().index()),
            (),
        );
    }

    info!(
        traders = traders.node_count(),
        edges = traders.edge_count(),
        "graph populated"
    );
    Ok(TraderNetwork::from_parts(traders, labels))
}

/// [`populate_graph`] with the neutral default config.
pub fn populate_graph_default<N, E, Ty, Ix>(graph: Graph<N, E, Ty, Ix>) -> Result<TraderNetwork<N>>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    // Default sources are constant; the seed is never observed.
    let mut rng = StdRng::seed_from_u64(0);
    populate_graph(graph, &TraderConfig::default(), &mut rng)
}
