//! Network crate: the graph adapter.
//!
//! Converts a caller-supplied `petgraph` directed graph into a
//! [`TraderNetwork`] whose nodes carry trader state, keeping topology and
//! node indices.
//!
//! # Example
//! ```ignore
//! use petgraph::graph::DiGraph;
//!
//! let mut graph = DiGraph::<&str, ()>::new();
//! let a = graph.add_node("a");
//! let b = graph.add_node("b");
//! graph.add_edge(a, b, ());
//!
//! let network = network::populate_graph_default(graph)?;
//! assert_eq!(network.len(), 2);
//! ```

mod adapter;
mod error;
mod network;

pub use adapter::{populate_graph, populate_graph_default};
pub use error::{NetworkError, Result};
pub use network::TraderNetwork;
