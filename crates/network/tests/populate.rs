//! Graph adaptation tests.

use agents::{AgentError, ParamSource, TraderConfig, TraderParams};
use network::{NetworkError, populate_graph, populate_graph_default};
use petgraph::graph::{DiGraph, NodeIndex};
use rand::SeedableRng;
use rand::rngs::StdRng;
use types::TraderId;

fn labelled_graph() -> (DiGraph<&'static str, f32>, Vec<NodeIndex>) {
    let mut graph = DiGraph::new();
    let nodes: Vec<_> = ["alice", "bob", "carol", "dave"]
        .into_iter()
        .map(|name| graph.add_node(name))
        .collect();
    graph.add_edge(nodes[0], nodes[1], 0.5);
    graph.add_edge(nodes[1], nodes[2], 1.0);
    graph.add_edge(nodes[2], nodes[0], 1.5);
    graph.add_edge(nodes[0], nodes[3], 2.0);
    (graph, nodes)
}

fn edge_list<N, E>(graph: &DiGraph<N, E>) -> Vec<(usize, usize)> {
    let mut edges: Vec<_> = graph
        .raw_edges()
        .iter()
        .map(|e| (e.source().index(), e.target().index()))
        .collect();
    edges.sort();
    edges
}

#[test]
fn test_topology_preserved() {
    let (graph, _) = labelled_graph();
    let expected = edge_list(&graph);
    let mut rng = StdRng::seed_from_u64(1);

    let network = populate_graph(graph, &TraderConfig::paper(), &mut rng).unwrap();

    assert_eq!(network.len(), 4);
    assert_eq!(network.edge_count(), 4);
    assert_eq!(edge_list(network.graph()), expected);
}

#[test]
fn test_node_indices_and_labels_kept() {
    let (graph, nodes) = labelled_graph();
    let network = populate_graph_default(graph).unwrap();

    for (i, node) in nodes.iter().enumerate() {
        let id = TraderId(node.index());
        assert_eq!(network.trader(id).unwrap().id(), TraderId(i));
    }
    assert_eq!(network.label(TraderId(2)), Some(&"carol"));
    assert_eq!(network.node_map()[&"dave"], TraderId(3));
}

#[test]
fn test_successors_follow_outgoing_edges() {
    let (graph, _) = labelled_graph();
    let network = populate_graph_default(graph).unwrap();

    let mut out: Vec<_> = network.successors(TraderId(0)).collect();
    out.sort();
    assert_eq!(out, vec![TraderId(1), TraderId(3)]);
    assert_eq!(network.successors(TraderId(3)).count(), 0);

    let views = network.neighborhoods();
    assert_eq!(views.len(), 4);
    assert_eq!(views[0].degree(), 2);
    assert_eq!(views[3].degree(), 0);
}

#[test]
fn test_default_traders_are_neutral() {
    let (graph, _) = labelled_graph();
    let network = populate_graph_default(graph).unwrap();

    assert!(network.traders().all(|t| t.signal() == 0.0));
    assert!(network.traders().all(|t| *t.params() == TraderParams::default()));
    assert_eq!(network.mean_signal(), Some(0.0));
}

#[test]
fn test_per_trader_values_follow_node_order() {
    let (graph, _) = labelled_graph();
    let config =
        TraderConfig::default().with_initial_signal(ParamSource::PerTrader(vec![1.0, 0.0, -1.0, 0.5]));
    let mut rng = StdRng::seed_from_u64(0);
    let network = populate_graph(graph, &config, &mut rng).unwrap();

    assert_eq!(network.signals(), vec![1.0, 0.0, -1.0, 0.5]);
}

#[test]
fn test_short_per_trader_list_rejected() {
    let (graph, _) = labelled_graph();
    let config = TraderConfig::default().with_d(ParamSource::PerTrader(vec![0.0, 0.0]));
    let mut rng = StdRng::seed_from_u64(0);

    let err = populate_graph(graph, &config, &mut rng).unwrap_err();
    assert!(matches!(
        err,
        NetworkError::InvalidTraderConfig(AgentError::MissingPerTraderValue { name: "d", .. })
    ));
}

#[test]
fn test_non_finite_per_trader_value_rejected() {
    let (graph, _) = labelled_graph();
    let config = TraderConfig::default()
        .with_initial_signal(ParamSource::PerTrader(vec![1.0, f64::NAN, 0.0, 0.0]));
    let mut rng = StdRng::seed_from_u64(0);

    let err = populate_graph(graph, &config, &mut rng).unwrap_err();
    assert!(matches!(
        err,
        NetworkError::InvalidTraderConfig(AgentError::InvalidParameter {
            name: "initial_signal",
            ..
        })
    ));
}

#[test]
fn test_same_seed_same_population() {
    let build = |seed| {
        let (graph, _) = labelled_graph();
        let mut rng = StdRng::seed_from_u64(seed);
        populate_graph(graph, &TraderConfig::paper(), &mut rng)
            .unwrap()
            .traders()
            .cloned()
            .collect::<Vec<_>>()
    };
    assert_eq!(build(99), build(99));
}

#[test]
fn test_repopulate_overwrites_state_and_keeps_topology() {
    let (graph, _) = labelled_graph();
    let expected = edge_list(&graph);
    let mut network = populate_graph_default(graph).unwrap();

    let config = TraderConfig::default().with_initial_signal(1.0).with_c(2.0);
    let mut rng = StdRng::seed_from_u64(0);
    network.repopulate(&config, &mut rng).unwrap();

    assert_eq!(network.signals(), vec![1.0; 4]);
    assert!(network.traders().all(|t| t.params().c == 2.0));
    assert_eq!(edge_list(network.graph()), expected);
    assert_eq!(network.label(TraderId(0)), Some(&"alice"));
}

#[test]
fn test_into_parts() {
    let (graph, _) = labelled_graph();
    let network = populate_graph_default(graph).unwrap();
    let (traders, labels) = network.into_parts();
    assert_eq!(traders.node_count(), 4);
    assert_eq!(labels, vec!["alice", "bob", "carol", "dave"]);
}
