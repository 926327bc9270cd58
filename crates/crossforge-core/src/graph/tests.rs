//! Tests for graph construction and accessors.

use super::*;

#[test]
fn test_builder_sorts_neighbors() {
    let graph = GraphBuilder::new(4, 2)
        .with_edge(3, 0)
        .with_edge(1, 0)
        .with_edge(2, 0)
        .with_edge(0, 1)
        .build()
        .unwrap();

    assert_eq!(graph.neighbors(0), &[1, 2, 3]);
    assert_eq!(graph.neighbors(1), &[0]);
    assert_eq!(graph.degree(0), 3);
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(graph.fixed_count(), 4);
}

#[test]
fn test_builder_rejects_dangling_fixed_index() {
    let err = GraphBuilder::new(2, 2).with_edge(2, 0).build().unwrap_err();
    assert!(matches!(err, CrossForgeError::ModelConstruction(_)));
}

#[test]
fn test_builder_rejects_dangling_free_index() {
    let err = GraphBuilder::new(2, 2).with_edge(0, 5).build().unwrap_err();
    assert!(matches!(err, CrossForgeError::ModelConstruction(_)));
}

#[test]
fn test_builder_rejects_duplicate_edge() {
    let err = GraphBuilder::new(2, 1)
        .with_edge(1, 0)
        .with_edge(1, 0)
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn test_pace_edge_offsets() {
    let mut builder = GraphBuilder::new(5, 5);
    builder.add_pace_edge(2, 8).unwrap();
    builder.add_pace_edge(5, 10).unwrap();
    assert!(builder.add_pace_edge(0, 6).is_err());
    assert!(builder.add_pace_edge(1, 5).is_err());
    assert!(builder.add_pace_edge(1, 11).is_err());

    let graph = builder.build().unwrap();
    assert_eq!(graph.neighbors(2), &[1]);
    assert_eq!(graph.neighbors(4), &[4]);
}

#[test]
fn test_median_and_barycenter() {
    let graph = BipartiteGraph::from_adjacency(
        10,
        vec![vec![], vec![4], vec![1, 2, 9], vec![1, 2, 6, 9]],
    )
    .unwrap();

    assert_eq!(graph.median(0), 0.0);
    assert_eq!(graph.barycenter(0), 0.0);
    assert_eq!(graph.median(1), 4.0);
    assert_eq!(graph.median(2), 2.0);
    assert_eq!(graph.barycenter(2), 4.0);
    assert_eq!(graph.median(3), 4.0);
    assert_eq!(graph.barycenter(3), 4.5);
}

#[test]
fn test_twins() {
    let graph =
        BipartiteGraph::from_adjacency(3, vec![vec![0, 2], vec![2, 0], vec![1]]).unwrap();
    assert!(graph.are_twins(0, 1));
    assert!(!graph.are_twins(0, 2));
}
