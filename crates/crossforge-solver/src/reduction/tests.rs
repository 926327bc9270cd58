use crossforge_core::{BipartiteGraph, CrossingMatrix};
use crossforge_test::random_graph;

use super::*;

fn graph(fixed: usize, adjacency: Vec<Vec<usize>>) -> BipartiteGraph {
    BipartiteGraph::from_adjacency(fixed, adjacency).unwrap()
}

fn reduce_all(graph: &BipartiteGraph) -> PartialOrder {
    let matrix = CrossingMatrix::new(graph);
    reduce(graph, &matrix, ReductionRules::all())
}

/// Reachability recomputed from the reduced edges alone.
fn closure_of(order: &PartialOrder) -> Vec<Vec<bool>> {
    let n = order.len();
    let mut reach = vec![vec![false; n]; n];
    for start in 0..n {
        let mut stack: Vec<usize> = order.successors(start).to_vec();
        while let Some(v) = stack.pop() {
            if !reach[start][v] {
                reach[start][v] = true;
                stack.extend_from_slice(order.successors(v));
            }
        }
    }
    reach
}

#[test]
fn test_dominance_chain_is_transitively_reduced() {
    let g = graph(3, vec![vec![0], vec![1], vec![2]]);
    let order = reduce_all(&g);

    let edges: Vec<_> = order.ordered_edges().collect();
    assert_eq!(edges, vec![(0, 1), (1, 2)]);
    assert!(order.precedes(0, 2));
    assert!(order.incomparable_pairs().is_empty());

    let stats = order.stats();
    assert_eq!(stats.dominance_pairs, 3);
    assert_eq!(stats.ordered_edges, 2);
    assert_eq!(stats.closure_pairs, 3);
}

#[test]
fn test_twins_ordered_by_index() {
    let g = graph(3, vec![vec![0, 1], vec![0, 1], vec![2]]);
    let matrix = CrossingMatrix::new(&g);
    assert_eq!(
        classify_pair(&g, &matrix, ReductionRules::all(), 0, 1),
        Some((0, 1, Rule::Twins))
    );

    let order = reduce(&g, &matrix, ReductionRules::all());
    assert_eq!(order.stats().twin_pairs, 1);
    assert_eq!(order.stats().dominance_pairs, 2);
    assert_eq!(order.ordered_edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
}

#[test]
fn test_degree_two_pattern() {
    let g = graph(3, vec![vec![0, 2], vec![1, 2]]);
    let matrix = CrossingMatrix::new(&g);
    assert_eq!((matrix.count(0, 1), matrix.count(1, 0)), (1, 2));

    assert_eq!(
        classify_pair(&g, &matrix, ReductionRules::all(), 0, 1),
        Some((0, 1, Rule::DegreeTwo))
    );
    assert_eq!(
        classify_pair(&g, &matrix, ReductionRules::all(), 1, 0),
        Some((0, 1, Rule::DegreeTwo))
    );

    let rules = ReductionRules {
        degree_two: false,
        ..ReductionRules::all()
    };
    assert_eq!(classify_pair(&g, &matrix, rules, 0, 1), None);
}

#[test]
fn test_zero_ties_stay_open_without_twin_rule() {
    let g = graph(2, vec![vec![], vec![]]);
    let matrix = CrossingMatrix::new(&g);
    let dominance_only = ReductionRules {
        dominance: true,
        twins: false,
        degree_two: false,
    };
    let order = reduce(&g, &matrix, dominance_only);
    assert_eq!(order.incomparable_pairs(), &[(0, 1)]);

    let order = reduce(&g, &matrix, ReductionRules::all());
    assert!(order.precedes(0, 1));
}

#[test]
fn test_disabled_rules_leave_every_pair_open() {
    let g = graph(4, vec![vec![0], vec![1, 3], vec![2], vec![0, 3]]);
    let matrix = CrossingMatrix::new(&g);
    let order = reduce(&g, &matrix, ReductionRules::none());
    assert_eq!(order.ordered_edges().count(), 0);
    assert_eq!(order.incomparable_pairs().len(), 6);
}

#[test]
fn test_cycle_edges_are_dropped() {
    let order = PartialOrder::from_edges(4, [(0, 1), (1, 2), (2, 0), (2, 3)]);
    assert_eq!(order.stats().cyclic_edges_dropped, 3);
    assert_eq!(order.ordered_edges().collect::<Vec<_>>(), vec![(2, 3)]);
    assert!(order.precedes(2, 3));
    assert!(!order.precedes(0, 1));
    assert_eq!(order.incomparable_pairs().len(), 5);
}

#[test]
fn test_rules_config_mapping() {
    let config = ModelConfig::from_mask(0b101);
    let rules = ReductionRules::from(&config);
    assert!(rules.dominance);
    assert!(!rules.twins);
    assert!(rules.degree_two);
    assert!(!ReductionRules::none().any());
}

#[test]
fn test_pairs_partitioned_on_random_graphs() {
    for seed in 0..20 {
        let g = random_graph(seed, 6, 9, 0.35);
        let order = reduce_all(&g);
        let n = order.len();
        let mut open = 0;
        for i in 0..n {
            assert!(!order.precedes(i, i));
            for j in 0..n {
                if i == j {
                    continue;
                }
                let classes = [
                    order.precedes(i, j),
                    order.precedes(j, i),
                    order.is_incomparable(i, j),
                ];
                assert_eq!(classes.iter().filter(|&&c| c).count(), 1, "pair ({i}, {j})");
                if i < j && order.is_incomparable(i, j) {
                    open += 1;
                }
            }
        }
        assert_eq!(open, order.incomparable_pairs().len());
        assert_eq!(
            order.stats().closure_pairs + order.stats().incomparable_pairs,
            n * (n - 1) / 2
        );
    }
}

#[test]
fn test_reduced_edges_keep_reachability() {
    for seed in 0..20 {
        let g = random_graph(seed, 5, 10, 0.3);
        let order = reduce_all(&g);
        let reach = closure_of(&order);
        for i in 0..order.len() {
            for j in 0..order.len() {
                assert_eq!(reach[i][j], order.precedes(i, j));
            }
            // No edge is implied by the others.
            for &w in order.successors(i) {
                let implied = order
                    .successors(i)
                    .iter()
                    .any(|&u| u != w && order.precedes(u, w));
                assert!(!implied, "edge ({i}, {w}) is redundant");
            }
        }
    }
}

#[test]
fn test_reduction_is_deterministic() {
    let g = random_graph(7, 8, 12, 0.25);
    assert_eq!(reduce_all(&g), reduce_all(&g));
}
