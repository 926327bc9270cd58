use crossforge_config::ModelConfig;
use crossforge_core::{crossing_number, BipartiteGraph, CrossingMatrix};
use crossforge_test::random_graph;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::*;
use crate::reduction::{reduce, ReductionRules};

fn build(graph: &BipartiteGraph, config: &ModelConfig) -> (OrderingModel, Engine) {
    let matrix = CrossingMatrix::new(graph);
    let order = reduce(graph, &matrix, ReductionRules::from(config));
    OrderingModel::build(graph, &matrix, &order, config)
}

/// Places the vertices in `permutation` order and propagates.
fn place(model: &OrderingModel, engine: &mut Engine, permutation: &[usize]) {
    for (k, &v) in permutation.iter().enumerate() {
        engine
            .store_mut()
            .instantiate(model.positions()[v], k)
            .unwrap();
    }
    engine.fixpoint().unwrap();
}

/// Smallest-index-first linear extension of the forced order.
fn linear_extension(graph: &BipartiteGraph) -> Vec<usize> {
    let matrix = CrossingMatrix::new(graph);
    let order = reduce(graph, &matrix, ReductionRules::all());
    let n = order.len();
    let mut placed = vec![false; n];
    let mut result = Vec::with_capacity(n);
    while result.len() < n {
        let next = (0..n)
            .find(|&v| !placed[v] && (0..n).all(|u| placed[u] || !order.precedes(u, v)))
            .unwrap();
        placed[next] = true;
        result.push(next);
    }
    result
}

#[test]
fn test_cost_variable_orientation() {
    let graph = BipartiteGraph::from_adjacency(2, vec![vec![0], vec![1]]).unwrap();
    let (model, engine) = build(&graph, &ModelConfig::bare());

    assert_eq!(model.constant(), 0);
    assert_eq!(model.objective_ceiling(), 1);
    assert_eq!(
        model.cost_vars(),
        &[CostVar {
            var: 4,
            first: 0,
            second: 1,
            weight: 1,
        }]
    );
    assert_eq!(engine.store().var_count(), 5);
}

#[test]
fn test_forced_pairs_fold_into_constant() {
    let graph = BipartiteGraph::from_adjacency(3, vec![vec![2], vec![1], vec![0]]).unwrap();
    let (model, _) = build(&graph, &ModelConfig::default());
    // Every pair is forced into its free order, which costs nothing.
    assert!(model.cost_vars().is_empty());
    assert_eq!(model.constant(), 0);

    let matrix = CrossingMatrix::new(&graph);
    assert_eq!(matrix.constant(), 0);
    assert_eq!(matrix.reduced_total(), 3);
}

#[test]
fn test_objective_matches_recount_without_rules() {
    let mut rng = StdRng::seed_from_u64(11);
    for seed in 0..12 {
        let graph = random_graph(seed, 5, 7, 0.4);
        let config = ModelConfig {
            lower_bound: true,
            ..ModelConfig::bare()
        };
        let mut permutation: Vec<usize> = (0..graph.free_count()).collect();
        permutation.shuffle(&mut rng);

        let (model, mut engine) = build(&graph, &config);
        place(&model, &mut engine, &permutation);

        let store = engine.store();
        let expected = crossing_number(&graph, &permutation);
        assert_eq!(model.extract_permutation(store), Some(permutation.clone()));
        assert_eq!(model.extract_objective(store), Some(expected));
        assert_eq!(store.objective_lb(), expected);
        assert_eq!(store.objective_ub(), expected);
        assert_eq!(engine.first_unsatisfied(), None);
    }
}

#[test]
fn test_objective_matches_recount_with_rules() {
    for seed in 0..12 {
        let graph = random_graph(seed, 6, 8, 0.3);
        let permutation = linear_extension(&graph);
        let (model, mut engine) = build(&graph, &ModelConfig::default());
        place(&model, &mut engine, &permutation);

        assert_eq!(
            model.extract_objective(engine.store()),
            Some(crossing_number(&graph, &permutation)),
            "seed {seed}"
        );
    }
}

#[test]
fn test_unfixed_model_has_no_objective() {
    let graph = random_graph(2, 4, 5, 0.5);
    let (model, engine) = build(&graph, &ModelConfig::bare());
    assert_eq!(model.extract_permutation(engine.store()), None);
    if !model.cost_vars().is_empty() {
        assert_eq!(model.extract_objective(engine.store()), None);
    }
}

#[test]
fn test_propagator_layout() {
    let graph = BipartiteGraph::from_adjacency(3, vec![vec![0, 2], vec![1], vec![0, 1]]).unwrap();
    let config = ModelConfig {
        adjacent_pair_table: true,
        lower_bound: true,
        ..ModelConfig::bare()
    };
    let (model, engine) = build(&graph, &config);
    // Channeling, one disjunction per cost variable, the sum, two tables
    // and the bound.
    assert_eq!(
        engine.propagator_count(),
        1 + model.cost_vars().len() + 1 + 2 + 1
    );
    assert!(model.bound_counters().is_some());
}

#[test]
fn test_preferred_pairs() {
    let graph = BipartiteGraph::from_adjacency(2, vec![vec![1], vec![0], vec![0]]).unwrap();
    let matrix = CrossingMatrix::new(&graph);
    let relation = preferred_pairs(&matrix);

    // c(1, 0) = 0 < c(0, 1) = 1
    assert!(relation.allows(1, 0));
    assert!(!relation.allows(0, 1));
    // Twins tie and keep index order.
    assert!(relation.allows(1, 2));
    assert!(!relation.allows(2, 1));
    assert!(!relation.allows(0, 0));
}
