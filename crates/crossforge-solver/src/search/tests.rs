use crossforge_config::{ModelConfig, RestartConfig, SearchStrategy};
use crossforge_core::{crossing_number, BipartiteGraph, CrossingMatrix};
use crossforge_test::{brute_force_optimum, random_graph};

use super::*;
use crate::engine::IntDomain;
use crate::reduction::{reduce, ReductionRules};
use crate::termination::{NoTermination, NodeCountTermination};

struct Outcome {
    end: SearchEnd,
    scope: SearchScope,
    seen: Vec<u64>,
}

fn search<T: Termination>(
    graph: &BipartiteGraph,
    config: &ModelConfig,
    restarts: RestartConfig,
    termination: T,
    cap: Option<u64>,
) -> Outcome {
    let matrix = CrossingMatrix::new(graph);
    let order = reduce(graph, &matrix, ReductionRules::from(config));
    let (model, mut engine) = OrderingModel::build(graph, &matrix, &order, config);
    let selector = BranchSelector::new(&model, ValueOrder::Min);

    let mut scope = SearchScope::with_seed(7);
    scope.start_solving();
    let mut seen = Vec::new();
    let mut bnb = BranchAndBound::new(&mut engine, &model, selector, termination)
        .with_restarts(restarts);
    if let Some(cap) = cap {
        bnb = bnb.with_cap(cap);
    }
    let end = bnb
        .run(&mut scope, |_, _, objective, permutation| {
            assert_eq!(crossing_number(graph, permutation), objective);
            seen.push(objective);
            Ok(())
        })
        .unwrap();
    Outcome { end, scope, seen }
}

#[test]
fn test_search_finds_brute_force_optimum() {
    for seed in 0..12 {
        let graph = random_graph(seed, 5, 7, 0.4);
        let outcome = search(
            &graph,
            &ModelConfig::default(),
            RestartConfig::default(),
            NoTermination,
            None,
        );
        assert_eq!(outcome.end, SearchEnd::Exhausted);
        assert_eq!(
            outcome.scope.best_objective(),
            Some(brute_force_optimum(&graph)),
            "seed {seed}"
        );
    }
}

#[test]
fn test_solutions_strictly_improve() {
    let graph = random_graph(4, 6, 8, 0.4);
    let outcome = search(
        &graph,
        &ModelConfig::bare(),
        RestartConfig::default(),
        NoTermination,
        None,
    );
    assert!(!outcome.seen.is_empty());
    assert!(outcome.seen.windows(2).all(|w| w[1] < w[0]));
    assert_eq!(outcome.scope.solutions(), outcome.seen.len() as u64);
}

#[test]
fn test_restarts_keep_search_complete() {
    for seed in 0..8 {
        let graph = random_graph(seed, 6, 8, 0.35);
        let outcome = search(
            &graph,
            &ModelConfig::bare(),
            RestartConfig::geometric(2, 1.5),
            NoTermination,
            None,
        );
        assert_eq!(outcome.end, SearchEnd::Exhausted);
        assert_eq!(
            outcome.scope.best_objective(),
            Some(brute_force_optimum(&graph)),
            "seed {seed}"
        );
    }
}

#[test]
fn test_restarts_happen_with_tiny_fail_limit() {
    let graph = random_graph(21, 8, 9, 0.4);
    let outcome = search(
        &graph,
        &ModelConfig::bare(),
        RestartConfig::geometric(1, 1.1),
        NoTermination,
        None,
    );
    assert_eq!(outcome.end, SearchEnd::Exhausted);
    if outcome.scope.fails() > 1 {
        assert!(outcome.scope.restarts() > 0);
    }
}

#[test]
fn test_cap_below_optimum_exhausts_without_solution() {
    let graph = BipartiteGraph::from_adjacency(5, vec![vec![0, 1, 2, 3, 4]; 3]).unwrap();
    // Every pair crosses ten times either way.
    let outcome = search(
        &graph,
        &ModelConfig::bare(),
        RestartConfig::default(),
        NoTermination,
        Some(29),
    );
    assert_eq!(outcome.end, SearchEnd::Exhausted);
    assert!(outcome.seen.is_empty());
    assert_eq!(outcome.scope.best_objective(), None);
}

#[test]
fn test_node_limit_stops_search() {
    let graph = random_graph(5, 8, 10, 0.4);
    let outcome = search(
        &graph,
        &ModelConfig::bare(),
        RestartConfig::default(),
        NodeCountTermination::new(3),
        None,
    );
    assert_eq!(outcome.end, SearchEnd::Limit);
    assert!(outcome.scope.nodes() >= 3);
    assert_eq!(outcome.scope.best_objective(), None);
}

#[test]
fn test_centered_value_prefers_nearest_then_larger() {
    let mut domain = IntDomain::range(6);
    domain.remove(2);
    assert_eq!(centered_value(&domain, 2), 3);
    assert_eq!(centered_value(&domain, 1), 1);

    domain.remove(3);
    assert_eq!(centered_value(&domain, 2), 1);
    assert_eq!(centered_value(&domain, 3), 4);

    let domain = IntDomain::range(3);
    assert_eq!(centered_value(&domain, 5), 2);
}

#[test]
fn test_value_order_for_strategy() {
    let graph = BipartiteGraph::from_adjacency(3, vec![vec![2], vec![0], vec![1]]).unwrap();
    assert_eq!(
        ValueOrder::for_strategy(SearchStrategy::Default, &graph),
        ValueOrder::Min
    );
    assert_eq!(
        ValueOrder::for_strategy(SearchStrategy::Median, &graph),
        ValueOrder::Centered(vec![2, 0, 1])
    );
}

#[test]
fn test_selector_falls_back_after_positions() {
    let graph = BipartiteGraph::from_adjacency(2, vec![vec![0], vec![1]]).unwrap();
    let matrix = CrossingMatrix::new(&graph);
    let config = ModelConfig::bare();
    let order = reduce(&graph, &matrix, ReductionRules::none());
    let (model, mut engine) = OrderingModel::build(&graph, &matrix, &order, &config);
    let selector = BranchSelector::new(&model, ValueOrder::Min);
    let mut scope = SearchScope::with_seed(1);

    let (var, value) = selector.select(&engine, scope.rng()).unwrap();
    assert!(model.positions().contains(&var));
    assert_eq!(value, 0);

    engine.store_mut().instantiate(model.positions()[0], 1).unwrap();
    engine.fixpoint().unwrap();
    assert_eq!(selector.select(&engine, scope.rng()), None);
}
