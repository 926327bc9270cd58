use crossforge_config::{
    EnvironmentMode, ModelConfig, RestartConfig, SearchStrategy, SolverConfig, TerminationConfig,
};
use crossforge_core::{crossing_number, BipartiteGraph, CrossForgeError, SolveStatus, UpperBound};
use crossforge_test::{brute_force_optimum, random_graph, reference_instances, Instance};
use tokio::sync::mpsc;

use super::*;

fn instance(name: &str) -> Instance {
    reference_instances()
        .into_iter()
        .find(|i| i.name == name)
        .unwrap()
}

fn reproducible() -> SolverConfig {
    SolverConfig::new().with_environment_mode(EnvironmentMode::Reproducible)
}

fn assert_optimal(result: &SolveResult, graph: &BipartiteGraph, optimum: u64, context: &str) {
    let solution = &result.solution;
    assert_eq!(solution.status, SolveStatus::Optimal, "{context}");
    assert_eq!(solution.objective, Some(optimum), "{context}");
    let permutation = solution.permutation.as_deref().unwrap();
    assert_eq!(crossing_number(graph, permutation), optimum, "{context}");
}

#[test]
fn test_reference_instances_every_strategy_and_mask() {
    for inst in reference_instances() {
        for strategy in SearchStrategy::ALL {
            for mask in 0..ModelConfig::MASK_COUNT {
                let config = reproducible()
                    .with_search_strategy(strategy)
                    .with_model(ModelConfig::from_mask(mask))
                    .with_heuristic_warm_start(mask % 2 == 0);
                let result = solve(&inst.graph, &config, None).unwrap();
                let context = format!("{} {} mask {}", inst.name, strategy, mask);
                assert_optimal(&result, &inst.graph, inst.optimum, &context);
            }
        }
    }
}

#[test]
fn test_reference_instances_with_restarts() {
    for inst in reference_instances() {
        let config = reproducible()
            .with_restarts(RestartConfig::geometric(2, 1.5))
            .with_heuristic_warm_start(false);
        let result = solve(&inst.graph, &config, None).unwrap();
        assert_optimal(&result, &inst.graph, inst.optimum, inst.name);
    }
}

#[test]
fn test_random_graphs_match_brute_force() {
    for seed in 0..20 {
        let graph = random_graph(seed, 6, 8, 0.4);
        let optimum = brute_force_optimum(&graph);
        for mask in [0, 7, 16, 31] {
            let config = reproducible().with_model(ModelConfig::from_mask(mask));
            let result = solve(&graph, &config, None).unwrap();
            assert_optimal(&result, &graph, optimum, &format!("seed {seed} mask {mask}"));
        }
    }
}

#[test]
fn test_full_assert_accepts_correct_solutions() {
    for inst in reference_instances() {
        let config = SolverConfig::new()
            .with_environment_mode(EnvironmentMode::FullAssert)
            .with_model(ModelConfig::from_mask(31))
            .with_heuristic_warm_start(false);
        let result = solve(&inst.graph, &config, None).unwrap();
        assert_optimal(&result, &inst.graph, inst.optimum, inst.name);
    }
}

#[test]
fn test_empty_free_layer_is_trivially_optimal() {
    let graph = BipartiteGraph::from_adjacency(3, Vec::new()).unwrap();
    let result = solve(&graph, &SolverConfig::default(), None).unwrap();
    assert_eq!(result.solution.status, SolveStatus::Optimal);
    assert_eq!(result.solution.objective, Some(0));
    assert_eq!(result.solution.permutation, Some(Vec::new()));
}

#[test]
fn test_warm_start_permutation_returned_when_optimal() {
    let inst = instance("mixed_10_10");
    let first = solve(&inst.graph, &reproducible(), None).unwrap();
    let permutation = first.solution.permutation.unwrap();

    let config = reproducible().with_heuristic_warm_start(false);
    let bound = UpperBound::with_permutation(inst.optimum, permutation.clone());
    let result = solve(&inst.graph, &config, Some(bound)).unwrap();

    assert_eq!(result.solution.status, SolveStatus::Optimal);
    assert_eq!(result.solution.objective, Some(inst.optimum));
    assert_eq!(result.solution.permutation, Some(permutation));
    assert_eq!(result.stats.solutions, 0);
}

#[test]
fn test_warm_start_is_improved() {
    let inst = instance("mixed_10_10");
    let identity: Vec<usize> = (0..inst.graph.free_count()).collect();
    let objective = crossing_number(&inst.graph, &identity);
    assert!(objective > inst.optimum);

    let bound = UpperBound::with_permutation(objective, identity);
    let result = solve(&inst.graph, &reproducible(), Some(bound)).unwrap();
    assert_optimal(&result, &inst.graph, inst.optimum, "identity warm start");
}

#[test]
fn test_warm_start_objective_is_recounted() {
    let inst = instance("tiny_5_5");
    let identity: Vec<usize> = (0..5).collect();
    // Claims zero crossings, which would otherwise end the solve at once.
    let bound = UpperBound::with_permutation(0, identity);
    let result = solve(&inst.graph, &reproducible(), Some(bound)).unwrap();
    assert_optimal(&result, &inst.graph, inst.optimum, "recounted warm start");
}

#[test]
fn test_invalid_warm_start_permutation_is_rejected() {
    let inst = instance("tiny_5_5");
    for permutation in [vec![0, 1, 2, 3], vec![0, 1, 2, 3, 3], vec![0, 1, 2, 3, 5]] {
        let bound = UpperBound::with_permutation(10, permutation);
        let err = solve(&inst.graph, &reproducible(), Some(bound)).unwrap_err();
        assert!(matches!(err, CrossForgeError::ModelConstruction(_)));
        assert!(err.is_input_error());
    }
}

#[test]
fn test_objective_bound_below_optimum_is_unsatisfiable() {
    let inst = instance("mixed_10_10");
    let bound = UpperBound::objective_only(inst.optimum - 1);
    let result = solve(&inst.graph, &reproducible(), Some(bound)).unwrap();
    assert_eq!(result.solution.status, SolveStatus::Unsatisfiable);
    assert_eq!(result.solution.objective, None);
    assert_eq!(result.solution.permutation, None);
}

#[test]
fn test_objective_bound_at_optimum_is_reached() {
    let inst = instance("mixed_10_10");
    let bound = UpperBound::objective_only(inst.optimum);
    let result = solve(&inst.graph, &reproducible(), Some(bound)).unwrap();
    assert_optimal(&result, &inst.graph, inst.optimum, "objective-only bound");
}

#[test]
fn test_solution_limit_reports_satisfiable() {
    let inst = instance("mixed_10_10");
    let config = reproducible()
        .with_model(ModelConfig::bare())
        .with_heuristic_warm_start(false)
        .with_solution_limit(1);
    let result = solve(&inst.graph, &config, None).unwrap();
    assert_eq!(result.solution.status, SolveStatus::Satisfiable);
    assert_eq!(result.stats.solutions, 1);
    let permutation = result.solution.permutation.as_deref().unwrap();
    assert_eq!(
        result.solution.objective,
        Some(crossing_number(&inst.graph, permutation))
    );
}

#[test]
fn test_node_limit_without_solution_reports_unknown() {
    let inst = instance("mixed_10_10");
    let mut config = reproducible()
        .with_model(ModelConfig::bare())
        .with_heuristic_warm_start(false);
    config.termination = Some(TerminationConfig {
        node_count_limit: Some(1),
        ..TerminationConfig::default()
    });
    let result = solve(&inst.graph, &config, None).unwrap();
    assert_eq!(result.solution.status, SolveStatus::Unknown);
    assert_eq!(result.solution.permutation, None);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SolverConfig::new().with_restarts(RestartConfig::geometric(10, 1.0));
    let graph = instance("tiny_5_5").graph;
    let err = solve(&graph, &config, None).unwrap_err();
    assert!(matches!(err, CrossForgeError::Config(_)));
}

#[test]
fn test_channel_streams_improvements_then_final() {
    let inst = instance("mixed_10_10");
    let config = reproducible()
        .with_model(ModelConfig::bare())
        .with_heuristic_warm_start(false);
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let result = solve_with_channel(&inst.graph, &config, None, sender).unwrap();

    let mut received = Vec::new();
    while let Ok(solution) = receiver.try_recv() {
        received.push(solution);
    }
    let (last, improvements) = received.split_last().unwrap();
    assert_eq!(*last, result.solution);
    assert_eq!(improvements.len() as u64, result.stats.solutions);
    assert!(improvements
        .iter()
        .all(|s| s.status == SolveStatus::Satisfiable));
    assert!(improvements
        .windows(2)
        .all(|w| w[1].objective < w[0].objective));
    assert_eq!(
        improvements.last().and_then(|s| s.objective),
        Some(inst.optimum)
    );
}

#[test]
fn test_terminate_early_outside_solve() {
    let solver = Solver::new(SolverConfig::default());
    assert!(!solver.is_solving());
    assert!(!solver.terminate_early());
}

#[test]
fn test_reproducible_runs_agree() {
    let graph = random_graph(9, 8, 11, 0.35);
    let config = reproducible().with_search_strategy(SearchStrategy::Median);
    let a = solve(&graph, &config, None).unwrap();
    let b = solve(&graph, &config, None).unwrap();
    assert_eq!(a.solution, b.solution);
    assert_eq!(a.stats.nodes, b.stats.nodes);
    assert_eq!(a.stats.fails, b.stats.fails);
}

#[test]
fn test_statistics_are_collected() {
    let inst = instance("mixed_10_10");
    let config = reproducible().with_heuristic_warm_start(false);
    let result = solve(&inst.graph, &config, None).unwrap();
    let stats = &result.stats;

    assert!(stats.solutions >= 1);
    assert!(stats.nodes >= stats.fails);
    assert!(stats.propagations > 0);
    assert!(stats.lower_bound_calls > 0);
    assert!(stats.lower_bound_prunes <= stats.lower_bound_calls);
    let n = inst.graph.free_count();
    assert_eq!(
        stats.reduction.closure_pairs + stats.reduction.incomparable_pairs,
        n * (n - 1) / 2
    );
}
