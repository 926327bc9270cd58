use crossforge_config::SolverConfig;
use crossforge_core::{crossing_number, SolveStatus, UpperBound};
use crossforge_test::reference_instances;
use tokio::sync::mpsc;

use super::*;

#[test]
fn test_solve_reference_instances() {
    let config = SolverConfig::default();
    for inst in reference_instances() {
        let result = solve(&inst.graph, &config).unwrap();
        assert_eq!(result.solution.status, SolveStatus::Optimal, "{}", inst.name);
        assert_eq!(result.solution.objective, Some(inst.optimum), "{}", inst.name);
    }
}

#[test]
fn test_solve_with_bound_keeps_warm_start() {
    let inst = reference_instances()
        .into_iter()
        .find(|i| i.name == "tiny_5_5")
        .unwrap();
    let first = solve(&inst.graph, &SolverConfig::default()).unwrap();
    let permutation = first.solution.permutation.unwrap();
    let objective = crossing_number(&inst.graph, &permutation);

    let bound = UpperBound::with_permutation(objective, permutation.clone());
    let result = solve_with_bound(&inst.graph, &SolverConfig::default(), bound).unwrap();
    assert_eq!(result.solution.permutation, Some(permutation));
    assert_eq!(result.solution.status, SolveStatus::Optimal);
}

#[test]
fn test_solve_with_channel_ends_with_final_solution() {
    let inst = reference_instances()
        .into_iter()
        .find(|i| i.name == "complete_4_5")
        .unwrap();
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let result = solve_with_channel(&inst.graph, &SolverConfig::default(), sender).unwrap();

    let mut last = None;
    while let Ok(solution) = receiver.try_recv() {
        last = Some(solution);
    }
    assert_eq!(last, Some(result.solution));
}
