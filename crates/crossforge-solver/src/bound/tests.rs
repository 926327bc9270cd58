use crossforge_core::{crossing_number, CrossingMatrix};
use crossforge_test::{brute_force_optimum, complete_bipartite, random_graph};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::*;
use crate::engine::{Engine, Store, VarId};

#[test]
fn test_row_builder_remove_pulls_next_rank() {
    let mut row = AssignmentRowBuilder::new(vec![0, 1, 3, 5]);
    assert_eq!(row.sum(), 9);
    assert_eq!(row.prefix_len(), 4);

    row.advance();
    assert_eq!(row.sum(), 4);
    assert_eq!(row.prefix_len(), 3);

    row.remove(1);
    assert_eq!(row.sum(), 8);
    assert_eq!(row.prefix_len(), 3);

    row.remove(3);
    assert_eq!(row.overflow(), 1);
    assert_eq!(row.cost(100), 100);
    assert_eq!(row.prefix_len(), 3);

    row.advance();
    assert_eq!(row.overflow(), 0);
    assert_eq!(row.cost(100), 3);
    row.advance();
    assert_eq!(row.sum(), 0);
}

#[test]
fn test_row_builder_remove_outside_prefix() {
    let mut row = AssignmentRowBuilder::new(vec![0, 1, 3, 5]);
    row.advance();
    row.advance();
    assert_eq!(row.sum(), 1);
    row.remove(3);
    assert_eq!(row.sum(), 1);
    assert_eq!(row.prefix_len(), 2);

    row.reset();
    assert_eq!(row.sum(), 9);
    assert_eq!(row.overflow(), 0);
}

#[test]
fn test_hungarian_small_matrix() {
    let mut hungarian = Hungarian::new();
    let cost = [4, 1, 3, 2, 0, 5, 3, 2, 2];
    assert_eq!(hungarian.solve(3, &cost), 5);
    assert_eq!(hungarian.assignment(3), vec![1, 0, 2]);
    assert_eq!(hungarian.solve(0, &[]), 0);
}

fn brute_force_assignment(n: usize, cost: &[i64]) -> i64 {
    fn go(row: usize, n: usize, cost: &[i64], used: &mut [bool]) -> i64 {
        if row == n {
            return 0;
        }
        let mut best = i64::MAX;
        for col in 0..n {
            if !used[col] {
                used[col] = true;
                best = best.min(cost[row * n + col] + go(row + 1, n, cost, used));
                used[col] = false;
            }
        }
        best
    }
    go(0, n, cost, &mut vec![false; n])
}

#[test]
fn test_hungarian_matches_enumeration() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut hungarian = Hungarian::new();
    for n in 1..=6 {
        for _ in 0..10 {
            let cost: Vec<i64> = (0..n * n).map(|_| rng.random_range(0..30)).collect();
            assert_eq!(hungarian.solve(n, &cost), brute_force_assignment(n, &cost));
        }
    }
}

fn position_store(n: usize, matrix: &CrossingMatrix) -> (Store, Vec<VarId>) {
    let mut store = Store::new(0, matrix.constant() + matrix.reduced_total());
    let positions = (0..n).map(|_| store.new_var(n)).collect();
    (store, positions)
}

#[test]
fn test_root_bound_is_sound() {
    for seed in 0..15 {
        let graph = random_graph(seed, 5, 7, 0.4);
        let matrix = CrossingMatrix::new(&graph);
        let (store, positions) = position_store(graph.free_count(), &matrix);
        let mut bound = AssignmentLowerBound::new(positions, &matrix);

        let value = bound.compute(&store).unwrap();
        assert!(value >= matrix.constant());
        assert!(value <= brute_force_optimum(&graph), "seed {seed}");
    }
}

#[test]
fn test_complete_bipartite_bound_is_tight() {
    let graph = complete_bipartite(4, 5);
    let matrix = CrossingMatrix::new(&graph);
    let (store, positions) = position_store(5, &matrix);
    let mut bound = AssignmentLowerBound::new(positions, &matrix);
    assert_eq!(bound.compute(&store), Some(60));
}

#[test]
fn test_bound_tightens_monotonically_to_exact_cost() {
    let mut rng = StdRng::seed_from_u64(3);
    for seed in 0..10 {
        let graph = random_graph(seed, 6, 8, 0.35);
        let n = graph.free_count();
        let matrix = CrossingMatrix::new(&graph);
        let (mut store, positions) = position_store(n, &matrix);
        let mut bound = AssignmentLowerBound::new(positions.clone(), &matrix);

        let mut permutation: Vec<usize> = (0..n).collect();
        permutation.shuffle(&mut rng);

        let mut previous = bound.compute(&store).unwrap();
        for (k, &v) in permutation.iter().enumerate() {
            store.instantiate(positions[v], k).unwrap();
            // Keep the remaining positions consistent with an injective map.
            for &w in &permutation[k + 1..] {
                store.remove(positions[w], k).unwrap();
            }
            let current = bound.compute(&store).unwrap();
            assert!(current >= previous, "seed {seed}, step {k}");
            previous = current;
        }
        assert_eq!(previous, crossing_number(&graph, &permutation));
    }
}

#[test]
fn test_bound_detects_pigeonhole() {
    let graph = random_graph(1, 4, 3, 0.5);
    let matrix = CrossingMatrix::new(&graph);
    let (mut store, positions) = position_store(3, &matrix);
    store.update_ub(positions[0], 0).unwrap();
    store.update_ub(positions[1], 0).unwrap();
    let mut bound = AssignmentLowerBound::new(positions, &matrix);
    assert_eq!(bound.compute(&store), None);
}

#[test]
fn test_propagator_raises_objective_and_fails_below_it() {
    let graph = complete_bipartite(4, 5);
    let matrix = CrossingMatrix::new(&graph);
    let (store, positions) = position_store(5, &matrix);
    let mut engine = Engine::new(store);
    let bound = AssignmentLowerBound::new(positions, &matrix);
    let counters = bound.counters();
    engine.post(bound);

    engine.fixpoint().unwrap();
    assert_eq!(engine.store().objective_lb(), 60);
    assert_eq!(counters.calls(), 1);
    assert_eq!(counters.prunes(), 1);

    engine.store_mut().push_level();
    engine.store_mut().update_objective_ub(59).unwrap_err();
    engine.store_mut().pop_level();
}

#[test]
fn test_propagator_fails_when_cap_below_bound() {
    let graph = complete_bipartite(3, 4);
    let matrix = CrossingMatrix::new(&graph);
    let mut store = Store::new(0, 10);
    let positions: Vec<VarId> = (0..4).map(|_| store.new_var(4)).collect();
    let mut engine = Engine::new(store);
    let bound = AssignmentLowerBound::new(positions, &matrix);
    let counters = bound.counters();
    engine.post(bound);

    // Six pairs sharing three crossings each.
    assert_eq!(matrix.constant(), 18);
    assert!(engine.fixpoint().is_err());
    assert_eq!(counters.prunes(), 1);
}
