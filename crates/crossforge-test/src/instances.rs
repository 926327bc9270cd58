//! Graphs with known optimal crossing numbers.

use crossforge_core::{BipartiteGraph, GraphBuilder};

use crate::complete_bipartite;

/// A named graph and its optimum.
#[derive(Debug, Clone)]
pub struct Instance {
    pub name: &'static str,
    pub graph: BipartiteGraph,
    pub optimum: u64,
}

fn pace(fixed: usize, free: usize, edges: &[(usize, usize)]) -> BipartiteGraph {
    let mut builder = GraphBuilder::new(fixed, free);
    for &(a, b) in edges {
        builder.add_pace_edge(a, b).expect("fixture edge in range");
    }
    builder.build().expect("fixture graph is valid")
}

fn adjacency(fixed: usize, adjacency: Vec<Vec<usize>>) -> BipartiteGraph {
    BipartiteGraph::from_adjacency(fixed, adjacency).expect("fixture graph is valid")
}

/// Small instances covering planar, dense and cyclic structure.
pub fn reference_instances() -> Vec<Instance> {
    vec![
        Instance {
            name: "planar_5_5",
            graph: pace(5, 5, &[(2, 8), (3, 6), (3, 9), (4, 10)]),
            optimum: 0,
        },
        Instance {
            name: "tiny_5_5",
            graph: pace(
                5,
                5,
                &[(1, 7), (1, 8), (2, 8), (3, 6), (4, 6), (4, 8), (5, 7)],
            ),
            optimum: 5,
        },
        Instance {
            name: "complete_4_5",
            graph: complete_bipartite(4, 5),
            optimum: 60,
        },
        Instance {
            name: "cycle_8_shuffled",
            graph: adjacency(4, vec![vec![0, 1], vec![1, 2], vec![2, 3], vec![0, 3]]),
            optimum: 4,
        },
        Instance {
            name: "cycle_8_sorted",
            graph: adjacency(4, vec![vec![0, 1], vec![1, 3], vec![2, 3], vec![0, 2]]),
            optimum: 3,
        },
        Instance {
            name: "matching_4_4",
            graph: adjacency(4, vec![vec![2], vec![0], vec![3], vec![1]]),
            optimum: 0,
        },
        Instance {
            name: "sparse_10_10",
            graph: pace(
                10,
                10,
                &[
                    (1, 16),
                    (3, 13),
                    (4, 13),
                    (5, 14),
                    (9, 11),
                    (10, 15),
                    (10, 17),
                    (10, 19),
                    (10, 20),
                ],
            ),
            optimum: 0,
        },
        Instance {
            name: "mixed_10_10",
            graph: pace(
                10,
                10,
                &[
                    (1, 18),
                    (2, 11),
                    (2, 14),
                    (2, 20),
                    (4, 15),
                    (5, 11),
                    (5, 13),
                    (6, 17),
                    (7, 11),
                    (7, 16),
                    (8, 15),
                    (9, 18),
                ],
            ),
            optimum: 17,
        },
    ]
}
