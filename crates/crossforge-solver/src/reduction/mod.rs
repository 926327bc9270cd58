//! Partial order reduction.
//!
//! Three rules prove, pair by pair, that some free vertex can be placed
//! before another in at least one optimal permutation. The forced pairs form
//! a DAG over the free layer; search only decides the pairs its transitive
//! closure leaves open.
//!
//! Rules read the raw crossing counts `c(i, j)`:
//!
//! - **dominance**: `c(i, j) == 0 < c(j, i)` forces `i` before `j`. Pairs
//!   with `c(i, j) == c(j, i) == 0` stay open.
//! - **twins**: identical neighbor lists force the lower index first.
//! - **degree two**: both vertices of degree 2 with `c(i, j) == 1` and
//!   `c(j, i) == 2` force `i` before `j`.
//!
//! Rules are tried in that order and the first match decides the pair.

use std::collections::VecDeque;

use crossforge_config::ModelConfig;
use crossforge_core::{BipartiteGraph, CrossingMatrix};
use tracing::{debug, warn};

use crate::bitset::BitSet;

/// Which reduction rules are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionRules {
    pub dominance: bool,
    pub twins: bool,
    pub degree_two: bool,
}

impl ReductionRules {
    pub fn all() -> Self {
        Self {
            dominance: true,
            twins: true,
            degree_two: true,
        }
    }

    pub fn none() -> Self {
        Self {
            dominance: false,
            twins: false,
            degree_two: false,
        }
    }

    pub fn any(&self) -> bool {
        self.dominance || self.twins || self.degree_two
    }
}

impl From<&ModelConfig> for ReductionRules {
    fn from(config: &ModelConfig) -> Self {
        Self {
            dominance: config.reduction_rule_1,
            twins: config.reduction_rule_2,
            degree_two: config.reduction_rule_3,
        }
    }
}

/// Rule that ordered a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Dominance,
    Twins,
    DegreeTwo,
}

/// Counters describing one reduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReductionStats {
    /// Pairs ordered by the dominance rule.
    pub dominance_pairs: usize,
    /// Pairs ordered by the twin rule.
    pub twin_pairs: usize,
    /// Pairs ordered by the degree-two rule.
    pub degree_two_pairs: usize,
    /// Rule edges discarded because they closed a cycle.
    pub cyclic_edges_dropped: usize,
    /// Edges left after transitive reduction.
    pub ordered_edges: usize,
    /// Ordered pairs implied by the transitive closure.
    pub closure_pairs: usize,
    /// Pairs left for search.
    pub incomparable_pairs: usize,
}

/// Decides the relative order of free vertices `i` and `j`, if a rule
/// applies. Returns `(before, after, rule)`.
pub fn classify_pair(
    graph: &BipartiteGraph,
    matrix: &CrossingMatrix,
    rules: ReductionRules,
    i: usize,
    j: usize,
) -> Option<(usize, usize, Rule)> {
    let cij = matrix.count(i, j);
    let cji = matrix.count(j, i);

    if rules.dominance {
        if cij == 0 && cji > 0 {
            return Some((i, j, Rule::Dominance));
        }
        if cji == 0 && cij > 0 {
            return Some((j, i, Rule::Dominance));
        }
    }
    if rules.twins && graph.are_twins(i, j) {
        return Some((i.min(j), i.max(j), Rule::Twins));
    }
    if rules.degree_two && graph.degree(i) == 2 && graph.degree(j) == 2 {
        match (cij, cji) {
            (1, 2) => return Some((i, j, Rule::DegreeTwo)),
            (2, 1) => return Some((j, i, Rule::DegreeTwo)),
            _ => {}
        }
    }
    None
}

/// Forced order over the free layer.
///
/// Invariants: the edge set is acyclic and transitively reduced; every
/// unordered pair is either comparable in the closure or listed as
/// incomparable, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialOrder {
    successors: Vec<Vec<usize>>,
    reach: Vec<BitSet>,
    incomparable: Vec<(usize, usize)>,
    stats: ReductionStats,
}

impl PartialOrder {
    /// Builds the order generated by `edges` over `n` vertices.
    ///
    /// Edges inside a strongly connected component are dropped, so the
    /// result is always a DAG.
    pub fn from_edges(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        Self::build(n, edges.into_iter().collect(), ReductionStats::default())
    }

    fn build(n: usize, edges: Vec<(usize, usize)>, mut stats: ReductionStats) -> Self {
        let mut successors = vec![Vec::new(); n];
        for (before, after) in edges {
            successors[before].push(after);
        }

        let component = strongly_connected_components(&successors);
        let mut dropped = 0;
        for (v, succ) in successors.iter_mut().enumerate() {
            let len = succ.len();
            succ.retain(|&w| component[w] != component[v]);
            dropped += len - succ.len();
        }
        if dropped > 0 {
            warn!(
                event = "cyclic_order",
                dropped_edges = dropped,
                "Reduction produced a cycle, its edges were discarded"
            );
        }
        stats.cyclic_edges_dropped = dropped;

        let topo = topological_order(&successors);
        let mut topo_index = vec![0; n];
        for (k, &v) in topo.iter().enumerate() {
            topo_index[v] = k;
        }

        let mut reach: Vec<BitSet> = (0..n).map(|_| BitSet::new(n)).collect();
        for &v in topo.iter().rev() {
            let mut r = BitSet::new(n);
            for &w in &successors[v] {
                r.insert(w);
                r.union_with(&reach[w]);
            }
            reach[v] = r;
        }

        // Nearest successors first: an edge is redundant iff an earlier
        // kept successor already reaches its head.
        for v in 0..n {
            let mut succ = std::mem::take(&mut successors[v]);
            succ.sort_by_key(|&w| topo_index[w]);
            succ.dedup();
            let mut covered = BitSet::new(n);
            succ.retain(|&w| {
                if covered.contains(w) {
                    return false;
                }
                covered.insert(w);
                covered.union_with(&reach[w]);
                true
            });
            succ.sort_unstable();
            successors[v] = succ;
        }

        let mut incomparable = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                if !reach[i].contains(j) && !reach[j].contains(i) {
                    incomparable.push((i, j));
                }
            }
        }

        stats.ordered_edges = successors.iter().map(Vec::len).sum();
        stats.closure_pairs = reach.iter().map(BitSet::count).sum();
        stats.incomparable_pairs = incomparable.len();

        Self {
            successors,
            reach,
            incomparable,
            stats,
        }
    }

    /// Number of free vertices.
    pub fn len(&self) -> usize {
        self.successors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    /// Direct successors of `v` in the transitively reduced DAG.
    pub fn successors(&self, v: usize) -> &[usize] {
        &self.successors[v]
    }

    /// Edges `(before, after)` of the transitively reduced DAG.
    pub fn ordered_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.successors
            .iter()
            .enumerate()
            .flat_map(|(v, succ)| succ.iter().map(move |&w| (v, w)))
    }

    /// Whether `i` must precede `j`.
    pub fn precedes(&self, i: usize, j: usize) -> bool {
        self.reach[i].contains(j)
    }

    pub fn is_incomparable(&self, i: usize, j: usize) -> bool {
        i != j && !self.precedes(i, j) && !self.precedes(j, i)
    }

    /// Open pairs `(i, j)` with `i < j`, in lexicographic order.
    pub fn incomparable_pairs(&self) -> &[(usize, usize)] {
        &self.incomparable
    }

    /// Every pair `(before, after)` of the transitive closure.
    pub fn closure_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.reach
            .iter()
            .enumerate()
            .flat_map(|(v, r)| r.iter().map(move |w| (v, w)))
    }

    pub fn stats(&self) -> &ReductionStats {
        &self.stats
    }
}

/// Applies the enabled rules to every pair and builds the resulting order.
pub fn reduce(
    graph: &BipartiteGraph,
    matrix: &CrossingMatrix,
    rules: ReductionRules,
) -> PartialOrder {
    let n = graph.free_count();
    let mut stats = ReductionStats::default();
    let mut edges = Vec::new();

    if rules.any() {
        for i in 0..n {
            for j in i + 1..n {
                if let Some((before, after, rule)) = classify_pair(graph, matrix, rules, i, j) {
                    match rule {
                        Rule::Dominance => stats.dominance_pairs += 1,
                        Rule::Twins => stats.twin_pairs += 1,
                        Rule::DegreeTwo => stats.degree_two_pairs += 1,
                    }
                    edges.push((before, after));
                }
            }
        }
    }

    let order = PartialOrder::build(n, edges, stats);
    let stats = order.stats();
    debug!(
        event = "reduction_rules",
        dominance = stats.dominance_pairs,
        twins = stats.twin_pairs,
        degree_two = stats.degree_two_pairs,
        ordered_edges = stats.ordered_edges,
        incomparable_pairs = stats.incomparable_pairs,
    );
    order
}

/// Tarjan's algorithm without recursion. Returns a component id per vertex.
fn strongly_connected_components(successors: &[Vec<usize>]) -> Vec<usize> {
    const UNVISITED: usize = usize::MAX;

    let n = successors.len();
    let mut index = vec![UNVISITED; n];
    let mut low = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut component = vec![UNVISITED; n];
    let mut stack = Vec::new();
    let mut call: Vec<(usize, usize)> = Vec::new();
    let mut next_index = 0;
    let mut next_component = 0;

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }
        index[root] = next_index;
        low[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;
        call.push((root, 0));

        while let Some(frame) = call.last_mut() {
            let v = frame.0;
            if let Some(&w) = successors[v].get(frame.1) {
                frame.1 += 1;
                if index[w] == UNVISITED {
                    index[w] = next_index;
                    low[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    call.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(index[w]);
                }
                continue;
            }

            call.pop();
            if let Some(&(parent, _)) = call.last() {
                low[parent] = low[parent].min(low[v]);
            }
            if low[v] == index[v] {
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component[w] = next_component;
                    if w == v {
                        break;
                    }
                }
                next_component += 1;
            }
        }
    }
    component
}

/// Kahn's algorithm; sources are taken in index order. Input must be acyclic.
fn topological_order(successors: &[Vec<usize>]) -> Vec<usize> {
    let n = successors.len();
    let mut indegree = vec![0usize; n];
    for succ in successors {
        for &w in succ {
            indegree[w] += 1;
        }
    }
    let mut queue: VecDeque<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(v) = queue.pop_front() {
        order.push(v);
        for &w in &successors[v] {
            indegree[w] -= 1;
            if indegree[w] == 0 {
                queue.push_back(w);
            }
        }
    }
    debug_assert_eq!(order.len(), n);
    order
}

#[cfg(test)]
mod tests;
