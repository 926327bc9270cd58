//! Incremental minimum-prefix sums over one row of reduced costs.

/// One row of the assignment cost matrix, built column by column.
///
/// Holds the costs `reduced[i][j]` of a free vertex `i` sorted ascending
/// (ranks `0..n`). The *prefix* is the head of the linked list of ranks
/// still available; its sum is the cheapest way to pay for the vertices
/// that follow `i`. Sweeping to the next column shrinks the prefix by one
/// ([`advance`](Self::advance)); ruling a vertex out of the suffix unlinks
/// its rank ([`remove`](Self::remove)) and pulls the next rank in. When no
/// rank is left to pull, the shortfall is counted as overflow and the row
/// becomes infeasible.
///
/// All links live in two arrays reset in place, so a rebuild does not
/// allocate.
#[derive(Debug, Clone)]
pub struct AssignmentRowBuilder {
    costs: Vec<u64>,
    next: Vec<usize>,
    prev: Vec<usize>,
    tail: usize,
    sum: u64,
    overflow: usize,
}

impl AssignmentRowBuilder {
    /// `costs` must be sorted ascending.
    pub fn new(costs: Vec<u64>) -> Self {
        debug_assert!(costs.windows(2).all(|w| w[0] <= w[1]));
        let n = costs.len();
        let mut row = Self {
            costs,
            next: vec![0; n + 1],
            prev: vec![0; n + 1],
            tail: n,
            sum: 0,
            overflow: 0,
        };
        row.reset();
        row
    }

    #[inline]
    fn head(&self) -> usize {
        self.costs.len()
    }

    /// Relinks every rank and takes all of them as the prefix.
    pub fn reset(&mut self) {
        let n = self.costs.len();
        for r in 0..=n {
            self.next[r] = if r == n { 0 } else { r + 1 };
            self.prev[r] = if r == 0 { n } else { r - 1 };
        }
        if n == 0 {
            self.next[0] = 0;
            self.prev[0] = 0;
        }
        self.tail = if n == 0 { n } else { n - 1 };
        self.sum = self.costs.iter().sum();
        self.overflow = 0;
    }

    /// Sum of the prefix.
    pub fn sum(&self) -> u64 {
        self.sum
    }

    #[inline]
    pub fn cost_at_rank(&self, rank: usize) -> u64 {
        self.costs[rank]
    }

    /// Prefix slots that could not be filled.
    pub fn overflow(&self) -> usize {
        self.overflow
    }

    /// Cost of the current column, `infeasible` if the row overflowed.
    #[inline]
    pub fn cost(&self, infeasible: u64) -> u64 {
        if self.overflow > 0 {
            infeasible
        } else {
            self.sum
        }
    }

    /// Number of ranks in the prefix, including missing ones.
    pub fn prefix_len(&self) -> usize {
        let head = self.head();
        let mut len = self.overflow;
        let mut r = self.tail;
        while r != head {
            len += 1;
            r = self.prev[r];
        }
        len
    }

    #[inline]
    fn in_prefix(&self, rank: usize) -> bool {
        self.tail != self.head() && rank <= self.tail
    }

    /// Unlinks `rank`. If it was in the prefix, the next linked rank takes
    /// its place.
    pub fn remove(&mut self, rank: usize) {
        let head = self.head();
        let in_prefix = self.in_prefix(rank);
        if in_prefix {
            self.sum -= self.costs[rank];
            if rank == self.tail {
                self.tail = self.prev[rank];
            }
        }

        let (p, n) = (self.prev[rank], self.next[rank]);
        self.next[p] = n;
        self.prev[n] = p;

        if in_prefix {
            let candidate = self.next[self.tail];
            if candidate != head {
                self.tail = candidate;
                self.sum += self.costs[candidate];
            } else {
                self.overflow += 1;
            }
        }
    }

    /// Drops the most expensive slot of the prefix.
    pub fn advance(&mut self) {
        if self.overflow > 0 {
            self.overflow -= 1;
        } else if self.tail != self.head() {
            self.sum -= self.costs[self.tail];
            self.tail = self.prev[self.tail];
        }
    }
}
