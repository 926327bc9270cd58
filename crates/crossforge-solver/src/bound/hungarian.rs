//! Minimum-weight perfect matching on a dense square matrix.

/// Kuhn-Munkres with potentials, `O(n³)`.
///
/// Buffers are kept between calls; solving a matrix of the same size does
/// not allocate.
#[derive(Debug, Clone, Default)]
pub struct Hungarian {
    u: Vec<i64>,
    v: Vec<i64>,
    matched_row: Vec<usize>,
    way: Vec<usize>,
    min_slack: Vec<i64>,
    used: Vec<bool>,
}

impl Hungarian {
    pub fn new() -> Self {
        Self::default()
    }

    fn prepare(&mut self, n: usize) {
        for buf in [&mut self.u, &mut self.v, &mut self.min_slack] {
            buf.clear();
            buf.resize(n + 1, 0);
        }
        for buf in [&mut self.matched_row, &mut self.way] {
            buf.clear();
            buf.resize(n + 1, 0);
        }
        self.used.clear();
        self.used.resize(n + 1, false);
    }

    /// Solves the assignment problem for the row-major `n × n` matrix
    /// `cost` and returns the weight of an optimal matching.
    ///
    /// Entries must be non-negative and small enough that `n` of them sum
    /// without overflow.
    pub fn solve(&mut self, n: usize, cost: &[i64]) -> i64 {
        debug_assert_eq!(cost.len(), n * n);
        if n == 0 {
            return 0;
        }
        const INF: i64 = i64::MAX / 4;
        self.prepare(n);

        // 1-based rows and columns; column 0 is the virtual start.
        for row in 1..=n {
            self.matched_row[0] = row;
            let mut col0 = 0;
            self.min_slack.iter_mut().for_each(|s| *s = INF);
            self.used.iter_mut().for_each(|u| *u = false);

            loop {
                self.used[col0] = true;
                let row0 = self.matched_row[col0];
                let mut delta = INF;
                let mut col1 = 0;
                let base = (row0 - 1) * n;
                for col in 1..=n {
                    if self.used[col] {
                        continue;
                    }
                    let slack = cost[base + col - 1] - self.u[row0] - self.v[col];
                    if slack < self.min_slack[col] {
                        self.min_slack[col] = slack;
                        self.way[col] = col0;
                    }
                    if self.min_slack[col] < delta {
                        delta = self.min_slack[col];
                        col1 = col;
                    }
                }
                for col in 0..=n {
                    if self.used[col] {
                        self.u[self.matched_row[col]] += delta;
                        self.v[col] -= delta;
                    } else {
                        self.min_slack[col] -= delta;
                    }
                }
                col0 = col1;
                if self.matched_row[col0] == 0 {
                    break;
                }
            }

            loop {
                let col1 = self.way[col0];
                self.matched_row[col0] = self.matched_row[col1];
                col0 = col1;
                if col0 == 0 {
                    break;
                }
            }
        }

        (1..=n)
            .map(|col| cost[(self.matched_row[col] - 1) * n + col - 1])
            .sum()
    }

    /// Column assigned to each row by the last [`solve`](Self::solve).
    pub fn assignment(&self, n: usize) -> Vec<usize> {
        let mut columns = vec![0; n];
        for col in 1..=n {
            let row = self.matched_row[col];
            if row > 0 {
                columns[row - 1] = col - 1;
            }
        }
        columns
    }
}
