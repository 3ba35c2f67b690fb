//! N-queens as a swap neighborhood over a permutation board.
//!
//! Queen `i` stands in column `i`, row `rows[i]`. Rows form a permutation,
//! so rows and columns never conflict; only diagonals do. A move swaps
//! the rows of two queens.

use crate::search::{MultiCommit, MultiGain, MultiGetMoves, MultiSearchComponents, MultiSolution};

/// Permutation board with per-diagonal queen counts.
///
/// # Examples
///
/// ```
/// use u_localsearch::problems::{n_queens_components, NQueensSolution};
/// use u_localsearch::search::first_improving_multi;
///
/// let mut board = NQueensSolution::new(8);
/// assert_eq!(board.conflicts(), 28);
/// first_improving_multi(&mut board, n_queens_components());
/// assert!(board.conflicts() < 28);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NQueensSolution {
    rows: Vec<usize>,
    /// Queens per `col + row` diagonal.
    sums: Vec<usize>,
    /// Queens per `col + n - 1 - row` diagonal.
    diffs: Vec<usize>,
}

impl NQueensSolution {
    /// Identity board: queen `i` on row `i`, all on one diagonal.
    pub fn new(n: usize) -> Self {
        Self::build((0..n).collect())
    }

    /// Board from explicit rows, which must be a permutation of `0..n`.
    pub fn from_rows(rows: Vec<usize>) -> Result<Self, String> {
        let n = rows.len();
        let mut seen = vec![false; n];
        for &r in &rows {
            if r >= n || seen[r] {
                return Err(format!("rows must be a permutation of 0..{n}"));
            }
            seen[r] = true;
        }
        Ok(Self::build(rows))
    }

    fn build(rows: Vec<usize>) -> Self {
        let n = rows.len();
        let diagonals = (2 * n).saturating_sub(1);
        let mut board = Self {
            rows,
            sums: vec![0; diagonals],
            diffs: vec![0; diagonals],
        };
        for col in 0..n {
            let (s, d) = board.diagonals(col, board.rows[col]);
            board.sums[s] += 1;
            board.diffs[d] += 1;
        }
        board
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<usize> {
        self.rows
    }

    /// Number of attacking queen pairs.
    pub fn conflicts(&self) -> usize {
        self.sums.iter().chain(&self.diffs).map(|&c| pairs(c)).sum()
    }

    fn diagonals(&self, col: usize, row: usize) -> (usize, usize) {
        (col + row, col + self.rows.len() - 1 - row)
    }

    /// Reduction in attacking pairs if queens `a` and `b` swap rows.
    pub fn swap_gain(&self, a: usize, b: usize) -> i64 {
        if a == b {
            return 0;
        }
        let (ra, rb) = (self.rows[a], self.rows[b]);
        let (old_sa, old_da) = self.diagonals(a, ra);
        let (old_sb, old_db) = self.diagonals(b, rb);
        let (new_sa, new_da) = self.diagonals(a, rb);
        let (new_sb, new_db) = self.diagonals(b, ra);

        let sums = delta(&self.sums, &[old_sa, old_sb], &[new_sa, new_sb]);
        let diffs = delta(&self.diffs, &[old_da, old_db], &[new_da, new_db]);
        -(sums + diffs)
    }

    /// Swaps the rows of queens `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for col in [a, b] {
            let (s, d) = self.diagonals(col, self.rows[col]);
            self.sums[s] -= 1;
            self.diffs[d] -= 1;
        }
        self.rows.swap(a, b);
        for col in [a, b] {
            let (s, d) = self.diagonals(col, self.rows[col]);
            self.sums[s] += 1;
            self.diffs[d] += 1;
        }
    }
}

impl MultiSolution for NQueensSolution {
    type Element = usize;

    fn elements(&self) -> Vec<usize> {
        (0..self.rows.len()).collect()
    }
}

fn pairs(count: usize) -> usize {
    count * count.saturating_sub(1) / 2
}

/// Change in attacking pairs on one diagonal family when the queens on
/// `removed` move to `added`.
fn delta(counts: &[usize], removed: &[usize; 2], added: &[usize; 2]) -> i64 {
    let mut changes: Vec<(usize, i64)> = Vec::with_capacity(4);
    let mut bump = |index: usize, by: i64| match changes.iter_mut().find(|(i, _)| *i == index) {
        Some((_, d)) => *d += by,
        None => changes.push((index, by)),
    };
    for &i in removed {
        bump(i, -1);
    }
    for &i in added {
        bump(i, 1);
    }
    changes
        .into_iter()
        .map(|(i, d)| {
            let before = counts[i] as i64;
            let after = before + d;
            (after * (after - 1) / 2) - (before * (before - 1) / 2)
        })
        .sum()
}

/// Swap partners of a queen: every later queen.
#[derive(Debug, Clone, Copy, Default)]
pub struct NQueensMoves;

impl MultiGetMoves<NQueensSolution, usize> for NQueensMoves {
    type Move = usize;

    fn get_moves(&mut self, solution: &NQueensSolution, queen: &usize) -> Vec<usize> {
        (queen + 1..solution.len()).collect()
    }
}

/// Conflict reduction of a swap.
#[derive(Debug, Clone, Copy, Default)]
pub struct NQueensGain;

impl MultiGain<NQueensSolution, usize, usize> for NQueensGain {
    fn gain(&mut self, solution: &NQueensSolution, queen: &usize, partner: &usize) -> f64 {
        solution.swap_gain(*queen, *partner) as f64
    }
}

/// Applies a swap.
#[derive(Debug, Clone, Copy, Default)]
pub struct NQueensCommit;

impl MultiCommit<NQueensSolution, usize, usize> for NQueensCommit {
    fn commit(&mut self, solution: &mut NQueensSolution, queen: &usize, partner: &usize) -> bool {
        solution.swap(*queen, *partner);
        true
    }
}

/// Swap neighborhood components for [`NQueensSolution`].
pub fn n_queens_components() -> MultiSearchComponents<NQueensMoves, NQueensGain, NQueensCommit> {
    MultiSearchComponents::new(NQueensMoves, NQueensGain, NQueensCommit)
}
