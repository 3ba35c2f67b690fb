//! Best-solution recording as a commit decorator.

use crate::search::{Commit, MultiCommit};

/// Strict "is better than" relation between two solutions.
///
/// Any strict weak order works; it need not be numeric.
pub trait Better<S> {
    /// Whether `candidate` is strictly better than `incumbent`.
    fn better(&mut self, candidate: &S, incumbent: &S) -> bool;
}

impl<S, F> Better<S> for F
where
    F: FnMut(&S, &S) -> bool,
{
    fn better(&mut self, candidate: &S, incumbent: &S) -> bool {
        self(candidate, incumbent)
    }
}

/// Prefers the solution with the larger objective value.
#[derive(Debug, Clone, Copy)]
pub struct Maximize<F>(pub F);

impl<S, O, F> Better<S> for Maximize<F>
where
    F: FnMut(&S) -> O,
    O: PartialOrd,
{
    fn better(&mut self, candidate: &S, incumbent: &S) -> bool {
        (self.0)(candidate) > (self.0)(incumbent)
    }
}

/// Prefers the solution with the smaller objective value.
#[derive(Debug, Clone, Copy)]
pub struct Minimize<F>(pub F);

impl<S, O, F> Better<S> for Minimize<F>
where
    F: FnMut(&S) -> O,
    O: PartialOrd,
{
    fn better(&mut self, candidate: &S, incumbent: &S) -> bool {
        (self.0)(candidate) < (self.0)(incumbent)
    }
}

/// Commit decorator that keeps a copy of the best solution committed so far.
///
/// After the wrapped commit runs, the resulting solution replaces the
/// recorded one only if it is strictly better. The return value of the
/// wrapped commit is passed through.
///
/// # Examples
///
/// ```
/// use u_localsearch::sa::{Maximize, RecordBest};
/// use u_localsearch::search::Commit;
///
/// let add = |x: &mut i32, m: &i32| {
///     *x += m;
///     true
/// };
/// let mut record = RecordBest::new(0, add, Maximize(|x: &i32| *x));
///
/// let mut x = 0;
/// record.commit(&mut x, &5);
/// record.commit(&mut x, &-3);
/// assert_eq!(x, 2);
/// assert_eq!(*record.best(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct RecordBest<S, C, B> {
    best: S,
    commit: C,
    better: B,
    improvements: usize,
}

impl<S, C, B> RecordBest<S, C, B>
where
    S: Clone,
    B: Better<S>,
{
    /// Starts recording from `initial_best`, usually a copy of the
    /// starting solution.
    pub fn new(initial_best: S, commit: C, better: B) -> Self {
        Self {
            best: initial_best,
            commit,
            better,
            improvements: 0,
        }
    }

    pub fn best(&self) -> &S {
        &self.best
    }

    pub fn into_best(self) -> S {
        self.best
    }

    /// Number of times the recorded best was replaced.
    pub fn improvements(&self) -> usize {
        self.improvements
    }

    fn record(&mut self, solution: &S) {
        if self.better.better(solution, &self.best) {
            self.best = solution.clone();
            self.improvements += 1;
            tracing::trace!(improvements = self.improvements, "new best solution");
        }
    }
}

impl<S, M, C, B> Commit<S, M> for RecordBest<S, C, B>
where
    S: Clone,
    C: Commit<S, M>,
    B: Better<S>,
{
    fn commit(&mut self, solution: &mut S, mv: &M) -> bool {
        let changed = self.commit.commit(solution, mv);
        self.record(solution);
        changed
    }
}

impl<S, E, M, C, B> MultiCommit<S, E, M> for RecordBest<S, C, B>
where
    S: Clone,
    C: MultiCommit<S, E, M>,
    B: Better<S>,
{
    fn commit(&mut self, solution: &mut S, element: &E, mv: &M) -> bool {
        let changed = self.commit.commit(solution, element, mv);
        self.record(solution);
        changed
    }
}
