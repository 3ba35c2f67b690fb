//! Role traits for local search components.
//!
//! A local search is assembled from four collaborators:
//!
//! - a **move generator** producing the candidate moves of the current solution,
//! - a **gain** evaluator scoring a candidate (positive = improvement),
//! - a **commit** applying an accepted move in place,
//! - a **stop condition** consulted with the move just considered.
//!
//! Every role exists in two shapes. The single-solution traits see the
//! whole solution at once; the `Multi*` traits additionally receive the
//! solution element under consideration (a facility, a queen, a tour edge).
//! Closures of the matching shape implement the traits directly.

/// Produces the candidate moves of a single solution.
///
/// Called again on every round; the moves may depend on the current
/// solution and must not be cached across calls. An empty vector means
/// there is nothing to try.
pub trait GetMoves<S> {
    /// The move type, deduced from what the generator returns.
    type Move;

    /// Returns the candidate moves for `solution`, in evaluation order.
    fn get_moves(&mut self, solution: &S) -> Vec<Self::Move>;
}

impl<S, M, F> GetMoves<S> for F
where
    F: FnMut(&S) -> Vec<M>,
{
    type Move = M;

    fn get_moves(&mut self, solution: &S) -> Vec<M> {
        self(solution)
    }
}

/// Scores a candidate move. Positive means the move improves the objective.
///
/// The engine accepts a move only if its gain is strictly greater than
/// zero; there is no epsilon. Evaluators over floating point objectives
/// should round their result if they want tolerance.
pub trait Gain<S, M> {
    /// Returns the gain of applying `mv` to `solution`.
    fn gain(&mut self, solution: &S, mv: &M) -> f64;
}

impl<S, M, F> Gain<S, M> for F
where
    F: FnMut(&S, &M) -> f64,
{
    fn gain(&mut self, solution: &S, mv: &M) -> f64 {
        self(solution, mv)
    }
}

/// Applies an accepted move to the solution in place.
pub trait Commit<S, M> {
    /// Applies `mv`. Returns whether the solution actually changed.
    fn commit(&mut self, solution: &mut S, mv: &M) -> bool;
}

impl<S, M, F> Commit<S, M> for F
where
    F: FnMut(&mut S, &M) -> bool,
{
    fn commit(&mut self, solution: &mut S, mv: &M) -> bool {
        self(solution, mv)
    }
}

/// Decides whether the search terminates after considering `mv`.
pub trait StopCondition<S, M> {
    /// Returns `true` to terminate the current round immediately.
    fn stop(&mut self, solution: &S, mv: &M) -> bool;
}

impl<S, M, F> StopCondition<S, M> for F
where
    F: FnMut(&S, &M) -> bool,
{
    fn stop(&mut self, solution: &S, mv: &M) -> bool {
        self(solution, mv)
    }
}

/// A solution made of addressable elements.
///
/// # Examples
///
/// ```
/// use u_localsearch::search::MultiSolution;
///
/// struct Facilities {
///     chosen: Vec<usize>,
/// }
///
/// impl MultiSolution for Facilities {
///     type Element = usize;
///
///     fn elements(&self) -> Vec<usize> {
///         self.chosen.clone()
///     }
/// }
///
/// let f = Facilities { chosen: vec![3, 1] };
/// assert_eq!(f.elements(), vec![3, 1]);
/// ```
pub trait MultiSolution {
    /// One addressable unit of the solution.
    type Element: Clone;

    /// Snapshot of the current elements, in container order.
    fn elements(&self) -> Vec<Self::Element>;
}

/// Produces the candidate moves of one solution element.
pub trait MultiGetMoves<S, E> {
    /// The move type, deduced from what the generator returns.
    type Move;

    /// Returns the candidate moves for `element` of `solution`.
    fn get_moves(&mut self, solution: &S, element: &E) -> Vec<Self::Move>;
}

impl<S, E, M, F> MultiGetMoves<S, E> for F
where
    F: FnMut(&S, &E) -> Vec<M>,
{
    type Move = M;

    fn get_moves(&mut self, solution: &S, element: &E) -> Vec<M> {
        self(solution, element)
    }
}

/// Scores a candidate move of one solution element.
pub trait MultiGain<S, E, M> {
    /// Returns the gain of applying `mv` to `element` of `solution`.
    fn gain(&mut self, solution: &S, element: &E, mv: &M) -> f64;
}

impl<S, E, M, F> MultiGain<S, E, M> for F
where
    F: FnMut(&S, &E, &M) -> f64,
{
    fn gain(&mut self, solution: &S, element: &E, mv: &M) -> f64 {
        self(solution, element, mv)
    }
}

/// Applies an accepted move of one solution element.
pub trait MultiCommit<S, E, M> {
    /// Applies `mv` to `element`. Returns whether the solution changed.
    fn commit(&mut self, solution: &mut S, element: &E, mv: &M) -> bool;
}

impl<S, E, M, F> MultiCommit<S, E, M> for F
where
    F: FnMut(&mut S, &E, &M) -> bool,
{
    fn commit(&mut self, solution: &mut S, element: &E, mv: &M) -> bool {
        self(solution, element, mv)
    }
}

/// Decides whether the search terminates after considering `mv` on `element`.
pub trait MultiStopCondition<S, E, M> {
    /// Returns `true` to terminate the current round immediately.
    fn stop(&mut self, solution: &S, element: &E, mv: &M) -> bool;
}

impl<S, E, M, F> MultiStopCondition<S, E, M> for F
where
    F: FnMut(&S, &E, &M) -> bool,
{
    fn stop(&mut self, solution: &S, element: &E, mv: &M) -> bool {
        self(solution, element, mv)
    }
}
