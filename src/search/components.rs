//! Component bundles and the uniform view the strategies operate on.

use super::stop::NeverStop;
use super::strategy::{best_improving_in, first_improving_in, scan_best, StepOutcome};
use super::types::{
    Commit, Gain, GetMoves, MultiCommit, MultiGain, MultiGetMoves, MultiStopCondition,
    StopCondition,
};

/// Search components for a single solution.
///
/// Bundles a move generator, a gain evaluator, a commit and a stop
/// condition. All four must agree on the solution type and on the move
/// type produced by the generator; the compiler checks this when the
/// bundle is handed to a search.
///
/// # Examples
///
/// ```
/// use u_localsearch::search::{first_improving, SearchComponents};
///
/// let f = |x: i32| -x * x + 12 * x - 27;
/// let components = SearchComponents::new(
///     |_: &i32| vec![10, -10, 1, -1],
///     move |x: &i32, m: &i32| f(x + m) as f64 - f(*x) as f64,
///     |x: &mut i32, m: &i32| {
///         *x += m;
///         true
///     },
/// );
///
/// let mut x = 0;
/// assert!(first_improving(&mut x, components));
/// assert_eq!(x, 6);
/// ```
#[derive(Debug, Clone)]
pub struct SearchComponents<N, G, C, St = NeverStop> {
    get_moves: N,
    gain: G,
    commit: C,
    stop: St,
}

impl<N, G, C> SearchComponents<N, G, C, NeverStop> {
    /// Creates a bundle that never stops on its own.
    pub fn new(get_moves: N, gain: G, commit: C) -> Self {
        Self {
            get_moves,
            gain,
            commit,
            stop: NeverStop,
        }
    }

    /// Replaces the stop condition.
    pub fn with_stop_condition<St>(self, stop: St) -> SearchComponents<N, G, C, St> {
        SearchComponents {
            get_moves: self.get_moves,
            gain: self.gain,
            commit: self.commit,
            stop,
        }
    }
}

impl<N, F, C> SearchComponents<N, ObjectiveGain<F, C>, C, NeverStop>
where
    C: Clone,
{
    /// Builds a bundle whose gain is derived from an objective function.
    ///
    /// The gain of a move is `objective(after) - objective(before)`, where
    /// `after` is a copy of the solution with the move applied by `commit`.
    pub fn from_objective(get_moves: N, objective: F, commit: C) -> Self {
        Self::new(get_moves, ObjectiveGain::new(objective, commit.clone()), commit)
    }
}

impl<N, G, C, St> SearchComponents<N, G, C, St> {
    /// The move generator.
    pub fn get_moves(&self) -> &N {
        &self.get_moves
    }

    /// The gain evaluator.
    pub fn gain(&self) -> &G {
        &self.gain
    }

    /// The commit.
    pub fn commit(&self) -> &C {
        &self.commit
    }

    /// The stop condition.
    pub fn stop_condition(&self) -> &St {
        &self.stop
    }

    /// Splits the bundle into `(get_moves, gain, commit, stop)`.
    pub fn into_parts(self) -> (N, G, C, St) {
        (self.get_moves, self.gain, self.commit, self.stop)
    }
}

/// Search components for a solution made of elements.
///
/// Same roles as [`SearchComponents`], but every call also receives the
/// solution element under consideration.
#[derive(Debug, Clone)]
pub struct MultiSearchComponents<N, G, C, St = NeverStop> {
    get_moves: N,
    gain: G,
    commit: C,
    stop: St,
}

impl<N, G, C> MultiSearchComponents<N, G, C, NeverStop> {
    /// Creates a bundle that never stops on its own.
    pub fn new(get_moves: N, gain: G, commit: C) -> Self {
        Self {
            get_moves,
            gain,
            commit,
            stop: NeverStop,
        }
    }

    /// Replaces the stop condition.
    pub fn with_stop_condition<St>(self, stop: St) -> MultiSearchComponents<N, G, C, St> {
        MultiSearchComponents {
            get_moves: self.get_moves,
            gain: self.gain,
            commit: self.commit,
            stop,
        }
    }
}

impl<N, G, C, St> MultiSearchComponents<N, G, C, St> {
    /// The move generator.
    pub fn get_moves(&self) -> &N {
        &self.get_moves
    }

    /// The gain evaluator.
    pub fn gain(&self) -> &G {
        &self.gain
    }

    /// The commit.
    pub fn commit(&self) -> &C {
        &self.commit
    }

    /// The stop condition.
    pub fn stop_condition(&self) -> &St {
        &self.stop
    }

    /// Splits the bundle into `(get_moves, gain, commit, stop)`.
    pub fn into_parts(self) -> (N, G, C, St) {
        (self.get_moves, self.gain, self.commit, self.stop)
    }
}

/// Gain derived from an objective function.
///
/// Applies the move to a clone of the solution and returns the
/// difference of the objective values. Larger objective values are better.
#[derive(Debug, Clone)]
pub struct ObjectiveGain<F, U> {
    objective: F,
    apply: U,
}

impl<F, U> ObjectiveGain<F, U> {
    pub fn new(objective: F, apply: U) -> Self {
        Self { objective, apply }
    }
}

impl<S, M, F, U> Gain<S, M> for ObjectiveGain<F, U>
where
    S: Clone,
    F: FnMut(&S) -> f64,
    U: Commit<S, M>,
{
    fn gain(&mut self, solution: &S, mv: &M) -> f64 {
        let mut next = solution.clone();
        self.apply.commit(&mut next, mv);
        (self.objective)(&next) - (self.objective)(solution)
    }
}

/// Element-aware view of one component bundle.
///
/// A single-solution bundle is seen as a multi-element bundle whose
/// only element is `()`, so both shapes share one implementation of
/// the search strategies.
pub trait ComponentSet<S, E> {
    type Move;

    fn moves(&mut self, solution: &S, element: &E) -> Vec<Self::Move>;

    fn gain(&mut self, solution: &S, element: &E, mv: &Self::Move) -> f64;

    fn commit(&mut self, solution: &mut S, element: &E, mv: &Self::Move) -> bool;

    fn stop(&mut self, solution: &S, element: &E, mv: &Self::Move) -> bool;
}

impl<S, N, G, C, St> ComponentSet<S, ()> for SearchComponents<N, G, C, St>
where
    N: GetMoves<S>,
    G: Gain<S, N::Move>,
    C: Commit<S, N::Move>,
    St: StopCondition<S, N::Move>,
{
    type Move = N::Move;

    fn moves(&mut self, solution: &S, _: &()) -> Vec<N::Move> {
        self.get_moves.get_moves(solution)
    }

    fn gain(&mut self, solution: &S, _: &(), mv: &N::Move) -> f64 {
        self.gain.gain(solution, mv)
    }

    fn commit(&mut self, solution: &mut S, _: &(), mv: &N::Move) -> bool {
        self.commit.commit(solution, mv)
    }

    fn stop(&mut self, solution: &S, _: &(), mv: &N::Move) -> bool {
        self.stop.stop(solution, mv)
    }
}

impl<S, E, N, G, C, St> ComponentSet<S, E> for MultiSearchComponents<N, G, C, St>
where
    N: MultiGetMoves<S, E>,
    G: MultiGain<S, E, N::Move>,
    C: MultiCommit<S, E, N::Move>,
    St: MultiStopCondition<S, E, N::Move>,
{
    type Move = N::Move;

    fn moves(&mut self, solution: &S, element: &E) -> Vec<N::Move> {
        self.get_moves.get_moves(solution, element)
    }

    fn gain(&mut self, solution: &S, element: &E, mv: &N::Move) -> f64 {
        self.gain.gain(solution, element, mv)
    }

    fn commit(&mut self, solution: &mut S, element: &E, mv: &N::Move) -> bool {
        self.commit.commit(solution, element, mv)
    }

    fn stop(&mut self, solution: &S, element: &E, mv: &N::Move) -> bool {
        self.stop.stop(solution, element, mv)
    }
}

/// One or more component bundles searched together.
///
/// Implemented for a single bundle and for tuples of up to four bundles.
/// Each bundle in a tuple may use its own move type (e.g. remove, add and
/// swap moves for facility location).
///
/// - First-improving tries the bundles in tuple order and stops at the
///   first bundle that commits or stops.
/// - Best-improving scans every bundle, consults each bundle's stop
///   condition once with that bundle's best candidate, then commits the
///   overall best candidate if its gain is positive. Ties go to the
///   earliest bundle.
pub trait ComponentList<S, E> {
    fn first_improving(&mut self, solution: &mut S, elements: &[E]) -> StepOutcome;

    fn best_improving(&mut self, solution: &mut S, elements: &[E]) -> StepOutcome;
}

impl<S, N, G, C, St> ComponentList<S, ()> for SearchComponents<N, G, C, St>
where
    Self: ComponentSet<S, ()>,
{
    fn first_improving(&mut self, solution: &mut S, elements: &[()]) -> StepOutcome {
        first_improving_in(self, solution, elements)
    }

    fn best_improving(&mut self, solution: &mut S, elements: &[()]) -> StepOutcome {
        best_improving_in(self, solution, elements)
    }
}

impl<S, E, N, G, C, St> ComponentList<S, E> for MultiSearchComponents<N, G, C, St>
where
    E: Clone,
    Self: ComponentSet<S, E>,
{
    fn first_improving(&mut self, solution: &mut S, elements: &[E]) -> StepOutcome {
        first_improving_in(self, solution, elements)
    }

    fn best_improving(&mut self, solution: &mut S, elements: &[E]) -> StepOutcome {
        best_improving_in(self, solution, elements)
    }
}

impl<S, E, L> ComponentList<S, E> for &mut L
where
    L: ComponentList<S, E> + ?Sized,
{
    fn first_improving(&mut self, solution: &mut S, elements: &[E]) -> StepOutcome {
        (**self).first_improving(solution, elements)
    }

    fn best_improving(&mut self, solution: &mut S, elements: &[E]) -> StepOutcome {
        (**self).best_improving(solution, elements)
    }
}

macro_rules! impl_component_list_for_tuple {
    ($($set:ident . $idx:tt),+) => {
        impl<S, E, $($set),+> ComponentList<S, E> for ($($set,)+)
        where
            E: Clone,
            $($set: ComponentSet<S, E>,)+
        {
            fn first_improving(&mut self, solution: &mut S, elements: &[E]) -> StepOutcome {
                $(
                    match first_improving_in(&mut self.$idx, solution, elements) {
                        StepOutcome::Exhausted => {}
                        outcome => return outcome,
                    }
                )+
                StepOutcome::Exhausted
            }

            fn best_improving(&mut self, solution: &mut S, elements: &[E]) -> StepOutcome {
                let candidates = ($(scan_best(&mut self.$idx, &*solution, elements),)+);

                let mut stopped = false;
                $(
                    if let Some(candidate) = &candidates.$idx {
                        stopped = stopped
                            || self.$idx.stop(&*solution, &candidate.element, &candidate.mv);
                    }
                )+
                if stopped {
                    return StepOutcome::Stopped;
                }

                let mut winner: Option<(usize, f64)> = None;
                $(
                    if let Some(candidate) = &candidates.$idx {
                        if winner.is_none_or(|(_, gain)| candidate.gain > gain) {
                            winner = Some(($idx, candidate.gain));
                        }
                    }
                )+

                match winner {
                    Some((index, gain)) if gain > 0.0 => {
                        $(
                            if index == $idx {
                                if let Some(candidate) = &candidates.$idx {
                                    self.$idx.commit(solution, &candidate.element, &candidate.mv);
                                }
                            }
                        )+
                        StepOutcome::Committed
                    }
                    _ => StepOutcome::Exhausted,
                }
            }
        }
    };
}

impl_component_list_for_tuple!(A.0);
impl_component_list_for_tuple!(A.0, B.1);
impl_component_list_for_tuple!(A.0, B.1, C.2);
impl_component_list_for_tuple!(A.0, B.1, C.2, D.3);
