//! Local search engine and drivers.
//!
//! [`LocalSearchStep`] and [`MultiLocalSearchStep`] run exactly one round
//! per [`search`](LocalSearchStep::search) call so callers can interleave
//! logging, snapshots or external stop signals between rounds. The free
//! functions and [`LocalSearchRunner`] loop rounds until a local optimum,
//! a stop condition or a budget ends the search.

use std::time::{Duration, Instant};

use super::components::ComponentList;
use super::config::LocalSearchConfig;
use super::strategy::{BestImproving, FirstImproving, SearchStrategy, StepOutcome};
use super::types::MultiSolution;

/// Local search over a single solution.
///
/// Borrows the caller's solution for the lifetime of the step and owns
/// the components.
pub struct LocalSearchStep<'a, S, L, St = FirstImproving> {
    solution: &'a mut S,
    strategy: St,
    components: L,
}

impl<'a, S, L, St> LocalSearchStep<'a, S, L, St>
where
    L: ComponentList<S, ()>,
    St: SearchStrategy,
{
    pub fn new(solution: &'a mut S, strategy: St, components: L) -> Self {
        Self {
            solution,
            strategy,
            components,
        }
    }

    /// Runs one round. Returns `true` if a move was committed.
    ///
    /// `false` means the search terminated: either no candidate improves
    /// the solution or the stop condition fired. Without outside changes
    /// to the solution, calling again keeps returning `false`.
    pub fn search(&mut self) -> bool {
        self.round().is_committed()
    }

    /// Runs one round and reports how it ended.
    pub fn round(&mut self) -> StepOutcome {
        self.strategy
            .round(&mut *self.solution, &[()], &mut self.components)
    }

    pub fn solution(&self) -> &S {
        self.solution
    }

    pub fn components(&self) -> &L {
        &self.components
    }

    pub fn into_components(self) -> L {
        self.components
    }
}

/// Local search over a solution made of elements.
///
/// Every round iterates the elements reported by
/// [`MultiSolution::elements`] at the start of the round.
pub struct MultiLocalSearchStep<'a, S, L, St = FirstImproving> {
    solution: &'a mut S,
    strategy: St,
    components: L,
}

impl<'a, S, L, St> MultiLocalSearchStep<'a, S, L, St>
where
    S: MultiSolution,
    L: ComponentList<S, S::Element>,
    St: SearchStrategy,
{
    pub fn new(solution: &'a mut S, strategy: St, components: L) -> Self {
        Self {
            solution,
            strategy,
            components,
        }
    }

    /// Runs one round. Returns `true` if a move was committed.
    ///
    /// A solution without elements returns `false` immediately.
    pub fn search(&mut self) -> bool {
        self.round().is_committed()
    }

    /// Runs one round and reports how it ended.
    pub fn round(&mut self) -> StepOutcome {
        let elements = self.solution.elements();
        if elements.is_empty() {
            return StepOutcome::Exhausted;
        }
        self.strategy
            .round(&mut *self.solution, &elements, &mut self.components)
    }

    pub fn solution(&self) -> &S {
        self.solution
    }

    pub fn components(&self) -> &L {
        &self.components
    }

    pub fn into_components(self) -> L {
        self.components
    }
}

/// Repeats rounds on a single solution.
///
/// After a committed round the search continues only if
/// `on_success(solution)` returns `true`. After a round that found no
/// improving move it continues only if `on_fail(solution)` returns `true`.
/// A fired stop condition always ends the search. Returns whether any
/// round committed a move.
///
/// # Examples
///
/// ```
/// use u_localsearch::search::{local_search, CountLimit, FirstImproving, SearchComponents};
///
/// let f = |x: i32| -x * x + 12 * x - 27;
/// let components = SearchComponents::new(
///     |_: &i32| vec![10, -10, 1, -1],
///     move |x: &i32, m: &i32| (f(x + m) - f(*x)) as f64,
///     |x: &mut i32, m: &i32| {
///         *x += m;
///         true
///     },
/// );
///
/// // At most three improving rounds.
/// let mut limit = CountLimit::new(2);
/// let mut x = 0;
/// local_search(&mut x, FirstImproving, |_| !limit.tick(), |_| false, components);
/// assert_eq!(x, 8);
/// ```
pub fn local_search<S, St, L, OnSuccess, OnFail>(
    solution: &mut S,
    strategy: St,
    on_success: OnSuccess,
    on_fail: OnFail,
    mut components: L,
) -> bool
where
    St: SearchStrategy,
    L: ComponentList<S, ()>,
    OnSuccess: FnMut(&S) -> bool,
    OnFail: FnMut(&S) -> bool,
{
    drive(
        solution,
        |s| strategy.round(s, &[()], &mut components),
        on_success,
        on_fail,
    )
}

/// Repeats first-improving rounds until no move improves the solution.
pub fn first_improving<S, L>(solution: &mut S, components: L) -> bool
where
    L: ComponentList<S, ()>,
{
    local_search(solution, FirstImproving, |_| true, |_| false, components)
}

/// Repeats best-improving rounds until no move improves the solution.
pub fn best_improving<S, L>(solution: &mut S, components: L) -> bool
where
    L: ComponentList<S, ()>,
{
    local_search(solution, BestImproving, |_| true, |_| false, components)
}

/// [`local_search`] for solutions made of elements.
pub fn local_search_multi<S, St, L, OnSuccess, OnFail>(
    solution: &mut S,
    strategy: St,
    on_success: OnSuccess,
    on_fail: OnFail,
    mut components: L,
) -> bool
where
    S: MultiSolution,
    St: SearchStrategy,
    L: ComponentList<S, S::Element>,
    OnSuccess: FnMut(&S) -> bool,
    OnFail: FnMut(&S) -> bool,
{
    drive(
        solution,
        |s| multi_round(&strategy, s, &mut components),
        on_success,
        on_fail,
    )
}

/// [`first_improving`] for solutions made of elements.
pub fn first_improving_multi<S, L>(solution: &mut S, components: L) -> bool
where
    S: MultiSolution,
    L: ComponentList<S, S::Element>,
{
    local_search_multi(solution, FirstImproving, |_| true, |_| false, components)
}

/// [`best_improving`] for solutions made of elements.
pub fn best_improving_multi<S, L>(solution: &mut S, components: L) -> bool
where
    S: MultiSolution,
    L: ComponentList<S, S::Element>,
{
    local_search_multi(solution, BestImproving, |_| true, |_| false, components)
}

fn multi_round<S, St, L>(strategy: &St, solution: &mut S, components: &mut L) -> StepOutcome
where
    S: MultiSolution,
    St: SearchStrategy,
    L: ComponentList<S, S::Element>,
{
    let elements = solution.elements();
    if elements.is_empty() {
        return StepOutcome::Exhausted;
    }
    strategy.round(solution, &elements, components)
}

fn drive<S, R, OnSuccess, OnFail>(
    solution: &mut S,
    mut round: R,
    mut on_success: OnSuccess,
    mut on_fail: OnFail,
) -> bool
where
    R: FnMut(&mut S) -> StepOutcome,
    OnSuccess: FnMut(&S) -> bool,
    OnFail: FnMut(&S) -> bool,
{
    let mut improved = false;
    loop {
        match round(solution) {
            StepOutcome::Committed => {
                improved = true;
                if !on_success(solution) {
                    break;
                }
            }
            StepOutcome::Exhausted => {
                if !on_fail(solution) {
                    break;
                }
            }
            StepOutcome::Stopped => break,
        }
    }
    improved
}

/// Why a [`LocalSearchRunner`] run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A round found no improving move.
    LocalOptimum,
    /// A stop condition fired.
    Stopped,
    /// `max_rounds` was reached.
    RoundLimit,
    /// The time limit elapsed.
    TimeLimit,
}

/// Result of a [`LocalSearchRunner`] run.
#[derive(Debug, Clone)]
pub struct LocalSearchResult {
    /// Rounds executed, including the final non-improving one.
    pub rounds: usize,

    /// Rounds that committed a move.
    pub improving_rounds: usize,

    /// Why the run ended.
    pub termination: Termination,

    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl LocalSearchResult {
    /// Whether any round committed a move.
    pub fn improved(&self) -> bool {
        self.improving_rounds > 0
    }
}

/// Runs local search to a local optimum under a [`LocalSearchConfig`] budget.
pub struct LocalSearchRunner;

impl LocalSearchRunner {
    /// Runs rounds on a single solution.
    pub fn run<S, St, L>(
        solution: &mut S,
        strategy: St,
        mut components: L,
        config: &LocalSearchConfig,
    ) -> LocalSearchResult
    where
        St: SearchStrategy,
        L: ComponentList<S, ()>,
    {
        run_rounds(solution, config, |s| {
            strategy.round(s, &[()], &mut components)
        })
    }

    /// Runs rounds on a solution made of elements.
    pub fn run_multi<S, St, L>(
        solution: &mut S,
        strategy: St,
        mut components: L,
        config: &LocalSearchConfig,
    ) -> LocalSearchResult
    where
        S: MultiSolution,
        St: SearchStrategy,
        L: ComponentList<S, S::Element>,
    {
        run_rounds(solution, config, |s| {
            multi_round(&strategy, s, &mut components)
        })
    }
}

fn run_rounds<S, R>(solution: &mut S, config: &LocalSearchConfig, mut round: R) -> LocalSearchResult
where
    R: FnMut(&mut S) -> StepOutcome,
{
    let start = Instant::now();
    let mut rounds = 0usize;
    let mut improving_rounds = 0usize;

    let termination = loop {
        if config.max_rounds > 0 && rounds >= config.max_rounds {
            break Termination::RoundLimit;
        }
        if config
            .time_limit
            .is_some_and(|limit| start.elapsed() >= limit)
        {
            break Termination::TimeLimit;
        }

        let outcome = round(solution);
        rounds += 1;
        tracing::trace!(round = rounds, ?outcome, "local search round");

        match outcome {
            StepOutcome::Committed => improving_rounds += 1,
            StepOutcome::Exhausted => break Termination::LocalOptimum,
            StepOutcome::Stopped => break Termination::Stopped,
        }
    };

    let elapsed = start.elapsed();
    tracing::debug!(
        rounds,
        improving_rounds,
        ?termination,
        ?elapsed,
        "local search finished"
    );

    LocalSearchResult {
        rounds,
        improving_rounds,
        termination,
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{CountLimit, MultiSearchComponents, SearchComponents};
    use proptest::prelude::*;

    // ---- f(x) = -x^2 + 12x - 27, maximum at x = 6 ----

    fn f(x: i32) -> i32 {
        -x * x + 12 * x - 27
    }

    fn moves(_: &i32) -> Vec<i32> {
        vec![10, -10, 1, -1]
    }

    fn gain(x: &i32, m: &i32) -> f64 {
        (f(x + m) - f(*x)) as f64
    }

    fn commit(x: &mut i32, m: &i32) -> bool {
        *x += m;
        true
    }

    type Quadratic = SearchComponents<
        fn(&i32) -> Vec<i32>,
        fn(&i32, &i32) -> f64,
        fn(&mut i32, &i32) -> bool,
    >;

    fn quadratic() -> Quadratic {
        SearchComponents::new(
            moves as fn(&i32) -> Vec<i32>,
            gain as fn(&i32, &i32) -> f64,
            commit as fn(&mut i32, &i32) -> bool,
        )
    }

    #[test]
    fn test_first_improving_reaches_maximum() {
        let mut x = 0;
        assert!(first_improving(&mut x, quadratic()));
        assert_eq!(x, 6);
        assert_eq!(f(x), 9);
    }

    #[test]
    fn test_best_improving_reaches_maximum() {
        let mut x = 0;
        assert!(best_improving(&mut x, quadratic()));
        assert_eq!(x, 6);
    }

    #[test]
    fn test_first_improving_move_sequence() {
        let mut x = 0;
        let mut step = LocalSearchStep::new(&mut x, FirstImproving, quadratic());
        let mut visited = Vec::new();
        while step.search() {
            visited.push(*step.solution());
        }
        assert_eq!(visited, vec![10, 9, 8, 7, 6]);
    }

    #[test]
    fn test_local_optimum_is_left_unchanged() {
        let mut x = 6;
        let mut step = LocalSearchStep::new(&mut x, BestImproving, quadratic());
        assert_eq!(step.round(), StepOutcome::Exhausted);
        assert!(!step.search());
        assert_eq!(*step.solution(), 6);
        assert!(!first_improving(&mut x, quadratic()));
        assert_eq!(x, 6);
    }

    #[test]
    fn test_stop_on_first_candidate() {
        let mut x = 3;
        let components = SearchComponents::new(
            |_: &i32| vec![-1, 1],
            gain,
            commit,
        )
        .with_stop_condition(CountLimit::new(0));
        assert!(!first_improving(&mut x, components));
        assert_eq!(x, 3);
    }

    #[test]
    fn test_stop_condition_ends_driver_without_on_fail() {
        let mut x = 3;
        let mut on_fail_calls = 0;
        let components = SearchComponents::new(
            |_: &i32| vec![-1],
            gain,
            commit,
        )
        .with_stop_condition(|_: &i32, _: &i32| true);
        local_search(
            &mut x,
            FirstImproving,
            |_| true,
            |_| {
                on_fail_calls += 1;
                true
            },
            components,
        );
        assert_eq!(on_fail_calls, 0);
        assert_eq!(x, 3);
    }

    #[test]
    fn test_on_success_limits_rounds() {
        let mut limit = CountLimit::new(2);
        let mut x = 0;
        assert!(local_search(
            &mut x,
            FirstImproving,
            |_| !limit.tick(),
            |_| false,
            quadratic()
        ));
        assert_eq!(x, 8);
    }

    #[test]
    fn test_on_fail_retries_after_outside_change() {
        // Retrying at a local optimum must leave the solution there.
        let mut retries = 0;
        let mut x = 0;
        local_search(
            &mut x,
            FirstImproving,
            |_| true,
            |_| {
                retries += 1;
                retries < 3
            },
            quadratic(),
        );
        assert_eq!(retries, 3);
        assert_eq!(x, 6);
    }

    #[test]
    fn test_components_by_mutable_reference() {
        let mut components = quadratic();
        let mut x = 0;
        assert!(first_improving(&mut x, &mut components));
        assert!(!first_improving(&mut x, &mut components));
        assert_eq!(x, 6);
    }

    #[test]
    fn test_runner_local_optimum() {
        let mut x = 0;
        let result = LocalSearchRunner::run(
            &mut x,
            FirstImproving,
            quadratic(),
            &LocalSearchConfig::default(),
        );
        assert_eq!(x, 6);
        assert!(result.improved());
        assert_eq!(result.improving_rounds, 5);
        assert_eq!(result.rounds, 6);
        assert_eq!(result.termination, Termination::LocalOptimum);
    }

    #[test]
    fn test_runner_round_limit() {
        let mut x = 0;
        let config = LocalSearchConfig::default().with_max_rounds(2);
        let result = LocalSearchRunner::run(&mut x, FirstImproving, quadratic(), &config);
        assert_eq!(x, 9);
        assert_eq!(result.rounds, 2);
        assert_eq!(result.termination, Termination::RoundLimit);
    }

    #[test]
    fn test_runner_zero_time_limit() {
        let mut x = 0;
        let config = LocalSearchConfig::default().with_time_limit(Duration::ZERO);
        let result = LocalSearchRunner::run(&mut x, BestImproving, quadratic(), &config);
        assert_eq!(x, 0);
        assert_eq!(result.rounds, 0);
        assert_eq!(result.termination, Termination::TimeLimit);
        assert!(!result.improved());
    }

    #[test]
    fn test_runner_stopped() {
        let mut x = 0;
        let components = quadratic().into_parts();
        let components = SearchComponents::new(components.0, components.1, components.2)
            .with_stop_condition(|_: &i32, _: &i32| true);
        let result = LocalSearchRunner::run(
            &mut x,
            BestImproving,
            components,
            &LocalSearchConfig::default(),
        );
        assert_eq!(result.termination, Termination::Stopped);
        assert_eq!(x, 0);
    }

    // ---- Multi-element solutions ----

    /// Each slot climbs towards its target value, one unit at a time.
    #[derive(Debug, Clone, PartialEq)]
    struct Slots {
        values: Vec<i32>,
        targets: Vec<i32>,
    }

    impl MultiSolution for Slots {
        type Element = usize;

        fn elements(&self) -> Vec<usize> {
            (0..self.values.len()).collect()
        }
    }

    fn slot_gain(s: &Slots, i: &usize, d: &i32) -> f64 {
        let before = (s.targets[*i] - s.values[*i]).abs();
        let after = (s.targets[*i] - s.values[*i] - d).abs();
        (before - after) as f64
    }

    fn slot_commit(s: &mut Slots, i: &usize, d: &i32) -> bool {
        s.values[*i] += d;
        *d != 0
    }

    #[test]
    fn test_multi_first_improving_reaches_targets() {
        let mut slots = Slots {
            values: vec![0, 5, -2],
            targets: vec![3, 1, -2],
        };
        let components = MultiSearchComponents::new(
            |_: &Slots, _: &usize| vec![1, -1],
            slot_gain,
            slot_commit,
        );
        assert!(first_improving_multi(&mut slots, components));
        assert_eq!(slots.values, slots.targets);
    }

    #[test]
    fn test_multi_best_improving_reaches_targets() {
        let mut slots = Slots {
            values: vec![0, 5, -2],
            targets: vec![3, 1, -2],
        };
        let components = MultiSearchComponents::new(
            |_: &Slots, _: &usize| vec![2, 1, -1, -2],
            slot_gain,
            slot_commit,
        );
        let result = LocalSearchRunner::run_multi(
            &mut slots,
            BestImproving,
            components,
            &LocalSearchConfig::default(),
        );
        assert_eq!(slots.values, slots.targets);
        assert_eq!(result.termination, Termination::LocalOptimum);
    }

    #[test]
    fn test_multi_empty_solution_returns_false() {
        let mut slots = Slots {
            values: vec![],
            targets: vec![],
        };
        let components = MultiSearchComponents::new(
            |_: &Slots, _: &usize| -> Vec<i32> { panic!("no element to ask about") },
            slot_gain,
            slot_commit,
        );
        let mut step = MultiLocalSearchStep::new(&mut slots, FirstImproving, components);
        assert!(!step.search());
    }

    #[test]
    fn test_multi_step_terminated_state_is_idempotent() {
        let mut slots = Slots {
            values: vec![1, 2],
            targets: vec![1, 2],
        };
        let components = MultiSearchComponents::new(
            |_: &Slots, _: &usize| vec![1, -1],
            slot_gain,
            slot_commit,
        );
        let mut step = MultiLocalSearchStep::new(&mut slots, BestImproving, components);
        assert!(!step.search());
        assert!(!step.search());
        assert_eq!(step.solution().values, vec![1, 2]);
    }

    proptest! {
        #[test]
        fn prop_objective_strictly_improves_each_round(start in -200i32..200, best in any::<bool>()) {
            let mut x = start;
            let mut previous = f(start);
            if best {
                let mut step = LocalSearchStep::new(&mut x, BestImproving, quadratic());
                while step.search() {
                    let current = f(*step.solution());
                    prop_assert!(current > previous);
                    previous = current;
                }
            } else {
                let mut step = LocalSearchStep::new(&mut x, FirstImproving, quadratic());
                while step.search() {
                    let current = f(*step.solution());
                    prop_assert!(current > previous);
                    previous = current;
                }
            }
            prop_assert_eq!(x, 6);
        }

        #[test]
        fn prop_terminated_state_is_idempotent(start in -200i32..200) {
            let mut x = start;
            let mut step = LocalSearchStep::new(&mut x, FirstImproving, quadratic());
            while step.search() {}
            let settled = *step.solution();
            prop_assert!(!step.search());
            prop_assert!(!step.search());
            prop_assert_eq!(*step.solution(), settled);
        }

        #[test]
        fn prop_first_improving_is_deterministic(start in -200i32..200) {
            let trace = |start: i32| {
                let mut x = start;
                let mut step = LocalSearchStep::new(&mut x, FirstImproving, quadratic());
                let mut visited = vec![start];
                while step.search() {
                    visited.push(*step.solution());
                }
                visited
            };
            prop_assert_eq!(trace(start), trace(start));
        }

        #[test]
        fn prop_best_improving_commits_round_maximum(start in -200i32..200) {
            let before = start;
            let mut x = start;
            let committed = LocalSearchStep::new(&mut x, BestImproving, quadratic()).search();
            let max_gain = moves(&before)
                .iter()
                .map(|m| gain(&before, m))
                .fold(f64::NEG_INFINITY, f64::max);
            if committed {
                prop_assert_eq!(gain(&before, &(x - before)), max_gain);
            } else {
                prop_assert!(max_gain <= 0.0);
                prop_assert_eq!(x, before);
            }
        }
    }
}
