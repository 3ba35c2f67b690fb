//! Search strategies: which candidate move a round commits.
//!
//! # First-improving
//!
//! ```text
//! for each element e (container order):
//!     for each move m in get_moves(solution, e):
//!         if gain(solution, e, m) > 0: commit; round succeeds
//!         if stop(solution, e, m):     round terminates
//! round terminates
//! ```
//!
//! # Best-improving (steepest ascent)
//!
//! Evaluates every move of every element, keeps the first move reaching
//! the maximum gain, consults the stop condition once with it, and
//! commits it if the maximum is positive.

use super::components::{ComponentList, ComponentSet};

/// Result of one search round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A move with positive gain was applied.
    Committed,
    /// Every candidate was considered and none was accepted.
    Exhausted,
    /// The stop condition fired.
    Stopped,
}

impl StepOutcome {
    /// Whether the round applied a move.
    pub fn is_committed(self) -> bool {
        matches!(self, StepOutcome::Committed)
    }
}

/// Policy selecting which candidate move a round commits.
pub trait SearchStrategy {
    /// Runs one round over `elements` with the given components.
    fn round<S, E, L>(&self, solution: &mut S, elements: &[E], components: &mut L) -> StepOutcome
    where
        L: ComponentList<S, E> + ?Sized;
}

/// Commits the first candidate with strictly positive gain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstImproving;

impl SearchStrategy for FirstImproving {
    fn round<S, E, L>(&self, solution: &mut S, elements: &[E], components: &mut L) -> StepOutcome
    where
        L: ComponentList<S, E> + ?Sized,
    {
        components.first_improving(solution, elements)
    }
}

/// Commits the candidate with the largest gain of the round, if positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestImproving;

impl SearchStrategy for BestImproving {
    fn round<S, E, L>(&self, solution: &mut S, elements: &[E], components: &mut L) -> StepOutcome
    where
        L: ComponentList<S, E> + ?Sized,
    {
        components.best_improving(solution, elements)
    }
}

/// Best move found by a full scan of one component set.
#[derive(Debug, Clone)]
pub(crate) struct Candidate<E, M> {
    pub(crate) element: E,
    pub(crate) mv: M,
    pub(crate) gain: f64,
}

pub(crate) fn first_improving_in<S, E, C>(set: &mut C, solution: &mut S, elements: &[E]) -> StepOutcome
where
    C: ComponentSet<S, E> + ?Sized,
{
    for element in elements {
        for mv in set.moves(solution, element) {
            let gain = set.gain(solution, element, &mv);
            if gain > 0.0 {
                let changed = set.commit(solution, element, &mv);
                tracing::trace!(gain, changed, "committed first improving move");
                return StepOutcome::Committed;
            }
            if set.stop(solution, element, &mv) {
                tracing::trace!("stop condition fired");
                return StepOutcome::Stopped;
            }
        }
    }
    StepOutcome::Exhausted
}

/// Scans every move of every element and returns the first one reaching
/// the maximum gain, whatever its sign.
pub(crate) fn scan_best<S, E, C>(
    set: &mut C,
    solution: &S,
    elements: &[E],
) -> Option<Candidate<E, C::Move>>
where
    E: Clone,
    C: ComponentSet<S, E> + ?Sized,
{
    let mut best: Option<Candidate<E, C::Move>> = None;
    for element in elements {
        for mv in set.moves(solution, element) {
            let gain = set.gain(solution, element, &mv);
            if best.as_ref().is_none_or(|b| gain > b.gain) {
                best = Some(Candidate {
                    element: element.clone(),
                    mv,
                    gain,
                });
            }
        }
    }
    best
}

pub(crate) fn best_improving_in<S, E, C>(set: &mut C, solution: &mut S, elements: &[E]) -> StepOutcome
where
    E: Clone,
    C: ComponentSet<S, E> + ?Sized,
{
    let Some(candidate) = scan_best(set, &*solution, elements) else {
        return StepOutcome::Exhausted;
    };
    if set.stop(solution, &candidate.element, &candidate.mv) {
        tracing::trace!("stop condition fired");
        return StepOutcome::Stopped;
    }
    if candidate.gain > 0.0 {
        let changed = set.commit(solution, &candidate.element, &candidate.mv);
        tracing::trace!(gain = candidate.gain, changed, "committed best improving move");
        StepOutcome::Committed
    } else {
        StepOutcome::Exhausted
    }
}
