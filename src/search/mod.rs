//! Generic local search.
//!
//! Drives an arbitrary solution through neighborhood exploration, gain
//! evaluation and commit steps. The solution representation, the moves
//! and the objective are supplied by the caller as a bundle of
//! components ([`SearchComponents`] or [`MultiSearchComponents`]); the
//! engine only decides which move to commit ([`FirstImproving`] or
//! [`BestImproving`]) and when to stop.
//!
//! Single solutions (an integer, a permutation) and solutions made of
//! elements (a facility set, a board of queens) share one engine: a
//! single solution is searched as a solution with exactly one element.
//!
//! # Examples
//!
//! ```
//! use u_localsearch::search::{LocalSearchStep, BestImproving, SearchComponents};
//!
//! let f = |x: i32| -x * x + 12 * x - 27;
//! let components = SearchComponents::new(
//!     |_: &i32| vec![10, -10, 1, -1],
//!     move |x: &i32, m: &i32| (f(x + m) - f(*x)) as f64,
//!     |x: &mut i32, m: &i32| {
//!         *x += m;
//!         true
//!     },
//! );
//!
//! let mut x = 0;
//! let mut step = LocalSearchStep::new(&mut x, BestImproving, components);
//! while step.search() {}
//! assert_eq!(x, 6);
//! ```

mod components;
mod config;
mod runner;
mod stop;
mod strategy;
mod types;

pub use components::{
    ComponentList, ComponentSet, MultiSearchComponents, ObjectiveGain, SearchComponents,
};
pub use config::LocalSearchConfig;
pub use runner::{
    best_improving, best_improving_multi, first_improving, first_improving_multi, local_search,
    local_search_multi, LocalSearchResult, LocalSearchRunner, LocalSearchStep,
    MultiLocalSearchStep, Termination,
};
pub use stop::{CountLimit, NeverStop, TimeLimit};
pub use strategy::{BestImproving, FirstImproving, SearchStrategy, StepOutcome};
pub use types::{
    Commit, Gain, GetMoves, MultiCommit, MultiGain, MultiGetMoves, MultiSolution,
    MultiStopCondition, StopCondition,
};
