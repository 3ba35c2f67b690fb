//! Simulated annealing run loop on top of the local search engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use u_numflow::random::create_rng;

use super::config::AnnealingConfig;
use super::cooling::{IterationCooling, Temperature};
use super::gain::AnnealingGain;
use super::record::{Better, RecordBest};
use crate::search::{
    Commit, FirstImproving, Gain, GetMoves, MultiCommit, MultiGain, MultiGetMoves,
    MultiSearchComponents, MultiSolution, SearchComponents, SearchStrategy, StepOutcome,
};

/// Result of a simulated annealing run.
#[derive(Debug, Clone)]
pub struct AnnealingResult<S> {
    /// The best solution committed during the run, or the starting
    /// solution if nothing better was reached.
    pub best: S,

    /// Total gain evaluations.
    pub iterations: usize,

    /// Rounds executed.
    pub rounds: usize,

    /// Rounds that committed a move, worsening ones included.
    pub committed_moves: usize,

    /// Non-improving moves accepted by the Metropolis rule.
    pub accepted_moves: usize,

    /// Number of times the best solution was replaced.
    pub improvements: usize,

    /// Temperature of the last evaluation.
    pub final_temperature: f64,

    /// Whether the run was cancelled via the cancellation token.
    pub cancelled: bool,
}

/// Executes simulated annealing as first-improving local search with an
/// [`AnnealingGain`] and a [`RecordBest`] commit.
///
/// The run ends when `max_iterations` is reached, when a round read at or
/// below `min_temperature` commits nothing, when a round evaluates no
/// moves at all, or on cancellation. The iteration budget is checked
/// between rounds, so the last round may overshoot it by at most one
/// neighborhood.
///
/// Zero-gain moves are always accepted (`exp(0 / T) = 1`). On a plateau
/// of equal-valued neighbors no round ever ends without a commit, so with
/// `max_iterations = 0` such a run only ends on cancellation.
pub struct AnnealingRunner;

impl AnnealingRunner {
    /// Anneals a single solution in place and returns the best one seen.
    ///
    /// The temperature follows `config` through an [`IterationCooling`].
    pub fn run<S, N, G, C, B>(
        solution: &mut S,
        get_moves: N,
        gain: G,
        commit: C,
        better: B,
        config: &AnnealingConfig,
    ) -> Result<AnnealingResult<S>, String>
    where
        S: Clone,
        N: GetMoves<S>,
        G: Gain<S, N::Move>,
        C: Commit<S, N::Move>,
        B: Better<S>,
    {
        let cooling = IterationCooling::new(config)?;
        run_single(solution, get_moves, gain, commit, better, cooling, config, None)
    }

    /// [`run`](Self::run) with an optional cancellation token, polled
    /// between rounds.
    pub fn run_with_cancel<S, N, G, C, B>(
        solution: &mut S,
        get_moves: N,
        gain: G,
        commit: C,
        better: B,
        config: &AnnealingConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealingResult<S>, String>
    where
        S: Clone,
        N: GetMoves<S>,
        G: Gain<S, N::Move>,
        C: Commit<S, N::Move>,
        B: Better<S>,
    {
        let cooling = IterationCooling::new(config)?;
        run_single(solution, get_moves, gain, commit, better, cooling, config, cancel)
    }

    /// [`run`](Self::run) with a caller-supplied temperature source such as
    /// a [`TimeCooling`](super::TimeCooling).
    ///
    /// `config` still supplies the seed, the iteration budget and the
    /// `min_temperature` that marks the end of the run; its cooling
    /// fields are ignored.
    pub fn run_with_temperature<S, N, G, C, B, T>(
        solution: &mut S,
        get_moves: N,
        gain: G,
        commit: C,
        better: B,
        temperature: T,
        config: &AnnealingConfig,
    ) -> Result<AnnealingResult<S>, String>
    where
        S: Clone,
        N: GetMoves<S>,
        G: Gain<S, N::Move>,
        C: Commit<S, N::Move>,
        B: Better<S>,
        T: Temperature,
    {
        run_single(solution, get_moves, gain, commit, better, temperature, config, None)
    }

    /// Anneals a solution made of elements.
    pub fn run_multi<S, N, G, C, B>(
        solution: &mut S,
        get_moves: N,
        gain: G,
        commit: C,
        better: B,
        config: &AnnealingConfig,
    ) -> Result<AnnealingResult<S>, String>
    where
        S: MultiSolution + Clone,
        N: MultiGetMoves<S, S::Element>,
        G: MultiGain<S, S::Element, N::Move>,
        C: MultiCommit<S, S::Element, N::Move>,
        B: Better<S>,
    {
        let cooling = IterationCooling::new(config)?;
        let rng = create_rng(config.seed.unwrap_or_else(rand::random));
        let record = RecordBest::new(solution.clone(), commit, better);
        let mut components =
            MultiSearchComponents::new(get_moves, AnnealingGain::new(gain, cooling, rng), record);

        let stats = anneal(
            config,
            None,
            |components: &mut MultiSearchComponents<_, _, _>| {
                let elements = solution.elements();
                if elements.is_empty() {
                    return StepOutcome::Exhausted;
                }
                FirstImproving.round(solution, &elements, components)
            },
            &mut components,
            |components| snapshot(components.gain(), config),
        );

        let (_, gain, record, _) = components.into_parts();
        Ok(finish(stats, &gain, record, config))
    }
}

#[allow(clippy::too_many_arguments)]
fn run_single<S, N, G, C, B, T>(
    solution: &mut S,
    get_moves: N,
    gain: G,
    commit: C,
    better: B,
    temperature: T,
    config: &AnnealingConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<AnnealingResult<S>, String>
where
    S: Clone,
    N: GetMoves<S>,
    G: Gain<S, N::Move>,
    C: Commit<S, N::Move>,
    B: Better<S>,
    T: Temperature,
{
    config.validate()?;
    let rng = create_rng(config.seed.unwrap_or_else(rand::random));
    let record = RecordBest::new(solution.clone(), commit, better);
    let mut components =
        SearchComponents::new(get_moves, AnnealingGain::new(gain, temperature, rng), record);

    let stats = anneal(
        config,
        cancel.as_deref(),
        |components: &mut SearchComponents<_, _, _>| {
            FirstImproving.round(solution, &[()], components)
        },
        &mut components,
        |components| snapshot(components.gain(), config),
    );

    let (_, gain, record, _) = components.into_parts();
    Ok(finish(stats, &gain, record, config))
}

/// Counters of the annealing loop.
struct Snapshot {
    evaluations: usize,
    temperature: f64,
    at_floor: bool,
}

fn snapshot<G, T, R>(gain: &AnnealingGain<G, T, R>, config: &AnnealingConfig) -> Snapshot
where
    T: Temperature,
    R: rand::Rng,
{
    let last = gain.last_temperature();
    Snapshot {
        evaluations: gain.evaluations(),
        temperature: last.unwrap_or(config.initial_temperature),
        at_floor: last.is_some_and(|t| t <= config.min_temperature),
    }
}

struct LoopStats {
    rounds: usize,
    committed_moves: usize,
    cancelled: bool,
}

fn anneal<L, R, P>(
    config: &AnnealingConfig,
    cancel: Option<&AtomicBool>,
    mut round: R,
    components: &mut L,
    mut snapshot: P,
) -> LoopStats
where
    R: FnMut(&mut L) -> StepOutcome,
    P: FnMut(&L) -> Snapshot,
{
    let mut stats = LoopStats {
        rounds: 0,
        committed_moves: 0,
        cancelled: false,
    };

    loop {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            stats.cancelled = true;
            break;
        }
        let before = snapshot(components);
        if config.max_iterations > 0 && before.evaluations >= config.max_iterations {
            break;
        }

        let outcome = round(components);
        stats.rounds += 1;
        let after = snapshot(components);
        tracing::trace!(
            round = stats.rounds,
            ?outcome,
            temperature = after.temperature,
            "annealing round"
        );

        match outcome {
            StepOutcome::Committed => stats.committed_moves += 1,
            StepOutcome::Stopped => break,
            StepOutcome::Exhausted => {
                if after.evaluations == before.evaluations || after.at_floor {
                    break;
                }
            }
        }
    }
    stats
}

fn finish<S, C, B, G, T, R>(
    stats: LoopStats,
    gain: &AnnealingGain<G, T, R>,
    record: RecordBest<S, C, B>,
    config: &AnnealingConfig,
) -> AnnealingResult<S>
where
    S: Clone,
    B: Better<S>,
    T: Temperature,
    R: rand::Rng,
{
    let snapshot = snapshot(gain, config);
    let improvements = record.improvements();
    tracing::debug!(
        iterations = snapshot.evaluations,
        rounds = stats.rounds,
        improvements,
        final_temperature = snapshot.temperature,
        cancelled = stats.cancelled,
        "simulated annealing finished"
    );
    AnnealingResult {
        best: record.into_best(),
        iterations: snapshot.evaluations,
        rounds: stats.rounds,
        committed_moves: stats.committed_moves,
        accepted_moves: gain.accepted(),
        improvements,
        final_temperature: snapshot.temperature,
        cancelled: stats.cancelled,
    }
}
