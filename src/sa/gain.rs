//! Metropolis acceptance as a gain decorator.
//!
//! [`AnnealingGain`] wraps a deterministic gain and turns it into a
//! randomized one: improving moves keep their gain, a non-improving move
//! with gain `g` is reported as [`ACCEPTED_GAIN`] with probability
//! `exp(g / T)` and keeps its own (non-positive) gain otherwise. The
//! engine's `gain > 0` rule then commits exactly the accepted moves.

use rand::Rng;

use super::cooling::Temperature;
use crate::search::{Gain, MultiGain};

/// Gain reported for an accepted non-improving move.
///
/// The smallest positive `f64`, so best-improving rounds still prefer any
/// genuine improvement over an accepted worsening move.
pub const ACCEPTED_GAIN: f64 = f64::MIN_POSITIVE;

/// Simulated annealing gain decorator.
///
/// The temperature is read once per evaluation, so a round over a large
/// neighborhood cools the schedule faster than a round over a small one.
///
/// # Examples
///
/// ```
/// use u_localsearch::sa::{AnnealingGain, ACCEPTED_GAIN};
/// use u_localsearch::search::Gain;
/// use u_numflow::random::create_rng;
///
/// let base = |x: &i32, m: &i32| (*m - *x) as f64;
/// let mut gain = AnnealingGain::new(base, || 1.0, create_rng(7));
///
/// // Improvements pass through unchanged.
/// assert_eq!(gain.gain(&0, &3), 3.0);
///
/// // A worsening move comes back either accepted or with its own gain.
/// let g = gain.gain(&0, &-1);
/// assert!(g == ACCEPTED_GAIN || g == -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AnnealingGain<G, T, R> {
    gain: G,
    temperature: T,
    rng: R,
    last_temperature: Option<f64>,
    evaluations: usize,
    accepted: usize,
}

impl<G, T, R> AnnealingGain<G, T, R>
where
    T: Temperature,
    R: Rng,
{
    pub fn new(gain: G, temperature: T, rng: R) -> Self {
        Self {
            gain,
            temperature,
            rng,
            last_temperature: None,
            evaluations: 0,
            accepted: 0,
        }
    }

    /// Temperature read by the latest evaluation.
    pub fn last_temperature(&self) -> Option<f64> {
        self.last_temperature
    }

    /// Number of evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Number of non-improving moves reported as accepted.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn temperature(&self) -> &T {
        &self.temperature
    }

    /// Returns the wrapped gain, temperature and random source.
    pub fn into_inner(self) -> (G, T, R) {
        (self.gain, self.temperature, self.rng)
    }

    fn anneal(&mut self, gain: f64) -> f64 {
        let temperature = self.temperature.next_temperature();
        self.last_temperature = Some(temperature);
        self.evaluations += 1;
        if gain > 0.0 {
            return gain;
        }
        // A non-positive temperature never accepts.
        if !(temperature > 0.0) {
            return gain;
        }
        let probability = (gain / temperature).exp();
        if self.rng.random::<f64>() < probability {
            self.accepted += 1;
            ACCEPTED_GAIN
        } else {
            gain
        }
    }
}

impl<S, M, G, T, R> Gain<S, M> for AnnealingGain<G, T, R>
where
    G: Gain<S, M>,
    T: Temperature,
    R: Rng,
{
    fn gain(&mut self, solution: &S, mv: &M) -> f64 {
        let g = self.gain.gain(solution, mv);
        self.anneal(g)
    }
}

impl<S, E, M, G, T, R> MultiGain<S, E, M> for AnnealingGain<G, T, R>
where
    G: MultiGain<S, E, M>,
    T: Temperature,
    R: Rng,
{
    fn gain(&mut self, solution: &S, element: &E, mv: &M) -> f64 {
        let g = self.gain.gain(solution, element, mv);
        self.anneal(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_numflow::random::create_rng;

    fn delta(_: &i32, m: &i32) -> f64 {
        *m as f64
    }

    #[test]
    fn test_improvement_passes_through() {
        let mut gain = AnnealingGain::new(delta, || 1e-9, create_rng(1));
        for m in 1..10 {
            assert_eq!(Gain::gain(&mut gain, &0, &m), m as f64);
        }
        assert_eq!(gain.accepted(), 0);
    }

    #[test]
    fn test_cold_rejects_worsening() {
        let mut gain = AnnealingGain::new(delta, || 1e-6, create_rng(2));
        for _ in 0..100 {
            assert_eq!(Gain::gain(&mut gain, &0, &-1), -1.0);
        }
        assert_eq!(gain.evaluations(), 100);
    }

    #[test]
    fn test_hot_accepts_most_worsening() {
        let mut gain = AnnealingGain::new(delta, || 1e6, create_rng(3));
        let accepted = (0..1000)
            .filter(|_| Gain::gain(&mut gain, &0, &-1) == ACCEPTED_GAIN)
            .count();
        assert!(accepted > 990, "expected near-certain acceptance, got {accepted}");
        assert_eq!(gain.accepted(), accepted);
    }

    #[test]
    fn test_acceptance_rate_matches_metropolis() {
        // exp(-1 / 1) ~ 0.368
        let mut gain = AnnealingGain::new(delta, || 1.0, create_rng(4));
        let n = 20_000;
        let accepted = (0..n)
            .filter(|_| Gain::gain(&mut gain, &0, &-1) > 0.0)
            .count();
        let rate = accepted as f64 / n as f64;
        assert!((rate - (-1.0f64).exp()).abs() < 0.02, "rate {rate}");
    }

    #[test]
    fn test_zero_temperature_rejects() {
        let mut gain = AnnealingGain::new(delta, || 0.0, create_rng(5));
        assert_eq!(Gain::gain(&mut gain, &0, &0), 0.0);
        assert_eq!(Gain::gain(&mut gain, &0, &-3), -3.0);
    }

    #[test]
    fn test_schedule_advances_once_per_evaluation() {
        let mut reads = 0usize;
        let temperature = move || {
            reads += 1;
            reads as f64
        };
        let mut gain = AnnealingGain::new(delta, temperature, create_rng(6));
        for m in [1, -1, 2] {
            Gain::gain(&mut gain, &0, &m);
        }
        assert_eq!(gain.last_temperature(), Some(3.0));
        assert_eq!(gain.evaluations(), 3);
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let run = |seed| {
            let mut gain = AnnealingGain::new(delta, || 2.0, create_rng(seed));
            (0..50)
                .map(|_| Gain::gain(&mut gain, &0, &-1))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_multi_gain_delegates_element() {
        let base = |v: &Vec<i32>, i: &usize, m: &i32| (v[*i] + m) as f64;
        let mut gain = AnnealingGain::new(base, || 1e-9, create_rng(8));
        let v = vec![0, 10];
        assert_eq!(MultiGain::gain(&mut gain, &v, &1, &-2), 8.0);
        assert_eq!(MultiGain::gain(&mut gain, &v, &0, &-2), -2.0);
    }
}
