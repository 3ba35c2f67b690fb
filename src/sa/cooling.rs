//! Stateful temperature sources.

use std::time::{Duration, Instant};

use super::config::{cool, AnnealingConfig};

/// A temperature that advances every time it is read.
///
/// Implementations must never return zero or a negative value.
pub trait Temperature {
    /// Returns the current temperature and advances the schedule.
    fn next_temperature(&mut self) -> f64;
}

impl<F> Temperature for F
where
    F: FnMut() -> f64,
{
    fn next_temperature(&mut self) -> f64 {
        self()
    }
}

/// Temperature keyed on the number of reads.
///
/// Read `k` returns the temperature of level `k / iterations_per_temperature`
/// of the configured [`CoolingSchedule`](super::CoolingSchedule).
///
/// # Examples
///
/// ```
/// use u_localsearch::sa::{AnnealingConfig, CoolingSchedule, IterationCooling, Temperature};
///
/// let config = AnnealingConfig::default()
///     .with_initial_temperature(8.0)
///     .with_min_temperature(1.0)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.5 });
/// let mut cooling = IterationCooling::new(&config).unwrap();
/// let temperatures: Vec<f64> = (0..5).map(|_| cooling.next_temperature()).collect();
/// assert_eq!(temperatures, vec![8.0, 4.0, 2.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct IterationCooling {
    config: AnnealingConfig,
    temperature: f64,
    step: usize,
    reads: usize,
}

impl IterationCooling {
    pub fn new(config: &AnnealingConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            temperature: config.initial_temperature,
            step: 0,
            reads: 0,
        })
    }

    /// Temperature the next read will return.
    pub fn current(&self) -> f64 {
        self.temperature
    }

    /// Floor of the schedule.
    pub fn min_temperature(&self) -> f64 {
        self.config.min_temperature
    }

    /// Number of reads so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Temperature for IterationCooling {
    fn next_temperature(&mut self) -> f64 {
        let current = self.temperature;
        self.reads += 1;
        if self.reads % self.config.iterations_per_temperature == 0 {
            self.temperature = cool(self.temperature, &self.config, self.step);
            self.step += 1;
        }
        current
    }
}

/// Exponential temperature keyed on wall-clock time:
/// `T(t) = T_0 * alpha^t` with `t` in seconds since construction,
/// floored at a positive minimum.
///
/// Time-keyed cooling only shapes acceptance; it is not a deadline.
#[derive(Debug, Clone)]
pub struct TimeCooling {
    initial_temperature: f64,
    alpha: f64,
    min_temperature: f64,
    start: Instant,
}

impl TimeCooling {
    /// Creates a schedule decaying by `alpha` per second.
    pub fn new(initial_temperature: f64, alpha: f64, min_temperature: f64) -> Result<Self, String> {
        if !(initial_temperature > 0.0) || !initial_temperature.is_finite() {
            return Err("initial_temperature must be positive and finite".into());
        }
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(format!("alpha must be in (0, 1), got {alpha}"));
        }
        if !(min_temperature > 0.0) || min_temperature > initial_temperature {
            return Err("min_temperature must be in (0, initial_temperature]".into());
        }
        Ok(Self {
            initial_temperature,
            alpha,
            min_temperature,
            start: Instant::now(),
        })
    }

    /// Creates a schedule that starts at `start_temperature` and reaches
    /// `end_temperature` after `duration`, staying there afterwards.
    pub fn from_endpoints(
        duration: Duration,
        start_temperature: f64,
        end_temperature: f64,
    ) -> Result<Self, String> {
        let seconds = duration.as_secs_f64();
        if !(seconds > 0.0) {
            return Err("duration must be positive".into());
        }
        if !(end_temperature > 0.0) || end_temperature >= start_temperature {
            return Err("end_temperature must be in (0, start_temperature)".into());
        }
        let alpha = (end_temperature / start_temperature).powf(1.0 / seconds);
        Self::new(start_temperature, alpha, end_temperature)
    }

    /// Temperature after `elapsed`.
    pub fn temperature_at(&self, elapsed: Duration) -> f64 {
        let t = self.initial_temperature * self.alpha.powf(elapsed.as_secs_f64());
        t.max(self.min_temperature)
    }

    /// Restarts the clock.
    pub fn restart(&mut self) {
        self.start = Instant::now();
    }
}

impl Temperature for TimeCooling {
    fn next_temperature(&mut self) -> f64 {
        self.temperature_at(self.start.elapsed())
    }
}
