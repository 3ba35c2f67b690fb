//! Simulated annealing on top of the local search engine.
//!
//! Annealing is expressed as two decorators around ordinary search
//! components, leaving the engine itself untouched:
//!
//! - [`AnnealingGain`] wraps a gain and applies the Metropolis rule, so
//!   worsening moves are reported as improving with probability
//!   `exp(gain / T)`.
//! - [`RecordBest`] wraps a commit and keeps a copy of the best solution,
//!   since the current solution may now get worse.
//!
//! [`AnnealingRunner`] wires both into a first-improving search.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod cooling;
mod gain;
mod record;
mod runner;

pub use config::{AnnealingConfig, CoolingSchedule};
pub use cooling::{IterationCooling, Temperature, TimeCooling};
pub use gain::{AnnealingGain, ACCEPTED_GAIN};
pub use record::{Better, Maximize, Minimize, RecordBest};
pub use runner::{AnnealingResult, AnnealingRunner};
