//! Domain-agnostic local search framework.
//!
//! Drives caller-defined solutions through neighborhood exploration, gain
//! evaluation and commit steps:
//!
//! - **Search** ([`search`]): the engine. Solution, moves and objective are
//!   supplied as component bundles; the engine picks moves
//!   (first-improving or best-improving) and decides when to stop.
//!   Works on single solutions and on solutions made of elements.
//! - **Simulated Annealing** ([`sa`]): Metropolis acceptance and
//!   best-solution recording as decorators over ordinary components,
//!   with iteration- and time-keyed cooling schedules.
//! - **Problems** ([`problems`]): ready-made adapters for N-queens, 2-opt
//!   tours, k-median and facility location.
//!
//! # Architecture
//!
//! This crate sits at Layer 2 (Algorithms) in the U-Engine ecosystem,
//! depending only on `u-numflow` (Layer 1: Foundation) for seeded random
//! sources. It contains no domain-specific concepts beyond the bundled
//! example adapters.

pub mod problems;
pub mod sa;
pub mod search;
