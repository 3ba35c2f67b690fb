//! Ready-made problem adapters for the multi-element engine.
//!
//! Each adapter pairs a [`MultiSolution`](crate::search::MultiSolution)
//! with move, gain and commit components:
//!
//! - [`n_queens`]: queen placement, swap moves.
//! - [`two_opt`]: travelling salesman tours, 2-opt moves.
//! - [`k_median`]: facility selection, open/closed swaps.
//! - [`facility_location`]: facility selection with opening costs, remove,
//!   add and swap bundles searched together.

pub mod facility_location;
pub mod k_median;
pub mod n_queens;
pub mod two_opt;

pub use facility_location::{facility_location_components, Facility, FacilityLocationSolution};
pub use k_median::{k_median_components, KMedianSolution};
pub use n_queens::{n_queens_components, NQueensSolution};
pub use two_opt::{two_opt_components, DistanceMatrix, Tour};
