//! Uncapacitated facility location with remove, add and swap moves.
//!
//! Every open facility pays its opening cost and every client is served by
//! its closest open facility. Elements are all candidate facilities, open
//! ones first, so the add bundle can reach facilities not yet in the
//! solution. The three bundles are searched together as one tuple.

use super::k_median::KMedianSolution;
use crate::search::{MultiCommit, MultiGain, MultiGetMoves, MultiSearchComponents, MultiSolution};

/// A candidate facility and whether it is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facility {
    pub id: usize,
    pub open: bool,
}

/// Open/closed facility split with per-facility opening costs.
///
/// # Examples
///
/// ```
/// use u_localsearch::problems::{facility_location_components, FacilityLocationSolution};
/// use u_localsearch::search::first_improving_multi;
///
/// // Two clients far apart, a cheap site next to each.
/// let serve = vec![vec![0.0, 50.0], vec![50.0, 0.0]];
/// let mut solution = FacilityLocationSolution::new(serve, vec![1.0, 1.0], vec![0]).unwrap();
/// assert_eq!(solution.cost(), 51.0);
/// first_improving_multi(&mut solution, facility_location_components());
/// assert_eq!(solution.cost(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityLocationSolution {
    assignment: KMedianSolution,
    opening: Vec<f64>,
}

impl FacilityLocationSolution {
    /// `serve[f][c]` is the cost of serving client `c` from facility `f`,
    /// `opening[f]` the cost of opening `f`. `chosen` must be non-empty.
    pub fn new(serve: Vec<Vec<f64>>, opening: Vec<f64>, chosen: Vec<usize>) -> Result<Self, String> {
        if opening.len() != serve.len() {
            return Err(format!(
                "expected {} opening costs, got {}",
                serve.len(),
                opening.len()
            ));
        }
        if chosen.is_empty() {
            return Err("at least one facility must be open".into());
        }
        Ok(Self {
            assignment: KMedianSolution::new(serve, chosen)?,
            opening,
        })
    }

    /// Open facilities.
    pub fn chosen(&self) -> &[usize] {
        self.assignment.chosen()
    }

    /// Closed facilities.
    pub fn unchosen(&self) -> &[usize] {
        self.assignment.unchosen()
    }

    /// Opening plus assignment cost.
    pub fn cost(&self) -> f64 {
        self.cost_of(self.chosen().iter().copied())
    }

    fn cost_of<I>(&self, open: I) -> f64
    where
        I: Iterator<Item = usize> + Clone,
    {
        let opening: f64 = open.clone().map(|f| self.opening[f]).sum();
        opening + self.assignment.assignment_cost(open)
    }

    /// Cost reduction of closing `f`. Closing the last open facility is
    /// never an improvement.
    pub fn remove_gain(&self, f: usize) -> f64 {
        if self.chosen().len() < 2 {
            return f64::NEG_INFINITY;
        }
        self.cost() - self.cost_of(self.chosen().iter().copied().filter(move |&c| c != f))
    }

    /// Cost reduction of opening `f`.
    pub fn add_gain(&self, f: usize) -> f64 {
        self.cost() - self.cost_of(self.chosen().iter().copied().chain(std::iter::once(f)))
    }

    /// Cost reduction of closing `open` and opening `closed`.
    pub fn swap_gain(&self, open: usize, closed: usize) -> f64 {
        let swapped = self
            .chosen()
            .iter()
            .map(move |&c| if c == open { closed } else { c });
        self.cost() - self.cost_of(swapped)
    }
}

impl MultiSolution for FacilityLocationSolution {
    type Element = Facility;

    fn elements(&self) -> Vec<Facility> {
        let open = self.chosen().iter().map(|&id| Facility { id, open: true });
        let closed = self.unchosen().iter().map(|&id| Facility { id, open: false });
        open.chain(closed).collect()
    }
}

/// Closing an open facility. The move carries no data.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveMoves;

impl MultiGetMoves<FacilityLocationSolution, Facility> for RemoveMoves {
    type Move = ();

    fn get_moves(&mut self, solution: &FacilityLocationSolution, f: &Facility) -> Vec<()> {
        if f.open && solution.chosen().len() > 1 {
            vec![()]
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveGain;

impl MultiGain<FacilityLocationSolution, Facility, ()> for RemoveGain {
    fn gain(&mut self, solution: &FacilityLocationSolution, f: &Facility, _: &()) -> f64 {
        solution.remove_gain(f.id)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveCommit;

impl MultiCommit<FacilityLocationSolution, Facility, ()> for RemoveCommit {
    fn commit(&mut self, solution: &mut FacilityLocationSolution, f: &Facility, _: &()) -> bool {
        solution.assignment.close(f.id)
    }
}

/// Opening a closed facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddMoves;

impl MultiGetMoves<FacilityLocationSolution, Facility> for AddMoves {
    type Move = ();

    fn get_moves(&mut self, _: &FacilityLocationSolution, f: &Facility) -> Vec<()> {
        if f.open {
            Vec::new()
        } else {
            vec![()]
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AddGain;

impl MultiGain<FacilityLocationSolution, Facility, ()> for AddGain {
    fn gain(&mut self, solution: &FacilityLocationSolution, f: &Facility, _: &()) -> f64 {
        solution.add_gain(f.id)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AddCommit;

impl MultiCommit<FacilityLocationSolution, Facility, ()> for AddCommit {
    fn commit(&mut self, solution: &mut FacilityLocationSolution, f: &Facility, _: &()) -> bool {
        solution.assignment.open(f.id)
    }
}

/// Replacing an open facility by a closed one. Moves are the closed ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapMoves;

impl MultiGetMoves<FacilityLocationSolution, Facility> for SwapMoves {
    type Move = usize;

    fn get_moves(&mut self, solution: &FacilityLocationSolution, f: &Facility) -> Vec<usize> {
        if f.open {
            solution.unchosen().to_vec()
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SwapGain;

impl MultiGain<FacilityLocationSolution, Facility, usize> for SwapGain {
    fn gain(&mut self, solution: &FacilityLocationSolution, f: &Facility, closed: &usize) -> f64 {
        solution.swap_gain(f.id, *closed)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SwapCommit;

impl MultiCommit<FacilityLocationSolution, Facility, usize> for SwapCommit {
    fn commit(
        &mut self,
        solution: &mut FacilityLocationSolution,
        f: &Facility,
        closed: &usize,
    ) -> bool {
        solution.assignment.swap(f.id, *closed)
    }
}

pub type RemoveComponents = MultiSearchComponents<RemoveMoves, RemoveGain, RemoveCommit>;
pub type AddComponents = MultiSearchComponents<AddMoves, AddGain, AddCommit>;
pub type SwapComponents = MultiSearchComponents<SwapMoves, SwapGain, SwapCommit>;

/// Remove, add and swap bundles, searched in that order.
pub fn facility_location_components() -> (RemoveComponents, AddComponents, SwapComponents) {
    (
        MultiSearchComponents::new(RemoveMoves, RemoveGain, RemoveCommit),
        MultiSearchComponents::new(AddMoves, AddGain, AddCommit),
        MultiSearchComponents::new(SwapMoves, SwapGain, SwapCommit),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{
        best_improving_multi, first_improving_multi, local_search_multi, CountLimit,
        FirstImproving, MultiLocalSearchStep,
    };

    /// Clients and facilities share the positions 0, 1, 2, 100, 101, 102;
    /// every facility costs 10 to open. The optimum opens 1 and 4 for a
    /// total of 20 + 4.
    fn two_clusters(chosen: Vec<usize>) -> FacilityLocationSolution {
        let positions = [0.0, 1.0, 2.0, 100.0, 101.0, 102.0];
        let serve = positions
            .iter()
            .map(|f: &f64| positions.iter().map(|c| (f - c).abs()).collect())
            .collect();
        FacilityLocationSolution::new(serve, vec![10.0; 6], chosen).unwrap()
    }

    fn sorted(ids: &[usize]) -> Vec<usize> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_rejects_bad_input() {
        let serve = vec![vec![0.0], vec![1.0]];
        assert!(FacilityLocationSolution::new(serve.clone(), vec![1.0], vec![0]).is_err());
        assert!(FacilityLocationSolution::new(serve.clone(), vec![1.0, 1.0], vec![]).is_err());
        assert!(FacilityLocationSolution::new(serve, vec![1.0, 1.0], vec![5]).is_err());
    }

    #[test]
    fn test_elements_list_open_then_closed() {
        let solution = two_clusters(vec![3, 0]);
        let elements = solution.elements();
        assert_eq!(elements.len(), 6);
        assert_eq!(elements[0], Facility { id: 3, open: true });
        assert_eq!(elements[1], Facility { id: 0, open: true });
        assert!(elements[2..].iter().all(|f| !f.open));
    }

    #[test]
    fn test_gains_match_cost_differences() {
        let solution = two_clusters(vec![0, 3]);
        let before = solution.cost();
        assert_eq!(before, 26.0);

        let mut removed = solution.clone();
        assert!(removed.assignment.close(3));
        assert_eq!(solution.remove_gain(3), before - removed.cost());

        let mut added = solution.clone();
        assert!(added.assignment.open(4));
        assert_eq!(solution.add_gain(4), before - added.cost());

        let mut swapped = solution.clone();
        assert!(swapped.assignment.swap(0, 1));
        assert_eq!(solution.swap_gain(0, 1), before - swapped.cost());
    }

    #[test]
    fn test_last_facility_is_never_removed() {
        let mut solution = two_clusters(vec![2]);
        assert!(RemoveMoves.get_moves(&solution, &Facility { id: 2, open: true }).is_empty());
        assert_eq!(solution.remove_gain(2), f64::NEG_INFINITY);
        assert!(!solution.assignment.close(2));
    }

    #[test]
    fn test_first_improving_from_one_facility() {
        let mut solution = two_clusters(vec![0]);
        assert!(first_improving_multi(&mut solution, facility_location_components()));
        assert_eq!(solution.cost(), 24.0);
        assert_eq!(sorted(solution.chosen()), vec![1, 4]);
    }

    #[test]
    fn test_first_improving_from_all_facilities() {
        let mut solution = two_clusters((0..6).collect());
        assert!(first_improving_multi(&mut solution, facility_location_components()));
        assert_eq!(sorted(solution.chosen()), vec![1, 4]);
    }

    #[test]
    fn test_best_improving_reaches_optimum() {
        let mut solution = two_clusters(vec![0, 1, 2]);
        assert!(best_improving_multi(&mut solution, facility_location_components()));
        assert_eq!(solution.cost(), 24.0);
    }

    #[test]
    fn test_first_round_adds_facility_in_far_cluster() {
        // Nothing can be removed from a single facility, so the add bundle
        // supplies the first improvement.
        let mut solution = two_clusters(vec![0]);
        let mut step = MultiLocalSearchStep::new(
            &mut solution,
            FirstImproving,
            facility_location_components(),
        );
        assert!(step.search());
        assert_eq!(step.solution().chosen(), &[0, 3]);
    }

    #[test]
    fn test_count_limit_on_success_bounds_rounds() {
        let mut solution = two_clusters(vec![0]);
        let mut rounds = CountLimit::new(0);
        assert!(local_search_multi(
            &mut solution,
            FirstImproving,
            |_| !rounds.tick(),
            |_| false,
            facility_location_components(),
        ));
        assert_eq!(solution.chosen(), &[0, 3]);

        let mut optimum = two_clusters(vec![1, 4]);
        assert!(!first_improving_multi(&mut optimum, facility_location_components()));
    }
}
