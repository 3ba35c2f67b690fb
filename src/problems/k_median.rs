//! k-median facility selection with a swap neighborhood.
//!
//! Exactly `k` facilities are open. Every client is served by its closest
//! open facility. A move swaps an open facility for a closed one.

use crate::search::{MultiCommit, MultiGain, MultiGetMoves, MultiSearchComponents, MultiSolution};

/// Open/closed facility split over a facility × client cost matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct KMedianSolution {
    costs: Vec<Vec<f64>>,
    chosen: Vec<usize>,
    unchosen: Vec<usize>,
}

impl KMedianSolution {
    /// `costs[f][c]` is the cost of serving client `c` from facility `f`.
    /// `chosen` lists the initially open facilities.
    pub fn new(costs: Vec<Vec<f64>>, chosen: Vec<usize>) -> Result<Self, String> {
        let facilities = costs.len();
        if let Some(clients) = costs.first().map(Vec::len) {
            if costs.iter().any(|row| row.len() != clients) {
                return Err("every facility needs a cost for every client".into());
            }
        }
        let mut open = vec![false; facilities];
        for &f in &chosen {
            if f >= facilities || open[f] {
                return Err(format!("invalid or duplicate facility {f}"));
            }
            open[f] = true;
        }
        if chosen.is_empty() && facilities > 0 {
            return Err("at least one facility must be open".into());
        }
        let unchosen = (0..facilities).filter(|&f| !open[f]).collect();
        Ok(Self {
            costs,
            chosen,
            unchosen,
        })
    }

    /// Open facilities, in insertion order.
    pub fn chosen(&self) -> &[usize] {
        &self.chosen
    }

    /// Closed facilities.
    pub fn unchosen(&self) -> &[usize] {
        &self.unchosen
    }

    /// Total assignment cost.
    pub fn cost(&self) -> f64 {
        self.cost_with(|f| f)
    }

    /// Cost reduction of closing `open` and opening `closed`.
    pub fn swap_gain(&self, open: usize, closed: usize) -> f64 {
        let swapped = self.cost_with(|f| if f == open { closed } else { f });
        self.cost() - swapped
    }

    /// Closes `open` and opens `closed` in its place.
    pub fn swap(&mut self, open: usize, closed: usize) -> bool {
        let Some(i) = self.chosen.iter().position(|&f| f == open) else {
            return false;
        };
        let Some(j) = self.unchosen.iter().position(|&f| f == closed) else {
            return false;
        };
        self.chosen[i] = closed;
        self.unchosen[j] = open;
        true
    }

    fn cost_with(&self, map: impl Fn(usize) -> usize) -> f64 {
        self.assignment_cost(self.chosen.iter().map(|&f| map(f)))
    }

    /// Assignment cost when exactly the facilities in `open` serve clients.
    pub(crate) fn assignment_cost<I>(&self, open: I) -> f64
    where
        I: Iterator<Item = usize> + Clone,
    {
        let clients = self.costs.first().map_or(0, Vec::len);
        (0..clients)
            .map(|c| {
                open.clone()
                    .map(|f| self.costs[f][c])
                    .fold(f64::INFINITY, f64::min)
            })
            .sum()
    }

    /// Number of candidate facilities.
    pub fn facilities(&self) -> usize {
        self.costs.len()
    }

    /// Whether facility `f` is open.
    pub fn is_chosen(&self, f: usize) -> bool {
        self.chosen.contains(&f)
    }

    /// Opens a closed facility.
    pub(crate) fn open(&mut self, f: usize) -> bool {
        let Some(j) = self.unchosen.iter().position(|&u| u == f) else {
            return false;
        };
        self.unchosen.remove(j);
        self.chosen.push(f);
        true
    }

    /// Closes an open facility, keeping at least one open.
    pub(crate) fn close(&mut self, f: usize) -> bool {
        if self.chosen.len() < 2 {
            return false;
        }
        let Some(i) = self.chosen.iter().position(|&c| c == f) else {
            return false;
        };
        self.chosen.remove(i);
        self.unchosen.push(f);
        true
    }
}

impl MultiSolution for KMedianSolution {
    type Element = usize;

    fn elements(&self) -> Vec<usize> {
        self.chosen.clone()
    }
}

/// Closed facilities that could replace an open one.
#[derive(Debug, Clone, Copy, Default)]
pub struct KMedianMoves;

impl MultiGetMoves<KMedianSolution, usize> for KMedianMoves {
    type Move = usize;

    fn get_moves(&mut self, solution: &KMedianSolution, _: &usize) -> Vec<usize> {
        solution.unchosen.clone()
    }
}

/// Assignment cost reduction of a swap.
#[derive(Debug, Clone, Copy, Default)]
pub struct KMedianGain;

impl MultiGain<KMedianSolution, usize, usize> for KMedianGain {
    fn gain(&mut self, solution: &KMedianSolution, open: &usize, closed: &usize) -> f64 {
        solution.swap_gain(*open, *closed)
    }
}

/// Applies a swap.
#[derive(Debug, Clone, Copy, Default)]
pub struct KMedianCommit;

impl MultiCommit<KMedianSolution, usize, usize> for KMedianCommit {
    fn commit(&mut self, solution: &mut KMedianSolution, open: &usize, closed: &usize) -> bool {
        solution.swap(*open, *closed)
    }
}

/// Swap neighborhood components for [`KMedianSolution`].
///
/// # Examples
///
/// ```
/// use u_localsearch::problems::{k_median_components, KMedianSolution};
/// use u_localsearch::search::first_improving_multi;
///
/// // Two clients, three candidate sites.
/// let costs = vec![vec![5.0, 5.0], vec![0.0, 9.0], vec![9.0, 0.0]];
/// let mut solution = KMedianSolution::new(costs, vec![0, 1]).unwrap();
/// first_improving_multi(&mut solution, k_median_components());
/// assert_eq!(solution.cost(), 0.0);
/// ```
pub fn k_median_components() -> MultiSearchComponents<KMedianMoves, KMedianGain, KMedianCommit> {
    MultiSearchComponents::new(KMedianMoves, KMedianGain, KMedianCommit)
}
