//! 2-opt neighborhood for symmetric travelling salesman tours.
//!
//! Element `i` is the tour edge leaving position `i`. A move `(i, j)` with
//! `j > i + 1` replaces edges `(t[i], t[i+1])` and `(t[j], t[j+1])` by
//! `(t[i], t[j])` and `(t[i+1], t[j+1])`, reversing the segment between.

use crate::search::{MultiCommit, MultiGain, MultiGetMoves, MultiSearchComponents, MultiSolution};

/// Gains within this distance of zero are treated as zero, so rounding noise never
/// counts as an improvement.
const GAIN_EPSILON: f64 = 1e-9;

/// Dense symmetric distance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds a matrix from row-major entries.
    pub fn new(n: usize, data: Vec<f64>) -> Result<Self, String> {
        if data.len() != n * n {
            return Err(format!("expected {} entries, got {}", n * n, data.len()));
        }
        Ok(Self { n, data })
    }

    /// Euclidean distances between 2-D points.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for (i, a) in points.iter().enumerate() {
            for (j, b) in points.iter().enumerate() {
                data[i * n + j] = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
            }
        }
        Self { n, data }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.n + to]
    }
}

/// A closed tour visiting each city once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    cities: Vec<usize>,
}

impl Tour {
    /// Tour over `cities`, which must be a permutation of `0..matrix.len()`.
    pub fn new(cities: Vec<usize>, matrix: &DistanceMatrix) -> Result<Self, String> {
        let n = matrix.len();
        if cities.len() != n {
            return Err(format!("expected {n} cities, got {}", cities.len()));
        }
        let mut seen = vec![false; n];
        for &c in &cities {
            if c >= n || seen[c] {
                return Err(format!("cities must be a permutation of 0..{n}"));
            }
            seen[c] = true;
        }
        Ok(Self { cities })
    }

    pub fn cities(&self) -> &[usize] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Total length, closing edge included.
    pub fn length(&self, matrix: &DistanceMatrix) -> f64 {
        let n = self.cities.len();
        (0..n)
            .map(|i| matrix.get(self.cities[i], self.cities[(i + 1) % n]))
            .sum()
    }

    /// Length reduction of the 2-opt move `(i, j)`.
    pub fn two_opt_gain(&self, matrix: &DistanceMatrix, i: usize, j: usize) -> f64 {
        let n = self.cities.len();
        let (a, b) = (self.cities[i], self.cities[i + 1]);
        let (c, d) = (self.cities[j], self.cities[(j + 1) % n]);
        let removed = matrix.get(a, b) + matrix.get(c, d);
        let added = matrix.get(a, c) + matrix.get(b, d);
        removed - added
    }

    /// Applies the 2-opt move `(i, j)`.
    pub fn two_opt(&mut self, i: usize, j: usize) {
        self.cities[i + 1..=j].reverse();
    }
}

impl MultiSolution for Tour {
    type Element = usize;

    fn elements(&self) -> Vec<usize> {
        if self.cities.len() < 4 {
            return Vec::new();
        }
        (0..self.cities.len() - 2).collect()
    }
}

/// Later non-adjacent edges of a tour edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOptMoves;

impl MultiGetMoves<Tour, usize> for TwoOptMoves {
    type Move = usize;

    fn get_moves(&mut self, tour: &Tour, i: &usize) -> Vec<usize> {
        let n = tour.len();
        // Edge 0 and edge n-1 share city t[0].
        let last = if *i == 0 { n - 1 } else { n };
        (i + 2..last).collect()
    }
}

/// 2-opt length reduction under a distance matrix.
#[derive(Debug, Clone, Copy)]
pub struct TwoOptGain<'a> {
    matrix: &'a DistanceMatrix,
}

impl MultiGain<Tour, usize, usize> for TwoOptGain<'_> {
    fn gain(&mut self, tour: &Tour, i: &usize, j: &usize) -> f64 {
        let gain = tour.two_opt_gain(self.matrix, *i, *j);
        if gain.abs() <= GAIN_EPSILON {
            0.0
        } else {
            gain
        }
    }
}

/// Reverses the segment of a 2-opt move.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOptCommit;

impl MultiCommit<Tour, usize, usize> for TwoOptCommit {
    fn commit(&mut self, tour: &mut Tour, i: &usize, j: &usize) -> bool {
        tour.two_opt(*i, *j);
        true
    }
}

/// 2-opt components measuring tours with `matrix`.
///
/// # Examples
///
/// ```
/// use u_localsearch::problems::{two_opt_components, DistanceMatrix, Tour};
/// use u_localsearch::search::first_improving_multi;
///
/// let square = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
/// let mut tour = Tour::new(vec![0, 1, 2, 3], &square).unwrap();
/// first_improving_multi(&mut tour, two_opt_components(&square));
/// assert!((tour.length(&square) - 4.0).abs() < 1e-9);
/// ```
pub fn two_opt_components(
    matrix: &DistanceMatrix,
) -> MultiSearchComponents<TwoOptMoves, TwoOptGain<'_>, TwoOptCommit> {
    MultiSearchComponents::new(TwoOptMoves, TwoOptGain { matrix }, TwoOptCommit)
}
