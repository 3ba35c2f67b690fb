//! Local search run configuration.

use std::time::Duration;

/// Budget for [`LocalSearchRunner`](super::LocalSearchRunner).
///
/// A run always ends at a local optimum or when a stop condition fires;
/// the limits below only cut it shorter.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_localsearch::search::LocalSearchConfig;
///
/// let config = LocalSearchConfig::default()
///     .with_max_rounds(1000)
///     .with_time_limit(Duration::from_secs(5));
/// assert_eq!(config.max_rounds, 1000);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalSearchConfig {
    /// Maximum number of rounds (`search()` calls). 0 = no limit.
    pub max_rounds: usize,

    /// Wall-clock budget, checked between rounds.
    pub time_limit: Option<Duration>,
}

impl LocalSearchConfig {
    pub fn with_max_rounds(mut self, n: usize) -> Self {
        self.max_rounds = n;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}
