//! Payoff descriptions.
//!
//! A payoff carries the query the engine sends to a language model to score
//! an outcome, plus the numeric range of that score. The assembler only reads
//! the range; scoring is the engine's job.

use serde::{Deserialize, Serialize};

/// Numeric bounds of a utility
pub trait UtilityBounds {
    /// Lowest attainable utility
    fn min_utility(&self) -> f64;
    /// Highest attainable utility
    fn max_utility(&self) -> f64;
}

/// A payoff query and its score range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payoff {
    /// Query asking the model to score the outcome for one player
    pub query: String,
    /// Lowest score
    pub min: f64,
    /// Highest score
    pub max: f64,
    /// Prefix for the observation transform applied before scoring
    pub obs_trans_prefix: String,
    /// Postfix for the observation transform applied before scoring
    pub obs_trans_postfix: String,
}

impl Payoff {
    /// Create a payoff with empty observation transforms
    pub fn new(query: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            query: query.into(),
            min,
            max,
            obs_trans_prefix: String::new(),
            obs_trans_postfix: String::new(),
        }
    }

    /// Set the observation transform
    pub fn with_obs_trans(mut self, prefix: impl Into<String>, postfix: impl Into<String>) -> Self {
        self.obs_trans_prefix = prefix.into();
        self.obs_trans_postfix = postfix.into();
        self
    }

    /// Bounds-only payoff
    pub fn bounded(min: f64, max: f64) -> Self {
        Self::new(String::new(), min, max)
    }
}

impl UtilityBounds for Payoff {
    fn min_utility(&self) -> f64 {
        self.min
    }

    fn max_utility(&self) -> f64 {
        self.max
    }
}

/// Query asking the model whether the dialogue has ended
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Termination {
    /// Yes/no question about the dialogue
    pub query: String,
    /// Prefix for the observation transform applied before asking
    pub obs_trans_prefix: String,
    /// Postfix for the observation transform applied before asking
    pub obs_trans_postfix: String,
}

impl Termination {
    /// Create a termination query with empty observation transforms
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set the observation transform
    pub fn with_obs_trans(mut self, prefix: impl Into<String>, postfix: impl Into<String>) -> Self {
        self.obs_trans_prefix = prefix.into();
        self.obs_trans_postfix = postfix.into();
        self
    }
}

/// Utility bounds across a set of payoffs, `None` when the set is empty
pub fn utility_range<P: UtilityBounds>(payoffs: &[P]) -> Option<(f64, f64)> {
    let first = payoffs.first()?;
    Some(payoffs.iter().skip(1).fold(
        (first.min_utility(), first.max_utility()),
        |(lo, hi), p| (lo.min(p.min_utility()), hi.max(p.max_utility())),
    ))
}
