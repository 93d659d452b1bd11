//! Routing decision produced per request

use serde::{Deserialize, Serialize};

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Model identifier
    pub model_id: String,
    /// Provider key of the model
    pub provider: String,
    /// Strategy score used for ranking; `None` for a forced model
    pub score: Option<f64>,
}

/// Ordered candidates for one request: primary first, then fallbacks
///
/// Candidates are unique and never include an inactive model or one that
/// failed a hard constraint (a forced model is the only exception to the
/// latter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    candidates: Vec<ScoredCandidate>,
    strategy: String,
    complexity: f64,
    forced: bool,
}

impl RoutingDecision {
    pub(crate) fn new(
        candidates: Vec<ScoredCandidate>,
        strategy: impl Into<String>,
        complexity: f64,
        forced: bool,
    ) -> Self {
        Self {
            candidates,
            strategy: strategy.into(),
            complexity,
            forced,
        }
    }

    /// Ranked candidates
    pub fn candidates(&self) -> &[ScoredCandidate] {
        &self.candidates
    }

    /// Candidate model identifiers in attempt order
    pub fn model_ids(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.model_id.as_str()).collect()
    }

    /// First candidate
    pub fn primary(&self) -> Option<&ScoredCandidate> {
        self.candidates.first()
    }

    /// Candidates tried after the primary fails
    pub fn fallbacks(&self) -> &[ScoredCandidate] {
        self.candidates.get(1..).unwrap_or(&[])
    }

    /// Name of the strategy that ranked the candidates
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Complexity score of the request
    pub fn complexity(&self) -> f64 {
        self.complexity
    }

    /// True when the request pinned its model through metadata
    pub fn is_forced(&self) -> bool {
        self.forced
    }

    /// A new decision with `provider`'s candidates moved to the front
    ///
    /// Relative order inside both groups is preserved.
    pub fn prefer_provider(&self, provider: &str) -> Self {
        let (mut preferred, rest): (Vec<_>, Vec<_>) = self
            .candidates
            .iter()
            .cloned()
            .partition(|c| c.provider == provider);
        preferred.extend(rest);

        Self {
            candidates: preferred,
            strategy: self.strategy.clone(),
            complexity: self.complexity,
            forced: self.forced,
        }
    }
}
