//! Prompt complexity estimation
//!
//! The score is the mean of several feature scores, each clamped to [0, 1].
//! Estimation is total and pure: it looks only at the request text and its
//! turn count.

use crate::core::types::Request;
use crate::utils::error::{GatewayError, Result};

/// Text view handed to every feature
#[derive(Debug, Clone, Copy)]
pub struct FeatureInput<'a> {
    /// History turns and prompt joined by newlines
    pub text: &'a str,
    /// `text` in lower case
    pub lowered: &'a str,
    /// Turns including the prompt
    pub turns: usize,
}

/// One signal contributing to the complexity score
pub trait ComplexityFeature: Send + Sync {
    /// Short name used in debug output
    fn name(&self) -> &'static str;

    /// Raw score; clamped to [0, 1] by the estimator
    fn score(&self, input: &FeatureInput<'_>) -> f64;
}

/// Longer text scores higher, saturating at `target_chars`
#[derive(Debug, Clone, Copy)]
pub struct LengthFeature {
    target_chars: usize,
}

impl LengthFeature {
    pub fn new(target_chars: usize) -> Self {
        Self {
            target_chars: target_chars.max(1),
        }
    }
}

impl Default for LengthFeature {
    fn default() -> Self {
        Self::new(300)
    }
}

impl ComplexityFeature for LengthFeature {
    fn name(&self) -> &'static str {
        "length"
    }

    fn score(&self, input: &FeatureInput<'_>) -> f64 {
        input.text.chars().count() as f64 / self.target_chars as f64
    }
}

/// Fenced code blocks or code-like tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeFeature;

const CODE_MARKERS: &[&str] = &["def", "class", "select", "function", "public", "{", ";", "</"];

impl ComplexityFeature for CodeFeature {
    fn name(&self) -> &'static str {
        "code"
    }

    fn score(&self, input: &FeatureInput<'_>) -> f64 {
        if has_fenced_block(input.text) {
            return 1.0;
        }
        keyword_hits(input.lowered, CODE_MARKERS) as f64 / CODE_MARKERS.len() as f64
    }
}

fn has_fenced_block(text: &str) -> bool {
    match text.find("```") {
        Some(start) => text[start + 3..]
            .find("```")
            .is_some_and(|end| end > 0),
        None => false,
    }
}

/// Verbs asking for multi-step reasoning
#[derive(Debug, Clone, Copy, Default)]
pub struct ReasoningFeature;

const REASONING_KEYWORDS: &[&str] = &[
    "reason",
    "explain",
    "derive",
    "analyze",
    "justify",
    "step-by-step",
    "compare",
    "evaluate",
];

impl ComplexityFeature for ReasoningFeature {
    fn name(&self) -> &'static str {
        "reasoning"
    }

    fn score(&self, input: &FeatureInput<'_>) -> f64 {
        keyword_hits(input.lowered, REASONING_KEYWORDS) as f64 / 2.0
    }
}

/// Math, CS and engineering vocabulary
#[derive(Debug, Clone, Copy, Default)]
pub struct TechnicalFeature;

const TECHNICAL_TERMS: &[&str] = &[
    "tensor",
    "gradient",
    "database",
    "encryption",
    "neural",
    "api",
    "schema",
    "complexity",
    "algorithm",
    "probability",
    "latency",
];

impl ComplexityFeature for TechnicalFeature {
    fn name(&self) -> &'static str {
        "technical"
    }

    fn score(&self, input: &FeatureInput<'_>) -> f64 {
        keyword_hits(input.lowered, TECHNICAL_TERMS) as f64 / 3.0
    }
}

/// Longer conversations score higher, saturating at ten turns
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversationDepthFeature;

impl ComplexityFeature for ConversationDepthFeature {
    fn name(&self) -> &'static str {
        "depth"
    }

    fn score(&self, input: &FeatureInput<'_>) -> f64 {
        input.turns as f64 / 10.0
    }
}

fn keyword_hits(lowered: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| lowered.contains(*k)).count()
}

/// Complexity estimator over a fixed feature set
pub struct ComplexityEstimator {
    features: Vec<Box<dyn ComplexityFeature>>,
}

impl ComplexityEstimator {
    /// Estimator over custom features
    pub fn new(features: Vec<Box<dyn ComplexityFeature>>) -> Result<Self> {
        if features.is_empty() {
            return Err(GatewayError::configuration(
                "Complexity estimator needs at least one feature",
            ));
        }
        Ok(Self { features })
    }

    /// Score in [0, 1]; a blank prompt scores 0.0 whatever the history
    pub fn estimate(&self, request: &Request) -> f64 {
        if request.prompt().trim().is_empty() {
            return 0.0;
        }

        let text = request.text_segments().collect::<Vec<_>>().join("\n");
        let lowered = text.to_lowercase();
        let input = FeatureInput {
            text: &text,
            lowered: &lowered,
            turns: request.turn_count(),
        };

        let total: f64 = self
            .features
            .iter()
            .map(|feature| clamp_unit(feature.score(&input)))
            .sum();
        clamp_unit(total / self.features.len() as f64)
    }

    /// Per-feature scores, for diagnostics
    pub fn breakdown(&self, request: &Request) -> Vec<(&'static str, f64)> {
        let text = request.text_segments().collect::<Vec<_>>().join("\n");
        let lowered = text.to_lowercase();
        let input = FeatureInput {
            text: &text,
            lowered: &lowered,
            turns: request.turn_count(),
        };
        self.features
            .iter()
            .map(|feature| (feature.name(), clamp_unit(feature.score(&input))))
            .collect()
    }
}

impl Default for ComplexityEstimator {
    fn default() -> Self {
        Self {
            features: vec![
                Box::new(LengthFeature::default()),
                Box::new(CodeFeature),
                Box::new(ReasoningFeature),
                Box::new(TechnicalFeature),
                Box::new(ConversationDepthFeature),
            ],
        }
    }
}

impl std::fmt::Debug for ComplexityEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.features.iter().map(|feature| feature.name()))
            .finish()
    }
}

// NaN counts as 0.0
fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
