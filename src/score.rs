//! Confidence arithmetic for pattern detection.
//!
//! All scoring funnels through a single weighted average with
//! partial-evidence re-normalization: a term's weight only enters the
//! denominator when its evidence source exists, so missing sources never
//! dilute the score. Pattern maps grow through a max-merge that can raise a
//! confidence but never lower it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Weights for the evidence terms.
pub mod weights {
    /// Overall score: dependency manifest term.
    pub const MANIFEST: f64 = 0.4;
    /// Overall score: infrastructure config term.
    pub const CONFIG: f64 = 0.3;
    /// Overall score: parsed source file term.
    pub const SOURCE: f64 = 0.3;

    /// Package confidence: framework detection average.
    pub const PKG_FRAMEWORKS: f64 = 0.4;
    /// Package confidence: build script presence.
    pub const PKG_BUILD_SCRIPT: f64 = 0.2;
    /// Package confidence: normalized dependency count.
    pub const PKG_DEP_COUNT: f64 = 0.2;
    /// Package confidence: normalized tool detection count.
    pub const PKG_TOOLS: f64 = 0.2;
}

/// Saturation caps for count-derived terms.
pub mod caps {
    pub const DEPENDENCIES: usize = 20;
    pub const TOOLS: usize = 5;
    pub const CONFIGS: usize = 3;
    pub const SOURCE_FILES: usize = 10;
}

/// Fixed confidences for single-signal evidence.
pub mod signals {
    /// Compose services or a container build file present.
    pub const CONTAINERIZATION: f64 = 0.9;
    /// Database engine named in a config or a driver library declared.
    pub const DATABASE: f64 = 0.8;
    /// Markup-in-script (JSX) seen in a source file.
    pub const SOURCE_JSX: f64 = 0.7;
    /// Hook-convention calls seen in a source file.
    pub const SOURCE_HOOKS: f64 = 0.8;
    /// Framework-specific marker in a backend source file.
    pub const SOURCE_BACKEND: f64 = 0.8;
    /// Component-framework single-file component submitted.
    pub const SOURCE_COMPONENT: f64 = 0.8;
}

/// Clamp a confidence into [0, 1].
pub fn clamp(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// A count flattened to [0, 1] against a saturation cap.
pub fn normalized_count(count: usize, cap: usize) -> f64 {
    if cap == 0 {
        return 0.0;
    }
    (count as f64 / cap as f64).min(1.0)
}

/// Weighted average over (value, weight) terms.
///
/// The denominator is the sum of the supplied weights, so callers express
/// "evidence source absent" by not supplying the term at all. No terms
/// yields 0.
pub fn weighted_average(terms: &[(f64, f64)]) -> f64 {
    let weight_sum: f64 = terms.iter().map(|(_, w)| w).sum();
    if weight_sum <= 0.0 {
        return 0.0;
    }
    let value_sum: f64 = terms.iter().map(|(v, w)| v * w).sum();
    clamp(value_sum / weight_sum)
}

/// A detected pattern: calibrated confidence plus the evidence behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPattern {
    pub confidence: f64,
    pub evidence: Vec<String>,
}

impl DetectedPattern {
    pub fn new(confidence: f64, evidence: Vec<String>) -> Self {
        Self {
            confidence: clamp(confidence),
            evidence,
        }
    }
}

/// The unified pattern maps, keyed by pattern name.
///
/// Ordered maps keep serialized output byte-stable across runs. Patterns
/// with no evidence are absent, never present at confidence 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternSet {
    pub frameworks: BTreeMap<String, DetectedPattern>,
    pub tools: BTreeMap<String, DetectedPattern>,
    pub infrastructure: BTreeMap<String, DetectedPattern>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty() && self.tools.is_empty() && self.infrastructure.is_empty()
    }

    /// Raise a framework pattern, keeping the stronger confidence.
    pub fn raise_framework(self, name: &str, confidence: f64, evidence: &[String]) -> Self {
        self.raise(Channel::Frameworks, name, confidence, evidence)
    }

    /// Raise a tool pattern, keeping the stronger confidence.
    pub fn raise_tool(self, name: &str, confidence: f64, evidence: &[String]) -> Self {
        self.raise(Channel::Tools, name, confidence, evidence)
    }

    /// Raise an infrastructure pattern, keeping the stronger confidence.
    pub fn raise_infrastructure(self, name: &str, confidence: f64, evidence: &[String]) -> Self {
        self.raise(Channel::Infrastructure, name, confidence, evidence)
    }

    fn raise(mut self, channel: Channel, name: &str, confidence: f64, evidence: &[String]) -> Self {
        let map = match channel {
            Channel::Frameworks => &mut self.frameworks,
            Channel::Tools => &mut self.tools,
            Channel::Infrastructure => &mut self.infrastructure,
        };
        let confidence = clamp(confidence);
        match map.get_mut(name) {
            Some(existing) => {
                existing.confidence = existing.confidence.max(confidence);
                for item in evidence {
                    if !existing.evidence.contains(item) {
                        existing.evidence.push(item.clone());
                    }
                }
            }
            None => {
                map.insert(
                    name.to_string(),
                    DetectedPattern::new(confidence, evidence.to_vec()),
                );
            }
        }
        self
    }
}

/// One of the three pattern channels.
#[derive(Debug, Clone, Copy)]
enum Channel {
    Frameworks,
    Tools,
    Infrastructure,
}
