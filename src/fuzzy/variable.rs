//! Linguistic variables
//!
//! A named crisp domain with labeled fuzzy sets over it. Built from static
//! [`VariableSpec`] tables and validated once.

use super::membership::Triangle;
use crate::error::ConfigError;

/// One labeled fuzzy set in a [`VariableSpec`]
#[derive(Debug, Clone, Copy)]
pub struct TermSpec {
    pub label: &'static str,
    /// Triangle points `(a, b, c)`
    pub points: (f64, f64, f64),
}

/// Declarative description of a linguistic variable
#[derive(Debug, Clone, Copy)]
pub struct VariableSpec {
    pub name: &'static str,
    /// Inclusive crisp domain `(min, max)`
    pub domain: (f64, f64),
    pub terms: &'static [TermSpec],
}

/// A validated linguistic variable
#[derive(Debug, Clone)]
pub struct LinguisticVariable {
    name: String,
    min: f64,
    max: f64,
    labels: Vec<String>,
    sets: Vec<Triangle>,
}

impl LinguisticVariable {
    pub fn from_spec(spec: &VariableSpec) -> Result<Self, ConfigError> {
        let (min, max) = spec.domain;
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(ConfigError::InvalidDomain {
                variable: spec.name.to_string(),
                min,
                max,
            });
        }
        if spec.terms.is_empty() {
            return Err(ConfigError::NoLabels {
                variable: spec.name.to_string(),
            });
        }

        let mut labels = Vec::with_capacity(spec.terms.len());
        let mut sets = Vec::with_capacity(spec.terms.len());
        for term in spec.terms {
            if labels.iter().any(|l: &String| l == term.label) {
                return Err(ConfigError::DuplicateLabel {
                    variable: spec.name.to_string(),
                    label: term.label.to_string(),
                });
            }

            let (a, b, c) = term.points;
            let set = Triangle::new(a, b, c).ok_or_else(|| ConfigError::InvalidMembership {
                variable: spec.name.to_string(),
                label: term.label.to_string(),
                a,
                b,
                c,
            })?;
            if a < min || c > max {
                return Err(ConfigError::MembershipOutsideDomain {
                    variable: spec.name.to_string(),
                    label: term.label.to_string(),
                    a,
                    c,
                    min,
                    max,
                });
            }

            labels.push(term.label.to_string());
            sets.push(set);
        }

        Ok(Self {
            name: spec.name.to_string(),
            min,
            max,
            labels,
            sets,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn sets(&self) -> &[Triangle] {
        &self.sets
    }

    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Clamp a crisp value into the domain (NaN passes through)
    #[inline]
    pub fn clip(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Membership of `x` in each label, in label order
    ///
    /// `x` is clipped to the domain first, so values past either edge read
    /// like the edge itself.
    pub fn fuzzify(&self, x: f64) -> Vec<f64> {
        let x = self.clip(x);
        self.sets.iter().map(|set| set.membership(x)).collect()
    }

    /// Membership of `x` in a single label, if the label exists
    pub fn membership(&self, label: &str, x: f64) -> Option<f64> {
        self.label_index(label)
            .map(|i| self.sets[i].membership(self.clip(x)))
    }
}
