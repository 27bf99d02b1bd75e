//! Mamdani inference: fuzzify, fire rules, clip, aggregate, centroid

use super::rule::{Antecedent, Rule, RuleSpec};
use super::variable::{LinguisticVariable, VariableSpec};
use crate::error::ConfigError;

/// Why an inference produced no crisp output
#[derive(Debug, Clone, PartialEq)]
pub enum Degenerate {
    /// Wrong number of crisp inputs for the configured variables
    InputCount { expected: usize, got: usize },
    /// An input was NaN
    NonFiniteInput { variable: String },
    /// No rule fired, so the aggregate output set has zero area
    EmptyOutput,
}

/// Result of one inference pass
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Firing strength of each rule, in rule order
    pub rule_strengths: Vec<f64>,
    /// Clip level of each output label (max strength of its rules)
    pub activations: Vec<f64>,
    /// Defuzzified output, or why there is none
    pub outcome: Result<f64, Degenerate>,
}

impl Inference {
    fn degenerate(reason: Degenerate, rules: usize, labels: usize) -> Self {
        Self {
            rule_strengths: vec![0.0; rules],
            activations: vec![0.0; labels],
            outcome: Err(reason),
        }
    }

    pub fn crisp(&self) -> Option<f64> {
        self.outcome.as_ref().ok().copied()
    }

    pub fn is_degenerate(&self) -> bool {
        self.outcome.is_err()
    }

    /// True iff the crisp output exceeds `threshold`; degenerate results never do
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.crisp().is_some_and(|v| v > threshold)
    }
}

/// A configured, immutable fuzzy inference system
#[derive(Debug, Clone)]
pub struct FuzzyEngine {
    inputs: Vec<LinguisticVariable>,
    output: LinguisticVariable,
    rules: Vec<Rule>,
    /// Sample points over the output domain used for the centroid
    universe: Vec<f64>,
}

impl FuzzyEngine {
    /// Validate the tables and build the engine
    ///
    /// `resolution` is the sampling step over the output domain.
    pub fn configure(
        inputs: &[VariableSpec],
        output: &VariableSpec,
        rules: &[RuleSpec],
        resolution: f64,
    ) -> Result<Self, ConfigError> {
        let inputs = inputs
            .iter()
            .map(LinguisticVariable::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        let output = LinguisticVariable::from_spec(output)?;

        if rules.is_empty() {
            return Err(ConfigError::NoRules);
        }
        let rules = rules
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let rule = i + 1;
                let antecedent = Antecedent::compile(&spec.when, &inputs, rule)?;
                let consequent =
                    output
                        .label_index(spec.then)
                        .ok_or_else(|| ConfigError::UnknownLabel {
                            rule,
                            variable: output.name().to_string(),
                            label: spec.then.to_string(),
                        })?;
                Ok(Rule {
                    antecedent,
                    consequent,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let (min, max) = output.domain();
        if !(resolution.is_finite() && resolution > 0.0 && resolution < max - min) {
            return Err(ConfigError::NonPositive {
                field: "resolution",
                value: resolution,
            });
        }
        let steps = ((max - min) / resolution).round() as usize;
        let universe = (0..=steps)
            .map(|i| (min + i as f64 * resolution).min(max))
            .collect();

        Ok(Self {
            inputs,
            output,
            rules,
            universe,
        })
    }

    pub fn inputs(&self) -> &[LinguisticVariable] {
        &self.inputs
    }

    pub fn output(&self) -> &LinguisticVariable {
        &self.output
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run one inference over crisp inputs given in variable order
    pub fn infer(&self, crisp: &[f64]) -> Inference {
        let labels = self.output.labels().len();
        if crisp.len() != self.inputs.len() {
            return Inference::degenerate(
                Degenerate::InputCount {
                    expected: self.inputs.len(),
                    got: crisp.len(),
                },
                self.rules.len(),
                labels,
            );
        }
        if let Some(i) = crisp.iter().position(|x| x.is_nan()) {
            let reason = Degenerate::NonFiniteInput {
                variable: self.inputs[i].name().to_string(),
            };
            log::debug!("Fuzzy inference degenerate: {:?}", reason);
            return Inference::degenerate(reason, self.rules.len(), labels);
        }

        let memberships: Vec<Vec<f64>> = self
            .inputs
            .iter()
            .zip(crisp)
            .map(|(var, &x)| var.fuzzify(x))
            .collect();

        let rule_strengths: Vec<f64> = self
            .rules
            .iter()
            .map(|r| r.antecedent.strength(&memberships))
            .collect();

        let mut activations = vec![0.0_f64; labels];
        for (rule, &strength) in self.rules.iter().zip(&rule_strengths) {
            let slot = &mut activations[rule.consequent];
            *slot = slot.max(strength);
        }

        let outcome = self.centroid(&activations);
        if let Err(reason) = &outcome {
            log::debug!("Fuzzy inference degenerate: {:?} for inputs {:?}", reason, crisp);
        }

        Inference {
            rule_strengths,
            activations,
            outcome,
        }
    }

    /// Centre of gravity of the clipped-and-unioned output sets
    fn centroid(&self, activations: &[f64]) -> Result<f64, Degenerate> {
        let sets = self.output.sets();
        let mut weighted = 0.0;
        let mut area = 0.0;
        for &x in &self.universe {
            let mu = sets
                .iter()
                .zip(activations)
                .map(|(set, &level)| set.membership(x).min(level))
                .fold(0.0, f64::max);
            weighted += x * mu;
            area += mu;
        }

        if area <= f64::EPSILON {
            Err(Degenerate::EmptyOutput)
        } else {
            Ok(weighted / area)
        }
    }
}
