//! Rule descriptors and compiled antecedents

use super::variable::LinguisticVariable;
use crate::error::ConfigError;

/// Antecedent expression over `(variable, label)` terms
#[derive(Debug, Clone, Copy)]
pub enum Expr {
    /// `variable is label`
    Is(&'static str, &'static str),
    /// Conjunction (min)
    All(&'static [Expr]),
    /// Disjunction (max)
    Any(&'static [Expr]),
}

/// Declarative rule: antecedent implies an output label
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub when: Expr,
    pub then: &'static str,
}

/// Antecedent with variable/label names resolved to indices
#[derive(Debug, Clone, PartialEq)]
pub enum Antecedent {
    Term { variable: usize, label: usize },
    And(Vec<Antecedent>),
    Or(Vec<Antecedent>),
}

impl Antecedent {
    pub(crate) fn compile(
        expr: &Expr,
        inputs: &[LinguisticVariable],
        rule: usize,
    ) -> Result<Self, ConfigError> {
        match expr {
            Expr::Is(name, label) => {
                let variable = inputs.iter().position(|v| v.name() == *name).ok_or_else(|| {
                    ConfigError::UnknownVariable {
                        rule,
                        variable: name.to_string(),
                    }
                })?;
                let label_idx = inputs[variable].label_index(label).ok_or_else(|| {
                    ConfigError::UnknownLabel {
                        rule,
                        variable: name.to_string(),
                        label: label.to_string(),
                    }
                })?;
                Ok(Antecedent::Term {
                    variable,
                    label: label_idx,
                })
            }
            Expr::All(parts) | Expr::Any(parts) => {
                if parts.is_empty() {
                    return Err(ConfigError::EmptyAntecedent { rule });
                }
                let compiled = parts
                    .iter()
                    .map(|p| Self::compile(p, inputs, rule))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(match expr {
                    Expr::All(_) => Antecedent::And(compiled),
                    _ => Antecedent::Or(compiled),
                })
            }
        }
    }

    /// Firing strength given per-variable, per-label memberships
    pub fn strength(&self, memberships: &[Vec<f64>]) -> f64 {
        match self {
            Antecedent::Term { variable, label } => memberships[*variable][*label],
            Antecedent::And(parts) => parts
                .iter()
                .map(|p| p.strength(memberships))
                .fold(1.0, f64::min),
            Antecedent::Or(parts) => parts
                .iter()
                .map(|p| p.strength(memberships))
                .fold(0.0, f64::max),
        }
    }
}

/// A compiled rule: antecedent and consequent output label index
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: Antecedent,
    pub consequent: usize,
}
