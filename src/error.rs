//! Error types
//!
//! [`ConfigError`] covers everything detected before the tick loop starts.
//! Per-tick simulation problems never surface as errors; they degrade to a
//! safe behavior instead. The only runtime failure is the frame sink.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("membership `{variable}.{label}` has invalid points ({a}, {b}, {c}); need a <= b <= c and a < c")]
    InvalidMembership {
        variable: String,
        label: String,
        a: f64,
        b: f64,
        c: f64,
    },
    #[error("membership `{variable}.{label}` support [{a}, {c}] leaves the domain [{min}, {max}]")]
    MembershipOutsideDomain {
        variable: String,
        label: String,
        a: f64,
        c: f64,
        min: f64,
        max: f64,
    },
    #[error("variable `{variable}` has an empty or non-finite domain [{min}, {max}]")]
    InvalidDomain { variable: String, min: f64, max: f64 },
    #[error("variable `{variable}` defines label `{label}` twice")]
    DuplicateLabel { variable: String, label: String },
    #[error("variable `{variable}` has no labels")]
    NoLabels { variable: String },
    #[error("rule {rule} references unknown variable `{variable}`")]
    UnknownVariable { rule: usize, variable: String },
    #[error("rule {rule} references unknown label `{variable}.{label}`")]
    UnknownLabel {
        rule: usize,
        variable: String,
        label: String,
    },
    #[error("rule {rule} has an empty antecedent")]
    EmptyAntecedent { rule: usize },
    #[error("rule base is empty")]
    NoRules,
    #[error("setting `{field}` must be positive and finite (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("setting `{field}` must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("pipe gap {gap} does not fit the spawn band of height {band}")]
    GapTooLarge { gap: f32, band: f32 },
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure while driving the loop
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to present frame: {0}")]
    Sink(#[from] std::io::Error),
}
