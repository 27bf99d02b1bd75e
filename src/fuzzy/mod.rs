//! Fuzzy decision engine
//!
//! Mamdani-style inference over triangular sets:
//! - Fuzzify crisp inputs (clipped to each variable's domain)
//! - Fire rules with min (AND) / max (OR)
//! - Clip each output label by its strongest rule, union by max
//! - Defuzzify by centroid over the sampled output domain
//!
//! Configuration is static data validated once; inference is a pure function
//! of its inputs.

pub mod controller;
pub mod engine;
pub mod membership;
pub mod rule;
pub mod variable;

pub use controller::{BirdController, FLAP_THRESHOLD, Sensors};
pub use engine::{Degenerate, FuzzyEngine, Inference};
pub use membership::Triangle;
pub use rule::{Antecedent, Expr, Rule, RuleSpec};
pub use variable::{LinguisticVariable, TermSpec, VariableSpec};
