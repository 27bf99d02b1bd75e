//! The bird controller: four sensors in, flap/don't-flap out
//!
//! Variables and rules are plain tables; [`BirdController::configure`]
//! validates them once.

use serde::{Deserialize, Serialize};

use super::engine::{FuzzyEngine, Inference};
use super::rule::{Expr, RuleSpec};
use super::variable::{TermSpec, VariableSpec};
use crate::error::ConfigError;

pub const BIRD_Y: VariableSpec = VariableSpec {
    name: "bird_y",
    domain: (0.0, 512.0),
    terms: &[
        TermSpec {
            label: "high",
            points: (0.0, 0.0, 200.0),
        },
        TermSpec {
            label: "medium",
            points: (150.0, 256.0, 362.0),
        },
        TermSpec {
            label: "low",
            points: (300.0, 512.0, 512.0),
        },
    ],
};

pub const BIRD_VEL_Y: VariableSpec = VariableSpec {
    name: "bird_vel_y",
    domain: (-15.0, 15.0),
    terms: &[
        TermSpec {
            label: "rising_fast",
            points: (-15.0, -15.0, -5.0),
        },
        TermSpec {
            label: "rising_slowly",
            points: (-10.0, -5.0, 0.0),
        },
        TermSpec {
            label: "stable",
            points: (-2.0, 0.0, 2.0),
        },
        TermSpec {
            label: "falling_slowly",
            points: (0.0, 5.0, 10.0),
        },
        TermSpec {
            label: "falling_fast",
            points: (5.0, 15.0, 15.0),
        },
    ],
};

pub const DISTANCE_TO_PIPE: VariableSpec = VariableSpec {
    name: "distance_to_pipe",
    domain: (0.0, 500.0),
    terms: &[
        TermSpec {
            label: "close",
            points: (0.0, 0.0, 150.0),
        },
        TermSpec {
            label: "medium",
            points: (100.0, 250.0, 400.0),
        },
        TermSpec {
            label: "far",
            points: (350.0, 500.0, 500.0),
        },
    ],
};

/// Gap centre minus bird y; positive means the gap is below the bird
pub const HEIGHT_DIFFERENCE: VariableSpec = VariableSpec {
    name: "height_difference",
    domain: (-512.0, 512.0),
    terms: &[
        TermSpec {
            label: "much_below",
            points: (-512.0, -512.0, -100.0),
        },
        TermSpec {
            label: "below",
            points: (-150.0, -50.0, 0.0),
        },
        TermSpec {
            label: "level",
            points: (-25.0, 0.0, 25.0),
        },
        TermSpec {
            label: "above",
            points: (0.0, 50.0, 150.0),
        },
        TermSpec {
            label: "much_above",
            points: (100.0, 512.0, 512.0),
        },
    ],
};

pub const ACTION: VariableSpec = VariableSpec {
    name: "action",
    domain: (0.0, 1.0),
    terms: &[
        TermSpec {
            label: DONT_FLAP,
            points: (0.0, 0.0, 0.5),
        },
        TermSpec {
            label: FLAP,
            points: (0.5, 1.0, 1.0),
        },
    ],
};

pub const FLAP: &str = "flap";
pub const DONT_FLAP: &str = "don't_flap";

/// Input variables, in the order [`Sensors::as_array`] yields them
pub const INPUTS: [VariableSpec; 4] = [BIRD_Y, BIRD_VEL_Y, DISTANCE_TO_PIPE, HEIGHT_DIFFERENCE];

pub const RULES: [RuleSpec; 8] = [
    // 1. Low, dropping fast, pipe close: climb
    RuleSpec {
        when: Expr::All(&[
            Expr::Is("bird_y", "low"),
            Expr::Is("bird_vel_y", "falling_fast"),
            Expr::Is("distance_to_pipe", "close"),
        ]),
        then: FLAP,
    },
    // 2. High and still climbing: let it fall
    RuleSpec {
        when: Expr::All(&[
            Expr::Is("bird_y", "high"),
            Expr::Is("bird_vel_y", "rising_fast"),
        ]),
        then: DONT_FLAP,
    },
    // 3. Nothing to line up with yet
    RuleSpec {
        when: Expr::Is("distance_to_pipe", "far"),
        then: DONT_FLAP,
    },
    // 4. Mid-height, sinking, approaching
    RuleSpec {
        when: Expr::All(&[
            Expr::Is("bird_y", "medium"),
            Expr::Is("bird_vel_y", "falling_slowly"),
            Expr::Is("distance_to_pipe", "medium"),
        ]),
        then: FLAP,
    },
    // 5. Holding altitude: no need to flap
    RuleSpec {
        when: Expr::Is("bird_vel_y", "stable"),
        then: DONT_FLAP,
    },
    // 6. Gap is above the bird
    RuleSpec {
        when: Expr::Any(&[
            Expr::Is("height_difference", "much_below"),
            Expr::Is("height_difference", "below"),
        ]),
        then: FLAP,
    },
    // 7. Gap is below the bird
    RuleSpec {
        when: Expr::Any(&[
            Expr::Is("height_difference", "much_above"),
            Expr::Is("height_difference", "above"),
        ]),
        then: DONT_FLAP,
    },
    // 8. Lined up and steady
    RuleSpec {
        when: Expr::All(&[
            Expr::Is("height_difference", "level"),
            Expr::Is("bird_vel_y", "stable"),
        ]),
        then: DONT_FLAP,
    },
];

/// Sampling step over the `action` domain
pub const ACTION_RESOLUTION: f64 = 0.01;
/// Centroids strictly above this mean flap
pub const FLAP_THRESHOLD: f64 = 0.5;

/// Crisp measurements fed to the controller each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensors {
    pub bird_y: f64,
    pub bird_vel_y: f64,
    pub distance_to_pipe: f64,
    pub height_difference: f64,
}

impl Sensors {
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.bird_y,
            self.bird_vel_y,
            self.distance_to_pipe,
            self.height_difference,
        ]
    }
}

/// Fuzzy controller deciding whether the bird should flap
#[derive(Debug, Clone)]
pub struct BirdController {
    engine: FuzzyEngine,
}

impl BirdController {
    /// Build and validate the variables and rule base
    pub fn configure() -> Result<Self, ConfigError> {
        let engine = FuzzyEngine::configure(&INPUTS, &ACTION, &RULES, ACTION_RESOLUTION)?;
        Ok(Self { engine })
    }

    pub fn engine(&self) -> &FuzzyEngine {
        &self.engine
    }

    /// Full inference, for diagnostics
    pub fn infer(&self, sensors: &Sensors) -> Inference {
        self.engine.infer(&sensors.as_array())
    }

    /// Flap decision; degenerate inputs fall back to `false`
    pub fn evaluate(
        &self,
        bird_y: f64,
        bird_vel_y: f64,
        distance_to_pipe: f64,
        height_difference: f64,
    ) -> bool {
        let sensors = Sensors {
            bird_y,
            bird_vel_y,
            distance_to_pipe,
            height_difference,
        };
        self.infer(&sensors).exceeds(FLAP_THRESHOLD)
    }
}
