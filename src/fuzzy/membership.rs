//! Triangular membership functions

use serde::{Deserialize, Serialize};

/// Piecewise-linear triangle over `[a, c]` peaking at `b`
///
/// `a == b` or `b == c` gives a shoulder: the coincident point has full
/// membership and the curve only slopes on the other side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Triangle {
    /// Returns `None` unless the points are finite, ordered and span a non-zero width
    pub fn new(a: f64, b: f64, c: f64) -> Option<Self> {
        let finite = a.is_finite() && b.is_finite() && c.is_finite();
        if finite && a <= b && b <= c && a < c {
            Some(Self { a, b, c })
        } else {
            None
        }
    }

    /// Degree of membership in [0, 1]; zero outside the support
    pub fn membership(&self, x: f64) -> f64 {
        let Self { a, b, c } = *self;
        if x == b {
            1.0
        } else if x > a && x < b {
            (x - a) / (b - a)
        } else if x > b && x < c {
            (c - x) / (c - b)
        } else {
            // Outside the support, or NaN
            0.0
        }
    }

    /// Support interval `(a, c)`
    #[inline]
    pub fn support(&self) -> (f64, f64) {
        (self.a, self.c)
    }
}
