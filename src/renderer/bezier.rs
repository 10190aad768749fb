//! Cubic bezier evaluation and the inverse lookup used to place glyphs on
//! slide ribbons.

use crate::error::{ChartError, Result};

/// Solver tolerance in SVG units.
const SOLVE_TOLERANCE: f64 = 0.1;
/// Bisection steps before giving up; 2^-64 of the parameter range is far
/// below any pixel.
const SOLVE_MAX_STEPS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A cubic curve: from `p0`, controlled by `p1` and `p2`, to `p3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBezier {
    pub fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point::new(
            self.p0.x * a + self.p1.x * b + self.p2.x * c + self.p3.x * d,
            self.p0.y * a + self.p1.y * b + self.p2.y * c + self.p3.y * d,
        )
    }

    /// Horizontal coordinate of the curve at vertical level `y`.
    ///
    /// Bisects on `t`, assuming `y` is monotonic along the curve. Ribbon rails
    /// always are, so a failure here means the ribbon was built wrong.
    pub fn solve_x(&self, y: f64) -> Result<f64> {
        let descending = self.p3.y <= self.p0.y;
        let (lo_y, hi_y) = if descending { (self.p3.y, self.p0.y) } else { (self.p0.y, self.p3.y) };
        if y < lo_y - SOLVE_TOLERANCE || y > hi_y + SOLVE_TOLERANCE || y.is_nan() {
            return Err(ChartError::CurveNotMonotonic { y });
        }

        let (mut start, mut stop) = (0.0f64, 1.0f64);
        for _ in 0..SOLVE_MAX_STEPS {
            let t = (start + stop) / 2.0;
            let p = self.eval(t);
            if (p.y - y).abs() < SOLVE_TOLERANCE {
                return Ok(p.x);
            }
            // Move towards y: along a descending curve y shrinks as t grows.
            if (p.y > y) == descending {
                start = t;
            } else {
                stop = t;
            }
        }

        Err(ChartError::CurveNotMonotonic { y })
    }
}
