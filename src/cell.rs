// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-cell computation.  A `CellFunction` is called once per
//! coordinate, from whichever thread the strategy puts it on, so it
//! must be pure and shareable.

use num::Complex;

use grid::{Coordinate, GridDimensions, Intensity};

/// Maps one coordinate of a grid to its intensity.  Implementations
/// must be deterministic: every strategy has to produce the same
/// image as the sequential one.
pub trait CellFunction: Sync {
    /// The intensity of the cell at `coordinate`.
    fn intensity(&self, coordinate: Coordinate, dimensions: GridDimensions) -> Intensity;
}

impl<F> CellFunction for F
where
    F: Fn(Coordinate, GridDimensions) -> Intensity + Sync,
{
    fn intensity(&self, coordinate: Coordinate, dimensions: GridDimensions) -> Intensity {
        self(coordinate, dimensions)
    }
}

/// Linearly maps `x` in `0..total` onto the real line.  The
/// placement of `min` and `max` reproduces the classic framing, with
/// x running over [-2, 1) and y over [-1, 1).
#[inline]
pub fn normalize(x: usize, total: usize, min: f64, max: f64) -> f64 {
    (max - min) * (x as f64) / (total as f64) - max
}

/// The escape-time fractal.  The grid is mapped onto the complex
/// plane and each point is iterated as `z = z * z + c` until its
/// squared magnitude reaches `complexity` or `max_iterations` steps
/// have been taken.  The real part of wherever `z` ended up is the
/// cell's gray level.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeTime {
    /// The squared-magnitude bound.  Raising it increases the detail.
    pub complexity: f64,
    /// The iteration cap per cell.
    pub max_iterations: usize,
}

impl EscapeTime {
    /// Default complexity.
    pub const COMPLEXITY: f64 = 1024.0;
    /// Default iteration cap.
    pub const MAX_ITERATIONS: usize = 1000;

    /// Builds the function with explicit bounds.
    pub fn new(complexity: f64, max_iterations: usize) -> EscapeTime {
        EscapeTime {
            complexity,
            max_iterations,
        }
    }

    /// The point on the complex plane that a cell samples.
    pub fn point(&self, coordinate: Coordinate, dimensions: GridDimensions) -> Complex<f64> {
        Complex::new(
            normalize(coordinate.0, dimensions.width(), -1.0, 2.0),
            normalize(coordinate.1, dimensions.height(), -1.0, 1.0),
        )
    }
}

impl Default for EscapeTime {
    fn default() -> EscapeTime {
        EscapeTime::new(EscapeTime::COMPLEXITY, EscapeTime::MAX_ITERATIONS)
    }
}

impl CellFunction for EscapeTime {
    fn intensity(&self, coordinate: Coordinate, dimensions: GridDimensions) -> Intensity {
        let c = self.point(coordinate, dimensions);
        let mut z: Complex<f64> = Complex::new(0.0, 0.0);
        for _ in 0..self.max_iterations {
            if z.norm_sqr() >= self.complexity {
                break;
            }
            z = z * z + c;
        }
        // Float to int casts saturate, and NaN lands on zero.
        z.re as Intensity
    }
}
