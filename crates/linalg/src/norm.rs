//! Overflow-safe sums of squares and norms.

use ndarray::ArrayView1;

/// Sum of squares held as `scale² · sumsq` to avoid overflow and underflow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SumOfSquares {
    /// Running scale (largest absolute value seen).
    pub scale: f64,
    /// Sum of squares of the scaled values.
    pub sumsq: f64,
}

impl SumOfSquares {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self {
            scale: 0.0,
            sumsq: 1.0,
        }
    }

    /// Adds one value.
    #[inline]
    pub fn add(&mut self, v: f64) {
        if v == 0.0 {
            return;
        }
        let a = v.abs();
        if self.scale < a {
            let r = self.scale / a;
            self.sumsq = 1.0 + self.sumsq * r * r;
            self.scale = a;
        } else {
            let r = a / self.scale;
            self.sumsq += r * r;
        }
    }

    /// The sum of squares `scale² · sumsq`.
    pub fn value(&self) -> f64 {
        self.scale * self.scale * self.sumsq
    }

    /// `ln(scale² · sumsq)`, finite even when the sum itself overflows.
    ///
    /// `-inf` for an all-zero input.
    pub fn ln_value(&self) -> f64 {
        2.0 * self.scale.ln() + self.sumsq.ln()
    }

    /// The Euclidean norm `scale · sqrt(sumsq)`.
    pub fn norm(&self) -> f64 {
        self.scale * self.sumsq.sqrt()
    }
}

impl Default for SumOfSquares {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum of squares of `x` with scale tracking.
pub fn sum_of_squares(x: ArrayView1<'_, f64>) -> SumOfSquares {
    let mut acc = SumOfSquares::new();
    for &v in x.iter() {
        acc.add(v);
    }
    acc
}

/// Euclidean norm of `x`, safe against overflow.
pub fn norm2(x: ArrayView1<'_, f64>) -> f64 {
    sum_of_squares(x).norm()
}
