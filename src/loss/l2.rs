use crate::error::Result;
use crate::math::matrix::Matrix;

/// Optional L2 weight decay. The bias column (column 0 of every theta) is
/// never penalised.
pub struct L2Penalty {
    pub lambda: f64,
}

impl L2Penalty {
    pub fn new(lambda: f64) -> L2Penalty {
        L2Penalty { lambda }
    }

    /// `(λ / 2m)·Σ θ²` over all non-bias weights.
    pub fn cost(&self, theta: &[Matrix], m: usize) -> f64 {
        let squares: f64 = theta.iter()
            .flat_map(|t| t.data.iter())
            .flat_map(|row| row.iter().skip(1))
            .map(|w| w * w)
            .sum();
        self.lambda / (2.0 * m as f64) * squares
    }

    /// Adds `(λ / m)·θ` (bias column zeroed) to `grad` in place.
    pub fn add_gradient(&self, theta: &Matrix, grad: &mut Matrix, m: usize) -> Result<()> {
        let mut penalty = theta.scale(self.lambda / m as f64);
        for row in penalty.data.iter_mut() {
            if let Some(bias) = row.first_mut() {
                *bias = 0.0;
            }
        }
        // grad += penalty
        grad.sub_scaled_assign(&penalty, -1.0)
    }
}
