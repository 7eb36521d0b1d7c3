use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

pub struct BceLoss;

/// Predictions are clamped to `[EPS, 1 - EPS]` before taking logarithms.
pub const EPS: f64 = 1e-12;

impl BceLoss {
    /// Binary cross-entropy summed over output units and averaged over rows:
    ///   (1/m)·Σ −y·log(h) − (1−y)·log(1−h)
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        if predicted.shape() != expected.shape() {
            return Err(Error::shape(
                "bce_loss",
                format!("{}x{} targets", predicted.rows, predicted.cols),
                format!("{}x{}", expected.rows, expected.cols),
            ));
        }
        if predicted.rows == 0 {
            return Err(Error::EmptyInput("bce_loss needs at least one example"));
        }

        let total: f64 = predicted.data.iter().zip(expected.data.iter())
            .flat_map(|(h_row, y_row)| h_row.iter().zip(y_row.iter()))
            .map(|(&h, &y)| {
                let p = h.clamp(EPS, 1.0 - EPS);
                -y * p.ln() - (1.0 - y) * (1.0 - p).ln()
            })
            .sum();

        Ok(total / predicted.rows as f64)
    }

    /// Output-layer delta for sigmoid units under BCE: `h − y`.
    ///
    /// The sigmoid derivative cancels against the BCE derivative, so no
    /// σ'(z) factor appears here.
    pub fn delta(predicted: &Matrix, expected: &Matrix) -> Result<Matrix> {
        predicted.sub(expected)
    }
}
