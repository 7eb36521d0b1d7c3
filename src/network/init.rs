use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Half-width of the default uniform initialisation range.
pub const DEFAULT_EPSILON: f64 = 0.12;

/// How the weights of each layer transition are drawn at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Initializer {
    /// Uniform in `[-epsilon, epsilon]`.
    Uniform { epsilon: f64 },
    /// Standard normal, N(0, 1).
    StandardNormal,
}

impl Default for Initializer {
    fn default() -> Self {
        Initializer::Uniform { epsilon: DEFAULT_EPSILON }
    }
}

/// A `rows × cols` weight matrix. `cols` already includes the bias column.
pub fn init_theta<R: Rng + ?Sized>(rows: usize, cols: usize, init: Initializer, rng: &mut R) -> Matrix {
    match init {
        Initializer::Uniform { epsilon } => Matrix::random_uniform(rows, cols, epsilon, rng),
        Initializer::StandardNormal => Matrix::standard_normal(rows, cols, rng),
    }
}

/// One theta per consecutive pair in `sizes`, shaped `(next, previous + 1)`,
/// drawn in input-to-output order.
pub fn init_layers<R: Rng + ?Sized>(sizes: &[usize], init: Initializer, rng: &mut R) -> Vec<Matrix> {
    sizes.windows(2)
        .map(|pair| init_theta(pair[1], pair[0] + 1, init, rng))
        .collect()
}
