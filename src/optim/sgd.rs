use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Plain gradient descent: `θ ← θ − α·∇θ`, no momentum.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one update to every layer transition in place.
    pub fn step(&self, theta: &mut [Matrix], grads: &[Matrix]) -> Result<()> {
        if theta.len() != grads.len() {
            return Err(Error::shape(
                "sgd_step",
                format!("{} gradients", theta.len()),
                format!("{} gradients", grads.len()),
            ));
        }
        for (t, g) in theta.iter_mut().zip(grads.iter()) {
            t.sub_scaled_assign(g, self.learning_rate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_against_gradient() {
        let mut theta = vec![Matrix::from_data(vec![vec![1.0, 1.0]]).unwrap()];
        let grads = vec![Matrix::from_data(vec![vec![2.0, -4.0]]).unwrap()];
        Sgd::new(0.5).step(&mut theta, &grads).unwrap();
        assert_eq!(theta[0].data[0], vec![0.0, 3.0]);
    }

    #[test]
    fn step_rejects_layer_count_mismatch() {
        let mut theta = vec![Matrix::zeros(1, 2)];
        assert!(Sgd::new(0.1).step(&mut theta, &[]).is_err());
    }
}
