use crate::math::matrix::Matrix;

/// Logistic sigmoid, `1 / (1 + e^-x)`.
///
/// Evaluated in the branch that keeps `exp` bounded so large negative inputs
/// do not overflow.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `σ(x)·(1 − σ(x))`, evaluated at the pre-activation.
pub fn sigmoid_gradient(x: f64) -> f64 {
    let fx = sigmoid(x);
    fx * (1.0 - fx)
}

pub fn sigmoid_matrix(z: &Matrix) -> Matrix {
    z.map(sigmoid)
}

pub fn sigmoid_gradient_matrix(z: &Matrix) -> Matrix {
    z.map(sigmoid_gradient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sigmoid_at_zero_is_exactly_half() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert_eq!(sigmoid_gradient(0.0), 0.25);
    }

    #[test]
    fn sigmoid_stays_in_open_unit_interval() {
        for i in -300..=300 {
            let x = i as f64 / 10.0;
            let s = sigmoid(x);
            assert!(s > 0.0 && s < 1.0, "sigmoid({}) = {}", x, s);
        }
    }

    #[test]
    fn sigmoid_is_symmetric() {
        for &x in &[0.3, 1.7, 5.0, 12.5] {
            assert_relative_eq!(sigmoid(-x), 1.0 - sigmoid(x), epsilon = 1e-12);
        }
    }

    #[test]
    fn large_negative_input_does_not_produce_nan() {
        let s = sigmoid(-1000.0);
        assert!(s.is_finite());
        assert!(s >= 0.0);
    }
}
