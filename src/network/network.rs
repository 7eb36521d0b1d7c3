use std::path::Path;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::activation::sigmoid::{sigmoid_matrix, sigmoid_gradient_matrix};
use crate::error::{Error, Result};
use crate::loss::{BceLoss, L2Penalty};
use crate::math::matrix::Matrix;
use crate::metrics::accuracy_percent;
use crate::network::init::{init_layers, Initializer};
use crate::network::kind::NetworkKind;
use crate::train::{train_loop, TrainConfig, TrainReport};

/// Learning rate used until `set_alpha` is called.
pub const DEFAULT_ALPHA: f64 = 0.001;

/// Fully-connected sigmoid network.
///
/// `theta[l]` maps layer `l` to layer `l + 1` and is shaped
/// `(sizes[l + 1], sizes[l] + 1)`; column 0 holds the bias weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    kind: NetworkKind,
    sizes: Vec<usize>,
    theta: Vec<Matrix>,
    alpha: f64,
    lambda: f64,
    #[serde(default)]
    regularize: bool,
}

/// Everything the forward pass produces that backprop needs.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    /// `inputs[l]` is the bias-augmented input to transition `l`.
    pub inputs: Vec<Matrix>,
    /// `pre_activations[l]` is `z_l = inputs[l] · theta[l]ᵀ`.
    pub pre_activations: Vec<Matrix>,
    /// Final sigmoid activation, one row per example.
    pub output: Matrix,
}

impl Network {
    /// Builds a classification network with uniformly initialised weights
    /// drawn from the thread-local RNG.
    pub fn new(input_size: usize, hidden: &[usize], output_size: usize) -> Result<Network> {
        Network::with_rng(input_size, hidden, output_size, Initializer::default(), &mut rand::thread_rng())
    }

    /// Same as `new`, but reproducible.
    pub fn with_seed(input_size: usize, hidden: &[usize], output_size: usize, seed: u64) -> Result<Network> {
        let mut rng = StdRng::seed_from_u64(seed);
        Network::with_rng(input_size, hidden, output_size, Initializer::default(), &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        hidden: &[usize],
        output_size: usize,
        init: Initializer,
        rng: &mut R,
    ) -> Result<Network> {
        let mut sizes = Vec::with_capacity(hidden.len() + 2);
        sizes.push(input_size);
        sizes.extend_from_slice(hidden);
        sizes.push(output_size);

        if let Some(pos) = sizes.iter().position(|&s| s == 0) {
            return Err(Error::InvalidArchitecture(format!(
                "layer {} of {:?} has zero units", pos, sizes
            )));
        }

        let theta = init_layers(&sizes, init, rng);
        debug!("initialised network {:?} with {:?}", sizes, init);

        Ok(Network {
            kind: NetworkKind::Classification,
            sizes,
            theta,
            alpha: DEFAULT_ALPHA,
            lambda: 0.0,
            regularize: false,
        })
    }

    /// Wraps explicit weight matrices. Layer sizes are inferred from the
    /// shapes, which must chain: `theta[l + 1].cols == theta[l].rows + 1`.
    pub fn from_theta(theta: Vec<Matrix>) -> Result<Network> {
        for t in &theta {
            t.check_consistent("from_theta")?;
        }
        let sizes = sizes_from_theta(&theta)?;
        Ok(Network {
            kind: NetworkKind::Classification,
            sizes,
            theta,
            alpha: DEFAULT_ALPHA,
            lambda: 0.0,
            regularize: false,
        })
    }

    pub fn kind(&self) -> NetworkKind {
        self.kind
    }

    /// `[in, hidden_1, …, hidden_k, out]`
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    pub fn theta(&self) -> &[Matrix] {
        &self.theta
    }

    pub(crate) fn theta_mut(&mut self) -> &mut [Matrix] {
        &mut self.theta
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Sets the weight-decay coefficient. It only affects cost and gradient
    /// once `set_regularization(true)` has been called.
    pub fn set_lambda(&mut self, lambda: f64) {
        self.lambda = lambda;
    }

    pub fn regularization(&self) -> bool {
        self.regularize
    }

    pub fn set_regularization(&mut self, enabled: bool) {
        self.regularize = enabled;
    }

    /// Runs the input through every layer, keeping the augmented inputs and
    /// pre-activations for backprop.
    pub fn forward(&self, x: &Matrix) -> Result<ForwardPass> {
        self.check_input(x)?;

        let mut inputs = Vec::with_capacity(self.theta.len());
        let mut pre_activations = Vec::with_capacity(self.theta.len());
        let mut activation = x.clone();

        for theta in &self.theta {
            let input = activation.prepend_ones_column();
            let z = input.dot_transposed(theta)?;
            activation = sigmoid_matrix(&z);
            inputs.push(input);
            pre_activations.push(z);
        }

        Ok(ForwardPass { inputs, pre_activations, output: activation })
    }

    /// Cost of the current weights on `(x, y)` and its gradient with respect
    /// to every theta, same order and shapes as `theta()`.
    pub fn cost(&self, x: &Matrix, y: &Matrix) -> Result<(f64, Vec<Matrix>)> {
        let pass = self.forward(x)?;
        let h = &pass.output;
        if y.shape() != h.shape() {
            return Err(Error::shape(
                "cost",
                format!("{}x{} targets", h.rows, h.cols),
                format!("{}x{}", y.rows, y.cols),
            ));
        }

        let m = x.rows;
        let inv_m = 1.0 / m as f64;

        let (mut cost, mut delta) = match self.kind {
            NetworkKind::Classification => (BceLoss::loss(h, y)?, BceLoss::delta(h, y)?),
        };

        let last = self.theta.len();
        let mut grads: Vec<Matrix> = vec![Matrix::default(); last];

        // Strict reverse order: delta for layer l only needs delta for l + 1.
        for l in (0..last).rev() {
            grads[l] = delta.transposed_dot(&pass.inputs[l])?.scale(inv_m);
            if l > 0 {
                let back = delta.dot(&self.theta[l])?.drop_first_column()?;
                delta = back.hadamard(&sigmoid_gradient_matrix(&pass.pre_activations[l - 1]))?;
            }
        }

        if self.regularize {
            let l2 = L2Penalty::new(self.lambda);
            cost += l2.cost(&self.theta, m);
            for (theta, grad) in self.theta.iter().zip(grads.iter_mut()) {
                l2.add_gradient(theta, grad, m)?;
            }
        }

        Ok((cost, grads))
    }

    /// Trains for exactly `iterations` full-batch updates.
    pub fn train(&mut self, x: &Matrix, y: &Matrix, iterations: usize) -> Result<TrainReport> {
        train_loop(self, x, y, &TrainConfig::new(iterations))
    }

    pub fn train_with_config(&mut self, x: &Matrix, y: &Matrix, config: &TrainConfig) -> Result<TrainReport> {
        train_loop(self, x, y, config)
    }

    /// Per-example class scores (one independent sigmoid per class).
    pub fn predict(&self, x: &Matrix) -> Result<Matrix> {
        Ok(self.forward(x)?.output)
    }

    /// Percentage of rows whose highest-scoring class equals the label.
    pub fn accuracy(&self, x: &Matrix, labels: &[u8]) -> Result<f64> {
        let scores = self.predict(x)?;
        accuracy_percent(&scores, labels)
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Loads a network written by `save_json`, re-checking that every theta's
    /// data matches its declared shape and that the shapes chain.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)?;

        for theta in &network.theta {
            theta.check_consistent("load_json")?;
        }

        let sizes = sizes_from_theta(&network.theta)?;
        if sizes != network.sizes {
            return Err(Error::shape("load_json", format!("{:?}", network.sizes), format!("{:?}", sizes)));
        }
        Ok(network)
    }

    fn check_input(&self, x: &Matrix) -> Result<()> {
        if x.rows == 0 {
            return Err(Error::EmptyInput("input matrix has no examples"));
        }
        if x.cols != self.input_size() {
            return Err(Error::shape(
                "forward",
                format!("{} input features", self.input_size()),
                format!("{} features", x.cols),
            ));
        }
        Ok(())
    }
}

fn sizes_from_theta(theta: &[Matrix]) -> Result<Vec<usize>> {
    let first = theta.first().ok_or_else(|| {
        Error::InvalidArchitecture("network needs at least one layer transition".to_owned())
    })?;
    if first.cols < 2 {
        return Err(Error::InvalidArchitecture(format!(
            "first theta must have a bias column plus at least one input, got {} columns", first.cols
        )));
    }

    let mut sizes = vec![first.cols - 1];
    for (l, t) in theta.iter().enumerate() {
        let previous = sizes[l];
        if t.cols != previous + 1 {
            return Err(Error::shape(
                "theta",
                format!("{} columns in theta[{}]", previous + 1, l),
                format!("{}", t.cols),
            ));
        }
        if t.rows == 0 {
            return Err(Error::InvalidArchitecture(format!("theta[{}] has zero rows", l)));
        }
        sizes.push(t.rows);
    }
    Ok(sizes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theta_shapes_include_bias_column() {
        let net = Network::with_seed(4, &[3, 5], 2, 0).unwrap();
        assert_eq!(net.sizes(), &[4, 3, 5, 2]);
        let shapes: Vec<_> = net.theta().iter().map(|t| t.shape()).collect();
        assert_eq!(shapes, vec![(3, 5), (5, 4), (2, 6)]);
    }

    #[test]
    fn zero_sized_layer_is_rejected() {
        assert!(matches!(Network::new(4, &[0], 2), Err(Error::InvalidArchitecture(_))));
        assert!(matches!(Network::new(0, &[], 2), Err(Error::InvalidArchitecture(_))));
    }

    #[test]
    fn forward_keeps_intermediates() {
        let net = Network::with_seed(3, &[4], 2, 11).unwrap();
        let x = Matrix::from_data(vec![vec![0.0, 0.5, 1.0]; 5]).unwrap();
        let pass = net.forward(&x).unwrap();
        assert_eq!(pass.inputs[0].shape(), (5, 4));
        assert_eq!(pass.inputs[1].shape(), (5, 5));
        assert_eq!(pass.pre_activations[0].shape(), (5, 4));
        assert_eq!(pass.output.shape(), (5, 2));
        assert!(pass.inputs.iter().all(|m| m.data.iter().all(|row| row[0] == 1.0)));
    }

    #[test]
    fn zero_weights_predict_half() {
        let net = Network::from_theta(vec![Matrix::zeros(2, 3)]).unwrap();
        let out = net.predict(&Matrix::from_data(vec![vec![0.3, 0.7]]).unwrap()).unwrap();
        assert_eq!(out.data, vec![vec![0.5, 0.5]]);
    }

    #[test]
    fn wrong_feature_count_is_a_shape_error() {
        let net = Network::with_seed(3, &[2], 2, 0).unwrap();
        let x = Matrix::zeros(4, 2);
        assert!(matches!(net.predict(&x), Err(Error::ShapeMismatch { op: "forward", .. })));
    }

    #[test]
    fn empty_input_is_rejected() {
        let net = Network::with_seed(3, &[2], 2, 0).unwrap();
        assert!(matches!(net.predict(&Matrix::zeros(0, 3)), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn target_shape_is_checked() {
        let net = Network::with_seed(2, &[2], 3, 0).unwrap();
        let x = Matrix::zeros(4, 2);
        let y = Matrix::zeros(4, 2);
        assert!(matches!(net.cost(&x, &y), Err(Error::ShapeMismatch { op: "cost", .. })));
    }

    #[test]
    fn from_theta_rejects_broken_chain() {
        let theta = vec![Matrix::zeros(3, 3), Matrix::zeros(1, 3)];
        assert!(matches!(Network::from_theta(theta), Err(Error::ShapeMismatch { .. })));
        assert!(Network::from_theta(vec![]).is_err());
    }

    #[test]
    fn from_theta_rejects_data_that_disagrees_with_shape() {
        let ragged = Matrix { rows: 1, cols: 3, data: vec![vec![0.1, 0.2]] };
        let err = Network::from_theta(vec![ragged]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { op: "from_theta", .. }));
    }

    #[test]
    fn regularization_raises_cost_only_when_enabled() {
        let mut net = Network::with_seed(2, &[3], 2, 5).unwrap();
        let x = Matrix::from_data(vec![vec![0.1, 0.9], vec![0.8, 0.2]]).unwrap();
        let y = Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();

        net.set_lambda(10.0);
        let (plain, _) = net.cost(&x, &y).unwrap();
        net.set_regularization(true);
        let (penalised, _) = net.cost(&x, &y).unwrap();
        assert!(penalised > plain);
    }
}
