use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::network::init::Initializer;
use crate::network::network::{Network, DEFAULT_ALPHA};

/// A serializable description of an architecture plus its training
/// hyperparameters.
///
/// `NetworkSpec` can be saved to / loaded from JSON independently of any
/// trained weights, so a run can be described up front and rebuilt later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Number of input features (pixels per image).
    pub input_size: usize,
    /// Hidden layer sizes, input side first.
    pub hidden: Vec<usize>,
    /// Number of output classes.
    pub output_size: usize,
    #[serde(default)]
    pub initializer: Initializer,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub lambda: f64,
    /// Apply L2 weight decay with `lambda`. Off unless asked for.
    #[serde(default)]
    pub regularize: bool,
    /// Seed for weight initialisation; `None` draws from the thread RNG.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

impl NetworkSpec {
    pub fn new(input_size: usize, hidden: Vec<usize>, output_size: usize) -> NetworkSpec {
        NetworkSpec {
            input_size,
            hidden,
            output_size,
            initializer: Initializer::default(),
            alpha: DEFAULT_ALPHA,
            lambda: 0.0,
            regularize: false,
            seed: None,
        }
    }

    /// Creates a freshly initialised network with these hyperparameters.
    pub fn build(&self) -> Result<Network> {
        let mut network = match self.seed {
            Some(seed) => Network::with_rng(
                self.input_size, &self.hidden, self.output_size, self.initializer,
                &mut StdRng::seed_from_u64(seed),
            )?,
            None => Network::with_rng(
                self.input_size, &self.hidden, self.output_size, self.initializer,
                &mut rand::thread_rng(),
            )?,
        };
        network.set_alpha(self.alpha);
        network.set_lambda(self.lambda);
        network.set_regularization(self.regularize);
        Ok(network)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_fills_defaults() {
        let spec: NetworkSpec = serde_json::from_str(
            r#"{ "input_size": 784, "hidden": [25], "output_size": 10 }"#,
        ).unwrap();
        assert_eq!(spec, NetworkSpec::new(784, vec![25], 10));
    }

    #[test]
    fn build_applies_hyperparameters() {
        let mut spec = NetworkSpec::new(4, vec![3], 2);
        spec.alpha = 0.3;
        spec.lambda = 1.5;
        spec.regularize = true;
        spec.seed = Some(42);

        let net = spec.build().unwrap();
        assert_eq!(net.sizes(), &[4, 3, 2]);
        assert_eq!(net.alpha(), 0.3);
        assert_eq!(net.lambda(), 1.5);
        assert!(net.regularization());
        assert_eq!(net.theta(), spec.build().unwrap().theta());
    }

    #[test]
    fn json_file_round_trip() {
        let path = std::env::temp_dir().join("ferrite_classifier_spec_round_trip.json");
        let mut spec = NetworkSpec::new(784, vec![64, 32], 10);
        spec.initializer = Initializer::StandardNormal;
        spec.seed = Some(7);
        spec.save_json(&path).unwrap();
        assert_eq!(NetworkSpec::load_json(&path).unwrap(), spec);
        let _ = std::fs::remove_file(&path);
    }
}
