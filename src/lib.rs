pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod metrics;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use network::{Initializer, Network, NetworkKind, NetworkSpec};
pub use data::{convert_labels, convert_labels_with_classes, Dataset};
pub use metrics::accuracy_percent;
pub use optim::sgd::Sgd;
pub use train::{train_loop, IterationStats, TrainConfig, TrainReport};
