pub mod sigmoid;

pub use sigmoid::{sigmoid, sigmoid_gradient};
