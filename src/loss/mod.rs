pub mod bce;
pub mod l2;

pub use bce::BceLoss;
pub use l2::L2Penalty;
