pub mod init;
pub mod kind;
pub mod network;
pub mod spec;

pub use init::Initializer;
pub use kind::NetworkKind;
pub use network::{ForwardPass, Network};
pub use spec::NetworkSpec;
