pub mod idx;
pub mod labels;

pub use idx::{load_dataset, Dataset};
pub use labels::{convert_labels, convert_labels_with_classes};
