use serde::{Serialize, Deserialize};

/// Output convention of a network.
///
/// `Classification` uses independent sigmoid output units scored with binary
/// cross-entropy, so each unit is a separate "is this class" probability and
/// rows are not normalised to sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    #[default]
    Classification,
}
