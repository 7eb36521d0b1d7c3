use serde::{Serialize, Deserialize};

/// Progress record emitted once per gradient-descent iteration.
///
/// When `TrainConfig::progress_tx` is set, `train_loop` sends one of these
/// after every update. Receivers only observe; training never stops early.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationStats {
    /// 0-based iteration index.
    pub iteration: usize,
    pub total_iterations: usize,
    /// Full-batch cost measured before this iteration's update.
    pub cost: f64,
    /// Wall-clock duration of the cost evaluation and update, in milliseconds.
    pub elapsed_ms: u64,
}

/// Summary returned by a completed training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainReport {
    pub iterations: usize,
    /// `costs[i]` is the cost before update `i`.
    pub costs: Vec<f64>,
    /// Cost after the last update.
    pub final_cost: f64,
}
