use std::sync::mpsc;

use crate::train::iteration_stats::IterationStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `iterations`  — number of full-batch updates; there is no convergence test
/// - `log_every`   — log the cost every this many iterations (`0` disables
///                   per-iteration logging; the final cost is always logged)
/// - `progress_tx` — optional channel; one `IterationStats` is sent per
///                   iteration. A dropped receiver is ignored.
pub struct TrainConfig {
    pub iterations: usize,
    pub log_every: usize,
    pub progress_tx: Option<mpsc::Sender<IterationStats>>,
}

impl TrainConfig {
    /// Logs every iteration, no progress channel.
    pub fn new(iterations: usize) -> Self {
        TrainConfig {
            iterations,
            log_every: 1,
            progress_tx: None,
        }
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<IterationStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }
}
