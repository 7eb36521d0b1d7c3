use std::time::Instant;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::iteration_stats::{IterationStats, TrainReport};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Runs exactly `config.iterations` full-batch gradient-descent updates on
/// `network` and returns the cost history.
///
/// # Arguments
/// - `network` — modified in place; nothing else may hold its weights meanwhile
/// - `inputs`  — one row per example, `network.input_size()` columns
/// - `targets` — one-hot rows, `network.output_size()` columns
/// - `config`  — iteration count, log cadence, optional progress channel
///
/// # Errors
/// - `InvalidConfig` if alpha is not a positive finite number, or lambda is
///   negative / non-finite while regularization is enabled
/// - any shape or empty-input error from `Network::cost`
/// - `NonFiniteCost` as soon as the cost turns NaN or infinite; the weights
///   are left as they were before that iteration's update
pub fn train_loop(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Matrix,
    config: &TrainConfig,
) -> Result<TrainReport> {
    check_hyperparameters(network)?;

    let optimizer = Sgd::new(network.alpha());
    let mut costs = Vec::with_capacity(config.iterations);

    for iteration in 0..config.iterations {
        let t_start = Instant::now();

        let (cost, grads) = network.cost(inputs, targets)?;
        ensure_finite(iteration, cost)?;

        optimizer.step(network.theta_mut(), &grads)?;
        costs.push(cost);

        if config.log_every > 0 && iteration % config.log_every == 0 {
            info!("iter {} cost {:.6}", iteration, cost);
        }

        if let Some(ref tx) = config.progress_tx {
            let stats = IterationStats {
                iteration,
                total_iterations: config.iterations,
                cost,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            // A dropped receiver only loses the monitoring signal.
            let _ = tx.send(stats);
        }
    }

    let (final_cost, _) = network.cost(inputs, targets)?;
    ensure_finite(config.iterations, final_cost)?;
    info!("iter {} cost {:.6}", config.iterations, final_cost);

    Ok(TrainReport {
        iterations: config.iterations,
        costs,
        final_cost,
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn check_hyperparameters(network: &Network) -> Result<()> {
    let alpha = network.alpha();
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "learning rate must be a positive finite number, got {}", alpha
        )));
    }
    let lambda = network.lambda();
    if network.regularization() && (!lambda.is_finite() || lambda < 0.0) {
        return Err(Error::InvalidConfig(format!(
            "lambda must be a non-negative finite number, got {}", lambda
        )));
    }
    Ok(())
}

fn ensure_finite(iteration: usize, cost: f64) -> Result<()> {
    if cost.is_finite() {
        Ok(())
    } else {
        warn!("cost diverged to {} at iteration {}", cost, iteration);
        Err(Error::NonFiniteCost { iteration, cost })
    }
}
