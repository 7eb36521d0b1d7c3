use ferrite_classifier::{convert_labels, Matrix, Network, TrainConfig};

fn main() -> ferrite_classifier::Result<()> {
    pretty_env_logger::init();

    // Two blobs: bottom-left is class 0, top-right is class 1.
    let inputs = Matrix::from_data(vec![
        vec![0.10, 0.15],
        vec![0.20, 0.05],
        vec![0.15, 0.25],
        vec![0.05, 0.10],
        vec![0.85, 0.90],
        vec![0.80, 0.75],
        vec![0.95, 0.85],
        vec![0.90, 0.95],
    ])?;
    let labels = [0u8, 0, 0, 0, 1, 1, 1, 1];
    let targets = convert_labels(&labels)?;

    let mut network = Network::new(2, &[3], 2)?;
    network.set_alpha(1.0);

    let report = network.train_with_config(&inputs, &targets, &TrainConfig::new(5000).with_log_every(500))?;
    println!("final cost = {:.6}", report.final_cost);

    let scores = network.predict(&inputs)?;
    for (row, label) in scores.data.iter().zip(labels.iter()) {
        println!("label {} -> scores {:.4?}", label, row);
    }
    println!("accuracy = {:.1}%", network.accuracy(&inputs, &labels)?);
    Ok(())
}
