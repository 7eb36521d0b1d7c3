use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use ferrite_classifier::data::idx::load_dataset;
use ferrite_classifier::{convert_labels_with_classes, NetworkSpec};

/// Trains a sigmoid network on IDX digit data with full-batch gradient
/// descent and reports held-out accuracy.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Training images (IDX, magic 2051)
    #[arg(long, default_value = "data/train-images-idx3-ubyte")]
    train_images: PathBuf,

    /// Training labels (IDX, magic 2049)
    #[arg(long, default_value = "data/train-labels-idx1-ubyte")]
    train_labels: PathBuf,

    /// Test images (IDX, magic 2051)
    #[arg(long, default_value = "data/t10k-images-idx3-ubyte")]
    test_images: PathBuf,

    /// Test labels (IDX, magic 2049)
    #[arg(long, default_value = "data/t10k-labels-idx1-ubyte")]
    test_labels: PathBuf,

    /// Hidden layer sizes, comma separated
    #[arg(long, value_delimiter = ',', default_value = "25")]
    hidden: Vec<usize>,

    /// Number of output classes, shared by the train and test encodings
    #[arg(long, default_value_t = 10)]
    classes: usize,

    /// Learning rate
    #[arg(long, default_value_t = 0.001)]
    alpha: f64,

    /// Weight-decay coefficient; only used with --regularize
    #[arg(long, default_value_t = 1.0)]
    lambda: f64,

    /// Enable L2 weight decay
    #[arg(long)]
    regularize: bool,

    /// Number of full-batch iterations
    #[arg(long, default_value_t = 50)]
    iterations: usize,

    /// Seed for weight initialisation
    #[arg(long)]
    seed: Option<u64>,

    /// JSON network spec; overrides the architecture and hyperparameter flags
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Write the trained network to this JSON file
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    info!("loading training data");
    let train = load_dataset(&args.train_images, &args.train_labels)
        .with_context(|| format!("loading {}", args.train_images.display()))?;
    info!("loaded {} training examples", train.len());

    info!("loading test data");
    let test = load_dataset(&args.test_images, &args.test_labels)
        .with_context(|| format!("loading {}", args.test_images.display()))?;
    info!("loaded {} test examples", test.len());

    let spec = match args.spec {
        Some(ref path) => NetworkSpec::load_json(path)
            .with_context(|| format!("reading spec {}", path.display()))?,
        None => NetworkSpec {
            alpha: args.alpha,
            lambda: args.lambda,
            regularize: args.regularize,
            seed: args.seed,
            ..NetworkSpec::new(train.features.cols, args.hidden.clone(), args.classes)
        },
    };

    if spec.input_size != train.features.cols {
        bail!(
            "spec expects {} input features but the images have {}",
            spec.input_size, train.features.cols
        );
    }

    // Both encodings use the network's class count so their widths agree.
    let y_train = convert_labels_with_classes(&train.labels, spec.output_size)
        .context("encoding training labels")?;
    convert_labels_with_classes(&test.labels, spec.output_size)
        .context("test labels fall outside the training class range")?;

    let mut network = spec.build()?;
    info!(
        "network {:?}, alpha {}, lambda {} (regularization {})",
        network.sizes(), network.alpha(), network.lambda(),
        if network.regularization() { "on" } else { "off" }
    );

    let report = network.train(&train.features, &y_train, args.iterations)?;
    info!("training finished, final cost {:.6}", report.final_cost);

    let accuracy = network.accuracy(&test.features, &test.labels)?;
    println!("{}", accuracy);

    if let Some(path) = args.save {
        network.save_json(&path)
            .with_context(|| format!("saving network to {}", path.display()))?;
        info!("saved network to {}", path.display());
    }

    Ok(())
}
