//! End-to-end metric-learning run.
//!
//! With no arguments, trains on synthetic two-cluster data and evaluates on
//! held-out points from the same clusters. Alternatively pass four flat
//! numeric tables: training features, training labels, validation features,
//! validation labels (one row per sample, labels in {-1, +1}).
//!
//! ```text
//! cargo run --example metric_learning [X_train Y_train X_val Y_val]
//! ```

use std::env;
use std::error::Error;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use qumetric::machine_learning::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();

    let (train, validation) = match args.len() {
        0 => synthetic_datasets()?,
        4 => (
            MetricDataset::from_files(&args[0], &args[1])?,
            MetricDataset::from_files(&args[2], &args[3])?,
        ),
        _ => {
            eprintln!("usage: metric_learning [X_train Y_train X_val Y_val]");
            std::process::exit(2);
        }
    };

    let config = TrainingConfig {
        iterations: 40,
        ..TrainingConfig::default()
    };
    let seed = config.seed;

    let mut trainer = MetricTrainer::new(config, train.n_features(), RMSProp::default());

    let class_a = train.class_features(-1.0);
    let class_b = train.class_features(1.0);
    let initial_cost = cost(trainer.params(), &class_a, &class_b)?;

    let history = trainer.train(&train)?;
    let params = trainer.into_params();

    let final_cost = cost(&params, &class_a, &class_b)?;
    println!(
        "cost: {:.4} -> {:.4} over {} iterations",
        initial_cost,
        final_cost,
        history.len()
    );

    params.save("Aq_trained.txt", "Ac_trained.txt")?;
    println!("parameters written to Aq_trained.txt / Ac_trained.txt");

    let classifier = OverlapClassifier::new(&params, &train, 20)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let tally = classifier.evaluate(&validation, &mut rng)?;

    print!("{}", tally);
    print_metric("precision", tally.precision());
    print_metric("recall", tally.recall());
    print_metric("accuracy", tally.accuracy());
    print_metric("specificity", tally.specificity());
    print_metric("F1", tally.f1());

    Ok(())
}

fn print_metric(name: &str, value: Option<f64>) {
    match value {
        Some(v) => println!("{}: {:.4}", name, v),
        None => println!("{}: undefined", name),
    }
}

// Two well-separated clusters: class A near the origin, class B near (10, 10).
fn synthetic_datasets() -> Result<(MetricDataset, MetricDataset), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(7);

    let make = |n: usize, rng: &mut StdRng| -> Result<MetricDataset, Box<dyn Error>> {
        let mut features = Array2::zeros((2 * n, 2));
        let mut labels = Vec::with_capacity(2 * n);

        for i in 0..2 * n {
            let (center, label) = if i < n { (0.0, -1.0) } else { (10.0, 1.0) };
            features[[i, 0]] = center + rng.gen_range(-0.5..0.5);
            features[[i, 1]] = center + rng.gen_range(-0.5..0.5);
            labels.push(label);
        }

        Ok(MetricDataset::new(features, labels)?)
    };

    let train = make(8, &mut rng)?;
    let validation = make(6, &mut rng)?;
    Ok((train, validation))
}
