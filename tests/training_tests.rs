// tests/training_tests.rs
//! Tests for the trainer, the overlap-vote classifier, and the derived
//! metrics

use ndarray::{arr1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use qumetric::machine_learning::prelude::*;

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

// Two tight, well-separated clusters: class A near the origin (label -1),
// class B near (10, 10) (label +1).
fn clustered_dataset(per_class: usize, seed: u64) -> MetricDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut features = Array2::zeros((2 * per_class, 2));
    let mut labels = Vec::with_capacity(2 * per_class);

    for i in 0..2 * per_class {
        let (center, label) = if i < per_class { (0.0, -1.0) } else { (10.0, 1.0) };
        features[[i, 0]] = center + rng.gen_range(-0.25..0.25);
        features[[i, 1]] = center + rng.gen_range(-0.25..0.25);
        labels.push(label);
    }

    MetricDataset::new(features, labels).unwrap()
}

fn small_config() -> TrainingConfig {
    TrainingConfig {
        layers: 4,
        batch_size_a: 4,
        batch_size_b: 4,
        iterations: 25,
        gradient_step: 1e-3,
        seed: 42,
    }
}

#[test]
fn test_seeded_training_is_reproducible() {
    let dataset = clustered_dataset(6, 1);
    let config = TrainingConfig {
        iterations: 5,
        ..small_config()
    };

    let mut first = MetricTrainer::new(config.clone(), dataset.n_features(), RMSProp::default());
    let first_history = first.train(&dataset).unwrap();

    let mut second = MetricTrainer::new(config, dataset.n_features(), RMSProp::default());
    let second_history = second.train(&dataset).unwrap();

    assert_eq!(first_history, second_history);
    assert_eq!(first.params().as_flat(), second.params().as_flat());
}

#[test]
fn test_training_separates_synthetic_clusters() {
    let train = clustered_dataset(8, 2);
    let validation = clustered_dataset(6, 3);

    let class_a = train.class_features(-1.0);
    let class_b = train.class_features(1.0);

    let mut trainer = MetricTrainer::new(small_config(), train.n_features(), RMSProp::default());
    let initial_cost = cost(trainer.params(), &class_a, &class_b).unwrap();

    trainer.train(&train).unwrap();
    let params = trainer.into_params();

    let trained_cost = cost(&params, &class_a, &class_b).unwrap();
    assert!(
        trained_cost < initial_cost,
        "training did not reduce the cost: {} -> {}",
        initial_cost,
        trained_cost
    );

    let classifier = OverlapClassifier::new(&params, &train, 20).unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let tally = classifier.evaluate(&validation, &mut rng).unwrap();

    let accuracy = tally.accuracy().unwrap();
    assert!(
        accuracy > 0.9,
        "held-out accuracy {} below 0.9: {}",
        accuracy,
        tally
    );
}

#[test]
fn test_confusion_sums_match_query_counts() {
    let train = clustered_dataset(5, 4);
    let validation = clustered_dataset(4, 5);

    let mut rng = StdRng::seed_from_u64(0);
    let params = ParameterBundle::init(train.n_features(), 3, &mut rng);

    let classifier = OverlapClassifier::new(&params, &train, 3).unwrap();
    let mut eval_rng = StdRng::seed_from_u64(8);
    let tally = classifier.evaluate(&validation, &mut eval_rng).unwrap();

    let class_a_queries = validation.class_indices(-1.0).len();
    let class_b_queries = validation.class_indices(1.0).len();

    assert_eq!(tally.true_positive + tally.false_negative, class_a_queries);
    assert_eq!(tally.false_positive + tally.true_negative, class_b_queries);
    assert_eq!(tally.total(), validation.len());
}

#[test]
fn test_single_sample_score_is_one_scaled_label() {
    // a one-element pool pins down which reference gets drawn
    let pool = MetricDataset::new(
        Array2::from_shape_vec((1, 2), vec![0.3, -0.2]).unwrap(),
        vec![1.0],
    )
    .unwrap();

    let mut rng = StdRng::seed_from_u64(12);
    let params = ParameterBundle::init(2, 2, &mut rng);
    let classifier = OverlapClassifier::new(&params, &pool, 1).unwrap();

    let query = arr1(&[1.5, 0.7]);
    let (reference, label) = pool.sample(0).unwrap();
    let expected = label * overlap(&params, &reference, &query).unwrap();

    let mut score_rng = StdRng::seed_from_u64(0);
    let score = classifier.score(&query, &mut score_rng).unwrap();
    assert!(approx_eq(score, expected, 1e-12));

    let mut predict_rng = StdRng::seed_from_u64(0);
    let mut tally = ConfusionTally::new();
    let predicted = classifier.predict(&query, &mut predict_rng).unwrap();
    tally.record(1.0, predicted);
    assert_eq!(tally.total(), 1);
}

#[test]
fn test_zero_samples_rejected() {
    let pool = clustered_dataset(2, 6);
    let mut rng = StdRng::seed_from_u64(0);
    let params = ParameterBundle::init(pool.n_features(), 2, &mut rng);

    let result = OverlapClassifier::new(&params, &pool, 0);
    assert!(matches!(result, Err(ModelError::ZeroSamples)));
}

#[test]
fn test_undefined_metrics_are_none() {
    let mut tally = ConfusionTally::new();

    // every class-A query misclassified: nothing predicted positive
    tally.record(-1.0, 1.0);
    tally.record(-1.0, 1.0);

    assert_eq!(tally.precision(), None);
    assert_eq!(tally.specificity(), None);
    assert_eq!(tally.f1(), None);
    assert_eq!(tally.recall(), Some(0.0));
    assert_eq!(tally.accuracy(), Some(0.0));

    let empty = ConfusionTally::new();
    assert_eq!(empty.accuracy(), None);
}

#[test]
fn test_gradient_descent_update_and_reset() {
    let mut optimizer = GradientDescent::new(0.5);
    let mut parameters = vec![1.0, -2.0];
    optimizer.update(&mut parameters, &[0.25, -0.5]);
    assert_eq!(parameters, vec![0.875, -1.75]);

    // stateless: reset changes nothing about subsequent updates
    optimizer.reset();
    optimizer.update(&mut parameters, &[0.25, -0.5]);
    assert_eq!(parameters, vec![0.75, -1.5]);
}

#[test]
fn test_rmsprop_reset_restores_initial_behavior() {
    let mut optimizer = RMSProp::new(0.1, 0.9, 1e-8);
    let mut first = vec![0.0];
    optimizer.update(&mut first, &[1.0]);

    optimizer.reset();
    let mut second = vec![0.0];
    optimizer.update(&mut second, &[1.0]);

    assert_eq!(first, second);
}

#[test]
fn test_training_with_gradient_descent_runs() {
    let dataset = clustered_dataset(4, 9);
    let config = TrainingConfig {
        iterations: 3,
        ..small_config()
    };

    let mut trainer = MetricTrainer::new(config, dataset.n_features(), GradientDescent::new(0.1));
    let history = trainer.train(&dataset).unwrap();
    assert_eq!(history.len(), 3);
}

#[test]
fn test_trainer_rejects_empty_class() {
    let features = Array2::from_shape_vec((2, 2), vec![0.0, 0.1, 0.2, 0.3]).unwrap();
    let dataset = MetricDataset::new(features, vec![-1.0, -1.0]).unwrap();

    let mut trainer = MetricTrainer::new(small_config(), 2, RMSProp::default());
    let result = trainer.train(&dataset);
    assert!(matches!(result, Err(ModelError::EmptyClass)));
}

#[test]
fn test_resume_from_persisted_parameters() {
    let dataset = clustered_dataset(4, 7);
    let config = TrainingConfig {
        iterations: 2,
        ..small_config()
    };

    let mut trainer = MetricTrainer::new(config.clone(), dataset.n_features(), RMSProp::default());
    trainer.train(&dataset).unwrap();
    let trained = trainer.into_params();

    let resumed = MetricTrainer::with_parameters(config, trained.clone(), RMSProp::default());
    assert_eq!(resumed.params(), &trained);
}
