// tests/dataset_tests.rs
//! Tests for the flat-file dataset loader and label validation

use std::fs;
use std::path::PathBuf;

use ndarray::Array2;

use qumetric::machine_learning::{DatasetError, MetricDataset};

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("qumetric_{}_{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_flat_tables() {
    let features = temp_file("x.txt", "0.5 1.5\n-0.25 2.0\n3.0 -1.0\n");
    let labels = temp_file("y.txt", "-1\n1\n-1\n");

    let dataset = MetricDataset::from_files(&features, &labels).unwrap();

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.n_features(), 2);
    assert_eq!(dataset.labels(), &[-1.0, 1.0, -1.0]);

    let (sample, label) = dataset.sample(1).unwrap();
    assert_eq!(sample.to_vec(), vec![-0.25, 2.0]);
    assert_eq!(label, 1.0);

    assert_eq!(dataset.class_indices(-1.0), vec![0, 2]);
    assert_eq!(dataset.class_features(1.0).len(), 1);

    let _ = fs::remove_file(features);
    let _ = fs::remove_file(labels);
}

#[test]
fn test_blank_lines_are_skipped() {
    let features = temp_file("x_blank.txt", "1.0 2.0\n\n3.0 4.0\n\n");
    let labels = temp_file("y_blank.txt", "-1\n1\n");

    let dataset = MetricDataset::from_files(&features, &labels).unwrap();
    assert_eq!(dataset.len(), 2);

    let _ = fs::remove_file(features);
    let _ = fs::remove_file(labels);
}

#[test]
fn test_ragged_rows_rejected() {
    let features = temp_file("x_ragged.txt", "1.0 2.0\n3.0\n");
    let labels = temp_file("y_ragged.txt", "-1\n1\n");

    let result = MetricDataset::from_files(&features, &labels);
    assert!(matches!(result, Err(DatasetError::RaggedRow { row: 1, .. })));

    let _ = fs::remove_file(features);
    let _ = fs::remove_file(labels);
}

#[test]
fn test_unparseable_token_rejected() {
    let features = temp_file("x_bad.txt", "1.0 two\n");
    let labels = temp_file("y_bad.txt", "-1\n");

    let result = MetricDataset::from_files(&features, &labels);
    assert!(matches!(result, Err(DatasetError::Parse { line: 1, .. })));

    let _ = fs::remove_file(features);
    let _ = fs::remove_file(labels);
}

#[test]
fn test_invalid_label_rejected() {
    let features = Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
    let result = MetricDataset::new(features, vec![-1.0, 0.5]);

    assert!(matches!(result, Err(DatasetError::InvalidLabel(l, 1)) if l == 0.5));
}

#[test]
fn test_sample_count_mismatch_rejected() {
    let features = Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
    let result = MetricDataset::new(features, vec![-1.0]);

    assert!(matches!(
        result,
        Err(DatasetError::SampleCountMismatch {
            features: 2,
            labels: 1
        })
    ));
}

#[test]
fn test_out_of_bounds_sample() {
    let features = Array2::from_shape_vec((1, 2), vec![0.0, 1.0]).unwrap();
    let dataset = MetricDataset::new(features, vec![1.0]).unwrap();

    assert!(matches!(
        dataset.sample(3),
        Err(DatasetError::IndexOutOfBounds(3, 1))
    ));
}
