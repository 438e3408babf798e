// src/machine_learning/classifier.rs
//! Similarity-vote classifier and evaluation bookkeeping
//!
//! A query is scored by drawing labeled references uniformly at random with
//! replacement from the training pool and averaging `label · overlap`.
//! Scores strictly below zero predict class A (label -1); zero and above
//! predict class B (+1).

use std::fmt::{self, Display};

use ndarray::Array1;
use rand::Rng;

use crate::machine_learning::dataset::MetricDataset;
use crate::machine_learning::embedding::{overlap, ModelError, ParameterBundle};
use crate::machine_learning::trainer::CLASS_A_LABEL;

/// Confusion-matrix bookkeeping. Class A (label -1) is the positive class:
/// correct class-A calls count as true positives, missed ones as false
/// negatives; correct class-B calls count as true negatives, missed ones as
/// false positives.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConfusionTally {
    pub true_positive: usize,
    pub false_negative: usize,
    pub false_positive: usize,
    pub true_negative: usize,
}

impl ConfusionTally {
    /// Start an empty tally
    pub fn new() -> Self {
        ConfusionTally::default()
    }

    /// Record one evaluated query given its true and predicted labels
    pub fn record(&mut self, true_label: f64, predicted_label: f64) {
        let truth_is_a = true_label == CLASS_A_LABEL;
        let predicted_a = predicted_label == CLASS_A_LABEL;

        match (truth_is_a, predicted_a) {
            (true, true) => self.true_positive += 1,
            (true, false) => self.false_negative += 1,
            (false, true) => self.false_positive += 1,
            (false, false) => self.true_negative += 1,
        }
    }

    /// Total number of recorded queries
    pub fn total(&self) -> usize {
        self.true_positive + self.false_negative + self.false_positive + self.true_negative
    }

    /// TP / (TP + FP); `None` when nothing was predicted positive
    pub fn precision(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// TP / (TP + FN); `None` when no class-A queries were evaluated
    pub fn recall(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// TN / (TN + FP); `None` when no class-B queries were evaluated
    pub fn specificity(&self) -> Option<f64> {
        ratio(self.true_negative, self.true_negative + self.false_positive)
    }

    /// (TP + TN) / total; `None` on an empty tally
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    /// Harmonic mean of precision and recall; `None` when either is
    /// undefined or both are zero
    pub fn f1(&self) -> Option<f64> {
        let precision = self.precision()?;
        let recall = self.recall()?;

        if precision + recall == 0.0 {
            return None;
        }

        Some(2.0 * precision * recall / (precision + recall))
    }
}

impl Display for ConfusionTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "confusion: TP={} FN={} FP={} TN={}",
            self.true_positive, self.false_negative, self.false_positive, self.true_negative
        )
    }
}

/// Classifier scoring queries against randomly drawn labeled references
pub struct OverlapClassifier<'a> {
    params: &'a ParameterBundle,
    pool: &'a MetricDataset,
    n_samples: usize,
}

impl<'a> OverlapClassifier<'a> {
    /// Create a classifier over a trained bundle and a labeled reference
    /// pool, drawing `n_samples` references per query.
    pub fn new(
        params: &'a ParameterBundle,
        pool: &'a MetricDataset,
        n_samples: usize,
    ) -> Result<Self, ModelError> {
        if n_samples == 0 {
            return Err(ModelError::ZeroSamples);
        }
        if pool.is_empty() {
            return Err(ModelError::EmptyClass);
        }

        Ok(OverlapClassifier {
            params,
            pool,
            n_samples,
        })
    }

    /// Average weighted overlap of the query against `n_samples` references
    /// drawn uniformly with replacement from the full pool
    pub fn score<R: Rng>(&self, query: &Array1<f64>, rng: &mut R) -> Result<f64, ModelError> {
        let mut accumulated = 0.0;

        for _ in 0..self.n_samples {
            let index = rng.gen_range(0..self.pool.len());
            let (reference, label) = self.pool.sample(index)?;
            accumulated += label * overlap(self.params, &reference, query)?;
        }

        Ok(accumulated / self.n_samples as f64)
    }

    /// Predicted label: -1 for score < 0, +1 otherwise
    pub fn predict<R: Rng>(&self, query: &Array1<f64>, rng: &mut R) -> Result<f64, ModelError> {
        let score = self.score(query, rng)?;
        Ok(if score < 0.0 { -1.0 } else { 1.0 })
    }

    /// Score every sample of a held-out dataset and aggregate the confusion
    /// tally
    pub fn evaluate<R: Rng>(
        &self,
        queries: &MetricDataset,
        rng: &mut R,
    ) -> Result<ConfusionTally, ModelError> {
        let mut tally = ConfusionTally::new();

        for index in 0..queries.len() {
            let (query, true_label) = queries.sample(index)?;
            let predicted = self.predict(&query, rng)?;
            tally.record(true_label, predicted);
        }

        tracing::info!(
            queries = queries.len(),
            accuracy = tally.accuracy(),
            "evaluation finished"
        );

        Ok(tally)
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}
