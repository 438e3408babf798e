// src/machine_learning/trainer.rs
//! Mini-batch training loop
//!
//! Each iteration draws a batch of samples independently and with
//! replacement from each class, computes the cost gradient over the batch by
//! central finite differences on the flattened parameter bundle, and applies
//! the optimizer update. The loop runs a fixed number of iterations; there
//! is no convergence check. Simulator failures abort the run.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::machine_learning::dataset::MetricDataset;
use crate::machine_learning::embedding::{cost, ModelError, ParameterBundle};
use crate::machine_learning::optimizer::Optimizer;

/// Label of the first class (the classifier's positive class)
pub const CLASS_A_LABEL: f64 = -1.0;
/// Label of the second class
pub const CLASS_B_LABEL: f64 = 1.0;

/// Training hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of repeated ansatz layers
    pub layers: usize,
    /// Mini-batch size drawn from class A each iteration
    pub batch_size_a: usize,
    /// Mini-batch size drawn from class B each iteration
    pub batch_size_b: usize,
    /// Fixed number of optimization iterations
    pub iterations: usize,
    /// Step width for the central-difference gradient
    pub gradient_step: f64,
    /// Seed for parameter initialization and batch draws
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            layers: 4,
            batch_size_a: 4,
            batch_size_b: 4,
            iterations: 100,
            gradient_step: 1e-3,
            seed: 42,
        }
    }
}

/// Trainer owning the parameter bundle, the optimizer state, and the
/// seeded batch generator
pub struct MetricTrainer<O: Optimizer> {
    config: TrainingConfig,
    params: ParameterBundle,
    optimizer: O,
    rng: StdRng,
}

impl<O: Optimizer> MetricTrainer<O> {
    /// Initialize a trainer with a fresh seeded parameter bundle
    pub fn new(config: TrainingConfig, n_features: usize, optimizer: O) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let params = ParameterBundle::init(n_features, config.layers, &mut rng);

        MetricTrainer {
            config,
            params,
            optimizer,
            rng,
        }
    }

    /// Resume from previously persisted parameters
    pub fn with_parameters(config: TrainingConfig, params: ParameterBundle, optimizer: O) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);

        MetricTrainer {
            config,
            params,
            optimizer,
            rng,
        }
    }

    /// Current parameter bundle
    pub fn params(&self) -> &ParameterBundle {
        &self.params
    }

    /// Consume the trainer, yielding the trained bundle
    pub fn into_params(self) -> ParameterBundle {
        self.params
    }

    /// One optimization step over freshly drawn mini-batches. Returns the
    /// batch cost at the pre-update parameters.
    pub fn step(
        &mut self,
        class_a: &[Array1<f64>],
        class_b: &[Array1<f64>],
    ) -> Result<f64, ModelError> {
        if class_a.is_empty() || class_b.is_empty() {
            return Err(ModelError::EmptyClass);
        }

        let batch_a = self.draw_batch(class_a, self.config.batch_size_a);
        let batch_b = self.draw_batch(class_b, self.config.batch_size_b);

        let flat = self.params.as_flat();
        let batch_cost = self.cost_at(&flat, &batch_a, &batch_b)?;
        let gradients = self.gradient_at(&flat, &batch_a, &batch_b)?;

        let mut updated = flat;
        self.optimizer.update(&mut updated, &gradients);
        self.params.assign_flat(&updated)?;

        Ok(batch_cost)
    }

    /// Run the configured number of iterations against the dataset's two
    /// classes and return the per-iteration batch costs.
    pub fn train(&mut self, dataset: &MetricDataset) -> Result<Vec<f64>, ModelError> {
        let class_a = dataset.class_features(CLASS_A_LABEL);
        let class_b = dataset.class_features(CLASS_B_LABEL);

        let mut history = Vec::with_capacity(self.config.iterations);

        for iteration in 0..self.config.iterations {
            let batch_cost = self.step(&class_a, &class_b)?;
            tracing::info!(iteration, cost = batch_cost, "training step");
            history.push(batch_cost);
        }

        Ok(history)
    }

    // Independent draws with replacement
    fn draw_batch(&mut self, pool: &[Array1<f64>], size: usize) -> Vec<Array1<f64>> {
        (0..size)
            .map(|_| pool[self.rng.gen_range(0..pool.len())].clone())
            .collect()
    }

    fn cost_at(
        &self,
        flat: &[f64],
        batch_a: &[Array1<f64>],
        batch_b: &[Array1<f64>],
    ) -> Result<f64, ModelError> {
        let mut bundle = self.params.clone();
        bundle.assign_flat(flat)?;
        cost(&bundle, batch_a, batch_b)
    }

    // Central finite differences over the flattened bundle. The bundle
    // mixes classical projection weights with circuit angles, so a single
    // numerical scheme covers both.
    fn gradient_at(
        &self,
        flat: &[f64],
        batch_a: &[Array1<f64>],
        batch_b: &[Array1<f64>],
    ) -> Result<Vec<f64>, ModelError> {
        let h = self.config.gradient_step;
        let mut probe = flat.to_vec();
        let mut gradients = vec![0.0; flat.len()];

        for i in 0..flat.len() {
            probe[i] = flat[i] + h;
            let plus = self.cost_at(&probe, batch_a, batch_b)?;

            probe[i] = flat[i] - h;
            let minus = self.cost_at(&probe, batch_a, batch_b)?;

            probe[i] = flat[i];
            gradients[i] = (plus - minus) / (2.0 * h);
        }

        Ok(gradients)
    }
}
