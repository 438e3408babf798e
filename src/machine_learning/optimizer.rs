// src/machine_learning/optimizer.rs
//! Optimization algorithms for the training loop

/// Trait for gradient-based optimizers
pub trait Optimizer {
    /// Update parameters in place using gradients
    fn update(&mut self, parameters: &mut [f64], gradients: &[f64]);

    /// Reset the optimizer's internal state
    fn reset(&mut self);
}

/// Plain gradient descent
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f64,
}

impl GradientDescent {
    /// Creates a new gradient descent optimizer
    pub fn new(learning_rate: f64) -> Self {
        GradientDescent { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    fn update(&mut self, parameters: &mut [f64], gradients: &[f64]) {
        assert_eq!(
            parameters.len(),
            gradients.len(),
            "Parameter and gradient dimensions must match"
        );

        for (param, grad) in parameters.iter_mut().zip(gradients.iter()) {
            *param -= self.learning_rate * grad;
        }
    }

    fn reset(&mut self) {
        // gradient descent has no state to reset
    }
}

/// RMSProp: adaptive learning rate via a moving average of squared
/// gradients. The cache is explicit state owned by whoever owns the
/// optimizer, threaded through each update.
#[derive(Debug, Clone)]
pub struct RMSProp {
    learning_rate: f64,
    decay_rate: f64,
    epsilon: f64,
    cache: Vec<f64>,
}

impl RMSProp {
    /// Creates a new RMSProp optimizer
    pub fn new(learning_rate: f64, decay_rate: f64, epsilon: f64) -> Self {
        RMSProp {
            learning_rate,
            decay_rate,
            epsilon,
            cache: Vec::new(),
        }
    }
}

impl Default for RMSProp {
    fn default() -> Self {
        RMSProp::new(0.01, 0.9, 1e-8)
    }
}

impl Optimizer for RMSProp {
    fn update(&mut self, parameters: &mut [f64], gradients: &[f64]) {
        let n = parameters.len();
        assert_eq!(
            n,
            gradients.len(),
            "Parameter and gradient dimensions must match"
        );

        if self.cache.len() != n {
            self.cache = vec![0.0; n];
        }

        for i in 0..n {
            self.cache[i] =
                self.decay_rate * self.cache[i] + (1.0 - self.decay_rate) * gradients[i] * gradients[i];

            parameters[i] -= self.learning_rate * gradients[i] / (self.cache[i].sqrt() + self.epsilon);
        }
    }

    fn reset(&mut self) {
        self.cache.clear();
    }
}
