use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use strict_num::FiniteF64;

use crate::{
    config::{ConfigError, Geometry},
    grid::{descend, Grid},
};

/// The tunable parameters: the convolution kernel $W_1$ and the dense
/// weights $W_2$
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams")]
pub struct Params {
    kernel: Grid,
    dense: Vec<f64>,
}

/// Wire form of [`Params`] before the finiteness check
#[derive(Deserialize)]
struct RawParams {
    kernel: Grid,
    dense: Vec<f64>,
}

impl TryFrom<RawParams> for Params {
    type Error = ConfigError;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        let this = Self {
            kernel: raw.kernel,
            dense: raw.dense,
        };
        this.check_finite()?;
        Ok(this)
    }
}

impl Params {
    pub fn new(kernel: Grid, dense: Vec<f64>, geometry: &Geometry) -> Result<Self, ConfigError> {
        let this = Self { kernel, dense };
        this.validate(geometry)?;
        Ok(this)
    }

    pub fn zeros(geometry: &Geometry) -> Self {
        let k = geometry.kernel_size();
        Self {
            kernel: Grid::zeros(k, k),
            dense: vec![0.; geometry.num_features()],
        }
    }

    /// ```math
    /// W_1 \sim N(0, \frac{2}{K}), \quad W_2 \sim N(0, \frac{1}{\sqrt{n}})
    /// ```
    ///
    /// - $K$: kernel side
    /// - $n$: number of dense weights
    /// - second parameter of $N$: the standard deviation
    pub fn random(geometry: &Geometry, rng: &mut impl Rng) -> Self {
        let k = geometry.kernel_size();
        let kernel_std = 2. / (k as f64);
        let kernel = Grid::from_fn(k, k, |_, _| {
            let z: f64 = rng.sample(StandardNormal);
            z * kernel_std
        });
        let dense_std = 1. / (geometry.pooled_side() as f64);
        let dense = (0..geometry.num_features())
            .map(|_| {
                let z: f64 = rng.sample(StandardNormal);
                z * dense_std
            })
            .collect();
        Self { kernel, dense }
    }

    pub fn seeded(geometry: &Geometry, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::random(geometry, &mut rng)
    }

    /// Shapes match `geometry` and every weight is finite
    pub fn validate(&self, geometry: &Geometry) -> Result<(), ConfigError> {
        self.check_geometry(geometry)?;
        self.check_finite()
    }

    fn check_finite(&self) -> Result<(), ConfigError> {
        let all_finite = self
            .kernel
            .as_slice()
            .iter()
            .chain(self.dense.iter())
            .all(|&x| FiniteF64::new(x).is_some());
        if !all_finite {
            return Err(ConfigError::NonFiniteParameter);
        }
        Ok(())
    }

    pub fn check_geometry(&self, geometry: &Geometry) -> Result<(), ConfigError> {
        let k = geometry.kernel_size();
        if self.kernel.shape() != (k, k) {
            return Err(ConfigError::KernelShape {
                expected: (k, k),
                actual: self.kernel.shape(),
            });
        }
        if self.dense.len() != geometry.num_features() {
            return Err(ConfigError::DenseLength {
                expected: geometry.num_features(),
                actual: self.dense.len(),
            });
        }
        Ok(())
    }

    pub fn kernel(&self) -> &Grid {
        &self.kernel
    }
    pub fn dense(&self) -> &[f64] {
        &self.dense
    }

    /// One gradient descent step on every group present in `gradients`
    pub fn descend(&mut self, gradients: &Gradients, step_size: f64) {
        if let Some(kernel) = &gradients.kernel {
            self.kernel.descend(kernel, step_size);
        }
        if let Some(dense) = &gradients.dense {
            descend(&mut self.dense, dense, step_size);
        }
    }
}

/// Gradients of the loss at the parameters of one sample
///
/// A group is `None` when it is not being trained.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub kernel: Option<Grid>,
    pub dense: Option<Vec<f64>>,
}
