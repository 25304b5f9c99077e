use serde::Deserialize;
use strict_num::FiniteF64;
use thiserror::Error;

/// Options of one training run
///
/// Field aliases accept the short option names `K`, `update_W1` and
/// `update_W2`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Side of the square convolution kernel; must be odd
    #[serde(alias = "K")]
    pub kernel_size: usize,
    /// Side of the max pooling window; `1` disables pooling
    pub pool_size: usize,
    pub epochs: usize,
    /// Learning rate
    pub eta: f64,
    /// Whether the convolution kernel is trained
    #[serde(alias = "update_W1")]
    pub update_kernel: bool,
    /// Whether the dense weights are trained
    #[serde(alias = "update_W2")]
    pub update_dense: bool,
    /// Seeds both the initial weights and the sample index stream
    pub seed: u64,
}
impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            kernel_size: 3,
            pool_size: 1,
            epochs: 5,
            eta: 0.001,
            update_kernel: true,
            update_dense: true,
            seed: 42,
        }
    }
}
impl TrainConfig {
    /// Check the options against square images of side `image_side`
    pub fn geometry(&self, image_side: usize) -> Result<Geometry, ConfigError> {
        let eta = FiniteF64::new(self.eta).ok_or(ConfigError::LearningRate(self.eta))?;
        if eta.get() <= 0. {
            return Err(ConfigError::LearningRate(self.eta));
        }
        Geometry::new(image_side, self.kernel_size, self.pool_size)
    }

    pub fn update(&self) -> Update {
        Update {
            kernel: self.update_kernel,
            dense: self.update_dense,
        }
    }
}

/// Which parameter groups receive gradients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Update {
    pub kernel: bool,
    pub dense: bool,
}
impl Update {
    pub fn none() -> Self {
        Self {
            kernel: false,
            dense: false,
        }
    }
    pub fn all() -> Self {
        Self {
            kernel: true,
            dense: true,
        }
    }
}

/// The three ways of training the same network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainVariant {
    Full,
    FrozenKernel,
    FrozenDense,
}
impl TrainVariant {
    pub const ALL: [TrainVariant; 3] = [
        TrainVariant::Full,
        TrainVariant::FrozenKernel,
        TrainVariant::FrozenDense,
    ];

    pub fn configure(self, base: &TrainConfig) -> TrainConfig {
        let (update_kernel, update_dense) = match self {
            TrainVariant::Full => (true, true),
            TrainVariant::FrozenKernel => (false, true),
            TrainVariant::FrozenDense => (true, false),
        };
        TrainConfig {
            update_kernel,
            update_dense,
            ..base.clone()
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TrainVariant::Full => "Training the model",
            TrainVariant::FrozenKernel => "Training the model with convolution weights frozen",
            TrainVariant::FrozenDense => "Training the model with dense weights frozen",
        }
    }
}

/// Validated sizes of every buffer in the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    image_side: usize,
    kernel_size: usize,
    pool_size: usize,
}
impl Geometry {
    pub fn new(image_side: usize, kernel_size: usize, pool_size: usize) -> Result<Self, ConfigError> {
        if kernel_size % 2 == 0 {
            return Err(ConfigError::EvenKernel(kernel_size));
        }
        if image_side == 0 {
            return Err(ConfigError::EmptyImage);
        }
        if pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        if image_side % pool_size != 0 {
            return Err(ConfigError::PoolNotDividing {
                image_side,
                pool_size,
            });
        }
        Ok(Self {
            image_side,
            kernel_size,
            pool_size,
        })
    }

    pub fn image_side(&self) -> usize {
        self.image_side
    }
    pub fn kernel_size(&self) -> usize {
        self.kernel_size
    }
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }
    pub fn pooled_side(&self) -> usize {
        self.image_side / self.pool_size
    }
    /// Length of the dense weight vector
    pub fn num_features(&self) -> usize {
        self.pooled_side() * self.pooled_side()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Kernel size {0} is not odd")]
    EvenKernel(usize),
    #[error("Images are empty")]
    EmptyImage,
    #[error("Pool size is zero")]
    ZeroPoolSize,
    #[error("Image side {image_side} is not a multiple of pool size {pool_size}")]
    PoolNotDividing { image_side: usize, pool_size: usize },
    #[error("Learning rate {0} is not a positive finite number")]
    LearningRate(f64),
    #[error("Kernel shape {actual:?} is not {expected:?}")]
    KernelShape {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("Dense weight length {actual} does not match feature count {expected}")]
    DenseLength { expected: usize, actual: usize },
    #[error("Parameters contain a non-finite value")]
    NonFiniteParameter,
    #[error("Sample {index} of the {split} set has shape {actual:?} instead of {expected:?}")]
    ImageShape {
        split: Split,
        index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("The {0} set is empty")]
    EmptySplit(Split),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Training,
    Validation,
    Test,
}
impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Split::Training => "training",
            Split::Validation => "validation",
            Split::Test => "test",
        };
        f.write_str(name)
    }
}
