//! # Terminologies
//!
//! - $x$: the input image
//! - $W_1$: the convolution kernel ("kernel" in code)
//! - $z$: the convolution output before the rectifier ("pre-activation")
//! - $h$: the rectified and pooled features, flattened
//! - $W_2$: the dense weights ("dense" in code)
//! - $\hat{y}$: the clamped sigmoid of $h \cdot W_2$ ("probability")
//! - $E$: the log loss

use crate::{
    config::Geometry,
    grid::Grid,
    padding::PaddedImage,
    pooling::ArgmaxCache,
};

pub mod backprop;
pub mod inference;
pub mod train;

/// Per-run working memory reused across samples
///
/// The forward pass overwrites everything it reads back later; the backward
/// pass leaves `delta` all zero when it returns.
#[derive(Debug, Clone)]
pub struct Scratch {
    geometry: Geometry,
    padded: PaddedImage,
    pre_activation: Grid,
    activated: Grid,
    pooled: Grid,
    argmax: ArgmaxCache,
    /// gradient of the loss at the pre-activation map
    delta: Grid,
}
impl Scratch {
    fn check_rep(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        assert!(self.delta.as_slice().iter().all(|&x| x == 0.));
    }

    pub fn new(geometry: &Geometry) -> Self {
        let n = geometry.image_side();
        let pooled = geometry.pooled_side();
        let this = Self {
            geometry: *geometry,
            padded: PaddedImage::new(n, n, geometry.kernel_size()),
            pre_activation: Grid::zeros(n, n),
            activated: Grid::zeros(n, n),
            pooled: Grid::zeros(pooled, pooled),
            argmax: ArgmaxCache::new(geometry.pool_size(), pooled, pooled),
            delta: Grid::zeros(n, n),
        };
        this.check_rep();
        this
    }

    /// $z$ of the last forward pass
    pub fn pre_activation(&self) -> &Grid {
        &self.pre_activation
    }
    /// $h$ of the last forward pass
    pub fn features(&self) -> &[f64] {
        self.pooled.as_slice()
    }
    pub fn argmax(&self) -> &ArgmaxCache {
        &self.argmax
    }
}
