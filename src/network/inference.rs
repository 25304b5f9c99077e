use crate::{
    activation::{clamp_probability, relu_inplace, sigmoid},
    conv::correlate_padded,
    dataset::Label,
    grid::{dot, Grid},
    loss::log_loss,
    param::Params,
    pooling::max_pool_into,
};

use super::Scratch;

/// Result of one forward pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    /// Clamped to `[1e-16, 1 - 1e-16]`
    pub probability: f64,
    pub loss: f64,
    pub prediction: Label,
    pub correct: bool,
}

/// Run `image` through the network
///
/// The intermediates the backward pass needs stay in `scratch`.
pub fn forward(params: &Params, image: &Grid, label: Label, scratch: &mut Scratch) -> Outcome {
    scratch.padded.embed(image);
    correlate_padded(&scratch.padded, params.kernel(), &mut scratch.pre_activation);

    let activated = scratch.activated.as_mut_slice();
    activated.copy_from_slice(scratch.pre_activation.as_slice());
    relu_inplace(activated);
    max_pool_into(&scratch.activated, &mut scratch.pooled, &mut scratch.argmax);

    let logit = dot(scratch.pooled.as_slice(), params.dense());
    let probability = clamp_probability(sigmoid(logit));
    let loss = log_loss(label.value(), probability);
    let prediction = Label::from_probability(probability);
    Outcome {
        probability,
        loss,
        prediction,
        correct: prediction == label,
    }
}
