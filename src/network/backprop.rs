use crate::{
    activation::relu_derivative,
    config::Update,
    conv::kernel_gradient,
    dataset::Label,
    loss::log_loss_sigmoid_derivative,
    param::{Gradients, Params},
    pooling::{clear_argmax, scatter_to_argmax},
};

use super::{inference::Outcome, Scratch};

/// Gradients of the loss of the sample last run through
/// [`forward`](super::inference::forward) with the same `scratch`
///
/// ```math
/// \frac{\partial E}{\partial W_2} = g \, h
/// ```
///
/// ```math
/// \frac{\partial E}{\partial W_1} = \tilde{x} \star \delta, \quad
/// \delta = \mathrm{unpool}(g W_2) \odot \mathbb{1}[z > 0]
/// ```
///
/// - $g$: gradient of the loss at the logit
/// - $\mathrm{unpool}$: routes each pooled value to the cell that held the
///   maximum, zero elsewhere
///
/// Groups not selected by `update` are `None` and cost nothing.
pub fn backward(
    params: &Params,
    label: Label,
    outcome: &Outcome,
    scratch: &mut Scratch,
    update: Update,
) -> Gradients {
    let g = log_loss_sigmoid_derivative(label.value(), outcome.probability);

    let dense = update
        .dense
        .then(|| scratch.features().iter().map(|h| g * h).collect());

    let kernel = if update.kernel {
        let upstream = params
            .dense()
            .iter()
            .enumerate()
            .map(|(cell, w)| {
                let (row, col) = scratch.argmax.source(cell);
                g * w * relu_derivative(scratch.pre_activation.at(row, col))
            })
            .collect::<Vec<f64>>();
        scatter_to_argmax(&scratch.argmax, &upstream, &mut scratch.delta);
        let k = scratch.geometry.kernel_size();
        let grad = kernel_gradient(&scratch.padded, &scratch.delta, k);
        clear_argmax(&scratch.argmax, &mut scratch.delta);
        Some(grad)
    } else {
        None
    };

    scratch.check_rep();
    Gradients { kernel, dense }
}
