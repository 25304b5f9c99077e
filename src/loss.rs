use crate::activation::clamp_probability;

/// ```math
/// f(y, \hat{y}) = -(y \log(\hat{y}) + (1 - y) \log(1 - \hat{y}))
/// ```
///
/// `y_hat` is clamped before taking any logarithm.
pub fn log_loss(y: f64, y_hat: f64) -> f64 {
    assert!(y == 0. || y == 1.);
    let y_hat = clamp_probability(y_hat);
    -(y * y_hat.ln() + (1. - y) * (1. - y_hat).ln())
}

/// Gradient of [`log_loss`] composed with the sigmoid at the logit
///
/// ```math
/// \frac{\partial E}{\partial z} = (1 - y) \hat{y} - y (1 - \hat{y})
/// ```
///
/// With a clamped $\hat{y}$ this differs from $\hat{y} - y$ only at
/// saturation.
pub fn log_loss_sigmoid_derivative(y: f64, y_hat: f64) -> f64 {
    assert!(y == 0. || y == 1.);
    let y_hat = clamp_probability(y_hat);
    (1. - y) * y_hat - y * (1. - y_hat)
}
