/// Lower bound of a clamped probability
pub const MIN_PROBABILITY: f64 = 1e-16;
/// Upper bound of a clamped probability
pub const MAX_PROBABILITY: f64 = 1. - 1e-16;

/// ```math
/// f(x) = \begin{cases}
///   x & x > 0 \\
///   0 & x \leq 0 \\
/// \end{cases}
/// ```
pub fn relu(x: f64) -> f64 {
    f64::max(x, 0.0)
}

/// Zero at the kink
pub fn relu_derivative(x: f64) -> f64 {
    match x {
        _ if x > 0.0 => 1.0,
        _ => 0.0,
    }
}

pub fn relu_inplace(x: &mut [f64]) {
    x.iter_mut().for_each(|x| *x = relu(*x));
}

/// ```math
/// f(x) = \frac{1}{1 + e^{-x}}
/// ```
pub fn sigmoid(x: f64) -> f64 {
    // only ever exponentiate a non-positive number
    if x >= 0. {
        1. / (1. + (-x).exp())
    } else {
        let exp = x.exp();
        exp / (exp + 1.0)
    }
}

/// Keep a probability away from 0 and 1 so that both $\log p$ and
/// $\log (1 - p)$ are finite
pub fn clamp_probability(p: f64) -> f64 {
    p.clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relu_is_non_negative() {
        for x in [-1e300, -3.0, -0.0, 0.0, 1e-300, 2.5, f64::MAX] {
            assert!(relu(x) >= 0.);
        }
        assert_eq!(relu(-2.0), 0.);
        assert_eq!(relu(3.0), 3.);
    }

    #[test]
    fn relu_derivative_is_zero_or_one() {
        assert_eq!(relu_derivative(-3.0), 0.);
        assert_eq!(relu_derivative(0.0), 0.);
        assert_eq!(relu_derivative(-0.0), 0.);
        assert_eq!(relu_derivative(1e-300), 1.);
        assert_eq!(relu_derivative(3.0), 1.);
    }

    #[test]
    fn sigmoid_stays_in_open_unit_interval() {
        for x in [-30.0, -5.0, -1.0, 0.0, 1.0, 5.0, 30.0] {
            let y = sigmoid(x);
            assert!(0. < y && y < 1., "{x} -> {y}");
        }
        assert_eq!(sigmoid(0.), 0.5);
        assert!((sigmoid(2.) + sigmoid(-2.) - 1.).abs() < 1e-15);
    }

    #[test]
    fn sigmoid_does_not_overflow() {
        assert_eq!(sigmoid(1e4), 1.);
        assert_eq!(sigmoid(-1e4), 0.);
        assert!(!sigmoid(f64::MAX).is_nan());
        assert!(!sigmoid(f64::MIN).is_nan());
    }

    #[test]
    fn clamped_probability_has_finite_logs() {
        for x in [-1e4, -40., 0., 40., 1e4] {
            let p = clamp_probability(sigmoid(x));
            assert!((MIN_PROBABILITY..=MAX_PROBABILITY).contains(&p));
            assert!(p.ln().is_finite());
            assert!((1. - p).ln().is_finite());
        }
        assert_eq!(clamp_probability(0.), MIN_PROBABILITY);
        assert_eq!(clamp_probability(1.), MAX_PROBABILITY);
        assert_eq!(clamp_probability(0.25), 0.25);
    }
}
