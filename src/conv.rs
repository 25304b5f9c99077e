use crate::{grid::Grid, padding::PaddedImage};

/// "Same" convolution of `image` with `kernel`
///
/// The kernel is applied without flipping (cross-correlation), which is the
/// true convolution with the kernel flipped on both axes:
///
/// ```math
/// y_{r,c} = \sum_{a,b} w_{a,b} \, x_{r + a - \lfloor K/2 \rfloor, c + b - \lfloor K/2 \rfloor}
/// ```
///
/// with $x$ zero outside the image.
pub fn convolve(image: &Grid, kernel: &Grid) -> Grid {
    let padded = PaddedImage::from_image(image, kernel.rows());
    let mut out = Grid::zeros(image.rows(), image.cols());
    correlate_padded(&padded, kernel, &mut out);
    out
}

/// [`convolve`] reading from an already padded image and writing into `out`
pub fn correlate_padded(padded: &PaddedImage, kernel: &Grid, out: &mut Grid) {
    assert!(kernel.is_square());
    assert_eq!(padded.offset(), kernel.rows() / 2);
    assert_eq!(padded.image_shape(), out.shape());
    let k = kernel.rows();
    let (rows, cols) = out.shape();
    for r in 0..rows {
        for c in 0..cols {
            let mut sum = 0.;
            for a in 0..k {
                let window = &padded.grid().row(r + a)[c..c + k];
                sum += window
                    .iter()
                    .copied()
                    .zip(kernel.row(a).iter().copied())
                    .map(|(x, w)| x * w)
                    .sum::<f64>();
            }
            *out.at_mut(r, c) = sum;
        }
    }
}

/// Gradient of the loss at the kernel given the gradient `delta` at the
/// convolution output
///
/// ```math
/// \frac{\partial E}{\partial w_{a,b}} = \sum_{r,c} \tilde{x}_{a + r, b + c} \, \delta_{r,c}
/// ```
///
/// - $\tilde{x}$: the padded image
pub fn kernel_gradient(padded: &PaddedImage, delta: &Grid, kernel_size: usize) -> Grid {
    assert_eq!(padded.offset(), kernel_size / 2);
    assert_eq!(padded.image_shape(), delta.shape());
    let (rows, cols) = delta.shape();
    Grid::from_fn(kernel_size, kernel_size, |a, b| {
        let mut sum = 0.;
        for r in 0..rows {
            let window = &padded.grid().row(a + r)[b..b + cols];
            sum += window
                .iter()
                .copied()
                .zip(delta.row(r).iter().copied())
                .map(|(x, d)| x * d)
                .sum::<f64>();
        }
        sum
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_4x4() -> Grid {
        let image = [
            1, 2, 3, 4, //
            5, 6, 7, 8, //
            9, 10, 11, 12, //
            13, 14, 15, 16, //
        ];
        let image = image.iter().copied().map(|x| x as f64).collect();
        Grid::new(image, 4).unwrap()
    }

    fn unit_kernel(k: usize, a: usize, b: usize) -> Grid {
        let mut kernel = Grid::zeros(k, k);
        *kernel.at_mut(a, b) = 1.;
        kernel
    }

    #[test]
    fn output_has_input_shape() {
        for (rows, cols) in [(1, 1), (4, 4), (5, 3), (7, 7)] {
            let image = Grid::filled(rows, cols, 1.);
            for k in [1, 3, 5] {
                let kernel = Grid::filled(k, k, 0.5);
                assert_eq!(convolve(&image, &kernel).shape(), (rows, cols));
            }
        }
    }

    #[test]
    fn centered_unit_kernel_is_identity() {
        let image = image_4x4();
        assert_eq!(convolve(&image, &unit_kernel(3, 1, 1)), image);
        assert_eq!(convolve(&image, &unit_kernel(1, 0, 0)), image);
    }

    #[test]
    fn kernel_is_not_flipped() {
        // the top-left weight reads the up-left neighbor
        let image = image_4x4();
        let out = convolve(&image, &unit_kernel(3, 0, 0));
        let expected = [
            0., 0., 0., 0., //
            0., 1., 2., 3., //
            0., 5., 6., 7., //
            0., 9., 10., 11., //
        ];
        assert_eq!(out.as_slice(), &expected);
    }

    #[test]
    fn box_kernel_sums_neighborhood() {
        let image = Grid::filled(3, 3, 1.);
        let out = convolve(&image, &Grid::filled(3, 3, 1.));
        let expected = [
            4., 6., 4., //
            6., 9., 6., //
            4., 6., 4., //
        ];
        assert_eq!(out.as_slice(), &expected);
    }

    #[test]
    fn kernel_gradient_matches_linearity() {
        // the convolution is linear in the kernel, so the gradient of
        // sum(delta * conv(x, w)) at w_ab is sum(delta * conv(x, e_ab))
        let image = image_4x4();
        let delta = Grid::from_fn(4, 4, |r, c| (r as f64) - 2. * (c as f64) + 1.);
        let padded = PaddedImage::from_image(&image, 3);
        let grad = kernel_gradient(&padded, &delta, 3);
        for a in 0..3 {
            for b in 0..3 {
                let out = convolve(&image, &unit_kernel(3, a, b));
                let expected = crate::grid::dot(out.as_slice(), delta.as_slice());
                assert_eq!(grad.at(a, b), expected);
            }
        }
    }
}
