use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    dataset::{Label, Sample},
    grid::Grid,
};


/// `negatives` all-zero images followed by `positives` all-one images
pub fn constant_dataset(side: usize, negatives: usize, positives: usize) -> Vec<Sample> {
    let negative = Sample::new(Grid::filled(side, side, 0.), Label::Negative);
    let positive = Sample::new(Grid::filled(side, side, 1.), Label::Positive);
    let mut samples = vec![negative; negatives];
    samples.extend(std::iter::repeat(positive).take(positives));
    samples
}

/// Noisy images where positives carry a bright vertical stripe
pub fn stripe_dataset(side: usize, len: usize, seed: u64) -> Vec<Sample> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|i| {
            let label = Label::from(i % 2 == 1);
            let stripe = side / 2;
            let image = Grid::from_fn(side, side, |_, col| {
                let noise = rng.gen_range(-0.5..0.5);
                match label {
                    Label::Positive if col == stripe => 2. + noise,
                    _ => noise,
                }
            });
            Sample::new(image, label)
        })
        .collect()
}

pub fn is_unit_interval(x: f64) -> bool {
    (0. ..=1.).contains(&x)
}
