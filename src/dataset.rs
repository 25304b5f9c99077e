use serde::{Deserialize, Serialize};

use crate::{
    config::{ConfigError, Split},
    grid::Grid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Negative,
    Positive,
}
impl Label {
    /// The label as the target $y \in \{0, 1\}$
    pub fn value(self) -> f64 {
        match self {
            Label::Negative => 0.,
            Label::Positive => 1.,
        }
    }

    /// `Positive` iff `probability` is strictly greater than one half
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.5 {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}
impl From<bool> for Label {
    fn from(value: bool) -> Self {
        if value {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

/// A normalized square image and its label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub image: Grid,
    pub label: Label,
}
impl Sample {
    pub fn new(image: Grid, label: Label) -> Self {
        Self { image, label }
    }
}

/// Every image in `samples` is `side × side` and there is at least one
pub fn check_split(samples: &[Sample], side: usize, split: Split) -> Result<(), ConfigError> {
    if samples.is_empty() {
        return Err(ConfigError::EmptySplit(split));
    }
    for (index, sample) in samples.iter().enumerate() {
        let actual = sample.image.shape();
        if actual != (side, side) {
            return Err(ConfigError::ImageShape {
                split,
                index,
                expected: (side, side),
                actual,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_is_negative() {
        assert_eq!(Label::from_probability(0.5), Label::Negative);
        assert_eq!(Label::from_probability(0.5000001), Label::Positive);
        assert_eq!(Label::from_probability(0.), Label::Negative);
    }

    #[test]
    fn split_shapes_are_checked() {
        let samples = vec![
            Sample::new(Grid::zeros(4, 4), Label::Negative),
            Sample::new(Grid::zeros(4, 3), Label::Positive),
        ];
        assert_eq!(
            check_split(&samples, 4, Split::Validation),
            Err(ConfigError::ImageShape {
                split: Split::Validation,
                index: 1,
                expected: (4, 4),
                actual: (4, 3),
            })
        );
        assert_eq!(check_split(&samples[..1], 4, Split::Training), Ok(()));
        assert_eq!(
            check_split(&[], 4, Split::Training),
            Err(ConfigError::EmptySplit(Split::Training))
        );
    }
}
