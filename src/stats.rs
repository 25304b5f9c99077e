/// Incremental mean of a stream of observations
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningAverage {
    count: usize,
    mean: f64,
}
impl RunningAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        self.count += 1;
        self.mean += (x - self.mean) / self.count as f64;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// `0` before the first observation
    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Mean loss and accuracy over a set of samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub loss: f64,
    pub accuracy: f64,
}

/// Running loss and accuracy
#[derive(Debug, Clone, Default)]
pub struct Tally {
    loss: RunningAverage,
    accuracy: RunningAverage,
}
impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, loss: f64, correct: bool) {
        self.loss.push(loss);
        self.accuracy.push(if correct { 1. } else { 0. });
    }

    pub fn count(&self) -> usize {
        self.loss.count()
    }

    pub fn evaluation(&self) -> Evaluation {
        Evaluation {
            loss: self.loss.mean(),
            accuracy: self.accuracy.mean(),
        }
    }

    pub fn reset(&mut self) {
        self.loss.reset();
        self.accuracy.reset();
    }
}
