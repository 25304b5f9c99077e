use std::time::{Duration, Instant};

use crate::stats::Evaluation;

/// Summary of one epoch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    /// Starts from 1
    pub epoch: usize,
    pub train_loss: f64,
    pub train_accuracy: f64,
    pub valid_loss: f64,
    pub valid_accuracy: f64,
}
impl EpochReport {
    pub fn new(epoch: usize, train: Evaluation, valid: Evaluation) -> Self {
        Self {
            epoch,
            train_loss: train.loss,
            train_accuracy: train.accuracy,
            valid_loss: valid.loss,
            valid_accuracy: valid.accuracy,
        }
    }
}

pub trait Reporter {
    /// Called once when training begins, before the first step
    fn start(&mut self) {}

    fn epoch(&mut self, report: &EpochReport);

    /// Called after each training step with `step < steps`
    fn progress(&mut self, _step: usize, _steps: usize) {}
}

impl Reporter for Vec<EpochReport> {
    fn epoch(&mut self, report: &EpochReport) {
        self.push(*report);
    }
}

/// Prints epoch summaries and training progress to stdout
#[derive(Debug)]
pub struct EpochPrinter {
    epoch_start: Instant,
    now: Instant,
    print_progress: bool,
}
impl EpochPrinter {
    pub fn new(print_progress: bool) -> Self {
        Self {
            epoch_start: Instant::now(),
            now: Instant::now(),
            print_progress,
        }
    }

    pub fn print_title(&self, title: &str) {
        let stars = "*".repeat(25);
        println!("{stars} {title} {stars}");
    }

    pub fn print_initial(&self, train: Evaluation, valid: Evaluation) {
        println!(
            "With original weights: train loss {:.2}, train acc {:.2}, valid loss {:.2}, valid acc {:.2}",
            train.loss, train.accuracy, valid.loss, valid.accuracy
        );
    }
}
impl Reporter for EpochPrinter {
    fn start(&mut self) {
        self.epoch_start = Instant::now();
        self.now = self.epoch_start;
    }

    fn epoch(&mut self, report: &EpochReport) {
        let elapsed = human_duration(self.epoch_start.elapsed());
        self.epoch_start = Instant::now();
        println!(
            "Epoch {}: train loss {:.2}, train acc {:.2}, valid loss {:.2}, valid acc {:.2}; {elapsed}",
            report.epoch,
            report.train_loss,
            report.train_accuracy,
            report.valid_loss,
            report.valid_accuracy,
        );
    }

    fn progress(&mut self, step: usize, steps: usize) {
        if !self.print_progress || !is_checkpoint(step, steps) {
            return;
        }
        let elapsed = human_duration(self.now.elapsed());
        self.now = Instant::now();
        println!("  sample {step}/{steps}; {elapsed}");
    }
}

/// Every tenth of an epoch, or every step when there are fewer than ten
fn is_checkpoint(step: usize, steps: usize) -> bool {
    match steps / 10 {
        0 => true,
        gap => step % gap == 0,
    }
}

pub fn human_duration(duration: Duration) -> String {
    const UNITS: [(f64, &str); 5] = [
        (3_600., "h"),
        (60., "min"),
        (1., "s"),
        (1e-3, "ms"),
        (1e-6, "us"),
    ];
    let seconds = duration.as_secs_f64();
    for (scale, unit) in UNITS {
        let value = seconds / scale;
        if 1. < value {
            return format!("{value:.2} {unit}");
        }
    }
    format!("{:.2} ns", seconds * 1e9)
}
