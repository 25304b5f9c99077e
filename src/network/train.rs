use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::{
    config::{ConfigError, Geometry, Split, TrainConfig, TrainVariant},
    dataset::{check_split, Sample},
    param::Params,
    report::{EpochPrinter, EpochReport, Reporter},
    stats::{Evaluation, Tally},
};

use super::{backprop::backward, inference::forward, Scratch};

const _: fn() = || {
    fn assert_send<T: Send + 'static>() {}
    assert_send::<Trainer>();
};

/// Per-sample stochastic gradient descent over one set of parameters
///
/// Each trainer owns its parameters, its sample index stream and its scratch
/// memory, so independent runs can live on separate threads.
#[derive(Debug)]
pub struct Trainer {
    config: TrainConfig,
    geometry: Geometry,
    params: Params,
    scratch: Scratch,
    rng: StdRng,
}
impl Trainer {
    /// Validates `config` and `params` against `image_side × image_side`
    /// images
    pub fn new(config: TrainConfig, params: Params, image_side: usize) -> Result<Self, ConfigError> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(config, params, image_side, rng)
    }

    /// Draw the initial parameters from the seeded generator, which then
    /// goes on to pick training samples
    pub fn with_random_params(config: TrainConfig, image_side: usize) -> Result<Self, ConfigError> {
        let geometry = config.geometry(image_side)?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let params = Params::random(&geometry, &mut rng);
        Self::with_rng(config, params, image_side, rng)
    }

    fn with_rng(
        config: TrainConfig,
        params: Params,
        image_side: usize,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        let geometry = config.geometry(image_side)?;
        params.validate(&geometry)?;
        debug!(?config, ?geometry, "trainer ready");
        Ok(Self {
            scratch: Scratch::new(&geometry),
            config,
            geometry,
            params,
            rng,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
    pub fn into_params(self) -> Params {
        self.params
    }

    /// Run the configured number of epochs
    ///
    /// Each epoch draws `training.len()` samples uniformly with replacement,
    /// then evaluates `validation` without updating anything.
    pub fn train(
        &mut self,
        training: &[Sample],
        validation: &[Sample],
        reporter: &mut impl Reporter,
    ) -> Result<(), ConfigError> {
        let side = self.geometry.image_side();
        check_split(training, side, Split::Training)?;
        check_split(validation, side, Split::Validation)?;

        let update = self.config.update();
        let step_size = self.config.eta;
        let steps = training.len();
        let mut tally = Tally::new();
        reporter.start();
        for epoch in 1..=self.config.epochs {
            tally.reset();
            for step in 0..steps {
                let sample = &training[self.rng.gen_range(0..steps)];
                let outcome = forward(&self.params, &sample.image, sample.label, &mut self.scratch);
                tally.push(outcome.loss, outcome.correct);
                let gradients = backward(
                    &self.params,
                    sample.label,
                    &outcome,
                    &mut self.scratch,
                    update,
                );
                self.params.descend(&gradients, step_size);
                reporter.progress(step, steps);
            }
            let train = tally.evaluation();
            let valid = self.evaluate_unchecked(validation);
            let report = EpochReport::new(epoch, train, valid);
            debug!(samples = tally.count(), ?report, "epoch finished");
            reporter.epoch(&report);
        }
        Ok(())
    }

    /// Mean loss and accuracy over `samples` with the current parameters
    pub fn evaluate(&mut self, samples: &[Sample], split: Split) -> Result<Evaluation, ConfigError> {
        check_split(samples, self.geometry.image_side(), split)?;
        Ok(self.evaluate_unchecked(samples))
    }

    fn evaluate_unchecked(&mut self, samples: &[Sample]) -> Evaluation {
        let mut tally = Tally::new();
        for sample in samples {
            let outcome = forward(&self.params, &sample.image, sample.label, &mut self.scratch);
            tally.push(outcome.loss, outcome.correct);
        }
        tally.evaluation()
    }
}

/// Train a fresh network the way `variant` says, printing the weights'
/// starting quality before the first epoch
pub fn run_variant(
    variant: TrainVariant,
    base: &TrainConfig,
    image_side: usize,
    training: &[Sample],
    validation: &[Sample],
    printer: &mut EpochPrinter,
) -> Result<Params, ConfigError> {
    let mut trainer = Trainer::with_random_params(variant.configure(base), image_side)?;
    printer.print_title(variant.title());
    let train = trainer.evaluate(training, Split::Training)?;
    let valid = trainer.evaluate(validation, Split::Validation)?;
    printer.print_initial(train, valid);
    trainer.train(training, validation, printer)?;
    Ok(trainer.into_params())
}
