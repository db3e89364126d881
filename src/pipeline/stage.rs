//! Stage abstraction for the audit pipeline.
//!
//! Each stage consumes the output of earlier stages plus read-only reference
//! data and returns a new derived collection. [`run_stage`] is the single
//! place that wraps a stage in a tracing span and marks the observability
//! phase, so any failure or crash report names the stage it came from.

use crate::errors::AuditError;
use crate::observability::{advance_progress, set_phase, AuditPhase};
use std::marker::PhantomData;
use std::time::Instant;
use tracing::{debug, info_span};

/// A pipeline stage that transforms data.
///
/// The type system ensures stages can only be chained when their types align:
/// ```rust,ignore
/// let dates = run_stage(&round_dates, schedule)?;     // Input: A, Output: B
/// let candidates = run_stage(&filter, (window, dates))?; // Input: B, ...
/// ```
pub trait Stage {
    type Input;
    type Output;
    type Error;

    /// Execute this stage with the given input.
    fn execute(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;

    /// Stage name used in spans, logs and error context.
    fn name(&self) -> &'static str;

    /// Phase recorded for crash reports while the stage runs.
    fn phase(&self) -> AuditPhase;
}

/// A stage that cannot fail.
///
/// ```rust,ignore
/// let stage = PureStage::new("baseline", AuditPhase::Baseline, |prior| {
///     snapshot_baselines(&prior, &reference)
/// });
/// ```
pub struct PureStage<F, I, O> {
    name: &'static str,
    phase: AuditPhase,
    func: F,
    _phantom: PhantomData<(I, O)>,
}

impl<F, I, O> PureStage<F, I, O>
where
    F: Fn(I) -> O,
{
    pub fn new(name: &'static str, phase: AuditPhase, func: F) -> Self {
        Self {
            name,
            phase,
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, I, O> Stage for PureStage<F, I, O>
where
    F: Fn(I) -> O,
{
    type Input = I;
    type Output = O;
    type Error = AuditError;

    fn execute(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        Ok((self.func)(input))
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn phase(&self) -> AuditPhase {
        self.phase
    }
}

/// A stage that can reject its input, e.g. on a missing continent tag.
pub struct FallibleStage<F, I, O> {
    name: &'static str,
    phase: AuditPhase,
    func: F,
    _phantom: PhantomData<(I, O)>,
}

impl<F, I, O> FallibleStage<F, I, O>
where
    F: Fn(I) -> Result<O, AuditError>,
{
    pub fn new(name: &'static str, phase: AuditPhase, func: F) -> Self {
        Self {
            name,
            phase,
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, I, O> Stage for FallibleStage<F, I, O>
where
    F: Fn(I) -> Result<O, AuditError>,
{
    type Input = I;
    type Output = O;
    type Error = AuditError;

    fn execute(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        (self.func)(input)
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn phase(&self) -> AuditPhase {
        self.phase
    }
}

/// Run one stage inside its span and phase guard.
pub fn run_stage<S>(stage: &S, input: S::Input) -> Result<S::Output, S::Error>
where
    S: Stage,
{
    let output = {
        let span = info_span!("stage", name = stage.name());
        let _span = span.enter();
        let _phase = set_phase(stage.phase());

        let started = Instant::now();
        let output = stage.execute(input);
        debug!(
            stage = stage.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = output.is_ok(),
            "Stage finished"
        );
        output
    };
    if output.is_ok() {
        advance_progress();
    }
    output
}
