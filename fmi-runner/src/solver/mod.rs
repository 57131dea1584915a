//! [`crate::traits::Solver`] backends.

use fmi_schema::DefaultExperiment;

use crate::error::SimulationError;

mod fmpy;

pub use fmpy::{FmpySolver, Integrator};

/// Resolved parameters of a fixed-interval simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimParams {
    pub start_time: f64,
    pub stop_time: f64,
    pub output_interval: f64,
    pub tolerance: Option<f64>,
}

impl SimParams {
    /// Combine the requested interval with explicit options, falling back to the model's
    /// `DefaultExperiment`.
    pub fn new(
        start_time: f64,
        stop_time: f64,
        output_interval: Option<f64>,
        tolerance: Option<f64>,
        default_experiment: Option<&DefaultExperiment>,
    ) -> Result<Self, SimulationError> {
        if !(start_time.is_finite() && stop_time.is_finite()) || stop_time < start_time {
            return Err(SimulationError::InvalidInterval {
                start_time,
                final_time: stop_time,
            });
        }

        let span = stop_time - start_time;
        let output_interval = output_interval
            .or(default_experiment.and_then(|de| de.step_size))
            .unwrap_or(if span > 0.0 { span / 500.0 } else { 1.0 });

        if !(output_interval > 0.0 && output_interval.is_finite()) {
            return Err(SimulationError::InvalidOutputInterval(output_interval));
        }

        let tolerance = tolerance.or(default_experiment.and_then(|de| de.tolerance));

        Ok(Self {
            start_time,
            stop_time,
            output_interval,
            tolerance,
        })
    }

    /// Number of output points, including the start and stop time.
    pub fn num_points(&self) -> usize {
        ((self.stop_time - self.start_time) / self.output_interval).ceil() as usize + 1
    }
}
