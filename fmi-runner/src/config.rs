use std::path::{Path, PathBuf};

use crate::Error;

/// Immutable description of a single run.
///
/// Building a `RunConfig` does not check it; [`RunConfig::validate`] does, and
/// [`crate::SimulationRunner`] validates every config before invoking any collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    model_name: String,
    model_file_path: PathBuf,
    start_time: f64,
    final_time: f64,
}

impl RunConfig {
    pub fn new(
        model_name: impl Into<String>,
        model_file_path: impl Into<PathBuf>,
        start_time: f64,
        final_time: f64,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            model_file_path: model_file_path.into(),
            start_time,
            final_time,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn model_file_path(&self) -> &Path {
        &self.model_file_path
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn final_time(&self) -> f64 {
        self.final_time
    }

    /// Both bounds must be finite and `final_time >= start_time`.
    pub fn validate(&self) -> Result<(), Error> {
        let finite = self.start_time.is_finite() && self.final_time.is_finite();
        if !finite || self.final_time < self.start_time {
            return Err(Error::InvalidInterval {
                start_time: self.start_time,
                final_time: self.final_time,
            });
        }
        Ok(())
    }
}
