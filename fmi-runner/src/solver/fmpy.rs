use std::{ffi::OsString, path::PathBuf, process::Command};

use fmi_schema::InterfaceType;

use crate::{
    error::SimulationError, loader::LoadedFmu, result::SimulationResult, traits::Solver,
};

use super::SimParams;

const RESULT_FILE: &str = "result.csv";

/// Integration method used by FMPy for Model Exchange FMUs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Integrator {
    /// Explicit Euler with the output interval as step size
    Euler,
    /// SUNDIALS CVode (variable step, BDF)
    Cvode,
}

impl Integrator {
    fn as_str(&self) -> &'static str {
        match self {
            Integrator::Euler => "Euler",
            Integrator::Cvode => "CVode",
        }
    }
}

/// Simulates FMUs with the `fmpy` command line tool and reads back its CSV output.
#[derive(Clone, Debug)]
pub struct FmpySolver {
    /// The `fmpy` executable
    pub program: PathBuf,
    pub integrator: Option<Integrator>,
    /// Output interval, defaults to the model's `DefaultExperiment`
    pub output_interval: Option<f64>,
    /// Relative tolerance, defaults to the model's `DefaultExperiment`
    pub tolerance: Option<f64>,
    /// Also record the values before and after events, producing repeated time points
    pub record_events: bool,
}

impl Default for FmpySolver {
    fn default() -> Self {
        Self {
            program: PathBuf::from("fmpy"),
            integrator: None,
            output_interval: None,
            tolerance: None,
            record_events: false,
        }
    }
}

impl FmpySolver {
    /// Command line arguments for simulating `model` with `params`, writing to `output_file`.
    pub fn args(
        &self,
        model: &LoadedFmu,
        params: &SimParams,
        output_file: &std::path::Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "simulate".into(),
            model.archive_path().into(),
            "--start-time".into(),
            params.start_time.to_string().into(),
            "--stop-time".into(),
            params.stop_time.to_string().into(),
            "--output-interval".into(),
            params.output_interval.to_string().into(),
            "--fmi-type".into(),
            model.interface().to_string().into(),
            "--output-file".into(),
            output_file.into(),
        ];

        if let Some(tolerance) = params.tolerance {
            args.extend(["--relative-tolerance".into(), tolerance.to_string().into()]);
        }

        if let (Some(integrator), InterfaceType::ModelExchange) = (self.integrator, model.interface())
        {
            args.extend(["--solver".into(), integrator.as_str().into()]);
        }

        if !self.record_events {
            args.push("--dont-record-events".into());
        }

        args
    }
}

impl Solver<LoadedFmu> for FmpySolver {
    fn simulate(
        &self,
        model: LoadedFmu,
        start_time: f64,
        final_time: f64,
    ) -> Result<SimulationResult, SimulationError> {
        let params = SimParams::new(
            start_time,
            final_time,
            self.output_interval,
            self.tolerance,
            model.model_description().default_experiment.as_ref(),
        )?;
        log::debug!(
            "Simulating [{}, {}] with output interval {} ({} points)",
            params.start_time,
            params.stop_time,
            params.output_interval,
            params.num_points()
        );

        let out_dir = tempfile::Builder::new().prefix("fmi-runner-sim").tempdir()?;
        let output_file = out_dir.path().join(RESULT_FILE);
        let args = self.args(&model, &params, &output_file);
        log::trace!("{:?} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| SimulationError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
            log::debug!("fmpy: {line}");
        }

        if !output.status.success() {
            return Err(SimulationError::SolverFailed {
                status: format!("exited with {}", output.status),
                output: format!("{stdout}{stderr}").trim_end().to_owned(),
            });
        }

        if !output_file.is_file() {
            return Err(SimulationError::MissingOutput(output_file));
        }

        SimulationResult::read_csv(&output_file)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        compiler::FmuArchive,
        loader::FmuLoader,
        test_util::{write_fmu, FmuContents},
        traits::Loader,
    };

    use super::*;

    fn loaded(dir: &std::path::Path) -> LoadedFmu {
        let path = write_fmu(dir, "HelloWorld.fmu", FmuContents::valid("2.0", "HelloWorld"));
        FmuLoader::default()
            .load(FmuArchive::new("HelloWorld", path))
            .unwrap()
    }

    #[test]
    fn test_args() {
        let dir = tempfile::tempdir().unwrap();
        let model = loaded(dir.path());
        let solver = FmpySolver {
            integrator: Some(Integrator::Cvode),
            ..Default::default()
        };
        let params = SimParams::new(
            0.0,
            5.0,
            None,
            Some(1e-6),
            model.model_description().default_experiment.as_ref(),
        )
        .unwrap();

        let args = solver.args(&model, &params, std::path::Path::new("out.csv"));
        let args = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>();

        assert_eq!(args[0], "simulate");
        assert!(args[1].ends_with("HelloWorld.fmu"));
        assert_eq!(
            args[2..],
            [
                "--start-time",
                "0",
                "--stop-time",
                "5",
                "--output-interval",
                "0.5",
                "--fmi-type",
                "ModelExchange",
                "--output-file",
                "out.csv",
                "--relative-tolerance",
                "0.000001",
                "--solver",
                "CVode",
                "--dont-record-events",
            ]
        );
    }

    #[test]
    fn test_invalid_interval_does_not_launch() {
        let dir = tempfile::tempdir().unwrap();
        let solver = FmpySolver {
            program: PathBuf::from("/definitely/not/fmpy"),
            ..Default::default()
        };
        assert!(matches!(
            solver.simulate(loaded(dir.path()), 5.0, 0.0),
            Err(SimulationError::InvalidInterval { .. })
        ));
    }

    #[test_log::test]
    fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let solver = FmpySolver {
            program: PathBuf::from("/definitely/not/fmpy"),
            ..Default::default()
        };
        assert!(matches!(
            solver.simulate(loaded(dir.path()), 0.0, 5.0),
            Err(SimulationError::Launch { .. })
        ));
    }
}
