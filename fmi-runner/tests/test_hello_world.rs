//! End-to-end runs of the HelloWorld model. These need OpenModelica (`omc`) and FMPy (`fmpy`) on
//! the `PATH`, or `OPENMODELICA_OMC` / `FMI_RUNNER_FMPY` pointing at them:
//!
//! ```shell
//! cargo test -p fmi-runner --test test_hello_world -- --ignored
//! ```

use std::path::PathBuf;

use float_cmp::assert_approx_eq;
use fmi_runner::{
    compiler::OmcCompiler, loader::FmuLoader, solver::FmpySolver, RunConfig, RunState,
    SimulationRunner, Stage,
};

fn hello_world() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/HelloWorld.mo")
}

fn runner() -> SimulationRunner<OmcCompiler, FmuLoader, FmpySolver> {
    let compiler = OmcCompiler {
        program: std::env::var_os("OPENMODELICA_OMC")
            .map(PathBuf::from)
            .unwrap_or_else(|| "omc".into()),
        ..Default::default()
    };
    let solver = FmpySolver {
        program: std::env::var_os("FMI_RUNNER_FMPY")
            .map(PathBuf::from)
            .unwrap_or_else(|| "fmpy".into()),
        ..Default::default()
    };
    SimulationRunner::new(compiler, FmuLoader::default(), solver)
}

#[test_log::test]
#[ignore = "requires omc and fmpy"]
fn test_hello_world() {
    let config = RunConfig::new("HelloWorld", hello_world(), 0.0, 5.0);
    let report = runner().run_with_report(&config);
    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.timings.len(), 4);

    let result = report.into_result().expect("Error simulating HelloWorld");
    assert!(!result.is_empty());
    assert_eq!(result.start_time(), 0.0);
    assert_approx_eq!(f64, result.end_time(), 5.0, epsilon = 1e-9);

    // x(t) = exp(-t)
    let samples = result.samples().unwrap();
    let x = result
        .variable_names()
        .position(|name| name == "x")
        .expect("x is recorded");
    for sample in &samples {
        assert_approx_eq!(f64, sample.values[x], (-sample.time).exp(), epsilon = 1e-3);
    }
}

#[test_log::test]
#[ignore = "requires omc and fmpy"]
fn test_hello_world_inverted_interval() {
    let config = RunConfig::new("HelloWorld", hello_world(), 5.0, 0.0);
    let report = runner().run_with_report(&config);
    assert_eq!(report.state, RunState::Failed(Stage::Validate));
    assert!(matches!(
        report.outcome,
        Err(fmi_runner::Error::InvalidInterval { .. })
    ));
}
