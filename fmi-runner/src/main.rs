use clap::Parser;
use fmi_runner::{options::FmiRunnerOptions, simulate};

fn main() -> anyhow::Result<()> {
    let options = FmiRunnerOptions::parse();

    let level = options
        .verbose
        .log_level()
        .map_or("off".to_owned(), |level| level.as_str().to_lowercase());
    flexi_logger::Logger::try_with_env_or_str(level)?
        .set_palette("b1;3;2;4;6".to_string())
        .start()?;

    let report = simulate(&options);
    for timing in &report.timings {
        log::info!("  {}: {:?}", timing.stage, timing.elapsed);
    }
    log::info!(
        "{} finished in {:?}: {}",
        report.model_name,
        report.total_elapsed(),
        report.state
    );

    let result = report.into_result()?;

    match &options.output_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            result.write_csv(file)?;
            log::info!("Wrote {} samples to {}", result.len(), path.display());
        }
        None => println!("{result}"),
    }

    Ok(())
}
