use anyhow::Context;
use clap::Parser;
use log::info;

use iris::XgboostCli;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = XgboostCli::parse().into_config()?;
    let report = trainer::train(&config).context("boosting training failed")?;

    if let Some(eval) = &report.eval {
        info!("eval accuracy {:.4} over {} rows", eval.accuracy, eval.rows);
    }
    info!(
        "train accuracy {:.4}, model published to {}",
        report.train.accuracy,
        report.artifact.display()
    );
    Ok(())
}
