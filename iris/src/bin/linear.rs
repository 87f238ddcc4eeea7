use anyhow::Context;
use clap::Parser;
use log::info;

use iris::LinearCli;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = LinearCli::parse().into_config()?;
    let report = trainer::train(&config).context("linear training failed")?;

    info!(
        "train accuracy {:.4}, model published to {}",
        report.train.accuracy,
        report.artifact.display()
    );
    Ok(())
}
