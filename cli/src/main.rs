use std::{
    io::{stderr, stdout},
    process::ExitCode,
};

use bailian_multimodal::{Cli, report_error, run};
use clap::Parser;
use color_eyre::Result;
use log::LevelFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let mut logger = pretty_env_logger::formatted_builder();
    logger.filter_level(LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();
    color_eyre::install()?;

    let cli = Cli::parse();
    match run(&cli, &mut stdout().lock()).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(report) => Ok(report_error(cli.mode, &report, &mut stderr().lock())),
    }
}
