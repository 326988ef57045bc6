use std::{io::Write, process::ExitCode};

use bailian_engine::{
    Config, DashScope, Mode, TaskError,
    config::{config_path, load_config},
    credential::resolve_api_key,
    dispatch::{Outcome, Task},
};
use color_eyre::{Report, Result};
use log::{debug, error};

pub mod cli;
pub use cli::Cli;

/// File config, with command line overrides applied on top.
pub fn effective_config(cli: &Cli) -> Result<Config> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => config_path()?,
    };
    let mut cfg = load_config(&path)?;

    if let Some(url) = &cli.base_url {
        cfg.compatible_base_url = url.clone();
    }
    if let Some(url) = &cli.generation_url {
        cfg.generation_url = url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        cfg.timeout_secs = secs;
    }
    debug!("Effective config:\n{cfg:#?}");
    Ok(cfg)
}

/// Resolves the key, validates the mode's arguments and runs the one task. Results go to `out`.
pub async fn run(cli: &Cli, out: &mut impl Write) -> Result<Outcome> {
    let cfg = effective_config(cli)?;
    let api_key = resolve_api_key(cli.api_key.as_deref())?;
    let task = Task::validate(cli.mode, cli.request())?;

    let client = DashScope::new(api_key, cfg)?;
    Ok(task.run(&client, out).await?)
}

/// Prints a failed run to `err_out`. Transport and parse failures get the full cause chain.
pub fn report_error(mode: Mode, report: &Report, err_out: &mut impl Write) -> ExitCode {
    let written = match report.downcast_ref::<TaskError>() {
        Some(err) if !err.is_transport_or_parse() => writeln!(err_out, "Error: {err}"),
        _ => writeln!(err_out, "Error running {mode} mode: {report:?}"),
    };
    if let Err(e) = written {
        error!("Couldn't report error: {e}");
    }
    ExitCode::FAILURE
}
