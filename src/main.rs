//! macroloop: record input once, replay it on a loop.

use clap::Parser;
use macroloop::cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let result = cli.to_config().and_then(|config| {
        log::debug!("{config:?}");
        macroloop::run(&config)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
