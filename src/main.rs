//! Fluency CLI entry point.

use anyhow::Context;
use clap::Parser;

use fluency::cli::{dispatch, handle_error, Cli, CliContext};
use fluency::infrastructure::logging::{LogConfig, LoggerImpl};

fn main() {
    let cli = Cli::parse();

    let ctx = match CliContext::load(cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(err) => handle_error(&err, cli.json),
    };

    let logger = match LogConfig::try_from(&ctx.config.logging)
        .and_then(|config| LoggerImpl::init(&config))
        .context("Failed to initialize logging")
    {
        Ok(logger) => logger,
        Err(err) => handle_error(&err, cli.json),
    };

    if let Err(err) = dispatch(cli.command, &ctx, cli.json) {
        drop(logger);
        handle_error(&err, cli.json);
    }
}
