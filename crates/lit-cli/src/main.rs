//! LIT layout inspector CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use serde::Serialize;
use tracing::level_filters::LevelFilter;

use lit_cli::commands::{RenderRequest, run_layouts, run_modules, run_render};
use lit_cli::logging::{LogConfig, LogFormat, init_logging};
use lit_cli::summary::{layouts_table, modules_table, print_render_report};

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, RenderArgs};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let outcome = match cli.command {
        Command::Render(args) => render(&args),
        Command::Layouts(args) => run_layouts(&args.catalog).and_then(|listings| {
            if args.json {
                print_json(&listings)
            } else {
                println!("{}", layouts_table(&listings));
                Ok(())
            }
        }),
        Command::Modules(args) => {
            let listings = run_modules();
            if args.json {
                print_json(&listings)
            } else {
                println!("{}", modules_table(&listings));
                Ok(())
            }
        }
    };
    let exit_code = match outcome {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn render(args: &RenderArgs) -> Result<()> {
    let request = RenderRequest {
        catalog: args.catalog.clone(),
        layout: args.layout.clone(),
        models: args.models.clone(),
        dataset: args.dataset.clone(),
        compare: args.compare,
        url_config: args.url_config.clone(),
    };
    let report = run_render(&request)?;
    if args.json {
        print_json(&report)
    } else {
        print_render_report(&report);
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
