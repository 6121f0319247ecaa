use anyhow::Result;
use emvalert_core::AppConfig;

use crate::cli::{Cli, Commands};
use crate::logging::init_logging;

mod poll;
mod render;
mod support;


use self::poll::{run_once, run_poll_loop};
use self::render::render_file;
use self::support::{eprint_json, print_json};

pub(crate) fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::from_env();
    config.verbose |= cli.verbose;
    init_logging(config.verbose);

    match cli.command {
        Commands::Run(args) => {
            if let Some(interval_secs) = args.interval_secs {
                config.poll.interval_secs = interval_secs;
            }
            if args.dry_run {
                config.posting.enabled = false;
            }
            let summary = run_poll_loop(&config, args.max_cycles)?;
            print_json(&summary)?;
        }
        Commands::Once(args) => {
            if args.dry_run {
                config.posting.enabled = false;
            }
            match run_once(&config) {
                Ok(report) => print_json(&report)?,
                Err(err) => {
                    eprint_json(&err.to_payload("once"))?;
                    return Err(anyhow::Error::new(err).context("pass failed"));
                }
            }
        }
        Commands::Render(args) => {
            let candidates = render_file(&args.input)?;
            print_json(&candidates)?;
        }
    }
    Ok(())
}
