use clap::{Parser, Subcommand};

mod args;
mod parsers;

#[cfg(test)]
mod tests;

pub use args::{OnceArgs, RenderArgs, RunArgs};

#[derive(Debug, Parser)]
#[command(name = "emvalert")]
#[command(about = "Post Emergency Management Victoria feed changes to Bluesky", version)]
pub struct Cli {
    /// Emit diagnostic output (same as DEBUG=Y).
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Poll the feed until interrupted (or for `--max-cycles`).
    Run(RunArgs),
    /// Probe, run a single pass and print the pass report.
    Once(OnceArgs),
    /// Render every record of a local GeoJSON feed file without posting.
    Render(RenderArgs),
}
