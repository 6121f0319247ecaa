use std::path::PathBuf;

use clap::Args;

use super::parsers::parse_min_one_u64;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Seconds between poll cycles; overrides UPDATE_TIME.
    #[arg(long, value_parser = parse_min_one_u64)]
    pub interval_secs: Option<u64>,
    /// Stop after this many cycles. 0 polls forever.
    #[arg(long, default_value_t = 0)]
    pub max_cycles: u32,
    /// Log posts instead of publishing them, whatever POST_TO_BSKY says.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct OnceArgs {
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// GeoJSON feature collection in the upstream feed format.
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,
}
