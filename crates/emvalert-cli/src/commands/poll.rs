use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use emvalert_core::config::PostingConfig;
use emvalert_core::models::PassReport;
use emvalert_core::{
    AlertContext, AppConfig, BlueskyClient, DryRunSink, FeedSource, HttpFeedClient, PostSink,
};

#[derive(Debug, serde::Serialize, Default, PartialEq, Eq)]
pub(super) struct PollSummary {
    pub(super) cycles: u32,
    pub(super) passes: u32,
    pub(super) failures: u32,
    pub(super) posted: usize,
}

pub(super) fn build_sink(config: &PostingConfig) -> emvalert_core::Result<Box<dyn PostSink>> {
    if config.enabled {
        Ok(Box::new(BlueskyClient::new(config)?))
    } else {
        tracing::info!("posting disabled; rendered posts are logged only");
        Ok(Box::new(DryRunSink::new()))
    }
}

pub(super) fn run_once(config: &AppConfig) -> emvalert_core::Result<PassReport> {
    let source = HttpFeedClient::new(&config.feed)?;
    let mut sink = build_sink(&config.posting)?;
    let mut context = AlertContext::new(config.poll.retention_days);
    context.prime(&source, Utc::now());
    context.run_pass(&source, sink.as_mut(), Utc::now())
}

pub(super) fn run_poll_loop(config: &AppConfig, max_cycles: u32) -> Result<PollSummary> {
    let source = HttpFeedClient::new(&config.feed).context("failed to create feed client")?;
    let mut sink = build_sink(&config.posting).context("failed to create post sink")?;
    let mut context = AlertContext::new(config.poll.retention_days);
    context.prime(&source, Utc::now());

    tracing::info!(
        interval_secs = config.poll.interval_secs,
        retention_days = config.poll.retention_days,
        posting = config.posting.enabled,
        "polling started"
    );
    Ok(run_cycles(
        &mut context,
        &source,
        sink.as_mut(),
        Duration::from_secs(config.poll.interval_secs),
        max_cycles,
    ))
}

/// Sleeps, then runs one pass, strictly one cycle after another. A failed cycle is logged
/// and the next one starts after the usual delay.
pub(super) fn run_cycles<S>(
    context: &mut AlertContext,
    source: &S,
    sink: &mut dyn PostSink,
    interval: Duration,
    max_cycles: u32,
) -> PollSummary
where
    S: FeedSource + ?Sized,
{
    let mut summary = PollSummary::default();
    loop {
        if max_cycles > 0 && summary.cycles >= max_cycles {
            break;
        }
        thread::sleep(interval);
        summary.cycles += 1;

        match context.run_pass(source, sink, Utc::now()) {
            Ok(report) => {
                if report.ran {
                    summary.passes += 1;
                }
                summary.posted += report.posted;
            }
            Err(err) => {
                summary.failures += 1;
                tracing::warn!(code = err.code(), error = %err, "poll cycle failed");
            }
        }
    }
    summary
}
