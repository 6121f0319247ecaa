use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::detect::{ObservedStateMap, detect_changes};
use crate::error::Result;
use crate::feed_client::FeedSource;
use crate::models::{Feature, PassReport, PostCandidate};
use crate::posting::PostSink;
use crate::render::PostRenderer;
use crate::watermark::{CutoffController, CutoffWatermark, DEFAULT_RETENTION_DAYS};

/// Everything one poller carries between cycles: observed records, the watermark and
/// the renderer. Passes take `&mut self`, so a context never runs two at once.
#[derive(Debug, Clone)]
pub struct AlertContext {
    observed: ObservedStateMap,
    controller: CutoffController,
    renderer: PostRenderer,
    retention_days: u32,
}

impl Default for AlertContext {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION_DAYS)
    }
}

impl AlertContext {
    pub fn new(retention_days: u32) -> Self {
        Self {
            observed: ObservedStateMap::new(),
            controller: CutoffController::new(),
            renderer: PostRenderer::default(),
            retention_days,
        }
    }

    pub fn with_renderer(mut self, renderer: PostRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn observed(&self) -> &ObservedStateMap {
        &self.observed
    }

    pub fn watermark(&self) -> CutoffWatermark {
        self.controller.watermark()
    }

    pub fn renderer(&self) -> &PostRenderer {
        &self.renderer
    }

    /// Startup probe: fixes the initial processing watermark.
    pub fn prime<S>(&mut self, source: &S, now: DateTime<Utc>)
    where
        S: FeedSource + ?Sized,
    {
        self.controller.probe(source, now);
    }

    /// One poll cycle. Observed state and the watermark only move when every rendered post
    /// was delivered. On a failure nothing advances, except that records whose posts already
    /// went out are remembered so the next cycle does not publish them twice.
    pub fn run_pass<S, P>(
        &mut self,
        source: &S,
        sink: &mut P,
        now: DateTime<Utc>,
    ) -> Result<PassReport>
    where
        S: FeedSource + ?Sized,
        P: PostSink + ?Sized,
    {
        let mut report = PassReport {
            cycle_id: Uuid::new_v4().to_string(),
            ..PassReport::default()
        };

        if !self.controller.probe(source, now) {
            tracing::debug!(cycle_id = %report.cycle_id, "upstream unchanged; skipping pass");
            return Ok(report);
        }
        report.ran = true;
        tracing::debug!(cycle_id = %report.cycle_id, "processing");

        let features = source.fetch_feed()?;
        report.fetched = features.len();

        let mut staged = self.observed.clone();
        let changed = detect_changes(features, self.controller.cutoff(now), &mut staged);
        report.changed = changed.len();
        if changed.is_empty() {
            return Ok(report);
        }

        let candidates = changed
            .iter()
            .filter_map(|feature| self.renderer.render(feature))
            .collect::<Vec<PostCandidate>>();
        report.unknown = changed.len() - candidates.len();

        if let Err(err) = sink.post_candidates(&candidates) {
            let delivered = &candidates[..err.delivered().min(candidates.len())];
            self.commit_delivered(&changed, delivered);
            tracing::warn!(
                cycle_id = %report.cycle_id,
                delivered = delivered.len(),
                pending = candidates.len() - delivered.len(),
                error = %err,
                "post batch aborted"
            );
            return Err(err);
        }
        report.posted = candidates.len();

        self.observed = staged;
        self.controller.advance(now);
        report.purged = self
            .controller
            .purge(&mut self.observed, self.retention_days, now);

        tracing::info!(
            cycle_id = %report.cycle_id,
            changed = report.changed,
            posted = report.posted,
            purged = report.purged,
            "pass complete"
        );
        Ok(report)
    }

    fn commit_delivered(&mut self, changed: &[Feature], delivered: &[PostCandidate]) {
        let delivered_ids = delivered
            .iter()
            .map(|candidate| candidate.record_id.as_str())
            .collect::<HashSet<_>>();
        for feature in changed {
            if delivered_ids.contains(feature.id()) {
                self.observed.observe(feature.properties.clone());
            }
        }
    }
}
