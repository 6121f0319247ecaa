use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::detect::ObservedStateMap;
use crate::error::Result;
use crate::feed_client::FeedSource;
use crate::models::ModifiedStub;

pub const DEFAULT_RETENTION_DAYS: u32 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CutoffWatermark {
    pub last_processed: Option<DateTime<Utc>>,
    pub last_upstream_modified: Option<DateTime<Utc>>,
}

/// Gates full passes on the upstream "last modified" stub and tracks how far processing got.
#[derive(Debug, Clone, Default)]
pub struct CutoffController {
    watermark: CutoffWatermark,
}

impl CutoffController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watermark(&self) -> CutoffWatermark {
        self.watermark
    }

    /// Cutoff for change detection. Before the first probe this is `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.watermark.last_processed.unwrap_or(now)
    }

    /// Fetches the stub and decides whether a full pass is warranted.
    pub fn probe<S>(&mut self, source: &S, now: DateTime<Utc>) -> bool
    where
        S: FeedSource + ?Sized,
    {
        self.record_probe(source.fetch_modified_stub(), now)
    }

    /// A failed probe counts as "modified now"; the first probe ever also starts the
    /// processing clock at `now`, so no backlog is replayed.
    pub fn record_probe(&mut self, outcome: Result<ModifiedStub>, now: DateTime<Utc>) -> bool {
        let last_modified = match outcome {
            Ok(stub) => stub.last_modified,
            Err(err) => {
                tracing::debug!(error = %err, "modified probe failed; assuming upstream changed");
                now
            }
        };
        self.watermark.last_upstream_modified = Some(last_modified);
        let last_processed = *self.watermark.last_processed.get_or_insert(now);

        tracing::debug!(
            last_processed = %last_processed,
            last_upstream_modified = %last_modified,
            "probe"
        );
        last_modified > last_processed
    }

    pub fn advance(&mut self, now: DateTime<Utc>) {
        self.watermark.last_processed = Some(now);
    }

    /// Removes observed records not updated within `retention_days` of `now`.
    pub fn purge(
        &self,
        observed: &mut ObservedStateMap,
        retention_days: u32,
        now: DateTime<Utc>,
    ) -> usize {
        let cutoff = now - Duration::days(i64::from(retention_days));
        let purged = observed.retain_updated_since(cutoff);
        if purged > 0 {
            tracing::debug!(purged, remaining = observed.len(), "purged stale records");
        }
        purged
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::AlertError;

    fn at(raw: &str) -> DateTime<Utc> {
        raw.parse().expect("timestamp")
    }

    fn stub(raw: &str) -> Result<ModifiedStub> {
        Ok(ModifiedStub {
            last_modified: at(raw),
        })
    }

    #[test]
    fn first_probe_starts_clock_at_now_and_skips_backlog() {
        let mut controller = CutoffController::new();
        let now = at("2024-01-05T04:00:00Z");
        assert!(!controller.record_probe(stub("2024-01-05T03:59:00Z"), now));
        assert_eq!(controller.watermark().last_processed, Some(now));
        assert_eq!(
            controller.watermark().last_upstream_modified,
            Some(at("2024-01-05T03:59:00Z"))
        );
    }

    #[test]
    fn later_upstream_modification_warrants_a_pass() {
        let mut controller = CutoffController::new();
        controller.record_probe(stub("2024-01-05T03:59:00Z"), at("2024-01-05T04:00:00Z"));
        assert!(controller.record_probe(stub("2024-01-05T04:01:00Z"), at("2024-01-05T04:02:00Z")));
        assert!(!controller.record_probe(stub("2024-01-05T04:00:00Z"), at("2024-01-05T04:03:00Z")));
    }

    #[test]
    fn failed_probe_assumes_modified_now() {
        let mut controller = CutoffController::new();
        controller.record_probe(stub("2024-01-05T03:59:00Z"), at("2024-01-05T04:00:00Z"));

        let now = at("2024-01-05T04:05:00Z");
        let failed = Err(AlertError::UpstreamStatus {
            endpoint: "modified".to_string(),
            status: 502,
        });
        assert!(controller.record_probe(failed, now));
        assert_eq!(controller.watermark().last_upstream_modified, Some(now));
    }

    #[test]
    fn failed_first_probe_does_not_run() {
        let mut controller = CutoffController::new();
        let now = at("2024-01-05T04:00:00Z");
        let failed = Err(AlertError::Internal("offline".to_string()));
        assert!(!controller.record_probe(failed, now));
        assert_eq!(controller.cutoff(now), now);
    }

    #[test]
    fn advance_moves_cutoff_forward() {
        let mut controller = CutoffController::new();
        controller.record_probe(stub("2024-01-05T03:00:00Z"), at("2024-01-05T04:00:00Z"));
        controller.advance(at("2024-01-05T05:00:00Z"));
        assert_eq!(
            controller.cutoff(at("2024-01-05T06:00:00Z")),
            at("2024-01-05T05:00:00Z")
        );
    }

    #[test]
    fn purge_with_four_day_retention_keeps_three_day_old_record() {
        let now = at("2024-01-10T00:00:00Z");
        let mut observed = ObservedStateMap::new();
        for (id, updated) in [
            ("five-days", "2024-01-05T00:00:00Z"),
            ("three-days", "2024-01-07T00:00:00Z"),
        ] {
            let properties = serde_json::from_value(json!({"id": id, "updated": updated}))
                .expect("properties");
            observed.observe(properties);
        }

        let purged = CutoffController::new().purge(&mut observed, DEFAULT_RETENTION_DAYS, now);
        assert_eq!(purged, 1);
        assert!(!observed.contains("five-days"));
        assert!(observed.contains("three-days"));
    }
}
