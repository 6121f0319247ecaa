use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{Feature, FeedProperties};

/// Most recently seen properties per feed identifier. Lives for the process only.
#[derive(Debug, Clone, Default)]
pub struct ObservedStateMap {
    records: HashMap<String, FeedProperties>,
}

impl ObservedStateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&FeedProperties> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replaces (never merges) whatever was stored for the record's identifier.
    pub fn observe(&mut self, properties: FeedProperties) {
        self.records.insert(properties.id.clone(), properties);
    }

    /// Drops every record last updated strictly before `cutoff`; returns how many went.
    pub fn retain_updated_since(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.records.len();
        self.records
            .retain(|_, properties| properties.updated >= cutoff);
        before - self.records.len()
    }
}

/// Whether `feature` is new or has changed status relative to `observed`.
pub fn is_changed(feature: &Feature, cutoff: DateTime<Utc>, observed: &ObservedStateMap) -> bool {
    let properties = &feature.properties;
    if properties.updated <= cutoff {
        return false;
    }
    match observed.get(&properties.id) {
        None => true,
        Some(previous) => properties
            .status
            .as_ref()
            .is_some_and(|status| previous.status.as_ref() != Some(status)),
    }
}

/// Returns the records, in feed order, that are newer than `cutoff` and either unseen or
/// carrying a different status. Each returned record replaces its entry in `observed`.
pub fn detect_changes(
    features: Vec<Feature>,
    cutoff: DateTime<Utc>,
    observed: &mut ObservedStateMap,
) -> Vec<Feature> {
    let mut changed = Vec::new();
    for feature in features {
        if !is_changed(&feature, cutoff, observed) {
            continue;
        }
        let properties = &feature.properties;
        tracing::debug!(
            id = %properties.id,
            "{} {} {} {}",
            properties.feed_type,
            properties.category1,
            properties.category2,
            properties.location
        );
        observed.observe(properties.clone());
        changed.push(feature);
    }
    changed
}
