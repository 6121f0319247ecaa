use chrono_tz::Tz;
use serde_json::Value;

use crate::models::{Feature, GeoPoint, display_value};
use crate::richtext::AnnotationBuilder;
use crate::text::{elapsed_secs, format_medium_datetime, format_open_duration};

use super::{PostStyle, append_credit};

pub(super) const MAP_LINK_TEXT: &str = "Find on Map >";
const ERROR_SOURCE_PREFIX: &str = "ERROR";

pub(super) struct IncidentStyle;

impl PostStyle for IncidentStyle {
    fn compose(&self, feature: &Feature, zone: Tz, out: &mut AnnotationBuilder) {
        let properties = &feature.properties;
        out.append(&format!(
            "{} {}\n\nStatus: {}",
            properties.category2,
            properties.location,
            properties.status.as_deref().unwrap_or_default()
        ));

        if let Some(size) = &properties.size_fmt {
            out.append(&format!("\nSize: {}", first_or_self(size)));
        }
        if let Some(resources) = &properties.resources {
            out.append(&format!("\nResources: {}", display_value(resources)));
        }

        out.append(&format!(
            "\n{}",
            format_medium_datetime(properties.updated, zone)
        ));
        let open_for = properties
            .created
            .map(|created| format_open_duration(elapsed_secs(created, properties.updated)))
            .unwrap_or_default();
        if !open_for.is_empty() {
            out.append(&format!(" - open {open_for}"));
        }

        let via = properties
            .source
            .as_deref()
            .filter(|source| !source.starts_with(ERROR_SOURCE_PREFIX));
        append_credit(out, &properties.source_org, via);
        out.append("\n");

        if let Some(point) = feature.location_point() {
            out.append_link(MAP_LINK_TEXT, map_search_uri(point));
        }
    }
}

pub(super) fn map_search_uri(point: GeoPoint) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        point.lat, point.lon
    )
}

fn first_or_self(value: &Value) -> String {
    match value {
        Value::Array(items) => items.first().map(display_value).unwrap_or_default(),
        other => display_value(other),
    }
}
