use chrono_tz::Tz;

use crate::models::{Feature, display_value};
use crate::richtext::AnnotationBuilder;
use crate::text::{format_medium_datetime, truncate_bytes};

use super::{PostStyle, append_credit};

pub(super) const DETAIL_LINK_TEXT: &str = "Full Details >";
pub(super) const WARNING_LOCATION_MAX_BYTES: usize = 160;

pub(super) struct WarningStyle;

impl PostStyle for WarningStyle {
    fn compose(&self, feature: &Feature, zone: Tz, out: &mut AnnotationBuilder) {
        let properties = &feature.properties;
        let location = truncate_bytes(&properties.location, WARNING_LOCATION_MAX_BYTES);
        out.append(&format!(
            "{}\n{}\n{}\n{}\n",
            properties.name.as_deref().unwrap_or_default(),
            properties.action.as_deref().unwrap_or_default(),
            location,
            format_medium_datetime(properties.updated, zone)
        ));

        let source_id = properties
            .source_id
            .as_ref()
            .map(display_value)
            .unwrap_or_default();
        out.append_link(DETAIL_LINK_TEXT, warning_details_uri(&source_id));
        append_credit(out, &properties.source_org, None);
    }
}

pub(super) fn warning_details_uri(source_id: &str) -> String {
    format!("http://emergency.vic.gov.au/respond/#!/warning/{source_id}/moreinfo")
}
