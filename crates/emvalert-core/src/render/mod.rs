mod incident;
mod warning;

use chrono_tz::Tz;

use crate::models::{Feature, FeedKind, FeedProperties, PostCandidate};
use crate::richtext::AnnotationBuilder;
use crate::text::strip_spaces;

use self::incident::IncidentStyle;
use self::warning::WarningStyle;

pub const DISPLAY_TIME_ZONE: Tz = chrono_tz::Australia::Melbourne;
pub const TRAILER_TAG: &str = "EMVAlert";

/// Body layout for one record kind. The shared trailer is appended by [`PostRenderer`].
trait PostStyle: Send + Sync {
    fn compose(&self, feature: &Feature, zone: Tz, out: &mut AnnotationBuilder);
}

fn style_for(kind: FeedKind) -> &'static dyn PostStyle {
    match kind {
        FeedKind::Incident => &IncidentStyle,
        FeedKind::Warning => &WarningStyle,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PostRenderer {
    zone: Tz,
}

impl Default for PostRenderer {
    fn default() -> Self {
        Self {
            zone: DISPLAY_TIME_ZONE,
        }
    }
}

impl PostRenderer {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Renders one changed record. Records of an unrecognised kind yield `None`.
    pub fn render(&self, feature: &Feature) -> Option<PostCandidate> {
        let properties = &feature.properties;
        let Some(kind) = properties.kind() else {
            tracing::info!(
                id = %properties.id,
                feed_type = %properties.feed_type,
                "unknown feed type"
            );
            return None;
        };

        let mut out = AnnotationBuilder::new();
        style_for(kind).compose(feature, self.zone, &mut out);
        if out.is_empty() {
            return None;
        }
        append_trailer(properties, &mut out);

        let (text, annotations) = out.finish();
        Some(PostCandidate {
            record_id: properties.id.clone(),
            kind,
            text,
            annotations,
        })
    }
}

/// `\nFrom #<sourceOrg>`, plus ` via <source>` when credited. A blank organisation gets no
/// tag, so a post never carries a bare `#`.
fn append_credit(out: &mut AnnotationBuilder, source_org: &str, via: Option<&str>) {
    if source_org.trim().is_empty() {
        if let Some(via) = via {
            out.append(&format!("\nFrom {via}"));
        }
        return;
    }
    out.append("\nFrom ").append_tag(source_org);
    if let Some(via) = via {
        out.append(&format!(" via {via}"));
    }
}

fn append_trailer(properties: &FeedProperties, out: &mut AnnotationBuilder) {
    out.append("\n").append_tag(TRAILER_TAG);
    out.append(" ").append_tag(&properties.feed_type);

    let category1 = strip_spaces(&properties.category1);
    if !category1.is_empty() {
        out.append(" ").append_tag(&category1);
    }
    if properties.category2 != properties.category1 {
        let category2 = strip_spaces(&properties.category2);
        if !category2.is_empty() {
            out.append(" ").append_tag(&category2);
        }
    }
}

#[cfg(test)]
mod tests;
