use serde_json::{Value, json};

use super::incident::{MAP_LINK_TEXT, map_search_uri};
use super::warning::{DETAIL_LINK_TEXT, WARNING_LOCATION_MAX_BYTES, warning_details_uri};
use super::*;
use crate::models::{AnnotationKind, GeoPoint, Geometry};

fn feature(value: Value) -> Feature {
    serde_json::from_value(value).expect("feature fixture")
}

fn incident(extra: Value) -> Feature {
    let mut properties = json!({
        "id": "INC-1",
        "feedType": "incident",
        "status": "Going",
        "category1": "Fire",
        "category2": "Grass Fire",
        "location": "WANGARATTA",
        "sourceOrg": "CFA",
        "created": "2024-01-05T03:00:00Z",
        "updated": "2024-01-05T04:02:05Z"
    });
    if let (Value::Object(base), Value::Object(extra)) = (&mut properties, extra) {
        base.extend(extra);
    }
    feature(json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [146.3, -36.35]},
        "properties": properties
    }))
}

fn warning(location: &str) -> Feature {
    feature(json!({
        "type": "Feature",
        "geometry": {
            "type": "GeometryCollection",
            "geometries": [{"type": "Point", "coordinates": [145.0, -37.0]}]
        },
        "properties": {
            "id": "WARN-9",
            "feedType": "warning",
            "name": "Emergency Warning",
            "action": "Leave now",
            "location": location,
            "sourceId": 44012,
            "sourceOrg": "EMV",
            "category1": "Fire",
            "category2": "Fire",
            "updated": "2024-07-01T00:30:00Z"
        }
    }))
}

fn trailer_tags(candidate: &PostCandidate) -> Vec<String> {
    let trailer_start = candidate
        .text
        .rfind(&format!("\n#{TRAILER_TAG}"))
        .expect("trailer");
    candidate
        .annotations
        .iter()
        .filter(|annotation| annotation.byte_start > trailer_start)
        .filter_map(|annotation| match &annotation.kind {
            AnnotationKind::Tag { tag } => Some(tag.clone()),
            AnnotationKind::Link { .. } => None,
        })
        .collect()
}

fn assert_spans_match_text(candidate: &PostCandidate) {
    for annotation in &candidate.annotations {
        let covered = candidate
            .annotated_text(annotation)
            .expect("span inside text");
        match &annotation.kind {
            AnnotationKind::Tag { tag } => assert_eq!(covered, format!("#{tag}")),
            AnnotationKind::Link { .. } => {
                assert!(covered == MAP_LINK_TEXT || covered == DETAIL_LINK_TEXT)
            }
        }
    }
}

#[test]
fn minimal_incident_omits_optional_lines_and_carries_four_trailer_tags() {
    let candidate = PostRenderer::default()
        .render(&incident(json!({})))
        .expect("candidate");

    assert!(candidate.text.contains("Status: Going"));
    assert!(!candidate.text.contains("Size:"));
    assert!(!candidate.text.contains("Resources:"));
    assert!(!candidate.text.contains(" via "));
    assert_eq!(
        trailer_tags(&candidate),
        vec!["EMVAlert", "incident", "Fire", "GrassFire"]
    );
    assert_spans_match_text(&candidate);
}

#[test]
fn full_incident_renders_exact_layout() {
    let candidate = PostRenderer::default()
        .render(&incident(json!({
            "sizeFmt": ["12 ha", "30 acres"],
            "resources": 4,
            "source": "Vicroads"
        })))
        .expect("candidate");

    let expected = "Grass Fire WANGARATTA\n\nStatus: Going\nSize: 12 ha\nResources: 4\n\
                    Jan 5, 2024, 3:02 PM - open 1h 2m 5s\nFrom #CFA via Vicroads\n\
                    Find on Map >\n#EMVAlert #incident #Fire #GrassFire";
    assert_eq!(candidate.text, expected);
    assert_eq!(candidate.record_id, "INC-1");
    assert_eq!(candidate.kind, FeedKind::Incident);
    assert_eq!(
        candidate.links().collect::<Vec<_>>(),
        vec!["https://www.google.com/maps/search/?api=1&query=-36.35,146.3"]
    );
    assert_eq!(
        candidate.tags().collect::<Vec<_>>(),
        vec!["CFA", "EMVAlert", "incident", "Fire", "GrassFire"]
    );
    assert_spans_match_text(&candidate);
}

#[test]
fn scalar_size_is_used_directly() {
    let candidate = PostRenderer::default()
        .render(&incident(json!({"sizeFmt": "Small"})))
        .expect("candidate");
    assert!(candidate.text.contains("\nSize: Small\n"));
}

#[test]
fn error_source_is_not_credited() {
    let candidate = PostRenderer::default()
        .render(&incident(json!({"source": "ERROR: lookup failed"})))
        .expect("candidate");
    assert!(candidate.text.contains("From #CFA\n"));
    assert!(!candidate.text.contains("via"));
}

#[test]
fn missing_created_drops_open_suffix() {
    let mut record = incident(json!({}));
    record.properties.created = None;
    let candidate = PostRenderer::default().render(&record).expect("candidate");
    assert!(candidate.text.contains("Jan 5, 2024, 3:02 PM\nFrom "));
    assert!(!candidate.text.contains("open"));
}

#[test]
fn incident_without_point_skips_map_link() {
    let mut record = incident(json!({}));
    record.geometry = Some(Geometry::Other);
    let candidate = PostRenderer::default().render(&record).expect("candidate");
    assert_eq!(candidate.links().count(), 0);
    assert!(candidate.text.contains("From #CFA\n\n#EMVAlert"));
}

#[test]
fn identical_categories_emit_single_category_tag() {
    let candidate = PostRenderer::default()
        .render(&incident(json!({"category2": "Fire"})))
        .expect("candidate");
    assert_eq!(trailer_tags(&candidate), vec!["EMVAlert", "incident", "Fire"]);
}

#[test]
fn warning_renders_exact_layout_with_detail_link() {
    let candidate = PostRenderer::default()
        .render(&warning("Bright, Porepunkah"))
        .expect("candidate");

    let expected = "Emergency Warning\nLeave now\nBright, Porepunkah\nJul 1, 2024, 10:30 AM\n\
                    Full Details >\nFrom #EMV\n#EMVAlert #warning #Fire";
    assert_eq!(candidate.text, expected);
    assert_eq!(
        candidate.links().collect::<Vec<_>>(),
        vec![warning_details_uri("44012")]
    );
    assert_spans_match_text(&candidate);
}

#[test]
fn warning_location_truncates_at_byte_limit() {
    let exact = "a".repeat(WARNING_LOCATION_MAX_BYTES);
    let candidate = PostRenderer::default()
        .render(&warning(&exact))
        .expect("candidate");
    assert!(candidate.text.contains(&format!("\n{exact}\n")));

    let over = "b".repeat(WARNING_LOCATION_MAX_BYTES + 1);
    let candidate = PostRenderer::default()
        .render(&warning(&over))
        .expect("candidate");
    let clipped = format!("\n{}...\n", "b".repeat(WARNING_LOCATION_MAX_BYTES));
    assert!(candidate.text.contains(&clipped));
    assert_spans_match_text(&candidate);
}

#[test]
fn multibyte_location_keeps_spans_byte_accurate() {
    let candidate = PostRenderer::default()
        .render(&incident(json!({"location": "Mount Buller – Chalet Nº 2 🔥"})))
        .expect("candidate");
    assert_spans_match_text(&candidate);
    for pair in candidate.annotations.windows(2) {
        assert!(pair[0].byte_end <= pair[1].byte_start);
    }
}

#[test]
fn unknown_feed_type_yields_no_candidate() {
    let record = feature(json!({
        "properties": {
            "id": "X-1",
            "feedType": "burn-area",
            "updated": "2024-01-05T04:00:00Z"
        }
    }));
    assert_eq!(PostRenderer::default().render(&record), None);
}

#[test]
fn map_search_uri_orders_lat_before_lon() {
    assert_eq!(
        map_search_uri(GeoPoint {
            lon: 145.5,
            lat: -37.25
        }),
        "https://www.google.com/maps/search/?api=1&query=-37.25,145.5"
    );
}

#[test]
fn blank_source_org_never_renders_bare_hash() {
    let candidate = PostRenderer::default()
        .render(&incident(json!({"sourceOrg": "", "source": "Vicroads"})))
        .expect("candidate");
    assert!(candidate.text.contains("3:02 PM - open 1h 2m 5s\nFrom Vicroads\nFind on Map >"));
    assert!(candidate.tags().all(|tag| !tag.is_empty()));
    assert_spans_match_text(&candidate);

    let candidate = PostRenderer::default()
        .render(&incident(json!({"sourceOrg": ""})))
        .expect("candidate");
    assert!(!candidate.text.contains("From"));
    assert!(candidate.text.contains("open 1h 2m 5s\nFind on Map >"));

    let mut record = warning("Bright");
    record.properties.source_org = String::new();
    let candidate = PostRenderer::default().render(&record).expect("candidate");
    assert!(candidate.text.ends_with("Full Details >\n#EMVAlert #warning #Fire"));
    assert!(candidate.tags().all(|tag| !tag.is_empty()));
}

#[test]
fn blank_categories_shrink_trailer_below_four_tags() {
    let candidate = PostRenderer::default()
        .render(&incident(json!({"category1": "", "category2": ""})))
        .expect("candidate");
    assert_eq!(trailer_tags(&candidate), vec!["EMVAlert", "incident"]);
    assert!(candidate.text.ends_with("\n#EMVAlert #incident"));

    let candidate = PostRenderer::default()
        .render(&incident(json!({"category1": "  ", "category2": "Grass Fire"})))
        .expect("candidate");
    assert_eq!(
        trailer_tags(&candidate),
        vec!["EMVAlert", "incident", "GrassFire"]
    );
    assert_spans_match_text(&candidate);
}
