use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{AlertError, Result};

/// Record kinds the feed declares through `properties.feedType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Incident,
    Warning,
}

impl FeedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incident => "incident",
            Self::Warning => "warning",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "incident" => Some(Self::Incident),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }
}

/// Properties block of one feed feature.
///
/// Every field the renderer or detector reads is explicit; anything else the feed
/// sends is kept in `extra` so a record round-trips without loss. Only `id` and
/// `updated` can reject a record: other fields that are missing or of an odd shape
/// read as absent (or as their display text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedProperties {
    #[serde(deserialize_with = "deserialize_identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub feed_type: String,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    pub updated: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category1: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category2: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source_org: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_fmt: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Value>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeedProperties {
    pub fn kind(&self) -> Option<FeedKind> {
        FeedKind::parse(&self.feed_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        #[serde(default)]
        coordinates: Value,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
    #[serde(other)]
    Other,
}

impl Geometry {
    /// A point's own coordinates, or the first top-level point of a collection.
    pub fn resolve_point(&self) -> Option<GeoPoint> {
        match self {
            Self::Point { coordinates } => {
                let lon = coordinates.get(0).and_then(Value::as_f64)?;
                let lat = coordinates.get(1).and_then(Value::as_f64)?;
                Some(GeoPoint { lon, lat })
            }
            Self::GeometryCollection { geometries } => geometries
                .iter()
                .find(|geometry| matches!(geometry, Self::Point { .. }))
                .and_then(Self::resolve_point),
            Self::Other => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(
        default,
        deserialize_with = "lenient_geometry",
        skip_serializing_if = "Option::is_none"
    )]
    pub geometry: Option<Geometry>,
    pub properties: FeedProperties,
}

impl Feature {
    pub fn id(&self) -> &str {
        &self.properties.id
    }

    pub fn location_point(&self) -> Option<GeoPoint> {
        self.geometry.as_ref().and_then(Geometry::resolve_point)
    }
}

/// Body of the lightweight "last modified" probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedStub {
    pub last_modified: DateTime<Utc>,
}

/// Parses a GeoJSON feature collection, skipping features that do not fit the record shape.
pub fn parse_feed(value: Value) -> Result<Vec<Feature>> {
    let Value::Object(mut root) = value else {
        return Err(AlertError::Validation(
            "feed document must be a JSON object".to_string(),
        ));
    };
    let Some(Value::Array(raw_features)) = root.remove("features") else {
        return Err(AlertError::Validation(
            "feed document has no features array".to_string(),
        ));
    };

    let mut features = Vec::with_capacity(raw_features.len());
    for (index, raw) in raw_features.into_iter().enumerate() {
        match serde_json::from_value::<Feature>(raw) {
            Ok(feature) => features.push(feature),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping malformed feed feature");
            }
        }
    }
    Ok(features)
}

/// Renders a loosely typed property for display: strings unquoted, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn deserialize_identifier<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIdentifier {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawIdentifier::deserialize(deserializer)? {
        RawIdentifier::Text(text) => text,
        RawIdentifier::Number(number) => number.to_string(),
    })
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(display_value(&other)),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_datetime<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).ok())
}

fn lenient_geometry<'de, D>(deserializer: D) -> std::result::Result<Option<Geometry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).ok())
}
