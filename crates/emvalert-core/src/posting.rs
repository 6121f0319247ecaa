use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::PostingConfig;
use crate::error::{AlertError, Result};
use crate::models::{Annotation, AnnotationKind, PostCandidate};

const POST_RECORD_TYPE: &str = "app.bsky.feed.post";
const TAG_FACET_TYPE: &str = "app.bsky.richtext.facet#tag";
const LINK_FACET_TYPE: &str = "app.bsky.richtext.facet#link";

/// Destination for rendered posts. Implementations deliver candidates in slice order and
/// stop at the first failure. A failure after some posts went out is reported through
/// [`AlertError::after_delivered`] so callers know which prefix of the batch was published.
pub trait PostSink {
    fn post_candidates(&mut self, candidates: &[PostCandidate]) -> Result<()>;
}

/// Logs candidates instead of publishing them.
#[derive(Debug, Default)]
pub struct DryRunSink {
    seen: usize,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> usize {
        self.seen
    }
}

impl PostSink for DryRunSink {
    fn post_candidates(&mut self, candidates: &[PostCandidate]) -> Result<()> {
        for candidate in candidates {
            tracing::debug!(id = %candidate.record_id, "dry run post\n{}", candidate.text);
        }
        self.seen += candidates.len();
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
struct FacetIndex {
    #[serde(rename = "byteStart")]
    byte_start: usize,
    #[serde(rename = "byteEnd")]
    byte_end: usize,
}

#[derive(Debug, Clone, Serialize)]
struct Facet {
    index: FacetIndex,
    features: Vec<Value>,
}

fn facet_for(annotation: &Annotation) -> Facet {
    let feature = match &annotation.kind {
        AnnotationKind::Tag { tag } => json!({ "$type": TAG_FACET_TYPE, "tag": tag }),
        AnnotationKind::Link { uri } => json!({ "$type": LINK_FACET_TYPE, "uri": uri }),
    };
    Facet {
        index: FacetIndex {
            byte_start: annotation.byte_start,
            byte_end: annotation.byte_end,
        },
        features: vec![feature],
    }
}

/// `app.bsky.feed.post` record body for one candidate.
pub fn post_record(candidate: &PostCandidate, created_at: &str) -> Value {
    let facets = candidate.annotations.iter().map(facet_for).collect::<Vec<_>>();
    json!({
        "$type": POST_RECORD_TYPE,
        "text": candidate.text,
        "facets": facets,
        "createdAt": created_at,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    access_jwt: String,
    did: String,
}

#[derive(Clone)]
pub struct BlueskyClient {
    service: String,
    identifier: String,
    password: String,
    http: Client,
}

impl std::fmt::Debug for BlueskyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlueskyClient")
            .field("service", &self.service)
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

impl BlueskyClient {
    pub fn new(config: &PostingConfig) -> Result<Self> {
        let (identifier, password) = config.credentials()?;
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            service: config.service.clone(),
            identifier: identifier.to_string(),
            password: password.to_string(),
            http,
        })
    }

    fn xrpc_url(&self, method: &str) -> String {
        format!("{}/xrpc/{method}", self.service)
    }

    fn create_session(&self) -> Result<Session> {
        let method = "com.atproto.server.createSession";
        let body = json!({
            "identifier": self.identifier,
            "password": self.password,
        });
        let resp = self.http.post(self.xrpc_url(method)).json(&body).send()?;
        let status = resp.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AlertError::Auth(format!(
                "{method} rejected credentials for {}",
                self.identifier
            )));
        }
        if !status.is_success() {
            return Err(AlertError::UpstreamStatus {
                endpoint: method.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.json::<Session>()?)
    }

    fn create_record(&self, session: &Session, candidate: &PostCandidate) -> Result<()> {
        let method = "com.atproto.repo.createRecord";
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let body = json!({
            "repo": session.did,
            "collection": POST_RECORD_TYPE,
            "record": post_record(candidate, &created_at),
        });
        let resp = self
            .http
            .post(self.xrpc_url(method))
            .bearer_auth(&session.access_jwt)
            .json(&body)
            .send()?;
        if !resp.status().is_success() {
            return Err(AlertError::UpstreamStatus {
                endpoint: method.to_string(),
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }
}

impl PostSink for BlueskyClient {
    fn post_candidates(&mut self, candidates: &[PostCandidate]) -> Result<()> {
        if candidates.is_empty() {
            return Ok(());
        }

        let session = self.create_session()?;
        for (delivered, candidate) in candidates.iter().enumerate() {
            self.create_record(&session, candidate)
                .map_err(|err| err.after_delivered(delivered))?;
            tracing::info!(id = %candidate.record_id, kind = candidate.kind.as_str(), "posted");
        }
        Ok(())
    }
}
