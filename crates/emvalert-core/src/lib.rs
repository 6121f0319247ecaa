// Public fallible APIs in this crate share one concrete error contract (`AlertError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod config;
pub mod detect;
pub mod error;
pub mod feed_client;
pub mod models;
pub mod posting;
pub mod render;
pub mod richtext;
pub mod runtime;
pub mod text;
pub mod watermark;

pub use config::AppConfig;
pub use detect::{ObservedStateMap, detect_changes};
pub use error::{AlertError, Result};
pub use feed_client::{FeedSource, FileFeedSource, HttpFeedClient};
pub use posting::{BlueskyClient, DryRunSink, PostSink};
pub use render::PostRenderer;
pub use richtext::AnnotationBuilder;
pub use runtime::AlertContext;
pub use watermark::{CutoffController, CutoffWatermark};
