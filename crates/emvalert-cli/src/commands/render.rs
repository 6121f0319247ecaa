use std::path::Path;

use anyhow::{Context, Result};
use emvalert_core::models::PostCandidate;
use emvalert_core::{FeedSource, FileFeedSource, PostRenderer};

pub(super) fn render_file(path: &Path) -> Result<Vec<PostCandidate>> {
    let features = FileFeedSource::new(path)
        .fetch_feed()
        .with_context(|| format!("failed to read feed {}", path.display()))?;
    let renderer = PostRenderer::default();
    Ok(features
        .iter()
        .filter_map(|feature| renderer.render(feature))
        .collect())
}
