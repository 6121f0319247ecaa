use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::feed::FeedKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnotationKind {
    Tag { tag: String },
    Link { uri: String },
}

/// Byte range `[byte_start, byte_end)` over a post's UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub byte_start: usize,
    pub byte_end: usize,
    #[serde(flatten)]
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn byte_range(&self) -> Range<usize> {
        self.byte_start..self.byte_end
    }

    pub fn byte_len(&self) -> usize {
        self.byte_end - self.byte_start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCandidate {
    pub record_id: String,
    pub kind: FeedKind,
    pub text: String,
    pub annotations: Vec<Annotation>,
}

impl PostCandidate {
    /// The exact slice of `text` an annotation decorates.
    pub fn annotated_text(&self, annotation: &Annotation) -> Option<&str> {
        self.text.get(annotation.byte_range())
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.annotations
            .iter()
            .filter_map(|annotation| match &annotation.kind {
                AnnotationKind::Tag { tag } => Some(tag.as_str()),
                AnnotationKind::Link { .. } => None,
            })
    }

    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.annotations
            .iter()
            .filter_map(|annotation| match &annotation.kind {
                AnnotationKind::Link { uri } => Some(uri.as_str()),
                AnnotationKind::Tag { .. } => None,
            })
    }
}
