use crate::models::{Annotation, AnnotationKind};

/// Append-only text buffer that records byte-indexed annotations as fragments are added.
///
/// Offsets are taken from the buffer's UTF-8 length at the moment of each append, so an
/// annotation always bounds exactly the fragment it was recorded with. Recorded annotations
/// are never touched again.
#[derive(Debug, Default, Clone)]
pub struct AnnotationBuilder {
    text: String,
    annotations: Vec<Annotation>,
}

impl AnnotationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) -> &mut Self {
        self.text.push_str(text);
        self
    }

    pub fn append_annotated(&mut self, text: &str, kind: AnnotationKind) -> &mut Self {
        let byte_start = self.text.len();
        self.text.push_str(text);
        self.annotations.push(Annotation {
            byte_start,
            byte_end: self.text.len(),
            kind,
        });
        self
    }

    /// Appends `#<tag>`; the annotation covers the hash as well as the tag name.
    pub fn append_tag(&mut self, tag: &str) -> &mut Self {
        self.append_annotated(
            &format!("#{tag}"),
            AnnotationKind::Tag {
                tag: tag.to_string(),
            },
        )
    }

    pub fn append_link(&mut self, text: &str, uri: impl Into<String>) -> &mut Self {
        self.append_annotated(text, AnnotationKind::Link { uri: uri.into() })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn finish(self) -> (String, Vec<Annotation>) {
        (self.text, self.annotations)
    }
}
