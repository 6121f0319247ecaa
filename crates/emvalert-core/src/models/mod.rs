mod feed;
mod post;
mod report;

pub use feed::{
    Feature, FeedKind, FeedProperties, GeoPoint, Geometry, ModifiedStub, display_value,
    parse_feed,
};
pub use post::{Annotation, AnnotationKind, PostCandidate};
pub use report::PassReport;
