//! Annotations, their identifiers and records, and their mappings onto the
//! genome.

pub mod id;
pub mod mapping;
pub mod record;
pub mod reference;

pub use id::AnnotationId;
pub use id::AnnotationMapId;
pub use mapping::AnnotationMapping;
pub use record::Annotation;
pub use record::Record;
pub use reference::AnnotationRef;
