//! References from a mapped annotation to the transcript locus it was projected
//! onto.

use omics::coordinate::position::Number;

use crate::annotation::AnnotationId;
use crate::annotation::AnnotationMapId;

/// Metadata for one mapping of an annotation onto a transcript locus.
///
/// Annotations that failed to map still have a reference so that their
/// position among the other annotations of the protein is kept. Such
/// references have no alignment index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnnotationRef {
    /// The mapping identifier.
    map_id: AnnotationMapId,

    /// The declared size of the annotation on its reference (query units).
    size: Number,

    /// The transcript the annotation was projected onto.
    transcript_id: String,

    /// The chromosome of the transcript locus.
    chromosome: String,

    /// The index into the parallel collection of annotation alignments.
    alignment_index: Option<usize>,
}

impl AnnotationRef {
    /// Creates a new [`AnnotationRef`].
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::annotation::AnnotationRef;
    ///
    /// let reference = AnnotationRef::new(
    ///     "Q9BXI3|0|0".parse()?,
    ///     180,
    ///     "ENST00000235310.7",
    ///     "chr1",
    ///     Some(0),
    /// );
    ///
    /// assert_eq!(reference.annotation_id().to_string(), "Q9BXI3|0");
    /// assert_eq!(reference.source_accession(), "Q9BXI3");
    /// assert_eq!(reference.index_within_source(), 0);
    /// assert_eq!(reference.size(), 180);
    /// assert_eq!(reference.transcript_id(), "ENST00000235310.7");
    /// assert_eq!(reference.chromosome(), "chr1");
    /// assert_eq!(reference.alignment_index(), Some(0));
    /// assert!(reference.is_mapped());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(
        map_id: AnnotationMapId,
        size: Number,
        transcript_id: impl Into<String>,
        chromosome: impl Into<String>,
        alignment_index: Option<usize>,
    ) -> Self {
        Self {
            map_id,
            size,
            transcript_id: transcript_id.into(),
            chromosome: chromosome.into(),
            alignment_index,
        }
    }

    /// Gets the mapping identifier.
    pub fn map_id(&self) -> &AnnotationMapId {
        &self.map_id
    }

    /// Gets the identifier of the annotation being mapped.
    pub fn annotation_id(&self) -> &AnnotationId {
        self.map_id.annotation_id()
    }

    /// Gets the accession of the protein the annotation was defined on.
    pub fn source_accession(&self) -> &str {
        self.annotation_id().accession()
    }

    /// Gets the index of the annotation within its protein.
    pub fn index_within_source(&self) -> usize {
        self.annotation_id().index()
    }

    /// Gets the declared size of the annotation on its reference.
    pub fn size(&self) -> Number {
        self.size
    }

    /// Gets the transcript identifier.
    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    /// Gets the chromosome of the transcript locus.
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Gets the index of the annotation's genome alignment, if it mapped.
    pub fn alignment_index(&self) -> Option<usize> {
        self.alignment_index
    }

    /// Whether the annotation mapped to the genome.
    pub fn is_mapped(&self) -> bool {
        self.alignment_index.is_some()
    }

    /// Whether `other` refers to the same transcript locus.
    pub fn same_locus(&self, other: &AnnotationRef) -> bool {
        self.transcript_id == other.transcript_id && self.chromosome == other.chromosome
    }
}

impl std::fmt::Display for AnnotationRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} on {}@{}",
            self.map_id, self.transcript_id, self.chromosome
        )
    }
}
