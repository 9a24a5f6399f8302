//! Annotation mappings grouped by transcript locus.
//!
//! All of the mappings of a protein's annotations onto one transcript at one
//! genomic location are collected into a [`TransAnnotMappings`]. A transcript
//! id alone is not enough to identify a locus: transcripts in the
//! pseudoautosomal regions are found on both `chrX` and `chrY`, so loci are
//! always keyed by the `(transcript id, chromosome)` pair.

use crate::alignment::BlockSet;
use crate::annotation::AnnotationMapping;

pub mod builder;
pub mod table;

pub use builder::Builder;
pub use table::AnnotMappingsTbl;

/// An error related to [`TransAnnotMappings`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// Two mapped annotations overlap on the genome.
    OverlappingAnnotations(String, String),

    /// A mapped annotation starts before the annotation that precedes it.
    OutOfOrder(String, String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OverlappingAnnotations(a, b) => {
                write!(f, "overlapping annotations are not allowed: `{a}` and `{b}`")
            }
            Error::OutOfOrder(a, b) => write!(f, "out of order annotations: `{a}` and `{b}`"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// The order the annotation mappings of a transcript are kept in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Order {
    /// The order the annotation references were provided in (ascending
    /// genomic order).
    #[default]
    Input,

    /// The order the transcript is transcribed in. This is the input order,
    /// reversed when the transcript is aligned on the negative strand.
    Transcription,

    /// Sorted by genomic start and then end. This is the order required for
    /// diffing.
    Coordinate,
}

/// The annotation mappings for one transcript at one genomic locus.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransAnnotMappings {
    /// The transcript identifier.
    transcript_id: String,

    /// The chromosome of the locus.
    chromosome: String,

    /// The alignment of the transcript onto the genome.
    transcript: BlockSet,

    /// The annotation mappings.
    mappings: Vec<AnnotationMapping>,
}

impl TransAnnotMappings {
    /// Creates a new [`TransAnnotMappings`]. The consistency of the inputs is
    /// checked by the [`Builder`].
    pub(crate) fn new(
        transcript_id: String,
        chromosome: String,
        transcript: BlockSet,
        mappings: Vec<AnnotationMapping>,
    ) -> Self {
        Self {
            transcript_id,
            chromosome,
            transcript,
            mappings,
        }
    }

    /// Gets the transcript identifier.
    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    /// Gets the chromosome of the locus.
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Gets the alignment of the transcript onto the genome.
    pub fn transcript(&self) -> &BlockSet {
        &self.transcript
    }

    /// Gets the annotation mappings.
    pub fn mappings(&self) -> &[AnnotationMapping] {
        &self.mappings
    }

    /// Gets an iterator over the annotation mappings.
    pub fn iter(&self) -> std::slice::Iter<'_, AnnotationMapping> {
        self.mappings.iter()
    }

    /// Gets the number of annotation mappings.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns whether there are no annotation mappings (every annotation was
    /// dropped by the record lookup).
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Whether `other` is the same transcript locus.
    pub fn same_locus(&self, other: &TransAnnotMappings) -> bool {
        self.transcript_id == other.transcript_id && self.chromosome == other.chromosome
    }

    /// Consumes `self` and returns the mappings sorted by genomic start and
    /// then end. The sort is stable.
    pub fn into_coordinate_order(mut self) -> Self {
        sort_by_coords(&mut self.mappings);
        self
    }

    /// Ensures that the mapped annotations neither overlap nor are out of
    /// order. Unmapped annotations are not checked.
    ///
    /// Source annotation sets are required to pass this check before they are
    /// compared.
    pub fn check_non_overlapping(&self) -> Result<()> {
        let mapped = self
            .mappings
            .iter()
            .filter(|mapping| mapping.is_mapped())
            .collect::<Vec<_>>();

        for pair in mapped.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            let (a, b) = (previous.coords(), current.coords());

            // Mapped annotations of one locus share the chromosome.
            if matches!(a.overlaps(b), Ok(true)) {
                return Err(Error::OverlappingAnnotations(
                    previous.to_string(),
                    current.to_string(),
                ));
            }

            if b.start() < a.end() {
                return Err(Error::OutOfOrder(previous.to_string(), current.to_string()));
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a TransAnnotMappings {
    type Item = &'a AnnotationMapping;
    type IntoIter = std::slice::Iter<'a, AnnotationMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.iter()
    }
}

impl std::fmt::Display for TransAnnotMappings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}@{}: {}", self.transcript_id, self.chromosome, self.transcript)?;

        for mapping in &self.mappings {
            writeln!(f, "    {mapping}")?;
        }

        Ok(())
    }
}

/// Sorts mappings by genomic start and then end.
pub(crate) fn sort_by_coords(mappings: &mut [AnnotationMapping]) {
    mappings.sort_by_key(|mapping| (mapping.coords().start(), mapping.coords().end()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn non_overlapping_annotations() {
        let transcript = fixtures::two_exon_transcript();
        let locus = fixtures::locus(
            &transcript,
            &[
                ("Q9BXI3|0|0", 30, &[(0, 120, 30)]),
                ("Q9BXI3|1|0", 10, &[]),
                ("Q9BXI3|2|0", 30, &[(0, 150, 30)]),
            ],
        );

        assert!(locus.check_non_overlapping().is_ok());
    }

    #[test]
    fn overlapping_annotations() {
        let transcript = fixtures::two_exon_transcript();
        let locus = fixtures::locus(
            &transcript,
            &[
                ("Q9BXI3|0|0", 30, &[(0, 120, 30)]),
                ("Q9BXI3|1|0", 30, &[(0, 140, 30)]),
            ],
        );

        let err = locus.check_non_overlapping().unwrap_err();
        assert!(matches!(err, Error::OverlappingAnnotations(_, _)));
        assert!(err
            .to_string()
            .starts_with("overlapping annotations are not allowed: `Q9BXI3|0|0: "));
    }

    #[test]
    fn out_of_order_annotations() {
        let transcript = fixtures::two_exon_transcript();
        let locus = fixtures::locus(
            &transcript,
            &[
                ("Q9BXI3|0|0", 30, &[(0, 120, 30)]),
                ("Q9BXI3|1|0", 30, &[(0, 150, 30)]),
            ],
        );

        // Reverse the coordinate order by hand.
        let mut mappings = locus.mappings().to_vec();
        mappings.reverse();
        let reversed = TransAnnotMappings::new(
            locus.transcript_id().to_string(),
            locus.chromosome().to_string(),
            locus.transcript().clone(),
            mappings,
        );

        let err = reversed.check_non_overlapping().unwrap_err();
        assert!(matches!(err, Error::OutOfOrder(_, _)));

        assert_eq!(reversed.into_coordinate_order(), locus);
    }

    #[test]
    fn display() {
        let transcript = fixtures::two_exon_transcript();
        let locus = fixtures::locus(&transcript, &[("Q9BXI3|0|0", 30, &[(0, 120, 30)])]);

        assert_eq!(
            locus.to_string(),
            "ENST1@chr1: ENST1:0-200 (+) -> chr1:100-400 (2 blocks)\n    Q9BXI3|0|0: Q9BXI3|0 \
             Domain [0-10) chr1:+:120-150\n"
        );
    }
}
