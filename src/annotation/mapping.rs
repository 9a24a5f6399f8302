//! A single mapping of an annotation onto the genome.

use crate::alignment::BlockSet;
use crate::annotation::record::Annotation as _;
use crate::annotation::AnnotationId;
use crate::annotation::AnnotationRef;
use crate::annotation::Record;
use crate::Coords;

/// An error related to an [`AnnotationMapping`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The record resolved for the reference describes a different
    /// annotation.
    AnnotationIdMismatch(AnnotationId, AnnotationId),

    /// The alignment resolved for the reference belongs to a different
    /// mapping. This means the references and the alignments are out of
    /// sync.
    QueryNameMismatch(String, String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::AnnotationIdMismatch(reference, record) => write!(
                f,
                "annotation reference `{reference}` resolved to the record for `{record}`"
            ),
            Error::QueryNameMismatch(reference, alignment) => write!(
                f,
                "annotation reference `{reference}` and alignment `{alignment}` are out of sync"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// An annotation together with its alignment onto the genome (if it mapped)
/// and the genomic range it occupies.
///
/// For annotations that did not map, the range is a placeholder describing
/// where the annotation would have been (for example, the gap between the
/// neighbouring mapped annotations). It is only meaningful for ordering and
/// merging, not as a biological location.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnnotationMapping {
    /// The annotation reference.
    reference: AnnotationRef,

    /// The alignment of the annotation onto the genome, if it mapped.
    block_set: Option<BlockSet>,

    /// The descriptive record.
    record: Record,

    /// The genomic range.
    coords: Coords,
}

impl AnnotationMapping {
    /// Attempts to create a mapping for an annotation that aligned to the
    /// genome. The range is taken from the outer bounds of the alignment.
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::alignment::Block;
    /// use annotmap::alignment::Builder;
    /// use annotmap::annotation::record::UniProtFeature;
    /// use annotmap::annotation::AnnotationMapping;
    /// use annotmap::annotation::AnnotationRef;
    /// use omics::coordinate::Strand;
    ///
    /// let reference = AnnotationRef::new("Q9BXI3|0|0".parse()?, 80, "ENST1", "chr1", Some(0));
    /// let block_set = Builder::default()
    ///     .query("Q9BXI3|0|0", 80, 0, 80)?
    ///     .target("chr1", 1000)?
    ///     .strand(Strand::Positive)?
    ///     .push_block(Block::try_new(0, 80, 120, 200)?)
    ///     .try_build()?;
    /// let record = UniProtFeature::try_new(reference.annotation_id().clone(), "Domain", None, 0, 27)?;
    ///
    /// let mapping = AnnotationMapping::try_mapped(reference, block_set, record.into())?;
    /// assert!(mapping.is_mapped());
    /// assert_eq!(mapping.coords().start(), 120);
    /// assert_eq!(mapping.coords().end(), 200);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_mapped(reference: AnnotationRef, block_set: BlockSet, record: Record) -> Result<Self> {
        check_record(&reference, &record)?;

        let map_id = reference.map_id().to_string();
        if block_set.query_name() != map_id {
            return Err(Error::QueryNameMismatch(
                map_id,
                block_set.query_name().to_string(),
            ));
        }

        let coords = block_set.coords();

        Ok(Self {
            reference,
            block_set: Some(block_set),
            record,
            coords,
        })
    }

    /// Attempts to create a mapping for an annotation that did not align,
    /// positioned at the `placeholder` range.
    pub fn try_unmapped(reference: AnnotationRef, record: Record, placeholder: Coords) -> Result<Self> {
        check_record(&reference, &record)?;

        Ok(Self {
            reference,
            block_set: None,
            record,
            coords: placeholder,
        })
    }

    /// Gets the annotation reference.
    pub fn reference(&self) -> &AnnotationRef {
        &self.reference
    }

    /// Gets the alignment of the annotation onto the genome, if it mapped.
    pub fn block_set(&self) -> Option<&BlockSet> {
        self.block_set.as_ref()
    }

    /// Gets the descriptive record.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Gets the genomic range (or placeholder range, when unmapped).
    pub fn coords(&self) -> &Coords {
        &self.coords
    }

    /// Whether the annotation aligned to the genome.
    pub fn is_mapped(&self) -> bool {
        self.block_set.is_some()
    }

    /// Replaces the placeholder range of an unmapped annotation.
    pub(crate) fn set_placeholder(&mut self, placeholder: Coords) {
        debug_assert!(self.block_set.is_none());
        self.coords = placeholder;
    }
}

impl std::fmt::Display for AnnotationMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} {}",
            self.reference.map_id(),
            self.record.short(),
            self.coords
        )?;

        if self.block_set.is_none() {
            write!(f, " (unmapped)")?;
        }

        Ok(())
    }
}

/// Ensures that a record describes the annotation a reference points to.
fn check_record(reference: &AnnotationRef, record: &Record) -> Result<()> {
    if reference.annotation_id() != record.id() {
        return Err(Error::AnnotationIdMismatch(
            reference.annotation_id().clone(),
            record.id().clone(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use omics::coordinate::Strand;

    use super::*;
    use crate::alignment::Block;
    use crate::alignment::Builder;
    use crate::annotation::record::UniProtFeature;

    fn record(id: &str) -> Record {
        UniProtFeature::try_new(id.parse().unwrap(), "Domain", None, 0, 27)
            .unwrap()
            .into()
    }

    #[test]
    fn record_must_match_the_reference() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let reference = AnnotationRef::new("Q9BXI3|0|0".parse()?, 81, "ENST1", "chr1", None);
        let placeholder = Coords::try_new("chr1", 100, 100)?;

        let err =
            AnnotationMapping::try_unmapped(reference, record("Q9BXI3|1"), placeholder).unwrap_err();
        assert_eq!(
            err.to_string(),
            "annotation reference `Q9BXI3|0` resolved to the record for `Q9BXI3|1`"
        );

        Ok(())
    }

    #[test]
    fn alignment_must_match_the_reference() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let reference = AnnotationRef::new("Q9BXI3|0|0".parse()?, 80, "ENST1", "chr1", Some(0));
        let block_set = Builder::default()
            .query("Q9BXI3|0|1", 80, 0, 80)?
            .target("chr1", 1000)?
            .strand(Strand::Positive)?
            .push_block(Block::with_size(0, 120, 80))
            .try_build()?;

        let err =
            AnnotationMapping::try_mapped(reference, block_set, record("Q9BXI3|0")).unwrap_err();
        assert_eq!(
            err,
            Error::QueryNameMismatch(String::from("Q9BXI3|0|0"), String::from("Q9BXI3|0|1"))
        );

        Ok(())
    }

    #[test]
    fn unmapped_display() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let reference = AnnotationRef::new("Q9BXI3|0|0".parse()?, 81, "ENST1", "chr1", None);
        let placeholder = Coords::try_new("chr1", 100, 300)?;
        let mapping = AnnotationMapping::try_unmapped(reference, record("Q9BXI3|0"), placeholder)?;

        assert!(!mapping.is_mapped());
        assert_eq!(
            mapping.to_string(),
            "Q9BXI3|0|0: Q9BXI3|0 Domain [0-27) chr1:100-300 (unmapped)"
        );

        Ok(())
    }
}
