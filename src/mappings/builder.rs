//! A builder for [`TransAnnotMappings`].

use std::iter::Peekable;

use nonempty::NonEmpty;
use omics::coordinate::position::Number;
use omics::coordinate::Strand;

use crate::alignment::BlockSet;
use crate::annotation::mapping;
use crate::annotation::AnnotationId;
use crate::annotation::AnnotationMapping;
use crate::annotation::AnnotationRef;
use crate::annotation::Record;
use crate::coords;
use crate::mappings::sort_by_coords;
use crate::mappings::Order;
use crate::mappings::TransAnnotMappings;
use crate::Coords;

/// An error related to building a [`TransAnnotMappings`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// An annotation reference points past the end of the alignments.
    AlignmentIndexOutOfRange(String, usize, usize),

    /// An annotation reference could not be combined with its record or its
    /// alignment.
    Mapping(mapping::Error),

    /// The annotation references describe more than one transcript locus.
    MixedTranscripts(String, String),

    /// The transcript alignment is not for the locus of the annotation
    /// references.
    TranscriptMismatch(String, String),

    /// An annotation is aligned to a different chromosome than its locus.
    TargetMismatch(String, String, String),

    /// A mapped annotation starts before the mapped annotation preceding it.
    OutOfOrder(String, Number, Number),

    /// A placeholder range could not be created.
    Coords(coords::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::AlignmentIndexOutOfRange(map_id, index, len) => write!(
                f,
                "alignment index {index} for `{map_id}` is out of range ({len} alignments)"
            ),
            Error::Mapping(err) => write!(f, "mapping error: {err}"),
            Error::MixedTranscripts(a, b) => write!(
                f,
                "annotation references span multiple transcript loci: `{a}` and `{b}`"
            ),
            Error::TranscriptMismatch(expected, found) => write!(
                f,
                "transcript alignment `{found}` does not match the locus `{expected}`"
            ),
            Error::TargetMismatch(map_id, expected, found) => write!(
                f,
                "`{map_id}` is aligned to `{found}` but its locus is on `{expected}`"
            ),
            Error::OutOfOrder(map_id, start, previous) => write!(
                f,
                "`{map_id}` starts at {start}, before the preceding mapped annotation at \
                 {previous}: references must be in ascending genomic order"
            ),
            Error::Coords(err) => write!(f, "coords error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Formats a transcript locus for error messages.
fn locus(transcript_id: &str, chromosome: &str) -> String {
    format!("{transcript_id}@{chromosome}")
}

////////////////////////////////////////////////////////////////////////////////////////
// Builder
////////////////////////////////////////////////////////////////////////////////////////

/// A builder for a [`TransAnnotMappings`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Builder {
    /// The order to keep the annotation mappings in.
    order: Order,
}

impl Builder {
    /// Creates a new [`Builder`] that keeps annotation mappings in the
    /// specified order.
    pub fn new(order: Order) -> Self {
        Self { order }
    }

    /// Gets the order annotation mappings are kept in.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Builds the annotation mappings of one transcript locus.
    ///
    /// * `references` are the annotation references of the locus in
    ///   ascending genomic order, including those of annotations that did not
    ///   map.
    /// * `block_sets` are the annotation alignments the references index
    ///   into.
    /// * `transcript` is the alignment of the transcript onto the genome.
    /// * `lookup` resolves an annotation identifier to its record. It also
    ///   acts as a filter: annotations it returns [`None`] for are dropped.
    ///
    /// Unmapped annotations are given a placeholder range spanning the gap
    /// between the neighbouring mapped annotations (or the transcript bounds).
    /// A mapped annotation that starts before the mapped annotation preceding
    /// it is an [`Error::OutOfOrder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::alignment::Block;
    /// use annotmap::alignment::Builder as AlignmentBuilder;
    /// use annotmap::annotation::record::UniProtFeature;
    /// use annotmap::annotation::AnnotationRef;
    /// use annotmap::mappings::Builder;
    /// use annotmap::mappings::Order;
    /// use nonempty::NonEmpty;
    /// use omics::coordinate::Strand;
    ///
    /// let transcript = AlignmentBuilder::default()
    ///     .query("ENST00000235310.7", 200, 0, 200)?
    ///     .target("chr1", 1000)?
    ///     .strand(Strand::Positive)?
    ///     .push_block(Block::try_new(0, 100, 100, 200)?)
    ///     .push_block(Block::try_new(100, 200, 300, 400)?)
    ///     .try_build()?;
    ///
    /// let block_sets = vec![AlignmentBuilder::default()
    ///     .query("Q9BXI3|0|0", 80, 0, 80)?
    ///     .target("chr1", 1000)?
    ///     .strand(Strand::Positive)?
    ///     .push_block(Block::try_new(0, 80, 120, 200)?)
    ///     .try_build()?];
    ///
    /// let references = NonEmpty::from((
    ///     AnnotationRef::new("Q9BXI3|0|0".parse()?, 80, "ENST00000235310.7", "chr1", Some(0)),
    ///     vec![AnnotationRef::new(
    ///         "Q9BXI3|1|0".parse()?,
    ///         30,
    ///         "ENST00000235310.7",
    ///         "chr1",
    ///         None,
    ///     )],
    /// ));
    ///
    /// let locus = Builder::new(Order::Coordinate).try_build(
    ///     references,
    ///     &block_sets,
    ///     transcript,
    ///     |id| UniProtFeature::try_new(id.clone(), "Domain", None, 0, 27).ok().map(Into::into),
    /// )?;
    ///
    /// assert_eq!(locus.len(), 2);
    /// assert!(locus.mappings()[0].is_mapped());
    /// assert_eq!(locus.mappings()[1].coords().to_string(), "chr1:200-400");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build<F>(
        &self,
        references: NonEmpty<AnnotationRef>,
        block_sets: &[BlockSet],
        transcript: BlockSet,
        mut lookup: F,
    ) -> Result<TransAnnotMappings>
    where
        F: FnMut(&AnnotationId) -> Option<Record>,
    {
        let transcript_id = references.head.transcript_id().to_string();
        let chromosome = references.head.chromosome().to_string();

        if let Some(other) = references
            .tail
            .iter()
            .find(|reference| !reference.same_locus(&references.head))
        {
            return Err(Error::MixedTranscripts(
                locus(&transcript_id, &chromosome),
                locus(other.transcript_id(), other.chromosome()),
            ));
        }

        if transcript.query_name() != transcript_id || transcript.target_name() != chromosome {
            return Err(Error::TranscriptMismatch(
                locus(&transcript_id, &chromosome),
                locus(transcript.query_name(), transcript.target_name()),
            ));
        }

        let mut mappings = Vec::with_capacity(references.len());
        let mut previous_start: Option<Number> = None;

        for reference in references {
            let record = match lookup(reference.annotation_id()) {
                Some(record) => record,
                None => continue,
            };

            let mapping = match reference.alignment_index() {
                Some(index) => {
                    let block_set = block_sets.get(index).ok_or_else(|| {
                        Error::AlignmentIndexOutOfRange(
                            reference.map_id().to_string(),
                            index,
                            block_sets.len(),
                        )
                    })?;

                    if block_set.target_name() != chromosome {
                        return Err(Error::TargetMismatch(
                            reference.map_id().to_string(),
                            chromosome,
                            block_set.target_name().to_string(),
                        ));
                    }

                    if let Some(previous) = previous_start {
                        if block_set.target_start() < previous {
                            return Err(Error::OutOfOrder(
                                reference.map_id().to_string(),
                                block_set.target_start(),
                                previous,
                            ));
                        }
                    }
                    previous_start = Some(block_set.target_start());

                    AnnotationMapping::try_mapped(reference, block_set.clone(), record)
                        .map_err(Error::Mapping)?
                }
                None => {
                    let placeholder = Coords::try_new(
                        chromosome.clone(),
                        transcript.target_start(),
                        transcript.target_start(),
                    )
                    .map_err(Error::Coords)?;

                    AnnotationMapping::try_unmapped(reference, record, placeholder)
                        .map_err(Error::Mapping)?
                }
            };

            mappings.push(mapping);
        }

        assign_placeholders(&mut mappings, &transcript)?;

        match self.order {
            Order::Input => {}
            Order::Transcription => {
                if *transcript.strand() == Strand::Negative {
                    mappings.reverse();
                }
            }
            Order::Coordinate => sort_by_coords(&mut mappings),
        }

        Ok(TransAnnotMappings::new(
            transcript_id,
            chromosome,
            transcript,
            mappings,
        ))
    }
}

/// Positions each unmapped annotation in the gap between the mapped
/// annotations around it. Mappings must be in ascending genomic order.
///
/// The gap starts at the furthest end of any preceding mapped annotation. Where
/// that end lies past the start of the next mapped annotation, there is no gap
/// and the placeholder is empty at the next annotation's start.
fn assign_placeholders(mappings: &mut [AnnotationMapping], transcript: &BlockSet) -> Result<()> {
    let mut previous_end = transcript.target_start();

    for i in 0..mappings.len() {
        if mappings[i].is_mapped() {
            previous_end = previous_end.max(mappings[i].coords().end());
            continue;
        }

        let next_start = mappings[i + 1..]
            .iter()
            .find(|mapping| mapping.is_mapped())
            .map(|mapping| mapping.coords().start())
            .unwrap_or(transcript.target_end());

        let placeholder = Coords::try_new(
            transcript.target_name(),
            previous_end.min(next_start),
            next_start,
        )
        .map_err(Error::Coords)?;

        mappings[i].set_placeholder(placeholder);
    }

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////
// Grouping
////////////////////////////////////////////////////////////////////////////////////////

/// An iterator over consecutive groups of annotation references that share a
/// transcript locus.
///
/// See [`group_by_locus`].
#[derive(Debug)]
pub struct Loci<I>
where
    I: Iterator<Item = AnnotationRef>,
{
    /// The inner iterator.
    inner: Peekable<I>,
}

impl<I> Iterator for Loci<I>
where
    I: Iterator<Item = AnnotationRef>,
{
    type Item = NonEmpty<AnnotationRef>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut group = NonEmpty::new(self.inner.next()?);

        while let Some(reference) = self
            .inner
            .next_if(|reference| reference.same_locus(&group.head))
        {
            group.push(reference);
        }

        Some(group)
    }
}

/// Splits a stream of annotation references into consecutive groups that
/// share a transcript locus. A change of either the transcript id or the
/// chromosome starts a new group.
///
/// # Examples
///
/// ```
/// use annotmap::annotation::AnnotationRef;
/// use annotmap::mappings::builder::group_by_locus;
///
/// let references = vec![
///     AnnotationRef::new("P0DTU3|0|0".parse()?, 30, "ENST00000381192.10", "chrX", Some(0)),
///     AnnotationRef::new("P0DTU3|1|0".parse()?, 30, "ENST00000381192.10", "chrX", Some(1)),
///     AnnotationRef::new("P0DTU3|0|1".parse()?, 30, "ENST00000381192.10", "chrY", Some(2)),
/// ];
///
/// let groups = group_by_locus(references).collect::<Vec<_>>();
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].len(), 2);
/// assert_eq!(groups[1].head.chromosome(), "chrY");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn group_by_locus<I>(references: I) -> Loci<I::IntoIter>
where
    I: IntoIterator<Item = AnnotationRef>,
{
    Loci {
        inner: references.into_iter().peekable(),
    }
}
