//! A table of annotation mappings for many transcript loci.

use std::collections::HashMap;

use nonempty::NonEmpty;
use omics::coordinate::position::Number;
use rust_lapper as lapper;

use crate::alignment::BlockSet;
use crate::annotation::AnnotationId;
use crate::annotation::AnnotationRef;
use crate::annotation::Record;
use crate::mappings;
use crate::mappings::builder::group_by_locus;
use crate::mappings::Order;
use crate::mappings::TransAnnotMappings;

/// The inner value of the genomic lookup data structure: the index of an
/// entry in the table.
type Iv = lapper::Interval<Number, usize>;

/// An error related to an [`AnnotMappingsTbl`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// A transcript locus was added more than once.
    DuplicateLocus(String, String),

    /// No entry was found for a transcript (and, if specified, a
    /// chromosome).
    NotFound(String, Option<String>),

    /// No transcript alignment was found for a transcript locus.
    MissingTranscriptAlignment(String, String),

    /// The annotation mappings of a transcript locus could not be built.
    Build(mappings::builder::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DuplicateLocus(transcript_id, chromosome) => write!(
                f,
                "duplicate transcript locus: `{transcript_id}` on `{chromosome}`"
            ),
            Error::NotFound(transcript_id, None) => {
                write!(f, "transcript not found: `{transcript_id}`")
            }
            Error::NotFound(transcript_id, Some(chromosome)) => write!(
                f,
                "transcript not found: `{transcript_id}` on `{chromosome}`"
            ),
            Error::MissingTranscriptAlignment(transcript_id, chromosome) => write!(
                f,
                "no transcript alignment for `{transcript_id}` on `{chromosome}`"
            ),
            Error::Build(err) => write!(f, "build error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Table
////////////////////////////////////////////////////////////////////////////////////////

/// The annotation mappings of many transcript loci.
///
/// Entries can be looked up by transcript id (returning every locus of the
/// transcript), by `(transcript id, chromosome)` (returning at most one
/// locus), or by genomic range.
#[derive(Debug, Default)]
pub struct AnnotMappingsTbl {
    /// The entries in the order they were added.
    entries: Vec<TransAnnotMappings>,

    /// The indices of the entries for each transcript id.
    by_transcript_id: HashMap<String, Vec<usize>>,

    /// The indices of the entries for each chromosome, keyed by the genomic
    /// range of the transcript alignment.
    by_chromosome: HashMap<String, lapper::Lapper<Number, usize>>,
}

impl AnnotMappingsTbl {
    /// Adds the annotation mappings of a transcript locus.
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::alignment::Block;
    /// use annotmap::alignment::Builder as AlignmentBuilder;
    /// use annotmap::annotation::AnnotationRef;
    /// use annotmap::mappings::AnnotMappingsTbl;
    /// use annotmap::mappings::Builder;
    /// use nonempty::NonEmpty;
    /// use omics::coordinate::Strand;
    ///
    /// let transcript = AlignmentBuilder::default()
    ///     .query("ENST00000235310.7", 100, 0, 100)?
    ///     .target("chr1", 1000)?
    ///     .strand(Strand::Positive)?
    ///     .push_block(Block::try_new(0, 100, 100, 200)?)
    ///     .try_build()?;
    /// let references = NonEmpty::new(AnnotationRef::new(
    ///     "Q9BXI3|0|0".parse()?,
    ///     80,
    ///     "ENST00000235310.7",
    ///     "chr1",
    ///     None,
    /// ));
    /// let locus = Builder::default().try_build(references, &[], transcript, |_| None)?;
    ///
    /// let mut table = AnnotMappingsTbl::default();
    /// table.add(locus.clone())?;
    ///
    /// assert_eq!(table.len(), 1);
    /// assert!(table.find("ENST00000235310.7", "chr1").is_some());
    /// assert!(table.add(locus).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn add(&mut self, entry: TransAnnotMappings) -> Result<()> {
        if self
            .find(entry.transcript_id(), entry.chromosome())
            .is_some()
        {
            return Err(Error::DuplicateLocus(
                entry.transcript_id().to_string(),
                entry.chromosome().to_string(),
            ));
        }

        let index = self.entries.len();

        self.by_transcript_id
            .entry(entry.transcript_id().to_string())
            .or_default()
            .push(index);

        let transcript = entry.transcript();
        self.by_chromosome
            .entry(entry.chromosome().to_string())
            .or_insert_with(|| lapper::Lapper::new(Vec::new()))
            .insert(Iv {
                start: transcript.target_start(),
                stop: transcript.target_end(),
                val: index,
            });

        self.entries.push(entry);
        Ok(())
    }

    /// Finds the entry for a transcript on a chromosome.
    pub fn find(&self, transcript_id: &str, chromosome: &str) -> Option<&TransAnnotMappings> {
        self.find_all(transcript_id)
            .into_iter()
            .find(|entry| entry.chromosome() == chromosome)
    }

    /// Gets the entry for a transcript on a chromosome.
    pub fn get(&self, transcript_id: &str, chromosome: &str) -> Result<&TransAnnotMappings> {
        self.find(transcript_id, chromosome).ok_or_else(|| {
            Error::NotFound(transcript_id.to_string(), Some(chromosome.to_string()))
        })
    }

    /// Finds every entry for a transcript. The result is empty when the
    /// transcript is not in the table.
    pub fn find_all(&self, transcript_id: &str) -> Vec<&TransAnnotMappings> {
        self.by_transcript_id
            .get(transcript_id)
            .map(|indices| indices.iter().map(|i| &self.entries[*i]).collect())
            .unwrap_or_default()
    }

    /// Gets every entry for a transcript.
    pub fn get_all(&self, transcript_id: &str) -> Result<Vec<&TransAnnotMappings>> {
        let entries = self.find_all(transcript_id);

        match entries.is_empty() {
            true => Err(Error::NotFound(transcript_id.to_string(), None)),
            false => Ok(entries),
        }
    }

    /// Finds every entry whose transcript alignment overlaps the range
    /// `[start, end)` on a chromosome. Entries are returned in the order they
    /// were added.
    pub fn overlapping(
        &self,
        chromosome: &str,
        start: Number,
        end: Number,
    ) -> Vec<&TransAnnotMappings> {
        let mut indices = self
            .by_chromosome
            .get(chromosome)
            .map(|lapper| lapper.find(start, end).map(|iv| iv.val).collect::<Vec<_>>())
            .unwrap_or_default();

        indices.sort_unstable();
        indices.into_iter().map(|i| &self.entries[i]).collect()
    }

    /// Gets an iterator over the entries in the order they were added.
    pub fn iter(&self) -> std::slice::Iter<'_, TransAnnotMappings> {
        self.entries.iter()
    }

    /// Gets the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AnnotMappingsTbl {
    type Item = &'a TransAnnotMappings;
    type IntoIter = std::slice::Iter<'a, TransAnnotMappings>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Builder
////////////////////////////////////////////////////////////////////////////////////////

/// A builder for an [`AnnotMappingsTbl`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Builder {
    /// The builder for each transcript locus.
    inner: mappings::Builder,
}

impl Builder {
    /// Creates a new [`Builder`] that keeps the annotation mappings of each
    /// locus in the specified order.
    pub fn new(order: Order) -> Self {
        Self {
            inner: mappings::Builder::new(order),
        }
    }

    /// Builds a table from a flat stream of annotation references.
    ///
    /// The references are grouped into consecutive transcript loci (see
    /// [`group_by_locus`]). For each locus, `transcripts` is asked for the
    /// transcript alignment by `(transcript id, chromosome)`, and `records`
    /// resolves (and filters) the annotation records.
    pub fn try_build_from<R, T, F>(
        &self,
        references: R,
        block_sets: &[BlockSet],
        mut transcripts: T,
        mut records: F,
    ) -> Result<AnnotMappingsTbl>
    where
        R: IntoIterator<Item = AnnotationRef>,
        T: FnMut(&str, &str) -> Option<BlockSet>,
        F: FnMut(&AnnotationId) -> Option<Record>,
    {
        let mut table = AnnotMappingsTbl::default();

        for group in group_by_locus(references) {
            let locus = self.build_locus(group, block_sets, &mut transcripts, &mut records)?;
            table.add(locus)?;
        }

        Ok(table)
    }

    /// Builds the annotation mappings of one locus.
    fn build_locus<T, F>(
        &self,
        group: NonEmpty<AnnotationRef>,
        block_sets: &[BlockSet],
        transcripts: &mut T,
        records: &mut F,
    ) -> Result<TransAnnotMappings>
    where
        T: FnMut(&str, &str) -> Option<BlockSet>,
        F: FnMut(&AnnotationId) -> Option<Record>,
    {
        let (transcript_id, chromosome) = (group.head.transcript_id(), group.head.chromosome());

        let transcript = transcripts(transcript_id, chromosome).ok_or_else(|| {
            Error::MissingTranscriptAlignment(transcript_id.to_string(), chromosome.to_string())
        })?;

        self.inner
            .try_build(group, block_sets, transcript, |id| records(id))
            .map_err(Error::Build)
    }
}
