//! Comparing two sets of annotations mapped onto the same transcript.
//!
//! The _source_ annotations (for example, curated features mapped from a
//! reference protein) form the spine of the comparison: one [`AnnotDiff`] per
//! source annotation, in genomic order, each carrying the indels reported by
//! [`analyze_feature_mapping`]. The _target_ annotations (for example,
//! predictions made directly on the transcript's protein) are then merged in.
//! A target attaches to every source entry it overlaps, and a target that
//! overlaps no source annotation gets an entry of its own.
//!
//! ```text
//! source   [120====200)        [300====330)
//! target         [180====================320)   [350==380)
//! diffs    [src + target]      [src + target]   [target only]
//! ```

use omics::coordinate::position::Number;

use crate::analysis::analyze_feature_mapping;
use crate::analysis::FeatureIndel;
use crate::analysis::IndelKind;
use crate::alignment::BlockSet;
use crate::annotation::AnnotationMapping;
use crate::coords;
use crate::mappings::TransAnnotMappings;
use crate::Coords;

/// The fraction of an annotation's size (in percent) that may be disrupted
/// for the difference to still be considered minor.
const MINOR_DIFF_PERCENT: Number = 10;

/// An error related to comparing annotations.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The source and target annotations are for different transcript loci.
    TranscriptMismatch(String, String),

    /// The annotations of a transcript locus are not sorted by genomic start.
    /// The index is the first annotation that is out of order.
    Unsorted(String, usize),

    /// A coordinate error.
    Coords(coords::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TranscriptMismatch(source, target) => write!(
                f,
                "cannot compare annotations of different transcript loci: `{source}` and \
                 `{target}`"
            ),
            Error::Unsorted(locus, index) => write!(
                f,
                "annotations of `{locus}` are not sorted by coordinate (at index {index})"
            ),
            Error::Coords(err) => write!(f, "coords error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Categories
////////////////////////////////////////////////////////////////////////////////////////

/// A summary of an [`AnnotDiff`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Category {
    /// The source annotation mapped without any indels.
    Complete,

    /// The source annotation did not map at all.
    Deleted,

    /// There is no source annotation, only target annotations.
    Inserted,

    /// The indels disrupt at most a tenth of the source annotation.
    MinorDiff,

    /// The indels disrupt more than a tenth of the source annotation.
    MajorDiff,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Complete => write!(f, "complete"),
            Category::Deleted => write!(f, "deleted"),
            Category::Inserted => write!(f, "inserted"),
            Category::MinorDiff => write!(f, "minor_diff"),
            Category::MajorDiff => write!(f, "major_diff"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Annotation differences
////////////////////////////////////////////////////////////////////////////////////////

/// The comparison of one source annotation (or none) with the target
/// annotations that overlap it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnnotDiff {
    /// The genomic range of the source annotation, or of the target
    /// annotation when there is no source.
    coords: Coords,

    /// The source annotation.
    source: Option<AnnotationMapping>,

    /// The indels of the source annotation.
    source_indels: Option<Vec<FeatureIndel>>,

    /// The overlapping target annotations.
    targets: Vec<AnnotationMapping>,
}

impl AnnotDiff {
    /// Creates an entry for a source annotation.
    fn from_source(transcript: &BlockSet, source: AnnotationMapping) -> Self {
        let indels = analyze_feature_mapping(transcript, &source);

        Self {
            coords: source.coords().clone(),
            source: Some(source),
            source_indels: Some(indels),
            targets: Vec::new(),
        }
    }

    /// Creates an entry for a target annotation that overlaps no source
    /// annotation.
    fn from_target(target: AnnotationMapping) -> Self {
        Self {
            coords: target.coords().clone(),
            source: None,
            source_indels: None,
            targets: vec![target],
        }
    }

    /// Gets the genomic range of the entry.
    pub fn coords(&self) -> &Coords {
        &self.coords
    }

    /// Gets the source annotation, if there is one.
    pub fn source(&self) -> Option<&AnnotationMapping> {
        self.source.as_ref()
    }

    /// Gets the indels of the source annotation, if there is one.
    pub fn source_indels(&self) -> Option<&[FeatureIndel]> {
        self.source_indels.as_deref()
    }

    /// Gets the target annotations.
    pub fn targets(&self) -> &[AnnotationMapping] {
        &self.targets
    }

    /// Summarizes the entry.
    ///
    /// * An entry without a source annotation is [`Category::Inserted`].
    /// * A source annotation that did not map is [`Category::Deleted`].
    /// * A source annotation without indels is [`Category::Complete`].
    /// * Otherwise, the total length of the indels decides between
    ///   [`Category::MinorDiff`] (at most a tenth of the annotation's size)
    ///   and [`Category::MajorDiff`].
    pub fn category(&self) -> Category {
        let (source, indels) = match (&self.source, &self.source_indels) {
            (Some(source), Some(indels)) => (source, indels),
            _ => return Category::Inserted,
        };

        if indels
            .iter()
            .any(|indel| indel.kind() == IndelKind::FullDeletion)
        {
            return Category::Deleted;
        }

        if indels.is_empty() {
            return Category::Complete;
        }

        let disrupted = indels.iter().map(|indel| indel.length()).sum::<Number>();
        match disrupted * 100 <= source.reference().size() * MINOR_DIFF_PERCENT {
            true => Category::MinorDiff,
            false => Category::MajorDiff,
        }
    }

    /// Writes the entry, indented by `depth` levels.
    fn dump(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        transcript_id: &str,
        depth: usize,
    ) -> std::fmt::Result {
        let indent = "  ".repeat(depth);

        writeln!(f, "{indent}diff: {transcript_id}: {} [{}]", self.coords, self.category())?;

        match &self.source {
            Some(source) => writeln!(f, "{indent}  source: {source}")?,
            None => writeln!(f, "{indent}  source: none")?,
        }

        if let Some(indels) = &self.source_indels {
            let indels = indels.iter().map(|indel| indel.to_string()).collect::<Vec<_>>();
            writeln!(f, "{indent}  source indels: [{}]", indels.join(", "))?;
        }

        writeln!(f, "{indent}  targets: {}", self.targets.len())?;
        for target in &self.targets {
            writeln!(f, "{indent}    {target}")?;
        }

        Ok(())
    }
}

/// The comparison of the source and target annotations of a transcript
/// locus, ordered by genomic position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransAnnotDiffs {
    /// The transcript identifier.
    transcript_id: String,

    /// The chromosome of the locus.
    chromosome: String,

    /// The alignment of the transcript onto the genome.
    transcript: BlockSet,

    /// The entries.
    diffs: Vec<AnnotDiff>,
}

impl TransAnnotDiffs {
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

    /// Gets the entries.
    pub fn diffs(&self) -> &[AnnotDiff] {
        &self.diffs
    }

    /// Gets an iterator over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, AnnotDiff> {
        self.diffs.iter()
    }

    /// Gets the number of entries.
    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    /// Returns whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }
}

impl<'a> IntoIterator for &'a TransAnnotDiffs {
    type Item = &'a AnnotDiff;
    type IntoIter = std::slice::Iter<'a, AnnotDiff>;

    fn into_iter(self) -> Self::IntoIter {
        self.diffs.iter()
    }
}

impl std::fmt::Display for TransAnnotDiffs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "TransAnnotDiffs: {}@{}", self.transcript_id, self.chromosome)?;

        for diff in &self.diffs {
            diff.dump(f, &self.transcript_id, 1)?;
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Comparison
////////////////////////////////////////////////////////////////////////////////////////

/// Compares the source and target annotations of a transcript locus.
///
/// Both sets must be for the same `(transcript id, chromosome)` and sorted by
/// genomic start (see [`Order::Coordinate`](crate::mappings::Order)).
///
/// # Examples
///
/// ```
/// use annotmap::alignment::Block;
/// use annotmap::alignment::Builder as AlignmentBuilder;
/// use annotmap::annotation::record::InterProMatch;
/// use annotmap::annotation::record::UniProtFeature;
/// use annotmap::annotation::AnnotationRef;
/// use annotmap::diff::compare_trans_annotations;
/// use annotmap::diff::Category;
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
/// let alignment = |name: &str| -> Result<_, annotmap::alignment::Error> {
///     AlignmentBuilder::default()
///         .query(name, 80, 0, 80)?
///         .target("chr1", 1000)?
///         .strand(Strand::Positive)?
///         .push_block(Block::with_size(0, 120, 80))
///         .try_build()
/// };
///
/// let builder = Builder::new(Order::Coordinate);
///
/// let source = builder.try_build(
///     NonEmpty::new(AnnotationRef::new("Q9BXI3|0|0".parse()?, 80, "ENST00000235310.7", "chr1", Some(0))),
///     &[alignment("Q9BXI3|0|0")?],
///     transcript.clone(),
///     |id| UniProtFeature::try_new(id.clone(), "Domain", None, 0, 27).ok().map(Into::into),
/// )?;
///
/// let target = builder.try_build(
///     NonEmpty::new(AnnotationRef::new("Q9BXI3|5|0".parse()?, 80, "ENST00000235310.7", "chr1", Some(0))),
///     &[alignment("Q9BXI3|5|0")?],
///     transcript,
///     |id| InterProMatch::try_new(id.clone(), "Pfam", "PF00018", 0, 27).ok().map(Into::into),
/// )?;
///
/// let diffs = compare_trans_annotations(&source, &target)?;
/// assert_eq!(diffs.len(), 1);
/// assert_eq!(diffs.diffs()[0].targets().len(), 1);
/// assert_eq!(diffs.diffs()[0].category(), Category::Complete);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn compare_trans_annotations(
    source: &TransAnnotMappings,
    target: &TransAnnotMappings,
) -> Result<TransAnnotDiffs> {
    if !source.same_locus(target) {
        return Err(Error::TranscriptMismatch(
            format!("{}@{}", source.transcript_id(), source.chromosome()),
            format!("{}@{}", target.transcript_id(), target.chromosome()),
        ));
    }

    check_sorted(source)?;
    check_sorted(target)?;

    let mut diffs = source
        .iter()
        .map(|mapping| AnnotDiff::from_source(source.transcript(), mapping.clone()))
        .collect::<Vec<_>>();

    let mut resume = 0;
    for mapping in target {
        resume = add_target(&mut diffs, mapping, resume)?;
    }

    Ok(TransAnnotDiffs {
        transcript_id: source.transcript_id().to_string(),
        chromosome: source.chromosome().to_string(),
        transcript: source.transcript().clone(),
        diffs,
    })
}

/// Ensures that the annotations of a locus are sorted by genomic start.
fn check_sorted(mappings: &TransAnnotMappings) -> Result<()> {
    let unsorted = mappings
        .mappings()
        .windows(2)
        .position(|pair| pair[1].coords().start() < pair[0].coords().start());

    match unsorted {
        Some(i) => Err(Error::Unsorted(
            format!("{}@{}", mappings.transcript_id(), mappings.chromosome()),
            i + 1,
        )),
        None => Ok(()),
    }
}

/// Merges a target annotation into the entries, searching from `from`.
///
/// Returns the index to resume searching from for the next target. Targets
/// arrive sorted by start, so no source entry before the first one that ends
/// after this target's start can overlap a later target.
fn add_target(diffs: &mut Vec<AnnotDiff>, target: &AnnotationMapping, from: usize) -> Result<usize> {
    let coords = target.coords();

    let found = diffs
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, diff)| diff.source.is_some() && coords.start() < diff.coords.end())
        .map(|(i, _)| i);

    let index = match found {
        Some(index) => index,
        None => {
            diffs.push(AnnotDiff::from_target(target.clone()));
            return Ok(diffs.len() - 1);
        }
    };

    if !coords.overlaps(&diffs[index].coords).map_err(Error::Coords)? {
        diffs.insert(index, AnnotDiff::from_target(target.clone()));
        return Ok(index);
    }

    let mut i = index;
    while i < diffs.len() && diffs[i].coords.start() < coords.end() {
        let diff = &mut diffs[i];

        if diff.source.is_some() && coords.overlaps(&diff.coords).map_err(Error::Coords)? {
            diff.targets.push(target.clone());
        }

        i += 1;
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use omics::coordinate::Strand;

    use super::*;
    use crate::fixtures;
    use crate::fixtures::Placed;

    fn compare(
        source: &[Placed<'_>],
        target: &[Placed<'_>],
    ) -> std::result::Result<TransAnnotDiffs, Box<dyn std::error::Error>> {
        let transcript = fixtures::two_exon_transcript();
        let source = fixtures::locus(&transcript, source);
        let target = fixtures::locus(&transcript, target);

        Ok(compare_trans_annotations(&source, &target)?)
    }

    /// Summarizes each entry as (source map id, target map ids).
    fn summary(diffs: &TransAnnotDiffs) -> Vec<(Option<String>, Vec<String>)> {
        diffs
            .iter()
            .map(|diff| {
                (
                    diff.source()
                        .map(|source| source.reference().map_id().to_string()),
                    diff.targets()
                        .iter()
                        .map(|target| target.reference().map_id().to_string())
                        .collect(),
                )
            })
            .collect()
    }

    fn entry(source: Option<&str>, targets: &[&str]) -> (Option<String>, Vec<String>) {
        (
            source.map(String::from),
            targets.iter().map(|target| target.to_string()).collect(),
        )
    }

    fn is_sorted(diffs: &TransAnnotDiffs) -> bool {
        diffs
            .diffs()
            .windows(2)
            .all(|pair| pair[0].coords().start() <= pair[1].coords().start())
    }

    #[test]
    fn empty_target() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let transcript = fixtures::two_exon_transcript();
        let source = fixtures::locus(
            &transcript,
            &[
                ("Q9BXI3|0|0", 30, &[(0, 120, 30)]),
                ("Q9BXI3|1|0", 30, &[]),
                ("Q9BXI3|2|0", 30, &[(0, 310, 30)]),
            ],
        );
        let target = TransAnnotMappings::new(
            String::from("ENST1"),
            String::from("chr1"),
            transcript,
            Vec::new(),
        );

        let diffs = compare_trans_annotations(&source, &target)?;

        assert_eq!(diffs.len(), source.len());
        for (diff, mapping) in diffs.iter().zip(source.iter()) {
            assert_eq!(diff.source(), Some(mapping));
            assert_eq!(diff.coords(), mapping.coords());
            assert!(diff.targets().is_empty());
        }

        Ok(())
    }

    #[test]
    fn comparing_twice_is_equal() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let source: &[Placed<'_>] = &[
            ("Q9BXI3|0|0", 80, &[(0, 120, 50), (50, 350, 30)]),
            ("Q9BXI3|1|0", 10, &[]),
        ];
        let target: &[Placed<'_>] = &[
            ("Q9BXI3|5|0", 30, &[(0, 150, 30)]),
            ("Q9BXI3|6|0", 10, &[(0, 385, 10)]),
        ];

        assert_eq!(compare(source, target)?, compare(source, target)?);

        Ok(())
    }

    #[test]
    fn gaps_reaching_into_both_exons() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let diffs = compare(
            &[("Q9BXI3|0|0", 80, &[(0, 120, 50), (50, 350, 30)])],
            &[("Q9BXI3|5|0", 80, &[(0, 120, 50), (50, 350, 30)])],
        )?;

        let diff = &diffs.diffs()[0];
        assert_eq!(diffs.len(), 1);
        assert_eq!(diff.targets().len(), 1);
        assert_eq!(
            diff.source_indels(),
            Some(
                &[
                    FeatureIndel::new(IndelKind::Insertion, 30, 170, 200),
                    FeatureIndel::new(IndelKind::Insertion, 50, 300, 350),
                ][..]
            )
        );
        assert_eq!(diff.category(), Category::MajorDiff);

        Ok(())
    }

    #[test]
    fn spliced_across_the_intron() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let diffs = compare(
            &[("Q9BXI3|0|0", 110, &[(0, 120, 80), (80, 300, 30)])],
            &[("Q9BXI3|5|0", 110, &[(0, 120, 80), (80, 300, 30)])],
        )?;

        let diff = &diffs.diffs()[0];
        assert_eq!(diff.source_indels(), Some(&[][..]));
        assert_eq!(diff.category(), Category::Complete);
        assert_eq!(diff.targets().len(), 1);

        Ok(())
    }

    #[test]
    fn target_in_the_intron() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let diffs = compare(
            &[
                ("Q9BXI3|0|0", 80, &[(0, 120, 80)]),
                ("Q9BXI3|1|0", 30, &[(0, 300, 30)]),
            ],
            &[("Q9BXI3|5|0", 10, &[(0, 250, 10)])],
        )?;

        assert_eq!(
            summary(&diffs),
            [
                entry(Some("Q9BXI3|0|0"), &[]),
                entry(None, &["Q9BXI3|5|0"]),
                entry(Some("Q9BXI3|1|0"), &[]),
            ]
        );
        assert_eq!(diffs.diffs()[1].coords().to_string(), "chr1:+:250-260");
        assert_eq!(diffs.diffs()[1].category(), Category::Inserted);
        assert!(is_sorted(&diffs));

        Ok(())
    }

    #[test]
    fn target_spanning_several_sources() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let diffs = compare(
            &[
                ("Q9BXI3|0|0", 20, &[(0, 110, 20)]),
                ("Q9BXI3|1|0", 20, &[(0, 140, 20)]),
                ("Q9BXI3|2|0", 20, &[(0, 170, 20)]),
            ],
            &[
                ("Q9BXI3|5|0", 30, &[(0, 120, 30)]),
                ("Q9BXI3|6|0", 5, &[(0, 175, 5)]),
            ],
        )?;

        assert_eq!(
            summary(&diffs),
            [
                entry(Some("Q9BXI3|0|0"), &["Q9BXI3|5|0"]),
                entry(Some("Q9BXI3|1|0"), &["Q9BXI3|5|0"]),
                entry(Some("Q9BXI3|2|0"), &["Q9BXI3|6|0"]),
            ]
        );

        Ok(())
    }

    #[test]
    fn targets_after_every_source() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let diffs = compare(
            &[("Q9BXI3|0|0", 20, &[(0, 110, 20)])],
            &[
                ("Q9BXI3|5|0", 10, &[(0, 350, 10)]),
                ("Q9BXI3|6|0", 10, &[(0, 370, 10)]),
            ],
        )?;

        assert_eq!(
            summary(&diffs),
            [
                entry(Some("Q9BXI3|0|0"), &[]),
                entry(None, &["Q9BXI3|5|0"]),
                entry(None, &["Q9BXI3|6|0"]),
            ]
        );
        assert!(is_sorted(&diffs));

        Ok(())
    }

    #[test]
    fn targets_in_a_deleted_source() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // The unmapped source annotation is placed in the gap [130, 300).
        let diffs = compare(
            &[
                ("Q9BXI3|0|0", 20, &[(0, 110, 20)]),
                ("Q9BXI3|1|0", 40, &[]),
                ("Q9BXI3|2|0", 20, &[(0, 300, 20)]),
            ],
            &[("Q9BXI3|5|0", 20, &[(0, 150, 20)])],
        )?;

        let deleted = &diffs.diffs()[1];
        assert_eq!(deleted.coords().to_string(), "chr1:130-300");
        assert_eq!(deleted.category(), Category::Deleted);
        assert_eq!(
            deleted.source_indels(),
            Some(&[FeatureIndel::new(IndelKind::FullDeletion, 40, 130, 130)][..])
        );
        assert_eq!(deleted.targets().len(), 1);

        Ok(())
    }

    #[test]
    fn minor_differences() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // 5 of 100 positions did not align.
        let diffs = compare(&[("Q9BXI3|0|0", 100, &[(5, 100, 95)])], &[])?;
        assert_eq!(diffs.diffs()[0].category(), Category::MinorDiff);

        // 11 of 100 positions did not align.
        let diffs = compare(&[("Q9BXI3|0|0", 100, &[(11, 100, 89)])], &[])?;
        assert_eq!(diffs.diffs()[0].category(), Category::MajorDiff);

        Ok(())
    }

    #[test]
    fn transcript_mismatch() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let x = fixtures::transcript("ENST1", "chrX", Strand::Positive, &[(100, 200)]);
        let y = fixtures::transcript("ENST1", "chrY", Strand::Positive, &[(100, 200)]);

        let source = fixtures::locus(&x, &[("P0DTU3|0|0", 20, &[(0, 110, 20)])]);
        let target = fixtures::locus(&y, &[("P0DTU3|0|1", 20, &[(0, 110, 20)])]);

        let err = compare_trans_annotations(&source, &target).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot compare annotations of different transcript loci: `ENST1@chrX` and \
             `ENST1@chrY`"
        );

        Ok(())
    }

    #[test]
    fn unsorted_targets() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let transcript = fixtures::two_exon_transcript();
        let source = fixtures::locus(&transcript, &[("Q9BXI3|0|0", 20, &[(0, 110, 20)])]);
        let target = fixtures::locus(
            &transcript,
            &[
                ("Q9BXI3|5|0", 20, &[(0, 110, 20)]),
                ("Q9BXI3|6|0", 20, &[(0, 150, 20)]),
            ],
        );

        let mut mappings = target.mappings().to_vec();
        mappings.reverse();
        let target = TransAnnotMappings::new(
            String::from("ENST1"),
            String::from("chr1"),
            transcript,
            mappings,
        );

        let err = compare_trans_annotations(&source, &target).unwrap_err();
        assert_eq!(err, Error::Unsorted(String::from("ENST1@chr1"), 1));

        Ok(())
    }

    #[test]
    fn resuming_matches_a_full_rescan() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let transcript = fixtures::two_exon_transcript();
        let source = fixtures::locus(
            &transcript,
            &[
                ("Q9BXI3|0|0", 20, &[(0, 110, 20)]),
                ("Q9BXI3|1|0", 10, &[]),
                ("Q9BXI3|2|0", 20, &[(0, 160, 20)]),
                ("Q9BXI3|3|0", 30, &[(0, 320, 30)]),
                ("Q9BXI3|4|0", 10, &[]),
            ],
        );
        let target = fixtures::locus(
            &transcript,
            &[
                ("Q9BXI3|5|0", 5, &[(0, 100, 5)]),
                ("Q9BXI3|6|0", 40, &[(0, 120, 40)]),
                ("Q9BXI3|7|0", 10, &[(0, 185, 10)]),
                ("Q9BXI3|8|0", 10, &[(0, 260, 10)]),
                ("Q9BXI3|9|0", 20, &[(0, 340, 20)]),
                ("Q9BXI3|10|0", 10, &[(0, 390, 10)]),
            ],
        );

        let resumed = compare_trans_annotations(&source, &target)?;

        let mut rescanned = source
            .iter()
            .map(|mapping| AnnotDiff::from_source(&transcript, mapping.clone()))
            .collect::<Vec<_>>();
        for mapping in &target {
            add_target(&mut rescanned, mapping, 0)?;
        }

        assert_eq!(resumed.diffs(), &rescanned[..]);
        assert!(is_sorted(&resumed));

        // Every target is attached at least once, and never twice to the same
        // entry.
        for mapping in &target {
            assert!(resumed
                .iter()
                .any(|diff| diff.targets().contains(mapping)));
        }
        for diff in &resumed {
            let ids = summary_ids(diff);
            let mut deduped = ids.clone();
            deduped.dedup();
            assert_eq!(ids, deduped);
        }

        Ok(())
    }

    fn summary_ids(diff: &AnnotDiff) -> Vec<String> {
        diff.targets()
            .iter()
            .map(|target| target.reference().map_id().to_string())
            .collect()
    }

    #[test]
    fn display() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let diffs = compare(
            &[("Q9BXI3|0|0", 100, &[(0, 100, 100)])],
            &[("Q9BXI3|5|0", 10, &[(0, 250, 10)])],
        )?;

        assert_eq!(
            diffs.to_string(),
            "TransAnnotDiffs: ENST1@chr1\n  diff: ENST1: chr1:+:100-200 [complete]\n    source: \
             Q9BXI3|0|0: Q9BXI3|0 Domain [0-10) chr1:+:100-200\n    source indels: []\n    \
             targets: 0\n  diff: ENST1: chr1:+:250-260 [inserted]\n    source: none\n    \
             targets: 1\n      Q9BXI3|5|0: Q9BXI3|5 Domain [0-10) chr1:+:250-260\n"
        );

        Ok(())
    }
}
