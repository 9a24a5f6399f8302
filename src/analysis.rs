//! Classifying how an annotation was disrupted by its mapping.
//!
//! An annotation that maps cleanly onto its transcript is covered by
//! alignment blocks end to end, and the only gaps on the genome side of the
//! alignment are the transcript's own introns. Everything else is reported as
//! a [`FeatureIndel`]:
//!
//! ```text
//! exons        [100=========200)          [300=========400)
//! annotation       [120==170)                   [350==380)
//!                            |<-- insertion -->|
//!                         [170,200)         [300,350)
//! ```
//!
//! Genome-side gaps are intersected with the transcript exons, so a gap that
//! falls entirely within an intron produces nothing.

use omics::coordinate::position::Number;
use omics::coordinate::Strand;

use crate::alignment::BlockSet;
use crate::annotation::AnnotationMapping;

/// The kind of an indel event.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IndelKind {
    /// The 5' end of the annotation did not align.
    Deletion5p,

    /// The 3' end of the annotation did not align.
    Deletion3p,

    /// A portion of the annotation between two aligned blocks did not align.
    InternalDeletion,

    /// No part of the annotation aligned.
    FullDeletion,

    /// Genomic sequence within an exon was inserted into the annotation.
    Insertion,
}

impl IndelKind {
    /// Gets a human readable description of the indel kind.
    pub fn description(&self) -> &'static str {
        match self {
            IndelKind::Deletion5p => "5' deletion",
            IndelKind::Deletion3p => "3' deletion",
            IndelKind::InternalDeletion => "internal deletion",
            IndelKind::FullDeletion => "full deletion",
            IndelKind::Insertion => "insertion",
        }
    }

    /// Whether the indel kind removes part of the annotation.
    pub fn is_deletion(&self) -> bool {
        !matches!(self, IndelKind::Insertion)
    }
}

impl std::fmt::Display for IndelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndelKind::Deletion5p => write!(f, "del_5p"),
            IndelKind::Deletion3p => write!(f, "del_3p"),
            IndelKind::InternalDeletion => write!(f, "del_internal"),
            IndelKind::FullDeletion => write!(f, "del_full"),
            IndelKind::Insertion => write!(f, "insertion"),
        }
    }
}

/// An indel event within a mapped annotation.
///
/// For deletions, the length is the number of annotation positions that did
/// not align. For insertions, it is the number of genomic positions inserted.
/// The genomic range may be zero-length (for example, a deletion at the end
/// of an annotation is anchored at the boundary of the aligned blocks).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FeatureIndel {
    /// The kind of the event.
    kind: IndelKind,

    /// The length of the event.
    length: Number,

    /// The genomic start of the event.
    target_start: Number,

    /// The genomic end of the event.
    target_end: Number,
}

impl FeatureIndel {
    /// Creates a new [`FeatureIndel`].
    pub fn new(kind: IndelKind, length: Number, target_start: Number, target_end: Number) -> Self {
        Self {
            kind,
            length,
            target_start,
            target_end,
        }
    }

    /// Gets the kind of the event.
    pub fn kind(&self) -> IndelKind {
        self.kind
    }

    /// Gets the length of the event.
    pub fn length(&self) -> Number {
        self.length
    }

    /// Gets the genomic start of the event.
    pub fn target_start(&self) -> Number {
        self.target_start
    }

    /// Gets the genomic end of the event.
    pub fn target_end(&self) -> Number {
        self.target_end
    }
}

impl std::fmt::Display for FeatureIndel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}) {}-{}",
            self.kind, self.length, self.target_start, self.target_end
        )
    }
}

/// Analyzes how an annotation was disrupted by its mapping onto the genome.
///
/// `transcript` is the alignment of the transcript carrying the annotation;
/// its blocks are taken to be the exons. Events are reported in the order:
/// leading gap, gaps between blocks (in block order), and trailing gap.
///
/// An annotation that did not map yields a single full deletion of the
/// annotation's declared size, anchored at the start of its placeholder
/// range.
///
/// # Examples
///
/// ```
/// use annotmap::alignment::Block;
/// use annotmap::alignment::Builder;
/// use annotmap::analysis::analyze_feature_mapping;
/// use annotmap::analysis::IndelKind;
/// use annotmap::annotation::record::UniProtFeature;
/// use annotmap::annotation::AnnotationMapping;
/// use annotmap::annotation::AnnotationRef;
/// use omics::coordinate::Strand;
///
/// let transcript = Builder::default()
///     .query("ENST00000235310.7", 200, 0, 200)?
///     .target("chr1", 1000)?
///     .strand(Strand::Positive)?
///     .push_block(Block::try_new(0, 100, 100, 200)?)
///     .push_block(Block::try_new(100, 200, 300, 400)?)
///     .try_build()?;
///
/// // The first 10 positions of the annotation did not align.
/// let block_set = Builder::default()
///     .query("Q9BXI3|0|0", 90, 10, 90)?
///     .target("chr1", 1000)?
///     .strand(Strand::Positive)?
///     .push_block(Block::try_new(10, 90, 120, 200)?)
///     .try_build()?;
///
/// let reference = AnnotationRef::new("Q9BXI3|0|0".parse()?, 90, "ENST00000235310.7", "chr1", Some(0));
/// let record = UniProtFeature::try_new(reference.annotation_id().clone(), "Domain", None, 0, 30)?;
/// let mapping = AnnotationMapping::try_mapped(reference, block_set, record.into())?;
///
/// let indels = analyze_feature_mapping(&transcript, &mapping);
/// assert_eq!(indels.len(), 1);
/// assert_eq!(indels[0].kind(), IndelKind::Deletion5p);
/// assert_eq!(indels[0].length(), 10);
/// assert_eq!(indels[0].target_start(), 120);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn analyze_feature_mapping(
    transcript: &BlockSet,
    mapping: &AnnotationMapping,
) -> Vec<FeatureIndel> {
    match mapping.block_set() {
        Some(block_set) => analyze_partial_deletion(transcript, block_set),
        None => {
            let position = mapping.coords().start();
            vec![FeatureIndel::new(
                IndelKind::FullDeletion,
                mapping.reference().size(),
                position,
                position,
            )]
        }
    }
}

/// Analyzes an annotation that at least partially aligned.
fn analyze_partial_deletion(transcript: &BlockSet, block_set: &BlockSet) -> Vec<FeatureIndel> {
    let mut indels = Vec::new();

    indels.extend(analyze_start(block_set));

    let blocks = block_set.blocks().iter().collect::<Vec<_>>();
    for pair in blocks.windows(2) {
        let (block, next) = (pair[0], pair[1]);

        if block.query_end() < next.query_start() {
            indels.push(FeatureIndel::new(
                IndelKind::InternalDeletion,
                next.query_start() - block.query_end(),
                block.target_end(),
                next.target_start(),
            ));
        }

        if block.target_end() < next.target_start() {
            indels.extend(
                transcript
                    .target_intersections(block.target_end(), next.target_start())
                    .into_iter()
                    .map(|(start, end)| {
                        FeatureIndel::new(IndelKind::Insertion, end - start, start, end)
                    }),
            );
        }
    }

    indels.extend(analyze_end(block_set));
    indels
}

/// Analyzes the unaligned portion before the start of the query.
fn analyze_start(block_set: &BlockSet) -> Option<FeatureIndel> {
    if block_set.query_start() == 0 {
        return None;
    }

    let (kind, position) = match block_set.strand() {
        Strand::Positive => (IndelKind::Deletion5p, block_set.target_start()),
        Strand::Negative => (IndelKind::Deletion3p, block_set.target_end()),
    };

    Some(FeatureIndel::new(
        kind,
        block_set.query_start(),
        position,
        position,
    ))
}

/// Analyzes the unaligned portion after the end of the query.
fn analyze_end(block_set: &BlockSet) -> Option<FeatureIndel> {
    if block_set.query_end() >= block_set.query_size() {
        return None;
    }

    let (kind, position) = match block_set.strand() {
        Strand::Positive => (IndelKind::Deletion3p, block_set.target_end()),
        Strand::Negative => (IndelKind::Deletion5p, block_set.target_start()),
    };

    Some(FeatureIndel::new(
        kind,
        block_set.query_size() - block_set.query_end(),
        position,
        position,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn analyze(annotation: fixtures::Placed<'_>) -> Vec<FeatureIndel> {
        let transcript = fixtures::two_exon_transcript();
        let locus = fixtures::locus(&transcript, &[annotation]);
        analyze_feature_mapping(&transcript, &locus.mappings()[0])
    }

    fn indel(kind: IndelKind, length: Number, start: Number, end: Number) -> FeatureIndel {
        FeatureIndel::new(kind, length, start, end)
    }

    #[test]
    fn exactly_one_exon() {
        assert!(analyze(("Q9BXI3|0|0", 100, &[(0, 100, 100)])).is_empty());
    }

    #[test]
    fn spliced_across_the_intron() {
        // The genome-side gap is exactly the intron.
        let indels = analyze(("Q9BXI3|0|0", 110, &[(0, 120, 80), (80, 300, 30)]));
        assert!(indels.is_empty());
    }

    #[test]
    fn one_base_past_the_intron() {
        let indels = analyze(("Q9BXI3|0|0", 109, &[(0, 120, 79), (79, 300, 30)]));
        assert_eq!(indels, [indel(IndelKind::Insertion, 1, 199, 200)]);

        let indels = analyze(("Q9BXI3|0|0", 109, &[(0, 120, 80), (80, 301, 29)]));
        assert_eq!(indels, [indel(IndelKind::Insertion, 1, 300, 301)]);
    }

    #[test]
    fn gaps_reaching_into_both_exons() {
        let indels = analyze(("Q9BXI3|0|0", 80, &[(0, 120, 50), (50, 350, 30)]));
        assert_eq!(
            indels,
            [
                indel(IndelKind::Insertion, 30, 170, 200),
                indel(IndelKind::Insertion, 50, 300, 350),
            ]
        );
    }

    #[test]
    fn skipped_exon() {
        let transcript = fixtures::transcript(
            "ENST1",
            "chr1",
            Strand::Positive,
            &[(100, 200), (300, 400), (500, 600)],
        );
        let locus = fixtures::locus(
            &transcript,
            &[("Q9BXI3|0|0", 100, &[(0, 150, 50), (50, 500, 50)])],
        );

        // Only the skipped exon is reported, not the flanking introns.
        let indels = analyze_feature_mapping(&transcript, &locus.mappings()[0]);
        assert_eq!(indels, [indel(IndelKind::Insertion, 100, 300, 400)]);
    }

    #[test]
    fn deletions_in_order() {
        // 5 unaligned at the start, 10 between the blocks, and 7 at the end.
        let transcript = fixtures::two_exon_transcript();
        let block_set = fixtures::alignment(
            "Q9BXI3|0|0",
            "chr1",
            92,
            Strand::Positive,
            &[(5, 110, 40), (55, 150, 30)],
        );

        let indels = analyze_partial_deletion(&transcript, &block_set);
        assert_eq!(
            indels,
            [
                indel(IndelKind::Deletion5p, 5, 110, 110),
                indel(IndelKind::InternalDeletion, 10, 150, 150),
                indel(IndelKind::Deletion3p, 7, 180, 180),
            ]
        );
    }

    #[test]
    fn negative_strand_end_deletions() {
        // Positive-strand query bounds [5, 85) of 92: the leading gap is at the
        // 3' end of the genome and the trailing gap is at the 5' end.
        let transcript = fixtures::two_exon_transcript();
        let block_set = fixtures::alignment(
            "Q9BXI3|0|0",
            "chr1",
            92,
            Strand::Negative,
            &[(7, 110, 80)],
        );
        assert_eq!(block_set.query_start(), 5);

        let indels = analyze_partial_deletion(&transcript, &block_set);
        assert_eq!(
            indels,
            [
                indel(IndelKind::Deletion3p, 5, 190, 190),
                indel(IndelKind::Deletion5p, 7, 110, 110),
            ]
        );
    }

    #[test]
    fn unmapped() {
        let indels = analyze(("Q9BXI3|0|0", 80, &[]));
        assert_eq!(indels, [indel(IndelKind::FullDeletion, 80, 100, 100)]);
    }

    #[test]
    fn descriptions() {
        assert_eq!(IndelKind::Deletion5p.description(), "5' deletion");
        assert_eq!(IndelKind::Deletion3p.description(), "3' deletion");
        assert!(!IndelKind::Insertion.is_deletion());
        assert_eq!(
            indel(IndelKind::InternalDeletion, 10, 150, 150).to_string(),
            "del_internal(10) 150-150"
        );
    }
}
