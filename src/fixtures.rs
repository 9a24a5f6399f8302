//! Alignments, records, and transcript loci shared by the unit tests.

use nonempty::NonEmpty;
use omics::coordinate::position::Number;
use omics::coordinate::Strand;

use crate::alignment::Block;
use crate::alignment::BlockSet;
use crate::alignment::Builder;
use crate::annotation::record::UniProtFeature;
use crate::annotation::AnnotationId;
use crate::annotation::AnnotationRef;
use crate::annotation::Record;
use crate::mappings;
use crate::mappings::Order;
use crate::mappings::TransAnnotMappings;

/// The size of every test chromosome.
const CHROMOSOME_SIZE: Number = 1_000_000;

/// Builds a transcript alignment with one block per exon.
pub(crate) fn transcript(
    id: &str,
    chromosome: &str,
    strand: Strand,
    exons: &[(Number, Number)],
) -> BlockSet {
    let size = exons.iter().map(|(start, end)| end - start).sum();

    let mut builder = Builder::default()
        .query(id, size, 0, size)
        .unwrap()
        .target(chromosome, CHROMOSOME_SIZE)
        .unwrap()
        .strand(strand)
        .unwrap();

    let mut query_start = 0;
    for (start, end) in exons {
        builder = builder.push_block(Block::with_size(query_start, *start, end - start));
        query_start += end - start;
    }

    builder.try_build().unwrap()
}

/// Builds an annotation alignment from `(query start, target start, size)`
/// blocks. Query starts are on the aligned strand.
pub(crate) fn alignment(
    map_id: &str,
    chromosome: &str,
    size: Number,
    strand: Strand,
    blocks: &[(Number, Number, Number)],
) -> BlockSet {
    let (first, last) = (blocks[0], blocks[blocks.len() - 1]);
    let (aligned_start, aligned_end) = (first.0, last.0 + last.2);

    let (query_start, query_end) = match strand {
        Strand::Positive => (aligned_start, aligned_end),
        Strand::Negative => (size - aligned_end, size - aligned_start),
    };

    let mut builder = Builder::default()
        .query(map_id, size, query_start, query_end)
        .unwrap()
        .target(chromosome, CHROMOSOME_SIZE)
        .unwrap()
        .strand(strand)
        .unwrap();

    for (query_start, target_start, length) in blocks {
        builder = builder.push_block(Block::with_size(*query_start, *target_start, *length));
    }

    builder.try_build().unwrap()
}

/// Builds a domain record for an annotation.
pub(crate) fn record(id: &AnnotationId) -> Record {
    UniProtFeature::try_new(id.clone(), "Domain", None, 0, 10)
        .unwrap()
        .into()
}

/// An annotation placed on a test locus: its map id, its declared size, and
/// its alignment blocks (empty when it did not map).
pub(crate) type Placed<'a> = (&'a str, Number, &'a [(Number, Number, Number)]);

/// Builds the coordinate-ordered annotation mappings of a locus on the
/// positive strand. The annotations must be listed in genomic order.
pub(crate) fn locus(transcript: &BlockSet, annotations: &[Placed<'_>]) -> TransAnnotMappings {
    let mut block_sets = Vec::new();
    let mut references = Vec::new();

    for (map_id, size, blocks) in annotations {
        let alignment_index = match blocks.is_empty() {
            true => None,
            false => {
                block_sets.push(alignment(
                    map_id,
                    transcript.target_name(),
                    *size,
                    Strand::Positive,
                    blocks,
                ));
                Some(block_sets.len() - 1)
            }
        };

        references.push(AnnotationRef::new(
            map_id.parse().unwrap(),
            *size,
            transcript.query_name(),
            transcript.target_name(),
            alignment_index,
        ));
    }

    let references = match NonEmpty::from_vec(references) {
        Some(references) => references,
        None => {
            return TransAnnotMappings::new(
                transcript.query_name().to_string(),
                transcript.target_name().to_string(),
                transcript.clone(),
                Vec::new(),
            )
        }
    };

    mappings::Builder::new(Order::Coordinate)
        .try_build(
            references,
            &block_sets,
            transcript.clone(),
            |id| Some(record(id)),
        )
        .unwrap()
}

/// The two-exon transcript used throughout the tests: exons `[100, 200)` and
/// `[300, 400)` on `chr1`.
pub(crate) fn two_exon_transcript() -> BlockSet {
    transcript("ENST1", "chr1", Strand::Positive, &[(100, 200), (300, 400)])
}
