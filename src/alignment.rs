//! Gapped pairwise alignments represented as sets of ungapped blocks.
//!
//! A [`BlockSet`] is the in-memory form of a single alignment record (in the
//! spirit of a PSL row): a query aligned to a named target sequence through an
//! ordered list of [`Block`]s. Gaps only ever occur _between_ blocks.
//!
//! ```text
//! query   [0=====50)      [50====80)
//!            |                |
//! target  [120===170) ... [350===380)
//! ```
//!
//! Block sets are constructed through a [`Builder`], which validates that the
//! blocks are sorted, non-overlapping, and agree with the declared query
//! bounds.

use nonempty::NonEmpty;
use omics::coordinate::position::Number;
use omics::coordinate::Strand;

use crate::Coords;

pub mod block;
mod builder;

pub use block::Block;
pub use builder::Builder;
pub use builder::Error;
pub use builder::InvalidError;
pub use builder::MissingError;
pub use builder::MultipleError;

/// A gapped alignment of a query onto a target sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockSet {
    /// The query name.
    query_name: String,

    /// The full size of the query.
    query_size: Number,

    /// The start of the aligned portion of the query (positive strand).
    query_start: Number,

    /// The end of the aligned portion of the query (positive strand).
    query_end: Number,

    /// The target name.
    target_name: String,

    /// The full size of the target.
    target_size: Number,

    /// The strand the query is aligned on.
    strand: Strand,

    /// The aligned blocks.
    blocks: NonEmpty<Block>,
}

impl BlockSet {
    /// Gets the query name.
    pub fn query_name(&self) -> &str {
        &self.query_name
    }

    /// Gets the full size of the query.
    pub fn query_size(&self) -> Number {
        self.query_size
    }

    /// Gets the start of the aligned portion of the query.
    ///
    /// This is always expressed on the positive strand of the query, even
    /// when the query is aligned on the negative strand.
    pub fn query_start(&self) -> Number {
        self.query_start
    }

    /// Gets the end of the aligned portion of the query.
    ///
    /// This is always expressed on the positive strand of the query, even
    /// when the query is aligned on the negative strand.
    pub fn query_end(&self) -> Number {
        self.query_end
    }

    /// Gets the target name.
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Gets the full size of the target.
    pub fn target_size(&self) -> Number {
        self.target_size
    }

    /// Gets the strand the query is aligned on.
    pub fn strand(&self) -> &Strand {
        &self.strand
    }

    /// Gets the aligned blocks.
    pub fn blocks(&self) -> &NonEmpty<Block> {
        &self.blocks
    }

    /// Gets the target position where the alignment starts.
    pub fn target_start(&self) -> Number {
        self.blocks.first().target_start()
    }

    /// Gets the target position where the alignment ends.
    pub fn target_end(&self) -> Number {
        self.blocks.last().target_end()
    }

    /// Gets the outer bounds of the alignment on the target.
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::alignment::Block;
    /// use annotmap::alignment::Builder;
    /// use omics::coordinate::Strand;
    ///
    /// let block_set = Builder::default()
    ///     .query("ENST00000235310.7", 200, 0, 200)?
    ///     .target("chr1", 1000)?
    ///     .strand(Strand::Positive)?
    ///     .push_block(Block::try_new(0, 100, 100, 200)?)
    ///     .push_block(Block::try_new(100, 200, 300, 400)?)
    ///     .try_build()?;
    ///
    /// assert_eq!(block_set.coords().to_string(), "chr1:+:100-400");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn coords(&self) -> Coords {
        // Blocks are sorted by the builder, so the start never exceeds the end.
        Coords::try_new(
            self.target_name.clone(),
            self.target_start(),
            self.target_end(),
        )
        .unwrap()
        .with_strand(self.strand.clone())
    }

    /// Computes the target ranges where the blocks of this alignment intersect
    /// the range `[start, end)`.
    ///
    /// When the block set is a transcript alignment, the blocks are exons and
    /// the gaps between them are introns: a range that falls entirely within
    /// an intron has no intersections.
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::alignment::Block;
    /// use annotmap::alignment::Builder;
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
    /// assert_eq!(transcript.target_intersections(200, 300), vec![]);
    /// assert_eq!(
    ///     transcript.target_intersections(170, 350),
    ///     vec![(170, 200), (300, 350)]
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn target_intersections(&self, start: Number, end: Number) -> Vec<(Number, Number)> {
        self.blocks
            .iter()
            .filter_map(|block| {
                let intersection_start = start.max(block.target_start());
                let intersection_end = end.min(block.target_end());

                match intersection_start < intersection_end {
                    true => Some((intersection_start, intersection_end)),
                    false => None,
                }
            })
            .collect()
    }

    /// Gets the number of aligned positions across all blocks.
    pub fn aligned(&self) -> Number {
        self.blocks.iter().map(|block| block.size()).sum()
    }
}

impl std::fmt::Display for BlockSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{} ({}) -> {}:{}-{} ({} blocks)",
            self.query_name,
            self.query_start,
            self.query_end,
            self.strand,
            self.target_name,
            self.target_start(),
            self.target_end(),
            self.blocks.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript() -> BlockSet {
        Builder::default()
            .query("ENST00000235310.7", 200, 0, 200)
            .unwrap()
            .target("chr1", 1000)
            .unwrap()
            .strand(Strand::Positive)
            .unwrap()
            .push_block(Block::with_size(0, 100, 100))
            .push_block(Block::with_size(100, 300, 100))
            .try_build()
            .unwrap()
    }

    #[test]
    fn bounds() {
        let transcript = transcript();
        assert_eq!(transcript.target_start(), 100);
        assert_eq!(transcript.target_end(), 400);
        assert_eq!(transcript.aligned(), 200);
        assert_eq!(
            transcript.to_string(),
            "ENST00000235310.7:0-200 (+) -> chr1:100-400 (2 blocks)"
        );
    }

    #[test]
    fn coords_span_every_block() {
        let coords = transcript().coords();

        assert_eq!(coords.name(), "chr1");
        assert_eq!((coords.start(), coords.end()), (100, 400));
        assert_eq!(coords.strand(), Some(&Strand::Positive));
    }

    #[test]
    fn intersections_with_exons() {
        let transcript = transcript();

        // Exactly the intron.
        assert!(transcript.target_intersections(200, 300).is_empty());

        // One base past the intron on either side.
        assert_eq!(transcript.target_intersections(199, 300), vec![(199, 200)]);
        assert_eq!(transcript.target_intersections(200, 301), vec![(300, 301)]);

        // Spanning a whole exon.
        assert_eq!(transcript.target_intersections(50, 250), vec![(100, 200)]);

        // Zero-length ranges never intersect.
        assert!(transcript.target_intersections(150, 150).is_empty());
    }
}
