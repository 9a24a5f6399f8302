//! A builder for a [`BlockSet`].

use nonempty::NonEmpty;
use omics::coordinate::position::Number;
use omics::coordinate::Strand;

use crate::alignment::Block;
use crate::alignment::BlockSet;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug, Eq, PartialEq)]
pub enum MissingError {
    /// No blocks were provided to the [`Builder`].
    Blocks,

    /// No query was provided to the [`Builder`].
    Query,

    /// No strand was provided to the [`Builder`].
    Strand,

    /// No target was provided to the [`Builder`].
    Target,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Blocks => write!(f, "blocks"),
            MissingError::Query => write!(f, "query"),
            MissingError::Strand => write!(f, "strand"),
            MissingError::Target => write!(f, "target"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error that occurs when a singular field was provided multiple times to
/// the [`Builder`].
#[derive(Debug, Eq, PartialEq)]
pub enum MultipleError {
    /// The query was provided multiple times to the [`Builder`].
    Query,

    /// The strand was provided multiple times to the [`Builder`].
    Strand,

    /// The target was provided multiple times to the [`Builder`].
    Target,
}

impl std::fmt::Display for MultipleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipleError::Query => write!(f, "query"),
            MultipleError::Strand => write!(f, "strand"),
            MultipleError::Target => write!(f, "target"),
        }
    }
}

impl std::error::Error for MultipleError {}

/// An error that occurs when the provided fields don't describe a valid
/// alignment.
#[derive(Debug, Eq, PartialEq)]
pub enum InvalidError {
    /// The aligned query start comes after the aligned query end.
    QueryStartAfterEnd(Number, Number),

    /// The aligned query end exceeds the size of the query.
    QueryEndExceedsSize(Number, Number),

    /// The last block ends past the size of the target.
    TargetEndExceedsSize(Number, Number),

    /// The block at the index overlaps or precedes the block before it.
    UnsortedBlocks(usize),

    /// The blocks don't start and end at the declared query bounds.
    MisalignedBlocks,
}

impl std::fmt::Display for InvalidError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidError::QueryStartAfterEnd(start, end) => {
                write!(f, "query start ({start}) is greater than query end ({end})")
            }
            InvalidError::QueryEndExceedsSize(end, size) => {
                write!(f, "query end ({end}) exceeds the query size ({size})")
            }
            InvalidError::TargetEndExceedsSize(end, size) => {
                write!(f, "target end ({end}) exceeds the target size ({size})")
            }
            InvalidError::UnsortedBlocks(index) => write!(
                f,
                "block {index} overlaps or precedes the previous block"
            ),
            InvalidError::MisalignedBlocks => write!(
                f,
                "the blocks don't agree with the aligned query bounds"
            ),
        }
    }
}

impl std::error::Error for InvalidError {}

/// An error related to a [`Builder`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// A required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// A singular field was provided to the [`Builder`] more than once.
    Multiple(MultipleError),

    /// The fields don't describe a valid alignment.
    Invalid(InvalidError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::Multiple(err) => write!(f, "singular field set multiple times: {err}"),
            Error::Invalid(err) => write!(f, "invalid alignment: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// The query fields of a [`Builder`].
#[derive(Debug)]
struct Query {
    /// The query name.
    name: String,

    /// The query size.
    size: Number,

    /// The aligned query start.
    start: Number,

    /// The aligned query end.
    end: Number,
}

/// A builder for a [`BlockSet`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The query.
    query: Option<Query>,

    /// The target name and size.
    target: Option<(String, Number)>,

    /// The aligned strand.
    strand: Option<Strand>,

    /// The blocks.
    blocks: Option<NonEmpty<Block>>,
}

impl Builder {
    /// Sets the query name, its full size, and the aligned portion of it
    /// (expressed on the positive strand).
    pub fn query(
        mut self,
        name: impl Into<String>,
        size: Number,
        start: Number,
        end: Number,
    ) -> Result<Self> {
        if self.query.is_some() {
            return Err(Error::Multiple(MultipleError::Query));
        }

        self.query = Some(Query {
            name: name.into(),
            size,
            start,
            end,
        });

        Ok(self)
    }

    /// Sets the target name and its full size.
    pub fn target(mut self, name: impl Into<String>, size: Number) -> Result<Self> {
        if self.target.is_some() {
            return Err(Error::Multiple(MultipleError::Target));
        }

        self.target = Some((name.into(), size));
        Ok(self)
    }

    /// Sets the strand the query is aligned on.
    pub fn strand(mut self, strand: Strand) -> Result<Self> {
        if self.strand.is_some() {
            return Err(Error::Multiple(MultipleError::Strand));
        }

        self.strand = Some(strand);
        Ok(self)
    }

    /// Pushes a [`Block`] into the [`Builder`].
    ///
    /// Blocks must be pushed in increasing query and target order.
    pub fn push_block(mut self, block: Block) -> Self {
        let blocks = match self.blocks {
            Some(mut blocks) => {
                blocks.push(block);
                blocks
            }
            None => NonEmpty::new(block),
        };

        self.blocks = Some(blocks);
        self
    }

    /// Consumes `self` to attempt to build a [`BlockSet`].
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::alignment::Block;
    /// use annotmap::alignment::Builder;
    /// use omics::coordinate::Strand;
    ///
    /// let block_set = Builder::default()
    ///     .query("Q9BXI3|0|0", 80, 0, 80)?
    ///     .target("chr1", 1000)?
    ///     .strand(Strand::Positive)?
    ///     .push_block(Block::try_new(0, 50, 120, 170)?)
    ///     .push_block(Block::try_new(50, 80, 350, 380)?)
    ///     .try_build()?;
    ///
    /// assert_eq!(block_set.blocks().len(), 2);
    /// assert_eq!(block_set.target_start(), 120);
    /// assert_eq!(block_set.target_end(), 380);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<BlockSet> {
        let query = self.query.ok_or(Error::Missing(MissingError::Query))?;
        let (target_name, target_size) = self.target.ok_or(Error::Missing(MissingError::Target))?;
        let strand = self.strand.ok_or(Error::Missing(MissingError::Strand))?;
        let blocks = self.blocks.ok_or(Error::Missing(MissingError::Blocks))?;

        if query.start > query.end {
            return Err(Error::Invalid(InvalidError::QueryStartAfterEnd(
                query.start,
                query.end,
            )));
        }

        if query.end > query.size {
            return Err(Error::Invalid(InvalidError::QueryEndExceedsSize(
                query.end, query.size,
            )));
        }

        for (i, pair) in blocks.iter().collect::<Vec<_>>().windows(2).enumerate() {
            let (previous, current) = (pair[0], pair[1]);

            if current.query_start() < previous.query_end()
                || current.target_start() < previous.target_end()
            {
                return Err(Error::Invalid(InvalidError::UnsortedBlocks(i + 1)));
            }
        }

        if blocks.last().target_end() > target_size {
            return Err(Error::Invalid(InvalidError::TargetEndExceedsSize(
                blocks.last().target_end(),
                target_size,
            )));
        }

        // Block query positions are on the aligned strand, whereas the declared
        // bounds are always on the positive strand.
        let (expected_start, expected_end) = match strand {
            Strand::Positive => (query.start, query.end),
            Strand::Negative => (query.size - query.end, query.size - query.start),
        };

        if blocks.first().query_start() != expected_start
            || blocks.last().query_end() != expected_end
        {
            return Err(Error::Invalid(InvalidError::MisalignedBlocks));
        }

        Ok(BlockSet {
            query_name: query.name,
            query_size: query.size,
            query_start: query.start,
            query_end: query.end,
            target_name,
            target_size,
            strand,
            blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> std::result::Result<Builder, Box<dyn std::error::Error>> {
        Ok(Builder::default()
            .query("Q9BXI3|0|0", 80, 0, 80)?
            .target("chr1", 1000)?
            .strand(Strand::Positive)?)
    }

    #[test]
    fn it_fails_when_no_blocks_are_provided(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = builder()?.try_build().unwrap_err();
        assert_eq!(err.to_string(), "missing required field: blocks");
        Ok(())
    }

    #[test]
    fn it_fails_when_no_query_is_provided() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let err = Builder::default()
            .target("chr1", 1000)?
            .push_block(Block::with_size(0, 0, 10))
            .try_build()
            .unwrap_err();

        assert_eq!(err.to_string(), "missing required field: query");
        Ok(())
    }

    #[test]
    fn it_fails_when_the_strand_is_provided_more_than_once(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = builder()?.strand(Strand::Negative).unwrap_err();
        assert_eq!(err.to_string(), "singular field set multiple times: strand");
        Ok(())
    }

    #[test]
    fn it_fails_on_overlapping_blocks() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = builder()?
            .push_block(Block::with_size(0, 120, 50))
            .push_block(Block::with_size(40, 350, 40))
            .try_build()
            .unwrap_err();

        assert_eq!(err, Error::Invalid(InvalidError::UnsortedBlocks(1)));
        assert_eq!(
            err.to_string(),
            "invalid alignment: block 1 overlaps or precedes the previous block"
        );

        let err = builder()?
            .push_block(Block::with_size(0, 120, 50))
            .push_block(Block::with_size(50, 160, 30))
            .try_build()
            .unwrap_err();

        assert_eq!(err, Error::Invalid(InvalidError::UnsortedBlocks(1)));
        Ok(())
    }

    #[test]
    fn it_fails_when_query_end_exceeds_size(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .query("Q9BXI3|0|0", 80, 0, 81)?
            .target("chr1", 1000)?
            .strand(Strand::Positive)?
            .push_block(Block::with_size(0, 120, 81))
            .try_build()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "invalid alignment: query end (81) exceeds the query size (80)"
        );
        Ok(())
    }

    #[test]
    fn it_fails_when_target_end_exceeds_size(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = builder()?
            .push_block(Block::with_size(0, 950, 80))
            .try_build()
            .unwrap_err();

        assert_eq!(
            err,
            Error::Invalid(InvalidError::TargetEndExceedsSize(1030, 1000))
        );
        Ok(())
    }

    #[test]
    fn it_fails_on_misaligned_blocks() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = builder()?
            .push_block(Block::with_size(10, 120, 70))
            .try_build()
            .unwrap_err();

        assert_eq!(err, Error::Invalid(InvalidError::MisalignedBlocks));
        Ok(())
    }

    #[test]
    fn negative_strand_blocks_are_checked_against_the_reversed_bounds(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        // Aligned query positions 10-80 on the positive strand are 0-70 on the
        // negative strand of a query of size 80.
        let block_set = Builder::default()
            .query("Q9BXI3|0|0", 80, 10, 80)?
            .target("chr1", 1000)?
            .strand(Strand::Negative)?
            .push_block(Block::with_size(0, 120, 30))
            .push_block(Block::with_size(30, 300, 40))
            .try_build()?;

        assert_eq!(block_set.query_start(), 10);
        assert_eq!(block_set.strand(), &Strand::Negative);

        let err = Builder::default()
            .query("Q9BXI3|0|0", 80, 10, 80)?
            .target("chr1", 1000)?
            .strand(Strand::Negative)?
            .push_block(Block::with_size(10, 120, 70))
            .try_build()
            .unwrap_err();

        assert_eq!(err, Error::Invalid(InvalidError::MisalignedBlocks));
        Ok(())
    }
}
