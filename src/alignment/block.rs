//! An ungapped aligned block.

use omics::coordinate::position::Number;

/// An error related to a [`Block`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The query side and the target side of the block have different sizes.
    /// Gaps only occur _between_ blocks, so this indicates a malformed block.
    SizesDontMatch(Number, Number),

    /// A start position comes after its end position.
    StartAfterEnd(Number, Number),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SizesDontMatch(query, target) => write!(
                f,
                "query block size ({query}) doesn't match target block size ({target})"
            ),
            Error::StartAfterEnd(start, end) => {
                write!(f, "block start ({start}) is greater than block end ({end})")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A single ungapped block of an alignment that maps a query range onto a
/// target range of the same size.
///
/// Query positions are expressed on the aligned strand of the query, target
/// positions are always on the positive strand of the target.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Block {
    /// The query start.
    query_start: Number,

    /// The query end.
    query_end: Number,

    /// The target start.
    target_start: Number,

    /// The target end.
    target_end: Number,
}

impl Block {
    /// Attempts to create a new [`Block`].
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::alignment::Block;
    ///
    /// let block = Block::try_new(0, 50, 120, 170)?;
    /// assert_eq!(block.size(), 50);
    ///
    /// let err = Block::try_new(0, 50, 120, 171).unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "query block size (50) doesn't match target block size (51)"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        query_start: Number,
        query_end: Number,
        target_start: Number,
        target_end: Number,
    ) -> Result<Self> {
        if query_start > query_end {
            return Err(Error::StartAfterEnd(query_start, query_end));
        }

        if target_start > target_end {
            return Err(Error::StartAfterEnd(target_start, target_end));
        }

        let query_size = query_end - query_start;
        let target_size = target_end - target_start;

        if query_size != target_size {
            return Err(Error::SizesDontMatch(query_size, target_size));
        }

        Ok(Self {
            query_start,
            query_end,
            target_start,
            target_end,
        })
    }

    /// Creates a [`Block`] of `size` starting at the given query and target
    /// positions.
    pub fn with_size(query_start: Number, target_start: Number, size: Number) -> Self {
        Self {
            query_start,
            query_end: query_start + size,
            target_start,
            target_end: target_start + size,
        }
    }

    /// Gets the query start.
    pub fn query_start(&self) -> Number {
        self.query_start
    }

    /// Gets the query end.
    pub fn query_end(&self) -> Number {
        self.query_end
    }

    /// Gets the target start.
    pub fn target_start(&self) -> Number {
        self.target_start
    }

    /// Gets the target end.
    pub fn target_end(&self) -> Number {
        self.target_end
    }

    /// Gets the number of aligned positions in the block.
    pub fn size(&self) -> Number {
        self.query_end - self.query_start
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{} -> {}-{}",
            self.query_start, self.query_end, self.target_start, self.target_end
        )
    }
}
