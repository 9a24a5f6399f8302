//! Half-open coordinate ranges on a named sequence.

use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::position::Number;
use omics::coordinate::strand;
use omics::coordinate::Strand;

/// The delimiter between the sequence name and the range.
const NAME_DELIMITER: char = ':';

/// The delimiter between the start and the end of the range.
const RANGE_DELIMITER: char = '-';

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to parsing [`Coords`] from a string.
#[derive(Debug)]
pub enum ParseError {
    /// The string was not of the form `<name>:<start>-<end>` or
    /// `<name>:<strand>:<start>-<end>`.
    InvalidFormat(String),

    /// An invalid start position.
    InvalidStart(ParseIntError),

    /// An invalid end position.
    InvalidEnd(ParseIntError),

    /// An invalid strand.
    InvalidStrand(strand::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidFormat(value) => write!(f, "invalid format: {value}"),
            ParseError::InvalidStart(err) => write!(f, "invalid start: {err}"),
            ParseError::InvalidEnd(err) => write!(f, "invalid end: {err}"),
            ParseError::InvalidStrand(err) => write!(f, "invalid strand: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to [`Coords`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The start position comes after the end position.
    StartAfterEnd(Number, Number),

    /// Two ranges on different sequences were compared.
    DifferentSequences(String, String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::StartAfterEnd(start, end) => {
                write!(f, "start ({start}) is greater than end ({end})")
            }
            Error::DifferentSequences(a, b) => {
                write!(f, "cannot compare ranges on different sequences: `{a}` and `{b}`")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Coords
////////////////////////////////////////////////////////////////////////////////////////

/// A 0-based, half-open range on a named sequence with an optional strand.
///
/// Zero-length ranges are allowed. They are used to position point deletions
/// and the placeholder locations of annotations that did not map.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Coords {
    /// The sequence name.
    name: String,

    /// The start position.
    start: Number,

    /// The end position.
    end: Number,

    /// The strand, if known.
    strand: Option<Strand>,
}

impl Coords {
    /// Attempts to create a new [`Coords`] without a strand.
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::Coords;
    ///
    /// let coords = Coords::try_new("chr1", 100, 200)?;
    /// assert_eq!(coords.name(), "chr1");
    /// assert_eq!(coords.start(), 100);
    /// assert_eq!(coords.end(), 200);
    /// assert_eq!(coords.len(), 100);
    ///
    /// assert!(Coords::try_new("chr1", 200, 100).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(name: impl Into<String>, start: Number, end: Number) -> Result<Self> {
        if start > end {
            return Err(Error::StartAfterEnd(start, end));
        }

        Ok(Self {
            name: name.into(),
            start,
            end,
            strand: None,
        })
    }

    /// Consumes `self` and returns the same range on the specified strand.
    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    /// Gets the sequence name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the start position.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end position.
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the strand, if one was set.
    pub fn strand(&self) -> Option<&Strand> {
        self.strand.as_ref()
    }

    /// Gets the number of positions covered by the range.
    pub fn len(&self) -> Number {
        self.end - self.start
    }

    /// Returns whether the range is zero-length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Determines whether two ranges overlap.
    ///
    /// A zero-length range overlaps a range that strictly contains its
    /// position. Ranges on different sequences cannot be compared.
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::Coords;
    ///
    /// let a = Coords::try_new("chr1", 100, 200)?;
    ///
    /// assert!(a.overlaps(&Coords::try_new("chr1", 150, 250)?)?);
    /// assert!(!a.overlaps(&Coords::try_new("chr1", 200, 250)?)?);
    /// assert!(a.overlaps(&Coords::try_new("chr1", 150, 150)?)?);
    /// assert!(a.overlaps(&Coords::try_new("chr2", 150, 250)?).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn overlaps(&self, other: &Coords) -> Result<bool> {
        if self.name != other.name {
            return Err(Error::DifferentSequences(
                self.name.clone(),
                other.name.clone(),
            ));
        }

        Ok(self.start < other.end && other.start < self.end)
    }
}

impl FromStr for Coords {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts = s.split(NAME_DELIMITER).collect::<Vec<_>>();

        let (name, strand, range) = match parts.as_slice() {
            [name, range] => (*name, None, *range),
            [name, strand, range] => (*name, Some(*strand), *range),
            _ => return Err(ParseError::InvalidFormat(s.to_string())),
        };

        let (start, end) = range
            .split_once(RANGE_DELIMITER)
            .ok_or_else(|| ParseError::InvalidFormat(s.to_string()))?;

        if name.is_empty() {
            return Err(ParseError::InvalidFormat(s.to_string()));
        }

        let start = start.parse().map_err(ParseError::InvalidStart)?;
        let end = end.parse().map_err(ParseError::InvalidEnd)?;

        let coords = Coords::try_new(name, start, end)
            .map_err(|_| ParseError::InvalidFormat(s.to_string()))?;

        match strand {
            Some(strand) => Ok(coords.with_strand(
                strand.parse().map_err(ParseError::InvalidStrand)?,
            )),
            None => Ok(coords),
        }
    }
}

impl std::fmt::Display for Coords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.strand {
            Some(strand) => write!(
                f,
                "{}{NAME_DELIMITER}{}{NAME_DELIMITER}{}{RANGE_DELIMITER}{}",
                self.name, strand, self.start, self.end
            ),
            None => write!(
                f,
                "{}{NAME_DELIMITER}{}{RANGE_DELIMITER}{}",
                self.name, self.start, self.end
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_coords() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let coords = Coords::try_new("chr1", 10, 10)?;
        assert!(coords.is_empty());
        assert_eq!(coords.len(), 0);
        assert_eq!(coords.strand(), None);

        let coords = coords.with_strand(Strand::Negative);
        assert_eq!(coords.strand(), Some(&Strand::Negative));

        Ok(())
    }

    #[test]
    fn start_after_end() {
        let err = Coords::try_new("chr1", 11, 10).unwrap_err();
        assert_eq!(err, Error::StartAfterEnd(11, 10));
        assert_eq!(err.to_string(), "start (11) is greater than end (10)");
    }

    #[test]
    fn overlaps_different_sequences() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let a = Coords::try_new("chrX", 0, 10)?;
        let b = Coords::try_new("chrY", 0, 10)?;

        let err = a.overlaps(&b).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot compare ranges on different sequences: `chrX` and `chrY`"
        );

        Ok(())
    }

    #[test]
    fn zero_length_overlaps() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let point = Coords::try_new("chr1", 200, 200)?;

        assert!(!point.overlaps(&Coords::try_new("chr1", 100, 200)?)?);
        assert!(!point.overlaps(&Coords::try_new("chr1", 200, 300)?)?);
        assert!(point.overlaps(&Coords::try_new("chr1", 190, 210)?)?);
        assert!(!point.overlaps(&point)?);

        Ok(())
    }

    #[test]
    fn parse_and_display() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let coords = "chr1:100-200".parse::<Coords>()?;
        assert_eq!(coords, Coords::try_new("chr1", 100, 200)?);
        assert_eq!(coords.to_string(), "chr1:100-200");

        let coords = "chr1:-:100-200".parse::<Coords>()?;
        assert_eq!(coords.strand(), Some(&Strand::Negative));
        assert_eq!(coords.to_string(), "chr1:-:100-200");

        Ok(())
    }

    #[test]
    fn parse_errors() {
        let err = "chr1".parse::<Coords>().unwrap_err();
        assert_eq!(err.to_string(), "invalid format: chr1");

        let err = "chr1:a-200".parse::<Coords>().unwrap_err();
        assert_eq!(err.to_string(), "invalid start: invalid digit found in string");

        let err = "chr1:100-b".parse::<Coords>().unwrap_err();
        assert_eq!(err.to_string(), "invalid end: invalid digit found in string");

        let err = "chr1:200-100".parse::<Coords>().unwrap_err();
        assert_eq!(err.to_string(), "invalid format: chr1:200-100");
    }
}
