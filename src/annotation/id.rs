//! Identifiers for annotations and for mappings of annotations.
//!
//! Annotations are identified by the accession of the protein they were
//! defined on and their index within that protein's annotations
//! (`<accession>|<index>`, e.g. `Q9BXI3|0`). Because one annotation can be
//! mapped to many transcripts, each mapping is further qualified by a mapping
//! index (`<accession>|<index>|<map index>`, e.g. `Q9BXI3|0|1`).

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// The delimiter between the parts of an identifier.
const DELIMITER: char = '|';

/// Matches an annotation identifier.
static ANNOTATION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^|\s]+)\|(\d+)$").unwrap());

/// Matches an annotation mapping identifier.
static ANNOTATION_MAP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^|\s]+)\|(\d+)\|(\d+)$").unwrap());

/// An error related to parsing an identifier.
#[derive(Debug, Eq, PartialEq)]
pub enum ParseError {
    /// An invalid annotation identifier.
    InvalidAnnotationId(String),

    /// An invalid annotation mapping identifier.
    InvalidAnnotationMapId(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidAnnotationId(value) => {
                write!(f, "invalid annotation id: `{value}`")
            }
            ParseError::InvalidAnnotationMapId(value) => {
                write!(f, "invalid annotation mapping id: `{value}`")
            }
        }
    }
}

impl std::error::Error for ParseError {}

////////////////////////////////////////////////////////////////////////////////////////
// Annotation identifiers
////////////////////////////////////////////////////////////////////////////////////////

/// Identifies one annotation within the annotations of a source protein.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AnnotationId {
    /// The accession of the source protein.
    accession: String,

    /// The index of the annotation within the source protein.
    index: usize,
}

impl AnnotationId {
    /// Creates a new [`AnnotationId`].
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::annotation::AnnotationId;
    ///
    /// let id = AnnotationId::new("Q9BXI3", 0);
    /// assert_eq!(id.accession(), "Q9BXI3");
    /// assert_eq!(id.index(), 0);
    /// assert_eq!(id.to_string(), "Q9BXI3|0");
    ///
    /// assert_eq!("Q9BXI3|0".parse::<AnnotationId>()?, id);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(accession: impl Into<String>, index: usize) -> Self {
        Self {
            accession: accession.into(),
            index,
        }
    }

    /// Gets the accession of the source protein.
    pub fn accession(&self) -> &str {
        &self.accession
    }

    /// Gets the index of the annotation within the source protein.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl FromStr for AnnotationId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidAnnotationId(s.to_string());

        let groups = ANNOTATION_ID.captures(s).ok_or_else(invalid)?;
        let index = groups[2].parse().map_err(|_| invalid())?;

        Ok(Self::new(&groups[1], index))
    }
}

impl std::fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{DELIMITER}{}", self.accession, self.index)
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Annotation mapping identifiers
////////////////////////////////////////////////////////////////////////////////////////

/// Identifies one mapping of an annotation onto a transcript.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AnnotationMapId {
    /// The annotation being mapped.
    annotation_id: AnnotationId,

    /// The index of the mapping of the annotation.
    map_index: usize,
}

impl AnnotationMapId {
    /// Creates a new [`AnnotationMapId`].
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::annotation::AnnotationId;
    /// use annotmap::annotation::AnnotationMapId;
    ///
    /// let id = AnnotationMapId::new(AnnotationId::new("Q9BXI3", 0), 1);
    /// assert_eq!(id.annotation_id().to_string(), "Q9BXI3|0");
    /// assert_eq!(id.map_index(), 1);
    /// assert_eq!(id.to_string(), "Q9BXI3|0|1");
    ///
    /// assert_eq!("Q9BXI3|0|1".parse::<AnnotationMapId>()?, id);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(annotation_id: AnnotationId, map_index: usize) -> Self {
        Self {
            annotation_id,
            map_index,
        }
    }

    /// Gets the identifier of the annotation being mapped.
    pub fn annotation_id(&self) -> &AnnotationId {
        &self.annotation_id
    }

    /// Gets the index of the mapping.
    pub fn map_index(&self) -> usize {
        self.map_index
    }
}

impl FromStr for AnnotationMapId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidAnnotationMapId(s.to_string());

        let groups = ANNOTATION_MAP_ID.captures(s).ok_or_else(invalid)?;
        let index = groups[2].parse().map_err(|_| invalid())?;
        let map_index = groups[3].parse().map_err(|_| invalid())?;

        Ok(Self::new(AnnotationId::new(&groups[1], index), map_index))
    }
}

impl std::fmt::Display for AnnotationMapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{DELIMITER}{}", self.annotation_id, self.map_index)
    }
}
