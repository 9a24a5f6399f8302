//! Descriptive records for annotations.
//!
//! Records come in a closed set of families: curated UniProt features and
//! predicted InterPro matches. Every family exposes the same capabilities
//! through the [`Annotation`] trait.

use crate::annotation::AnnotationId;

/// An error related to an annotation record.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The first residue comes after the end of the residue range.
    StartAfterEnd(usize, usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::StartAfterEnd(start, end) => {
                write!(f, "residue start ({start}) is greater than residue end ({end})")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Ensures that a residue range is not inverted.
fn check_residues(start: usize, end: usize) -> Result<()> {
    match start > end {
        true => Err(Error::StartAfterEnd(start, end)),
        false => Ok(()),
    }
}

/// Capabilities shared by every annotation record.
pub trait Annotation {
    /// Gets the identifier of the annotation.
    fn id(&self) -> &AnnotationId;

    /// Gets the 0-based, half-open range of residues the annotation covers on
    /// its protein.
    fn residues(&self) -> (usize, usize);

    /// Gets the number of residues covered by the annotation.
    fn length(&self) -> usize {
        let (start, end) = self.residues();
        end - start
    }

    /// Whether the annotation marks a single residue rather than a region.
    fn is_point(&self) -> bool {
        self.length() == 1
    }

    /// Gets the descriptive text for the annotation, if there is any.
    fn description(&self) -> Option<&str>;

    /// Gets a compact, single-line label for the annotation.
    fn short(&self) -> String;
}

////////////////////////////////////////////////////////////////////////////////////////
// UniProt features
////////////////////////////////////////////////////////////////////////////////////////

/// A curated UniProt feature (a domain, a modified residue, a
/// transmembrane region, etc.).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UniProtFeature {
    /// The annotation identifier.
    id: AnnotationId,

    /// The feature type (e.g. `Domain`, `Modified residue`).
    feature_type: String,

    /// The free-text comment, if any.
    comment: Option<String>,

    /// The first residue (0-based).
    start: usize,

    /// The residue after the last residue.
    end: usize,
}

impl UniProtFeature {
    /// Attempts to create a new [`UniProtFeature`].
    ///
    /// A residue range whose start is after its end is an
    /// [`Error::StartAfterEnd`].
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::annotation::record::Annotation as _;
    /// use annotmap::annotation::record::UniProtFeature;
    /// use annotmap::annotation::AnnotationId;
    ///
    /// let feature = UniProtFeature::try_new(
    ///     AnnotationId::new("Q9BXI3", 0),
    ///     "Domain",
    ///     Some(String::from("SH3")),
    ///     10,
    ///     70,
    /// )?;
    ///
    /// assert_eq!(feature.length(), 60);
    /// assert!(!feature.is_point());
    /// assert_eq!(feature.description(), Some("SH3"));
    /// assert_eq!(feature.short(), "Q9BXI3|0 Domain: SH3 [10-70)");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        id: AnnotationId,
        feature_type: impl Into<String>,
        comment: Option<String>,
        start: usize,
        end: usize,
    ) -> Result<Self> {
        check_residues(start, end)?;

        Ok(Self {
            id,
            feature_type: feature_type.into(),
            comment,
            start,
            end,
        })
    }

    /// Gets the feature type.
    pub fn feature_type(&self) -> &str {
        &self.feature_type
    }

    /// Gets the comment.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

impl Annotation for UniProtFeature {
    fn id(&self) -> &AnnotationId {
        &self.id
    }

    fn residues(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    fn description(&self) -> Option<&str> {
        self.comment()
    }

    fn short(&self) -> String {
        match &self.comment {
            Some(comment) => format!(
                "{} {}: {} [{}-{})",
                self.id, self.feature_type, comment, self.start, self.end
            ),
            None => format!(
                "{} {} [{}-{})",
                self.id, self.feature_type, self.start, self.end
            ),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// InterPro matches
////////////////////////////////////////////////////////////////////////////////////////

/// A predicted InterProScan match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterProMatch {
    /// The annotation identifier.
    id: AnnotationId,

    /// The member database analysis (e.g. `Pfam`).
    analysis: String,

    /// The signature accession within the member database.
    signature_accession: String,

    /// The signature description, if any.
    signature_description: Option<String>,

    /// The integrated InterPro accession, if any.
    interpro_accession: Option<String>,

    /// The integrated InterPro description, if any.
    interpro_description: Option<String>,

    /// The first residue (0-based).
    start: usize,

    /// The residue after the last residue.
    end: usize,
}

impl InterProMatch {
    /// Attempts to create a new [`InterProMatch`].
    ///
    /// A residue range whose start is after its end is an
    /// [`Error::StartAfterEnd`].
    ///
    /// # Examples
    ///
    /// ```
    /// use annotmap::annotation::record::Annotation as _;
    /// use annotmap::annotation::record::InterProMatch;
    /// use annotmap::annotation::AnnotationId;
    ///
    /// let m = InterProMatch::try_new(AnnotationId::new("Q9BXI3", 3), "Pfam", "PF00018", 12, 66)?
    ///     .with_signature_description("SH3 domain")
    ///     .with_interpro("IPR001452", "SH3 domain");
    ///
    /// assert_eq!(m.length(), 54);
    /// assert_eq!(m.description(), Some("SH3 domain"));
    /// assert_eq!(m.short(), "Q9BXI3|3 Pfam: IPR001452/SH3 domain [12-66)");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        id: AnnotationId,
        analysis: impl Into<String>,
        signature_accession: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Result<Self> {
        check_residues(start, end)?;

        Ok(Self {
            id,
            analysis: analysis.into(),
            signature_accession: signature_accession.into(),
            signature_description: None,
            interpro_accession: None,
            interpro_description: None,
            start,
            end,
        })
    }

    /// Sets the signature description.
    pub fn with_signature_description(mut self, description: impl Into<String>) -> Self {
        self.signature_description = Some(description.into());
        self
    }

    /// Sets the integrated InterPro entry.
    pub fn with_interpro(
        mut self,
        accession: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.interpro_accession = Some(accession.into());
        self.interpro_description = Some(description.into());
        self
    }

    /// Gets the member database analysis.
    pub fn analysis(&self) -> &str {
        &self.analysis
    }

    /// Gets the signature accession.
    pub fn signature_accession(&self) -> &str {
        &self.signature_accession
    }

    /// Gets the integrated InterPro accession.
    pub fn interpro_accession(&self) -> Option<&str> {
        self.interpro_accession.as_deref()
    }
}

impl Annotation for InterProMatch {
    fn id(&self) -> &AnnotationId {
        &self.id
    }

    fn residues(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    fn description(&self) -> Option<&str> {
        self.interpro_description
            .as_deref()
            .or(self.signature_description.as_deref())
    }

    fn short(&self) -> String {
        let label = match (&self.interpro_accession, &self.interpro_description) {
            (Some(accession), Some(description)) => format!("{accession}/{description}"),
            (Some(accession), None) => accession.clone(),
            _ => match &self.signature_description {
                Some(description) => format!("{}/{}", self.signature_accession, description),
                None => self.signature_accession.clone(),
            },
        };

        format!(
            "{} {}: {} [{}-{})",
            self.id, self.analysis, label, self.start, self.end
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Records
////////////////////////////////////////////////////////////////////////////////////////

/// A descriptive annotation record from one of the supported families.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Record {
    /// A curated UniProt feature.
    UniProt(UniProtFeature),

    /// A predicted InterPro match.
    InterPro(InterProMatch),
}

impl Record {
    /// Gets the record as an [`Annotation`].
    fn inner(&self) -> &dyn Annotation {
        match self {
            Record::UniProt(feature) => feature,
            Record::InterPro(m) => m,
        }
    }
}

impl Annotation for Record {
    fn id(&self) -> &AnnotationId {
        self.inner().id()
    }

    fn residues(&self) -> (usize, usize) {
        self.inner().residues()
    }

    fn description(&self) -> Option<&str> {
        self.inner().description()
    }

    fn short(&self) -> String {
        self.inner().short()
    }
}

impl From<UniProtFeature> for Record {
    fn from(value: UniProtFeature) -> Self {
        Record::UniProt(value)
    }
}

impl From<InterProMatch> for Record {
    fn from(value: InterProMatch) -> Self {
        Record::InterPro(value)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_features() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let record = Record::from(UniProtFeature::try_new(
            AnnotationId::new("P04637", 4),
            "Modified residue",
            None,
            14,
            15,
        )?);

        assert!(record.is_point());
        assert_eq!(record.description(), None);
        assert_eq!(record.to_string(), "P04637|4 Modified residue [14-15)");

        Ok(())
    }

    #[test]
    fn interpro_descriptions_fall_back_to_the_signature(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let m = InterProMatch::try_new(AnnotationId::new("P04637", 0), "Pfam", "PF00870", 95, 289)?
            .with_signature_description("P53 DNA-binding domain");

        assert_eq!(m.description(), Some("P53 DNA-binding domain"));
        assert_eq!(
            m.short(),
            "P04637|0 Pfam: PF00870/P53 DNA-binding domain [95-289)"
        );

        let m = InterProMatch::try_new(AnnotationId::new("P04637", 1), "Coils", "Coil", 320, 350)?;
        assert_eq!(m.description(), None);
        assert_eq!(m.short(), "P04637|1 Coils: Coil [320-350)");

        Ok(())
    }

    #[test]
    fn records_delegate_to_their_family() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let m = InterProMatch::try_new(AnnotationId::new("P04637", 2), "SMART", "SM00175", 0, 30)?;
        let record = Record::from(m.clone());

        assert_eq!(record.id(), m.id());
        assert_eq!(record.length(), 30);
        assert_eq!(record.short(), m.short());

        Ok(())
    }

    #[test]
    fn inverted_residue_ranges_are_rejected() {
        let err = UniProtFeature::try_new(AnnotationId::new("P04637", 5), "Domain", None, 30, 10)
            .unwrap_err();
        assert_eq!(err, Error::StartAfterEnd(30, 10));
        assert_eq!(
            err.to_string(),
            "residue start (30) is greater than residue end (10)"
        );

        let err = InterProMatch::try_new(AnnotationId::new("P04637", 6), "Pfam", "PF00870", 289, 95)
            .unwrap_err();
        assert_eq!(err, Error::StartAfterEnd(289, 95));

        let empty = UniProtFeature::try_new(AnnotationId::new("P04637", 7), "Site", None, 12, 12);
        assert_eq!(empty.map(|feature| feature.length()), Ok(0));
    }
}
