//! `annotmap` is a crate for mapping protein annotations onto a genome through
//! alignments and for comparing independently mapped sets of annotations.
//!
//! Annotations (domains, modified residues, and the like) are defined on a
//! protein. Projecting them onto the genome through a chain of alignments
//! (annotation to transcript, transcript to genome) yields a gapped
//! [`BlockSet`](crate::alignment::BlockSet) per annotation, or nothing at all
//! if the annotation did not map. The crate provides three main points of
//! entry on top of that data:
//!
//! - Grouping the mappings of a transcript locus into
//!   [`TransAnnotMappings`](crate::mappings::TransAnnotMappings), and many
//!   loci into an [`AnnotMappingsTbl`](crate::mappings::AnnotMappingsTbl).
//! - Classifying how each annotation was disrupted by its mapping with
//!   [`analyze_feature_mapping()`](crate::analysis::analyze_feature_mapping).
//!   Genome-side gaps that fall within the transcript's introns are expected
//!   and are not reported.
//! - Comparing a source set of annotations against a target set on the same
//!   transcript locus with
//!   [`compare_trans_annotations()`](crate::diff::compare_trans_annotations).
//!
//! Reading and writing alignment or annotation files is left to the caller:
//! every facility here operates on in-memory data and performs no I/O.
//!
//! ## Mapping and analyzing annotations
//!
//! ```
//! use annotmap::alignment::Block;
//! use annotmap::alignment::Builder as AlignmentBuilder;
//! use annotmap::analysis::analyze_feature_mapping;
//! use annotmap::annotation::record::UniProtFeature;
//! use annotmap::annotation::AnnotationRef;
//! use annotmap::mappings::Builder;
//! use annotmap::mappings::Order;
//! use nonempty::NonEmpty;
//! use omics::coordinate::Strand;
//!
//! // A transcript with exons [100, 200) and [300, 400).
//! let transcript = AlignmentBuilder::default()
//!     .query("ENST00000235310.7", 200, 0, 200)?
//!     .target("chr1", 1000)?
//!     .strand(Strand::Positive)?
//!     .push_block(Block::try_new(0, 100, 100, 200)?)
//!     .push_block(Block::try_new(100, 200, 300, 400)?)
//!     .try_build()?;
//!
//! // An annotation spliced across the intron.
//! let alignments = vec![AlignmentBuilder::default()
//!     .query("Q9BXI3|0|0", 110, 0, 110)?
//!     .target("chr1", 1000)?
//!     .strand(Strand::Positive)?
//!     .push_block(Block::try_new(0, 80, 120, 200)?)
//!     .push_block(Block::try_new(80, 110, 300, 330)?)
//!     .try_build()?];
//!
//! let references = NonEmpty::new(AnnotationRef::new(
//!     "Q9BXI3|0|0".parse()?,
//!     110,
//!     "ENST00000235310.7",
//!     "chr1",
//!     Some(0),
//! ));
//!
//! let locus = Builder::new(Order::Coordinate).try_build(
//!     references,
//!     &alignments,
//!     transcript,
//!     |id| UniProtFeature::try_new(id.clone(), "Domain", None, 10, 47).ok().map(Into::into),
//! )?;
//!
//! for mapping in &locus {
//!     let indels = analyze_feature_mapping(locus.transcript(), mapping);
//!     assert!(indels.is_empty());
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod alignment;
pub mod analysis;
pub mod annotation;
pub mod coords;
pub mod diff;
pub mod mappings;

#[cfg(test)]
mod fixtures;

pub use coords::Coords;
