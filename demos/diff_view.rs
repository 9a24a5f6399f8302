//! Renders the diff between two small annotation sets on a two-exon transcript
//! as a table.
//!
//! ```
//! cargo run --example diff_view
//! ```

use annotmap::alignment::Block;
use annotmap::alignment::BlockSet;
use annotmap::alignment::Builder as AlignmentBuilder;
use annotmap::annotation::record::InterProMatch;
use annotmap::annotation::record::UniProtFeature;
use annotmap::annotation::AnnotationRef;
use annotmap::diff::compare_trans_annotations;
use annotmap::mappings::Builder;
use annotmap::mappings::Order;
use nonempty::NonEmpty;
use omics::coordinate::position::Number;
use omics::coordinate::Strand;
use tabled::builder::Builder as TableBuilder;
use tabled::settings::object::Rows;
use tabled::settings::Alignment;
use tabled::settings::Style;

fn alignment(
    name: &str,
    size: Number,
    query: (Number, Number),
    blocks: &[(Number, Number, Number)],
) -> Result<BlockSet, Box<dyn std::error::Error>> {
    let mut builder = AlignmentBuilder::default()
        .query(name, size, query.0, query.1)?
        .target("chr1", 1_000)?
        .strand(Strand::Positive)?;

    for (query_start, target_start, size) in blocks {
        builder = builder.push_block(Block::with_size(*query_start, *target_start, *size));
    }

    Ok(builder.try_build()?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    ////////////////////////////////////////////////////////////////////////////////////
    // Source annotations
    ////////////////////////////////////////////////////////////////////////////////////

    let transcript = alignment(
        "ENST00000235310.7",
        200,
        (0, 200),
        &[(0, 100, 100), (100, 300, 100)],
    )?;

    let block_sets = vec![
        alignment("Q9BXI3|0|0", 110, (0, 110), &[(0, 120, 80), (80, 300, 30)])?,
        alignment("Q9BXI3|1|0", 60, (0, 50), &[(0, 340, 50)])?,
    ];

    let references = NonEmpty::from((
        AnnotationRef::new("Q9BXI3|0|0".parse()?, 110, "ENST00000235310.7", "chr1", Some(0)),
        vec![
            AnnotationRef::new("Q9BXI3|1|0".parse()?, 60, "ENST00000235310.7", "chr1", Some(1)),
            AnnotationRef::new("Q9BXI3|2|0".parse()?, 30, "ENST00000235310.7", "chr1", None),
        ],
    ));

    let source = Builder::new(Order::Coordinate).try_build(
        references,
        &block_sets,
        transcript.clone(),
        |id| UniProtFeature::try_new(id.clone(), "Domain", None, 0, 36).ok().map(Into::into),
    )?;

    ////////////////////////////////////////////////////////////////////////////////////
    // Target annotations
    ////////////////////////////////////////////////////////////////////////////////////

    let block_sets = vec![
        alignment("Q9BXI3|3|0", 110, (0, 110), &[(0, 120, 80), (80, 300, 30)])?,
        alignment("Q9BXI3|4|0", 10, (0, 10), &[(0, 250, 10)])?,
        alignment("Q9BXI3|5|0", 60, (0, 60), &[(0, 340, 60)])?,
    ];

    let references = NonEmpty::from((
        AnnotationRef::new("Q9BXI3|3|0".parse()?, 110, "ENST00000235310.7", "chr1", Some(0)),
        vec![
            AnnotationRef::new("Q9BXI3|4|0".parse()?, 10, "ENST00000235310.7", "chr1", Some(1)),
            AnnotationRef::new("Q9BXI3|5|0".parse()?, 60, "ENST00000235310.7", "chr1", Some(2)),
        ],
    ));

    let target = Builder::new(Order::Coordinate).try_build(
        references,
        &block_sets,
        transcript,
        |id| InterProMatch::try_new(id.clone(), "Pfam", "PF00018", 0, 20).ok().map(Into::into),
    )?;

    ////////////////////////////////////////////////////////////////////////////////////
    // Diff
    ////////////////////////////////////////////////////////////////////////////////////

    let diffs = compare_trans_annotations(&source, &target)?;

    let mut builder = TableBuilder::default();
    builder.push_record(["Coords", "Category", "Source", "Indels", "Targets"]);

    for diff in &diffs {
        let source = diff
            .source()
            .map(|mapping| mapping.reference().map_id().to_string())
            .unwrap_or(String::from("<None>"));

        let indels = diff
            .source_indels()
            .map(|indels| {
                indels
                    .iter()
                    .map(|indel| indel.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        let targets = diff
            .targets()
            .iter()
            .map(|mapping| mapping.reference().map_id().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        builder.push_record([
            diff.coords().to_string(),
            diff.category().to_string(),
            source,
            indels,
            targets,
        ]);
    }

    let table = builder
        .build()
        .with(Style::rounded())
        .modify(Rows::new(1..), Alignment::left())
        .to_string();

    println!("{}@{}", diffs.transcript_id(), diffs.chromosome());
    println!("{}", table);

    Ok(())
}
