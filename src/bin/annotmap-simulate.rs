//! A binary to comprehensively test that the `annotmap` crate classifies
//! annotation disruptions and diffs annotation sets correctly.
//!
//! ```shell
//! cargo run --release --bin=annotmap-simulate --features=binaries -- -n 100000
//! ```
//!
//! It achieves this by carrying out the following:
//!
//! * Randomly generating `n` spliced transcripts across a weighted set of
//!   chromosomes on either strand, and placing non-overlapping annotations
//!   along each of them.
//! * Perturbing each annotation's alignment with a randomly chosen scenario
//!   (clean, truncated at either end, internal deletion, insertion within an
//!   exon, or not mapped at all) and checking that the analysis reports
//!   exactly the injected event.
//! * Deriving a target annotation set (clean copies of every annotation plus
//!   one annotation inside an intron), diffing it against the source set, and
//!   checking the invariants of the resulting diff spine.
//!
//! Transcripts are split into contiguous ranges and processed by worker
//! threads. Each worker receives its own task (a seed and a range of
//! transcripts) and sends its outcome back over a channel.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::mpsc;
use std::thread;

use annotmap::alignment::Block;
use annotmap::alignment::BlockSet;
use annotmap::alignment::Builder as AlignmentBuilder;
use annotmap::analysis::analyze_feature_mapping;
use annotmap::analysis::FeatureIndel;
use annotmap::analysis::IndelKind;
use annotmap::annotation::record::InterProMatch;
use annotmap::annotation::record::UniProtFeature;
use annotmap::annotation::AnnotationId;
use annotmap::annotation::AnnotationMapId;
use annotmap::annotation::AnnotationMapping;
use annotmap::annotation::AnnotationRef;
use annotmap::annotation::Record;
use annotmap::diff::compare_trans_annotations;
use annotmap::diff::TransAnnotDiffs;
use annotmap::mappings;
use annotmap::mappings::table;
use annotmap::mappings::Order;
use annotmap::mappings::TransAnnotMappings;
use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use nonempty::NonEmpty;
use omics::coordinate::position::Number;
use omics::coordinate::Strand;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;
use weighted_rand::builder::NewBuilder;
use weighted_rand::builder::WalkerTableBuilder;
use weighted_rand::table::WalkerTable;

/// The largest indel injected into an annotation.
const MAX_INDEL: Number = 10;

/// The smallest annotation placed on a transcript.
const MIN_ANNOTATION: Number = 20;

/// The most annotations placed on a transcript.
const MAX_ANNOTATIONS: Number = 4;

/// The offset added to an annotation's index to get the index of its copy in
/// the target set.
const TARGET_INDEX_OFFSET: usize = 100;

/// The index of the target annotation placed inside an intron.
const INTRON_TARGET_INDEX: usize = 200;

////////////////////////////////////////////////////////////////////////////////////////
// Chromosomes
////////////////////////////////////////////////////////////////////////////////////////

/// The chromosomes (and their sizes in GRCh38) that transcripts are placed on.
const CHROMOSOMES: &[(&str, Number)] = &[
    ("chr1", 248_956_422),
    ("chr2", 242_193_529),
    ("chr3", 198_295_559),
    ("chr7", 159_345_973),
    ("chr12", 133_275_309),
    ("chr17", 83_257_441),
    ("chr19", 58_617_616),
    ("chr21", 46_709_983),
    ("chrX", 156_040_895),
    ("chrY", 57_227_415),
];

/// Picks chromosomes weighted by their size.
struct Chromosomes {
    /// The weighted distribution.
    weights: WalkerTable,
}

impl Chromosomes {
    /// Creates a new [`Chromosomes`].
    fn new() -> Self {
        let weights = CHROMOSOMES
            .iter()
            .map(|(_, size)| (*size / 1_000_000) as u32)
            .collect::<Vec<_>>();

        Self {
            weights: WalkerTableBuilder::new(&weights).build(),
        }
    }

    /// Picks a weighted random chromosome.
    fn pick(&self, rng: &mut StdRng) -> (&'static str, Number) {
        CHROMOSOMES[self.weights.next_rng(rng)]
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Transcripts
////////////////////////////////////////////////////////////////////////////////////////

/// A simulated spliced transcript.
#[derive(Clone, Debug)]
struct Transcript {
    /// The transcript identifier.
    id: String,

    /// The chromosome.
    chromosome: &'static str,

    /// The size of the chromosome.
    chromosome_size: Number,

    /// The strand.
    strand: Strand,

    /// The exons in ascending genomic order.
    exons: Vec<(Number, Number)>,
}

impl Transcript {
    /// Generates a random transcript.
    fn random(index: usize, chromosomes: &Chromosomes, rng: &mut StdRng) -> Self {
        let (chromosome, chromosome_size) = chromosomes.pick(rng);

        let n_exons = rng.gen_range(2..=6);
        let lengths = (0..n_exons)
            .map(|_| rng.gen_range(60..=300))
            .collect::<Vec<Number>>();
        let introns = (1..n_exons)
            .map(|_| rng.gen_range(50..=2_000))
            .collect::<Vec<Number>>();

        let span = lengths.iter().sum::<Number>() + introns.iter().sum::<Number>();
        let mut position = rng.gen_range(0..chromosome_size - span);

        let mut exons = Vec::with_capacity(lengths.len());
        for (i, length) in lengths.iter().enumerate() {
            exons.push((position, position + length));
            position += length + introns.get(i).copied().unwrap_or_default();
        }

        let strand = match rng.gen_bool(0.5) {
            true => Strand::Positive,
            false => Strand::Negative,
        };

        Self {
            id: format!("SIMT{index:07}.1"),
            chromosome,
            chromosome_size,
            strand,
            exons,
        }
    }

    /// Gets the spliced size of the transcript.
    fn size(&self) -> Number {
        self.exons.iter().map(|(start, end)| end - start).sum()
    }

    /// Builds the alignment of the transcript onto its chromosome.
    fn alignment(&self) -> Result<BlockSet> {
        let size = self.size();

        let mut builder = AlignmentBuilder::default()
            .query(self.id.clone(), size, 0, size)?
            .target(self.chromosome, self.chromosome_size)?
            .strand(self.strand.clone())?;

        let mut query_start = 0;
        for (start, end) in &self.exons {
            builder = builder.push_block(Block::with_size(query_start, *start, end - start));
            query_start += end - start;
        }

        builder
            .try_build()
            .with_context(|| format!("building the alignment for `{}`", self.id))
    }

    /// Projects a range of the spliced transcript (in genomic order) onto the
    /// genome as `(query start, target start, size)` blocks.
    fn project(&self, segment: &Range<Number>) -> Vec<(Number, Number, Number)> {
        let mut blocks = Vec::new();
        let mut offset = 0;

        for (start, end) in &self.exons {
            let from = segment.start.max(offset);
            let to = segment.end.min(offset + (end - start));

            if from < to {
                blocks.push((from - segment.start, start + (from - offset), to - from));
            }

            offset += end - start;
        }

        blocks
    }

    /// Builds the alignment of an annotation from its blocks. Block query
    /// positions are on the aligned strand.
    fn annotation_alignment(
        &self,
        map_id: &AnnotationMapId,
        size: Number,
        blocks: &[(Number, Number, Number)],
    ) -> Result<BlockSet> {
        let (first, last) = match (blocks.first(), blocks.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => bail!("annotation `{map_id}` has no aligned blocks"),
        };

        let (aligned_start, aligned_end) = (first.0, last.0 + last.2);
        let (query_start, query_end) = match self.strand {
            Strand::Positive => (aligned_start, aligned_end),
            Strand::Negative => (size - aligned_end, size - aligned_start),
        };

        let mut builder = AlignmentBuilder::default()
            .query(map_id.to_string(), size, query_start, query_end)?
            .target(self.chromosome, self.chromosome_size)?
            .strand(self.strand.clone())?;

        for (query_start, target_start, length) in blocks {
            builder = builder.push_block(Block::with_size(*query_start, *target_start, *length));
        }

        builder
            .try_build()
            .with_context(|| format!("building the alignment for `{map_id}`"))
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Scenarios
////////////////////////////////////////////////////////////////////////////////////////

/// A perturbation applied to an annotation's alignment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Scenario {
    /// The annotation aligns end to end.
    Clean,

    /// The genomically leftmost positions of the annotation don't align.
    TrimLeft,

    /// The genomically rightmost positions of the annotation don't align.
    TrimRight,

    /// Positions within the annotation don't align.
    InternalDeletion,

    /// Genomic positions within an exon are inserted into the annotation.
    ExonInsertion,

    /// The annotation doesn't align at all.
    Unmapped,
}

/// The scenarios and their weights.
const SCENARIOS: &[(Scenario, u32)] = &[
    (Scenario::Clean, 50),
    (Scenario::TrimLeft, 10),
    (Scenario::TrimRight, 10),
    (Scenario::InternalDeletion, 10),
    (Scenario::ExonInsertion, 10),
    (Scenario::Unmapped, 10),
];

/// An annotation as placed on the genome after its perturbation.
#[derive(Debug)]
struct Placement {
    /// The aligned blocks (empty when unmapped).
    blocks: Vec<(Number, Number, Number)>,

    /// The size of the annotation.
    size: Number,

    /// The single indel the analysis is expected to report, if any.
    expected: Option<(IndelKind, Number)>,
}

impl Placement {
    /// Creates a new [`Placement`].
    fn new(
        blocks: Vec<(Number, Number, Number)>,
        size: Number,
        expected: Option<(IndelKind, Number)>,
    ) -> Self {
        Self {
            blocks,
            size,
            expected,
        }
    }

    /// Whether the annotation aligned.
    fn is_mapped(&self) -> bool {
        !self.blocks.is_empty()
    }
}

/// Applies a scenario to the clean blocks of an annotation of `size`.
///
/// Scenarios that don't fit the blocks (for example, an insertion into a
/// single-position block) fall back to leaving the annotation clean.
fn perturb(
    mut blocks: Vec<(Number, Number, Number)>,
    mut size: Number,
    scenario: Scenario,
    rng: &mut StdRng,
) -> Placement {
    match scenario {
        Scenario::Clean => Placement::new(blocks, size, None),
        Scenario::Unmapped => {
            Placement::new(Vec::new(), size, Some((IndelKind::FullDeletion, size)))
        }
        Scenario::TrimLeft => {
            let (query_start, target_start, length) = blocks[0];
            if length < 2 {
                return Placement::new(blocks, size, None);
            }

            let k = rng.gen_range(1..=(length - 1).min(MAX_INDEL));
            blocks[0] = (query_start + k, target_start + k, length - k);

            Placement::new(blocks, size, Some((IndelKind::Deletion5p, k)))
        }
        Scenario::TrimRight => {
            let last = blocks.len() - 1;
            let (query_start, target_start, length) = blocks[last];
            if length < 2 {
                return Placement::new(blocks, size, None);
            }

            let k = rng.gen_range(1..=(length - 1).min(MAX_INDEL));
            blocks[last] = (query_start, target_start, length - k);

            Placement::new(blocks, size, Some((IndelKind::Deletion3p, k)))
        }
        Scenario::InternalDeletion => {
            let Some(i) = blocks.iter().position(|(_, _, length)| *length >= 3) else {
                return Placement::new(blocks, size, None);
            };

            let (query_start, target_start, length) = blocks[i];
            let k = rng.gen_range(1..length);
            let d = rng.gen_range(1..=MAX_INDEL);

            blocks[i] = (query_start, target_start, k);
            blocks.insert(i + 1, (query_start + k + d, target_start + k, length - k));
            for block in &mut blocks[i + 2..] {
                block.0 += d;
            }
            size += d;

            Placement::new(blocks, size, Some((IndelKind::InternalDeletion, d)))
        }
        Scenario::ExonInsertion => {
            let Some(i) = blocks.iter().position(|(_, _, length)| *length >= 3) else {
                return Placement::new(blocks, size, None);
            };

            let (query_start, target_start, length) = blocks[i];
            let k = rng.gen_range(1..length - 1);
            let d = rng.gen_range(1..=(length - k - 1).min(MAX_INDEL));

            blocks[i] = (query_start, target_start, k);
            blocks.insert(i + 1, (query_start + k, target_start + k + d, length - k - d));
            for block in &mut blocks[i + 2..] {
                block.0 -= d;
            }
            size -= d;

            Placement::new(blocks, size, Some((IndelKind::Insertion, d)))
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Tasks
////////////////////////////////////////////////////////////////////////////////////////

/// The work handed to one worker thread.
#[derive(Debug)]
struct Task {
    /// The worker number.
    worker: usize,

    /// The seed for the worker's random number generator.
    seed: u64,

    /// The transcripts to simulate.
    transcripts: Range<usize>,
}

/// The outcome of a [`Task`].
#[derive(Debug, Default)]
struct Outcome {
    /// The number of transcripts simulated.
    transcripts: usize,

    /// The number of annotations analyzed.
    annotations: usize,

    /// The number of diff entries produced.
    entries: usize,

    /// A description of every mismatch found.
    mismatches: Vec<String>,
}

impl Outcome {
    /// Adds the counts and mismatches of another outcome.
    fn merge(&mut self, other: Outcome) {
        self.transcripts += other.transcripts;
        self.annotations += other.annotations;
        self.entries += other.entries;
        self.mismatches.extend(other.mismatches);
    }
}

/// The simulated loci of a task, before they are loaded into a table.
#[derive(Default)]
struct Simulation {
    /// The transcripts and their alignments by transcript id.
    transcripts: HashMap<String, (Transcript, BlockSet)>,

    /// The flat stream of source annotation references.
    references: Vec<AnnotationRef>,

    /// The source annotation alignments.
    block_sets: Vec<BlockSet>,

    /// The source annotation records.
    records: HashMap<AnnotationId, Record>,

    /// The indel expected for each source annotation.
    expected: HashMap<AnnotationMapId, Option<(IndelKind, Number)>>,

    /// The clean blocks of every annotation, by transcript id.
    clean: HashMap<String, Vec<Vec<(Number, Number, Number)>>>,
}

impl Simulation {
    /// Simulates one transcript and its annotations.
    fn add_transcript(
        &mut self,
        index: usize,
        chromosomes: &Chromosomes,
        scenarios: &WalkerTable,
        rng: &mut StdRng,
    ) -> Result<()> {
        let transcript = Transcript::random(index, chromosomes, rng);
        let size = transcript.size();

        let n = rng.gen_range(1..=MAX_ANNOTATIONS);
        let slot = size / n;

        let mut clean = Vec::new();

        for i in 0..n {
            let length = rng.gen_range(MIN_ANNOTATION..=slot);
            let start = i * slot + rng.gen_range(0..=slot - length);
            let blocks = transcript.project(&(start..start + length));

            let (scenario, _) = SCENARIOS[scenarios.next_rng(rng)];
            let placement = perturb(blocks.clone(), length, scenario, rng);

            let annotation_id = AnnotationId::new(format!("SIM{index:07}"), i as usize);
            let map_id = AnnotationMapId::new(annotation_id.clone(), 0);

            let alignment_index = match placement.is_mapped() {
                true => {
                    self.block_sets.push(transcript.annotation_alignment(
                        &map_id,
                        placement.size,
                        &placement.blocks,
                    )?);
                    Some(self.block_sets.len() - 1)
                }
                false => None,
            };

            self.references.push(AnnotationRef::new(
                map_id.clone(),
                placement.size,
                transcript.id.clone(),
                transcript.chromosome,
                alignment_index,
            ));

            let residues = (placement.size / 3) as usize;
            self.records.insert(
                annotation_id.clone(),
                UniProtFeature::try_new(annotation_id, "Domain", None, 0, residues)?.into(),
            );

            self.expected.insert(map_id, placement.expected);
            clean.push(blocks);
        }

        let alignment = transcript.alignment()?;
        self.clean.insert(transcript.id.clone(), clean);
        self.transcripts
            .insert(transcript.id.clone(), (transcript, alignment));

        Ok(())
    }

    /// Builds the target annotation set of a locus: a clean copy of every
    /// source annotation and one annotation inside the first intron.
    fn targets(&self, source: &TransAnnotMappings) -> Result<TransAnnotMappings> {
        let (transcript, alignment) = self
            .transcripts
            .get(source.transcript_id())
            .with_context(|| format!("no transcript for `{}`", source.transcript_id()))?;

        let accession = match source.mappings().first() {
            Some(mapping) => mapping.reference().source_accession().to_string(),
            None => bail!("no annotations for `{}`", source.transcript_id()),
        };

        let mut placements = self
            .clean
            .get(&transcript.id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, blocks)| (i + TARGET_INDEX_OFFSET, blocks))
            .collect::<Vec<_>>();

        let intron_start = transcript.exons[0].1;
        placements.push((
            INTRON_TARGET_INDEX,
            vec![(0, intron_start + 10, MAX_INDEL)],
        ));

        let mut block_sets = Vec::with_capacity(placements.len());
        let mut references = Vec::with_capacity(placements.len());

        for (index, blocks) in placements {
            let size = blocks.iter().map(|(_, _, length)| length).sum::<Number>();
            let map_id = AnnotationMapId::new(AnnotationId::new(accession.clone(), index), 0);

            block_sets.push(transcript.annotation_alignment(&map_id, size, &blocks)?);
            references.push(AnnotationRef::new(
                map_id,
                size,
                transcript.id.clone(),
                transcript.chromosome,
                Some(block_sets.len() - 1),
            ));
        }

        let references = NonEmpty::from_vec(references)
            .with_context(|| format!("no target annotations for `{}`", transcript.id))?;

        mappings::Builder::new(Order::Coordinate)
            .try_build(references, &block_sets, alignment.clone(), |id| {
                InterProMatch::try_new(id.clone(), "Pfam", format!("PF{:05}", id.index()), 0, 10)
                    .ok()
                    .map(Into::into)
            })
            .with_context(|| format!("building the target annotations for `{}`", transcript.id))
    }
}

/// Checks that the analysis reported exactly the expected indel.
fn check_indels(
    mapping: &AnnotationMapping,
    expected: Option<(IndelKind, Number)>,
    indels: &[FeatureIndel],
) -> Option<String> {
    let matched = match (expected, indels) {
        (None, []) => true,
        (Some((kind, length)), [indel]) => indel.kind() == kind && indel.length() == length,
        _ => false,
    };

    match matched {
        true => None,
        false => {
            let reported = indels
                .iter()
                .map(|indel| indel.to_string())
                .collect::<Vec<_>>();

            Some(format!(
                "{mapping}: expected {}, found [{}]",
                expected
                    .map(|(kind, length)| format!("{kind}({length})"))
                    .unwrap_or_else(|| String::from("no indels")),
                reported.join(", ")
            ))
        }
    }
}

/// Checks the invariants of a diff spine.
fn check_diffs(
    source: &TransAnnotMappings,
    target: &TransAnnotMappings,
    diffs: &TransAnnotDiffs,
) -> Vec<String> {
    let locus = format!("{}@{}", source.transcript_id(), source.chromosome());
    let mut mismatches = Vec::new();

    if !diffs
        .diffs()
        .windows(2)
        .all(|pair| pair[0].coords().start() <= pair[1].coords().start())
    {
        mismatches.push(format!("{locus}: the diff spine is not sorted"));
    }

    let sources = diffs
        .iter()
        .filter_map(|diff| diff.source())
        .collect::<Vec<_>>();
    if sources.len() != source.len() || sources.iter().zip(source.iter()).any(|(a, b)| *a != b)
    {
        mismatches.push(format!(
            "{locus}: the diff spine does not match the source annotations"
        ));
    }

    for mapping in target {
        if !diffs.iter().any(|diff| diff.targets().contains(mapping)) {
            mismatches.push(format!("{locus}: target `{mapping}` was never attached"));
        }
    }

    for diff in diffs.iter().filter(|diff| diff.source().is_none()) {
        for mapping in source {
            if matches!(diff.coords().overlaps(mapping.coords()), Ok(true)) {
                mismatches.push(format!(
                    "{locus}: target-only entry {} overlaps source `{mapping}`",
                    diff.coords()
                ));
            }
        }
    }

    mismatches
}

/// Runs a task.
fn run(task: Task) -> Result<Outcome> {
    let mut rng = StdRng::seed_from_u64(task.seed);
    let chromosomes = Chromosomes::new();
    let scenarios = WalkerTableBuilder::new(
        &SCENARIOS
            .iter()
            .map(|(_, weight)| *weight)
            .collect::<Vec<_>>(),
    )
    .build();

    debug!(
        "worker {}: simulating transcripts {}..{}",
        task.worker, task.transcripts.start, task.transcripts.end
    );

    let mut simulation = Simulation::default();
    for index in task.transcripts.clone() {
        simulation.add_transcript(index, &chromosomes, &scenarios, &mut rng)?;
    }

    let table = table::Builder::new(Order::Coordinate)
        .try_build_from(
            simulation.references.clone(),
            &simulation.block_sets,
            |transcript_id, chromosome| {
                simulation
                    .transcripts
                    .get(transcript_id)
                    .filter(|(transcript, _)| transcript.chromosome == chromosome)
                    .map(|(_, alignment)| alignment.clone())
            },
            |id| simulation.records.get(id).cloned(),
        )
        .context("building the source annotation table")?;

    let mut outcome = Outcome {
        transcripts: table.len(),
        ..Default::default()
    };

    for source in &table {
        if let Err(err) = source.check_non_overlapping() {
            outcome.mismatches.push(err.to_string());
        }

        for mapping in source {
            let expected = simulation
                .expected
                .get(mapping.reference().map_id())
                .copied()
                .flatten();
            let indels = analyze_feature_mapping(source.transcript(), mapping);

            outcome
                .mismatches
                .extend(check_indels(mapping, expected, &indels));
            outcome.annotations += 1;
        }

        let target = simulation.targets(source)?;
        let diffs = compare_trans_annotations(source, &target)
            .with_context(|| format!("comparing the annotations of `{}`", source.transcript_id()))?;

        let mismatches = check_diffs(source, &target, &diffs);
        if !mismatches.is_empty() {
            debug!("{diffs}");
        }

        outcome.mismatches.extend(mismatches);
        outcome.entries += diffs.len();
    }

    Ok(outcome)
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

/// Throws randomly perturbed annotations at `annotmap`.
#[derive(Parser)]
struct Args {
    /// The number of transcripts to simulate.
    #[arg(short, default_value_t = 10_000)]
    n: usize,

    /// The number of worker threads (defaults to the available parallelism).
    #[arg(short, long)]
    threads: Option<usize>,

    /// The seed for the random number generators. A random seed is chosen if
    /// none is provided.
    #[arg(short, long)]
    seed: Option<u64>,

    /// The number of mismatches to report.
    #[arg(short, long, default_value_t = 10)]
    explore_mismatches: usize,

    #[command(flatten)]
    verbose: Verbosity,
}

fn simulate(args: &Args) -> Result<()> {
    if args.n == 0 {
        bail!("`n` must be greater than 0");
    }

    let threads = match args.threads {
        Some(0) => bail!("`threads` must be greater than 0"),
        Some(threads) => threads,
        None => thread::available_parallelism()
            .map(|threads| threads.get())
            .unwrap_or(1),
    }
    .min(args.n);

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        "simulating {} transcripts across {threads} worker(s) with seed {seed}",
        args.n
    );

    let (tx, rx) = mpsc::channel();
    let chunk = args.n.div_ceil(threads);
    let mut handles = Vec::with_capacity(threads);

    for worker in 0..threads {
        let start = worker * chunk;
        let end = (start + chunk).min(args.n);

        if start >= end {
            break;
        }

        let task = Task {
            worker,
            seed: seed.wrapping_add(worker as u64),
            transcripts: start..end,
        };

        let tx = tx.clone();
        handles.push(thread::spawn(move || {
            if tx.send(run(task)).is_err() {
                error!("worker {worker}: the results channel was closed");
            }
        }));
    }

    drop(tx);

    let mut total = Outcome::default();
    for result in rx {
        total.merge(result.context("running a simulation task")?);
    }

    for handle in handles {
        if handle.join().is_err() {
            bail!("a worker thread panicked");
        }
    }

    for (i, mismatch) in total
        .mismatches
        .iter()
        .enumerate()
        .take(args.explore_mismatches)
    {
        warn!("== mismatch #{} ==", i + 1);
        warn!("{mismatch}");
    }

    println!(
        "analyzed {} annotations on {} transcripts ({} diff entries) with {} mismatches",
        total.annotations,
        total.transcripts,
        total.entries,
        total.mismatches.len()
    );

    if !total.mismatches.is_empty() {
        error!("the simulation found mismatches (seed {seed})");
        std::process::exit(1);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    simulate(&args)
}
