use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::models::finalize;
use crate::models::interval;
use crate::models::segment::{orf_cds, orf_cds_length, InternalOrf, Segment, SegmentKind};
use crate::models::{Interval, Strand};
use crate::utils::errors::TranscriptError;

/// Default lower and upper bound for acceptable intron lengths,
/// used by the `num_introns_smaller_than_min` and
/// `num_introns_greater_than_max` metrics.
pub const DEFAULT_INTRON_RANGE: (u32, u32) = (20, 10_000);

/// A homology hit attached to a transcript by an external search.
#[derive(Clone, Debug, PartialEq)]
pub struct BlastHit {
    pub target: String,
    pub evalue: f64,
    pub bits: f64,
    pub global_positives: f64,
}

/// An externally predicted open reading frame offered to
/// [`Transcript::load_orfs`].
///
/// Segments are genomic CDS intervals, sorted ascending.
#[derive(Clone, Debug)]
pub struct OrfCandidate {
    pub strand: Strand,
    pub segments: Vec<Interval>,
    pub has_start_codon: bool,
    pub has_stop_codon: bool,
}

impl OrfCandidate {
    pub fn cds_length(&self) -> u32 {
        self.segments.iter().map(|s| s.len()).sum()
    }
}

/// Transcript is the central data structure of `piclo`.
///
/// It holds the genomic representation of one predicted RNA model:
/// its exons, the combined coding segments across all of its ORFs and
/// the combined untranslated regions. Coordinates are 1-based and both
/// start and end are included.
///
/// A transcript starts out mutable; once [`finalize`](Transcript::finalize)
/// has run, the derived state (introns, splice sites, internal ORFs, UTRs)
/// is trustworthy and any further mutation is refused until the caller
/// explicitly unfinalizes.
///
/// `Transcript`s should be created using `TranscriptBuilder`.
#[derive(Clone, Debug)]
pub struct Transcript {
    pub(crate) tid: String,
    pub(crate) parent: Vec<String>,
    pub(crate) chrom: String,
    pub(crate) source: String,
    pub(crate) feature: String,
    pub(crate) strand: Strand,
    pub(crate) start: u32,
    pub(crate) end: u32,
    pub(crate) score: f64,
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) exons: Vec<Interval>,
    pub(crate) combined_cds: Vec<Interval>,
    pub(crate) combined_utr: Vec<Interval>,
    pub(crate) phases: Vec<(u32, u8)>,
    pub(crate) first_phase: u8,
    pub(crate) introns: Vec<Interval>,
    pub(crate) splices: BTreeSet<u32>,
    pub(crate) internal_orfs: Vec<InternalOrf>,
    pub(crate) selected_internal_orf_index: Option<usize>,
    pub(crate) has_start_codon: bool,
    pub(crate) has_stop_codon: bool,
    pub(crate) verified_introns: BTreeSet<Interval>,
    pub(crate) blast_hits: Vec<BlastHit>,
    pub(crate) snowy_score: OnceCell<f64>,
    pub(crate) intron_range: (u32, u32),
    // values assigned by the enclosing locus after grouping
    pub(crate) exon_fraction: f64,
    pub(crate) intron_fraction: f64,
    pub(crate) combined_cds_intron_fraction: f64,
    pub(crate) selected_cds_intron_fraction: f64,
    pub(crate) retained_introns: Vec<Interval>,
    pub(crate) retained_fraction: f64,
    pub(crate) proportion_verified_introns_inlocus: f64,
    pub(crate) finalized: bool,
}

impl Transcript {
    /// Returns the transcript identifier.
    pub fn tid(&self) -> &str {
        &self.tid
    }

    pub fn set_tid(&mut self, tid: &str) {
        self.tid = tid.to_string();
    }

    /// Returns the gene identifiers this transcript belongs to.
    pub fn parent(&self) -> &[String] {
        &self.parent
    }

    /// Returns the parent gene ids joined with `,`, as used in
    /// GFF3 attributes.
    pub fn parent_string(&self) -> String {
        self.parent.join(",")
    }

    pub fn set_parent(&mut self, parent: Vec<String>) {
        self.parent = parent;
    }

    /// Returns the reference sequence name, in most cases the chromosome.
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Returns the strand / direction of transcription.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Returns the source column for emitted records.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn set_source(&mut self, source: &str) {
        self.source = source.to_string();
    }

    /// Returns the feature type: `mRNA` for coding transcripts,
    /// `transcript` otherwise. Reliable only after finalization.
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Returns the leftmost genomic position of the transcript.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Returns the rightmost genomic position of the transcript.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Returns the score assigned by the scoring engine (0 by default).
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn set_attribute(&mut self, key: &str, value: &str) {
        self.attributes.insert(key.to_string(), value.to_string());
    }

    /// Returns the sorted exon intervals.
    pub fn exons(&self) -> &[Interval] {
        &self.exons
    }

    /// Returns the combined, non-overlapping CDS segments across all ORFs.
    pub fn combined_cds(&self) -> &[Interval] {
        &self.combined_cds
    }

    /// Returns the combined UTR segments (exon union minus combined CDS).
    pub fn combined_utr(&self) -> &[Interval] {
        &self.combined_utr
    }

    /// Returns the introns, i.e. the gaps between consecutive exons.
    pub fn introns(&self) -> &[Interval] {
        &self.introns
    }

    /// Returns the splice positions (both endpoints of each intron).
    pub fn splices(&self) -> &BTreeSet<u32> {
        &self.splices
    }

    pub fn internal_orfs(&self) -> &[InternalOrf] {
        &self.internal_orfs
    }

    pub fn selected_internal_orf_index(&self) -> Option<usize> {
        self.selected_internal_orf_index
    }

    /// Returns the internal ORF selected as best (the longest one).
    pub fn selected_internal_orf(&self) -> Option<&InternalOrf> {
        self.selected_internal_orf_index
            .and_then(|idx| self.internal_orfs.get(idx))
    }

    /// Phase of the first CDS segment of the selected ORF.
    pub fn first_phase(&self) -> u8 {
        self.first_phase
    }

    pub fn has_start_codon(&self) -> bool {
        self.has_start_codon
    }

    pub fn has_stop_codon(&self) -> bool {
        self.has_stop_codon
    }

    pub fn set_has_start_codon(&mut self, value: bool) {
        self.has_start_codon = value;
    }

    pub fn set_has_stop_codon(&mut self, value: bool) {
        self.has_stop_codon = value;
    }

    /// Returns `true` once the finalizer has run successfully.
    pub fn finalized(&self) -> bool {
        self.finalized
    }

    /// Returns `true` if the transcript has exactly one exon.
    pub fn monoexonic(&self) -> bool {
        self.exons.len() == 1
    }

    /// Returns `true` if the transcript has any coding segment.
    pub fn is_coding(&self) -> bool {
        !self.combined_cds.is_empty()
    }

    /// The length of the mature cDNA: the summed exon lengths.
    pub fn cdna_length(&self) -> u32 {
        self.exons.iter().map(|e| e.len()).sum()
    }

    pub fn combined_cds_length(&self) -> u32 {
        self.combined_cds.iter().map(|c| c.len()).sum()
    }

    pub fn combined_utr_length(&self) -> u32 {
        self.combined_utr.iter().map(|u| u.len()).sum()
    }

    pub fn number_internal_orfs(&self) -> usize {
        self.internal_orfs.len()
    }

    /// CDS intervals of the selected ORF, in ascending order.
    pub fn selected_cds(&self) -> Vec<Interval> {
        match self.selected_internal_orf() {
            Some(orf) => orf_cds(orf),
            None => vec![],
        }
    }

    /// Summed CDS length of the selected ORF.
    pub fn selected_cds_length(&self) -> u32 {
        match self.selected_internal_orf() {
            Some(orf) => orf_cds_length(orf),
            None => 0,
        }
    }

    /// The biological start of the combined CDS: the genomic leftmost
    /// coordinate on `+`, the rightmost on `-`. Defaults to the
    /// transcript boundary when no CDS is present.
    pub fn combined_cds_start(&self) -> u32 {
        if self.combined_cds.is_empty() {
            return match self.strand {
                Strand::Minus => self.end,
                _ => self.start,
            };
        }
        match self.strand {
            Strand::Minus => self.combined_cds[self.combined_cds.len() - 1].end,
            _ => self.combined_cds[0].start,
        }
    }

    /// The biological end of the combined CDS. Defaults to the
    /// transcript boundary when no CDS is present.
    pub fn combined_cds_end(&self) -> u32 {
        if self.combined_cds.is_empty() {
            return match self.strand {
                Strand::Minus => self.start,
                _ => self.end,
            };
        }
        match self.strand {
            Strand::Minus => self.combined_cds[0].start,
            _ => self.combined_cds[self.combined_cds.len() - 1].end,
        }
    }

    /// The biological start of the selected CDS, if any.
    pub fn selected_cds_start(&self) -> Option<u32> {
        let cds = self.selected_cds();
        if cds.is_empty() {
            return None;
        }
        Some(match self.strand {
            Strand::Minus => cds[cds.len() - 1].end,
            _ => cds[0].start,
        })
    }

    /// The biological end of the selected CDS, if any.
    pub fn selected_cds_end(&self) -> Option<u32> {
        let cds = self.selected_cds();
        if cds.is_empty() {
            return None;
        }
        Some(match self.strand {
            Strand::Minus => cds[0].start,
            _ => cds[cds.len() - 1].end,
        })
    }

    /// UTR segments upstream of the selected CDS (5' side).
    pub fn five_utr(&self) -> Vec<Interval> {
        let orf = match self.selected_internal_orf() {
            Some(orf) if self.is_coding() => orf,
            _ => return vec![],
        };
        let cds_start = match self.selected_cds_start() {
            Some(pos) => pos,
            None => return vec![],
        };
        orf.iter()
            .filter(|s| s.is_utr())
            .map(|s| s.interval)
            .filter(|iv| match self.strand {
                Strand::Minus => iv.start > cds_start,
                _ => iv.end < cds_start,
            })
            .collect()
    }

    /// UTR segments downstream of the selected CDS (3' side).
    pub fn three_utr(&self) -> Vec<Interval> {
        let orf = match self.selected_internal_orf() {
            Some(orf) if self.is_coding() => orf,
            _ => return vec![],
        };
        let cds_end = match self.selected_cds_end() {
            Some(pos) => pos,
            None => return vec![],
        };
        orf.iter()
            .filter(|s| s.is_utr())
            .map(|s| s.interval)
            .filter(|iv| match self.strand {
                Strand::Minus => iv.end < cds_end,
                _ => iv.start > cds_end,
            })
            .collect()
    }

    /// The set union of all CDS segments across the internal ORFs.
    /// Exons appearing in this set are coding in at least one ORF.
    pub fn non_overlapping_cds(&self) -> BTreeSet<Interval> {
        let mut segments = BTreeSet::new();
        for orf in &self.internal_orfs {
            for segment in orf.iter().filter(|s| s.is_cds()) {
                segments.insert(segment.interval);
            }
        }
        segments
    }

    /// Introns located between segments of the combined CDS.
    pub fn combined_cds_introns(&self) -> BTreeSet<Interval> {
        if self.number_internal_orfs() < 2 {
            return self.selected_cds_introns();
        }
        let mut cintrons = BTreeSet::new();
        for pair in self.combined_cds.windows(2) {
            let junc = Interval::new(pair[0].end + 1, pair[1].start - 1);
            if self.introns.contains(&junc) {
                cintrons.insert(junc);
            }
        }
        cintrons
    }

    /// Introns located between CDS segments of the selected ORF.
    pub fn selected_cds_introns(&self) -> BTreeSet<Interval> {
        let cds = self.selected_cds();
        let mut cintrons = BTreeSet::new();
        if cds.len() < 2 {
            return cintrons;
        }
        for pair in cds.windows(2) {
            let junc = Interval::new(pair[0].end + 1, pair[1].start - 1);
            if self.introns.contains(&junc) {
                cintrons.insert(junc);
            }
        }
        cintrons
    }

    pub fn max_intron_length(&self) -> u32 {
        self.introns.iter().map(|i| i.len()).max().unwrap_or(0)
    }

    pub fn intron_range(&self) -> (u32, u32) {
        self.intron_range
    }

    pub fn set_intron_range(&mut self, range: (u32, u32)) {
        self.intron_range = range;
    }

    /// Introns corroborated by external evidence.
    pub fn verified_introns(&self) -> &BTreeSet<Interval> {
        &self.verified_introns
    }

    /// Stores the externally verified introns. Positions which are not
    /// introns of this transcript are discarded.
    pub fn set_verified_introns(&mut self, verified: BTreeSet<Interval>) {
        if self.finalized {
            self.verified_introns = verified
                .into_iter()
                .filter(|iv| self.introns.contains(iv))
                .collect();
        } else {
            self.verified_introns = verified;
        }
    }

    pub fn blast_hits(&self) -> &[BlastHit] {
        &self.blast_hits
    }

    pub fn add_blast_hit(&mut self, hit: BlastHit) {
        self.blast_hits.push(hit);
    }

    /// Homology score following the SnowyOwl recipe: the summed
    /// percentage of positive matches over twice the number of hits.
    /// Cached after the first evaluation.
    pub fn snowy_blast_score(&self) -> f64 {
        if self.blast_hits.is_empty() {
            return 0.0;
        }
        *self.snowy_score.get_or_init(|| {
            self.blast_hits
                .iter()
                .map(|hit| hit.global_positives / (2.0 * self.blast_hits.len() as f64))
                .sum()
        })
    }

    /// The best bit score among the attached homology hits.
    pub fn best_bits(&self) -> f64 {
        self.blast_hits.iter().map(|h| h.bits).fold(0.0, f64::max)
    }

    // ---- values assigned by the enclosing locus ------------------------

    pub fn exon_fraction(&self) -> f64 {
        self.exon_fraction
    }

    pub fn set_exon_fraction(&mut self, fraction: f64) {
        assert!(
            fraction > 0.0 && fraction <= 1.0,
            "invalid exon fraction {} for {}",
            fraction,
            self.tid
        );
        self.exon_fraction = fraction;
    }

    pub fn intron_fraction(&self) -> f64 {
        self.intron_fraction
    }

    pub fn set_intron_fraction(&mut self, fraction: f64) {
        assert!(
            (0.0..=1.0).contains(&fraction),
            "invalid intron fraction {} for {}",
            fraction,
            self.tid
        );
        assert!(
            self.monoexonic() || fraction > 0.0,
            "the intron fraction cannot be null for the multiexonic transcript {}",
            self.tid
        );
        self.intron_fraction = fraction;
    }

    pub fn combined_cds_intron_fraction(&self) -> f64 {
        self.combined_cds_intron_fraction
    }

    pub fn set_combined_cds_intron_fraction(&mut self, fraction: f64) {
        assert!(
            (0.0..=1.0).contains(&fraction),
            "invalid CDS intron fraction {} for {}",
            fraction,
            self.tid
        );
        self.combined_cds_intron_fraction = fraction;
    }

    pub fn selected_cds_intron_fraction(&self) -> f64 {
        self.selected_cds_intron_fraction
    }

    pub fn set_selected_cds_intron_fraction(&mut self, fraction: f64) {
        assert!(
            (0.0..=1.0).contains(&fraction),
            "invalid CDS intron fraction {} for {}",
            fraction,
            self.tid
        );
        self.selected_cds_intron_fraction = fraction;
    }

    /// Exons marked by the enclosing locus as retaining an intron.
    pub fn retained_introns(&self) -> &[Interval] {
        &self.retained_introns
    }

    pub fn set_retained_introns(&mut self, retained: Vec<Interval>) {
        self.retained_introns = retained;
    }

    pub fn retained_fraction(&self) -> f64 {
        self.retained_fraction
    }

    pub fn set_retained_fraction(&mut self, fraction: f64) {
        assert!(
            (0.0..=1.0).contains(&fraction),
            "invalid retained fraction {} for {}",
            fraction,
            self.tid
        );
        self.retained_fraction = fraction;
    }

    pub fn proportion_verified_introns_inlocus(&self) -> f64 {
        self.proportion_verified_introns_inlocus
    }

    pub fn set_proportion_verified_introns_inlocus(&mut self, fraction: f64) {
        assert!(
            (0.0..=1.0).contains(&fraction),
            "invalid verified intron proportion {} for {}",
            fraction,
            self.tid
        );
        self.proportion_verified_introns_inlocus = fraction;
    }

    // ---- mutating methods ----------------------------------------------

    fn refuse_if_finalized(&self, action: &str) -> Result<(), TranscriptError> {
        if self.finalized {
            Err(TranscriptError::modification(format!(
                "cannot {} on the finalized transcript {}",
                action, self.tid
            )))
        } else {
            Ok(())
        }
    }

    /// Appends an exon. The exons are sorted during finalization,
    /// insertion order does not matter.
    pub fn add_exon(&mut self, exon: Interval) -> Result<(), TranscriptError> {
        self.refuse_if_finalized("add an exon")?;
        self.exons.push(exon);
        Ok(())
    }

    /// Appends a CDS segment with its phase, if known.
    pub fn add_cds(&mut self, cds: Interval, phase: Option<u8>) -> Result<(), TranscriptError> {
        self.refuse_if_finalized("add a CDS segment")?;
        if let Some(phase) = phase {
            self.phases.push((cds.start, phase));
        }
        self.combined_cds.push(cds);
        Ok(())
    }

    /// Appends a UTR segment.
    pub fn add_utr(&mut self, utr: Interval) -> Result<(), TranscriptError> {
        self.refuse_if_finalized("add a UTR segment")?;
        self.combined_utr.push(utr);
        Ok(())
    }

    /// Adds a pre-computed internal ORF. The segment list is validated
    /// during finalization.
    pub fn add_internal_orf(&mut self, orf: InternalOrf) -> Result<(), TranscriptError> {
        self.refuse_if_finalized("add an internal ORF")?;
        self.internal_orfs.push(orf);
        Ok(())
    }

    /// Resets the `finalized` flag so that the mutators accept
    /// changes again. Derived state is recomputed on the next
    /// [`finalize`](Transcript::finalize).
    pub fn unfinalize(&mut self) {
        self.finalized = false;
    }

    /// Brings the transcript into a fully validated, self-consistent
    /// state. Safe to call repeatedly; after the first success it is
    /// a no-op.
    pub fn finalize(&mut self) -> Result<(), TranscriptError> {
        if self.finalized {
            return Ok(());
        }
        finalize::finalize(self)
    }

    /// Removes every CDS and UTR segment, turning the transcript into
    /// a plain non-coding model.
    pub fn strip_cds(&mut self) -> Result<(), TranscriptError> {
        self.finalized = false;
        self.combined_cds.clear();
        self.combined_utr.clear();
        self.internal_orfs.clear();
        self.phases.clear();
        self.selected_internal_orf_index = None;
        self.has_start_codon = false;
        self.has_stop_codon = false;
        self.finalize()
    }

    /// Strips the transcript down to its coding section. No-op for
    /// non-coding transcripts, transcripts without UTRs, or transcripts
    /// with more than one ORF.
    pub fn remove_utrs(&mut self) -> Result<(), TranscriptError> {
        self.finalize()?;
        if !self.is_coding()
            || self.combined_utr.is_empty()
            || self.number_internal_orfs() > 1
        {
            return Ok(());
        }
        self.finalized = false;
        self.exons = self.combined_cds.clone();
        self.start = self.combined_cds[0].start;
        self.end = self.combined_cds[self.combined_cds.len() - 1].end;
        self.combined_utr.clear();
        self.internal_orfs.clear();
        self.selected_internal_orf_index = None;
        self.finalize()
    }

    /// Flips the strand of the transcript. Strandless transcripts are
    /// left untouched. Applying the method twice restores the original.
    pub fn reverse_strand(&mut self) {
        match self.strand {
            Strand::Plus => self.strand = Strand::Minus,
            Strand::Minus => self.strand = Strand::Plus,
            Strand::Unknown => {}
        }
    }

    /// Replaces the transcript ORFs with externally predicted candidates.
    ///
    /// Sense candidates are preferred; antisense candidates are used only
    /// when no sense candidate exists and `strand_specific` is off.
    /// Secondary ORFs shorter than `minimal_secondary_orf_length` are
    /// dropped. Candidates whose segments do not fit inside the exons
    /// are skipped. Returns the number of ORFs loaded.
    pub fn load_orfs(
        &mut self,
        candidates: &[OrfCandidate],
        strand_specific: bool,
        minimal_secondary_orf_length: u32,
    ) -> Result<usize, TranscriptError> {
        self.finalize()?;

        let is_sense = |c: &OrfCandidate| {
            self.strand == Strand::Unknown || c.strand == Strand::Unknown || c.strand == self.strand
        };
        let fits = |c: &OrfCandidate| {
            !c.segments.is_empty()
                && c.segments
                    .iter()
                    .all(|seg| self.exons.iter().any(|exon| exon.contains(seg)))
        };

        let mut pool: Vec<&OrfCandidate> =
            candidates.iter().filter(|c| is_sense(c) && fits(c)).collect();
        if pool.is_empty() && !strand_specific {
            pool = candidates.iter().filter(|c| !is_sense(c) && fits(c)).collect();
        }
        if pool.is_empty() {
            return Ok(0);
        }

        pool.sort_by(|a, b| {
            b.cds_length()
                .cmp(&a.cds_length())
                .then(a.segments[0].start.cmp(&b.segments[0].start))
        });
        let kept: Vec<&OrfCandidate> = pool
            .iter()
            .enumerate()
            .filter(|(idx, c)| *idx == 0 || c.cds_length() >= minimal_secondary_orf_length)
            .map(|(_, c)| *c)
            .collect();

        self.finalized = false;
        self.combined_cds = interval::merge(
            kept.iter()
                .flat_map(|c| c.segments.iter().copied())
                .collect(),
        );
        self.combined_utr = self
            .exons
            .iter()
            .flat_map(|exon| subtract_all(*exon, &self.combined_cds))
            .collect();
        self.internal_orfs = kept
            .iter()
            .map(|c| build_internal_orf(&self.exons, &c.segments))
            .collect();
        self.selected_internal_orf_index = None;
        self.phases.clear();
        self.has_start_codon = kept[0].has_start_codon;
        self.has_stop_codon = kept[0].has_stop_codon;
        self.finalize()?;
        Ok(kept.len())
    }

    /// Position-based ordering: chromosome, start, end, then tid.
    /// Used wherever a deterministic transcript order is required.
    pub fn cmp_position(&self, other: &Transcript) -> Ordering {
        self.chrom
            .cmp(&other.chrom)
            .then(self.start.cmp(&other.start))
            .then(self.end.cmp(&other.end))
            .then(self.tid.cmp(&other.tid))
    }
}

/// Subtracts every interval in `subtrahends` from `base`.
pub(crate) fn subtract_all(base: Interval, subtrahends: &[Interval]) -> Vec<Interval> {
    let mut pieces = vec![base];
    for sub in subtrahends {
        pieces = pieces
            .into_iter()
            .flat_map(|piece| piece.subtract(sub))
            .collect();
    }
    pieces
}

/// Builds the tagged segment list of one ORF from the exons and the
/// ORF's genomic CDS segments.
pub(crate) fn build_internal_orf(exons: &[Interval], cds: &[Interval]) -> InternalOrf {
    let mut segments: Vec<Segment> = exons
        .iter()
        .map(|e| Segment {
            kind: SegmentKind::Exon,
            interval: *e,
        })
        .collect();
    segments.extend(cds.iter().map(|c| Segment {
        kind: SegmentKind::Cds,
        interval: *c,
    }));
    for exon in exons {
        for utr in subtract_all(*exon, cds) {
            segments.push(Segment {
                kind: SegmentKind::Utr,
                interval: utr,
            });
        }
    }
    segments.sort();
    segments
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({}{}:{}-{})",
            self.tid, self.chrom, self.strand, self.start, self.end
        )
    }
}

impl PartialEq for Transcript {
    /// Returns `true` if both `Transcript`s describe the same model.
    ///
    /// Scoring state, homology hits and locus-assigned values are
    /// **not** taken into consideration for equality.
    fn eq(&self, other: &Self) -> bool {
        self.tid == other.tid
            && self.chrom == other.chrom
            && self.strand == other.strand
            && self.start == other.start
            && self.end == other.end
            && self.exons == other.exons
            && self.combined_cds == other.combined_cds
            && self.combined_utr == other.combined_utr
    }
}

/// Builds a [`Transcript`]
///
/// # Examples
///
/// ```rust
/// use piclo::models::{Strand, TranscriptBuilder};
/// let transcript = TranscriptBuilder::new()
///     .tid("class_Chr1.1000.0")
///     .chrom("Chr1")
///     .strand(Strand::Plus)
///     .build()
///     .unwrap();
/// assert_eq!(transcript.tid(), "class_Chr1.1000.0");
/// ```
pub struct TranscriptBuilder<'a> {
    tid: Option<&'a str>,
    parent: Vec<String>,
    chrom: Option<&'a str>,
    source: &'a str,
    strand: Strand,
    start: Option<u32>,
    end: Option<u32>,
    score: f64,
}

impl<'a> Default for TranscriptBuilder<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TranscriptBuilder<'a> {
    pub fn new() -> Self {
        Self {
            tid: None,
            parent: vec![],
            chrom: None,
            source: "piclo",
            strand: Strand::Unknown,
            start: None,
            end: None,
            score: 0.0,
        }
    }

    /// specify the transcript identifier
    pub fn tid(&mut self, tid: &'a str) -> &mut Self {
        self.tid = Some(tid);
        self
    }

    /// specify the parent gene id(s)
    pub fn parent(&mut self, parent: &str) -> &mut Self {
        self.parent = parent.split(',').map(|p| p.to_string()).collect();
        self
    }

    /// specify the chromosome of the transcript
    pub fn chrom(&mut self, chrom: &'a str) -> &mut Self {
        self.chrom = Some(chrom);
        self
    }

    /// specify the source column for emitted records
    pub fn source(&mut self, source: &'a str) -> &mut Self {
        self.source = source;
        self
    }

    /// specify the `Strand` of the transcript
    pub fn strand(&mut self, strand: Strand) -> &mut Self {
        self.strand = strand;
        self
    }

    /// specify the genomic start; inferred from the exons if absent
    pub fn start(&mut self, start: u32) -> &mut Self {
        self.start = Some(start);
        self
    }

    /// specify the genomic end; inferred from the exons if absent
    pub fn end(&mut self, end: u32) -> &mut Self {
        self.end = Some(end);
        self
    }

    /// specify the input score of the transcript
    pub fn score(&mut self, score: f64) -> &mut Self {
        self.score = score;
        self
    }

    /// Builds and returns a `Transcript`
    pub fn build(&self) -> Result<Transcript, TranscriptError> {
        let tid = match self.tid {
            Some(x) => x.to_string(),
            None => return Err(TranscriptError::invalid("no tid specified")),
        };
        let parent = if self.parent.is_empty() {
            vec![format!("{}.gene", tid)]
        } else {
            self.parent.clone()
        };
        Ok(Transcript {
            tid,
            parent,
            chrom: match self.chrom {
                Some(x) => x.to_string(),
                None => return Err(TranscriptError::invalid("no chromosome specified")),
            },
            source: self.source.to_string(),
            feature: "transcript".to_string(),
            strand: self.strand,
            start: self.start.unwrap_or(0),
            end: self.end.unwrap_or(0),
            score: self.score,
            attributes: BTreeMap::new(),
            exons: vec![],
            combined_cds: vec![],
            combined_utr: vec![],
            phases: vec![],
            first_phase: 0,
            introns: vec![],
            splices: BTreeSet::new(),
            internal_orfs: vec![],
            selected_internal_orf_index: None,
            has_start_codon: false,
            has_stop_codon: false,
            verified_introns: BTreeSet::new(),
            blast_hits: vec![],
            snowy_score: OnceCell::new(),
            intron_range: DEFAULT_INTRON_RANGE,
            exon_fraction: 1.0,
            intron_fraction: 0.0,
            combined_cds_intron_fraction: 0.0,
            selected_cds_intron_fraction: 0.0,
            retained_introns: vec![],
            retained_fraction: 0.0,
            proportion_verified_introns_inlocus: 0.0,
            finalized: false,
        })
    }
}
