//! The four-stage locus refinement pipeline:
//! `Superlocus → Sublocus → Monosublocus → Locus`.
//!
//! Every locus kind is a thin wrapper around [`LocusCore`], which holds
//! the shared container state (chromosome, extremes, member transcripts,
//! exon/intron unions) and the shared behaviors. The kind-specific
//! intersection predicates and resolution strategies live in the
//! respective modules.

pub mod excluded;
pub mod graph;
pub mod locus;
pub mod monosublocus;
pub mod sublocus;
pub mod superlocus;

pub use crate::loci::excluded::ExcludedLocus;
pub use crate::loci::locus::Locus;
pub use crate::loci::monosublocus::{Monosublocus, MonosublocusHolder};
pub use crate::loci::sublocus::Sublocus;
pub use crate::loci::superlocus::Superlocus;

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use bio::data_structures::interval_tree::ArrayBackedIntervalTree;

use crate::models::{Interval, Strand, Transcript};
use crate::utils::errors::NotInLocus;

/// Shared state of every locus kind: a container of transcripts with a
/// common chromosome and strand, the computed extremes, and the unions
/// of exons, introns, CDS introns and verified introns.
#[derive(Clone, Debug, Default)]
pub struct LocusCore {
    pub(crate) chrom: String,
    pub(crate) strand: Strand,
    pub(crate) start: u32,
    pub(crate) end: u32,
    pub(crate) transcripts: BTreeMap<String, Transcript>,
    pub(crate) exons: BTreeSet<Interval>,
    pub(crate) introns: BTreeSet<Interval>,
    pub(crate) combined_cds_introns: BTreeSet<Interval>,
    pub(crate) selected_cds_introns: BTreeSet<Interval>,
    pub(crate) verified_introns: BTreeSet<Interval>,
}

impl LocusCore {
    /// Creates a locus seeded with one finalized transcript.
    pub fn from_transcript(transcript: Transcript) -> LocusCore {
        assert!(
            transcript.finalized(),
            "transcripts must be finalized before entering a locus"
        );
        let mut core = LocusCore {
            chrom: transcript.chrom().to_string(),
            strand: transcript.strand(),
            start: transcript.start(),
            end: transcript.end(),
            ..LocusCore::default()
        };
        core.absorb(transcript);
        core
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    pub fn transcripts(&self) -> &BTreeMap<String, Transcript> {
        &self.transcripts
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// The canonical id of a locus: `prefix:chrom<strand>:start-end`.
    pub fn id(&self, prefix: &str) -> String {
        format!(
            "{}:{}{}:{}-{}",
            prefix, self.chrom, self.strand, self.start, self.end
        )
    }

    /// Checks whether a transcript belongs to this locus: same
    /// chromosome, same strand, and its extent overlaps the locus
    /// extent widened by `flank`.
    pub fn in_locus(&self, transcript: &Transcript, flank: u32) -> bool {
        if self.is_empty() {
            return true;
        }
        if transcript.chrom() != self.chrom || transcript.strand() != self.strand {
            return false;
        }
        let widened = Interval::new(self.start.saturating_sub(flank), self.end + flank);
        widened.overlap(&Interval::new(transcript.start(), transcript.end())) > 0
    }

    /// Adds a transcript, optionally verifying membership first.
    /// On accept the extremes are extended and the unions updated.
    pub fn add_transcript(
        &mut self,
        transcript: Transcript,
        check_in_locus: bool,
        flank: u32,
    ) -> Result<(), NotInLocus> {
        if check_in_locus && !self.in_locus(&transcript, flank) {
            return Err(NotInLocus::new(format!(
                "{} vs {}{}:{}-{}",
                transcript, self.chrom, self.strand, self.start, self.end
            )));
        }
        if self.is_empty() {
            self.chrom = transcript.chrom().to_string();
            self.strand = transcript.strand();
            self.start = transcript.start();
            self.end = transcript.end();
        }
        self.absorb(transcript);
        Ok(())
    }

    fn absorb(&mut self, transcript: Transcript) {
        assert!(transcript.finalized());
        self.start = self.start.min(transcript.start());
        self.end = self.end.max(transcript.end());
        self.exons.extend(transcript.exons().iter().copied());
        self.introns.extend(transcript.introns().iter().copied());
        self.combined_cds_introns
            .extend(transcript.combined_cds_introns());
        self.selected_cds_introns
            .extend(transcript.selected_cds_introns());
        self.verified_introns
            .extend(transcript.verified_introns().iter().copied());
        self.transcripts
            .insert(transcript.tid().to_string(), transcript);
    }

    /// Assigns the neighbor-relative metrics (fractions, retained
    /// introns, locus-verified introns) to every member.
    pub fn calculate_relative_metrics(&mut self) {
        let exons = self.exons.clone();
        let introns = self.introns.clone();
        let cds_introns = self.combined_cds_introns.clone();
        let selected_introns = self.selected_cds_introns.clone();
        let verified = self.verified_introns.clone();

        let mut intron_tree: ArrayBackedIntervalTree<u32, Interval> =
            ArrayBackedIntervalTree::new();
        for intron in &introns {
            intron_tree.insert(intron.start..intron.end + 1, *intron);
        }
        intron_tree.index();

        for transcript in self.transcripts.values_mut() {
            let shared_exons = transcript
                .exons()
                .iter()
                .filter(|e| exons.contains(e))
                .count();
            transcript.set_exon_fraction(shared_exons as f64 / exons.len() as f64);

            if introns.is_empty() {
                transcript.set_intron_fraction(0.0);
            } else {
                let shared = transcript
                    .introns()
                    .iter()
                    .filter(|i| introns.contains(i))
                    .count();
                transcript.set_intron_fraction(shared as f64 / introns.len() as f64);
            }

            if cds_introns.is_empty() {
                transcript.set_combined_cds_intron_fraction(0.0);
            } else {
                let shared = transcript
                    .combined_cds_introns()
                    .intersection(&cds_introns)
                    .count();
                transcript
                    .set_combined_cds_intron_fraction(shared as f64 / cds_introns.len() as f64);
            }

            if selected_introns.is_empty() {
                transcript.set_selected_cds_intron_fraction(0.0);
            } else {
                let shared = transcript
                    .selected_cds_introns()
                    .intersection(&selected_introns)
                    .count();
                transcript.set_selected_cds_intron_fraction(
                    shared as f64 / selected_introns.len() as f64,
                );
            }

            let retained = find_retained_introns(transcript, &intron_tree);
            let retained_length: u32 = retained.iter().map(|e| e.len()).sum();
            transcript.set_retained_introns(retained);
            transcript
                .set_retained_fraction(f64::from(retained_length) / f64::from(transcript.cdna_length()));

            if verified.is_empty() {
                transcript.set_proportion_verified_introns_inlocus(0.0);
            } else {
                let shared = transcript
                    .verified_introns()
                    .intersection(&verified)
                    .count();
                transcript
                    .set_proportion_verified_introns_inlocus(shared as f64 / verified.len() as f64);
            }
        }
    }

    /// Picks the best transcript among `candidates` by score, with a
    /// deterministic tie-break: highest `cdna_length`, then highest
    /// `combined_cds_length`, then lexicographically smallest tid.
    pub fn choose_best(&self, candidates: &BTreeSet<String>) -> Option<String> {
        self.transcripts
            .values()
            .filter(|t| candidates.contains(t.tid()))
            .max_by(|a, b| compare_candidates(a, b))
            .map(|t| t.tid().to_string())
    }
}

/// The ordering used by `choose_best`: the maximum is the winner.
pub(crate) fn compare_candidates(a: &Transcript, b: &Transcript) -> Ordering {
    a.score()
        .partial_cmp(&b.score())
        .unwrap_or(Ordering::Equal)
        .then(a.cdna_length().cmp(&b.cdna_length()))
        .then(a.combined_cds_length().cmp(&b.combined_cds_length()))
        .then(b.tid().cmp(a.tid()))
}

/// An exon is retaining an intron iff it is not an internal CDS
/// segment of the transcript and some intron of the locus is fully
/// covered by the exon.
fn find_retained_introns(
    transcript: &Transcript,
    intron_tree: &ArrayBackedIntervalTree<u32, Interval>,
) -> Vec<Interval> {
    let cds_segments = transcript.non_overlapping_cds();
    transcript
        .exons()
        .iter()
        .filter(|exon| !cds_segments.contains(exon))
        .filter(|exon| {
            intron_tree
                .find(exon.start..exon.end + 1)
                .iter()
                .any(|entry| exon.contains(entry.data()))
        })
        .copied()
        .collect()
}
