//! A Sublocus is a maximal group of transcripts that mutually overlap
//! on their exons and share the mono-/multi-exonic class. It computes
//! the neighbor-relative metrics of its members, scores them, and
//! greedily emits non-overlapping winners as [`Monosublocus`] objects.

use std::collections::BTreeSet;

use crate::config::Configuration;
use crate::loci::monosublocus::Monosublocus;
use crate::loci::LocusCore;
use crate::models::Transcript;
use crate::scoring;
use crate::utils::errors::NotInLocus;

#[derive(Clone, Debug)]
pub struct Sublocus {
    core: LocusCore,
    monoexonic: bool,
    metrics_calculated: bool,
    splitted: bool,
}

impl Sublocus {
    /// Creates a sublocus from a seed transcript.
    pub fn new(seed: Transcript) -> Sublocus {
        let monoexonic = seed.monoexonic();
        Sublocus {
            core: LocusCore::from_transcript(seed),
            monoexonic,
            metrics_calculated: false,
            splitted: false,
        }
    }

    pub fn core(&self) -> &LocusCore {
        &self.core
    }

    pub fn monoexonic(&self) -> bool {
        self.monoexonic
    }

    pub fn splitted(&self) -> bool {
        self.splitted
    }

    /// The sublocus id carries the exon-class suffix.
    pub fn id(&self) -> String {
        let addendum = if self.monoexonic { "mono" } else { "multi" };
        format!("{}.{}", self.core.id("sublocus"), addendum)
    }

    /// Adds a transcript. Every member of a sublocus must share the
    /// mono-/multi-exonic class; a mismatch is a caller bug upstream
    /// in the partitioning. `check_in_locus` may be off when the
    /// membership has already been established by the partitioning
    /// graph.
    pub fn add_transcript(
        &mut self,
        transcript: Transcript,
        check_in_locus: bool,
    ) -> Result<(), NotInLocus> {
        assert!(
            !self.splitted,
            "cannot add transcripts to an already split sublocus"
        );
        assert_eq!(
            self.monoexonic,
            transcript.monoexonic(),
            "sublocus {} and transcript {} have incompatible exon classes",
            self.id(),
            transcript.tid()
        );
        self.core.add_transcript(transcript, check_in_locus, 0)
    }

    /// Strict exon overlap: two distinct transcripts intersect iff any
    /// pair of their exons shares at least one base.
    pub fn is_intersecting(transcript: &Transcript, other: &Transcript) -> bool {
        if transcript.tid() == other.tid() {
            return false;
        }
        transcript
            .exons()
            .iter()
            .any(|exon| other.exons().iter().any(|oexon| exon.overlap(oexon) >= 0))
    }

    /// Computes the neighbor-relative metrics for all members, once.
    pub fn get_metrics(&mut self) {
        if self.metrics_calculated {
            return;
        }
        self.core.calculate_relative_metrics();
        self.metrics_calculated = true;
    }

    /// Retrieves the best non-overlapping transcripts inside the
    /// sublocus, according to the configured score.
    ///
    /// Returns the emitted monosubloci plus the transcripts which were
    /// rejected by the requirements expression and never emitted (the
    /// diagnostic "excluded" set).
    pub fn define_monosubloci(
        &mut self,
        config: &Configuration,
    ) -> (Vec<Monosublocus>, Vec<Transcript>) {
        let mut monosubloci = vec![];
        if self.splitted {
            return (monosubloci, vec![]);
        }

        self.get_metrics();
        let not_passing = scoring::score_transcripts(config, &mut self.core.transcripts);
        let purge = config.run_options.purge;
        let parent = self.id();

        let mut emitted: BTreeSet<String> = BTreeSet::new();
        let mut remaining: BTreeSet<String> = self.core.transcripts.keys().cloned().collect();
        while let Some(best_tid) = self.core.choose_best(&remaining) {
            let best = self.core.transcripts[&best_tid].clone();
            remaining.remove(&best_tid);
            remaining.retain(|tid| {
                !Self::is_intersecting(&best, &self.core.transcripts[tid])
            });
            if purge && best.score() == 0.0 {
                continue;
            }
            emitted.insert(best_tid);
            monosubloci.push(Monosublocus::new(best, parent.clone()));
        }

        let excluded = not_passing
            .iter()
            .filter(|tid| !emitted.contains(*tid))
            .map(|tid| self.core.transcripts[tid].clone())
            .collect();

        self.splitted = true;
        (monosubloci, excluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rescaling;
    use crate::tests::transcripts::{
        exon_overlap_trio, failing_requirements_configuration, scoring_configuration,
    };

    fn finalized(mut t: Transcript) -> Transcript {
        t.finalize().unwrap();
        t
    }

    #[test]
    fn test_strict_exon_overlap() {
        let trio: Vec<Transcript> = exon_overlap_trio().into_iter().map(finalized).collect();
        let (t_x, t_y, t_z) = (&trio[0], &trio[1], &trio[2]);
        assert!(Sublocus::is_intersecting(t_x, t_y));
        assert!(!Sublocus::is_intersecting(t_x, t_z));
        assert!(!Sublocus::is_intersecting(t_x, t_x));
    }

    #[test]
    fn test_define_monosubloci_greedy() {
        // t_x and t_y overlap on exons, t_z is separate; but a single
        // sublocus only ever holds one overlap component, so build it
        // from t_x and t_y alone
        let trio: Vec<Transcript> = exon_overlap_trio().into_iter().map(finalized).collect();
        let mut sublocus = Sublocus::new(trio[0].clone());
        sublocus.add_transcript(trio[1].clone(), true).unwrap();

        let config = scoring_configuration("cdna_length", Rescaling::Max, None, 1.0);
        let (monosubloci, excluded) = sublocus.define_monosubloci(&config);
        assert_eq!(monosubloci.len(), 1);
        assert!(excluded.is_empty());
        // the longer of the two wins
        assert_eq!(monosubloci[0].transcript().tid(), "t_y");
        assert!(sublocus.splitted());
    }

    #[test]
    fn test_purge_drops_zero_scores() {
        let trio: Vec<Transcript> = exon_overlap_trio().into_iter().map(finalized).collect();
        let mut sublocus = Sublocus::new(trio[0].clone());
        sublocus.add_transcript(trio[1].clone(), true).unwrap();

        // every transcript fails the requirements
        let mut config = failing_requirements_configuration();
        config.run_options.purge = true;
        let (monosubloci, excluded) = sublocus.define_monosubloci(&config);
        assert!(monosubloci.is_empty());
        assert_eq!(excluded.len(), 2);
    }

    #[test]
    fn test_no_purge_emits_tie_break_winner() {
        let trio: Vec<Transcript> = exon_overlap_trio().into_iter().map(finalized).collect();
        let mut sublocus = Sublocus::new(trio[0].clone());
        sublocus.add_transcript(trio[1].clone(), true).unwrap();

        let mut config = failing_requirements_configuration();
        config.run_options.purge = false;
        let (monosubloci, _) = sublocus.define_monosubloci(&config);
        // all scores are 0, the tie-break decides: highest cdna_length
        assert_eq!(monosubloci.len(), 1);
        assert_eq!(monosubloci[0].transcript().tid(), "t_y");
        assert_eq!(monosubloci[0].transcript().score(), 0.0);
    }

    #[test]
    fn test_emitted_monosubloci_never_intersect() {
        use crate::models::{Interval, TranscriptBuilder};
        // a chain a-b-c where a and c do not touch: b bridges them
        // into one sublocus, the greedy pass emits two winners
        let mut t_a = TranscriptBuilder::new()
            .tid("t_chain_a")
            .chrom("Chr3")
            .strand(crate::models::Strand::Plus)
            .build()
            .unwrap();
        t_a.add_exon(Interval::new(1, 100)).unwrap();
        t_a.finalize().unwrap();
        let mut t_b = TranscriptBuilder::new()
            .tid("t_chain_b")
            .chrom("Chr3")
            .strand(crate::models::Strand::Plus)
            .build()
            .unwrap();
        t_b.add_exon(Interval::new(50, 150)).unwrap();
        t_b.finalize().unwrap();
        let mut t_c = TranscriptBuilder::new()
            .tid("t_chain_c")
            .chrom("Chr3")
            .strand(crate::models::Strand::Plus)
            .build()
            .unwrap();
        t_c.add_exon(Interval::new(120, 260)).unwrap();
        t_c.finalize().unwrap();

        let mut sublocus = Sublocus::new(t_a);
        sublocus.add_transcript(t_b, true).unwrap();
        sublocus.add_transcript(t_c, true).unwrap();
        let config = scoring_configuration("cdna_length", Rescaling::Max, None, 1.0);
        let (monosubloci, _) = sublocus.define_monosubloci(&config);
        assert_eq!(monosubloci.len(), 2);
        for first in &monosubloci {
            for second in &monosubloci {
                assert!(!Sublocus::is_intersecting(
                    first.transcript(),
                    second.transcript()
                ));
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_exon_class_mismatch_panics() {
        let trio: Vec<Transcript> = exon_overlap_trio().into_iter().map(finalized).collect();
        let mut sublocus = Sublocus::new(trio[0].clone());
        // t_z is monoexonic, the sublocus is multiexonic
        let _ = sublocus.add_transcript(trio[2].clone(), true);
    }
}
