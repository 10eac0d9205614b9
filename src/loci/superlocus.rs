//! The outer, coordinate-based grouping: a Superlocus collects
//! transcripts sharing chromosome and strand whose extents fall within
//! a configurable flank of each other, and drives the per-window
//! pipeline `Sublocus → Monosublocus → Locus`.

use log::debug;

use crate::config::Configuration;
use crate::loci::graph::TranscriptGraph;
use crate::loci::{
    ExcludedLocus, Locus, Monosublocus, MonosublocusHolder, LocusCore, Sublocus,
};
use crate::models::Transcript;
use crate::utils::errors::NotInLocus;

#[derive(Clone, Debug)]
pub struct Superlocus {
    core: LocusCore,
    flank: u32,
}

/// Everything a superlocus produces: the intermediate stages are kept
/// so the driver can write the per-stage outputs.
#[derive(Debug, Default)]
pub struct SuperlocusResult {
    pub id: String,
    pub subloci: Vec<Sublocus>,
    pub monosubloci: Vec<Monosublocus>,
    pub loci: Vec<Locus>,
    pub excluded: ExcludedLocus,
}

impl Superlocus {
    pub fn new(seed: Transcript, flank: u32) -> Superlocus {
        Superlocus {
            core: LocusCore::from_transcript(seed),
            flank,
        }
    }

    pub fn core(&self) -> &LocusCore {
        &self.core
    }

    pub fn id(&self) -> String {
        self.core.id("superlocus")
    }

    pub fn in_locus(&self, transcript: &Transcript) -> bool {
        self.core.in_locus(transcript, self.flank)
    }

    pub fn add_transcript(&mut self, transcript: Transcript) -> Result<(), NotInLocus> {
        self.core.add_transcript(transcript, true, self.flank)
    }

    /// Partitions the members into subloci: connected components of
    /// the strict exon-overlap graph, restricted to pairs sharing the
    /// mono-/multi-exonic class.
    pub fn define_subloci(&self) -> Vec<Sublocus> {
        let graph = TranscriptGraph::define(&self.core.transcripts, |a, b| {
            a.monoexonic() == b.monoexonic() && Sublocus::is_intersecting(a, b)
        });
        let mut subloci = vec![];
        for component in graph.connected_components() {
            let mut members = component.iter();
            // the component is never empty
            let seed = members.next().unwrap();
            let mut sublocus = Sublocus::new(self.core.transcripts[seed].clone());
            for tid in members {
                // membership was established by the graph
                sublocus
                    .add_transcript(self.core.transcripts[tid].clone(), false)
                    .expect("unchecked addition cannot fail");
            }
            subloci.push(sublocus);
        }
        subloci.sort_by_key(|s| (s.core().start(), s.core().end(), s.monoexonic()));
        subloci
    }

    /// Runs the whole pipeline for this genomic window.
    pub fn define_loci(&self, config: &Configuration) -> SuperlocusResult {
        let mut result = SuperlocusResult {
            id: self.id(),
            ..SuperlocusResult::default()
        };

        let mut subloci = self.define_subloci();
        debug!("{}: {} subloci", self.id(), subloci.len());

        for sublocus in &mut subloci {
            let (monosubloci, excluded) = sublocus.define_monosubloci(config);
            result.monosubloci.extend(monosubloci);
            for transcript in excluded {
                result.excluded.add_transcript(transcript);
            }
        }
        result.subloci = subloci;
        result
            .monosubloci
            .sort_by(|a, b| a.transcript().cmp_position(b.transcript()));

        let cds_only = config.run_options.subloci_from_cds_only;
        let mut holders: Vec<MonosublocusHolder> = vec![];
        for monosublocus in result.monosubloci.iter().cloned() {
            let slot = holders
                .iter_mut()
                .find(|holder| holder.in_locus(monosublocus.transcript(), cds_only));
            match slot {
                Some(holder) => holder
                    .add_monosublocus(monosublocus, cds_only)
                    .expect("membership was checked"),
                None => holders.push(MonosublocusHolder::new(monosublocus)),
            }
        }

        for holder in &mut holders {
            result.loci.extend(holder.define_loci(config));
        }
        result
            .loci
            .sort_by(|a, b| a.transcript().cmp_position(b.transcript()));
        debug!("{}: {} loci", self.id(), result.loci.len());
        result
    }
}

/// Groups finalized transcripts into superloci: same chromosome, same
/// strand, extents within `flank` of the growing group extent. The
/// input order does not matter; the grouping is deterministic.
pub fn group_into_superloci(mut transcripts: Vec<Transcript>, flank: u32) -> Vec<Superlocus> {
    transcripts.sort_by(|a, b| {
        a.chrom()
            .cmp(b.chrom())
            .then(a.strand().cmp(&b.strand()))
            .then(a.start().cmp(&b.start()))
            .then(a.end().cmp(&b.end()))
            .then(a.tid().cmp(b.tid()))
    });
    let mut superloci: Vec<Superlocus> = vec![];
    for transcript in transcripts {
        match superloci.last_mut() {
            Some(current) if current.in_locus(&transcript) => {
                current
                    .add_transcript(transcript)
                    .expect("membership was checked");
            }
            _ => superloci.push(Superlocus::new(transcript, flank)),
        }
    }
    superloci
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rescaling;
    use crate::tests::transcripts::{
        exon_overlap_trio, mono_multi_pair, scoring_configuration,
    };

    fn finalized(mut t: Transcript) -> Transcript {
        t.finalize().unwrap();
        t
    }

    #[test]
    fn test_grouping_by_strand_and_flank() {
        let trio: Vec<Transcript> = exon_overlap_trio().into_iter().map(finalized).collect();
        // t_x [1,300], t_y [50,300], t_z [400,500]: without flank the
        // monoexonic t_z is its own superlocus
        let superloci = group_into_superloci(trio.clone(), 0);
        assert_eq!(superloci.len(), 2);
        // with a 200 bp flank everything merges
        let superloci = group_into_superloci(trio, 200);
        assert_eq!(superloci.len(), 1);
    }

    #[test]
    fn test_mono_vs_multi_isolation() {
        // scenario: a monoexonic and a multiexonic transcript overlap
        // on their exons; they must end up in two subloci and two loci
        let pair: Vec<Transcript> = mono_multi_pair().into_iter().map(finalized).collect();
        let superloci = group_into_superloci(pair, 0);
        assert_eq!(superloci.len(), 1);
        let superlocus = &superloci[0];

        let subloci = superlocus.define_subloci();
        assert_eq!(subloci.len(), 2);
        assert_ne!(subloci[0].monoexonic(), subloci[1].monoexonic());

        let config = scoring_configuration("cdna_length", Rescaling::Max, None, 1.0);
        let result = superlocus.define_loci(&config);
        assert_eq!(result.loci.len(), 2);
        let mut winners: Vec<&str> = result
            .loci
            .iter()
            .map(|l| l.transcript().tid())
            .collect();
        winners.sort_unstable();
        assert_eq!(winners, vec!["t_a", "t_b"]);
    }

    #[test]
    fn test_exon_overlap_grouping_scenario() {
        // t_x and t_y share exon overlap, t_z sits apart: with a wide
        // flank all three share a superlocus, which splits into two
        // subloci and two loci
        let trio: Vec<Transcript> = exon_overlap_trio().into_iter().map(finalized).collect();
        let superloci = group_into_superloci(trio, 200);
        assert_eq!(superloci.len(), 1);

        let subloci = superloci[0].define_subloci();
        assert_eq!(subloci.len(), 2);
        assert_eq!(subloci[0].core().len(), 2);
        assert_eq!(subloci[1].core().len(), 1);

        let config = scoring_configuration("selected_cds_length", Rescaling::Max, None, 1.0);
        let result = superloci[0].define_loci(&config);
        assert_eq!(result.loci.len(), 2);
    }

    #[test]
    fn test_purge_empties_window() {
        let pair: Vec<Transcript> = mono_multi_pair().into_iter().map(finalized).collect();
        let superloci = group_into_superloci(pair, 0);
        let mut config = crate::tests::transcripts::failing_requirements_configuration();
        config.run_options.purge = true;
        let result = superloci[0].define_loci(&config);
        assert!(result.loci.is_empty());
        assert_eq!(result.excluded.len(), 2);
    }
}
