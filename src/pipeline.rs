//! The driver: finalizes the input transcripts, sweeps them into
//! superloci, fans the superloci out over a rayon pool, and writes the
//! per-stage outputs.
//!
//! Superloci are independent work units; no locus state is shared
//! between workers. The results are collected and written in input
//! order, so identical inputs yield identical outputs whatever the
//! thread count.

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::Configuration;
use crate::gff;
use crate::loci::superlocus::{group_into_superloci, SuperlocusResult};
use crate::loci::Locus;
use crate::metrics::writer::MetricsWriter;
use crate::models::{Interval, Strand, Transcript, TranscriptWrite, Transcripts};
use crate::utils::errors::PicloError;

/// Summary of a pipeline run.
#[derive(Debug)]
pub struct PipelineResult {
    /// The final loci, one transcript each, in genomic order.
    pub loci: Vec<Locus>,
    /// How many superloci were processed.
    pub superloci: usize,
    /// Input transcripts skipped because finalization failed.
    pub skipped: usize,
    /// Transcripts collected into the diagnostic excluded bins.
    pub excluded: usize,
}

/// Runs the whole pipeline over the given transcripts.
pub fn run(config: &Configuration, transcripts: Transcripts) -> Result<PipelineResult, PicloError> {
    let total = transcripts.len();
    let mut skipped = 0usize;
    let mut prepared: Vec<Transcript> = vec![];
    for mut transcript in transcripts {
        transcript.set_source(&config.source);
        transcript.set_intron_range(config.intron_range);
        let outcome = if config.run_options.exclude_cds {
            transcript.strip_cds()
        } else {
            transcript.finalize()
        };
        match outcome {
            Ok(()) => prepared.push(transcript),
            Err(e) => {
                warn!("skipping {}: {}", transcript.tid(), e);
                skipped += 1;
            }
        }
    }
    info!(
        "prepared {} of {} input transcripts",
        prepared.len(),
        total
    );

    let superloci = group_into_superloci(prepared, config.run_options.flank);
    info!("defined {} superloci", superloci.len());

    let results: Vec<SuperlocusResult> = if config.run_options.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.run_options.threads)
            .build()
            .map_err(|e| PicloError::new(format!("cannot build the worker pool: {}", e)))?;
        pool.install(|| {
            superloci
                .into_par_iter()
                .map(|superlocus| superlocus.define_loci(config))
                .collect()
        })
    } else {
        superloci
            .into_iter()
            .map(|superlocus| superlocus.define_loci(config))
            .collect()
    };

    let excluded = results.iter().map(|r| r.excluded.len()).sum();
    let mut loci: Vec<Locus> = results.iter().flat_map(|r| r.loci.iter().cloned()).collect();
    if config.run_options.remove_overlapping_fragments {
        loci = remove_overlapping_fragments(loci, config.run_options.flank);
    }

    write_outputs(config, &results, &loci)?;

    Ok(PipelineResult {
        superloci: results.len(),
        loci,
        skipped,
        excluded,
    })
}

/// Drops putative fragments: monoexonic or non-coding loci whose
/// extent falls within `flank` of a better-scoring, multiexonic coding
/// locus on the same chromosome.
fn remove_overlapping_fragments(loci: Vec<Locus>, flank: u32) -> Vec<Locus> {
    let is_fragile = |locus: &Locus| {
        locus.transcript().monoexonic() || !locus.transcript().is_coding()
    };
    let kept: Vec<Locus> = loci
        .iter()
        .filter(|candidate| {
            if !is_fragile(candidate) {
                return true;
            }
            let widened = Interval::new(
                candidate.start().saturating_sub(flank),
                candidate.end() + flank,
            );
            let shadowed = loci.iter().any(|other| {
                other.chrom() == candidate.chrom()
                    && !is_fragile(other)
                    && other.transcript().score() > candidate.transcript().score()
                    && widened.overlap(&Interval::new(other.start(), other.end())) >= 0
            });
            if shadowed {
                debug!(
                    "removing the fragment {} ({})",
                    candidate.id(),
                    candidate.transcript().tid()
                );
            }
            !shadowed
        })
        .cloned()
        .collect();
    kept
}

/// Writes one stage: the grouping rows plus the metrics sidecar.
struct StageGroup {
    feature: &'static str,
    id: String,
    chrom: String,
    strand: Strand,
    start: u32,
    end: u32,
    extra: Vec<(&'static str, String)>,
    transcripts: Vec<Transcript>,
}

fn write_stage(path: &str, source: &str, groups: &[StageGroup]) -> Result<(), PicloError> {
    let mut writer = gff::Writer::from_file(path)?;
    writer.set_source(source);
    let mut metrics = MetricsWriter::from_file(format!("{}.metrics.tsv", path))?;
    metrics.write_header()?;

    for group in groups {
        writer.write_group(
            group.feature,
            &group.id,
            &group.chrom,
            group.strand,
            group.start,
            group.end,
            &group.extra,
        )?;
        for transcript in &group.transcripts {
            let mut transcript = transcript.clone();
            transcript.set_parent(vec![group.id.clone()]);
            writer.writeln_single_transcript(&transcript)?;
            metrics.write_transcript(&transcript, &group.id)?;
        }
    }
    writer.flush()?;
    metrics.flush()?;
    Ok(())
}

fn write_outputs(
    config: &Configuration,
    results: &[SuperlocusResult],
    loci: &[Locus],
) -> Result<(), PicloError> {
    if let Some(path) = &config.subloci_out {
        let mut groups = vec![];
        for result in results {
            for sublocus in &result.subloci {
                groups.push(StageGroup {
                    feature: "sublocus",
                    id: sublocus.id(),
                    chrom: sublocus.core().chrom().to_string(),
                    strand: sublocus.core().strand(),
                    start: sublocus.core().start(),
                    end: sublocus.core().end(),
                    extra: vec![("multiexonic", (!sublocus.monoexonic()).to_string())],
                    transcripts: sublocus.core().transcripts().values().cloned().collect(),
                });
            }
        }
        write_stage(path, &config.source, &groups)?;
    }

    if let Some(path) = &config.monoloci_out {
        let mut groups = vec![];
        for result in results {
            for monosublocus in &result.monosubloci {
                let transcript = monosublocus.transcript();
                groups.push(StageGroup {
                    feature: "monosublocus",
                    id: monosublocus.id(),
                    chrom: transcript.chrom().to_string(),
                    strand: transcript.strand(),
                    start: transcript.start(),
                    end: transcript.end(),
                    extra: vec![("parent_sublocus", monosublocus.parent().to_string())],
                    transcripts: vec![transcript.clone()],
                });
            }
        }
        write_stage(path, &config.source, &groups)?;
    }

    if let Some(path) = &config.loci_out {
        let groups: Vec<StageGroup> = loci
            .iter()
            .map(|locus| StageGroup {
                feature: "locus",
                id: locus.id(),
                chrom: locus.chrom().to_string(),
                strand: locus.transcript().strand(),
                start: locus.start(),
                end: locus.end(),
                extra: vec![],
                transcripts: vec![locus.transcript().clone()],
            })
            .collect();
        write_stage(path, &config.source, &groups)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rescaling;
    use crate::tests::transcripts::{
        exon_overlap_trio, mono_multi_pair, scoring_configuration,
    };

    fn as_transcripts(list: Vec<Transcript>) -> Transcripts {
        let mut transcripts = Transcripts::new();
        for t in list {
            transcripts.push(t);
        }
        transcripts
    }

    #[test]
    fn test_run_mono_multi_scenario() {
        let config = scoring_configuration("cdna_length", Rescaling::Max, None, 1.0);
        let result = run(&config, as_transcripts(mono_multi_pair())).unwrap();
        assert_eq!(result.superloci, 1);
        assert_eq!(result.loci.len(), 2);
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn test_run_is_deterministic_across_thread_counts() {
        let mut input = mono_multi_pair();
        input.extend(exon_overlap_trio());
        let config = scoring_configuration("cdna_length", Rescaling::Max, None, 1.0);
        let serial = run(&config, as_transcripts(input.clone())).unwrap();

        let mut threaded_config = config.clone();
        threaded_config.run_options.threads = 4;
        let threaded = run(&threaded_config, as_transcripts(input)).unwrap();

        let serial_ids: Vec<String> = serial
            .loci
            .iter()
            .map(|l| format!("{}:{}", l.id(), l.transcript().tid()))
            .collect();
        let threaded_ids: Vec<String> = threaded
            .loci
            .iter()
            .map(|l| format!("{}:{}", l.id(), l.transcript().tid()))
            .collect();
        assert_eq!(serial_ids, threaded_ids);
    }

    #[test]
    fn test_invalid_transcripts_are_skipped() {
        use crate::models::TranscriptBuilder;
        // multiexonic without strand: rejected by the finalizer
        let mut broken = TranscriptBuilder::new()
            .tid("t_broken")
            .chrom("Chr1")
            .build()
            .unwrap();
        broken.add_exon(Interval::new(1, 100)).unwrap();
        broken.add_exon(Interval::new(200, 300)).unwrap();

        let mut input = mono_multi_pair();
        input.push(broken);
        let config = scoring_configuration("cdna_length", Rescaling::Max, None, 1.0);
        let result = run(&config, as_transcripts(input)).unwrap();
        assert_eq!(result.skipped, 1);
        assert_eq!(result.loci.len(), 2);
    }

    #[test]
    fn test_fragment_removal() {
        use crate::models::{Strand, TranscriptBuilder};
        let mut fragment = mono_multi_pair().remove(0);
        fragment.finalize().unwrap();
        fragment.set_score(0.5);

        let mut keeper = TranscriptBuilder::new()
            .tid("t_keeper")
            .chrom("Chr1")
            .strand(Strand::Plus)
            .build()
            .unwrap();
        keeper.add_exon(Interval::new(150, 300)).unwrap();
        keeper.add_exon(Interval::new(500, 600)).unwrap();
        keeper.add_cds(Interval::new(200, 300), None).unwrap();
        keeper.add_cds(Interval::new(500, 550), None).unwrap();
        keeper.finalize().unwrap();
        keeper.set_score(5.0);

        let loci = vec![Locus::new(fragment), Locus::new(keeper)];
        let kept = remove_overlapping_fragments(loci, 0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].transcript().tid(), "t_keeper");
    }
}
