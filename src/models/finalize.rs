//! The transcript finalizer: brings a raw [`Transcript`] into a fully
//! validated, self-consistent state. Introns, splice sites, UTRs and
//! internal ORFs are reconstructed here from the raw exon records.
//!
//! Every metric reader relies on a finalized transcript; the pipeline
//! calls [`Transcript::finalize`](crate::models::Transcript::finalize)
//! lazily wherever needed.

use crate::models::segment::{orf_cds, orf_cds_length, Segment, SegmentKind};
use crate::models::transcript::Transcript;
use crate::models::Interval;
use crate::models::Strand;
use crate::utils::errors::TranscriptError;

pub(crate) fn finalize(t: &mut Transcript) -> Result<(), TranscriptError> {
    basic_checks(t)?;

    t.exons.sort();
    if t.start == 0 && t.end == 0 {
        // no transcript row was present in the input
        t.start = t.exons[0].start;
        t.end = t.exons[t.exons.len() - 1].end;
    }

    reconcile_utr(t)?;
    calculate_introns(t)?;

    t.combined_cds.sort();
    t.combined_utr.sort();

    infer_completeness(t);
    verify_boundaries(t)?;

    if t.internal_orfs.is_empty() {
        let mut segments: Vec<Segment> = t
            .exons
            .iter()
            .map(|e| Segment {
                kind: SegmentKind::Exon,
                interval: *e,
            })
            .collect();
        segments.extend(t.combined_cds.iter().map(|c| Segment {
            kind: SegmentKind::Cds,
            interval: *c,
        }));
        segments.extend(t.combined_utr.iter().map(|u| Segment {
            kind: SegmentKind::Utr,
            interval: *u,
        }));
        segments.sort();
        t.internal_orfs = vec![segments];
    }

    for orf in &t.internal_orfs {
        check_internal_orf(&t.tid, &t.exons, orf)?;
    }

    if !t.combined_cds.is_empty() {
        t.selected_internal_orf_index = Some(select_longest_orf(t));
        t.first_phase = first_phase(t);
        t.feature = "mRNA".to_string();
    } else {
        t.selected_internal_orf_index = None;
        t.feature = "transcript".to_string();
    }

    t.finalized = true;
    Ok(())
}

/// Minimal criteria a transcript has to fulfil before finalizing.
fn basic_checks(t: &Transcript) -> Result<(), TranscriptError> {
    if t.exons.is_empty() {
        return Err(TranscriptError::invalid(format!(
            "no exon defined for the transcript {}",
            t.tid
        )));
    }
    if t.exons.len() > 1 && t.strand == Strand::Unknown {
        return Err(TranscriptError::invalid(format!(
            "multiexonic transcripts must have a defined strand, error for {}",
            t.tid
        )));
    }
    if !t.combined_utr.is_empty() && t.combined_cds.is_empty() {
        return Err(TranscriptError::invalid(format!(
            "transcript {} has defined UTRs but no CDS feature",
            t.tid
        )));
    }
    Ok(())
}

/// Verifies that cDNA = CDS + UTR, inferring the UTR from the exons
/// when it is missing.
fn reconcile_utr(t: &mut Transcript) -> Result<(), TranscriptError> {
    if t.cdna_length() <= t.combined_utr_length() + t.combined_cds_length() {
        return Ok(());
    }
    if !t.combined_utr.is_empty() || t.combined_cds.is_empty() {
        return Ok(());
    }

    t.combined_cds.sort();
    let first_cds = t.combined_cds[0];
    let last_cds = t.combined_cds[t.combined_cds.len() - 1];
    let mut inferred = vec![];

    for exon in &t.exons {
        if t.combined_cds.contains(exon) {
            continue;
        } else if exon.end < first_cds.start || exon.start > last_cds.end {
            inferred.push(*exon);
        } else if exon.start < first_cds.start && exon.end == first_cds.end {
            inferred.push(Interval::new(exon.start, first_cds.start - 1));
        } else if exon.end > last_cds.end && exon.start == last_cds.start {
            inferred.push(Interval::new(last_cds.end + 1, exon.end));
        } else if t.combined_cds.len() == 1
            && exon.start < first_cds.start
            && exon.end > first_cds.end
        {
            // a single CDS wholly interior to the exon: both flanks are UTR
            inferred.push(Interval::new(exon.start, first_cds.start - 1));
            inferred.push(Interval::new(first_cds.end + 1, exon.end));
        } else {
            return Err(TranscriptError::invalid_cds(format!(
                "error while inferring the UTR of {}: exon {} cannot be reconciled with the CDS",
                t.tid, exon
            )));
        }
    }
    t.combined_utr = inferred;

    let no_cds = t.combined_cds_length() == 0 && t.combined_utr_length() == 0;
    let adds_up = t.cdna_length() == t.combined_utr_length() + t.combined_cds_length();
    if !(no_cds || adds_up) {
        return Err(TranscriptError::invalid_cds(format!(
            "failed to create the UTR of {}: {} cDNA vs {} CDS + {} UTR",
            t.tid,
            t.cdna_length(),
            t.combined_cds_length(),
            t.combined_utr_length()
        )));
    }
    Ok(())
}

/// Rebuilds the intron and splice-site stores from the sorted exons.
fn calculate_introns(t: &mut Transcript) -> Result<(), TranscriptError> {
    t.introns.clear();
    t.splices.clear();
    for pair in t.exons.windows(2) {
        let (exona, exonb) = (pair[0], pair[1]);
        if exona.end >= exonb.start {
            return Err(TranscriptError::invalid(format!(
                "overlapping exons found in {}: {} / {}",
                t.tid, exona, exonb
            )));
        }
        if exona.end + 1 == exonb.start {
            return Err(TranscriptError::invalid(format!(
                "book-ended exons found in {}: {} / {}",
                t.tid, exona, exonb
            )));
        }
        t.introns.push(Interval::new(exona.end + 1, exonb.start - 1));
        t.splices.insert(exona.end + 1);
        t.splices.insert(exonb.start - 1);
    }
    Ok(())
}

/// The presence of UTR before the first CDS segment (or after the last)
/// implies the corresponding codon, depending on the strand.
fn infer_completeness(t: &mut Transcript) {
    if t.combined_utr.is_empty() {
        return;
    }
    let first_utr = t.combined_utr[0];
    let last_utr = t.combined_utr[t.combined_utr.len() - 1];
    let first_cds = t.combined_cds[0];
    let last_cds = t.combined_cds[t.combined_cds.len() - 1];
    if first_utr.start < first_cds.start {
        match t.strand {
            Strand::Minus => t.has_stop_codon = true,
            _ => t.has_start_codon = true,
        }
    }
    if last_utr.end > last_cds.end {
        match t.strand {
            Strand::Minus => t.has_start_codon = true,
            _ => t.has_stop_codon = true,
        }
    }
}

/// The first and last exon have to coincide with the transcript
/// boundaries. The one permitted fix-up: an exon is stretched to the
/// transcript bound when the CDS already reaches that bound.
fn verify_boundaries(t: &mut Transcript) -> Result<(), TranscriptError> {
    let last = t.exons.len() - 1;
    if t.exons[0].start != t.start || t.exons[last].end != t.end {
        if !t.combined_cds.is_empty() {
            if t.exons[0].start > t.start && t.combined_cds[0].start == t.start {
                t.exons[0] = Interval::new(t.start, t.exons[0].end);
            }
            let last_cds = t.combined_cds[t.combined_cds.len() - 1];
            if t.exons[last].end < t.end && last_cds.end == t.end {
                t.exons[last] = Interval::new(t.exons[last].start, t.end);
            }
        }
        if t.exons[0].start != t.start || t.exons[last].end != t.end {
            return Err(TranscriptError::invalid(format!(
                "the transcript {} has coordinates {}:{}, but its exons define it up until {}:{}",
                t.tid,
                t.start,
                t.end,
                t.exons[0].start,
                t.exons[last].end
            )));
        }
    }
    Ok(())
}

/// Verifies that an internal ORF has no internal gap: every CDS segment
/// lies inside an exon, and consecutive CDS segments lie in consecutive
/// exons.
fn check_internal_orf(
    tid: &str,
    exons: &[Interval],
    orf: &[Segment],
) -> Result<(), TranscriptError> {
    let mut orf_segments = orf_cds(orf);
    orf_segments.sort();

    let mut previous_exon_index: Option<usize> = None;
    for orf_segment in &orf_segments {
        let exon_position = exons.iter().position(|exon| exon.contains(orf_segment));
        match exon_position {
            None => {
                return Err(TranscriptError::invalid_orf(format!(
                    "invalid ORF for {}: no exon found containing the CDS segment {}",
                    tid, orf_segment
                )));
            }
            Some(position) => {
                if let Some(previous) = previous_exon_index {
                    if previous + 1 != position {
                        return Err(TranscriptError::invalid_orf(format!(
                            "invalid ORF for {}: the CDS segment {} skips from exon {} to exon {}",
                            tid, orf_segment, previous, position
                        )));
                    }
                }
                previous_exon_index = Some(position);
            }
        }
    }
    Ok(())
}

/// Index of the ORF with the longest CDS. Ties resolve to the first.
fn select_longest_orf(t: &Transcript) -> usize {
    let mut best = 0;
    let mut best_length = 0;
    for (idx, orf) in t.internal_orfs.iter().enumerate() {
        let length = orf_cds_length(orf);
        if length > best_length {
            best = idx;
            best_length = length;
        }
    }
    best
}

/// The phase of the 5'-most CDS segment, taken from the stored phase
/// list, or 0 when no phases were recorded.
fn first_phase(t: &Transcript) -> u8 {
    let mut phases = t.phases.clone();
    phases.sort();
    match t.strand {
        Strand::Minus => phases.last().map(|p| p.1).unwrap_or(0),
        _ => phases.first().map(|p| p.1).unwrap_or(0),
    }
}
