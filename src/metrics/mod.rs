//! The metrics engine: named, typed, side-effect-free features of a
//! finalized [`Transcript`].
//!
//! Intrinsic metrics are functions of the transcript alone.
//! Neighbor-relative metrics (the various fractions, retained introns,
//! locus-verified introns) are assigned to the transcript by its
//! enclosing locus before scoring; reading them here simply returns the
//! assigned value.
//!
//! The registry is the [`Metric::ALL`] table: process-wide, immutable,
//! initialized at compile time. Adding a metric means extending the
//! enum and the table.

pub mod writer;

use std::fmt;

use crate::models::{Strand, Transcript};

/// The value of a metric: an integer count or length, a fraction or
/// score, a flag, or missing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Na,
}

impl MetricValue {
    /// Numeric view used by the scoring engine. Flags map to 0/1,
    /// missing values to 0.
    pub fn as_f64(&self) -> f64 {
        match self {
            MetricValue::Int(x) => *x as f64,
            MetricValue::Float(x) => *x,
            MetricValue::Bool(true) => 1.0,
            MetricValue::Bool(false) => 0.0,
            MetricValue::Na => 0.0,
        }
    }

    pub fn is_na(&self) -> bool {
        matches!(self, MetricValue::Na)
    }
}

impl fmt::Display for MetricValue {
    /// Tabular rendering: floats with two decimals, missing values
    /// as `NA`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MetricValue::Int(x) => write!(f, "{}", x),
            MetricValue::Float(x) if x.is_nan() => write!(f, "NA"),
            MetricValue::Float(x) => write!(f, "{:.2}", x),
            MetricValue::Bool(x) => write!(f, "{}", x),
            MetricValue::Na => write!(f, "NA"),
        }
    }
}

/// Every metric the scoring configuration may refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    BestBits,
    BlastScore,
    CanonicalIntronProportion,
    CdnaLength,
    CdsNotMaximal,
    CdsNotMaximalFraction,
    CombinedCdsFraction,
    CombinedCdsIntronFraction,
    CombinedCdsLength,
    CombinedCdsNum,
    CombinedCdsNumFraction,
    CombinedUtrLength,
    CombinedUtrFraction,
    EndDistanceFromJunction,
    EndDistanceFromTes,
    ExonFraction,
    ExonNum,
    FiveUtrLength,
    FiveUtrNum,
    FiveUtrNumComplete,
    HasStartCodon,
    HasStopCodon,
    HighestCdsExonNumber,
    IntronFraction,
    IsCoding,
    IsComplete,
    MaxIntronLength,
    Monoexonic,
    NonVerifiedIntronsNum,
    NumberInternalOrfs,
    NumIntronsGreaterThanMax,
    NumIntronsSmallerThanMin,
    ProportionVerifiedIntrons,
    ProportionVerifiedIntronsInlocus,
    RetainedFraction,
    RetainedIntronNum,
    SelectedCdsFraction,
    SelectedCdsIntronFraction,
    SelectedCdsLength,
    SelectedCdsNum,
    SelectedCdsNumberFraction,
    SelectedEndDistanceFromJunction,
    SelectedEndDistanceFromTes,
    SelectedStartDistanceFromTss,
    SnowyBlastScore,
    StartDistanceFromTss,
    ThreeUtrLength,
    ThreeUtrNum,
    ThreeUtrNumComplete,
    UtrFraction,
    UtrLength,
    UtrNum,
    UtrNumComplete,
    VerifiedIntronsNum,
}

impl Metric {
    /// The process-wide metric registry.
    pub const ALL: &'static [Metric] = &[
        Metric::BestBits,
        Metric::BlastScore,
        Metric::CanonicalIntronProportion,
        Metric::CdnaLength,
        Metric::CdsNotMaximal,
        Metric::CdsNotMaximalFraction,
        Metric::CombinedCdsFraction,
        Metric::CombinedCdsIntronFraction,
        Metric::CombinedCdsLength,
        Metric::CombinedCdsNum,
        Metric::CombinedCdsNumFraction,
        Metric::CombinedUtrLength,
        Metric::CombinedUtrFraction,
        Metric::EndDistanceFromJunction,
        Metric::EndDistanceFromTes,
        Metric::ExonFraction,
        Metric::ExonNum,
        Metric::FiveUtrLength,
        Metric::FiveUtrNum,
        Metric::FiveUtrNumComplete,
        Metric::HasStartCodon,
        Metric::HasStopCodon,
        Metric::HighestCdsExonNumber,
        Metric::IntronFraction,
        Metric::IsCoding,
        Metric::IsComplete,
        Metric::MaxIntronLength,
        Metric::Monoexonic,
        Metric::NonVerifiedIntronsNum,
        Metric::NumberInternalOrfs,
        Metric::NumIntronsGreaterThanMax,
        Metric::NumIntronsSmallerThanMin,
        Metric::ProportionVerifiedIntrons,
        Metric::ProportionVerifiedIntronsInlocus,
        Metric::RetainedFraction,
        Metric::RetainedIntronNum,
        Metric::SelectedCdsFraction,
        Metric::SelectedCdsIntronFraction,
        Metric::SelectedCdsLength,
        Metric::SelectedCdsNum,
        Metric::SelectedCdsNumberFraction,
        Metric::SelectedEndDistanceFromJunction,
        Metric::SelectedEndDistanceFromTes,
        Metric::SelectedStartDistanceFromTss,
        Metric::SnowyBlastScore,
        Metric::StartDistanceFromTss,
        Metric::ThreeUtrLength,
        Metric::ThreeUtrNum,
        Metric::ThreeUtrNumComplete,
        Metric::UtrFraction,
        Metric::UtrLength,
        Metric::UtrNum,
        Metric::UtrNumComplete,
        Metric::VerifiedIntronsNum,
    ];

    /// The configuration name of the metric.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::BestBits => "best_bits",
            Metric::BlastScore => "blast_score",
            Metric::CanonicalIntronProportion => "canonical_intron_proportion",
            Metric::CdnaLength => "cdna_length",
            Metric::CdsNotMaximal => "cds_not_maximal",
            Metric::CdsNotMaximalFraction => "cds_not_maximal_fraction",
            Metric::CombinedCdsFraction => "combined_cds_fraction",
            Metric::CombinedCdsIntronFraction => "combined_cds_intron_fraction",
            Metric::CombinedCdsLength => "combined_cds_length",
            Metric::CombinedCdsNum => "combined_cds_num",
            Metric::CombinedCdsNumFraction => "combined_cds_num_fraction",
            Metric::CombinedUtrLength => "combined_utr_length",
            Metric::CombinedUtrFraction => "combined_utr_fraction",
            Metric::EndDistanceFromJunction => "end_distance_from_junction",
            Metric::EndDistanceFromTes => "end_distance_from_tes",
            Metric::ExonFraction => "exon_fraction",
            Metric::ExonNum => "exon_num",
            Metric::FiveUtrLength => "five_utr_length",
            Metric::FiveUtrNum => "five_utr_num",
            Metric::FiveUtrNumComplete => "five_utr_num_complete",
            Metric::HasStartCodon => "has_start_codon",
            Metric::HasStopCodon => "has_stop_codon",
            Metric::HighestCdsExonNumber => "highest_cds_exon_number",
            Metric::IntronFraction => "intron_fraction",
            Metric::IsCoding => "is_coding",
            Metric::IsComplete => "is_complete",
            Metric::MaxIntronLength => "max_intron_length",
            Metric::Monoexonic => "monoexonic",
            Metric::NonVerifiedIntronsNum => "non_verified_introns_num",
            Metric::NumberInternalOrfs => "number_internal_orfs",
            Metric::NumIntronsGreaterThanMax => "num_introns_greater_than_max",
            Metric::NumIntronsSmallerThanMin => "num_introns_smaller_than_min",
            Metric::ProportionVerifiedIntrons => "proportion_verified_introns",
            Metric::ProportionVerifiedIntronsInlocus => "proportion_verified_introns_inlocus",
            Metric::RetainedFraction => "retained_fraction",
            Metric::RetainedIntronNum => "retained_intron_num",
            Metric::SelectedCdsFraction => "selected_cds_fraction",
            Metric::SelectedCdsIntronFraction => "selected_cds_intron_fraction",
            Metric::SelectedCdsLength => "selected_cds_length",
            Metric::SelectedCdsNum => "selected_cds_num",
            Metric::SelectedCdsNumberFraction => "selected_cds_number_fraction",
            Metric::SelectedEndDistanceFromJunction => "selected_end_distance_from_junction",
            Metric::SelectedEndDistanceFromTes => "selected_end_distance_from_tes",
            Metric::SelectedStartDistanceFromTss => "selected_start_distance_from_tss",
            Metric::SnowyBlastScore => "snowy_blast_score",
            Metric::StartDistanceFromTss => "start_distance_from_tss",
            Metric::ThreeUtrLength => "three_utr_length",
            Metric::ThreeUtrNum => "three_utr_num",
            Metric::ThreeUtrNumComplete => "three_utr_num_complete",
            Metric::UtrFraction => "utr_fraction",
            Metric::UtrLength => "utr_length",
            Metric::UtrNum => "utr_num",
            Metric::UtrNumComplete => "utr_num_complete",
            Metric::VerifiedIntronsNum => "verified_introns_num",
        }
    }

    /// Looks a metric up by its configuration name.
    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::ALL.iter().find(|m| m.name() == name).copied()
    }

    /// All metric names in lexicographic order, as used for the
    /// columns of the tabular output.
    pub fn sorted_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Metric::ALL.iter().map(|m| m.name()).collect();
        names.sort_unstable();
        names
    }

    /// Computes the value of the metric for a finalized transcript.
    pub fn value(&self, t: &Transcript) -> MetricValue {
        match self {
            Metric::BestBits => MetricValue::Float(t.best_bits()),
            Metric::BlastScore => MetricValue::Float(t.snowy_blast_score()),
            Metric::CanonicalIntronProportion => match t.attributes().get("canonical_proportion") {
                Some(raw) => raw
                    .parse::<f64>()
                    .map(MetricValue::Float)
                    .unwrap_or(MetricValue::Na),
                None => MetricValue::Na,
            },
            Metric::CdnaLength => MetricValue::Int(i64::from(t.cdna_length())),
            Metric::CdsNotMaximal => MetricValue::Int(cds_not_maximal(t)),
            Metric::CdsNotMaximalFraction => {
                MetricValue::Float(if t.combined_cds_length() == 0 {
                    0.0
                } else {
                    cds_not_maximal(t) as f64 / f64::from(t.combined_cds_length())
                })
            }
            Metric::CombinedCdsFraction => MetricValue::Float(fraction(
                f64::from(t.combined_cds_length()),
                f64::from(t.cdna_length()),
            )),
            Metric::CombinedCdsIntronFraction => {
                MetricValue::Float(t.combined_cds_intron_fraction())
            }
            Metric::CombinedCdsLength => MetricValue::Int(i64::from(t.combined_cds_length())),
            Metric::CombinedCdsNum => MetricValue::Int(t.combined_cds().len() as i64),
            Metric::CombinedCdsNumFraction => MetricValue::Float(fraction(
                t.combined_cds().len() as f64,
                t.exons().len() as f64,
            )),
            Metric::CombinedUtrLength => MetricValue::Int(i64::from(t.combined_utr_length())),
            Metric::CombinedUtrFraction => MetricValue::Float(
                1.0 - fraction(
                    f64::from(t.combined_cds_length()),
                    f64::from(t.cdna_length()),
                ),
            ),
            Metric::EndDistanceFromJunction => {
                MetricValue::Int(end_distance_from_junction(t, t.combined_cds_end()))
            }
            Metric::EndDistanceFromTes => MetricValue::Int(end_distance_from_tes(t)),
            Metric::ExonFraction => MetricValue::Float(t.exon_fraction()),
            Metric::ExonNum => MetricValue::Int(t.exons().len() as i64),
            Metric::FiveUtrLength => {
                MetricValue::Int(t.five_utr().iter().map(|u| i64::from(u.len())).sum())
            }
            Metric::FiveUtrNum => MetricValue::Int(t.five_utr().len() as i64),
            Metric::FiveUtrNumComplete => MetricValue::Int(
                t.five_utr()
                    .iter()
                    .filter(|u| t.exons().contains(u))
                    .count() as i64,
            ),
            Metric::HasStartCodon => MetricValue::Bool(t.has_start_codon()),
            Metric::HasStopCodon => MetricValue::Bool(t.has_stop_codon()),
            Metric::HighestCdsExonNumber => MetricValue::Int(
                t.internal_orfs()
                    .iter()
                    .map(|orf| orf.iter().filter(|s| s.is_cds()).count())
                    .max()
                    .unwrap_or(0) as i64,
            ),
            Metric::IntronFraction => MetricValue::Float(t.intron_fraction()),
            Metric::IsCoding => MetricValue::Bool(t.is_coding()),
            Metric::IsComplete => MetricValue::Bool(t.has_start_codon() && t.has_stop_codon()),
            Metric::MaxIntronLength => MetricValue::Int(i64::from(t.max_intron_length())),
            Metric::Monoexonic => MetricValue::Bool(t.monoexonic()),
            Metric::NonVerifiedIntronsNum => {
                MetricValue::Int(t.introns().len() as i64 - t.verified_introns().len() as i64)
            }
            Metric::NumberInternalOrfs => MetricValue::Int(t.number_internal_orfs() as i64),
            Metric::NumIntronsGreaterThanMax => MetricValue::Int(
                t.introns()
                    .iter()
                    .filter(|i| i.len() > t.intron_range().1)
                    .count() as i64,
            ),
            Metric::NumIntronsSmallerThanMin => MetricValue::Int(
                t.introns()
                    .iter()
                    .filter(|i| i.len() < t.intron_range().0)
                    .count() as i64,
            ),
            Metric::ProportionVerifiedIntrons => MetricValue::Float(if t.monoexonic() {
                0.0
            } else {
                fraction(t.verified_introns().len() as f64, t.introns().len() as f64)
            }),
            Metric::ProportionVerifiedIntronsInlocus => {
                MetricValue::Float(t.proportion_verified_introns_inlocus())
            }
            Metric::RetainedFraction => MetricValue::Float(t.retained_fraction()),
            Metric::RetainedIntronNum => MetricValue::Int(t.retained_introns().len() as i64),
            Metric::SelectedCdsFraction => MetricValue::Float(fraction(
                f64::from(t.selected_cds_length()),
                f64::from(t.cdna_length()),
            )),
            Metric::SelectedCdsIntronFraction => {
                MetricValue::Float(t.selected_cds_intron_fraction())
            }
            Metric::SelectedCdsLength => MetricValue::Int(i64::from(t.selected_cds_length())),
            Metric::SelectedCdsNum => MetricValue::Int(t.selected_cds().len() as i64),
            Metric::SelectedCdsNumberFraction => MetricValue::Float(fraction(
                t.selected_cds().len() as f64,
                t.exons().len() as f64,
            )),
            Metric::SelectedEndDistanceFromJunction => MetricValue::Int(
                end_distance_from_junction(t, t.selected_cds_end().unwrap_or(0)),
            ),
            Metric::SelectedEndDistanceFromTes => {
                MetricValue::Int(selected_end_distance_from_tes(t))
            }
            Metric::SelectedStartDistanceFromTss => {
                MetricValue::Int(selected_start_distance_from_tss(t))
            }
            Metric::SnowyBlastScore => MetricValue::Float(t.snowy_blast_score()),
            Metric::StartDistanceFromTss => MetricValue::Int(start_distance_from_tss(t)),
            Metric::ThreeUtrLength => {
                MetricValue::Int(t.three_utr().iter().map(|u| i64::from(u.len())).sum())
            }
            Metric::ThreeUtrNum => MetricValue::Int(t.three_utr().len() as i64),
            Metric::ThreeUtrNumComplete => MetricValue::Int(
                t.three_utr()
                    .iter()
                    .filter(|u| t.exons().contains(u))
                    .count() as i64,
            ),
            Metric::UtrFraction => MetricValue::Float(
                1.0 - fraction(
                    f64::from(t.selected_cds_length()),
                    f64::from(t.cdna_length()),
                ),
            ),
            Metric::UtrNum => {
                MetricValue::Int((t.five_utr().len() + t.three_utr().len()) as i64)
            }
            Metric::UtrNumComplete => MetricValue::Int(
                t.five_utr()
                    .iter()
                    .chain(t.three_utr().iter())
                    .filter(|u| t.exons().contains(u))
                    .count() as i64,
            ),
            Metric::UtrLength => MetricValue::Int(
                t.five_utr()
                    .iter()
                    .chain(t.three_utr().iter())
                    .map(|u| i64::from(u.len()))
                    .sum(),
            ),
            Metric::VerifiedIntronsNum => MetricValue::Int(t.verified_introns().len() as i64),
        }
    }
}

/// Division where an empty denominator yields 0 instead of NaN.
fn fraction(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// CDS length excluded from the selected ORF.
fn cds_not_maximal(t: &Transcript) -> i64 {
    if t.number_internal_orfs() < 2 {
        return 0;
    }
    i64::from(t.combined_cds_length()) - i64::from(t.selected_cds_length())
}

/// cDNA distance between the transcription start site and `pos`,
/// walking along the exons in transcription order.
fn cdna_distance_from_tss(t: &Transcript, pos: u32) -> i64 {
    let mut distance: i64 = 0;
    match t.strand() {
        Strand::Minus => {
            for exon in t.exons().iter().rev() {
                distance +=
                    i64::from(exon.end) + 1 - std::cmp::max(i64::from(pos) + 1, i64::from(exon.start));
                if pos >= exon.start {
                    break;
                }
            }
        }
        _ => {
            for exon in t.exons() {
                distance +=
                    std::cmp::min(i64::from(exon.end), i64::from(pos) - 1) - i64::from(exon.start) + 1;
                if pos <= exon.end {
                    break;
                }
            }
        }
    }
    distance.max(0)
}

/// cDNA distance between the transcription end site and `pos`.
fn cdna_distance_from_tes(t: &Transcript, pos: u32) -> i64 {
    let mut distance: i64 = 0;
    match t.strand() {
        Strand::Minus => {
            for exon in t.exons() {
                distance +=
                    std::cmp::min(i64::from(exon.end), i64::from(pos) - 1) - i64::from(exon.start) + 1;
                if pos <= exon.end {
                    break;
                }
            }
        }
        _ => {
            for exon in t.exons().iter().rev() {
                distance +=
                    i64::from(exon.end) + 1 - std::cmp::max(i64::from(pos) + 1, i64::from(exon.start));
                if pos >= exon.start {
                    break;
                }
            }
        }
    }
    distance.max(0)
}

fn selected_start_distance_from_tss(t: &Transcript) -> i64 {
    match t.selected_cds_start() {
        Some(pos) => cdna_distance_from_tss(t, pos),
        None => 0,
    }
}

fn start_distance_from_tss(t: &Transcript) -> i64 {
    if t.number_internal_orfs() < 2 {
        return selected_start_distance_from_tss(t);
    }
    cdna_distance_from_tss(t, t.combined_cds_start())
}

fn selected_end_distance_from_tes(t: &Transcript) -> i64 {
    match t.selected_cds_end() {
        Some(pos) => cdna_distance_from_tes(t, pos),
        None => 0,
    }
}

fn end_distance_from_tes(t: &Transcript) -> i64 {
    if t.number_internal_orfs() < 2 {
        return selected_end_distance_from_tes(t);
    }
    cdna_distance_from_tes(t, t.combined_cds_end())
}

/// Distance between the stop codon and the nearest downstream splice
/// site on the same strand. In many eukaryotes this distance cannot
/// exceed 50-55 bp without the transcript becoming an NMD target.
/// Returns 0 for non-coding or monoexonic transcripts, and when no
/// junction lies downstream of the stop.
fn end_distance_from_junction(t: &Transcript, cds_end: u32) -> i64 {
    if !t.is_coding() || t.monoexonic() {
        return 0;
    }
    match t.strand() {
        Strand::Plus => {
            let downstream = t.splices().iter().find(|s| **s > cds_end);
            match downstream {
                Some(splice) => i64::from(*splice) - i64::from(cds_end),
                None => 0,
            }
        }
        Strand::Minus => {
            let downstream = t.splices().iter().rev().find(|s| **s < cds_end);
            match downstream {
                Some(splice) => i64::from(cds_end) - i64::from(*splice),
                None => 0,
            }
        }
        Strand::Unknown => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::transcripts::{multiexonic_coding, standard_transcript};

    #[test]
    fn test_registry_is_consistent() {
        assert_eq!(Metric::ALL.len(), 54);
        for metric in Metric::ALL {
            assert_eq!(Metric::from_name(metric.name()), Some(*metric));
        }
        let sorted = Metric::sorted_names();
        let mut resorted = sorted.clone();
        resorted.sort_unstable();
        assert_eq!(sorted, resorted);
        assert_eq!(Metric::from_name("no_such_metric"), None);
    }

    #[test]
    fn test_intrinsic_lengths() {
        let mut t = multiexonic_coding();
        t.finalize().unwrap();
        assert_eq!(
            Metric::CdnaLength.value(&t).as_f64() as u32,
            t.cdna_length()
        );
        assert_eq!(
            Metric::CdnaLength.value(&t).as_f64() as u32,
            t.combined_cds_length() + t.combined_utr_length()
        );
        assert_eq!(Metric::ExonNum.value(&t), MetricValue::Int(t.exons().len() as i64));
        assert_eq!(Metric::Monoexonic.value(&t), MetricValue::Bool(false));
        assert_eq!(Metric::IsCoding.value(&t), MetricValue::Bool(true));
    }

    #[test]
    fn test_fraction_semantics() {
        let mut t = standard_transcript();
        t.finalize().unwrap();
        let combined = Metric::CombinedCdsFraction.value(&t).as_f64();
        assert!(combined > 0.0 && combined <= 1.0);
        let utr = Metric::CombinedUtrFraction.value(&t).as_f64();
        assert!((combined + utr - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_division_by_zero_is_zero() {
        assert_eq!(fraction(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_distances_plus_strand() {
        // exons [1,100], [200,300] with CDS [50,100], [200,250], strand +
        let mut t = crate::tests::transcripts::utr_inference_transcript();
        t.finalize().unwrap();
        // 5' UTR is [1,49]: 49 bases before the CDS start
        assert_eq!(Metric::SelectedStartDistanceFromTss.value(&t), MetricValue::Int(49));
        // 3' UTR is [251,300]: 50 bases after the CDS end
        assert_eq!(Metric::SelectedEndDistanceFromTes.value(&t), MetricValue::Int(50));
        assert_eq!(Metric::FiveUtrLength.value(&t), MetricValue::Int(49));
        assert_eq!(Metric::ThreeUtrLength.value(&t), MetricValue::Int(50));
        assert_eq!(Metric::UtrLength.value(&t), MetricValue::Int(99));
        // both splices (101, 199) lie upstream of the stop at 250
        assert_eq!(
            Metric::SelectedEndDistanceFromJunction.value(&t),
            MetricValue::Int(0)
        );
    }

    #[test]
    fn test_end_distance_from_junction_downstream() {
        use crate::models::{Interval, Strand, TranscriptBuilder};
        let mut t = TranscriptBuilder::new()
            .tid("t_nmd")
            .chrom("Chr1")
            .strand(Strand::Plus)
            .build()
            .unwrap();
        t.add_exon(Interval::new(1, 100)).unwrap();
        t.add_exon(Interval::new(200, 300)).unwrap();
        t.add_exon(Interval::new(400, 500)).unwrap();
        t.add_cds(Interval::new(50, 80), None).unwrap();
        t.finalize().unwrap();
        // stop codon at 80, nearest downstream splice at 101
        assert_eq!(
            Metric::SelectedEndDistanceFromJunction.value(&t),
            MetricValue::Int(21)
        );
    }

    #[test]
    fn test_canonical_intron_proportion_from_attributes() {
        let mut t = standard_transcript();
        t.finalize().unwrap();
        assert!(Metric::CanonicalIntronProportion.value(&t).is_na());
        t.set_attribute("canonical_proportion", "0.75");
        assert_eq!(
            Metric::CanonicalIntronProportion.value(&t),
            MetricValue::Float(0.75)
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(MetricValue::Int(42).to_string(), "42");
        assert_eq!(MetricValue::Float(0.5).to_string(), "0.50");
        assert_eq!(MetricValue::Float(1.0 / 3.0).to_string(), "0.33");
        assert_eq!(MetricValue::Bool(true).to_string(), "true");
        assert_eq!(MetricValue::Na.to_string(), "NA");
    }
}
