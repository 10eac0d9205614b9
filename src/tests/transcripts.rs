//! This module contains some standard transcripts and configurations
//! to use for testing.
//!
//! This simplifies writing unit- and integration tests. The fixture
//! coordinates are chosen to exercise the edge cases of the finalizer
//! and of the locus pipeline: overlapping exon chains, retained
//! introns, mono- vs multi-exonic isolation, UTR inference.
//!
//! All transcripts are returned raw; callers finalize where needed.

use std::collections::BTreeMap;

use crate::config::{
    Configuration, FilterValue, MetricFilter, Operator, Requirements, Rescaling, ScoringParameter,
};
use crate::models::{Interval, Strand, Transcript, TranscriptBuilder};

fn build(tid: &str, chrom: &str, strand: Strand) -> Transcript {
    TranscriptBuilder::new()
        .tid(tid)
        .chrom(chrom)
        .strand(strand)
        .build()
        .unwrap()
}

/// A single-exon transcript on the plus strand: exon [100, 200].
pub fn monoexonic_plus() -> Transcript {
    let mut t = build("t_a", "Chr1", Strand::Plus);
    t.add_exon(Interval::new(100, 200)).unwrap();
    t
}

/// A two-exon transcript on the plus strand:
/// exons [150, 300] and [500, 600].
pub fn multiexonic_plus() -> Transcript {
    let mut t = build("t_b", "Chr1", Strand::Plus);
    t.add_exon(Interval::new(150, 300)).unwrap();
    t.add_exon(Interval::new(500, 600)).unwrap();
    t
}

/// A monoexonic and a multiexonic transcript overlapping on their
/// exons: they must never share a sublocus or a locus.
pub fn mono_multi_pair() -> Vec<Transcript> {
    vec![monoexonic_plus(), multiexonic_plus()]
}

/// Three transcripts for exon-overlap grouping: `t_x` and `t_y` share
/// exon overlap, `t_z` sits apart and is monoexonic.
///
/// ```text
/// t_x:  ====------====
/// t_y:   =====----====
/// t_z:                    =====
/// ```
pub fn exon_overlap_trio() -> Vec<Transcript> {
    let mut t_x = build("t_x", "Chr1", Strand::Plus);
    t_x.add_exon(Interval::new(1, 100)).unwrap();
    t_x.add_exon(Interval::new(200, 300)).unwrap();

    let mut t_y = build("t_y", "Chr1", Strand::Plus);
    t_y.add_exon(Interval::new(50, 150)).unwrap();
    t_y.add_exon(Interval::new(200, 300)).unwrap();

    let mut t_z = build("t_z", "Chr1", Strand::Plus);
    t_z.add_exon(Interval::new(400, 500)).unwrap();

    vec![t_x, t_y, t_z]
}

/// A coding transcript whose UTR is left for the finalizer to infer:
/// exons [1, 100] and [200, 300], CDS [50, 100] and [200, 250].
/// The reconciled UTR is [1, 49] and [251, 300].
pub fn utr_inference_transcript() -> Transcript {
    let mut t = build("t_utr", "Chr1", Strand::Plus);
    t.add_exon(Interval::new(1, 100)).unwrap();
    t.add_exon(Interval::new(200, 300)).unwrap();
    t.add_cds(Interval::new(50, 100), Some(0)).unwrap();
    t.add_cds(Interval::new(200, 250), Some(0)).unwrap();
    t
}

/// A two-exon coding transcript used by the mutator and ORF-loading
/// tests: exons [1000, 1200] and [1500, 1800], CDS [1100, 1200] and
/// [1500, 1600].
pub fn multiexonic_coding() -> Transcript {
    let mut t = build("t_coding", "Chr2", Strand::Plus);
    t.add_exon(Interval::new(1000, 1200)).unwrap();
    t.add_exon(Interval::new(1500, 1800)).unwrap();
    t.add_cds(Interval::new(1100, 1200), Some(0)).unwrap();
    t.add_cds(Interval::new(1500, 1600), Some(1)).unwrap();
    t
}

/// Generates a transcript to be used for tests.
/// It contains 5 exons, 3 of which are coding.
///
/// ```text
/// Coordinates (x10):
///
///    11...15  21...25  31...35  41...45  51...55
///    =======--====XX---XXXXX----XXXX=---=======
///
/// ---  intron
/// ===  exon (non-coding)
/// XXX  CDS
/// ```
pub fn standard_transcript() -> Transcript {
    let mut t = build("t_standard", "Chr1", Strand::Plus);
    t.add_exon(Interval::new(110, 150)).unwrap();
    t.add_exon(Interval::new(210, 250)).unwrap();
    t.add_exon(Interval::new(310, 350)).unwrap();
    t.add_exon(Interval::new(410, 450)).unwrap();
    t.add_exon(Interval::new(510, 550)).unwrap();
    t.add_cds(Interval::new(240, 250), Some(0)).unwrap();
    t.add_cds(Interval::new(310, 350), Some(1)).unwrap();
    t.add_cds(Interval::new(410, 440), Some(2)).unwrap();
    t
}

/// Two transcripts for retained-intron detection:
///
/// ```text
/// t_spliced:   ====------====
/// t_retainer:  ==============------==
/// ```
///
/// The intron [150, 180] of `t_spliced` is fully covered by the
/// non-coding exon [100, 250] of `t_retainer`.
pub fn retained_intron_pair() -> Vec<Transcript> {
    let mut t_spliced = build("t_spliced", "Chr1", Strand::Plus);
    t_spliced.add_exon(Interval::new(100, 149)).unwrap();
    t_spliced.add_exon(Interval::new(181, 260)).unwrap();

    let mut t_retainer = build("t_retainer", "Chr1", Strand::Plus);
    t_retainer.add_exon(Interval::new(100, 250)).unwrap();
    t_retainer.add_exon(Interval::new(400, 450)).unwrap();

    vec![t_spliced, t_retainer]
}

/// A validated configuration with a single scoring entry.
pub fn scoring_configuration(
    metric: &str,
    rescaling: Rescaling,
    value: Option<f64>,
    multiplier: f64,
) -> Configuration {
    let mut scoring = BTreeMap::new();
    scoring.insert(
        metric.to_string(),
        ScoringParameter {
            rescaling,
            value,
            multiplier,
            filter: None,
        },
    );
    let mut config = Configuration {
        scoring,
        ..Configuration::default()
    };
    config.validate().unwrap();
    config
}

/// A validated configuration whose requirements no transcript can
/// fulfil (`cdna_length` above a billion bases).
pub fn failing_requirements_configuration() -> Configuration {
    let mut config = scoring_configuration("cdna_length", Rescaling::Max, None, 1.0);
    let mut parameters = BTreeMap::new();
    parameters.insert(
        "cdna_length".to_string(),
        MetricFilter {
            operator: Operator::Gt,
            value: FilterValue::Number(1e9),
        },
    );
    config.requirements = Some(Requirements {
        parameters,
        expression: None,
        compiled: None,
    });
    config.validate().unwrap();
    config
}
