use std::fmt;

use crate::models::Interval;

/// The type of a segment inside an internal ORF.
///
/// The discriminant order (CDS, UTR, exon) matches the lexicographic
/// order of the GFF feature strings, so that sorting segments by
/// `(interval, kind)` is stable across formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SegmentKind {
    Cds,
    Utr,
    Exon,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SegmentKind::Cds => "CDS",
                SegmentKind::Utr => "UTR",
                SegmentKind::Exon => "exon",
            }
        )
    }
}

/// One tagged piece of an internal ORF: an exon, a CDS segment or
/// a UTR segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    pub kind: SegmentKind,
    pub interval: Interval,
}

impl Segment {
    pub fn new(kind: SegmentKind, start: u32, end: u32) -> Segment {
        Segment {
            kind,
            interval: Interval::new(start, end),
        }
    }

    pub fn is_cds(&self) -> bool {
        self.kind == SegmentKind::Cds
    }

    pub fn is_utr(&self) -> bool {
        self.kind == SegmentKind::Utr
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.interval
            .cmp(&other.interval)
            .then(self.kind.cmp(&other.kind))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.interval)
    }
}

/// An ordered list of tagged segments describing one open reading frame
/// inside a transcript, together with its flanking UTRs and exons.
pub type InternalOrf = Vec<Segment>;

/// Sums the CDS length of an internal ORF.
pub fn orf_cds_length(orf: &[Segment]) -> u32 {
    orf.iter()
        .filter(|s| s.is_cds())
        .map(|s| s.interval.len())
        .sum()
}

/// Extracts the CDS intervals of an internal ORF, in order.
pub fn orf_cds(orf: &[Segment]) -> Vec<Interval> {
    orf.iter()
        .filter(|s| s.is_cds())
        .map(|s| s.interval)
        .collect()
}
