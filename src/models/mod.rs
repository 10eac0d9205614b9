//! Holds the main data models and structs that are used in piclo
//!

mod finalize;
mod interval;
pub mod segment;
mod transcript;
mod transcripts;
mod utils;

pub use crate::models::interval::{merge, Interval};
pub use crate::models::segment::{InternalOrf, Segment, SegmentKind};
pub use crate::models::transcript::{
    BlastHit, OrfCandidate, Transcript, TranscriptBuilder, DEFAULT_INTRON_RANGE,
};
pub use crate::models::transcripts::Transcripts;
pub use crate::models::utils::{Strand, TranscriptRead, TranscriptWrite};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_builder() {
        let a = TranscriptBuilder::new()
            .tid("cufflinks_star_at.23553.1")
            .chrom("Chr5")
            .strand(Strand::Plus)
            .parent("cufflinks_star_at.23553")
            .build()
            .unwrap();
        assert_eq!(a.tid(), "cufflinks_star_at.23553.1");
        assert_eq!(a.chrom(), "Chr5");
        assert_eq!(a.strand(), Strand::Plus);
        assert_eq!(a.parent_string(), "cufflinks_star_at.23553");
        assert!(!a.finalized());
    }

    #[test]
    fn test_strand_parsing() {
        assert_eq!("+".parse::<Strand>().unwrap(), Strand::Plus);
        assert_eq!("-".parse::<Strand>().unwrap(), Strand::Minus);
        assert_eq!(".".parse::<Strand>().unwrap(), Strand::Unknown);
        assert_eq!("?".parse::<Strand>().unwrap(), Strand::Unknown);
        assert!("x".parse::<Strand>().is_err());
        assert_eq!(Strand::Minus.to_string(), "-");
    }
}
