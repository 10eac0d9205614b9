//! A purely diagnostic container for the transcripts which failed the
//! requirements expression at the sublocus stage and were purged. It
//! is never scored and never written to the locus outputs; its metrics
//! can still be dumped for inspection.

use crate::loci::LocusCore;
use crate::models::Transcript;

#[derive(Clone, Debug, Default)]
pub struct ExcludedLocus {
    core: LocusCore,
}

impl ExcludedLocus {
    pub fn new() -> ExcludedLocus {
        ExcludedLocus::default()
    }

    pub fn core(&self) -> &LocusCore {
        &self.core
    }

    pub fn id(&self) -> String {
        self.core.id("excluded_transcripts")
    }

    /// Membership is never checked: this is a bin, not a locus proper.
    pub fn add_transcript(&mut self, transcript: Transcript) {
        // the bin can mix strands, keep whatever the first member set
        self.core
            .add_transcript(transcript, false, 0)
            .expect("unchecked addition cannot fail");
    }

    pub fn len(&self) -> usize {
        self.core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }
}
