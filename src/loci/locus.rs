//! The final output grouping: one representative transcript per locus.

use std::fmt;

use crate::models::Transcript;

#[derive(Clone, Debug)]
pub struct Locus {
    transcript: Transcript,
}

impl Locus {
    pub fn new(transcript: Transcript) -> Locus {
        Locus { transcript }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn chrom(&self) -> &str {
        self.transcript.chrom()
    }

    pub fn start(&self) -> u32 {
        self.transcript.start()
    }

    pub fn end(&self) -> u32 {
        self.transcript.end()
    }

    pub fn id(&self) -> String {
        format!(
            "locus:{}{}:{}-{}",
            self.transcript.chrom(),
            self.transcript.strand(),
            self.transcript.start(),
            self.transcript.end()
        )
    }

    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} [{}]", self.id(), self.transcript.tid())
    }
}
