use std::fmt;
use std::str::FromStr;

use crate::models::{Transcript, Transcripts};
use crate::utils::errors::ReadWriteError;

/// Strand / direction of transcription.
///
/// Single-exon transcripts may be strandless (`Unknown`); multiexonic
/// transcripts must carry a defined strand to pass finalization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strand {
    Plus,
    Minus,
    #[default]
    Unknown,
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Strand::Plus => "+",
                Strand::Minus => "-",
                Strand::Unknown => ".",
            }
        )
    }
}

impl FromStr for Strand {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            "." | "?" => Ok(Strand::Unknown),
            _ => Err(format!(
                "invalid strand {}. Strand must be one of `+`, `-`, `.` or `?`.",
                s
            )),
        }
    }
}

pub trait TranscriptWrite {
    fn writeln_single_transcript(&mut self, transcript: &Transcript) -> Result<(), std::io::Error>;

    fn write_single_transcript(&mut self, transcript: &Transcript) -> Result<(), std::io::Error>;

    fn write_transcript_vec(&mut self, transcripts: &[Transcript]) -> Result<(), std::io::Error> {
        for transcript in transcripts {
            self.writeln_single_transcript(transcript)?;
        }
        Ok(())
    }

    fn write_transcripts(&mut self, transcripts: &Transcripts) -> Result<(), std::io::Error> {
        self.write_transcript_vec(transcripts.as_vec())
    }
}

pub trait TranscriptRead {
    fn transcripts(&mut self) -> Result<Transcripts, ReadWriteError>;
}
