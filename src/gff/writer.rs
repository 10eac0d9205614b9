use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::{Interval, Strand, Transcript, TranscriptWrite};
use crate::utils::errors::ReadWriteError;

/// Writes [`Transcript`]s and locus groupings as GFF3-like text.
///
/// # Examples
///
/// ```rust
/// use piclo::gff::Writer;
/// use piclo::models::TranscriptWrite;
///
/// let mut t = piclo::tests::transcripts::standard_transcript();
/// t.finalize().unwrap();
///
/// let output = Vec::new(); // substitute this with proper IO (io::stdout())
/// let mut writer = Writer::new(output);
/// writer.writeln_single_transcript(&t).unwrap();
///
/// let written = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert!(written.starts_with("Chr1\t"));
/// ```
pub struct Writer<W: std::io::Write> {
    inner: BufWriter<W>,
    source: String,
}

impl Writer<File> {
    /// Creates a new Writer to write into a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadWriteError> {
        match File::create(path.as_ref()) {
            Ok(file) => Ok(Self::new(file)),
            Err(err) => Err(ReadWriteError::new(err)),
        }
    }
}

impl<W: std::io::Write> Writer<W> {
    pub fn new(writer: W) -> Self {
        Writer {
            inner: BufWriter::new(writer),
            source: "piclo".to_string(),
        }
    }

    /// Changes the source column of the emitted rows
    pub fn set_source(&mut self, source: &str) {
        self.source = source.to_string();
    }

    pub fn flush(&mut self) -> Result<(), std::io::Error> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> Result<W, std::io::Error> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }

    /// Writes the header row of a locus grouping.
    pub fn write_group(
        &mut self,
        feature: &str,
        id: &str,
        chrom: &str,
        strand: Strand,
        start: u32,
        end: u32,
        extra: &[(&str, String)],
    ) -> Result<(), std::io::Error> {
        let mut attributes = format!("ID={};Name={}", id, id);
        for (key, value) in extra {
            attributes.push_str(&format!(";{}={}", key, value));
        }
        writeln!(
            self.inner,
            "{}\t{}\t{}\t{}\t{}\t.\t{}\t.\t{}",
            chrom, self.source, feature, start, end, strand, attributes
        )
    }

    fn write_row(
        &mut self,
        transcript: &Transcript,
        feature: &str,
        span: Interval,
        phase: Option<u8>,
        attributes: &str,
    ) -> Result<(), std::io::Error> {
        writeln!(
            self.inner,
            "{}\t{}\t{}\t{}\t{}\t.\t{}\t{}\t{}",
            transcript.chrom(),
            self.source,
            feature,
            span.start,
            span.end,
            transcript.strand(),
            match phase {
                Some(phase) => phase.to_string(),
                None => ".".to_string(),
            },
            attributes
        )
    }
}

/// GFF3 phases of the selected CDS segments, walking the segments in
/// transcription order starting from the transcript's first phase.
fn cds_phases(transcript: &Transcript) -> Vec<(Interval, u8)> {
    let cds = transcript.selected_cds();
    let ordered: Vec<Interval> = match transcript.strand() {
        Strand::Minus => cds.iter().rev().copied().collect(),
        _ => cds,
    };
    let mut phases = vec![];
    let mut phase = i64::from(transcript.first_phase());
    for segment in ordered {
        phases.push((segment, phase as u8));
        phase = (3 - (i64::from(segment.len()) - phase).rem_euclid(3)) % 3;
    }
    phases.sort();
    phases
}

impl<W: std::io::Write> TranscriptWrite for Writer<W> {
    /// Writes a single transcript formatted as GFF3 with an extra newline
    fn writeln_single_transcript(&mut self, transcript: &Transcript) -> Result<(), std::io::Error> {
        self.write_single_transcript(transcript)?;
        self.inner.write_all("\n".as_bytes())
    }

    /// Writes a transcript row followed by its exon, CDS and UTR rows
    fn write_single_transcript(&mut self, transcript: &Transcript) -> Result<(), std::io::Error> {
        let tid = transcript.tid();
        writeln!(
            self.inner,
            "{}\t{}\t{}\t{}\t{}\t{:.2}\t{}\t.\tID={};Parent={};Name={}",
            transcript.chrom(),
            self.source,
            transcript.feature(),
            transcript.start(),
            transcript.end(),
            transcript.score(),
            transcript.strand(),
            tid,
            transcript.parent_string(),
            tid
        )?;
        for (number, exon) in transcript.exons().iter().enumerate() {
            self.write_row(
                transcript,
                "exon",
                *exon,
                None,
                &format!("ID={}.exon{};Parent={}", tid, number + 1, tid),
            )?;
        }
        for utr in transcript.five_utr() {
            self.write_row(
                transcript,
                "five_prime_UTR",
                utr,
                None,
                &format!("Parent={}", tid),
            )?;
        }
        for (segment, phase) in cds_phases(transcript) {
            self.write_row(
                transcript,
                "CDS",
                segment,
                Some(phase),
                &format!("Parent={}", tid),
            )?;
        }
        for utr in transcript.three_utr() {
            self.write_row(
                transcript,
                "three_prime_UTR",
                utr,
                None,
                &format!("Parent={}", tid),
            )?;
        }
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::gff::Reader;
    use crate::models::TranscriptRead;
    use crate::tests::transcripts::utr_inference_transcript;

    #[test]
    fn test_written_transcript_round_trips() {
        let mut t = utr_inference_transcript();
        t.finalize().unwrap();

        let mut writer = Writer::new(Vec::new());
        writer.writeln_single_transcript(&t).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        let mut reader = Reader::new(text.as_bytes());
        let reread = reader.transcripts().unwrap();
        let mut back = reread.to_vec().pop().unwrap();
        back.finalize().unwrap();
        assert_eq!(back, t);
        assert_eq!(back.combined_utr(), t.combined_utr());
        assert_eq!(back.introns(), t.introns());
    }

    #[test]
    fn test_cds_phases_plus_strand() {
        let mut t = utr_inference_transcript();
        t.finalize().unwrap();
        // CDS [50,100] (51 bp) then [200,250]: the second segment
        // starts mid-codon with phase (3 - 51 % 3) % 3 = 0
        let phases = cds_phases(&t);
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0], (Interval::new(50, 100), 0));
        assert_eq!(phases[1], (Interval::new(200, 250), 0));
    }

    #[test]
    fn test_group_header() {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_group(
                "sublocus",
                "sublocus:Chr1+:1-300.multi",
                "Chr1",
                Strand::Plus,
                1,
                300,
                &[("multiexonic", "true".to_string())],
            )
            .unwrap();
        writer.flush().unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "Chr1\tpiclo\tsublocus\t1\t300\t.\t+\t.\tID=sublocus:Chr1+:1-300.multi;Name=sublocus:Chr1+:1-300.multi;multiexonic=true\n"
        );
    }
}
