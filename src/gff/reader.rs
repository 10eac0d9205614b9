use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use log::warn;

use crate::gff::{GffFeature, GffRecord};
use crate::models::{Interval, Transcript, TranscriptBuilder, TranscriptRead, Transcripts};
use crate::utils::errors::{ParseGffError, ReadWriteError};

/// Reads a GFF3 or GTF annotation file into [`Transcripts`].
///
/// The transcripts are returned raw, not finalized: the pipeline
/// finalizes them lazily so that a single malformed model is skipped
/// with a warning instead of aborting the whole run.
pub struct Reader<R> {
    inner: BufReader<R>,
}

impl Reader<File> {
    /// Creates a Reader instance that reads from a File
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadWriteError> {
        match File::open(path.as_ref()) {
            Ok(file) => Ok(Self::new(file)),
            Err(err) => Err(ReadWriteError::new(err)),
        }
    }
}

impl<R: std::io::Read> Reader<R> {
    pub fn new(reader: R) -> Self {
        Reader {
            inner: BufReader::new(reader),
        }
    }

    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Reader {
            inner: BufReader::with_capacity(capacity, reader),
        }
    }

    /// Returns the next data row, skipping comments and empty lines.
    fn line(&mut self) -> Option<Result<GffRecord, ParseGffError>> {
        loop {
            let mut line = String::new();
            match self.inner.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(ParseGffError::new(e))),
            }
            let trimmed = line.trim_end();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Some(GffRecord::from_str(trimmed));
        }
    }
}

/// Fetches the transcript for `tid`, creating it from the current
/// record when a child row arrives before (or without) its parent row.
fn ensure_transcript<'a>(
    transcripts: &'a mut HashMap<String, Transcript>,
    order: &mut Vec<String>,
    tid: &str,
    record: &GffRecord,
) -> Result<&'a mut Transcript, ParseGffError> {
    if !transcripts.contains_key(tid) {
        let mut builder = TranscriptBuilder::new();
        builder
            .tid(tid)
            .chrom(&record.chrom)
            .strand(record.strand);
        if let Some(gene) = record.attributes.get("gene_id") {
            builder.parent(gene);
        }
        let transcript = builder.build().map_err(ParseGffError::from)?;
        transcripts.insert(tid.to_string(), transcript);
        order.push(tid.to_string());
    }
    Ok(transcripts.get_mut(tid).unwrap())
}

impl<R: std::io::Read> TranscriptRead for Reader<R> {
    /// Reads the annotation rows and returns the assembled transcripts.
    fn transcripts(&mut self) -> Result<Transcripts, ReadWriteError> {
        let mut transcripts: HashMap<String, Transcript> = HashMap::new();
        let mut order: Vec<String> = vec![];

        while let Some(line) = self.line() {
            let record = line.map_err(ReadWriteError::from)?;

            if record.feature.is_transcript() {
                let tid = match record.id() {
                    Some(tid) => tid.to_string(),
                    None => {
                        return Err(ReadWriteError::new(format!(
                            "transcript row without an identifier: {}",
                            record
                        )))
                    }
                };
                let transcript =
                    ensure_transcript(&mut transcripts, &mut order, &tid, &record)
                        .map_err(ReadWriteError::from)?;
                transcript.start = record.start;
                transcript.end = record.end;
                transcript.strand = record.strand;
                transcript.source = record.source.clone();
                if let Some(score) = record.score {
                    transcript.set_score(score);
                }
                if let Some(gene) = record.gene() {
                    transcript.set_parent(gene.split(',').map(|g| g.to_string()).collect());
                }
                for (key, value) in &record.attributes {
                    if key != "ID" && key != "Parent" {
                        transcript.set_attribute(key, value);
                    }
                }
                continue;
            }

            if !record.feature.is_transcript_part() {
                continue;
            }
            let parents = record.transcript_ids();
            if parents.is_empty() {
                warn!("skipping a {} row without a parent", record.feature);
                continue;
            }
            for tid in parents {
                let transcript =
                    ensure_transcript(&mut transcripts, &mut order, &tid, &record)
                        .map_err(ReadWriteError::from)?;
                let span = Interval::new(record.start, record.end);
                let added = match record.feature {
                    GffFeature::Exon => transcript.add_exon(span),
                    GffFeature::Cds => transcript.add_cds(span, record.phase),
                    GffFeature::FivePrimeUtr | GffFeature::ThreePrimeUtr | GffFeature::Utr => {
                        transcript.add_utr(span)
                    }
                    GffFeature::StartCodon => {
                        transcript.set_has_start_codon(true);
                        Ok(())
                    }
                    GffFeature::StopCodon => {
                        transcript.set_has_stop_codon(true);
                        Ok(())
                    }
                    _ => Ok(()),
                };
                added.map_err(|e| ReadWriteError::from(ParseGffError::from(e)))?;
            }
        }

        let mut result = Transcripts::with_capacity(order.len());
        for tid in order {
            result.push(transcripts.remove(&tid).unwrap());
        }
        Ok(result)
    }
}
