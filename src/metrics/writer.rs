use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::metrics::Metric;
use crate::models::Transcript;
use crate::utils::errors::ReadWriteError;

/// Writes the metrics sidecar table: one row per transcript, one
/// column per metric, metrics sorted by name.
///
/// # Examples
///
/// ```rust
/// use piclo::metrics::writer::MetricsWriter;
///
/// let mut t = piclo::tests::transcripts::standard_transcript();
/// t.finalize().unwrap();
///
/// let output = Vec::new();
/// let mut writer = MetricsWriter::new(output);
/// writer.write_header().unwrap();
/// writer.write_transcript(&t, "locus_1").unwrap();
///
/// let table = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert!(table.starts_with("tid\tparent\tscore\t"));
/// ```
pub struct MetricsWriter<W: std::io::Write> {
    inner: BufWriter<W>,
}

impl MetricsWriter<File> {
    /// Creates a new MetricsWriter to write into a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadWriteError> {
        match File::create(path.as_ref()) {
            Ok(file) => Ok(Self::new(file)),
            Err(err) => Err(ReadWriteError::new(err)),
        }
    }
}

impl<W: std::io::Write> MetricsWriter<W> {
    pub fn new(writer: W) -> Self {
        MetricsWriter {
            inner: BufWriter::new(writer),
        }
    }

    /// Writes the header row: `tid`, `parent`, `score`, then every
    /// metric name in lexicographic order.
    pub fn write_header(&mut self) -> Result<(), std::io::Error> {
        let mut columns = vec!["tid", "parent", "score"];
        columns.extend(Metric::sorted_names());
        writeln!(self.inner, "{}", columns.join("\t"))
    }

    /// Writes one row for `transcript`, using `parent` as the id of
    /// the enclosing locus.
    pub fn write_transcript(
        &mut self,
        transcript: &Transcript,
        parent: &str,
    ) -> Result<(), std::io::Error> {
        let mut row = vec![
            transcript.tid().to_string(),
            parent.to_string(),
            format!("{:.2}", transcript.score()),
        ];
        for name in Metric::sorted_names() {
            // every sorted name comes straight from the registry
            let metric = Metric::from_name(name).unwrap();
            row.push(metric.value(transcript).to_string());
        }
        writeln!(self.inner, "{}", row.join("\t"))
    }

    pub fn flush(&mut self) -> Result<(), std::io::Error> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> Result<W, std::io::Error> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::transcripts::multiexonic_coding;

    #[test]
    fn test_header_and_row_have_matching_widths() {
        let mut t = multiexonic_coding();
        t.finalize().unwrap();
        let mut writer = MetricsWriter::new(Vec::new());
        writer.write_header().unwrap();
        writer.write_transcript(&t, "sublocus:Chr1+:100-600.multi").unwrap();
        let table = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        let header_fields = lines[0].split('\t').count();
        let row_fields = lines[1].split('\t').count();
        assert_eq!(header_fields, row_fields);
        assert_eq!(header_fields, 3 + Metric::ALL.len());
    }

    #[test]
    fn test_row_contents() {
        let mut t = multiexonic_coding();
        t.finalize().unwrap();
        t.set_score(3.14159);
        let mut writer = MetricsWriter::new(Vec::new());
        writer.write_transcript(&t, "parent_locus").unwrap();
        let table = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let fields: Vec<&str> = table.trim_end().split('\t').collect();
        assert_eq!(fields[0], t.tid());
        assert_eq!(fields[1], "parent_locus");
        assert_eq!(fields[2], "3.14");
        // canonical_intron_proportion has no attribute on the fixture
        let names = Metric::sorted_names();
        let canonical = names
            .iter()
            .position(|n| *n == "canonical_intron_proportion")
            .unwrap();
        assert_eq!(fields[3 + canonical], "NA");
    }
}
