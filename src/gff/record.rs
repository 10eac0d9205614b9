use core::str::FromStr;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::Strand;
use crate::utils::errors::ParseGffError;

/// The feature type of an annotation row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GffFeature {
    Gene,
    Transcript,
    Mrna,
    Exon,
    Cds,
    FivePrimeUtr,
    ThreePrimeUtr,
    Utr,
    StartCodon,
    StopCodon,
    Intron,
    Other(String),
}

impl FromStr for GffFeature {
    type Err = ParseGffError;
    fn from_str(s: &str) -> Result<Self, ParseGffError> {
        Ok(match s {
            "gene" => Self::Gene,
            "transcript" => Self::Transcript,
            "mRNA" => Self::Mrna,
            "exon" => Self::Exon,
            "CDS" => Self::Cds,
            "five_prime_UTR" | "5UTR" | "five_prime_utr" => Self::FivePrimeUtr,
            "three_prime_UTR" | "3UTR" | "three_prime_utr" => Self::ThreePrimeUtr,
            "UTR" => Self::Utr,
            "start_codon" => Self::StartCodon,
            "stop_codon" => Self::StopCodon,
            "intron" => Self::Intron,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for GffFeature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Gene => "gene",
                Self::Transcript => "transcript",
                Self::Mrna => "mRNA",
                Self::Exon => "exon",
                Self::Cds => "CDS",
                Self::FivePrimeUtr => "five_prime_UTR",
                Self::ThreePrimeUtr => "three_prime_UTR",
                Self::Utr => "UTR",
                Self::StartCodon => "start_codon",
                Self::StopCodon => "stop_codon",
                Self::Intron => "intron",
                Self::Other(other) => other,
            }
        )
    }
}

impl GffFeature {
    /// Rows that open a new transcript model.
    pub fn is_transcript(&self) -> bool {
        matches!(self, Self::Transcript | Self::Mrna)
    }

    /// Rows that contribute segments (or flags) to their parent
    /// transcript.
    pub fn is_transcript_part(&self) -> bool {
        matches!(
            self,
            Self::Exon
                | Self::Cds
                | Self::FivePrimeUtr
                | Self::ThreePrimeUtr
                | Self::Utr
                | Self::StartCodon
                | Self::StopCodon
        )
    }
}

/// One row of a GFF3 or GTF file.
///
/// One record *does not* equal a transcript, but only one feature of
/// it: an exon, a CDS segment, a UTR stretch and so on. Both GFF3
/// (`key=value;`) and GTF (`key "value";`) attribute syntaxes are
/// accepted; which id links a child to its parent differs between the
/// two and is resolved by [`GffRecord::transcript_ids`].
#[derive(Clone, Debug, PartialEq)]
pub struct GffRecord {
    pub chrom: String,
    pub source: String,
    pub feature: GffFeature,
    pub start: u32,
    pub end: u32,
    pub score: Option<f64>,
    pub strand: Strand,
    pub phase: Option<u8>,
    pub attributes: BTreeMap<String, String>,
}

impl GffRecord {
    /// The `ID` of the row (GFF3) or its `transcript_id` (GTF).
    pub fn id(&self) -> Option<&str> {
        self.attributes
            .get("ID")
            .or_else(|| self.attributes.get("transcript_id"))
            .map(|s| s.as_str())
    }

    /// The transcripts a child row belongs to: every id listed in
    /// `Parent` (GFF3), or the `transcript_id` (GTF).
    pub fn transcript_ids(&self) -> Vec<String> {
        if let Some(parent) = self.attributes.get("Parent") {
            return parent.split(',').map(|p| p.to_string()).collect();
        }
        match self.attributes.get("transcript_id") {
            Some(tid) => vec![tid.clone()],
            None => vec![],
        }
    }

    /// The gene this row belongs to, if stated.
    pub fn gene(&self) -> Option<&str> {
        self.attributes
            .get("Parent")
            .filter(|_| self.feature.is_transcript())
            .or_else(|| self.attributes.get("gene_id"))
            .map(|s| s.as_str())
    }
}

impl FromStr for GffRecord {
    type Err = ParseGffError;

    fn from_str(line: &str) -> Result<Self, ParseGffError> {
        let columns: Vec<&str> = line.trim_end().split('\t').collect();
        if columns.len() != 9 {
            return Err(ParseGffError::new(format!(
                "expected 9 tab-separated columns, found {}: {}",
                columns.len(),
                line
            )));
        }
        let start = columns[3]
            .parse::<u32>()
            .map_err(|e| ParseGffError::new(format!("invalid start {}: {}", columns[3], e)))?;
        let end = columns[4]
            .parse::<u32>()
            .map_err(|e| ParseGffError::new(format!("invalid end {}: {}", columns[4], e)))?;
        let score = match columns[5] {
            "." => None,
            raw => Some(
                raw.parse::<f64>()
                    .map_err(|e| ParseGffError::new(format!("invalid score {}: {}", raw, e)))?,
            ),
        };
        let strand = Strand::from_str(columns[6]).map_err(ParseGffError::new)?;
        let phase = match columns[7] {
            "." => None,
            raw => Some(
                raw.parse::<u8>()
                    .map_err(|e| ParseGffError::new(format!("invalid phase {}: {}", raw, e)))?,
            ),
        };
        Ok(GffRecord {
            chrom: columns[0].to_string(),
            source: columns[1].to_string(),
            feature: GffFeature::from_str(columns[2])?,
            start: start.min(end),
            end: start.max(end),
            score,
            strand,
            phase,
            attributes: parse_attributes(columns[8]),
        })
    }
}

/// Parses the ninth column. GFF3 uses `key=value;`, GTF uses
/// `key "value";`; the two styles are distinguished per field.
fn parse_attributes(raw: &str) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    for field in raw.split(';') {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        if let Some((key, value)) = field.split_once('=') {
            attributes.insert(key.trim().to_string(), value.trim().to_string());
        } else if let Some((key, value)) = field.split_once(' ') {
            attributes.insert(
                key.trim().to_string(),
                value.trim().trim_matches('"').to_string(),
            );
        }
    }
    attributes
}

impl fmt::Display for GffRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let attributes: Vec<String> = self
            .attributes
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom,
            self.source,
            self.feature,
            self.start,
            self.end,
            match self.score {
                Some(score) => format!("{:.2}", score),
                None => ".".to_string(),
            },
            self.strand,
            match self.phase {
                Some(phase) => phase.to_string(),
                None => ".".to_string(),
            },
            attributes.join(";")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gff3_row() {
        let line = "Chr1\tcufflinks\tmRNA\t5928\t8737\t.\t+\t.\tID=cufflinks_star_at.23553.1;Parent=cufflinks_star_at.23553";
        let record: GffRecord = line.parse().unwrap();
        assert_eq!(record.chrom, "Chr1");
        assert_eq!(record.feature, GffFeature::Mrna);
        assert!(record.feature.is_transcript());
        assert_eq!(record.id(), Some("cufflinks_star_at.23553.1"));
        assert_eq!(record.gene(), Some("cufflinks_star_at.23553"));
        assert_eq!(record.strand, Strand::Plus);
        assert_eq!(record.score, None);
    }

    #[test]
    fn test_parse_gtf_row() {
        let line = "Chr1\tCufflinks\texon\t5928\t6263\t1000.00\t+\t.\tgene_id \"cufflinks_star_at.23553\"; transcript_id \"cufflinks_star_at.23553.1\"; exon_number \"1\";";
        let record: GffRecord = line.parse().unwrap();
        assert_eq!(record.feature, GffFeature::Exon);
        assert!(record.feature.is_transcript_part());
        assert_eq!(
            record.transcript_ids(),
            vec!["cufflinks_star_at.23553.1".to_string()]
        );
        assert_eq!(record.gene(), Some("cufflinks_star_at.23553"));
        assert_eq!(record.score, Some(1000.0));
    }

    #[test]
    fn test_parse_multiple_parents() {
        let line = "Chr1\tpiclo\texon\t100\t200\t.\t+\t.\tID=exon1;Parent=t1,t2";
        let record: GffRecord = line.parse().unwrap();
        assert_eq!(
            record.transcript_ids(),
            vec!["t1".to_string(), "t2".to_string()]
        );
    }

    #[test]
    fn test_reversed_coordinates_are_swapped() {
        let line = "Chr1\tpiclo\texon\t200\t100\t.\t+\t.\tID=exon1;Parent=t1";
        let record: GffRecord = line.parse().unwrap();
        assert_eq!((record.start, record.end), (100, 200));
    }

    #[test]
    fn test_malformed_rows_are_rejected() {
        assert!("Chr1\tonly\tthree".parse::<GffRecord>().is_err());
        let bad_start = "Chr1\tpiclo\texon\tX\t200\t.\t+\t.\tID=e";
        assert!(bad_start.parse::<GffRecord>().is_err());
        let bad_strand = "Chr1\tpiclo\texon\t100\t200\t.\tx\t.\tID=e";
        assert!(bad_strand.parse::<GffRecord>().is_err());
    }

    #[test]
    fn test_unknown_feature_is_preserved() {
        let line = "Chr1\tpiclo\tpseudogene\t100\t200\t.\t+\t.\tID=p1";
        let record: GffRecord = line.parse().unwrap();
        assert_eq!(record.feature, GffFeature::Other("pseudogene".to_string()));
        assert!(!record.feature.is_transcript());
        assert!(!record.feature.is_transcript_part());
    }
}
