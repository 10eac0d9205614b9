use std::error::Error;
use std::fmt;

/// Generic top-level error for the `piclo` binary.
///
/// Most lower-level errors can be converted into a `PicloError`
/// so that `main` only has to deal with a single type.
pub struct PicloError {
    message: String,
}

impl Error for PicloError {}

impl PicloError {
    pub fn new<S: fmt::Display>(s: S) -> Self {
        Self {
            message: s.to_string(),
        }
    }
}

impl fmt::Display for PicloError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // user-facing error
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for PicloError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<std::io::Error> for PicloError {
    fn from(e: std::io::Error) -> PicloError {
        PicloError {
            message: format!("IO error: {}", e),
        }
    }
}

impl From<ReadWriteError> for PicloError {
    fn from(e: ReadWriteError) -> PicloError {
        PicloError {
            message: format!("ReadWrite error: {}", e),
        }
    }
}

impl From<InvalidConfiguration> for PicloError {
    fn from(e: InvalidConfiguration) -> PicloError {
        PicloError {
            message: e.to_string(),
        }
    }
}

impl From<TranscriptError> for PicloError {
    fn from(e: TranscriptError) -> PicloError {
        PicloError {
            message: e.to_string(),
        }
    }
}

impl From<String> for PicloError {
    fn from(e: String) -> PicloError {
        PicloError { message: e }
    }
}

/// Structural problems with a transcript, raised during finalization
/// or by the mutating methods.
#[derive(Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// The transcript itself is malformed: no exons, overlapping exons,
    /// missing strand on a multiexonic model, UTR without CDS,
    /// boundary mismatches.
    Invalid(String),
    /// The CDS could not be reconciled with the exons.
    InvalidCds(String),
    /// An internal ORF skips over an exon or falls outside the exons.
    InvalidOrf(String),
    /// Attempt to mutate a transcript after it has been finalized.
    Modification(String),
}

impl TranscriptError {
    pub fn invalid<S: fmt::Display>(s: S) -> Self {
        TranscriptError::Invalid(s.to_string())
    }

    pub fn invalid_cds<S: fmt::Display>(s: S) -> Self {
        TranscriptError::InvalidCds(s.to_string())
    }

    pub fn invalid_orf<S: fmt::Display>(s: S) -> Self {
        TranscriptError::InvalidOrf(s.to_string())
    }

    pub fn modification<S: fmt::Display>(s: S) -> Self {
        TranscriptError::Modification(s.to_string())
    }
}

impl Error for TranscriptError {}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TranscriptError::Invalid(msg) => write!(f, "invalid transcript: {}", msg),
            TranscriptError::InvalidCds(msg) => write!(f, "invalid CDS: {}", msg),
            TranscriptError::InvalidOrf(msg) => write!(f, "invalid ORF: {}", msg),
            TranscriptError::Modification(msg) => {
                write!(f, "modification of a finalized transcript: {}", msg)
            }
        }
    }
}

impl fmt::Debug for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A transcript failed the membership check of a locus during
/// `add_transcript`. This is recoverable: the caller simply tries
/// the next bucket or opens a new one.
#[derive(Clone, PartialEq, Eq)]
pub struct NotInLocus {
    pub message: String,
}

impl NotInLocus {
    pub fn new<S: fmt::Display>(s: S) -> Self {
        Self {
            message: s.to_string(),
        }
    }
}

impl Error for NotInLocus {}

impl fmt::Display for NotInLocus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "transcript does not belong to the locus: {}", self.message)
    }
}

impl fmt::Debug for NotInLocus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Configuration validation failure.
///
/// All faults found during validation are aggregated so the user can
/// correct the whole file in one go.
#[derive(Clone, PartialEq, Eq)]
pub struct InvalidConfiguration {
    pub faults: Vec<String>,
}

impl InvalidConfiguration {
    pub fn new<S: fmt::Display>(s: S) -> Self {
        Self {
            faults: vec![s.to_string()],
        }
    }

    pub fn from_faults(faults: Vec<String>) -> Self {
        Self { faults }
    }
}

impl Error for InvalidConfiguration {}

impl fmt::Display for InvalidConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "The configuration is invalid:")?;
        for fault in &self.faults {
            writeln!(f, "\t{}", fault)?;
        }
        Ok(())
    }
}

impl fmt::Debug for InvalidConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// An error occurred while parsing a GFF3/GTF input row.
pub struct ParseGffError {
    pub message: String,
}

impl ParseGffError {
    pub fn new<S: fmt::Display>(s: S) -> Self {
        Self {
            message: s.to_string(),
        }
    }

    pub fn from_chain(err: ParseGffError, msg: &str) -> Self {
        Self {
            message: format!("{}\nPrevious error: {}", msg, err),
        }
    }
}

impl Error for ParseGffError {}

impl fmt::Display for ParseGffError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "An error occurred while parsing the annotation input. Please check your input data.\n{}",
            self.message
        )
    }
}

impl fmt::Debug for ParseGffError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl From<TranscriptError> for ParseGffError {
    fn from(e: TranscriptError) -> ParseGffError {
        ParseGffError::new(e.to_string())
    }
}

/// Reading from or writing to an annotation sink failed.
#[derive(Debug)]
pub struct ReadWriteError {
    message: String,
}

impl Error for ReadWriteError {}

impl ReadWriteError {
    pub fn new<S: fmt::Display>(s: S) -> Self {
        Self {
            message: s.to_string(),
        }
    }
}

impl fmt::Display for ReadWriteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ParseGffError> for ReadWriteError {
    fn from(err: ParseGffError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ReadWriteError {
    fn from(err: std::io::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl From<String> for ReadWriteError {
    fn from(e: String) -> ReadWriteError {
        ReadWriteError { message: e }
    }
}
