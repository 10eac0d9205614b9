//! Annotation I/O: parsing GFF3/GTF rows into [`Transcript`]s and
//! writing the locus groupings back out as GFF3-like text.

mod reader;
mod record;
mod writer;

pub use crate::gff::reader::Reader;
pub use crate::gff::record::{GffFeature, GffRecord};
pub use crate::gff::writer::Writer;
