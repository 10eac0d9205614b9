use std::collections::HashMap;

use crate::models::Transcript;

/// A convenience wrapper to handle large amounts of [`Transcript`]s
///
/// It allows fast lookup operations by transcript or gene id.
///
/// # Examples
///
/// ```rust
/// use piclo::models::{TranscriptBuilder, Transcripts};
///
/// let mut transcripts = Transcripts::new();
/// assert_eq!(transcripts.len(), 0);
///
/// transcripts.push(TranscriptBuilder::new()
///     .tid("class_Chr1.1000.0")
///     .chrom("Chr1")
///     .parent("gene_Chr1.1000")
///     .strand(piclo::models::Strand::Minus)
///     .build()
///     .unwrap()
/// );
/// assert_eq!(transcripts.len(), 1);
///
/// assert!(transcripts.by_tid("class_Chr1.1000.0").is_some());
/// assert_eq!(transcripts.by_parent("gene_Chr1.1000").unwrap().len(), 1);
///
/// assert!(transcripts.by_tid("Foo").is_none());
/// assert!(transcripts.by_parent("Bar").is_none());
/// ```
pub struct Transcripts {
    list: Vec<Transcript>,
    tid: HashMap<String, usize>,
    parent: HashMap<String, Vec<usize>>,
}

impl Transcripts {
    pub fn new() -> Self {
        Self {
            list: vec![],
            tid: HashMap::new(),
            parent: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: Vec::with_capacity(capacity),
            tid: HashMap::with_capacity(capacity),
            parent: HashMap::with_capacity(capacity),
        }
    }

    /// Retrieve a [`Transcript`] by its identifier.
    pub fn by_tid(&self, tid: &str) -> Option<&Transcript> {
        self.tid.get(tid).map(|idx| &self.list[*idx])
    }

    /// Retrieve a mutable [`Transcript`] by its identifier.
    pub fn by_tid_mut(&mut self, tid: &str) -> Option<&mut Transcript> {
        match self.tid.get(tid) {
            Some(idx) => self.list.get_mut(*idx),
            None => None,
        }
    }

    /// Retrieve all [`Transcript`]s of a gene.
    pub fn by_parent(&self, parent: &str) -> Option<Vec<&Transcript>> {
        self.parent
            .get(parent)
            .map(|ids| ids.iter().map(|idx| &self.list[*idx]).collect())
    }

    /// Add another [`Transcript`]
    pub fn push(&mut self, record: Transcript) {
        let idx = self.list.len();
        self.tid.insert(record.tid().to_string(), idx);
        for parent in record.parent() {
            match self.parent.get_mut(parent) {
                Some(x) => x.push(idx),
                None => {
                    self.parent.insert(parent.to_string(), vec![idx]);
                }
            }
        }
        self.list.push(record);
    }

    /// Returns the number of [`Transcript`]s in the object
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns true if the object contains no transcripts.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns a vector of [`Transcript`]s
    pub fn as_vec(&self) -> &Vec<Transcript> {
        &self.list
    }

    /// Consumes and returns a vector of [`Transcript`]s
    pub fn to_vec(self) -> Vec<Transcript> {
        self.list
    }
}

impl Default for Transcripts {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for Transcripts {
    type Item = Transcript;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}
