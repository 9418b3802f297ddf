//! Document batching.
//!
//! [`split`] partitions an ordered document set into contiguous batches of
//! at most `max_size` documents each. Batches preserve input order, carry
//! their position in the split, and concatenating them reproduces the input
//! exactly.

use crate::{Error, Result};

/// An ordered, contiguous, non-empty group of documents submitted together
/// as one classification request.
///
/// Batches are created once by [`split`] and read-only thereafter. `index`
/// is the batch's position in the split, used to attribute outcomes back to
/// their originating batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    index: usize,
    documents: Vec<String>,
}

impl Batch {
    /// Position of this batch in the split sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The documents in this batch, in input order.
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Number of documents in this batch.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Split `documents` into batches of at most `max_size` documents.
///
/// Walks the input once: every batch except possibly the last has exactly
/// `max_size` documents, the last holds the remainder. An empty input
/// produces an empty sequence. `max_size` must be at least 1; zero is
/// rejected before any batching happens.
pub fn split(documents: Vec<String>, max_size: usize) -> Result<Vec<Batch>> {
    if max_size == 0 {
        return Err(Error::configuration("batch size must be at least 1"));
    }

    let mut batches = Vec::with_capacity(documents.len().div_ceil(max_size));
    let mut current = Vec::with_capacity(max_size.min(documents.len()));

    for document in documents {
        current.push(document);
        if current.len() == max_size {
            batches.push(Batch {
                index: batches.len(),
                documents: std::mem::replace(&mut current, Vec::with_capacity(max_size)),
            });
        }
    }
    if !current.is_empty() {
        batches.push(Batch {
            index: batches.len(),
            documents: current,
        });
    }

    Ok(batches)
}
