// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{FseqError, Record};

/// Ordered record collection with an explicit, resettable cursor.
///
/// Reads are lazy: [`Dataset::read_at`] may fail for a specific position when
/// the storage layer cannot decode that record. Such failures must be reported
/// as [`FseqError::Corrupted`] carrying the failing position.
pub trait Dataset {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current traversal offset.
    fn position(&self) -> usize;

    fn set_position(&mut self, position: usize);

    fn rewind(&mut self) {
        self.set_position(0);
    }

    /// Loads the record at `position` without moving the cursor.
    fn read_at(&mut self, position: usize) -> Result<Record, FseqError>;

    /// Record identifiers in dataset order.
    fn record_names(&self) -> Vec<String>;

    /// Removes a record by its stable name. Returns false when absent.
    fn remove_named(&mut self, name: &str) -> bool;

    /// Removes the record at `position`, returning its name.
    fn remove_at(&mut self, position: usize) -> Option<String>;

    /// Reference record used to seed schema expectations.
    fn first(&mut self) -> Result<Record, FseqError> {
        if self.is_empty() {
            return Err(FseqError::EmptyDataset);
        }
        self.read_at(0)
    }

    /// Lazy traversal from `from` to the end, advancing the cursor as records
    /// are yielded.
    fn slice(&mut self, from: usize) -> Traversal<'_, Self>
    where
        Self: Sized,
    {
        self.set_position(from);
        Traversal {
            dataset: self,
            failed: false,
        }
    }
}

/// Iterator returned by [`Dataset::slice`].
///
/// After a read failure the cursor stays on the failing position and the
/// traversal yields nothing more.
pub struct Traversal<'a, D: Dataset> {
    dataset: &'a mut D,
    failed: bool,
}

impl<D: Dataset> Iterator for Traversal<'_, D> {
    type Item = Result<Record, FseqError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let position = self.dataset.position();
        if position >= self.dataset.len() {
            return None;
        }

        match self.dataset.read_at(position) {
            Ok(record) => {
                self.dataset.set_position(position + 1);
                Some(Ok(record))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl<D: Dataset> std::iter::FusedIterator for Traversal<'_, D> {}

/// Storage slot of a [`MemoryDataset`].
#[derive(Clone, Debug, PartialEq)]
pub enum RecordSlot {
    Readable(Record),
    /// Placeholder for a record the storage layer cannot decode.
    Unreadable { name: String, reason: String },
}

impl RecordSlot {
    pub fn name(&self) -> &str {
        match self {
            Self::Readable(record) => record.name(),
            Self::Unreadable { name, .. } => name,
        }
    }
}

/// In-memory [`Dataset`] that logs every successful read.
#[derive(Clone, Debug, Default)]
pub struct MemoryDataset {
    slots: Vec<RecordSlot>,
    position: usize,
    read_log: Vec<usize>,
}

impl MemoryDataset {
    pub fn new(slots: Vec<RecordSlot>) -> Self {
        Self {
            slots,
            position: 0,
            read_log: Vec::new(),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        Self::new(records.into_iter().map(RecordSlot::Readable).collect())
    }

    pub fn slots(&self) -> &[RecordSlot] {
        &self.slots
    }

    /// Positions of successful reads, in read order.
    pub fn read_log(&self) -> &[usize] {
        &self.read_log
    }

    pub fn clear_read_log(&mut self) {
        self.read_log.clear();
    }
}

impl Dataset for MemoryDataset {
    fn len(&self) -> usize {
        self.slots.len()
    }

    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    fn read_at(&mut self, position: usize) -> Result<Record, FseqError> {
        let result = match self.slots.get(position) {
            Some(RecordSlot::Readable(record)) => Ok(record.clone()),
            Some(RecordSlot::Unreadable { name, reason }) => {
                Err(FseqError::corrupted(position, name.clone(), reason.clone()))
            }
            None => Err(FseqError::invalid_input(format!(
                "position {position} out of range for dataset of length {}",
                self.slots.len()
            ))),
        };
        if result.is_ok() {
            self.read_log.push(position);
        }
        result
    }

    fn record_names(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|slot| slot.name().to_string())
            .collect()
    }

    fn remove_named(&mut self, name: &str) -> bool {
        match self.slots.iter().position(|slot| slot.name() == name) {
            Some(position) => {
                self.slots.remove(position);
                true
            }
            None => false,
        }
    }

    fn remove_at(&mut self, position: usize) -> Option<String> {
        if position >= self.slots.len() {
            return None;
        }
        Some(self.slots.remove(position).name().to_string())
    }
}
