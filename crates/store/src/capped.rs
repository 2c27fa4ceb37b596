//! Capped log - ordered record list holding the most recent N entries

use std::collections::VecDeque;

use crate::error::{StoreError, StoreResult};
use crate::repository::Record;

/// Records retained per kind unless configured otherwise
pub const DEFAULT_RETENTION: usize = 100;

/// Append-ordered list that silently drops its oldest entry past `cap`
#[derive(Debug, Clone)]
pub struct CappedLog<T> {
    entries: VecDeque<T>,
    cap: usize,
}

impl<T: Record> Default for CappedLog<T> {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl<T: Record> CappedLog<T> {
    /// Create an empty log; a cap of zero is treated as one
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Append a record, returning the evicted one if the cap was exceeded
    pub fn push(&mut self, record: T) -> Option<T> {
        self.entries.push_back(record);
        if self.entries.len() > self.cap {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Last `limit` records (all when `None`), oldest first
    pub fn recent(&self, limit: Option<usize>) -> Vec<T> {
        let skip = limit.map_or(0, |n| self.entries.len().saturating_sub(n));
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// Find a record by ID
    pub fn find(&self, id: &str) -> Option<&T> {
        self.entries.iter().find(|r| r.id() == id)
    }

    /// Replace the record with the same ID in place
    pub fn replace(&mut self, record: T) -> StoreResult<()> {
        match self.entries.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::not_found(T::KIND, record.id())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}
