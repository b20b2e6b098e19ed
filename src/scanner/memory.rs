use std::vec;

use crate::error::{Error, Result};
use crate::scanner::Scanner;

/// A scanner over an owned, sorted vector of entries.
///
/// Backs in-memory write batches. Rows are usually built as
/// `MemScanner<K, MemScanner<F, V>>`: the outer scanner walks keys, each
/// value walks that row's fields.
///
/// Keys must be non-decreasing. `from_sorted` checks this and
/// `from_unsorted` establishes it with a stable sort.
#[derive(Debug)]
pub struct MemScanner<K, V> {
    entries: vec::IntoIter<(K, V)>,
    current: Option<(K, V)>,
    closed: bool,
}

impl<K, V> MemScanner<K, V> {
    /// A scanner with no entries.
    pub fn empty() -> Self {
        MemScanner {
            entries: Vec::new().into_iter(),
            current: None,
            closed: false,
        }
    }

    /// Entries not yet visited, excluding the current one.
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    /// Whether `close()` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<K: Ord, V> MemScanner<K, V> {
    /// Wrap entries that are already in key order.
    ///
    /// Returns `Corruption` if a key is smaller than the one before it.
    pub fn from_sorted(entries: Vec<(K, V)>) -> Result<Self> {
        if let Some(pos) = entries.windows(2).position(|w| w[1].0 < w[0].0) {
            return Err(Error::Corruption(format!(
                "keys out of order at entry {}",
                pos + 1
            )));
        }
        Ok(MemScanner {
            entries: entries.into_iter(),
            current: None,
            closed: false,
        })
    }

    /// Sort entries by key, keeping the input order among equal keys.
    pub fn from_unsorted(mut entries: Vec<(K, V)>) -> Self {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        MemScanner {
            entries: entries.into_iter(),
            current: None,
            closed: false,
        }
    }
}

impl<K, V> Default for MemScanner<K, V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K, V> Scanner for MemScanner<K, V> {
    type Key = K;
    type Value = V;

    fn key(&self) -> Result<&K> {
        self.current.as_ref().map(|(k, _)| k).ok_or(Error::NoSuchElement)
    }

    fn value(&self) -> Result<&V> {
        self.current.as_ref().map(|(_, v)| v).ok_or(Error::NoSuchElement)
    }

    fn value_mut(&mut self) -> Result<&mut V> {
        self.current.as_mut().map(|(_, v)| v).ok_or(Error::NoSuchElement)
    }

    fn iterate(&mut self) -> Result<bool> {
        if self.closed {
            return Ok(false);
        }
        self.current = self.entries.next();
        Ok(self.current.is_some())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.current = None;
        self.entries = Vec::new().into_iter();
        Ok(())
    }
}
