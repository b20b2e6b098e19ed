use std::collections::HashMap;
use std::collections::hash_map;
use std::hash::Hash;

use crate::error::{Error, Result};
use crate::scanner::Scanner;

/// One-shot cursor over the reconciled fields of a single key.
///
/// Produced fresh by every successful `MergeScanner::iterate()`. Fields come
/// out in the map's own order, which carries no meaning. Not restartable;
/// `close()` is a no-op.
#[derive(Debug)]
pub struct MergedRow<F, V> {
    fields: hash_map::IntoIter<F, V>,
    current: Option<(F, V)>,
    len: usize,
}

impl<F, V> MergedRow<F, V> {
    /// Number of fields in the row, regardless of how many were visited.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<F: Hash + Eq, V> From<HashMap<F, V>> for MergedRow<F, V> {
    fn from(fields: HashMap<F, V>) -> Self {
        MergedRow {
            len: fields.len(),
            fields: fields.into_iter(),
            current: None,
        }
    }
}

impl<F: Hash + Eq, V> FromIterator<(F, V)> for MergedRow<F, V> {
    fn from_iter<I: IntoIterator<Item = (F, V)>>(iter: I) -> Self {
        iter.into_iter().collect::<HashMap<F, V>>().into()
    }
}

impl<F, V> Scanner for MergedRow<F, V> {
    type Key = F;
    type Value = V;

    fn key(&self) -> Result<&F> {
        self.current.as_ref().map(|(f, _)| f).ok_or(Error::NoSuchElement)
    }

    fn value(&self) -> Result<&V> {
        self.current.as_ref().map(|(_, v)| v).ok_or(Error::NoSuchElement)
    }

    fn value_mut(&mut self) -> Result<&mut V> {
        self.current.as_mut().map(|(_, v)| v).ok_or(Error::NoSuchElement)
    }

    fn iterate(&mut self) -> Result<bool> {
        self.current = self.fields.next();
        Ok(self.current.is_some())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visits_every_field_once() {
        let mut row: MergedRow<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(row.len(), 3);

        let mut seen = Vec::new();
        while row.iterate().unwrap() {
            seen.push((*row.key().unwrap(), *row.value().unwrap()));
        }
        seen.sort();
        assert_eq!(seen, vec![("a", 1), ("b", 2), ("c", 3)]);

        // Past the end: no current element, and it stays exhausted.
        assert!(matches!(row.key(), Err(Error::NoSuchElement)));
        assert!(!row.iterate().unwrap());
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_empty_row() {
        let mut row: MergedRow<String, u8> = HashMap::new().into();
        assert!(row.is_empty());
        assert!(!row.iterate().unwrap());
        row.close().unwrap();
    }
}
