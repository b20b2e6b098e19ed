// Shared helpers for the integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use merge_scan::{Error, MemScanner, Result, Scanner};

pub type Row = MemScanner<&'static str, i32>;
pub type Rows = MemScanner<u32, Row>;

/// Build one row from (field, value) pairs.
pub fn row(fields: &[(&'static str, i32)]) -> Row {
    MemScanner::from_unsorted(fields.to_vec())
}

/// Build a row source from (key, fields) pairs. Keys must be sorted.
pub fn rows(entries: &[(u32, &[(&'static str, i32)])]) -> Rows {
    let entries = entries.iter().map(|(k, fields)| (*k, row(fields))).collect();
    MemScanner::from_sorted(entries).unwrap()
}

/// Drain a row scanner into an ordered map.
pub fn drain_row<R>(row: &mut R) -> BTreeMap<&'static str, i32>
where
    R: Scanner<Key = &'static str, Value = i32>,
{
    let mut out = BTreeMap::new();
    while row.iterate().unwrap() {
        out.insert(*row.key().unwrap(), *row.value().unwrap());
    }
    out
}

/// Drain a row source to the end, collecting each key and its fields.
pub fn collect<S>(scanner: &mut S) -> Vec<(u32, BTreeMap<&'static str, i32>)>
where
    S: Scanner<Key = u32>,
    S::Value: Scanner<Key = &'static str, Value = i32>,
{
    let mut out = Vec::new();
    while scanner.iterate().unwrap() {
        let key = *scanner.key().unwrap();
        let fields = drain_row(scanner.value_mut().unwrap());
        out.push((key, fields));
    }
    out
}

/// Shared view of how often a [`Tracked`] scanner was closed.
#[derive(Clone, Default)]
pub struct Probe(Rc<Cell<usize>>);

impl Probe {
    pub fn closes(&self) -> usize {
        self.0.get()
    }
}

/// Wraps a scanner to count closes and inject failures.
pub struct Tracked<S> {
    inner: S,
    probe: Probe,
    fail_close: Option<&'static str>,
    fail_iterate_at: Option<usize>,
    iterations: usize,
}

impl<S: Scanner> Tracked<S> {
    pub fn new(inner: S) -> (Self, Probe) {
        let probe = Probe::default();
        let tracked = Tracked {
            inner,
            probe: probe.clone(),
            fail_close: None,
            fail_iterate_at: None,
            iterations: 0,
        };
        (tracked, probe)
    }

    /// `close()` still closes the inner scanner, then reports `msg`.
    pub fn failing_close(mut self, msg: &'static str) -> Self {
        self.fail_close = Some(msg);
        self
    }

    /// The `n`-th call to `iterate()` (0-based) and every later one fail.
    pub fn failing_iterate_at(mut self, n: usize) -> Self {
        self.fail_iterate_at = Some(n);
        self
    }
}

impl<S: Scanner> Scanner for Tracked<S> {
    type Key = S::Key;
    type Value = S::Value;

    fn key(&self) -> Result<&S::Key> {
        self.inner.key()
    }

    fn value(&self) -> Result<&S::Value> {
        self.inner.value()
    }

    fn value_mut(&mut self) -> Result<&mut S::Value> {
        self.inner.value_mut()
    }

    fn iterate(&mut self) -> Result<bool> {
        if self.fail_iterate_at.is_some_and(|n| self.iterations >= n) {
            return Err(Error::Storage("injected read failure".into()));
        }
        self.iterations += 1;
        self.inner.iterate()
    }

    fn close(&mut self) -> Result<()> {
        self.probe.0.set(self.probe.0.get() + 1);
        self.inner.close()?;
        match self.fail_close {
            Some(msg) => Err(Error::Storage(msg.into())),
            None => Ok(()),
        }
    }
}

/// Replays entries in exactly the given order, with no ordering checks.
/// Models a misbehaving source.
pub struct Scripted<K, V> {
    entries: VecDeque<(K, V)>,
    current: Option<(K, V)>,
}

impl<K, V> Scripted<K, V> {
    pub fn new(entries: Vec<(K, V)>) -> Self {
        Scripted {
            entries: entries.into(),
            current: None,
        }
    }
}

impl<K, V> Scanner for Scripted<K, V> {
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
        self.current = self.entries.pop_front();
        Ok(self.current.is_some())
    }

    fn close(&mut self) -> Result<()> {
        self.entries.clear();
        self.current = None;
        Ok(())
    }
}
