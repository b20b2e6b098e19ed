use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

use crate::error::{Error, ErrorCollector, Result};
use crate::logging::scan_log;
use crate::options::{ClosePolicy, MergeOptions};
use crate::scanner::row::MergedRow;
use crate::scanner::{Scanner, close_into};

type FieldOf<S> = <<S as Scanner>::Value as Scanner>::Key;
type ValueOf<S> = <<S as Scanner>::Value as Scanner>::Value;

/// Counters describing the work a merge scanner has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Successful `iterate()` calls.
    pub keys_emitted: u64,
    /// Child rows drained into merged rows.
    pub rows_drained: u64,
    /// Fields dropped because a higher-priority child already set them.
    pub fields_shadowed: u64,
    /// Children that ran out of entries after construction.
    pub children_retired: u64,
}

/// Merges several sorted row scanners into one key-ordered row scanner.
///
/// Each child yields keys in non-decreasing order; each key maps to a nested
/// scanner over that row's fields. For every distinct key the merge gathers
/// the rows of all children positioned on it and reconciles them field by
/// field. The first child (in the order given to the constructor) that sets a
/// field wins.
///
/// ```text
/// child 0:  1 → {a:1}         2 → {a:2}
/// child 1:  1 → {b:10}        2 → {a:99, b:20}
/// merged:   1 → {a:1, b:10}   2 → {a:2, b:20}
/// ```
///
/// The frontier is a min-heap over (current key, registration sequence).
/// Sequence numbers are handed out once at construction, so ties between
/// children always pop in registration order regardless of heap internals.
///
/// The merge owns its children and is responsible for closing them. Callers
/// must call `close()` when done, even after an error.
pub struct MergeScanner<S>
where
    S: Scanner,
    S::Value: Scanner,
{
    frontier: BinaryHeap<Reverse<FrontierEntry<S>>>,
    /// Children exhausted mid-merge, waiting for `close()`.
    retired: Vec<S>,
    current: Option<(S::Key, MergedRow<FieldOf<S>, ValueOf<S>>)>,
    options: MergeOptions,
    stats: MergeStats,
}

impl<S> MergeScanner<S>
where
    S: Scanner,
    S::Key: Ord + Clone,
    S::Value: Scanner,
    FieldOf<S>: Hash + Eq + Clone,
    ValueOf<S>: Clone,
{
    /// Create a merge over `children` with default options.
    /// Earlier children take precedence when they set the same field.
    pub fn new<I>(children: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
    {
        Self::with_options(children, MergeOptions::default())
    }

    /// Create a merge over `children`.
    ///
    /// Every child is advanced once. Children that are already exhausted are
    /// closed on the spot. Failures do not stop the loop: every child is
    /// primed or closed, and if anything failed the primed children are closed
    /// too before the first failure is returned with the rest suppressed.
    pub fn with_options<I>(children: I, options: MergeOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
    {
        let mut frontier = BinaryHeap::new();
        let mut errors = ErrorCollector::new();
        let mut seq = 0u64;
        let mut closed = 0usize;

        for mut child in children {
            match prime(&mut child) {
                Ok(Some(key)) => {
                    frontier.push(Reverse(FrontierEntry { key, seq, child }));
                    seq += 1;
                }
                Ok(None) => {
                    errors.record(child.close());
                    closed += 1;
                }
                Err(e) => {
                    errors.push(e);
                    errors.record(child.close());
                    closed += 1;
                }
            }
        }

        if !errors.is_empty() {
            let released = close_into(frontier.drain().map(|Reverse(e)| e.child), &mut errors);
            scan_log!(
                log::Level::Warn,
                "merge_prime_failed",
                "errors={} released={}",
                errors.len(),
                released
            );
        }
        errors.finish()?;

        scan_log!(
            log::Level::Debug,
            "merge_primed",
            "live={} closed={}",
            frontier.len(),
            closed
        );

        Ok(MergeScanner {
            frontier,
            retired: Vec::new(),
            current: None,
            options,
            stats: MergeStats::default(),
        })
    }

    /// Counters for the work done so far.
    pub fn stats(&self) -> MergeStats {
        self.stats
    }

    /// Children still holding entries.
    pub fn live_children(&self) -> usize {
        self.frontier.len()
    }

    /// Exhausted children that `close()` will release.
    pub fn pending_close(&self) -> usize {
        self.retired.len()
    }

    /// Drain the current row of a popped child into `row`, advance it, and
    /// put it back in the frontier or retire it.
    ///
    /// On failure the child is parked in `retired` so `close()` still reaches it.
    fn merge_child(
        &mut self,
        mut entry: FrontierEntry<S>,
        row: &mut HashMap<FieldOf<S>, ValueOf<S>>,
    ) -> Result<()> {
        if let Err(e) = drain_row(&mut entry.child, row, &mut self.stats) {
            self.retired.push(entry.child);
            return Err(e);
        }

        match prime(&mut entry.child) {
            Ok(Some(key)) if key < entry.key => {
                self.retired.push(entry.child);
                Err(Error::Corruption(format!(
                    "child scanner {} moved to a smaller key",
                    entry.seq
                )))
            }
            Ok(Some(key)) => {
                entry.key = key;
                self.frontier.push(Reverse(entry));
                Ok(())
            }
            Ok(None) => self.retire(entry),
            Err(e) => {
                self.retired.push(entry.child);
                Err(e)
            }
        }
    }

    fn retire(&mut self, entry: FrontierEntry<S>) -> Result<()> {
        self.stats.children_retired += 1;
        scan_log!(
            log::Level::Trace,
            "merge_child_exhausted",
            "seq={} policy={:?}",
            entry.seq,
            self.options.close_policy
        );
        match self.options.close_policy {
            ClosePolicy::Deferred => {
                self.retired.push(entry.child);
                Ok(())
            }
            ClosePolicy::Eager => {
                let mut child = entry.child;
                child.close()
            }
        }
    }
}

impl<S> Scanner for MergeScanner<S>
where
    S: Scanner,
    S::Key: Ord + Clone,
    S::Value: Scanner,
    FieldOf<S>: Hash + Eq + Clone,
    ValueOf<S>: Clone,
{
    type Key = S::Key;
    type Value = MergedRow<FieldOf<S>, ValueOf<S>>;

    fn key(&self) -> Result<&Self::Key> {
        self.current.as_ref().map(|(k, _)| k).ok_or(Error::NoSuchElement)
    }

    fn value(&self) -> Result<&Self::Value> {
        self.current.as_ref().map(|(_, r)| r).ok_or(Error::NoSuchElement)
    }

    fn value_mut(&mut self) -> Result<&mut Self::Value> {
        self.current.as_mut().map(|(_, r)| r).ok_or(Error::NoSuchElement)
    }

    /// Advance to the next distinct key.
    ///
    /// Algorithm:
    ///   1. Empty frontier → exhausted
    ///   2. Target = smallest key in the frontier
    ///   3. Pop every child positioned on the target, in registration order;
    ///      copy each of its fields into the row unless already present
    ///   4. Advance each popped child; re-insert it or retire it
    ///
    /// A child failure aborts the call and leaves no current element.
    fn iterate(&mut self) -> Result<bool> {
        self.current = None;

        let target = match self.frontier.peek() {
            Some(Reverse(head)) => head.key.clone(),
            None => return Ok(false),
        };

        let mut row = HashMap::with_capacity(self.options.row_capacity);
        while self.frontier.peek().is_some_and(|head| head.0.key == target) {
            let Some(Reverse(entry)) = self.frontier.pop() else {
                break;
            };
            self.merge_child(entry, &mut row)?;
        }

        self.stats.keys_emitted += 1;
        self.current = Some((target, MergedRow::from(row)));
        Ok(true)
    }

    /// Close every child the merge still owns: those in the frontier and
    /// those retired during iteration. All are attempted even if some fail.
    fn close(&mut self) -> Result<()> {
        self.current = None;

        let mut errors = ErrorCollector::new();
        let live = close_into(self.frontier.drain().map(|Reverse(e)| e.child), &mut errors);
        let retired = close_into(self.retired.drain(..), &mut errors);

        if errors.is_empty() {
            scan_log!(
                log::Level::Debug,
                "merge_closed",
                "live={} retired={}",
                live,
                retired
            );
        } else {
            scan_log!(
                log::Level::Warn,
                "merge_close_failed",
                "errors={} live={} retired={}",
                errors.len(),
                live,
                retired
            );
        }
        errors.finish()
    }
}

/// Advance `child` once and return its new key, or `None` if exhausted.
fn prime<S>(child: &mut S) -> Result<Option<S::Key>>
where
    S: Scanner,
    S::Key: Clone,
{
    if child.iterate()? {
        Ok(Some(child.key()?.clone()))
    } else {
        Ok(None)
    }
}

/// Copy every field of `child`'s current row into `row`, first writer wins.
fn drain_row<S>(
    child: &mut S,
    row: &mut HashMap<FieldOf<S>, ValueOf<S>>,
    stats: &mut MergeStats,
) -> Result<()>
where
    S: Scanner,
    S::Value: Scanner,
    FieldOf<S>: Hash + Eq + Clone,
    ValueOf<S>: Clone,
{
    let fields = child.value_mut()?;
    while fields.iterate()? {
        let field = fields.key()?;
        if row.contains_key(field) {
            stats.fields_shadowed += 1;
            continue;
        }
        let field = field.clone();
        let value = fields.value()?.clone();
        row.insert(field, value);
    }
    stats.rows_drained += 1;
    Ok(())
}

/// A primed child in the frontier, with its current key cached so heap
/// comparisons cannot fail.
struct FrontierEntry<S: Scanner> {
    key: S::Key,
    seq: u64,
    child: S,
}

impl<S> Ord for FrontierEntry<S>
where
    S: Scanner,
    S::Key: Ord,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key).then(self.seq.cmp(&other.seq))
    }
}

impl<S> PartialOrd for FrontierEntry<S>
where
    S: Scanner,
    S::Key: Ord,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> PartialEq for FrontierEntry<S>
where
    S: Scanner,
    S::Key: Ord,
{
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for FrontierEntry<S>
where
    S: Scanner,
    S::Key: Ord,
{
}
