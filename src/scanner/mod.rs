pub mod memory;
pub mod merge;
pub mod row;

pub use memory::MemScanner;
pub use merge::{MergeScanner, MergeStats};
pub use row::MergedRow;

use crate::error::{ErrorCollector, Result};

/// The central cursor abstraction.
///
/// Every ordered data source (column file, write batch, merged view)
/// implements this trait. A row source is a `Scanner` whose values are
/// themselves scanners over that row's fields, which is what
/// [`MergeScanner`] consumes and produces. That lets merges nest.
///
/// Lifecycle: unpositioned → `iterate()` until it returns `false` → `close()`.
/// `key()`/`value()` fail with [`Error::NoSuchElement`](crate::Error::NoSuchElement)
/// whenever there is no current element.
pub trait Scanner {
    type Key;
    type Value;

    /// Returns the current key.
    fn key(&self) -> Result<&Self::Key>;

    /// Returns the current value.
    fn value(&self) -> Result<&Self::Value>;

    /// Returns the current value mutably. Needed to drain a nested
    /// row scanner in place.
    fn value_mut(&mut self) -> Result<&mut Self::Value>;

    /// Advances to the next entry. Returns `false` once exhausted.
    fn iterate(&mut self) -> Result<bool>;

    /// Releases resources held by this scanner.
    fn close(&mut self) -> Result<()>;
}

impl<S: Scanner + ?Sized> Scanner for Box<S> {
    type Key = S::Key;
    type Value = S::Value;

    fn key(&self) -> Result<&Self::Key> {
        (**self).key()
    }

    fn value(&self) -> Result<&Self::Value> {
        (**self).value()
    }

    fn value_mut(&mut self) -> Result<&mut Self::Value> {
        (**self).value_mut()
    }

    fn iterate(&mut self) -> Result<bool> {
        (**self).iterate()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl<S: Scanner + ?Sized> Scanner for &mut S {
    type Key = S::Key;
    type Value = S::Value;

    fn key(&self) -> Result<&Self::Key> {
        (**self).key()
    }

    fn value(&self) -> Result<&Self::Value> {
        (**self).value()
    }

    fn value_mut(&mut self) -> Result<&mut Self::Value> {
        (**self).value_mut()
    }

    fn iterate(&mut self) -> Result<bool> {
        (**self).iterate()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Close every scanner, even if some fail. The first failure is returned
/// with the rest attached as suppressed causes.
pub fn close_all<S, I>(scanners: I) -> Result<()>
where
    S: Scanner,
    I: IntoIterator<Item = S>,
{
    let mut errors = ErrorCollector::new();
    close_into(scanners, &mut errors);
    errors.finish()
}

/// Close every scanner, recording failures into `errors`.
/// Returns how many scanners were closed.
pub(crate) fn close_into<S, I>(scanners: I, errors: &mut ErrorCollector) -> usize
where
    S: Scanner,
    I: IntoIterator<Item = S>,
{
    let mut count = 0;
    for mut scanner in scanners {
        errors.record(scanner.close());
        count += 1;
    }
    count
}
