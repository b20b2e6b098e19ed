use std::io;

use thiserror::Error;

/// Unified error type for the merge scanner and the scanners it consumes.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error from an underlying storage read.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Malformed input, e.g. a scanner whose keys go backwards.
    #[error("Corruption: {0}")]
    Corruption(String),
    /// Failure reported by a storage-layer scanner.
    #[error("Storage error: {0}")]
    Storage(String),
    /// `key()` or `value()` called while the scanner has no current element.
    #[error("No such element: scanner is not positioned")]
    NoSuchElement,
    /// Several independent failures from one bulk operation.
    /// The first is primary; the others are kept so nothing is lost.
    #[error("{primary} ({} suppressed)", .suppressed.len())]
    Suppressed {
        primary: Box<Error>,
        suppressed: Vec<Error>,
    },
}

impl Error {
    /// The error that is reported first. For a plain error, itself.
    pub fn primary(&self) -> &Error {
        match self {
            Error::Suppressed { primary, .. } => primary,
            other => other,
        }
    }

    /// Secondary failures attached to this error. Empty for a plain error.
    pub fn suppressed(&self) -> &[Error] {
        match self {
            Error::Suppressed { suppressed, .. } => suppressed,
            _ => &[],
        }
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Collects failures from a loop over many independent resources.
///
/// Every failure is recorded and the loop keeps going. `finish` then reports
/// the first failure with the rest attached as suppressed causes.
///
/// ```
/// use merge_scan::error::{Error, ErrorCollector};
///
/// let mut errors = ErrorCollector::new();
/// errors.record(Ok(()));
/// errors.record(Err(Error::Storage("a".into())));
/// errors.record(Err(Error::Storage("b".into())));
///
/// let err = errors.finish().unwrap_err();
/// assert!(matches!(err.primary(), Error::Storage(msg) if msg == "a"));
/// assert_eq!(err.suppressed().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ErrorCollector {
    first: Option<Error>,
    rest: Vec<Error>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one operation. `Ok` is ignored.
    pub fn record(&mut self, result: Result<()>) {
        if let Err(e) = result {
            self.push(e);
        }
    }

    /// Record a failure.
    pub fn push(&mut self, err: Error) {
        if self.first.is_none() {
            self.first = Some(err);
        } else {
            self.rest.push(err);
        }
    }

    /// True if no failure has been recorded.
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.first.iter().count() + self.rest.len()
    }

    /// `Ok` if nothing failed. A single failure is returned as is;
    /// more than one is wrapped in [`Error::Suppressed`].
    pub fn finish(self) -> Result<()> {
        match self.first {
            None => Ok(()),
            Some(first) if self.rest.is_empty() => Err(first),
            Some(first) => Err(Error::Suppressed {
                primary: Box::new(first),
                suppressed: self.rest,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collector_is_ok() {
        let errors = ErrorCollector::new();
        assert!(errors.is_empty());
        assert!(errors.finish().is_ok());
    }

    #[test]
    fn test_single_error_is_not_wrapped() {
        let mut errors = ErrorCollector::new();
        errors.push(Error::NoSuchElement);
        assert_eq!(errors.len(), 1);

        let err = errors.finish().unwrap_err();
        assert!(matches!(err, Error::NoSuchElement));
        assert!(err.suppressed().is_empty());
    }

    #[test]
    fn test_display_counts_suppressed() {
        let mut errors = ErrorCollector::new();
        errors.push(Error::Storage("disk gone".into()));
        errors.push(Error::Corruption("bad block".into()));
        errors.push(Error::Storage("again".into()));

        let err = errors.finish().unwrap_err();
        assert_eq!(err.to_string(), "Storage error: disk gone (2 suppressed)");
    }
}
