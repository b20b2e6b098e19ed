//! # Merge Scan
//!
//! Combines several independently sorted row scanners into one key-ordered
//! row scanner, without materializing the result.
//!
//! ## Core idea
//! Every source (column file, overlapping write batch, another merge) is a
//! [`Scanner`] over keys whose values are scanners over that row's fields.
//! [`MergeScanner`] keeps a min-heap of sources ordered by their current key
//! and registration order. Each step pops every source sitting on the smallest
//! key, folds their rows together (first registered source wins per field),
//! and exposes the result as a fresh [`MergedRow`]. The merge is itself a row
//! scanner, so merges nest.
//!
//! ```
//! use merge_scan::{MemScanner, MergeScanner, Scanner};
//!
//! let newer = MemScanner::from_sorted(vec![
//!     (1, MemScanner::from_unsorted(vec![("a", 1)])),
//! ])?;
//! let older = MemScanner::from_sorted(vec![
//!     (1, MemScanner::from_unsorted(vec![("a", 99), ("b", 10)])),
//! ])?;
//!
//! let mut merge = MergeScanner::new(vec![newer, older])?;
//! assert!(merge.iterate()?);
//! assert_eq!(*merge.key()?, 1);
//! assert_eq!(merge.value()?.len(), 2);
//! assert!(!merge.iterate()?);
//! merge.close()?;
//! # Ok::<(), merge_scan::Error>(())
//! ```

pub mod error;
mod logging;
pub mod options;
pub mod scanner;

// Public re-exports for the top-level API
pub use error::{Error, ErrorCollector, Result};
pub use options::{ClosePolicy, MergeOptions};
pub use scanner::{MemScanner, MergeScanner, MergeStats, MergedRow, Scanner, close_all};
