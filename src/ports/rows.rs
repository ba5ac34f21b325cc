//! Row source port supplying the three flat collections.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use crate::graph::Rows;

/// Boxed future type alias used by [`RowSource`] to keep the trait dyn-compatible.
pub type RowsFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Rows, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Fetches a consistent snapshot of nodes, links, and index entries.
///
/// Callers must make sure nothing mutates the store between the fetch and
/// the check; implementations take no locks.
pub trait RowSource: Send + Sync {
    /// Fetches every row of the three tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or returns malformed rows.
    fn fetch_all(&self) -> RowsFuture<'_>;
}
