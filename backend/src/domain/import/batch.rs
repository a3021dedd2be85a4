//! Bounded-size bulk writes.
//!
//! Inserting tens of thousands of documents in one statement risks exceeding
//! wire and bind-parameter limits, so records are written in consecutive
//! chunks of at most `batch_size`, in input order.

use std::future::Future;
use std::num::NonZeroUsize;

use tracing::debug;

/// Records returned by a batched insert and the number of writes issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome<T> {
    /// Inserted records, in input order.
    pub inserted: Vec<T>,
    /// Number of bulk writes issued: `ceil(N / batch_size)`.
    pub batches: usize,
}

/// Write `records` through `write` in chunks of at most `batch_size`.
///
/// An empty input issues no writes. The first failing write aborts the run;
/// earlier chunks stay written.
pub async fn insert_batched<T, U, E, F, Fut>(
    label: &'static str,
    records: Vec<T>,
    batch_size: NonZeroUsize,
    mut write: F,
) -> Result<BatchOutcome<U>, E>
where
    F: FnMut(Vec<T>) -> Fut,
    Fut: Future<Output = Result<Vec<U>, E>>,
{
    let expected = records.len();
    let mut inserted = Vec::with_capacity(expected);
    let mut batches = 0;
    let mut remaining = records.into_iter().peekable();

    while remaining.peek().is_some() {
        let chunk: Vec<T> = remaining.by_ref().take(batch_size.get()).collect();
        let written = write(chunk).await?;
        batches += 1;
        inserted.extend(written);
        debug!(entity = label, inserted = inserted.len(), expected, "inserted batch");
    }

    Ok(BatchOutcome { inserted, batches })
}
