//! Run an async action over items strictly one after another.
//!
//! None of these helpers spawn tasks; each item's future is awaited to
//! completion before the next one is created, so they work on any executor.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

/// How a cancellable sequence ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    /// Every item was processed.
    Completed,
    /// The cancel flag was observed before item `processed` started.
    Cancelled { processed: usize },
}

/// Invoke `action` for each item in order, awaiting each call.
///
/// Stops at the first error and returns it unchanged; later items are never
/// attempted.
pub async fn for_each_sequential<I, E, F, Fut>(items: I, mut action: F) -> Result<(), E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    for item in items {
        action(item).await?;
    }
    Ok(())
}

/// Sequential like [`for_each_sequential`], but keeps going after failures.
///
/// Returns every failure together with the index of the item that caused it,
/// in input order. An empty vector means all items succeeded.
pub async fn for_each_best_effort<I, E, F, Fut>(items: I, mut action: F) -> Vec<(usize, E)>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut failures = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        if let Err(err) = action(item).await {
            warn!(index, "sequenced action failed, continuing");
            failures.push((index, err));
        }
    }
    failures
}

/// [`for_each_sequential`] with a cancel flag checked before each item.
///
/// An item that already started always runs to completion. Errors still stop
/// the sequence immediately.
pub async fn for_each_sequential_until<I, E, F, Fut>(
    items: I,
    cancel: &AtomicBool,
    mut action: F,
) -> Result<SequenceOutcome, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    for (index, item) in items.into_iter().enumerate() {
        if cancel.load(Ordering::Acquire) {
            debug!(processed = index, "sequence cancelled");
            return Ok(SequenceOutcome::Cancelled { processed: index });
        }
        action(item).await?;
    }
    Ok(SequenceOutcome::Completed)
}
