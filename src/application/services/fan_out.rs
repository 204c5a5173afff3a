use std::future::Future;

use futures::StreamExt;
use futures::stream;

/// Runs `task` over `items` with at most `max_in_flight` futures pending.
///
/// Results land in a slot per input index, so the returned vector follows
/// input order no matter which call finishes first.
pub async fn fan_out_ordered<T, R, F, Fut>(items: Vec<T>, max_in_flight: usize, task: F) -> Vec<R>
where
    F: Fn(usize, T) -> Fut,
    Fut: Future<Output = R>,
{
    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(items.len()).collect();

    let mut completions = stream::iter(items.into_iter().enumerate())
        .map(|(index, item)| {
            let pending = task(index, item);
            async move { (index, pending.await) }
        })
        .buffer_unordered(max_in_flight.max(1));

    while let Some((index, result)) = completions.next().await {
        slots[index] = Some(result);
    }

    slots.into_iter().flatten().collect()
}
