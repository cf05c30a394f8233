use std::{future::Future, time::Duration};

use futures::Stream;
use tokio::time::{Interval, MissedTickBehavior};

/// Calls `f` immediately and then once per `period`, yielding each result.
///
/// Every tick is independent of the previous ones. Ticks missed while a slow
/// call was in flight are skipped rather than burst. Dropping the stream stops
/// the polling.
pub fn poll_every<F, Fut, T>(period: Duration, f: F) -> impl Stream<Item = T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = T>
{
    futures::stream::unfold((None::<Interval>, f), move |(ticker, mut f)| async move {
        let mut ticker = ticker.unwrap_or_else(|| {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker
        });
        ticker.tick().await;

        let item = f().await;
        Some((item, (Some(ticker), f)))
    })
}
