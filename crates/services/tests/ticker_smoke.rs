use tokio::time::{Duration, advance};

use services::AttemptTicker;

#[tokio::test(start_paused = true)]
async fn delivers_one_tick_per_period() {
    let (mut ticker, mut ticks) = AttemptTicker::with_period(Duration::from_secs(1));

    for _ in 0..3 {
        advance(Duration::from_secs(1)).await;
        assert!(ticks.recv().await.is_some());
    }

    ticker.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_ends_the_stream_and_is_idempotent() {
    let (mut ticker, mut ticks) = AttemptTicker::with_period(Duration::from_secs(1));

    advance(Duration::from_secs(1)).await;
    assert!(ticks.recv().await.is_some());

    ticker.stop();
    ticker.stop();
    assert!(ticker.is_stopped());

    // Drain anything buffered; the stream must then close for good.
    while ticks.recv().await.is_some() {}
    assert!(ticks.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_ticker_cancels_the_task() {
    let (ticker, mut ticks) = AttemptTicker::with_period(Duration::from_secs(1));
    drop(ticker);

    while ticks.recv().await.is_some() {}
    assert!(ticks.recv().await.is_none());
}
