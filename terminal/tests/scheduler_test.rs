use common::{ContinuationId, Scheduler};
use std::time::Duration;
use terminal::scheduler::TokioScheduler;
use tokio::runtime::Handle;
use tokio::time::timeout;

#[tokio::test]
async fn test_scheduled_id_is_delivered() {
    let (mut scheduler, mut receiver) = TokioScheduler::new(Handle::current());
    scheduler.schedule(ContinuationId(3), Duration::from_millis(10));

    let id = timeout(Duration::from_secs(2), receiver.recv())
        .await
        .expect("continuation delivered in time");
    assert_eq!(id, Some(ContinuationId(3)));
}

#[tokio::test]
async fn test_cancelled_id_never_fires() {
    let (mut scheduler, mut receiver) = TokioScheduler::new(Handle::current());
    let cancelled = scheduler.schedule(ContinuationId(1), Duration::from_millis(20));
    scheduler.schedule(ContinuationId(2), Duration::from_millis(60));
    scheduler.cancel(cancelled);

    let id = timeout(Duration::from_secs(2), receiver.recv())
        .await
        .expect("continuation delivered in time");
    assert_eq!(id, Some(ContinuationId(2)));
    assert!(receiver.try_recv().is_err());
}

#[tokio::test]
async fn test_delivery_follows_deadline_order() {
    let (mut scheduler, mut receiver) = TokioScheduler::new(Handle::current());
    scheduler.schedule(ContinuationId(1), Duration::from_millis(80));
    scheduler.schedule(ContinuationId(2), Duration::from_millis(10));

    let first = timeout(Duration::from_secs(2), receiver.recv()).await.unwrap();
    let second = timeout(Duration::from_secs(2), receiver.recv()).await.unwrap();
    assert_eq!(first, Some(ContinuationId(2)));
    assert_eq!(second, Some(ContinuationId(1)));
}
