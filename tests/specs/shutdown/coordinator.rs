//! Shutdown specs
//!
//! Verify idempotent stop and coordinated shutdown of managed logs.

use crate::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, oneshot};

async fn managed(
    coordinator: &ShutdownCoordinator,
    name: &str,
    delay_ms: u64,
) -> (Log, FakeBacking) {
    let fake = FakeBacking::at(name);
    fake.set_append_delay(Duration::from_millis(delay_ms));
    let (log, _events) = coordinator
        .open_with(
            Arc::new(fake.clone()),
            quiet().with_raw_mode(true),
            Arc::new(FakeClock::default()),
        )
        .await
        .unwrap();
    (log, fake)
}

#[tokio::test]
async fn stopping_twice_persists_once() {
    let scratch = Scratch::new();
    let (log, mut events) = Log::open(scratch.path("once.log").as_path(), quiet())
        .await
        .unwrap();
    log.add(json!({"only": true})).unwrap();

    log.stop().await.unwrap();
    log.stop().await.unwrap();

    assert_eq!(scratch.read("once.log"), "{\"only\":true}\n");
    let stopped = drain(&mut events)
        .iter()
        .filter(|e| matches!(e, LogEvent::Stopped))
        .count();
    assert_eq!(stopped, 1);
    assert!(matches!(log.add(json!(1)), Err(LogError::Stopped { .. })));
}

#[tokio::test]
async fn stop_all_completes_after_every_managed_log() {
    let coordinator = ShutdownCoordinator::new();
    let mut logs = Vec::new();
    for (name, delay) in [("a.log", 90), ("b.log", 10), ("c.log", 45)] {
        let (log, fake) = managed(&coordinator, name, delay).await;
        log.add(name).unwrap();
        logs.push((log, fake));
    }

    coordinator.stop_all().await;

    for (log, fake) in &logs {
        assert_eq!(log.phase(), Phase::Stopped);
        assert_eq!(fake.lines(), vec![log.source().to_string()]);
    }
}

#[tokio::test]
async fn termination_completion_fires_exactly_once() {
    let coordinator = ShutdownCoordinator::new();
    let mut logs = Vec::new();
    for (name, delay) in [("a.log", 60), ("b.log", 5), ("c.log", 30)] {
        let (log, _fake) = managed(&coordinator, name, delay).await;
        log.add(name).unwrap();
        logs.push(log);
    }
    let (unmanaged, _events) = Log::open(Target::Sink, quiet().with_unmanaged(true))
        .await
        .unwrap();
    assert_eq!(coordinator.len(), 3);

    let (notify, signals) = mpsc::unbounded_channel();
    let (done_tx, done_rx) = oneshot::channel();
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let logs_at_completion = logs.clone();
    coordinator
        .on_termination(signals, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let all_stopped = logs_at_completion
                .iter()
                .all(|log| log.phase() == Phase::Stopped);
            let _ = done_tx.send(all_stopped);
        })
        .unwrap();

    for _ in 0..3 {
        notify.send(()).unwrap();
    }
    let all_stopped = tokio::time::timeout(Duration::from_secs(5), done_rx)
        .await
        .unwrap()
        .unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(all_stopped);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(logs.iter().all(|log| log.phase() == Phase::Stopped));
    assert!(!unmanaged.is_stopped());
}
