//! Replay specs
//!
//! Verify that reopening a log reproduces what was written.

use crate::prelude::*;

#[tokio::test]
async fn reopened_log_replays_every_record_in_order() {
    let scratch = Scratch::new();
    let path = scratch.path("users.db");
    let written = vec![
        json!({"type": "new", "userid": 1, "name": "Ada"}),
        json!({"type": "new", "userid": 2, "name": "Grace"}),
        json!({"type": "delete", "userid": 1}),
    ];

    let (log, _events) = Log::open(path.as_path(), quiet()).await.unwrap();
    for record in &written {
        log.add(record.clone()).unwrap();
    }
    log.stop().await.unwrap();

    let published = replay(path.as_path(), quiet()).await;
    let expected: Vec<_> = written
        .into_iter()
        .zip(1..)
        .map(|(value, line)| (Record::from(value), line))
        .collect();
    assert_eq!(records(&published), expected);
    assert!(matches!(published.last(), Some(LogEvent::Loaded { records: 3 })));
}

#[tokio::test]
async fn raw_text_survives_a_round_trip() {
    let scratch = Scratch::new();
    let path = scratch.path("notes.txt");
    let config = quiet().with_raw_mode(true);

    let (log, _events) = Log::open(path.as_path(), config.clone()).await.unwrap();
    log.add("first note").unwrap();
    log.add("second note").unwrap();
    log.stop().await.unwrap();

    let published = replay(path.as_path(), config).await;
    assert_eq!(
        records(&published),
        vec![
            (Record::from("first note"), 1),
            (Record::from("second note"), 2),
        ]
    );
}

#[tokio::test]
async fn corrupt_line_is_skipped_with_its_line_number() {
    let scratch = Scratch::new();
    let path = scratch.path("users.db");
    std::fs::write(&path, "{\"userid\":1}\n{oops\n\n{\"userid\":4}\n").unwrap();

    let published = replay(path.as_path(), quiet()).await;

    assert_eq!(
        records(&published)
            .into_iter()
            .map(|(_, line)| line)
            .collect::<Vec<_>>(),
        vec![1, 4]
    );
    let parse_lines: Vec<u64> = published
        .iter()
        .filter_map(|e| match e {
            LogEvent::Error(LogError::Parse { line, .. }) => Some(*line),
            _ => None,
        })
        .collect();
    assert_eq!(parse_lines, vec![2]);
    assert!(matches!(published.last(), Some(LogEvent::Loaded { records: 2 })));
}

#[tokio::test]
async fn missing_file_loads_empty_without_error() {
    let fake = FakeBacking::at("missing/users.db");
    fake.fail_reads(std::io::ErrorKind::NotFound);

    let (log, mut events) = open_fake(&fake, quiet()).await;
    log.load().await.unwrap();

    let published = drain(&mut events);
    assert!(matches!(published.as_slice(), [LogEvent::Loaded { records: 0 }]));
}

#[tokio::test]
async fn auto_load_publishes_loaded_after_replay() {
    let scratch = Scratch::new();
    let path = scratch.path("auto.db");
    std::fs::write(&path, "{\"n\":1}\n{\"n\":2}\n").unwrap();

    let (log, mut events) = Log::open(path.as_path(), quiet().with_auto_load(true))
        .await
        .unwrap();

    let mut seen = Vec::new();
    let wait = async {
        while let Some(event) = events.recv().await {
            let loaded = matches!(event, LogEvent::Loaded { .. });
            seen.push(event);
            if loaded {
                break;
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait).await.unwrap();

    assert_eq!(records(&seen).len(), 2);
    assert!(matches!(seen.last(), Some(LogEvent::Loaded { records: 2 })));
    assert_eq!(log.add(json!({"n": 3})).unwrap(), 3);
    assert_eq!(log.phase(), Phase::Ready);
}

#[tokio::test]
async fn live_and_replayed_records_compare_equal() {
    let scratch = Scratch::new();
    let path = scratch.path("mixed.db");

    let (log, mut events) = Log::open(path.as_path(), quiet()).await.unwrap();
    log.add("hello").unwrap();
    log.add(json!({"userid": 7, "tags": ["a", "b"]})).unwrap();
    log.add(Record::from(json!(null))).unwrap();
    let live = records(&drain(&mut events));
    log.stop().await.unwrap();

    let replayed = records(&replay(path.as_path(), quiet()).await);
    assert_eq!(live.len(), 3);
    assert_eq!(live, replayed);
}

#[tokio::test]
async fn raw_live_and_replayed_records_compare_equal() {
    let scratch = Scratch::new();
    let path = scratch.path("raw.txt");
    let config = quiet().with_raw_mode(true);

    let (log, mut events) = Log::open(path.as_path(), config.clone()).await.unwrap();
    log.add("  spaced out  ").unwrap();
    log.add(json!({"n": 1})).unwrap();
    let live = records(&drain(&mut events));
    log.stop().await.unwrap();

    assert_eq!(live, records(&replay(path.as_path(), config).await));
}
