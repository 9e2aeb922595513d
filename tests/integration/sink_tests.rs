//! JSON lines output written to a file

use restrack::{JsonLinesSink, MeasurementRecord, Monitor, Runtime};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Arc;

#[tokio::test]
async fn test_json_lines_sink_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.jsonl");
    let file = File::create(&path).unwrap();

    let monitor = Monitor::builder()
        .label("jsonl")
        .runtime(Runtime::Unknown)
        .sink(Arc::new(JsonLinesSink::new(file)))
        .build()
        .unwrap();

    monitor.snapshot().await;
    monitor.track_sync(|| (), Some("step")).await;

    let reader = BufReader::new(File::open(&path).unwrap());
    let records: Vec<MeasurementRecord> = reader
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
        .collect();

    assert_eq!(records, monitor.history());
    assert_eq!(records[0].label.as_deref(), Some("jsonl"));
    assert_eq!(records[1].label.as_deref(), Some("step"));
}
