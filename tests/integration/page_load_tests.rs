//! Page load tracking against a simulated browser host

use restrack::{
    create_monitor, BrowserHost, Environment, LoadListener, MemorySink, Monitor, MonitorOptions,
    ReadyState, RestrackError, SimulatedBrowser, PAGE_LOAD_LABEL,
};
use std::sync::Arc;
use std::time::Duration;

const FIFTY_MB: u64 = 50 * 1024 * 1024;

fn browser_monitor(label: Option<&str>, host: Arc<SimulatedBrowser>) -> Monitor {
    let mut builder = Monitor::builder().browser(host).silent(true);
    if let Some(label) = label {
        builder = builder.label(label);
    }
    builder.build().unwrap()
}

#[tokio::test]
async fn test_completed_page_resolves_immediately() {
    let host = Arc::new(
        SimulatedBrowser::new()
            .with_heap_bytes(FIFTY_MB)
            .with_ready_state(ReadyState::Complete)
            .with_now_ms(812.5),
    );
    let monitor = browser_monitor(Some("pageLoadTest"), host.clone());

    let stats = monitor.track_page_load().await.unwrap();

    assert!((stats.memory_mb.unwrap() - 50.0).abs() < 0.5);
    assert_eq!(stats.label.as_deref(), Some("pageLoadTest"));
    // measured from the page's time origin, not from monitor creation
    assert_eq!(stats.duration_ms, Some(812.5));
    assert!(stats.cpu_percent.is_none());
    assert_eq!(host.pending_listeners(), 0);
    assert_eq!(monitor.history(), vec![stats]);
}

#[tokio::test]
async fn test_pending_page_waits_for_load_event() {
    let host = Arc::new(SimulatedBrowser::new().with_now_ms(100.0));
    let monitor = browser_monitor(None, host.clone());

    let loader = {
        let host = host.clone();
        async move {
            while host.pending_listeners() == 0 {
                tokio::task::yield_now().await;
            }
            // nothing is recorded while the listener is registered
            host.advance(250.0);
            host.complete_load();
        }
    };

    let (stats, ()) = tokio::join!(monitor.track_page_load(), loader);
    let stats = stats.unwrap();

    assert_eq!(stats.duration_ms, Some(350.0));
    assert_eq!(stats.label.as_deref(), Some(PAGE_LOAD_LABEL));
    assert!(stats.memory_mb.is_none());
    assert_eq!(monitor.history().len(), 1);
}

#[tokio::test]
async fn test_nothing_recorded_before_load_fires() {
    let host = Arc::new(SimulatedBrowser::new());
    let monitor = browser_monitor(Some("waiting"), host.clone());

    let pending = tokio::time::timeout(Duration::from_millis(20), monitor.track_page_load()).await;

    assert!(pending.is_err(), "load never fired, measurement must still be pending");
    assert!(monitor.history().is_empty());
}

#[tokio::test]
async fn test_page_load_outside_browser_fails() {
    let monitor = create_monitor(Some("node"), MonitorOptions::silent()).unwrap();

    let err = monitor.track_page_load().await.unwrap_err();

    assert!(matches!(
        err,
        RestrackError::UnsupportedEnvironment(Environment::ProcessRuntime)
    ));
    assert!(monitor.history().is_empty());
}

struct ForgetfulHost;

impl BrowserHost for ForgetfulHost {
    fn now_ms(&self) -> f64 {
        0.0
    }

    fn used_heap_bytes(&self) -> Option<u64> {
        None
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::Interactive
    }

    fn on_load(&self, listener: LoadListener) {
        drop(listener);
    }
}

#[tokio::test]
async fn test_dropped_listener_fails_page_load() {
    let monitor = Monitor::builder()
        .browser(Arc::new(ForgetfulHost))
        .silent(true)
        .build()
        .unwrap();

    let err = monitor.track_page_load().await.unwrap_err();
    assert!(matches!(err, RestrackError::LoadListenerDropped));
    assert!(monitor.history().is_empty());
}

#[tokio::test]
async fn test_browser_snapshot_and_track() {
    let host = Arc::new(
        SimulatedBrowser::new()
            .with_now_ms(1_000.0)
            .with_heap_bytes(FIFTY_MB),
    );
    let sink = Arc::new(MemorySink::new());
    let monitor = Monitor::builder()
        .label("spa")
        .browser(host.clone())
        .sink(sink.clone())
        .build()
        .unwrap();

    host.advance(30.0);
    let snapshot = monitor.snapshot().await;
    assert_eq!(snapshot.duration_ms, Some(30.0));
    assert!((snapshot.memory_mb.unwrap() - 50.0).abs() < f64::EPSILON);
    assert!(snapshot.cpu_percent.is_none());

    host.set_heap_bytes(None);
    let tracked = monitor.track_sync(|| host.advance(5.0), Some("render")).await;
    assert_eq!(tracked.stats.duration_ms, Some(5.0));
    assert!(tracked.stats.memory_mb.is_none());

    assert_eq!(sink.lines()[0], "Initialized (spa) in Browser");
    assert_eq!(monitor.environment(), Environment::Browser);
}
