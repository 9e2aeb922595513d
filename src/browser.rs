//! Browser host abstraction
//!
//! A browser-like embedding (a wasm bridge, a headless page driver, a test
//! harness) implements [`BrowserHost`] and hands it to the monitor. The monitor
//! only needs a page-relative clock, the heap size reporter, the document ready
//! state and a way to be told once the page has loaded.

use std::sync::Mutex;
use tokio::sync::oneshot;

/// Document ready state as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

/// One-shot listener for the host's load event.
///
/// Firing consumes the listener. Dropping it unfired makes the pending
/// page load measurement fail.
#[derive(Debug)]
pub struct LoadListener {
    tx: oneshot::Sender<()>,
}

impl LoadListener {
    pub(crate) fn new() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Signal that the page finished loading
    pub fn fire(self) {
        // the waiting measurement may have been dropped by its caller
        let _ = self.tx.send(());
    }
}

/// Capabilities of a browser-like host
pub trait BrowserHost: Send + Sync {
    /// Milliseconds since the page's time origin (navigation start)
    fn now_ms(&self) -> f64;

    /// Used JS heap size in bytes, if the host exposes a reporter
    fn used_heap_bytes(&self) -> Option<u64>;

    fn ready_state(&self) -> ReadyState;

    /// Register a listener to fire exactly once when the page has loaded.
    ///
    /// Hosts must fire the listener immediately if loading completed between
    /// the ready state check and registration.
    fn on_load(&self, listener: LoadListener);
}

#[derive(Debug)]
struct PageState {
    now_ms: f64,
    used_heap_bytes: Option<u64>,
    ready_state: ReadyState,
    listeners: Vec<LoadListener>,
}

/// In-process browser host with scripted page state
#[derive(Debug)]
pub struct SimulatedBrowser {
    state: Mutex<PageState>,
}

impl SimulatedBrowser {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PageState {
                now_ms: 0.0,
                used_heap_bytes: None,
                ready_state: ReadyState::Loading,
                listeners: Vec::new(),
            }),
        }
    }

    pub fn with_heap_bytes(self, bytes: u64) -> Self {
        self.lock().used_heap_bytes = Some(bytes);
        self
    }

    pub fn with_ready_state(self, ready_state: ReadyState) -> Self {
        self.lock().ready_state = ready_state;
        self
    }

    pub fn with_now_ms(self, now_ms: f64) -> Self {
        self.lock().now_ms = now_ms;
        self
    }

    pub fn set_heap_bytes(&self, bytes: Option<u64>) {
        self.lock().used_heap_bytes = bytes;
    }

    /// Advance the page clock
    pub fn advance(&self, ms: f64) {
        if ms > 0.0 {
            self.lock().now_ms += ms;
        }
    }

    /// Number of load listeners waiting for the load event
    pub fn pending_listeners(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Mark the document complete and fire every registered listener
    pub fn complete_load(&self) {
        let listeners = {
            let mut state = self.lock();
            state.ready_state = ReadyState::Complete;
            std::mem::take(&mut state.listeners)
        };
        for listener in listeners {
            listener.fire();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SimulatedBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserHost for SimulatedBrowser {
    fn now_ms(&self) -> f64 {
        self.lock().now_ms
    }

    fn used_heap_bytes(&self) -> Option<u64> {
        self.lock().used_heap_bytes
    }

    fn ready_state(&self) -> ReadyState {
        self.lock().ready_state
    }

    fn on_load(&self, listener: LoadListener) {
        let mut state = self.lock();
        if state.ready_state == ReadyState::Complete {
            drop(state);
            listener.fire();
        } else {
            state.listeners.push(listener);
        }
    }
}
