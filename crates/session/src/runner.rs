//! Async session runner
//!
//! Drives a `MonitorSession` with two timers:
//! - a one-second tick for session time and periodic rules
//! - an advice refresh every 12 seconds, run off the frame path
//!
//! The frame callback, tick, and advice application all serialize through
//! one mutex, so no state is mutated concurrently. Voice dispatch inside
//! the coordinator is fire-and-forget and never blocks either path.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use advice::{AdviceProvider, LocalTips};
use alerting::AlertEvent;
use eye_metrics::MetricsSnapshot;
use landmark_feed::{LandmarkFrame, VideoFrame};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::MonitorSession;

/// How often the advice provider is consulted
const ADVICE_INTERVAL: Duration = Duration::from_secs(12);

/// Wall-clock milliseconds since the Unix epoch
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Owns the session mutex and the background timer tasks.
pub struct SessionRunner {
    session: Arc<Mutex<MonitorSession>>,
    provider: Arc<dyn AdviceProvider>,
    fallback: Arc<LocalTips>,
    events_tx: mpsc::UnboundedSender<AlertEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl SessionRunner {
    /// Alert events from both the frame path and the tick path are
    /// forwarded to the returned receiver's sender.
    pub fn new(
        session: MonitorSession,
        provider: Arc<dyn AdviceProvider>,
        events_tx: mpsc::UnboundedSender<AlertEvent>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            provider,
            fallback: Arc::new(LocalTips::new()),
            events_tx,
            tasks: Vec::new(),
        }
    }

    /// Start monitoring and spawn the tick and advice tasks.
    ///
    /// A second call while already running is ignored.
    pub async fn start(&mut self) {
        if !self.tasks.is_empty() {
            return;
        }
        self.session.lock().await.start(now_ms());

        let session = Arc::clone(&self.session);
        let events_tx = self.events_tx.clone();
        let period = Duration::from_secs(1);
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        self.tasks.push(tokio::spawn(async move {
            loop {
                ticker.tick().await;
                let events = session.lock().await.tick(now_ms());
                for event in events {
                    let _ = events_tx.send(event);
                }
            }
        }));

        let session = Arc::clone(&self.session);
        let provider = Arc::clone(&self.provider);
        let fallback = Arc::clone(&self.fallback);
        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + ADVICE_INTERVAL,
            ADVICE_INTERVAL,
        );
        self.tasks.push(tokio::spawn(async move {
            loop {
                ticker.tick().await;
                let snapshot = session.lock().await.snapshot().clone();
                let text = fetch_advice(&provider, &fallback, snapshot.clone()).await;
                session.lock().await.set_advice(text);
            }
        }));
    }

    /// Feed one frame from the landmark provider (or `None` for no face).
    pub async fn on_frame(
        &self,
        frame: Option<&LandmarkFrame>,
        video: Option<&VideoFrame>,
    ) -> Vec<AlertEvent> {
        let events = self.session.lock().await.process_frame(frame, video);
        for event in &events {
            let _ = self.events_tx.send(event.clone());
        }
        events
    }

    /// Calibrate distance against the latest inter-pupil sample.
    pub async fn calibrate(&self) -> Result<f32, eye_metrics::MetricsError> {
        self.session.lock().await.calibrate()
    }

    /// Latest metrics snapshot
    pub async fn snapshot(&self) -> MetricsSnapshot {
        self.session.lock().await.snapshot().clone()
    }

    /// Current advice text
    pub async fn advice(&self) -> String {
        self.session.lock().await.advice().to_string()
    }

    /// Stop monitoring: no timer fires after this returns, and all
    /// session state is cleared.
    pub async fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.session.lock().await.stop();
    }

    /// Shared handle to the underlying session
    pub fn session(&self) -> Arc<Mutex<MonitorSession>> {
        Arc::clone(&self.session)
    }
}

/// Consult the provider off the async runtime; fall back to local tips on
/// any error, panic, or empty response.
async fn fetch_advice(
    provider: &Arc<dyn AdviceProvider>,
    fallback: &Arc<LocalTips>,
    snapshot: MetricsSnapshot,
) -> String {
    let provider = Arc::clone(provider);
    let snap = snapshot.clone();
    let result = tokio::task::spawn_blocking(move || provider.get_advice(&snap)).await;

    match result {
        Ok(Ok(text)) if !text.trim().is_empty() => text,
        Ok(Ok(_)) => {
            debug!("advice provider returned empty text, using local tip");
            fallback.pick(&snapshot).to_string()
        }
        Ok(Err(err)) => {
            warn!(%err, "advice provider failed, using local tip");
            fallback.pick(&snapshot).to_string()
        }
        Err(err) => {
            warn!(%err, "advice task failed, using local tip");
            fallback.pick(&snapshot).to_string()
        }
    }
}
