//! Monitoring Session
//!
//! `MonitorSession` owns every piece of per-session state (blink log,
//! calibration, fatigue smoothing, cooldowns, countdown, history) and
//! drives the full pipeline for each frame:
//! blink -> distance -> dilation -> fatigue -> alert rules.
//!
//! State is created at `start` and discarded at `stop`, so nothing leaks
//! into a later session. All methods take `&mut self`; concurrency is the
//! runner's problem (one mutex, see `runner`).

pub mod runner;

pub use runner::SessionRunner;

use std::collections::VecDeque;
use std::sync::Arc;

use alerting::{AlertConfig, AlertCoordinator, AlertEvent, VoiceDispatcher, VoiceSink};
use eye_metrics::{
    blink, dilation, head_tilt_degrees, BlinkDetector, DilationEstimator, DistanceEstimator,
    FatigueInputs, FatigueScorer, MetricsConfig, MetricsError, MetricsSnapshot,
};
use landmark_feed::{mesh, LandmarkFrame, VideoFrame};
use tracing::{debug, info};

/// Snapshots retained for the advice provider
const HISTORY_CAP: usize = 200;

const IDLE_ADVICE: &str = "Start monitoring to receive eye health advice.";

/// One monitoring session's pipeline and state.
pub struct MonitorSession {
    config: MetricsConfig,
    blink: BlinkDetector,
    distance: DistanceEstimator,
    dilation: DilationEstimator,
    fatigue: FatigueScorer,
    coordinator: AlertCoordinator,
    snapshot: MetricsSnapshot,
    history: VecDeque<MetricsSnapshot>,
    advice_text: String,
    /// Most recent valid inter-pupil pixel distance, for calibration
    last_ipd_px: Option<f32>,
    elapsed_seconds: u64,
    running: bool,
}

impl MonitorSession {
    pub fn new(
        metrics: MetricsConfig,
        alerts: AlertConfig,
        voice_sink: Arc<dyn VoiceSink>,
    ) -> Self {
        Self {
            blink: BlinkDetector::new(&metrics),
            distance: DistanceEstimator::new(&metrics),
            dilation: DilationEstimator::new(&metrics),
            fatigue: FatigueScorer::new(&metrics),
            coordinator: AlertCoordinator::new(alerts, voice_sink),
            config: metrics,
            snapshot: MetricsSnapshot::default(),
            history: VecDeque::with_capacity(HISTORY_CAP),
            advice_text: IDLE_ADVICE.to_string(),
            last_ipd_px: None,
            elapsed_seconds: 0,
            running: false,
        }
    }

    /// Begin monitoring. Any residue from a previous session is discarded.
    pub fn start(&mut self, now_ms: u64) {
        self.reset();
        self.running = true;
        info!(now_ms, "monitoring session started");
    }

    /// Stop monitoring and synchronously clear all session state,
    /// cancelling any in-flight voice utterance.
    pub fn stop(&mut self) {
        self.reset();
        info!("monitoring session stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Process one frame from the landmark provider.
    ///
    /// `frame` is `None` when no face was detected: prior metrics are
    /// held, the snapshot is marked not-detected, and no rules run.
    /// Returns any alert events fired by threshold rules.
    pub fn process_frame(
        &mut self,
        frame: Option<&LandmarkFrame>,
        video: Option<&VideoFrame>,
    ) -> Vec<AlertEvent> {
        if !self.running {
            return Vec::new();
        }

        let Some(frame) = frame else {
            self.snapshot.face_detected = false;
            return Vec::new();
        };
        let now_ms = frame.timestamp_ms;

        let ear = (blink::eye_aspect_ratio(frame.eye_contour(&mesh::LEFT_EYE))
            + blink::eye_aspect_ratio(frame.eye_contour(&mesh::RIGHT_EYE)))
            / 2.0;
        let blink_rate = self.blink.update(ear, now_ms);

        let ipd_px = frame.pixel_distance(mesh::LEFT_IRIS_CENTER, mesh::RIGHT_IRIS_CENTER);
        if let Some(ipd) = ipd_px {
            if ipd >= self.config.min_ipd_px {
                self.last_ipd_px = Some(ipd);
            }
        }
        let distance_cm = self.distance.estimate(ipd_px.unwrap_or(0.0));

        let brightness = video.map(VideoFrame::ambient_brightness).unwrap_or(0.5);

        // Hold the previous dilation/tilt values when geometry is absent
        let dilation = match dilation::iris_geometry(frame) {
            Some(geometry) => self.dilation.estimate(geometry, brightness),
            None => self.snapshot.dilation,
        };
        let tilt_degrees = head_tilt_degrees(frame).unwrap_or(self.snapshot.tilt_degrees);

        let fatigue = self.fatigue.update(&FatigueInputs {
            blink_rate,
            distance_cm,
            tilt_degrees,
            dilation,
            session_seconds: self.elapsed_seconds,
        });

        self.snapshot = MetricsSnapshot {
            face_detected: true,
            ear,
            blink_rate,
            distance_cm,
            dilation,
            tilt_degrees,
            brightness,
            fatigue,
            session_seconds: self.elapsed_seconds,
        };

        if self.history.len() >= HISTORY_CAP {
            self.history.pop_front();
        }
        self.history.push_back(self.snapshot.clone());

        self.coordinator.evaluate_frame(&self.snapshot, now_ms)
    }

    /// Advance session time by one second and run periodic rules.
    pub fn tick(&mut self, now_ms: u64) -> Vec<AlertEvent> {
        if !self.running {
            return Vec::new();
        }

        self.elapsed_seconds += 1;
        self.snapshot.session_seconds = self.elapsed_seconds;
        self.coordinator.tick(self.elapsed_seconds, now_ms)
    }

    /// Calibrate the distance estimator against the most recent valid
    /// inter-pupil sample, assumed taken at the configured reference
    /// distance. Fails without state change when no sample exists.
    pub fn calibrate(&mut self) -> Result<f32, MetricsError> {
        let ipd_px = self.last_ipd_px.ok_or(MetricsError::NoCalibrationSample)?;
        self.distance
            .calibrate(ipd_px, self.config.calibration_distance_cm)
    }

    pub fn is_calibrated(&self) -> bool {
        self.distance.is_calibrated()
    }

    /// Latest metrics snapshot
    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    /// Recent snapshots, oldest first
    pub fn history(&self) -> &VecDeque<MetricsSnapshot> {
        &self.history
    }

    pub fn advice(&self) -> &str {
        &self.advice_text
    }

    pub fn set_advice(&mut self, text: String) {
        debug!("advice updated");
        self.advice_text = text;
    }

    /// Seconds remaining in an active break countdown
    pub fn break_remaining(&self) -> Option<u32> {
        self.coordinator.break_remaining()
    }

    /// Voice channel controls (enable/disable, speaking indicator)
    pub fn voice(&mut self) -> &mut VoiceDispatcher {
        self.coordinator.voice()
    }

    /// Toast queue access for the presentation layer
    pub fn coordinator(&mut self) -> &mut AlertCoordinator {
        &mut self.coordinator
    }

    fn reset(&mut self) {
        self.blink.reset();
        self.distance.reset();
        self.fatigue.reset();
        self.coordinator.reset();
        self.snapshot = MetricsSnapshot::default();
        self.history.clear();
        self.advice_text = IDLE_ADVICE.to_string();
        self.last_ipd_px = None;
        self.elapsed_seconds = 0;
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerting::{AlertCategory, NullVoice};
    use landmark_feed::Point2;

    fn session() -> MonitorSession {
        MonitorSession::new(
            MetricsConfig::default(),
            AlertConfig::default(),
            Arc::new(NullVoice),
        )
    }

    /// A frame with open eyes, upright head, and iris centers `ipd_px`
    /// pixels apart at 640x480.
    fn face_frame(timestamp_ms: u64, ipd_px: f32) -> LandmarkFrame {
        let mut frame = LandmarkFrame::empty(640, 480, timestamp_ms);

        // Open left eye: vertical spans 0.03, horizontal 0.09 -> EAR 0.33
        let eye = |frame: &mut LandmarkFrame, idx: &[usize; 6], x0: f32| {
            frame.set_point(idx[0], Point2::new(x0, 0.40));
            frame.set_point(idx[1], Point2::new(x0 + 0.03, 0.385));
            frame.set_point(idx[2], Point2::new(x0 + 0.06, 0.385));
            frame.set_point(idx[3], Point2::new(x0 + 0.09, 0.40));
            frame.set_point(idx[4], Point2::new(x0 + 0.06, 0.415));
            frame.set_point(idx[5], Point2::new(x0 + 0.03, 0.415));
        };
        eye(&mut frame, &mesh::LEFT_EYE, 0.30);
        eye(&mut frame, &mesh::RIGHT_EYE, 0.55);

        let half = ipd_px / 640.0 / 2.0;
        frame.set_point(mesh::LEFT_IRIS_CENTER, Point2::new(0.5 - half, 0.40));
        frame.set_point(mesh::RIGHT_IRIS_CENTER, Point2::new(0.5 + half, 0.40));

        frame.set_point(mesh::IRIS_RIM_OUTER, Point2::new(0.33, 0.40));
        frame.set_point(mesh::IRIS_RIM_INNER, Point2::new(0.342, 0.40));
        frame.set_point(mesh::UPPER_EYELID, Point2::new(0.336, 0.375));
        frame.set_point(mesh::LOWER_EYELID, Point2::new(0.336, 0.425));

        frame.set_point(mesh::FOREHEAD, Point2::new(0.45, 0.2));
        frame.set_point(mesh::CHIN, Point2::new(0.45, 0.8));

        frame
    }

    /// Same face with both eyes nearly closed.
    fn blink_frame(timestamp_ms: u64) -> LandmarkFrame {
        let mut frame = face_frame(timestamp_ms, 40.0);
        let shut = |frame: &mut LandmarkFrame, idx: &[usize; 6], x0: f32| {
            frame.set_point(idx[1], Point2::new(x0 + 0.03, 0.399));
            frame.set_point(idx[2], Point2::new(x0 + 0.06, 0.399));
            frame.set_point(idx[4], Point2::new(x0 + 0.06, 0.401));
            frame.set_point(idx[5], Point2::new(x0 + 0.03, 0.401));
        };
        shut(&mut frame, &mesh::LEFT_EYE, 0.30);
        shut(&mut frame, &mesh::RIGHT_EYE, 0.55);
        frame
    }

    #[test]
    fn test_frame_at_default_focal_length() {
        let mut sess = session();
        sess.start(0);

        // ipd 40px at the 457px default focal length: ~71.9 cm, optimal
        sess.process_frame(Some(&face_frame(100, 40.0)), None);
        let snap = sess.snapshot();
        assert!(snap.face_detected);
        assert!((snap.distance_cm - 71.98).abs() < 0.1);
        assert!(snap.ear > 0.22);
        assert_eq!(snap.blink_rate, 0);
    }

    #[test]
    fn test_no_too_close_alert_in_optimal_band() {
        let mut sess = session();
        sess.start(0);
        let events = sess.process_frame(Some(&face_frame(100, 40.0)), None);
        assert!(events.is_empty());
    }

    #[test]
    fn test_too_close_frame_fires_danger() {
        let mut sess = session();
        sess.start(0);

        // ipd 90px: (63 * 457) / 90 / 10 ~= 32 cm
        let events = sess.process_frame(Some(&face_frame(100, 90.0)), None);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].category, AlertCategory::Danger);
    }

    #[test]
    fn test_blinks_counted_through_pipeline() {
        let mut sess = session();
        sess.start(0);

        sess.process_frame(Some(&blink_frame(1_000)), None);
        assert_eq!(sess.snapshot().blink_rate, 1);

        // Within debounce: same blink
        sess.process_frame(Some(&blink_frame(1_100)), None);
        assert_eq!(sess.snapshot().blink_rate, 1);

        sess.process_frame(Some(&blink_frame(1_500)), None);
        assert_eq!(sess.snapshot().blink_rate, 2);
    }

    #[test]
    fn test_no_face_holds_metrics() {
        let mut sess = session();
        sess.start(0);

        sess.process_frame(Some(&face_frame(100, 40.0)), None);
        let distance_before = sess.snapshot().distance_cm;
        let fatigue_before = sess.snapshot().fatigue;

        let events = sess.process_frame(None, None);
        assert!(events.is_empty());
        assert!(!sess.snapshot().face_detected);
        assert_eq!(sess.snapshot().distance_cm, distance_before);
        assert_eq!(sess.snapshot().fatigue, fatigue_before);
    }

    #[test]
    fn test_calibration_through_session() {
        let mut sess = session();
        sess.start(0);

        // No frame yet: no sample to calibrate against
        assert!(sess.calibrate().is_err());

        sess.process_frame(Some(&face_frame(100, 48.0)), None);
        sess.calibrate().unwrap();
        assert!(sess.is_calibrated());

        // At the calibrated focal length this ipd now reads as 60 cm
        sess.process_frame(Some(&face_frame(200, 48.0)), None);
        assert!((sess.snapshot().distance_cm - 60.0).abs() < 0.1);
    }

    #[test]
    fn test_tick_accumulates_session_time() {
        let mut sess = session();
        sess.start(0);

        for s in 1..=5u64 {
            sess.tick(s * 1_000);
        }
        assert_eq!(sess.snapshot().session_seconds, 5);
    }

    #[test]
    fn test_break_reminder_at_twenty_minutes() {
        let mut sess = session();
        sess.start(0);

        let mut fired = Vec::new();
        for s in 1..=1_200u64 {
            fired.extend(sess.tick(s * 1_000));
        }
        // 900 s hydration + 1200 s break reminder
        assert_eq!(fired.len(), 2);
        assert_eq!(sess.break_remaining(), Some(20));
    }

    #[test]
    fn test_stop_discards_all_state() {
        let mut sess = session();
        sess.start(0);

        sess.process_frame(Some(&blink_frame(1_000)), None);
        sess.process_frame(Some(&face_frame(1_500, 48.0)), None);
        sess.calibrate().unwrap();
        sess.tick(2_000);
        sess.set_advice("custom".to_string());

        sess.stop();
        assert!(!sess.is_running());
        assert!(!sess.is_calibrated());
        assert!(sess.history().is_empty());
        assert_eq!(sess.advice(), IDLE_ADVICE);

        // A fresh start sees none of the old blink or fatigue state
        sess.start(10_000);
        sess.process_frame(Some(&face_frame(10_100, 40.0)), None);
        assert_eq!(sess.snapshot().blink_rate, 0);
        assert_eq!(sess.snapshot().session_seconds, 0);
    }

    #[test]
    fn test_not_running_ignores_input() {
        let mut sess = session();
        assert!(sess.process_frame(Some(&face_frame(100, 90.0)), None).is_empty());
        assert!(sess.tick(1_000).is_empty());
        assert_eq!(sess.snapshot().session_seconds, 0);
    }

    #[test]
    fn test_history_bounded() {
        let mut sess = session();
        sess.start(0);
        for i in 0..250u64 {
            sess.process_frame(Some(&face_frame(i * 33, 40.0)), None);
        }
        assert_eq!(sess.history().len(), 200);
    }
}
