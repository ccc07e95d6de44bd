//! Diagnostics — ships live viewer state to `bezel-telemetry` over UDP.
//!
//! Enabled by the `diagnostics` feature flag. The window owns a
//! [`DiagSender`] and calls [`DiagSender::send`] once per frame; it throttles
//! itself to 10 Hz, serializes a [`DiagSnapshot`] as JSON, and fires it at
//! `127.0.0.1:9100`. Nothing is sent back.
//!
//! [`init_logger`] installs a logger that writes through env_logger as usual
//! and also keeps the most recent records in a ring buffer; each snapshot
//! carries the records captured since the previous one.

use std::collections::VecDeque;
use std::net::UdpSocket;
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::frame::FrameDriver;
use crate::math::TransformParameters;
use crate::time::FrameClock;

/// Where the telemetry TUI listens.
pub const TELEMETRY_ADDR: &str = "127.0.0.1:9100";

const SEND_INTERVAL: Duration = Duration::from_millis(100);
const LOG_CAPACITY: usize = 500;
const LOGS_PER_SNAPSHOT: usize = 50;

// ── Snapshot (wire format) ──────────────────────────────────────────────

/// One telemetry datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagSnapshot {
    pub fps: f32,
    pub delta_ms: f32,
    pub frame_count: u64,
    pub uptime_secs: f32,
    pub model: String,
    pub vertices: usize,
    pub indices: usize,
    pub triangles: usize,
    pub draw_calls: usize,
    pub wireframe: bool,
    pub parameters: TransformParameters,
    pub animation: String,
    pub animation_elapsed: f32,
    pub background: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<LogEntry>,
}

impl DiagSnapshot {
    /// Gather a snapshot from the clock and the frame driver.
    pub fn capture(clock: &FrameClock, driver: &FrameDriver, logs: Vec<LogEntry>) -> Self {
        let scene = driver.scene();
        let stats = driver.last_stats();
        Self {
            fps: clock.fps(),
            delta_ms: clock.delta_secs() * 1000.0,
            frame_count: clock.frame_count(),
            uptime_secs: clock.uptime_secs(),
            model: scene.model.name().to_string(),
            vertices: scene.geometry.vertex_count(),
            indices: scene.geometry.index_count(),
            triangles: scene.geometry.triangle_count(),
            draw_calls: stats.map_or(0, |s| s.draw_calls),
            wireframe: scene.wireframe,
            parameters: scene.parameters,
            animation: scene.animation.state().name().to_string(),
            animation_elapsed: scene.animation.elapsed(),
            background: scene.clear_color.to_hex(),
            logs,
        }
    }
}

/// A captured log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: String,
    pub target: String,
    pub message: String,
    pub timestamp_secs: f32,
}

// ── DiagSender ──────────────────────────────────────────────────────────

/// Owns the outbound UDP socket and the throttle.
pub struct DiagSender {
    socket: UdpSocket,
    last_send: Option<Instant>,
}

impl DiagSender {
    /// Bind an ephemeral local port aimed at [`TELEMETRY_ADDR`].
    pub fn new() -> std::io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0")?;
        socket.connect(TELEMETRY_ADDR)?;
        socket.set_nonblocking(true)?;
        Ok(Self {
            socket,
            last_send: None,
        })
    }

    /// Send a snapshot if at least 100 ms passed since the last one.
    pub fn send(&mut self, clock: &FrameClock, driver: &FrameDriver) {
        let now = Instant::now();
        if !due(self.last_send, now) {
            return;
        }
        self.last_send = Some(now);

        let snapshot = DiagSnapshot::capture(clock, driver, drain_captured_logs(LOGS_PER_SNAPSHOT));

        // Fire-and-forget: nobody listening is normal.
        if let Ok(json) = serde_json::to_vec(&snapshot) {
            let _ = self.socket.send(&json);
        }
    }
}

fn due(last_send: Option<Instant>, now: Instant) -> bool {
    last_send.is_none_or(|last| now.saturating_duration_since(last) >= SEND_INTERVAL)
}

// ── Log capture ─────────────────────────────────────────────────────────

static LOG_RING: Mutex<VecDeque<LogEntry>> = Mutex::new(VecDeque::new());
static LOG_START: OnceLock<Instant> = OnceLock::new();
static DIAG_LOGGER: OnceLock<DiagLogger> = OnceLock::new();

fn capture(entry: LogEntry) {
    if let Ok(mut ring) = LOG_RING.lock() {
        if ring.len() >= LOG_CAPACITY {
            ring.pop_front();
        }
        ring.push_back(entry);
    }
}

/// Remove and return up to `max` of the oldest captured records.
pub fn drain_captured_logs(max: usize) -> Vec<LogEntry> {
    match LOG_RING.lock() {
        Ok(mut ring) => {
            let n = ring.len().min(max);
            ring.drain(..n).collect()
        }
        Err(_) => Vec::new(),
    }
}

/// Captures records into the ring and delegates to env_logger for stderr.
struct DiagLogger {
    inner: env_logger::Logger,
}

impl log::Log for DiagLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata) || metadata.level() <= log::Level::Info
    }

    fn log(&self, record: &log::Record) {
        if self.inner.enabled(record.metadata()) {
            self.inner.log(record);
        }
        if record.level() <= log::Level::Info || self.inner.enabled(record.metadata()) {
            capture(LogEntry {
                level: record.level().to_string(),
                target: record.target().to_string(),
                message: record.args().to_string(),
                timestamp_secs: LOG_START.get().map_or(0.0, |s| s.elapsed().as_secs_f32()),
            });
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the capturing logger. Call before anything logs.
///
/// `RUST_LOG` controls what reaches stderr as usual; `info` and above are
/// always captured for telemetry.
pub fn init_logger() {
    LOG_START.get_or_init(Instant::now);

    let inner = env_logger::Builder::new().parse_default_env().build();
    let max_level = inner.filter();
    let logger = DIAG_LOGGER.get_or_init(|| DiagLogger { inner });

    if log::set_logger(logger).is_err() {
        eprintln!("[bezel] a logger is already set; log capture disabled");
        return;
    }
    log::set_max_level(max_level.max(log::LevelFilter::Info));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationController;
    use crate::frame::Scene;
    use crate::mesh::ModelVariant;
    use crate::preset::ViewPreset;
    use crate::testing::{RecordingBackend, ScriptedInput};

    #[test]
    fn throttle_allows_ten_per_second() {
        let t0 = Instant::now();
        assert!(due(None, t0));
        assert!(!due(Some(t0), t0 + Duration::from_millis(50)));
        assert!(due(Some(t0), t0 + Duration::from_millis(100)));
    }

    #[test]
    fn ring_keeps_newest_entries() {
        let entry = |i: usize| LogEntry {
            level: "INFO".into(),
            target: "ring-test".into(),
            message: i.to_string(),
            timestamp_secs: 0.0,
        };
        for i in 0..LOG_CAPACITY + 5 {
            capture(entry(i));
        }
        let mine: Vec<LogEntry> = drain_captured_logs(usize::MAX)
            .into_iter()
            .filter(|e| e.target == "ring-test")
            .collect();
        assert!(mine.len() <= LOG_CAPACITY);
        assert_eq!(
            mine.last().map(|e| e.message.as_str()),
            Some((LOG_CAPACITY + 4).to_string().as_str())
        );
    }

    #[test]
    fn snapshot_reflects_scene() {
        let mut driver = FrameDriver::new(
            Scene::new(ModelVariant::Simple, AnimationController::default()),
            ViewPreset::default(),
            "unused.json".into(),
        );
        let mut backend = RecordingBackend::new(640, 480);
        let mut input = ScriptedInput {
            wireframe: true,
            ..ScriptedInput::default()
        };
        driver.startup(&mut backend).unwrap();
        driver.run_frame(&mut input, &mut backend, 0.016);

        let snap = DiagSnapshot::capture(&FrameClock::new(), &driver, Vec::new());
        assert_eq!(snap.model, "simple");
        assert_eq!(snap.triangles, snap.indices / 3);
        assert_eq!(snap.draw_calls, snap.triangles);
        assert!(snap.wireframe);
        assert_eq!(snap.animation, "off");
        assert_eq!(snap.background, "#ffffff");

        let json = serde_json::to_string(&snap).unwrap();
        assert!(!json.contains("\"logs\""));
        let back: DiagSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
