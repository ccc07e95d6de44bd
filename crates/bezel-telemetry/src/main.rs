//! bezel-telemetry — live dashboard for a running bezel viewer.
//!
//! Listens on UDP 127.0.0.1:9100 for the JSON snapshots a viewer built with
//! `--features diagnostics` sends ten times a second. One screen shows frame
//! timing, the model and its transform, and the newest log records.
//!
//! Start a viewer, then run `cargo run -p bezel-telemetry`.

use std::collections::VecDeque;
use std::io;
use std::net::UdpSocket;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Sparkline};
use serde::Deserialize;

const LISTEN_ADDR: &str = "127.0.0.1:9100";

/// About two minutes of snapshots at 10 Hz.
const HISTORY_LEN: usize = 1200;
const LOG_LEN: usize = 1000;

// ── Snapshot (mirror of bezel::diag::DiagSnapshot) ──────────────────────

#[derive(Deserialize, Clone, Default)]
struct Snapshot {
    fps: f32,
    delta_ms: f32,
    frame_count: u64,
    uptime_secs: f32,
    model: String,
    vertices: usize,
    indices: usize,
    triangles: usize,
    draw_calls: usize,
    wireframe: bool,
    parameters: Transform,
    animation: String,
    animation_elapsed: f32,
    background: String,
    #[serde(default)]
    logs: Vec<LogRecord>,
}

#[derive(Deserialize, Clone, Copy)]
struct Transform {
    position: [f32; 3],
    rotation: [f32; 3],
    scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: 1.0,
        }
    }
}

#[derive(Deserialize, Clone, Default)]
struct LogRecord {
    level: String,
    target: String,
    message: String,
    timestamp_secs: f32,
}

// ── Log severity ────────────────────────────────────────────────────────

const LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// Position of `level` in [`LEVELS`]; unknown levels rank as INFO.
fn severity(level: &str) -> usize {
    LEVELS.iter().position(|l| *l == level).unwrap_or(2)
}

fn level_color(level: &str) -> Color {
    match severity(level) {
        0 => Color::DarkGray,
        1 => Color::Gray,
        2 => Color::Cyan,
        3 => Color::Yellow,
        _ => Color::Red,
    }
}

// ── Rolling history ─────────────────────────────────────────────────────

/// Fixed-length series feeding one sparkline.
struct History {
    samples: VecDeque<u64>,
}

impl History {
    fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    fn push(&mut self, value: f32) {
        if self.samples.len() == HISTORY_LEN {
            self.samples.pop_front();
        }
        self.samples.push_back(value.round().max(0.0) as u64);
    }

    /// The newest `width` samples, oldest first.
    fn tail(&self, width: usize) -> Vec<u64> {
        let skip = self.samples.len().saturating_sub(width);
        self.samples.iter().skip(skip).copied().collect()
    }

    /// `(min, mean, max)`, all zero when empty.
    fn summary(&self) -> (f64, f64, f64) {
        let (Some(&min), Some(&max)) = (self.samples.iter().min(), self.samples.iter().max())
        else {
            return (0.0, 0.0, 0.0);
        };
        let mean = self.samples.iter().sum::<u64>() as f64 / self.samples.len() as f64;
        (min as f64, mean, max as f64)
    }
}

// ── Dashboard state ─────────────────────────────────────────────────────

struct Dashboard {
    latest: Option<Snapshot>,
    fps: History,
    /// Frame time in microseconds.
    frame_time: History,
    logs: VecDeque<LogRecord>,
    /// Index into [`LEVELS`] of the quietest level shown.
    min_level: usize,
    frozen: bool,
}

impl Dashboard {
    fn new() -> Self {
        Self {
            latest: None,
            fps: History::new(),
            frame_time: History::new(),
            logs: VecDeque::with_capacity(LOG_LEN),
            min_level: 2,
            frozen: false,
        }
    }

    fn receive(&mut self, mut snapshot: Snapshot) {
        if self.frozen {
            return;
        }
        self.fps.push(snapshot.fps);
        self.frame_time.push(snapshot.delta_ms * 1000.0);
        for record in snapshot.logs.drain(..) {
            if self.logs.len() == LOG_LEN {
                self.logs.pop_front();
            }
            self.logs.push_back(record);
        }
        self.latest = Some(snapshot);
    }

    fn cycle_level(&mut self) {
        self.min_level = (self.min_level + 1) % LEVELS.len();
    }

    /// The newest `count` records at or above the level floor, oldest first.
    fn visible_logs(&self, count: usize) -> Vec<&LogRecord> {
        let mut shown: Vec<&LogRecord> = self
            .logs
            .iter()
            .rev()
            .filter(|r| severity(&r.level) >= self.min_level)
            .take(count)
            .collect();
        shown.reverse();
        shown
    }
}

// ── Main loop ───────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    let socket = UdpSocket::bind(LISTEN_ADDR).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("cannot listen on {LISTEN_ADDR} (another bezel-telemetry running?): {e}"),
        )
    })?;
    socket.set_nonblocking(true)?;

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut dashboard = Dashboard::new();
    let mut buf = vec![0u8; 64 * 1024];

    loop {
        while let Ok(len) = socket.recv(&mut buf) {
            if let Ok(snapshot) = serde_json::from_slice::<Snapshot>(&buf[..len]) {
                dashboard.receive(snapshot);
            }
        }

        terminal.draw(|f| draw(f, &dashboard))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if !on_key(&mut dashboard, key) {
                    break;
                }
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Returns `false` when the dashboard should close.
fn on_key(dashboard: &mut Dashboard, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
        KeyCode::Char('p') => dashboard.frozen = !dashboard.frozen,
        KeyCode::Char('l') => dashboard.cycle_level(),
        KeyCode::Char('c') => dashboard.logs.clear(),
        _ => {}
    }
    true
}

// ── Drawing ─────────────────────────────────────────────────────────────

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(dim())
}

fn draw(f: &mut ratatui::Frame, dashboard: &Dashboard) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(7),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_status(f, dashboard, rows[0]);

    let graphs = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    let (lo, mean, hi) = dashboard.fps.summary();
    draw_graph(
        f,
        graphs[0],
        &dashboard.fps,
        Color::Green,
        format!(" fps  {lo:.0} / {mean:.0} / {hi:.0} "),
    );
    let (lo, mean, hi) = dashboard.frame_time.summary();
    draw_graph(
        f,
        graphs[1],
        &dashboard.frame_time,
        Color::Yellow,
        format!(
            " frame ms  {:.1} / {:.1} / {:.1} ",
            lo / 1000.0,
            mean / 1000.0,
            hi / 1000.0
        ),
    );

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(20)])
        .split(rows[2]);
    draw_scene(f, dashboard, body[0]);
    draw_logs(f, dashboard, body[1]);

    f.render_widget(
        Paragraph::new(Span::styled(
            " q quit   p freeze   l log level   c clear log",
            dim(),
        )),
        rows[3],
    );
}

fn draw_status(f: &mut ratatui::Frame, dashboard: &Dashboard, area: Rect) {
    let (badge, color) = match (&dashboard.latest, dashboard.frozen) {
        (_, true) => ("FROZEN", Color::Yellow),
        (Some(_), false) => ("LIVE", Color::Green),
        (None, false) => ("NO VIEWER", Color::DarkGray),
    };
    let mut spans = vec![
        Span::styled(
            format!(" {badge} "),
            Style::default().bg(color).fg(Color::Black).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" bezel ", Style::default().fg(Color::Cyan)),
    ];
    if let Some(s) = &dashboard.latest {
        spans.push(Span::raw(format!(
            " {:.0} fps  {:.2} ms  frame {}  up {}",
            s.fps,
            s.delta_ms,
            s.frame_count,
            format_uptime(s.uptime_secs)
        )));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Sparkline of the newest samples that fit, with `(min / mean / max)` in
/// the title.
fn draw_graph(f: &mut ratatui::Frame, area: Rect, history: &History, color: Color, title: String) {
    let block = panel(&title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    let data = history.tail(inner.width as usize);
    f.render_widget(
        Sparkline::default().data(&data).style(Style::default().fg(color)),
        inner,
    );
}

fn row(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label:<11}"), dim()),
        Span::raw(value),
    ])
}

fn draw_scene(f: &mut ratatui::Frame, dashboard: &Dashboard, area: Rect) {
    let block = panel(" scene ");
    let Some(s) = &dashboard.latest else {
        let waiting = Span::styled(format!(" waiting on {LISTEN_ADDR}"), dim());
        f.render_widget(Paragraph::new(waiting).block(block), area);
        return;
    };

    let p = &s.parameters;
    let animation = if s.animation == "off" {
        "off".to_string()
    } else {
        format!("{} for {:.1}s", s.animation, s.animation_elapsed)
    };
    let mode = if s.wireframe { "wireframe" } else { "solid" };

    let lines = vec![
        row("model", s.model.clone()),
        row("mesh", format!("{} verts, {} tris", s.vertices, s.triangles)),
        row("draws", format!("{} ({mode}, {} indices)", s.draw_calls, s.indices)),
        row("background", s.background.clone()),
        row("animation", animation),
        Line::raw(""),
        row(
            "position",
            format!("{:+.2} {:+.2} {:+.2}", p.position[0], p.position[1], p.position[2]),
        ),
        row(
            "rotation",
            format!("{:.0} {:.0} {:.0} deg", p.rotation[0], p.rotation[1], p.rotation[2]),
        ),
        row("scale", format!("{:.2}", p.scale)),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_logs(f: &mut ratatui::Frame, dashboard: &Dashboard, area: Rect) {
    let title = format!(" log  {}+ ", LEVELS[dashboard.min_level]);
    let block = panel(&title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = dashboard
        .visible_logs(inner.height as usize)
        .into_iter()
        .map(|r| {
            Line::from(vec![
                Span::styled(format!("{:>7.1} ", r.timestamp_secs), dim()),
                Span::styled(
                    format!("{:<5} ", r.level),
                    Style::default().fg(level_color(&r.level)),
                ),
                Span::styled(format!("{} ", r.target), dim()),
                Span::raw(r.message.clone()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn format_uptime(secs: f32) -> String {
    let total = secs as u64;
    match (total / 3600, total / 60 % 60, total % 60) {
        (0, 0, _) => format!("{secs:.1}s"),
        (0, m, s) => format!("{m}m{s:02}s"),
        (h, m, s) => format!("{h}h{m:02}m{s:02}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: &str, message: &str) -> LogRecord {
        LogRecord {
            level: level.into(),
            target: "bezel".into(),
            message: message.into(),
            timestamp_secs: 0.0,
        }
    }

    #[test]
    fn parses_viewer_snapshot() {
        let json = r##"{
            "fps": 60.0, "delta_ms": 16.6, "frame_count": 120, "uptime_secs": 2.0,
            "model": "detailed", "vertices": 500, "indices": 1200, "triangles": 400,
            "draw_calls": 1, "wireframe": false,
            "parameters": {"position": [0.0, 0.5, 0.0], "rotation": [0.0, 90.0, 0.0], "scale": 1.0},
            "animation": "spin", "animation_elapsed": 1.5, "background": "#ffffff"
        }"##;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.parameters.rotation[1], 90.0);
        assert!(snapshot.logs.is_empty());

        let mut dashboard = Dashboard::new();
        dashboard.receive(snapshot);
        assert!(dashboard.latest.is_some());
        assert_eq!(dashboard.fps.tail(1), vec![60]);
        assert_eq!(dashboard.frame_time.tail(1), vec![16600]);
    }

    #[test]
    fn frozen_dashboard_ignores_snapshots() {
        let mut dashboard = Dashboard::new();
        dashboard.frozen = true;
        dashboard.receive(Snapshot::default());
        assert!(dashboard.latest.is_none());
        assert_eq!(dashboard.fps.summary(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn history_drops_oldest_and_tails_newest() {
        let mut history = History::new();
        for i in 0..HISTORY_LEN + 3 {
            history.push(i as f32);
        }
        assert_eq!(history.samples.len(), HISTORY_LEN);
        assert_eq!(history.samples.front(), Some(&3));
        assert_eq!(history.tail(2), vec![HISTORY_LEN as u64 + 1, HISTORY_LEN as u64 + 2]);
    }

    #[test]
    fn level_floor_hides_quieter_records() {
        let mut dashboard = Dashboard::new();
        dashboard.receive(Snapshot {
            logs: vec![
                record("DEBUG", "a"),
                record("INFO", "b"),
                record("WARN", "c"),
                record("ERROR", "d"),
            ],
            ..Snapshot::default()
        });

        let messages = |count| -> Vec<String> {
            dashboard.visible_logs(count).iter().map(|r| r.message.clone()).collect()
        };
        assert_eq!(messages(10), ["b", "c", "d"]);
        assert_eq!(messages(2), ["c", "d"]);

        dashboard.cycle_level();
        dashboard.cycle_level();
        assert_eq!(LEVELS[dashboard.min_level], "ERROR");
        dashboard.cycle_level();
        assert_eq!(dashboard.visible_logs(10).len(), 4);
    }

    #[test]
    fn uptime_formats() {
        assert_eq!(format_uptime(5.0), "5.0s");
        assert_eq!(format_uptime(125.0), "2m05s");
        assert_eq!(format_uptime(3725.0), "1h02m05s");
    }
}
