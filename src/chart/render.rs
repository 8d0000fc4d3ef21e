// src/chart/render.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::FixedOffset;
use image::{ImageFormat, Rgb, RgbImage};

use crate::config::consts::CHART_SUFFIX;
use crate::error::ChartError;
use crate::file::ensure_directory;
use crate::series::{Observation, SeriesStore};

use super::canvas::Canvas;
use super::font::{text_height, text_width};
use super::summary::{NEGATIVE, POSITIVE, TrendSummary, tick_indices};

pub const WIDTH: u32 = 1800;
pub const HEIGHT: u32 = 600;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([40, 40, 40]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const FRAME: Rgb<u8> = Rgb([150, 150, 150]);
const TREND: Rgb<u8> = Rgb([0xFB, 0x72, 0x99]);

const LEFT: i64 = 150;
const RIGHT: i64 = 50;
const TOP: i64 = 80;
const BOTTOM: i64 = 90;
const Y_TICKS: i64 = 4;
const TICK_FMT: &str = "%m-%d %H:%M";

/// What a render call did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(PathBuf),
    /// Rendered too recently for this account
    RateLimited,
    /// No series file yet
    NoSeries,
    /// Fewer than two distinct rows
    TooFewPoints(usize),
}

/// Writes `<dir>/<uid>_trend.png`, at most once per `min_gap` per account.
pub struct Renderer {
    dir: PathBuf,
    offset: FixedOffset,
    min_gap: Duration,
    last_render: HashMap<u64, Instant>,
}

impl Renderer {
    pub fn new(dir: impl Into<PathBuf>, offset: FixedOffset, min_gap: Duration) -> Self {
        Self { dir: dir.into(), offset, min_gap, last_render: HashMap::new() }
    }

    pub fn chart_path(&self, uid: u64) -> PathBuf {
        self.dir.join(join!(uid, CHART_SUFFIX))
    }

    fn claim_slot(&mut self, uid: u64) -> bool {
        let now = Instant::now();
        if let Some(prev) = self.last_render.get(&uid) {
            if now.duration_since(*prev) < self.min_gap {
                return false;
            }
        }
        self.last_render.insert(uid, now);
        true
    }

    /// Read the account's series and redraw its chart. The rate-limit slot is
    /// taken before reading, so a failed attempt also waits out `min_gap`.
    pub fn render(&mut self, store: &SeriesStore, uid: u64) -> Result<RenderOutcome, ChartError> {
        if !self.claim_slot(uid) {
            return Ok(RenderOutcome::RateLimited);
        }

        let csv = store.path(uid);
        if !csv.exists() {
            logw!(uid = uid; "series file missing: {}", csv.display());
            return Ok(RenderOutcome::NoSeries);
        }

        let rows = store.read(uid)?;
        if rows.len() < 2 {
            logw!(uid = uid; "only {} data point(s), skipping chart", rows.len());
            return Ok(RenderOutcome::TooFewPoints(rows.len()));
        }

        let img = draw_chart(uid, &rows, self.offset);
        let out = self.chart_path(uid);
        save_png(&img, &out)?;
        logf!(uid = uid; "chart updated -> {}", out.file_name().map(|n| n.to_string_lossy()).unwrap_or_default());
        Ok(RenderOutcome::Rendered(out))
    }
}

fn save_png(img: &RgbImage, out: &Path) -> Result<(), ChartError> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    img.save_with_format(out, ImageFormat::Png)?;
    Ok(())
}

/// Maps series coordinates onto the plot area.
struct Frame {
    t0: i64,
    t_span: f64,
    y_lo: f64,
    y_span: f64,
}

impl Frame {
    fn new(rows: &[Observation], summary: &TrendSummary) -> Self {
        let t0 = rows.first().map(|o| o.at.timestamp_millis()).unwrap_or(0);
        let t1 = rows.last().map(|o| o.at.timestamp_millis()).unwrap_or(t0);
        let (mut lo, mut hi) = (summary.min.value as f64, summary.max.value as f64);
        if hi - lo < 1.0 {
            lo -= 1.0;
            hi += 1.0;
        }
        let pad = (hi - lo) * 0.08;
        Self {
            t0,
            t_span: (t1 - t0).max(1) as f64,
            y_lo: lo - pad,
            y_span: (hi - lo) + 2.0 * pad,
        }
    }

    fn x(&self, o: &Observation) -> i64 {
        let plot_w = (WIDTH as i64 - LEFT - RIGHT) as f64;
        LEFT + ((o.at.timestamp_millis() - self.t0) as f64 / self.t_span * plot_w).round() as i64
    }

    fn y(&self, value: f64) -> i64 {
        let plot_h = (HEIGHT as i64 - TOP - BOTTOM) as f64;
        HEIGHT as i64 - BOTTOM - ((value - self.y_lo) / self.y_span * plot_h).round() as i64
    }
}

/// Draw the full trend chart for `rows` (time-ordered, at least one row).
pub fn draw_chart(uid: u64, rows: &[Observation], offset: FixedOffset) -> RgbImage {
    let mut c = Canvas::new(WIDTH, HEIGHT, BACKGROUND);
    let values: Vec<u64> = rows.iter().map(|o| o.fans).collect();
    let Some(summary) = TrendSummary::of(&values) else {
        return c.into_image();
    };
    let frame = Frame::new(rows, &summary);
    let (x_min, x_max) = (LEFT, WIDTH as i64 - RIGHT);
    let (y_min, y_max) = (TOP, HEIGHT as i64 - BOTTOM);

    // Title
    let title = format!("UID {uid}");
    c.bold_text((WIDTH - text_width(&title, 3)) as i64 / 2, 24, &title, 3, INK);
    c.text(20, TOP - 30, "FOLLOWERS", 2, INK);

    // Horizontal grid + y labels
    for k in 0..=Y_TICKS {
        let v = frame.y_lo + frame.y_span * k as f64 / Y_TICKS as f64;
        let y = frame.y(v);
        c.line(x_min, y, x_max, y, 1, GRID);
        let label = format!("{}", v.round() as i64);
        let lx = LEFT - 12 - text_width(&label, 2) as i64;
        c.text(lx, y - text_height(2) as i64 / 2, &label, 2, INK);
    }

    // Vertical grid + time labels
    for i in tick_indices(rows.len()) {
        let x = frame.x(&rows[i]);
        c.line(x, y_min, x, y_max, 1, GRID);
        c.line(x, y_max, x, y_max + 6, 1, FRAME);
        let label = rows[i].at.with_timezone(&offset).format(TICK_FMT).to_string();
        c.text(x - text_width(&label, 2) as i64 / 2, y_max + 14, &label, 2, INK);
    }
    let time_caption = "TIME";
    c.text((WIDTH - text_width(time_caption, 2)) as i64 / 2, HEIGHT as i64 - 34, time_caption, 2, INK);

    c.outline_rect(x_min, y_min, (x_max - x_min + 1) as u32, (y_max - y_min + 1) as u32, FRAME);

    // Trend line
    for pair in rows.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        c.line(frame.x(a), frame.y(a.fans as f64), frame.x(b), frame.y(b.fans as f64), 2, TREND);
    }

    // Extremes
    let max_pt = &rows[summary.max.index];
    let (mx, my) = (frame.x(max_pt), frame.y(max_pt.fans as f64));
    c.disc(mx, my, 6, POSITIVE);
    let label = format!("MAX {}", summary.max.value);
    let lx = (mx - text_width(&label, 2) as i64 - 8).max(x_min + 4);
    c.text(lx, my - text_height(2) as i64 - 8, &label, 2, INK);

    let min_pt = &rows[summary.min.index];
    let (nx, ny) = (frame.x(min_pt), frame.y(min_pt.fans as f64));
    c.disc(nx, ny, 6, NEGATIVE);
    let label = format!("MIN {}", summary.min.value);
    let lx = (nx - text_width(&label, 2) as i64 - 8).max(x_min + 4);
    c.text(lx, ny + 10, &label, 2, INK);

    // Net change box
    let net = format!("NET {}", summary.net_label());
    let (bw, bh) = (text_width(&net, 3) + 24, text_height(3) + 20);
    c.fill_rect(x_min + 12, y_min + 12, bw, bh, BACKGROUND);
    c.outline_rect(x_min + 12, y_min + 12, bw, bh, FRAME);
    c.bold_text(x_min + 24, y_min + 22, &net, 3, summary.net_color());

    c.into_image()
}
