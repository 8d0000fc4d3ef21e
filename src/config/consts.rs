// src/config/consts.rs

// Tracked accounts created on first run (and re-added if missing from the file)
pub const DEFAULT_UIDS: &[u64] = &[63231, 288374925, 730732];

// Schedule (seconds)
pub const COLLECT_EVERY_SECS: u64 = 300;
pub const RENDER_EVERY_SECS: u64 = 600;
// Kept below RENDER_EVERY_SECS (early ticks must not be rate limited)
pub const RENDER_MIN_GAP_SECS: u64 = 570;
pub const SCHEDULER_POLL_MS: u64 = 250;

// Net config
pub const API_BASE: &str = "https://api.bilibili.com";
pub const SPACE_BASE: &str = "https://space.bilibili.com";
pub const HOME_REFERER: &str = "https://www.bilibili.com";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const BODY_PREVIEW_CHARS: usize = 500;

// Pacing (seconds, inclusive ranges)
pub const PROBE_DELAY_SECS: (f64, f64) = (2.0, 5.0);
pub const ACCOUNT_DELAY_SECS: (f64, f64) = (1.0, 3.0);

// Local store
pub const DATA_DIR: &str = "fan_data";
pub const CONFIG_FILE: &str = "users_config.json";
pub const LOG_FILE: &str = "run.log";
pub const SERIES_SUFFIX: &str = "_fans.csv";
pub const CHART_SUFFIX: &str = "_trend.png";
pub const SERIES_SEP: char = ',';
pub const SERIES_HEADER: &[&str] = &["ts_utc", "ts_cn", "fans"];
pub const LEGACY_HEADER: &[&str] = &["ts", "fans"];

// Local wall clock used for the second timestamp column (UTC+8)
pub const LOCAL_OFFSET_SECS: i32 = 8 * 3600;
pub const LOCAL_TS_FMT: &str = "%Y/%m/%d %H:%M:%S";
