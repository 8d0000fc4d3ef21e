// src/log.rs
use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::config::consts::LOG_FILE;
use crate::file::ensure_directory;

/// Tag used for events that are not about one account.
pub const SYSTEM: &str = "SYSTEM";

const TIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Install the global subscriber: stderr plus `<dir>/run.log`.
/// A second call is a no-op (the first subscriber stays installed).
pub fn init(dir: &Path) -> io::Result<()> {
    ensure_directory(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(TaggedFormat)
        .with_writer(io::stderr.and(Mutex::new(file)))
        .try_init();
    Ok(())
}

/// `2024-05-01 12:00:00 | INFO | UID:63231 | message`
pub struct TaggedFormat;

impl<S, N> FormatEvent<S, N> for TaggedFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = TaggedFields::default();
        event.record(&mut fields);
        writeln!(
            writer,
            "{} | {} | UID:{} | {}",
            chrono::Local::now().format(TIME_FMT),
            event.metadata().level(),
            fields.uid.as_deref().unwrap_or(SYSTEM),
            fields.line(),
        )
    }
}

#[derive(Default)]
struct TaggedFields {
    uid: Option<String>,
    message: String,
    extra: Vec<String>,
}

impl TaggedFields {
    fn line(&self) -> String {
        if self.extra.is_empty() {
            return self.message.clone();
        }
        format!("{} ({})", self.message, self.extra.join(", "))
    }
}

impl Visit for TaggedFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "uid" => self.uid = Some(s!(value)),
            "message" => self.message = s!(value),
            name => self.extra.push(format!("{name}={value}")),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "uid" => self.uid = Some(format!("{value:?}")),
            "message" => self.message = format!("{value:?}"),
            name => self.extra.push(format!("{name}={value:?}")),
        }
    }
}

/// Info-level logging, optionally tagged with an account: `logf!(uid = 42; "...")`
#[macro_export]
macro_rules! logf {
    (uid = $uid:expr; $($arg:tt)*) => {
        ::tracing::info!(uid = %$uid, $($arg)*)
    };
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    (uid = $uid:expr; $($arg:tt)*) => {
        ::tracing::warn!(uid = %$uid, $($arg)*)
    };
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    (uid = $uid:expr; $($arg:tt)*) => {
        ::tracing::error!(uid = %$uid, $($arg)*)
    };
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
