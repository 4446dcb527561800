//! Resolved server settings.
//!
//! Built once at startup from the command line and environment, then handed
//! to the store and the HTTP loop. Nothing reads the environment afterwards.

use directories::BaseDirs;
use std::path::PathBuf;
use time::macros::format_description;
use time::UtcOffset;

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_HOST: &str = "0.0.0.0";
const TASKS_FILE: &str = ".openclaw/workspace/TASKS.md";

#[derive(Debug, Clone)]
pub struct Config {
    pub tasks_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Offset used for the "Last updated" footer
    pub utc_offset: UtcOffset,
}

impl Config {
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

/// `<home>/.openclaw/workspace/TASKS.md`, or relative to the working
/// directory when no home directory is known.
pub fn default_tasks_path() -> PathBuf {
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(TASKS_FILE),
        None => PathBuf::from(TASKS_FILE),
    }
}

/// Must run before any thread is spawned; falls back to UTC otherwise.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Parses offsets such as `-07:00`, `+05:30` or `Z`.
pub fn parse_utc_offset(raw: &str) -> Result<UtcOffset, String> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    let format = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
    UtcOffset::parse(raw, &format).map_err(|err| format!("Invalid UTC offset '{}': {}", raw, err))
}
