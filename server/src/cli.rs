use clap::Parser;
use std::path::PathBuf;
use time::UtcOffset;

use crate::config::{self, Config, DEFAULT_HOST, DEFAULT_PORT};

/// Kanban board server backed by a single TASKS.md file
#[derive(Parser, Debug)]
#[command(name = "tasks-board")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Markdown file holding the board (default: ~/.openclaw/workspace/TASKS.md)
    #[arg(short = 'f', long, env = "KANBAN_TASKS_FILE")]
    pub tasks_file: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "KANBAN_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "KANBAN_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Offset for the "Last updated" footer, e.g. -07:00 (default: local time)
    #[arg(
        long,
        env = "KANBAN_UTC_OFFSET",
        allow_hyphen_values = true,
        value_parser = config::parse_utc_offset
    )]
    pub utc_offset: Option<UtcOffset>,

    /// Print the parsed tasks as JSON and exit
    #[arg(long)]
    pub dump: bool,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            tasks_path: self.tasks_file.unwrap_or_else(config::default_tasks_path),
            host: self.host,
            port: self.port,
            utc_offset: self.utc_offset.unwrap_or_else(config::local_offset),
        }
    }
}
