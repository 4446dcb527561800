use clap::Parser;
use std::io;
use tasks_board::cli::Cli;
use tasks_board::http;
use tasks_board::parser::load_tasks;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> io::Result<()> {
    // Resolve the local offset before anything can spawn a thread.
    let cli = Cli::parse();
    let dump = cli.dump;
    let config = cli.into_config();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    if dump {
        let tasks = load_tasks(&config.tasks_path);
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    http::serve(&config)
}
