use chrono::Local;
use log::LevelFilter;
use std::io::{self, Write};

use env_logger::{Builder, Env, Target};

/// Initialise logging.
///
/// With `MODBUS_GENERATOR_LOG_FILE` set every record down to debug goes to
/// that file, otherwise records are written to stderr at `RUST_LOG` or info.
pub fn init_logger() {
    match std::env::var("MODBUS_GENERATOR_LOG_FILE") {
        Ok(path) if !path.is_empty() => {
            if let Err(err) = init_file_logger(&path) {
                eprintln!("Failed to initialize file logger at '{path}': {err}");
                init_stderr_logger();
            }
        }
        _ => init_stderr_logger(),
    }
}

fn init_stderr_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

fn init_file_logger(path: &str) -> io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} {} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .filter_level(LevelFilter::Debug)
        .parse_default_env()
        .init();

    log::info!("File logger initialized at {path}");

    Ok(())
}
