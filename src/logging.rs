//! Tracing subscriber setup for the binaries.

use std::fs::File;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{
    filter::LevelFilter, fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, Layer,
    Registry,
};

use crate::error::Result;

/// Install a global fmt subscriber writing to `log_file`, or to stderr when unset.
///
/// Stdout stays free for result tables.
pub fn init(level: Level, log_file: Option<&str>) -> Result<()> {
    let filter = LevelFilter::from_level(level);
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            let file_layer = layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_filter(filter);
            Registry::default().with(file_layer).init();
        }
        None => {
            let stderr_layer = layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_filter(filter);
            Registry::default().with(stderr_layer).init();
        }
    }
    Ok(())
}
