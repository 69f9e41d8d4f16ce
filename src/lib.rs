//! vpxsplit - VP8/VP9 frame extraction from IVF and WebM containers
//!
//! vpxsplit reads a container, detects whether it is IVF or WebM, and hands
//! out the coded frames of its video stream one at a time. Packets carrying a
//! VP9 superframe are split into their individual frames so the output can
//! be fed straight to a decoder.
//!
//! # Architecture
//!
//! - `format`: container detection, IVF and WebM packet readers, superframe
//!   splitting and the [`format::FrameReader`] facade
//! - `codec`: codec tags, fourcc mapping and keyframe detection
//! - `error`: error types shared by all modules

pub mod codec;
pub mod error;
pub mod format;

pub use error::{Error, Result};
pub use format::{Frame, FrameReader};

/// vpxsplit version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for the vpxsplit library
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Enable verbose logging
    pub verbose: bool,
    /// Enable debug output
    pub debug: bool,
}

/// Initialize logging for the given configuration
///
/// Nothing is installed unless `verbose` or `debug` is set. `RUST_LOG`
/// overrides the level when present. A second call keeps the subscriber
/// installed by the first.
pub fn init(config: Config) -> Result<()> {
    if config.verbose || config.debug {
        let level = if config.debug { "debug" } else { "info" };
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    Ok(())
}
