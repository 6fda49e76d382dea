use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Progressive Monte Carlo path tracer")]
pub struct Args {
    /// JSON file with scene, camera and render sections (built-in demo when omitted)
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Number of progressive frames to accumulate
    #[arg(short, long, default_value = "64")]
    pub frames: u32,

    /// Image width in pixels
    #[arg(long, default_value = "640")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "360")]
    pub height: u32,

    /// Output PNG path
    #[arg(short, long, default_value = "out.png")]
    pub output: PathBuf,

    /// Logging level
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}
