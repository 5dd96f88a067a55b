use crate::effects::Gauge;
use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "portfolio-fx", version, about = "Hacker-portfolio effects showcase for the terminal")]
pub struct Config {
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Seed every effect's RNG for a reproducible run.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = GaugeKind::Memory)]
    pub gauge: GaugeKind,

    /// Pixel width of one terminal cell; effects are laid out in pixels.
    #[arg(long, default_value_t = 8)]
    pub cell_width: u16,

    #[arg(long, default_value_t = 16)]
    pub cell_height: u16,

    #[arg(long, default_value = "PORTFOLIO // ONLINE")]
    pub headline: String,

    #[arg(long, default_value = "SYSTEMS // SECURITY // SOFTWARE")]
    pub tagline: String,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    #[arg(long, default_value_t = false)]
    pub no_mouse: bool,

    /// Write tracing output here; the terminal itself is owned by the renderer.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GaugeKind {
    #[value(alias = "mem")]
    Memory,
    #[value(alias = "cpu")]
    Load,
}

impl GaugeKind {
    pub fn gauge(self) -> Gauge {
        match self {
            Self::Memory => Gauge::MEMORY,
            Self::Load => Gauge::LOAD,
        }
    }
}

pub const MAX_FPS: u32 = 240;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    FpsOutOfRange(u32),
    ZeroCellSize { width: u16, height: u16 },
    EmptyText(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FpsOutOfRange(fps) => write!(f, "--fps must be within 1..={MAX_FPS}, got {fps}"),
            Self::ZeroCellSize { width, height } => {
                write!(f, "cell size must be non-zero, got {width}x{height}")
            }
            Self::EmptyText(flag) => write!(f, "--{flag} must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(ConfigError::FpsOutOfRange(self.fps));
        }
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(ConfigError::ZeroCellSize {
                width: self.cell_width,
                height: self.cell_height,
            });
        }
        if self.headline.trim().is_empty() {
            return Err(ConfigError::EmptyText("headline"));
        }
        if self.tagline.trim().is_empty() {
            return Err(ConfigError::EmptyText("tagline"));
        }
        Ok(())
    }

    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}
