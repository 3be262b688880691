// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::charset::{build_chars, charset_from_str, parse_user_hex_chars};
use crate::grid::GridConfig;
use crate::palette::{build_palette, theme_from_str, Palette};
use crate::runtime::Timeline;

pub const DEFAULT_MIN_DROP_LENGTH: u16 = 5;
pub const DEFAULT_MAX_DROP_LENGTH: u16 = 12;
pub const DEFAULT_DENSITY: f32 = 0.1;
pub const DEFAULT_FRAME_MS: u64 = 60;
pub const DEFAULT_GLITCH_PCT: f32 = 0.02;
pub const DEFAULT_OVERLAY_START_S: f64 = 5.0;
pub const DEFAULT_RAIN_STOP_S: f64 = 20.0;
pub const DEFAULT_WASH_START_S: f64 = 26.0;
pub const DEFAULT_CYCLE_END_S: f64 = 40.0;
pub const DEFAULT_WASH_PCT: f32 = 2.0;
pub const DEFAULT_WASH_ACCEL: f32 = 4.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("failed to apply {name} {value} (min {min} max {max})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("failed to apply {name} {value} (must be a finite number)")]
    NotFinite { name: &'static str, value: f64 },

    #[error("failed to apply --min-len {min} (must not exceed --max-len {max})")]
    DropLengths { min: u16, max: u16 },

    #[error("phase times must satisfy overlay-start <= rain-stop <= wash-start <= cycle-end, and cycle-end > 0")]
    Timeline,

    #[error("invalid color: {0} (see --list-colors)")]
    UnknownTheme(String),

    #[error("unsupported charset: {0} (see --list-charsets)")]
    UnknownCharset(String),

    #[error("--chars: {reason} at index {index}")]
    InvalidChar { index: usize, reason: &'static str },
}

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn default_to_ascii() -> bool {
    let lang = std::env::var("LANG").unwrap_or_default();
    !lang.to_ascii_uppercase().contains("UTF")
}

#[derive(Parser, Debug, Clone)]
#[command(name = "forestrain", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        long = "rows",
        help_heading = "GRID",
        help = "Grid rows (min 1 max 1000). Default: terminal height"
    )]
    pub rows: Option<u16>,

    #[arg(
        long = "cols",
        help_heading = "GRID",
        help = "Grid columns (min 1 max 1000). Default: terminal width"
    )]
    pub cols: Option<u16>,

    #[arg(
        long = "min-len",
        default_value_t = DEFAULT_MIN_DROP_LENGTH,
        help_heading = "RAIN",
        help = "Shortest drop (min 1 max 200)"
    )]
    pub min_len: u16,

    #[arg(
        long = "max-len",
        default_value_t = DEFAULT_MAX_DROP_LENGTH,
        help_heading = "RAIN",
        help = "Longest drop (min 1 max 200)"
    )]
    pub max_len: u16,

    #[arg(
        short = 'd',
        long = "density",
        default_value_t = DEFAULT_DENSITY,
        help_heading = "RAIN",
        help = "Share of the screen covered by drops (min 0 max 1)"
    )]
    pub density: f32,

    #[arg(
        short = 'f',
        long = "frame-ms",
        default_value_t = DEFAULT_FRAME_MS,
        help_heading = "RAIN",
        help = "Frame interval in milliseconds (min 10 max 1000)"
    )]
    pub frame_ms: u64,

    #[arg(
        short = 'G',
        long = "glitchpct",
        default_value_t = DEFAULT_GLITCH_PCT,
        help_heading = "GLITCH",
        help = "Chance per cell per frame to glitch, in percent (min 0 max 100)"
    )]
    pub glitch_pct: f32,

    #[arg(long = "noglitch", help_heading = "GLITCH", help = "Disable glitch effects")]
    pub noglitch: bool,

    #[arg(
        short = 'o',
        long = "overlay",
        help_heading = "OVERLAY",
        help = "Text file whose non-blank characters form the logo"
    )]
    pub overlay: Option<PathBuf>,

    #[arg(
        long = "overlay-start",
        default_value_t = DEFAULT_OVERLAY_START_S,
        help_heading = "OVERLAY",
        help = "Seconds into the cycle when the logo appears"
    )]
    pub overlay_start: f64,

    #[arg(
        long = "rain-stop",
        default_value_t = DEFAULT_RAIN_STOP_S,
        help_heading = "OVERLAY",
        help = "Seconds into the cycle when the rain stops"
    )]
    pub rain_stop: f64,

    #[arg(
        long = "wash-start",
        default_value_t = DEFAULT_WASH_START_S,
        help_heading = "OVERLAY",
        help = "Seconds into the cycle when the logo starts washing away"
    )]
    pub wash_start: f64,

    #[arg(
        long = "cycle-end",
        default_value_t = DEFAULT_CYCLE_END_S,
        help_heading = "OVERLAY",
        help = "Seconds after which the cycle restarts"
    )]
    pub cycle_end: f64,

    #[arg(
        long = "washpct",
        default_value_t = DEFAULT_WASH_PCT,
        help_heading = "OVERLAY",
        help = "Base chance per column per frame to seed a wash drop, in percent (min 0 max 100)"
    )]
    pub wash_pct: f32,

    #[arg(
        long = "wash-accel",
        default_value_t = DEFAULT_WASH_ACCEL,
        help_heading = "OVERLAY",
        help = "How much faster washing gets as the logo disappears (min 0 max 100)"
    )]
    pub wash_accel: f32,

    #[arg(
        short = 'c',
        long = "color",
        default_value = "forest",
        help_heading = "APPEARANCE",
        help = "Color theme (see --list-colors)"
    )]
    pub color: String,

    #[arg(
        long = "charset",
        default_value = "auto",
        help_heading = "APPEARANCE",
        help = "Glyph preset (see --list-charsets)"
    )]
    pub charset: String,

    #[arg(
        long = "chars",
        help_heading = "APPEARANCE",
        help = "Custom glyphs as comma-separated hex code points, e.g. 2663,2698"
    )]
    pub chars: Option<String>,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "headless",
        value_name = "FRAMES",
        help_heading = "GENERAL",
        help = "Simulate FRAMES frames off-screen, print a summary and exit"
    )]
    pub headless: Option<u64>,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List available glyph presets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available color themes and exit"
    )]
    pub list_colors: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

/// Validated run configuration. Grid size is resolved later, once the
/// terminal size is known.
#[derive(Clone, Debug)]
pub struct Settings {
    pub rows: Option<u16>,
    pub cols: Option<u16>,
    pub min_drop_length: u16,
    pub max_drop_length: u16,
    pub density: f32,
    pub frame_interval: Duration,
    pub glitch_chance: f32,
    pub overlay: Option<PathBuf>,
    pub timeline: Timeline,
    pub wash_base: f32,
    pub wash_accel: f32,
    pub palette: Palette,
    pub glyphs: Vec<char>,
    pub duration: Option<Duration>,
    pub screensaver: bool,
    pub headless: Option<u64>,
}

fn require_f64_range(name: &'static str, v: f64, min: f64, max: f64) -> Result<f64, ConfigError> {
    if !v.is_finite() {
        return Err(ConfigError::NotFinite { name, value: v });
    }
    if v < min || v > max {
        return Err(ConfigError::OutOfRange {
            name,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

fn require_u16_range(name: &'static str, v: u16, min: u16, max: u16) -> Result<u16, ConfigError> {
    require_f64_range(name, v as f64, min as f64, max as f64).map(|_| v)
}

fn seconds(name: &'static str, v: f64) -> Result<Duration, ConfigError> {
    require_f64_range(name, v, 0.0, 86400.0).map(Duration::from_secs_f64)
}

impl Settings {
    pub fn from_args(args: &Args, default_to_ascii: bool) -> Result<Self, ConfigError> {
        let rows = args
            .rows
            .map(|r| require_u16_range("--rows", r, 1, 1000))
            .transpose()?;
        let cols = args
            .cols
            .map(|c| require_u16_range("--cols", c, 1, 1000))
            .transpose()?;

        let min_drop_length = require_u16_range("--min-len", args.min_len, 1, 200)?;
        let max_drop_length = require_u16_range("--max-len", args.max_len, 1, 200)?;
        if min_drop_length > max_drop_length {
            return Err(ConfigError::DropLengths {
                min: min_drop_length,
                max: max_drop_length,
            });
        }

        let density = require_f64_range("--density", args.density as f64, 0.0, 1.0)? as f32;
        let frame_ms = require_f64_range("--frame-ms", args.frame_ms as f64, 10.0, 1000.0)? as u64;

        let glitch_pct = require_f64_range("--glitchpct", args.glitch_pct as f64, 0.0, 100.0)?;
        let glitch_chance = if args.noglitch {
            0.0
        } else {
            (glitch_pct / 100.0) as f32
        };

        let timeline = Timeline {
            overlay_start: seconds("--overlay-start", args.overlay_start)?,
            rain_stop: seconds("--rain-stop", args.rain_stop)?,
            wash_start: seconds("--wash-start", args.wash_start)?,
            cycle_end: seconds("--cycle-end", args.cycle_end)?,
        };
        if !timeline.is_ordered() {
            return Err(ConfigError::Timeline);
        }

        let wash_base = (require_f64_range("--washpct", args.wash_pct as f64, 0.0, 100.0)?
            / 100.0) as f32;
        let wash_accel = require_f64_range("--wash-accel", args.wash_accel as f64, 0.0, 100.0)?
            as f32;

        let palette = build_palette(theme_from_str(&args.color)?);

        let custom = match &args.chars {
            Some(spec) => parse_user_hex_chars(spec)?,
            None => Vec::new(),
        };
        let charset = charset_from_str(&args.charset, default_to_ascii)?;
        let glyphs = build_chars(charset, &custom);

        let duration = match args.duration {
            Some(s) if !s.is_finite() => {
                return Err(ConfigError::NotFinite {
                    name: "--duration",
                    value: s,
                })
            }
            Some(s) if s > 0.0 => Some(Duration::from_secs_f64(require_f64_range(
                "--duration",
                s,
                0.1,
                86400.0,
            )?)),
            _ => None,
        };

        Ok(Self {
            rows,
            cols,
            min_drop_length,
            max_drop_length,
            density,
            frame_interval: Duration::from_millis(frame_ms),
            glitch_chance,
            overlay: args.overlay.clone(),
            timeline,
            wash_base,
            wash_accel,
            palette,
            glyphs,
            duration,
            screensaver: args.screensaver,
            headless: args.headless,
        })
    }

    /// Explicit `--rows`/`--cols` win over the terminal size.
    pub fn grid_config(&self, term_cols: u16, term_rows: u16) -> GridConfig {
        GridConfig {
            rows: self.rows.unwrap_or(term_rows).max(1),
            cols: self.cols.unwrap_or(term_cols).max(1),
            min_drop_length: self.min_drop_length,
            max_drop_length: self.max_drop_length,
            density: self.density,
            glitch_chance: self.glitch_chance,
            wash_base: self.wash_base,
            wash_accel: self.wash_accel,
            timeline: self.timeline,
            palette: self.palette.clone(),
            glyphs: self.glyphs.clone(),
        }
    }
}

pub fn print_heading(title: &str, note: &str) {
    if color_enabled_stdout() {
        println!("\x1b[1;36m{}\x1b[0m", title);
        println!("\x1b[2m{}\x1b[0m", note);
    } else {
        println!("{}", title);
        println!("{}", note);
    }
    println!();
}
