// Copyright (c) 2026 rezky_nightky

mod cell;
mod charset;
mod config;
mod droplet;
mod frame;
mod glitch;
mod grid;
mod overlay;
mod palette;
mod runtime;
mod terminal;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::charset::print_list_charsets;
use crate::config::{color_enabled_stdout, default_to_ascii, print_heading, Args, Settings};
use crate::frame::Frame;
use crate::grid::Grid;
use crate::palette::print_list_themes;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn install_exit_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            log::warn!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn build_grid(settings: &Settings, term_cols: u16, term_rows: u16) -> Grid {
    let mut grid = Grid::new(settings.grid_config(term_cols, term_rows));
    if let Some(path) = &settings.overlay {
        if let Err(e) = grid.load_overlay(path) {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
    log::debug!(
        "grid {}x{}, drops {}..={}, density {}",
        grid.rows(),
        grid.cols(),
        settings.min_drop_length,
        settings.max_drop_length,
        settings.density
    );
    grid
}

/// Steps the grid on a virtual clock (one frame interval per frame) and
/// renders into an in-memory frame instead of the terminal.
fn run_headless(settings: &Settings, frames: u64) -> std::io::Result<()> {
    let (cols, rows) = Terminal::size().unwrap_or((80, 24));
    let mut grid = build_grid(settings, cols, rows);
    let mut frame = Frame::new(grid.cols(), grid.rows());

    let mut peak_lit = 0usize;
    for n in 0..frames {
        grid.render(&mut frame)?;
        peak_lit = peak_lit.max(frame.lit_count());
        let elapsed = settings
            .frame_interval
            .saturating_mul(u32::try_from(n + 1).unwrap_or(u32::MAX));
        grid.step(elapsed);
    }

    println!("HEADLESS SUMMARY:");
    println!("  grid: {}x{}", grid.rows(), grid.cols());
    println!("  frames: {}", grid.frames());
    println!("  peak_lit_cells: {}", peak_lit);
    println!("  last_lit_cells: {}", frame.lit_count());
    println!("  overlay_lit_remaining: {}", grid.overlay_lit_remaining());
    Ok(())
}

fn main() -> std::io::Result<()> {
    env_logger::init();

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);

    let matches = cmd.get_matches_from(env::args_os());
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_charsets {
        print_heading(
            "AVAILABLE CHARSET PRESETS:",
            "NOTE: Use only the VALUE (left side) with --charset.",
        );
        print_list_charsets();
        return Ok(());
    }

    if args.list_colors {
        print_heading(
            "AVAILABLE COLOR THEMES:",
            "NOTE: Use only the VALUE (left side) with --color.",
        );
        print_list_themes();
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = match Settings::from_args(&args, default_to_ascii()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Some(frames) = settings.headless {
        return run_headless(&settings, frames);
    }

    install_exit_handlers();

    // Size and overlay are settled before the alternate screen so a bad
    // overlay is reported on the normal screen.
    let (w, h) = Terminal::size()?;
    let mut grid = build_grid(&settings, w, h);

    let mut term = Terminal::new()?;

    let start_time = Instant::now();
    let end_time = settings.duration.map(|d| start_time + d);
    let mut next_frame = start_time;
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(_, _) => {
                        term.clear()?;
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if settings.screensaver {
                            running = false;
                            break;
                        }
                        if matches!(k.code, KeyCode::Esc | KeyCode::Char('q')) {
                            running = false;
                        }
                    }
                    _ => {}
                }
            }

            if !running {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        grid.render(&mut term)?;
        grid.step(start_time.elapsed());

        next_frame += settings.frame_interval;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    drop(term);
    log::info!(
        "rained {} frames in {:.3}s",
        grid.frames(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
