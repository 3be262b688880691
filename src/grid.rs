// Copyright (c) 2026 rezky_nightky

use std::io;
use std::path::Path;
use std::time::Duration;

use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};

use crate::cell::{Cell, DropState, Glyph};
use crate::frame::Surface;
use crate::overlay::{Overlay, OverlayError};
use crate::palette::Palette;
use crate::runtime::{Phase, Timeline};

#[derive(Clone, Debug)]
pub struct GridConfig {
    pub rows: u16,
    pub cols: u16,
    pub min_drop_length: u16,
    pub max_drop_length: u16,
    /// Target share of the screen covered by drops.
    pub density: f32,
    /// Per-cell, per-frame chance of starting a glitch.
    pub glitch_chance: f32,
    pub wash_base: f32,
    pub wash_accel: f32,
    pub timeline: Timeline,
    pub palette: Palette,
    pub glyphs: Vec<char>,
}

pub struct Grid {
    rows: u16,
    cols: u16,
    cells: Vec<Cell>,

    min_drop_length: u16,
    max_drop_length: u16,
    density: f32,
    glitch_chance: f32,
    wash_base: f32,
    wash_accel: f32,
    timeline: Timeline,
    palette: Palette,
    glyphs: Vec<char>,

    overlay: Option<Overlay>,
    overlay_members: usize,

    rng: StdRng,

    phase: Phase,
    decay_frames_left: u16,
    cycle_origin: Duration,
    frames: u64,
}

impl Grid {
    pub fn new(cfg: GridConfig) -> Self {
        Self::with_rng(cfg, StdRng::from_os_rng())
    }

    pub fn with_rng(cfg: GridConfig, mut rng: StdRng) -> Self {
        let len = cfg.rows as usize * cfg.cols as usize;
        let mut cells = Vec::with_capacity(len);
        for _ in 0..len {
            let glyph = cfg.glyphs.choose(&mut rng).copied().unwrap_or('0');
            let base = cfg
                .palette
                .lit
                .choose(&mut rng)
                .copied()
                .unwrap_or(cfg.palette.flash);
            cells.push(Cell::new(glyph, base));
        }

        let min_len = cfg.min_drop_length.max(1);
        Self {
            rows: cfg.rows,
            cols: cfg.cols,
            cells,
            min_drop_length: min_len,
            max_drop_length: cfg.max_drop_length.max(min_len),
            density: cfg.density,
            glitch_chance: cfg.glitch_chance,
            wash_base: cfg.wash_base,
            wash_accel: cfg.wash_accel,
            timeline: cfg.timeline,
            palette: cfg.palette,
            glyphs: cfg.glyphs,
            overlay: None,
            overlay_members: 0,
            rng,
            phase: Phase::rain_only(),
            decay_frames_left: 0,
            cycle_origin: Duration::ZERO,
            frames: 0,
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn idx(&self, row: u16, col: u16) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    pub fn cell(&self, row: u16, col: u16) -> &Cell {
        &self.cells[self.idx(row, col)]
    }

    pub fn load_overlay(&mut self, path: &Path) -> Result<(), OverlayError> {
        let overlay = Overlay::load(path, self.rows, self.cols)?;
        self.install_overlay(overlay);
        Ok(())
    }

    #[cfg(test)]
    pub fn set_overlay_text(&mut self, text: &str) -> Result<(), OverlayError> {
        let overlay = Overlay::from_text(text, self.rows, self.cols)?;
        self.install_overlay(overlay);
        Ok(())
    }

    fn install_overlay(&mut self, overlay: Overlay) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let member = overlay.contains(row, col);
                let i = self.idx(row, col);
                let cell = &mut self.cells[i];
                cell.overlay_member = member;
                if member {
                    cell.clear_glitch();
                }
            }
        }
        self.overlay_members = overlay.member_count();
        log::debug!(
            "overlay installed: {} cells, padding {:?}",
            self.overlay_members,
            overlay.padding()
        );
        self.overlay = Some(overlay);
        self.cycle_origin = Duration::ZERO;
        self.phase = Phase::rain_only();
    }

    /// Overlay cells lit on their own, not as part of a passing drop.
    pub fn overlay_lit_remaining(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.overlay_member && c.lit && c.state == DropState::Idle)
            .count()
    }

    fn random_length(&mut self) -> u16 {
        self.rng
            .random_range(self.min_drop_length..=self.max_drop_length)
    }

    pub fn spawn_head(&mut self, col: u16, length: u16) {
        if col >= self.cols || self.rows == 0 {
            return;
        }
        let i = self.idx(0, col);
        self.cells[i].become_drop_head(length);
    }

    /// One simulation step. `elapsed` is time since the animation started.
    pub fn step(&mut self, elapsed: Duration) {
        self.advance();
        self.spawn();
        self.glitch();
        self.update_phases(elapsed);
        self.frames += 1;
    }

    /// Moves every drop down one row. Rows are processed bottom-up so each
    /// cell sees the row above as it was at the start of the frame.
    pub fn advance(&mut self) {
        let overlay_active = self.phase.overlay_displayed;
        let cols = self.cols as usize;

        for row in (1..self.rows as usize).rev() {
            for col in 0..cols {
                let above = &self.cells[(row - 1) * cols + col];
                let above_head = if above.is_head() {
                    above.droplet().map(|d| d.length)
                } else {
                    None
                };
                let cell = &mut self.cells[row * cols + col];
                cell.advance(overlay_active);
                if let Some(length) = above_head {
                    cell.become_drop_head(length);
                }
            }
        }

        if self.rows > 0 {
            for cell in &mut self.cells[..cols] {
                cell.advance(overlay_active);
            }
        }
    }

    /// Spawn probability per top-row cell this frame.
    pub fn spawn_probability(&self) -> f64 {
        let mean = (self.min_drop_length as f64 + self.max_drop_length as f64) / 2.0;
        let scale = if self.phase.spawning {
            1.0
        } else if self.rows == 0 {
            0.0
        } else {
            self.decay_frames_left as f64 / self.rows as f64
        };
        (self.density as f64 / mean * scale).clamp(0.0, 1.0)
    }

    pub fn spawn(&mut self) {
        let p = self.spawn_probability();
        if !self.phase.spawning {
            self.decay_frames_left = self.decay_frames_left.saturating_sub(1);
        }

        if p > 0.0 && self.rows > 0 {
            for col in 0..self.cols {
                if self.rng.random_bool(p) {
                    let length = self.random_length();
                    self.spawn_head(col, length);
                }
            }
        }

        if self.phase.washing {
            self.spawn_wash();
        }
    }

    fn column_has_static_overlay(&self, col: u16) -> bool {
        (0..self.rows).any(|row| {
            let c = self.cell(row, col);
            c.overlay_member && c.lit && c.state == DropState::Idle
        })
    }

    /// Seeds drops at the top edge of the overlay. The chance grows with the
    /// share already washed, so the last columns go quickly.
    fn spawn_wash(&mut self) {
        let Some(overlay) = self.overlay.as_ref() else {
            return;
        };
        if self.overlay_members == 0 {
            return;
        }
        let remaining = self.overlay_lit_remaining();
        if remaining == 0 {
            return;
        }

        let washed = 1.0 - remaining as f64 / self.overlay_members as f64;
        let p = (self.wash_base as f64 * (1.0 + self.wash_accel as f64 * washed)).clamp(0.0, 1.0);
        if p <= 0.0 {
            return;
        }

        let seeds: Vec<(u16, u16)> = overlay
            .top_cells()
            .iter()
            .enumerate()
            .filter_map(|(col, top)| top.map(|row| (row, col as u16)))
            .collect();

        for (row, col) in seeds {
            if !self.column_has_static_overlay(col) {
                continue;
            }
            let i = self.idx(row, col);
            if self.cells[i].state != DropState::Idle {
                continue;
            }
            if self.rng.random_bool(p) {
                let length = self.random_length();
                self.cells[i].become_drop_head(length);
            }
        }
    }

    pub fn glitch(&mut self) {
        let chance = self.glitch_chance.clamp(0.0, 1.0) as f64;
        for i in 0..self.cells.len() {
            if self.cells[i].is_glitching() {
                self.cells[i].tick_glitch(&self.palette);
                continue;
            }
            if chance <= 0.0 || self.cells[i].overlay_member {
                continue;
            }
            if self.rng.random_bool(chance) {
                let glyph = self.glyphs.choose(&mut self.rng).copied().unwrap_or('0');
                self.cells[i].start_glitch(glyph, &self.palette);
            }
        }
    }

    pub fn update_phases(&mut self, elapsed: Duration) {
        if self.overlay.is_none() {
            self.phase = Phase::rain_only();
            return;
        }

        let mut t = elapsed.saturating_sub(self.cycle_origin);
        if self.timeline.is_cycle_over(t) {
            self.end_cycle();
            self.cycle_origin = elapsed;
            t = Duration::ZERO;
        }

        let next = self.timeline.phase_at(t);

        if next.overlay_displayed && !self.phase.overlay_displayed {
            log::info!("overlay shown ({} cells)", self.overlay_members);
            for cell in self.cells.iter_mut().filter(|c| c.overlay_member) {
                cell.lit = true;
            }
        }

        if !next.spawning && self.phase.spawning {
            log::info!("rain stopping over {} frames", self.rows);
            self.decay_frames_left = self.rows;
        }

        if next.washing && !self.phase.washing {
            log::info!(
                "washing overlay ({} cells still lit)",
                self.overlay_lit_remaining()
            );
        }

        self.phase = next;
    }

    fn end_cycle(&mut self) {
        log::info!(
            "cycle ended after {} frames ({} overlay cells left lit)",
            self.frames,
            self.overlay_lit_remaining()
        );
        for cell in self
            .cells
            .iter_mut()
            .filter(|c| c.overlay_member && c.state == DropState::Idle)
        {
            cell.lit = false;
        }
        self.phase = Phase::rain_only();
        self.decay_frames_left = 0;
    }

    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) -> io::Result<()> {
        surface.reset_cursor()?;
        let cols = self.cols as usize;
        for row in 0..self.rows as usize {
            for cell in &self.cells[row * cols..(row + 1) * cols] {
                match cell.render(&self.palette, &mut self.rng) {
                    Glyph::Lit { ch, colour } => surface.write_glyph(ch, colour)?,
                    Glyph::Blank => surface.write_blank()?,
                }
            }
            if row + 1 < self.rows as usize {
                surface.end_row()?;
            }
        }
        surface.flush()
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;
    use crate::palette::{build_palette, Theme};

    fn grid(rows: u16, cols: u16, length: u16) -> Grid {
        let cfg = GridConfig {
            rows,
            cols,
            min_drop_length: length,
            max_drop_length: length,
            density: 0.0,
            glitch_chance: 0.0,
            wash_base: 0.0,
            wash_accel: 0.0,
            timeline: Timeline {
                overlay_start: Duration::from_secs(1),
                rain_stop: Duration::from_secs(2),
                wash_start: Duration::from_secs(3),
                cycle_end: Duration::from_secs(4),
            },
            palette: build_palette(Theme::Forest),
            glyphs: vec!['x'],
        };
        Grid::with_rng(cfg, StdRng::seed_from_u64(7))
    }

    proptest! {
        #[test]
        fn prop_head_reaches_row_r_after_r_frames(
            rows in 2u16..30,
            col in 0u16..6,
            length in 1u16..16,
        ) {
            let mut g = grid(rows, 6, length);
            g.spawn_head(col, length);
            for r in 1..rows {
                g.advance();
                prop_assert!(g.cell(r, col).is_head(), "row {} not head", r);
            }
        }

        #[test]
        fn prop_top_cell_detaches_after_length_frames(length in 1u16..20, rows in 1u16..12) {
            let mut g = grid(rows, 2, length);
            g.spawn_head(1, length);
            for _ in 1..length {
                g.advance();
                prop_assert!(g.cell(0, 1).lit);
            }
            g.advance();
            prop_assert_eq!(g.cell(0, 1).state, DropState::Idle);
            prop_assert!(!g.cell(0, 1).lit);
        }

        #[test]
        fn prop_spawned_lengths_stay_in_range(min in 1u16..8, extra in 0u16..8, seed in any::<u64>()) {
            let max = min + extra;
            let cfg = GridConfig {
                rows: 3,
                cols: 16,
                min_drop_length: min,
                max_drop_length: max,
                density: 100.0,
                glitch_chance: 0.0,
                wash_base: 0.0,
                wash_accel: 0.0,
                timeline: Timeline {
                    overlay_start: Duration::from_secs(1),
                    rain_stop: Duration::from_secs(2),
                    wash_start: Duration::from_secs(3),
                    cycle_end: Duration::from_secs(4),
                },
                palette: build_palette(Theme::Forest),
                glyphs: vec!['x'],
            };
            let mut g = Grid::with_rng(cfg, StdRng::seed_from_u64(seed));
            g.spawn();
            for col in 0..16 {
                let d = g.cell(0, col).droplet();
                prop_assert!(d.is_some());
                let len = d.map(|d| d.length).unwrap_or(0);
                prop_assert!(len >= min && len <= max);
            }
        }
    }
}
