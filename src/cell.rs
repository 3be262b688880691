// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::droplet::Droplet;
use crate::glitch::{Glitch, GlitchStep};
use crate::palette::Palette;

/// What a cell puts on screen this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Blank,
    Lit { ch: char, colour: u8 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropState {
    Idle,
    InDrop { droplet: Droplet, position: u16 },
}

#[derive(Clone, Debug)]
pub struct Cell {
    pub glyph: char,
    pub override_glyph: Option<char>,
    pub base_colour: u8,
    pub override_colour: Option<u8>,
    pub lit: bool,
    pub overlay_member: bool,
    pub state: DropState,
    glitch: Option<Glitch>,
}

impl Cell {
    pub fn new(glyph: char, base_colour: u8) -> Self {
        Self {
            glyph,
            override_glyph: None,
            base_colour,
            override_colour: None,
            lit: false,
            overlay_member: false,
            state: DropState::Idle,
            glitch: None,
        }
    }

    pub fn position(&self) -> Option<u16> {
        match self.state {
            DropState::InDrop { position, .. } => Some(position),
            DropState::Idle => None,
        }
    }

    pub fn droplet(&self) -> Option<Droplet> {
        match self.state {
            DropState::InDrop { droplet, .. } => Some(droplet),
            DropState::Idle => None,
        }
    }

    pub fn is_head(&self) -> bool {
        self.position() == Some(0)
    }

    pub fn is_glitching(&self) -> bool {
        self.glitch.is_some()
    }

    pub fn resolve_colour<R: Rng + ?Sized>(&self, palette: &Palette, rng: &mut R) -> u8 {
        if let Some(c) = self.override_colour {
            return c;
        }
        match self.state {
            DropState::InDrop { droplet, position } => droplet.colour_at(position, palette, rng),
            DropState::Idle => self.base_colour,
        }
    }

    pub fn render<R: Rng + ?Sized>(&self, palette: &Palette, rng: &mut R) -> Glyph {
        if !self.lit {
            return Glyph::Blank;
        }
        Glyph::Lit {
            ch: self.override_glyph.unwrap_or(self.glyph),
            colour: self.resolve_colour(palette, rng),
        }
    }

    pub fn become_drop_head(&mut self, length: u16) {
        self.state = DropState::InDrop {
            droplet: Droplet::new(length),
            position: 0,
        };
        self.lit = true;
    }

    pub fn advance(&mut self, overlay_active: bool) {
        let DropState::InDrop { droplet, position } = self.state else {
            return;
        };
        match droplet.next_position(position) {
            Some(next) => {
                self.state = DropState::InDrop {
                    droplet,
                    position: next,
                };
            }
            None => {
                self.state = DropState::Idle;
                self.lit = overlay_active && self.overlay_member;
            }
        }
    }

    pub fn start_glitch(&mut self, glyph: char, palette: &Palette) {
        self.glitch = Some(Glitch::new(glyph));
        self.tick_glitch(palette);
    }

    /// Plays the next step of a running glitch. No-op without one.
    pub fn tick_glitch(&mut self, palette: &Palette) {
        let Some(glitch) = self.glitch.as_mut() else {
            return;
        };
        let glyph = glitch.glyph;
        match glitch.next() {
            Some(GlitchStep::Flash) => {
                self.override_glyph = Some(glyph);
                self.override_colour = Some(palette.flash);
            }
            Some(GlitchStep::Hidden) => {
                self.override_glyph = None;
                self.override_colour = Some(palette.hidden);
            }
            Some(GlitchStep::Clear) | None => {
                self.clear_glitch();
            }
        }
    }

    pub fn clear_glitch(&mut self) {
        self.glitch = None;
        self.override_glyph = None;
        self.override_colour = None;
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::glitch::Glitch;
    use crate::palette::{build_palette, Theme};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn dark_cell_renders_blank() {
        let palette = build_palette(Theme::Forest);
        let mut c = Cell::new('x', 48);
        c.override_colour = Some(231);
        assert_eq!(c.render(&palette, &mut rng()), Glyph::Blank);
    }

    #[test]
    fn idle_lit_cell_uses_base_colour() {
        let palette = build_palette(Theme::Forest);
        let mut c = Cell::new('x', 41);
        c.lit = true;
        assert_eq!(
            c.render(&palette, &mut rng()),
            Glyph::Lit { ch: 'x', colour: 41 }
        );
    }

    #[test]
    fn override_colour_beats_drop_colour() {
        let palette = build_palette(Theme::Forest);
        let mut c = Cell::new('x', 41);
        c.become_drop_head(5);
        c.override_colour = Some(16);
        c.override_glyph = Some('y');
        assert_eq!(
            c.render(&palette, &mut rng()),
            Glyph::Lit { ch: 'y', colour: 16 }
        );
    }

    #[test]
    fn advance_detaches_after_length_steps() {
        let mut c = Cell::new('x', 41);
        c.become_drop_head(3);
        assert!(c.is_head());
        c.advance(false);
        assert_eq!(c.position(), Some(1));
        c.advance(false);
        assert_eq!(c.position(), Some(2));
        c.advance(false);
        assert_eq!(c.state, DropState::Idle);
        assert!(!c.lit);
    }

    #[test]
    fn detached_overlay_member_stays_lit_only_while_overlay_active() {
        let mut c = Cell::new('x', 41);
        c.overlay_member = true;
        c.become_drop_head(1);
        c.advance(true);
        assert!(c.lit);
        assert_eq!(c.state, DropState::Idle);

        c.become_drop_head(1);
        c.advance(false);
        assert!(!c.lit);
    }

    #[test]
    fn advance_on_idle_cell_is_noop() {
        let mut c = Cell::new('x', 41);
        c.lit = true;
        c.advance(false);
        assert!(c.lit);
        assert_eq!(c.state, DropState::Idle);
    }

    #[test]
    fn glitch_runs_its_script_and_clears() {
        let palette = build_palette(Theme::Forest);
        let mut c = Cell::new('x', 41);
        c.start_glitch('g', &palette);
        assert_eq!(c.override_glyph, Some('g'));
        assert_eq!(c.override_colour, Some(palette.flash));

        for _ in 1..Glitch::frames() {
            c.tick_glitch(&palette);
        }
        assert!(!c.is_glitching());
        assert_eq!(c.override_glyph, None);
        assert_eq!(c.override_colour, None);
    }

    #[test]
    fn glitch_hides_with_background_colour() {
        let palette = build_palette(Theme::Forest);
        let mut c = Cell::new('x', 41);
        c.start_glitch('g', &palette);
        c.tick_glitch(&palette);
        c.tick_glitch(&palette);
        assert_eq!(c.override_colour, Some(palette.hidden));
        assert_eq!(c.override_glyph, None);
    }
}
