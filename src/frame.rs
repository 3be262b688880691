// Copyright (c) 2026 rezky_nightky

use std::io::Result;

use crate::cell::Glyph;

/// Where a rendered grid goes. The grid walks its cells row-major and calls
/// these in order; implementations decide how glyphs reach the screen.
pub trait Surface {
    fn reset_cursor(&mut self) -> Result<()>;
    fn write_glyph(&mut self, ch: char, colour: u8) -> Result<()>;
    fn write_blank(&mut self) -> Result<()>;
    fn end_row(&mut self) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

/// In-memory surface holding the last rendered frame.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Glyph>,
    cursor: usize,
    pub frames: u64,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Glyph::Blank; len],
            cursor: 0,
            frames: 0,
        }
    }

    #[cfg(test)]
    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn lit_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|g| matches!(g, Glyph::Lit { .. }))
            .count()
    }

    /// Writes at the cursor. Glyphs past the last row are dropped.
    fn put(&mut self, g: Glyph) {
        if self.cursor < self.width as usize * self.height as usize {
            self.cells[self.cursor] = g;
        }
        self.cursor += 1;
    }
}

impl Surface for Frame {
    fn reset_cursor(&mut self) -> Result<()> {
        self.cursor = 0;
        self.frames += 1;
        Ok(())
    }

    fn write_glyph(&mut self, ch: char, colour: u8) -> Result<()> {
        self.put(Glyph::Lit { ch, colour });
        Ok(())
    }

    fn write_blank(&mut self) -> Result<()> {
        self.put(Glyph::Blank);
        Ok(())
    }

    fn end_row(&mut self) -> Result<()> {
        let w = self.width.max(1) as usize;
        let rem = self.cursor % w;
        if rem != 0 {
            self.cursor += w - rem;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_cursor_rewinds_to_origin() {
        let mut f = Frame::new(2, 2);
        f.reset_cursor().unwrap();
        f.write_glyph('x', 48).unwrap();
        f.write_blank().unwrap();
        f.end_row().unwrap();
        f.write_glyph('y', 41).unwrap();
        assert_eq!(f.get(0, 1), Some(Glyph::Lit { ch: 'y', colour: 41 }));

        f.reset_cursor().unwrap();
        f.write_blank().unwrap();
        assert_eq!(f.get(0, 0), Some(Glyph::Blank));
        assert_eq!(f.frames, 2);
    }

    #[test]
    fn short_row_is_padded_by_end_row() {
        let mut f = Frame::new(3, 2);
        f.reset_cursor().unwrap();
        f.write_glyph('a', 1).unwrap();
        f.end_row().unwrap();
        f.write_glyph('b', 2).unwrap();
        assert_eq!(f.get(0, 1), Some(Glyph::Lit { ch: 'b', colour: 2 }));
        assert_eq!(f.lit_count(), 2);
    }

    #[test]
    fn writes_past_last_row_are_dropped() {
        let mut f = Frame::new(2, 1);
        f.reset_cursor().unwrap();
        f.write_glyph('a', 1).unwrap();
        f.write_glyph('b', 2).unwrap();
        f.end_row().unwrap();
        f.write_glyph('c', 3).unwrap();
        assert_eq!(f.cells.len(), 2);
        assert_eq!(f.lit_count(), 2);
        assert_eq!(f.get(0, 1), None);
    }
}
