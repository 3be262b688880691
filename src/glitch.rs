// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlitchStep {
    /// Swap in the glitch glyph at the palette's flash colour.
    Flash,
    /// Keep the cell's glyph but paint it in the background colour.
    Hidden,
    /// Drop all overrides.
    Clear,
}

const SCRIPT: [GlitchStep; 6] = [
    GlitchStep::Flash,
    GlitchStep::Flash,
    GlitchStep::Hidden,
    GlitchStep::Hidden,
    GlitchStep::Hidden,
    GlitchStep::Clear,
];

/// A running glitch on one cell. Plays one script step per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glitch {
    pub glyph: char,
    step: usize,
}

impl Glitch {
    pub fn new(glyph: char) -> Self {
        Self { glyph, step: 0 }
    }

    #[cfg(test)]
    pub fn frames() -> usize {
        SCRIPT.len()
    }
}

impl Iterator for Glitch {
    type Item = GlitchStep;

    fn next(&mut self) -> Option<GlitchStep> {
        let s = SCRIPT.get(self.step).copied()?;
        self.step += 1;
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_flashes_then_hides_then_clears() {
        let steps: Vec<_> = Glitch::new('x').collect();
        assert_eq!(steps.len(), Glitch::frames());
        assert_eq!(steps.first(), Some(&GlitchStep::Flash));
        assert_eq!(steps.last(), Some(&GlitchStep::Clear));
        let first_hidden = steps.iter().position(|s| *s == GlitchStep::Hidden).unwrap();
        assert!(steps[..first_hidden].iter().all(|s| *s == GlitchStep::Flash));
    }
}
