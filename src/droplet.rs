// Copyright (c) 2026 rezky_nightky

use rand::{seq::IndexedRandom, Rng};

use crate::palette::Palette;

/// A falling streak. Copied from cell to cell as the head moves down, so it
/// carries no identity of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Droplet {
    pub length: u16,
    pub step: u16,
}

impl Droplet {
    pub fn new(length: u16) -> Self {
        Self {
            length: length.max(1),
            step: 1,
        }
    }

    /// Head flickers between the palette's head colours. Body positions map
    /// onto the gradient with `ceil((n - 1) * position / length)`, so ties
    /// land on the darker colour.
    pub fn colour_at<R: Rng + ?Sized>(&self, position: u16, palette: &Palette, rng: &mut R) -> u8 {
        if position == 0 {
            return palette
                .head
                .choose(rng)
                .copied()
                .unwrap_or(palette.flash);
        }

        let gradient = palette.gradient();
        let Some(&darkest) = gradient.last() else {
            return palette.flash;
        };
        gradient
            .get(self.gradient_index(position, gradient.len()))
            .copied()
            .unwrap_or(darkest)
    }

    pub fn gradient_index(&self, position: u16, gradient_len: usize) -> usize {
        if position == 0 || gradient_len == 0 {
            return 0;
        }
        let span = (gradient_len - 1) as u32;
        let len = self.length as u32;
        let idx = (span * position as u32).div_ceil(len);
        (idx as usize).min(gradient_len - 1)
    }

    pub fn next_position(&self, position: u16) -> Option<u16> {
        let next = position.saturating_add(self.step);
        if next >= self.length {
            None
        } else {
            Some(next)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::palette::{build_palette, Theme};

    #[test]
    fn head_colour_comes_from_head_palette() {
        let palette = build_palette(Theme::Forest);
        let mut rng = StdRng::seed_from_u64(3);
        let d = Droplet::new(6);
        for _ in 0..50 {
            assert!(palette.head.contains(&d.colour_at(0, &palette, &mut rng)));
        }
    }

    #[test]
    fn body_index_rounds_ties_towards_tail() {
        let d = Droplet::new(4);
        // (5 - 1) * 2 / 4 == 2 exactly
        assert_eq!(d.gradient_index(2, 5), 2);
        // 4 * 1 / 4 == 1 exactly
        assert_eq!(d.gradient_index(1, 5), 1);
        // 4 * 3 / 4 == 3 exactly
        assert_eq!(d.gradient_index(3, 5), 3);

        let d = Droplet::new(3);
        // 3 * 1 / 3 == 1, 3 * 2 / 3 == 2
        assert_eq!(d.gradient_index(1, 4), 1);
        assert_eq!(d.gradient_index(2, 4), 2);

        let d = Droplet::new(8);
        // 3 * 1 / 8 == 0.375 -> 1, 3 * 3 / 8 == 1.125 -> 2
        assert_eq!(d.gradient_index(1, 4), 1);
        assert_eq!(d.gradient_index(3, 4), 2);
        assert_eq!(d.gradient_index(7, 4), 3);
    }

    #[test]
    fn next_position_ends_at_length() {
        let d = Droplet::new(3);
        assert_eq!(d.next_position(0), Some(1));
        assert_eq!(d.next_position(1), Some(2));
        assert_eq!(d.next_position(2), None);

        let single = Droplet::new(1);
        assert_eq!(single.next_position(0), None);
    }

    #[test]
    fn zero_length_is_clamped_to_one() {
        assert_eq!(Droplet::new(0).length, 1);
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::palette::{build_palette, Theme};

    proptest! {
        #[test]
        fn prop_gradient_never_brightens(length in 1u16..=64, gradient_len in 1usize..12) {
            let d = Droplet::new(length);
            let mut prev = 0usize;
            for pos in 1..length {
                let idx = d.gradient_index(pos, gradient_len);
                prop_assert!(idx >= prev, "index went back from {} to {} at {}", prev, idx, pos);
                prop_assert!(idx < gradient_len);
                prev = idx;
            }
        }

        #[test]
        fn prop_body_never_uses_head_colours(length in 2u16..=32, seed in any::<u64>()) {
            let palette = build_palette(Theme::Forest);
            let mut rng = StdRng::seed_from_u64(seed);
            let d = Droplet::new(length);
            for pos in 1..length {
                let c = d.colour_at(pos, &palette, &mut rng);
                prop_assert!(palette.gradient().contains(&c));
            }
        }

        #[test]
        fn prop_positions_strictly_increase_until_detach(length in 1u16..=64) {
            let d = Droplet::new(length);
            let mut pos = 0u16;
            let mut steps = 1u16;
            while let Some(next) = d.next_position(pos) {
                prop_assert!(next > pos);
                pos = next;
                steps += 1;
            }
            prop_assert_eq!(steps, length);
        }
    }
}
