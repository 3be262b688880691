// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

/// Offsets from the start of a cycle at which the overlay show changes phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeline {
    pub overlay_start: Duration,
    pub rain_stop: Duration,
    pub wash_start: Duration,
    pub cycle_end: Duration,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Phase {
    pub overlay_displayed: bool,
    pub spawning: bool,
    pub washing: bool,
}

impl Timeline {
    pub fn phase_at(&self, t: Duration) -> Phase {
        Phase {
            overlay_displayed: t >= self.overlay_start && t < self.wash_start,
            spawning: t < self.rain_stop,
            washing: t >= self.wash_start && t < self.cycle_end,
        }
    }

    pub fn is_cycle_over(&self, t: Duration) -> bool {
        t >= self.cycle_end
    }

    pub fn is_ordered(&self) -> bool {
        self.overlay_start <= self.rain_stop
            && self.rain_stop <= self.wash_start
            && self.wash_start <= self.cycle_end
            && self.cycle_end > Duration::ZERO
    }
}

impl Phase {
    /// Plain rain with no overlay show.
    pub fn rain_only() -> Self {
        Self {
            overlay_displayed: false,
            spawning: true,
            washing: false,
        }
    }
}
