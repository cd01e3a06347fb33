use crate::config::{check_above, check_finite, check_unit, ConfigError};
use crate::dom::StyleSink;
use crate::motion::easing::{clamp_unit, ease_in_out_cubic, lerp, local_fraction};

/// Box of the tracked hero image, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStyle {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub opacity: f64,
}

impl BoxStyle {
    pub fn lerp(&self, to: &BoxStyle, t: f64) -> BoxStyle {
        BoxStyle {
            top: lerp(self.top, to.top, t),
            left: lerp(self.left, to.left, t),
            width: lerp(self.width, to.width, t),
            height: lerp(self.height, to.height, t),
            radius: lerp(self.radius, to.radius, t),
            opacity: lerp(self.opacity, to.opacity, t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Rise,
    Hold,
    Morph,
    Settle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionConfig {
    pub rise_end: f64,
    pub hold_end: f64,
    pub morph_end: f64,
    /// Progress where the tracked image starts handing over to the first tile.
    pub crossfade_start: f64,
    /// How far the hero image lifts during the rise phase.
    pub rise_px: f64,
    /// Vertical offset from the final box at the end of the morph phase.
    pub settle_px: f64,
    /// Hero opacity at progress 0. Kept above 0.5 so the hero reads as the
    /// visible element until the crossfade.
    pub initial_opacity: f64,
    /// Corner radius of the catalog tiles the hero lands on.
    pub tile_radius_px: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            rise_end: 0.3,
            hold_end: 0.4,
            morph_end: 0.9,
            crossfade_start: 0.85,
            rise_px: 48.0,
            settle_px: 12.0,
            initial_opacity: 0.75,
            tile_radius_px: 16.0,
        }
    }
}

impl TransitionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("rise_end", self.rise_end)?;
        check_unit("hold_end", self.hold_end)?;
        check_unit("morph_end", self.morph_end)?;
        check_unit("crossfade_start", self.crossfade_start)?;
        check_unit("initial_opacity", self.initial_opacity)?;
        check_above("initial_opacity", 0.5, self.initial_opacity)?;
        check_finite("rise_px", self.rise_px)?;
        check_finite("settle_px", self.settle_px)?;
        check_finite("tile_radius_px", self.tile_radius_px)?;
        if !(self.rise_end <= self.hold_end && self.hold_end <= self.morph_end) {
            return Err(ConfigError::Unordered("rise_end <= hold_end <= morph_end"));
        }
        if self.crossfade_start < self.rise_end || self.crossfade_start >= 1.0 {
            return Err(ConfigError::Unordered("rise_end <= crossfade_start < 1"));
        }
        Ok(())
    }

    pub fn phase_at(&self, progress: f64) -> Phase {
        if progress < self.rise_end {
            Phase::Rise
        } else if progress < self.hold_end {
            Phase::Hold
        } else if progress < self.morph_end {
            Phase::Morph
        } else {
            Phase::Settle
        }
    }
}

/// Measured endpoints of the transition: where the hero sits and where the
/// first catalog tile sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframes {
    pub initial: BoxStyle,
    pub target: BoxStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrame {
    pub progress: f64,
    pub tracked: BoxStyle,
    pub tile_opacity: f64,
}

impl TransitionFrame {
    /// Writes the frame. Without a tracked element there is nothing to move,
    /// so the tile is left alone as well.
    pub fn apply(&self, tracked: Option<&dyn StyleSink>, tile: Option<&dyn StyleSink>) {
        let Some(tracked) = tracked else {
            return;
        };
        let b = &self.tracked;
        tracked.set_style("top", &format!("{:.2}px", b.top));
        tracked.set_style("left", &format!("{:.2}px", b.left));
        tracked.set_style("width", &format!("{:.2}px", b.width));
        tracked.set_style("height", &format!("{:.2}px", b.height));
        tracked.set_style("border-radius", &format!("{:.2}px", b.radius));
        tracked.set_style("opacity", &format!("{:.3}", b.opacity));
        if let Some(tile) = tile {
            tile.set_style("opacity", &format!("{:.3}", self.tile_opacity));
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransitionAnimator {
    config: TransitionConfig,
}

impl TransitionAnimator {
    pub fn new(config: TransitionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Initial box of the hero: its measured rectangle at the configured opacity.
    pub fn keyframes(&self, hero: BoxStyle, tile: BoxStyle) -> Keyframes {
        Keyframes {
            initial: BoxStyle {
                opacity: self.config.initial_opacity,
                ..hero
            },
            target: BoxStyle {
                opacity: 1.0,
                ..tile
            },
        }
    }

    pub fn frame(&self, progress: f64, keys: &Keyframes) -> TransitionFrame {
        let c = &self.config;
        let progress = clamp_unit(progress);

        let raised = BoxStyle {
            top: keys.initial.top - c.rise_px,
            opacity: 1.0,
            ..keys.initial
        };
        let approach = BoxStyle {
            top: keys.target.top + c.settle_px,
            ..keys.target
        };

        let mut tracked = match c.phase_at(progress) {
            Phase::Rise => {
                let t = ease_in_out_cubic(local_fraction(progress, 0.0, c.rise_end));
                keys.initial.lerp(&raised, t)
            }
            Phase::Hold => raised,
            Phase::Morph => {
                let t = ease_in_out_cubic(local_fraction(progress, c.hold_end, c.morph_end));
                raised.lerp(&approach, t)
            }
            Phase::Settle => {
                let t = ease_in_out_cubic(local_fraction(progress, c.morph_end, 1.0));
                approach.lerp(&keys.target, t)
            }
        };

        let mut tile_opacity = 0.0;
        if progress >= c.crossfade_start {
            let f = ease_in_out_cubic(local_fraction(progress, c.crossfade_start, 1.0));
            tracked.opacity *= 1.0 - f;
            tile_opacity = f;
        }

        TransitionFrame {
            progress,
            tracked,
            tile_opacity,
        }
    }
}
