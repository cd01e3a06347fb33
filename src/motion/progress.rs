use crate::config::{check_positive, check_unit, ConfigError};
use crate::motion::easing::clamp_unit;

/// One sample of the window's scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub scroll_offset_y: f64,
    pub viewport_height: f64,
}

impl ScrollState {
    pub fn new(scroll_offset_y: f64, viewport_height: f64) -> Self {
        Self {
            scroll_offset_y,
            viewport_height,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressConfig {
    /// Height of the hero block as a fraction of the viewport.
    pub hero_height_fraction: f64,
    /// Padding above the grid, as a fraction of the viewport. The transition
    /// starts once this much has been scrolled.
    pub section_padding_fraction: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            hero_height_fraction: 1.0,
            section_padding_fraction: 0.08,
        }
    }
}

impl ProgressConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("hero_height_fraction", self.hero_height_fraction)?;
        check_unit("section_padding_fraction", self.section_padding_fraction)?;
        if self.section_padding_fraction >= self.hero_height_fraction {
            return Err(ConfigError::Unordered(
                "section_padding_fraction < hero_height_fraction",
            ));
        }
        Ok(())
    }

    /// Scroll offset where the transition begins.
    pub fn start(&self, viewport_height: f64) -> f64 {
        viewport_height.max(0.0) * self.section_padding_fraction
    }

    /// Scroll distance over which progress runs from 0 to 1. Never below one pixel.
    pub fn range(&self, viewport_height: f64) -> f64 {
        let range = viewport_height.max(0.0) * self.hero_height_fraction
            - self.start(viewport_height);
        if range.is_finite() {
            range.max(1.0)
        } else {
            1.0
        }
    }

    pub fn progress(&self, state: ScrollState) -> f64 {
        let start = self.start(state.viewport_height);
        let range = self.range(state.viewport_height);
        clamp_unit((state.scroll_offset_y - start) / range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn top_of_page_is_zero() {
        let config = ProgressConfig::default();
        assert_eq!(config.progress(ScrollState::new(0.0, 800.0)), 0.0);
    }

    #[test]
    fn end_of_range_is_one() {
        let config = ProgressConfig::default();
        let end = config.start(800.0) + config.range(800.0);
        assert_eq!(config.progress(ScrollState::new(end, 800.0)), 1.0);
        assert_eq!(config.progress(ScrollState::new(end * 3.0, 800.0)), 1.0);
    }

    #[test]
    fn degenerate_viewport_does_not_divide_by_zero() {
        let config = ProgressConfig::default();
        assert_eq!(config.range(0.0), 1.0);
        assert_eq!(config.progress(ScrollState::new(0.5, 0.0)), 0.5);
        assert_eq!(config.progress(ScrollState::new(f64::NAN, 800.0)), 0.0);
        assert_eq!(config.progress(ScrollState::new(10.0, f64::INFINITY)), 0.0);
    }

    #[test]
    fn rubber_band_overscroll_clamps_to_zero() {
        let config = ProgressConfig::default();
        assert_eq!(config.progress(ScrollState::new(-120.0, 800.0)), 0.0);
    }

    proptest! {
        #[test]
        fn progress_stays_in_unit_range(offset in 0.0f64..1.0e7, height in 0.0f64..5000.0) {
            let p = ProgressConfig::default().progress(ScrollState::new(offset, height));
            prop_assert!((0.0..=1.0).contains(&p));
        }

        #[test]
        fn progress_is_monotonic_in_offset(
            a in 0.0f64..5000.0,
            b in 0.0f64..5000.0,
            height in 1.0f64..3000.0,
        ) {
            let config = ProgressConfig::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                config.progress(ScrollState::new(lo, height))
                    <= config.progress(ScrollState::new(hi, height))
            );
        }
    }
}
