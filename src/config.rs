use log::Level;
use thiserror::Error;

use crate::motion::progress::ProgressConfig;
use crate::motion::sidebar::SidebarConfig;
use crate::motion::tracker::TrackerConfig;
use crate::motion::transition::TransitionConfig;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose logging when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfRange { name: &'static str, value: f64 },
    #[error("breakpoints must be ordered: {0}")]
    Unordered(&'static str),
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("{name} must be above {min}, got {value}")]
    TooLow { name: &'static str, min: f64, value: f64 },
}

pub(crate) fn check_unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value })
    }
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}

pub(crate) fn check_above(name: &'static str, min: f64, value: f64) -> Result<(), ConfigError> {
    if value > min {
        Ok(())
    } else {
        Err(ConfigError::TooLow { name, min, value })
    }
}

/// Every tuned constant of the landing page, grouped per component.
///
/// The defaults were fitted to the landing page markup in `pages::home`;
/// other layouts are expected to override them rather than rely on them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutConfig {
    pub progress: ProgressConfig,
    pub transition: TransitionConfig,
    pub sidebar: SidebarConfig,
    pub tracker: TrackerConfig,
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.progress.validate()?;
        self.transition.validate()?;
        self.sidebar.validate()?;
        self.tracker.validate()
    }

    /// Returns `self` if valid, otherwise logs the problem and falls back
    /// to the defaults.
    pub fn or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("invalid layout config, using defaults: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(LayoutConfig::default().validate(), Ok(()));
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let mut config = LayoutConfig::default();
        config.transition.hold_end = 0.1;
        assert!(config.validate().is_err());
        assert_eq!(config.or_default(), LayoutConfig::default());
    }

    #[test]
    fn check_unit_rejects_nan() {
        assert!(check_unit("x", f64::NAN).is_err());
        assert!(check_unit("x", 1.0).is_ok());
    }

    #[test]
    fn faded_hero_falls_back_to_defaults() {
        let mut config = LayoutConfig::default();
        config.transition.initial_opacity = 0.4;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooLow {
                name: "initial_opacity",
                min: 0.5,
                value: 0.4,
            })
        );
        assert_eq!(config.or_default(), LayoutConfig::default());
    }

    #[test]
    fn infinite_offsets_are_rejected() {
        let mut config = LayoutConfig::default();
        config.sidebar.slide_px = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = LayoutConfig::default();
        config.transition.settle_px = f64::NAN;
        assert!(config.validate().is_err());
    }
}
