use crate::config::{check_finite, check_positive, check_unit, ConfigError};
use crate::motion::easing::{ease_in_out_cubic, lerp, local_fraction};

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarConfig {
    /// Scroll offset, as a fraction of the viewport, past which the sidebar shows.
    pub threshold_fraction: f64,
    /// Distance below the viewport, as a fraction of it, inside which the
    /// footer counts as near.
    pub footer_buffer_fraction: f64,
    pub duration_ms: f64,
    /// Vertical slide distance of the hidden pose.
    pub slide_px: f64,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            threshold_fraction: 0.8,
            footer_buffer_fraction: 0.35,
            duration_ms: 300.0,
            slide_px: 24.0,
        }
    }
}

impl SidebarConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("threshold_fraction", self.threshold_fraction)?;
        check_unit("footer_buffer_fraction", self.footer_buffer_fraction)?;
        check_positive("duration_ms", self.duration_ms)?;
        check_finite("slide_px", self.slide_px)
    }

    /// `footer_top` is the footer's top edge relative to the viewport top,
    /// `None` when the page has no footer.
    pub fn near_footer(&self, footer_top: Option<f64>, viewport_height: f64) -> bool {
        match footer_top {
            Some(top) => top - viewport_height <= self.footer_buffer_fraction * viewport_height,
            None => false,
        }
    }

    pub fn wants_visible(&self, scroll_offset: f64, viewport_height: f64, near_footer: bool) -> bool {
        !near_footer && scroll_offset > self.threshold_fraction * viewport_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarPhase {
    Hidden,
    Appearing,
    Visible,
    Disappearing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub opacity: f64,
    pub translate_y: f64,
}

impl Pose {
    pub fn lerp(&self, to: &Pose, t: f64) -> Pose {
        Pose {
            opacity: lerp(self.opacity, to.opacity, t),
            translate_y: lerp(self.translate_y, to.translate_y, t),
        }
    }

    pub fn transform(&self) -> String {
        format!("translateY({:.2}px)", self.translate_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: Pose,
    to: Pose,
    start_ms: f64,
    duration_ms: f64,
}

impl Tween {
    fn sample(&self, now_ms: f64) -> Pose {
        let t = local_fraction(now_ms, self.start_ms, self.start_ms + self.duration_ms);
        self.from.lerp(&self.to, ease_in_out_cubic(t))
    }

    fn is_done(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= self.duration_ms
    }
}

/// A phase change the driver has to act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SidebarTransition {
    pub phase: SidebarPhase,
    pub from: Pose,
    pub to: Pose,
    pub duration_ms: f64,
}

#[derive(Debug, Clone)]
pub struct SidebarController {
    config: SidebarConfig,
    phase: SidebarPhase,
    tween: Option<Tween>,
}

impl SidebarController {
    pub fn new(config: SidebarConfig) -> Self {
        Self {
            config,
            phase: SidebarPhase::Hidden,
            tween: None,
        }
    }

    pub fn config(&self) -> &SidebarConfig {
        &self.config
    }

    pub fn phase(&self) -> SidebarPhase {
        self.phase
    }

    pub fn hidden_pose(&self) -> Pose {
        Pose {
            opacity: 0.0,
            translate_y: self.config.slide_px,
        }
    }

    pub fn visible_pose(&self) -> Pose {
        Pose {
            opacity: 1.0,
            translate_y: 0.0,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, SidebarPhase::Appearing | SidebarPhase::Disappearing)
    }

    /// Pose at `now_ms` without advancing the state machine.
    pub fn pose(&self, now_ms: f64) -> Pose {
        match (self.phase, &self.tween) {
            (SidebarPhase::Appearing | SidebarPhase::Disappearing, Some(tween)) => tween.sample(now_ms),
            (SidebarPhase::Visible | SidebarPhase::Appearing, _) => self.visible_pose(),
            (SidebarPhase::Hidden | SidebarPhase::Disappearing, _) => self.hidden_pose(),
        }
    }

    /// Feeds the latest visibility wish. Starts (or reverses) an animation
    /// when the wish disagrees with where the sidebar is heading.
    pub fn set_wanted(&mut self, visible: bool, now_ms: f64) -> Option<SidebarTransition> {
        let heading_visible = matches!(self.phase, SidebarPhase::Appearing | SidebarPhase::Visible);
        if visible == heading_visible {
            return None;
        }
        // Reversal starts from wherever the in-flight tween currently is.
        let from = self.pose(now_ms);
        let (phase, to) = if visible {
            (SidebarPhase::Appearing, self.visible_pose())
        } else {
            (SidebarPhase::Disappearing, self.hidden_pose())
        };
        self.phase = phase;
        self.tween = Some(Tween {
            from,
            to,
            start_ms: now_ms,
            duration_ms: self.config.duration_ms,
        });
        Some(SidebarTransition {
            phase,
            from,
            to,
            duration_ms: self.config.duration_ms,
        })
    }

    /// Advances the machine to `now_ms` and returns the pose to show.
    pub fn tick(&mut self, now_ms: f64) -> Pose {
        let pose = self.pose(now_ms);
        if let Some(tween) = self.tween {
            if tween.is_done(now_ms) {
                self.phase = match self.phase {
                    SidebarPhase::Appearing => SidebarPhase::Visible,
                    SidebarPhase::Disappearing => SidebarPhase::Hidden,
                    settled => settled,
                };
                self.tween = None;
            }
        }
        pose
    }

    /// Drops any in-flight animation, settling at the current target.
    pub fn cancel(&mut self) {
        self.phase = match self.phase {
            SidebarPhase::Appearing | SidebarPhase::Visible => SidebarPhase::Visible,
            SidebarPhase::Disappearing | SidebarPhase::Hidden => SidebarPhase::Hidden,
        };
        self.tween = None;
    }
}
