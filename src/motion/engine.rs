use crate::config::LayoutConfig;
use crate::motion::progress::{ProgressConfig, ScrollState};
use crate::motion::sidebar::{Pose, SidebarController, SidebarTransition};
use crate::motion::transition::{Keyframes, TransitionAnimator, TransitionFrame};

/// Collapses bursts of scroll and resize events into a single pending frame.
#[derive(Debug, Default)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// Returns `true` when the caller must schedule a frame; `false` when
    /// one is already on its way.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Called at the start of the scheduled frame.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn reset(&mut self) {
        self.pending = false;
    }
}

/// What one sampled frame should look like.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineFrame {
    pub progress: f64,
    /// `None` when the hero or the first tile could not be measured.
    pub transition: Option<TransitionFrame>,
    pub near_footer: bool,
    pub sidebar: Pose,
    pub sidebar_change: Option<SidebarTransition>,
    /// The sidebar is mid-animation and wants another frame.
    pub needs_frame: bool,
}

/// Pull-based core: sample the page, call [`tick`](Self::tick), write the result.
#[derive(Debug, Clone)]
pub struct ScrollEngine {
    progress: ProgressConfig,
    animator: TransitionAnimator,
    sidebar: SidebarController,
}

impl ScrollEngine {
    pub fn new(config: LayoutConfig) -> Self {
        let config = config.or_default();
        Self {
            progress: config.progress,
            animator: TransitionAnimator::new(config.transition),
            sidebar: SidebarController::new(config.sidebar),
        }
    }

    pub fn animator(&self) -> &TransitionAnimator {
        &self.animator
    }

    pub fn sidebar(&self) -> &SidebarController {
        &self.sidebar
    }

    pub fn tick(
        &mut self,
        scroll: ScrollState,
        footer_top: Option<f64>,
        keys: Option<&Keyframes>,
        now_ms: f64,
    ) -> EngineFrame {
        let progress = self.progress.progress(scroll);
        let transition = keys.map(|keys| self.animator.frame(progress, keys));

        let config = self.sidebar.config();
        let near_footer = config.near_footer(footer_top, scroll.viewport_height);
        let wanted = config.wants_visible(scroll.scroll_offset_y, scroll.viewport_height, near_footer);
        let sidebar_change = self.sidebar.set_wanted(wanted, now_ms);
        let sidebar = self.sidebar.tick(now_ms);

        EngineFrame {
            progress,
            transition,
            near_footer,
            sidebar,
            sidebar_change,
            needs_frame: self.sidebar.is_animating(),
        }
    }

    pub fn cancel(&mut self) {
        self.sidebar.cancel();
    }
}

impl Default for ScrollEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::sidebar::SidebarPhase;
    use crate::motion::transition::BoxStyle;

    fn keys(engine: &ScrollEngine) -> Keyframes {
        let hero = BoxStyle {
            top: 80.0,
            left: 0.0,
            width: 1200.0,
            height: 600.0,
            radius: 0.0,
            opacity: 1.0,
        };
        let tile = BoxStyle {
            top: 120.0,
            left: 40.0,
            width: 300.0,
            height: 200.0,
            radius: 12.0,
            opacity: 1.0,
        };
        engine.animator().keyframes(hero, tile)
    }

    #[test]
    fn gate_coalesces_bursts() {
        let mut gate = FrameGate::default();
        assert!(gate.request());
        assert!(!gate.request());
        assert!(!gate.request());
        assert!(gate.take());
        assert!(!gate.is_pending());
        assert!(gate.request());
    }

    #[test]
    fn top_of_page_scenario() {
        let mut engine = ScrollEngine::default();
        let keys = keys(&engine);
        let frame = engine.tick(ScrollState::new(0.0, 800.0), Some(3000.0), Some(&keys), 0.0);
        assert_eq!(frame.progress, 0.0);
        assert_eq!(frame.sidebar_change, None);
        assert_eq!(engine.sidebar().phase(), SidebarPhase::Hidden);
        assert!(!frame.needs_frame);
    }

    #[test]
    fn end_of_transition_scenario() {
        let mut engine = ScrollEngine::default();
        let keys = keys(&engine);
        let progress = ProgressConfig::default();
        let end = progress.start(800.0) + progress.range(800.0);
        let frame = engine.tick(ScrollState::new(end, 800.0), Some(3000.0), Some(&keys), 0.0);
        assert_eq!(frame.progress, 1.0);
        let transition = frame.transition.expect("keyframes were given");
        assert_eq!(transition.tracked.opacity, 0.0);
        assert_eq!(transition.tile_opacity, 1.0);
    }

    #[test]
    fn footer_keeps_sidebar_hidden_past_threshold() {
        let mut engine = ScrollEngine::default();
        let frame = engine.tick(ScrollState::new(4000.0, 800.0), Some(900.0), None, 0.0);
        assert!(frame.near_footer);
        assert_eq!(frame.sidebar_change, None);
        assert_eq!(engine.sidebar().phase(), SidebarPhase::Hidden);
    }

    #[test]
    fn sidebar_animates_across_frames() {
        let mut engine = ScrollEngine::default();
        let state = ScrollState::new(1200.0, 800.0);
        let first = engine.tick(state, Some(5000.0), None, 0.0);
        assert!(first.sidebar_change.is_some());
        assert!(first.needs_frame);
        assert!(first.transition.is_none());

        let last = engine.tick(state, Some(5000.0), None, 1000.0);
        assert_eq!(last.sidebar.opacity, 1.0);
        assert!(!last.needs_frame);
        assert_eq!(engine.sidebar().phase(), SidebarPhase::Visible);
    }
}
