use crate::dom::StyleSink;
use crate::motion::sidebar::{Pose, SidebarTransition};

/// How sidebar poses reach the page. Picked once when the page controller
/// is built.
pub trait PoseDriver {
    fn name(&self) -> &'static str;

    /// A new transition started, possibly reversing one in flight.
    fn begin(&mut self, target: &dyn StyleSink, transition: &SidebarTransition);

    /// Called every engine frame with the sampled pose.
    fn frame(&mut self, target: &dyn StyleSink, pose: &Pose);

    /// Stops whatever is in flight and leaves `pose` on screen.
    fn cancel(&mut self, target: &dyn StyleSink, pose: &Pose);
}

fn write_pose(target: &dyn StyleSink, pose: &Pose) {
    target.set_style("opacity", &format!("{:.3}", pose.opacity));
    target.set_style("transform", &pose.transform());
}

/// Lets the browser interpolate. Retargeting a running CSS transition
/// continues from the computed value, so reversals never snap.
#[derive(Debug, Default)]
pub struct CssTransitionDriver;

impl PoseDriver for CssTransitionDriver {
    fn name(&self) -> &'static str {
        "css-transition"
    }

    fn begin(&mut self, target: &dyn StyleSink, transition: &SidebarTransition) {
        target.set_style(
            "transition",
            &format!(
                "opacity {ms:.0}ms ease-in-out, transform {ms:.0}ms ease-in-out",
                ms = transition.duration_ms
            ),
        );
        write_pose(target, &transition.to);
        target.toggle_class("visible", transition.to.opacity > 0.0);
    }

    fn frame(&mut self, _target: &dyn StyleSink, _pose: &Pose) {}

    fn cancel(&mut self, target: &dyn StyleSink, pose: &Pose) {
        target.set_style("transition", "none");
        write_pose(target, pose);
    }
}

/// Writes the sampled pose inline every frame.
#[derive(Debug, Default)]
pub struct ManualDriver {
    last: Option<Pose>,
}

impl PoseDriver for ManualDriver {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn begin(&mut self, target: &dyn StyleSink, transition: &SidebarTransition) {
        target.set_style("transition", "none");
        target.toggle_class("visible", transition.to.opacity > 0.0);
    }

    fn frame(&mut self, target: &dyn StyleSink, pose: &Pose) {
        if self.last.as_ref() == Some(pose) {
            return;
        }
        write_pose(target, pose);
        self.last = Some(*pose);
    }

    fn cancel(&mut self, target: &dyn StyleSink, pose: &Pose) {
        write_pose(target, pose);
        self.last = None;
    }
}

/// Browser capability check, done once.
pub fn supports_css_transitions() -> bool {
    web_sys::css::supports_with_value("transition", "opacity 1s ease-in-out").unwrap_or(false)
}

pub fn select_driver(css_transitions: bool) -> Box<dyn PoseDriver> {
    if css_transitions {
        Box::new(CssTransitionDriver)
    } else {
        Box::new(ManualDriver::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::RecordingSink;
    use crate::motion::sidebar::SidebarPhase;

    fn appearing() -> SidebarTransition {
        SidebarTransition {
            phase: SidebarPhase::Appearing,
            from: Pose {
                opacity: 0.0,
                translate_y: 24.0,
            },
            to: Pose {
                opacity: 1.0,
                translate_y: 0.0,
            },
            duration_ms: 300.0,
        }
    }

    #[test]
    fn selection_follows_capability() {
        assert_eq!(select_driver(true).name(), "css-transition");
        assert_eq!(select_driver(false).name(), "manual");
    }

    #[test]
    fn css_driver_writes_target_once() {
        let sink = RecordingSink::default();
        let mut driver = CssTransitionDriver;
        driver.begin(&sink, &appearing());
        assert_eq!(
            sink.style("transition").as_deref(),
            Some("opacity 300ms ease-in-out, transform 300ms ease-in-out")
        );
        assert_eq!(sink.style("opacity").as_deref(), Some("1.000"));
        assert!(sink.has_class("visible"));

        sink.clear();
        driver.frame(&sink, &appearing().from);
        assert!(sink.styles().is_empty());
    }

    #[test]
    fn manual_driver_writes_every_changed_frame() {
        let sink = RecordingSink::default();
        let mut driver = ManualDriver::default();
        driver.begin(&sink, &appearing());
        let pose = Pose {
            opacity: 0.5,
            translate_y: 12.0,
        };
        driver.frame(&sink, &pose);
        assert_eq!(sink.style("opacity").as_deref(), Some("0.500"));
        assert_eq!(sink.style("transform").as_deref(), Some("translateY(12.00px)"));

        sink.clear();
        driver.frame(&sink, &pose);
        assert!(sink.styles().is_empty());
    }

    #[test]
    fn cancel_pins_the_current_pose() {
        let sink = RecordingSink::default();
        let mut driver = CssTransitionDriver;
        driver.begin(&sink, &appearing());
        let pose = Pose {
            opacity: 0.3,
            translate_y: 16.0,
        };
        driver.cancel(&sink, &pose);
        assert_eq!(sink.style("transition").as_deref(), Some("none"));
        assert_eq!(sink.style("opacity").as_deref(), Some("0.300"));
    }
}
