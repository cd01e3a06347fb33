use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::Timeout;
use log::{debug, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Date};
use web_sys::{
    Document, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, ScrollBehavior, ScrollToOptions, Window,
};

use crate::config::LayoutConfig;
use crate::dom::{self, DomError, StyleSink};
use crate::motion::driver::{select_driver, supports_css_transitions, PoseDriver};
use crate::motion::engine::{FrameGate, ScrollEngine};
use crate::motion::progress::ScrollState;
use crate::motion::tracker::{
    entry_id_from_dom_id, fragment_for, section_dom_id, ActiveSectionTracker, Intersection,
    SettleDebounce,
};
use crate::motion::transition::{BoxStyle, Keyframes};

pub const HERO_FRAME: &str = ".hero-frame";
pub const HERO_MEDIA: &str = ".hero-media";
pub const FIRST_TILE: &str = ".project-tile.first";
pub const SIDEBAR: &str = ".project-sidebar";
pub const FOOTER: &str = ".site-footer";
pub const ENTRY_LINKS: &str = "[data-entry]";
pub const SECTIONS: &str = "section.project-section";

/// Elements the controller reads and writes. Anything optional may be
/// missing; the matching behaviour is then skipped.
struct PageElements {
    hero_frame: Option<HtmlElement>,
    hero_media: Option<HtmlElement>,
    first_tile: Option<HtmlElement>,
    sidebar: Option<HtmlElement>,
    footer: Option<HtmlElement>,
    entry_links: Vec<HtmlElement>,
    sections: Vec<HtmlElement>,
}

impl PageElements {
    fn collect(document: &Document) -> Self {
        Self {
            hero_frame: dom::query_optional(document, HERO_FRAME),
            hero_media: dom::query_optional(document, HERO_MEDIA),
            first_tile: dom::query_optional(document, FIRST_TILE),
            sidebar: dom::query_optional(document, SIDEBAR),
            footer: dom::query_optional(document, FOOTER),
            entry_links: dom::query_all(document, ENTRY_LINKS),
            sections: dom::query_all(document, SECTIONS),
        }
    }

    fn section(&self, id: &str) -> Option<&HtmlElement> {
        let dom_id = section_dom_id(id);
        self.sections.iter().find(|s| s.id() == dom_id)
    }
}

fn rect_box(element: &HtmlElement, radius: f64) -> BoxStyle {
    let rect = element.get_bounding_client_rect();
    BoxStyle {
        top: rect.top(),
        left: rect.left(),
        width: rect.width(),
        height: rect.height(),
        radius,
        opacity: 1.0,
    }
}

struct State {
    engine: ScrollEngine,
    gate: FrameGate,
    tracker: ActiveSectionTracker,
    driver: Box<dyn PoseDriver>,
    elements: PageElements,
    debounce: SettleDebounce,
    last_now_ms: f64,
}

impl State {
    fn keyframes(&self) -> Option<Keyframes> {
        let frame = self.elements.hero_frame.as_ref()?;
        let tile = self.elements.first_tile.as_ref()?;
        let animator = self.engine.animator();
        Some(animator.keyframes(
            rect_box(frame, 0.0),
            rect_box(tile, animator.config().tile_radius_px),
        ))
    }

    /// Reflects a new active entry in the navigation and the URL fragment.
    fn publish(&self, window: &Window, id: &str) {
        for link in &self.elements.entry_links {
            let on = link.get_attribute("data-entry").as_deref() == Some(id);
            link.toggle_class("active", on);
        }
        match window.history() {
            Ok(history) => {
                if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(&fragment_for(id))) {
                    debug!("replaceState failed: {:?}", e);
                }
            }
            Err(e) => debug!("no history: {:?}", e),
        }
        debug!("Active entry: {}", id);
    }
}

struct Shared {
    window: Window,
    state: RefCell<State>,
    frame: RefCell<Option<AnimationFrame>>,
    settle: RefCell<Option<Timeout>>,
    alive: Cell<bool>,
    frames_scheduled: Cell<u32>,
}

impl Shared {
    fn schedule(self: &Rc<Self>) {
        if !self.alive.get() || !self.state.borrow_mut().gate.request() {
            return;
        }
        self.frames_scheduled.set(self.frames_scheduled.get() + 1);
        let shared = Rc::clone(self);
        let handle = request_animation_frame(move |now_ms| {
            shared.frame.borrow_mut().take();
            shared.run_frame(now_ms);
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn run_frame(self: &Rc<Self>, now_ms: f64) {
        if !self.alive.get() {
            return;
        }
        let needs_frame = {
            let mut state = self.state.borrow_mut();
            state.gate.take();
            state.last_now_ms = now_ms;

            let scroll = ScrollState::new(
                self.window.scroll_y().unwrap_or(0.0),
                dom::viewport_height(&self.window),
            );
            let footer_top = state
                .elements
                .footer
                .as_ref()
                .map(|f| f.get_bounding_client_rect().top());
            let keys = state.keyframes();
            let frame = state.engine.tick(scroll, footer_top, keys.as_ref(), now_ms);

            if let Some(transition) = &frame.transition {
                transition.apply(
                    state.elements.hero_media.as_ref().map(|e| e as &dyn StyleSink),
                    state.elements.first_tile.as_ref().map(|e| e as &dyn StyleSink),
                );
            }

            let State { driver, elements, .. } = &mut *state;
            if let Some(sidebar) = elements.sidebar.as_ref() {
                if let Some(change) = &frame.sidebar_change {
                    debug!("Sidebar {:?} via {}", change.phase, driver.name());
                    driver.begin(sidebar, change);
                }
                driver.frame(sidebar, &frame.sidebar);
            }
            frame.needs_frame
        };
        if needs_frame {
            self.schedule();
        }
    }

    fn observe(&self, entries: &Array) {
        let batch: Vec<Intersection> = entries
            .iter()
            .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
            .filter_map(|entry| {
                let dom_id = entry.target().id();
                entry_id_from_dom_id(&dom_id).map(|id| Intersection {
                    id: id.to_string(),
                    ratio: entry.intersection_ratio(),
                    is_intersecting: entry.is_intersecting(),
                })
            })
            .collect();
        self.observe_batch(&batch);
    }

    fn observe_batch(&self, batch: &[Intersection]) {
        if !self.alive.get() {
            return;
        }
        let mut state = self.state.borrow_mut();
        if let Some(id) = state.tracker.observe(batch) {
            state.publish(&self.window, &id);
        }
    }

    /// Every scroll event while a navigation is in flight pushes the settle
    /// timer back, so a long smooth scroll stays muted until it stops.
    fn scroll_activity(self: &Rc<Self>) {
        if !self.alive.get() {
            return;
        }
        let delay = {
            let state = self.state.borrow();
            if !state.tracker.is_scrolling() {
                return;
            }
            state.debounce.bump(Date::now())
        };
        if let Some(delay) = delay {
            self.arm_settle(delay);
        }
    }

    fn arm_settle(self: &Rc<Self>, delay_ms: u32) {
        let shared = Rc::clone(self);
        let timeout = Timeout::new(delay_ms, move || shared.settle_now());
        // Replacing a pending timer cancels it.
        *self.settle.borrow_mut() = Some(timeout);
    }

    /// Jumps to an entry's section, muting the tracker until the scroll settles.
    fn navigate(self: &Rc<Self>, id: &str) {
        if !self.alive.get() {
            return;
        }
        let (target_y, delay) = {
            let mut state = self.state.borrow_mut();
            if let Some(changed) = state.tracker.begin_programmatic_scroll(id) {
                state.publish(&self.window, &changed);
            }
            let section_top = state
                .elements
                .section(id)
                .map(|s| s.get_bounding_client_rect().top());
            match section_top {
                Some(top) => {
                    let delay = state.debounce.arm(Date::now());
                    (self.window.scroll_y().unwrap_or(0.0) + top, delay)
                }
                None => {
                    log::warn!("{}", DomError::Missing(format!("#{}", section_dom_id(id))));
                    drop(state);
                    self.settle_now();
                    return;
                }
            }
        };

        let options = ScrollToOptions::new();
        options.set_top(target_y);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
        self.arm_settle(delay);
    }

    fn settle_now(&self) {
        if !self.alive.get() {
            return;
        }
        self.settle.borrow_mut().take();
        let mut state = self.state.borrow_mut();
        state.debounce.clear();
        if let Some(id) = state.tracker.end_programmatic_scroll() {
            state.publish(&self.window, &id);
        }
    }
}

type Listener = Closure<dyn FnMut()>;
type ClickListener = Closure<dyn FnMut(MouseEvent)>;
type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Owns everything the landing page's scroll behaviour installs. Built with
/// [`PageController::init`] once the page is mounted and released with
/// [`PageController::teardown`].
pub struct PageController {
    shared: Rc<Shared>,
    on_scroll: Listener,
    on_resize: Listener,
    observer: Option<(IntersectionObserver, ObserverCallback)>,
    link_listeners: Vec<(HtmlElement, ClickListener)>,
}

impl PageController {
    pub fn init<I, S>(entry_ids: I, config: LayoutConfig) -> Result<Self, DomError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let window = dom::window()?;
        let document = window.document().ok_or(DomError::NoDocument)?;
        let config = config.or_default();

        let driver = select_driver(supports_css_transitions());
        info!("Page controller using {} driver", driver.name());

        let state = State {
            engine: ScrollEngine::new(config.clone()),
            gate: FrameGate::default(),
            tracker: ActiveSectionTracker::new(entry_ids),
            driver,
            elements: PageElements::collect(&document),
            debounce: SettleDebounce::new(&config.tracker),
            last_now_ms: 0.0,
        };
        let shared = Rc::new(Shared {
            window: window.clone(),
            state: RefCell::new(state),
            frame: RefCell::new(None),
            settle: RefCell::new(None),
            alive: Cell::new(true),
            frames_scheduled: Cell::new(0),
        });

        let on_scroll = {
            let shared = Rc::clone(&shared);
            Closure::wrap(Box::new(move || {
                shared.schedule();
                shared.scroll_activity();
            }) as Box<dyn FnMut()>)
        };
        let on_resize = {
            let shared = Rc::clone(&shared);
            Closure::wrap(Box::new(move || shared.schedule()) as Box<dyn FnMut()>)
        };
        window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        let mut controller = Self {
            shared,
            on_scroll,
            on_resize,
            observer: None,
            link_listeners: Vec::new(),
        };
        controller.observe_sections(&config)?;
        controller.bind_links()?;
        controller.follow_initial_fragment();
        controller.shared.schedule();
        Ok(controller)
    }

    fn observe_sections(&mut self, config: &LayoutConfig) -> Result<(), DomError> {
        let sections = self.shared.state.borrow().elements.sections.clone();
        if sections.is_empty() {
            log::warn!("{}", DomError::Missing(SECTIONS.to_string()));
            return Ok(());
        }
        let callback = {
            let shared = Rc::clone(&self.shared);
            Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
                shared.observe(&entries);
            }) as Box<dyn FnMut(Array, IntersectionObserver)>)
        };
        let thresholds = Array::new();
        for t in &config.tracker.thresholds {
            thresholds.push(&JsValue::from_f64(*t));
        }
        let options = IntersectionObserverInit::new();
        options.set_threshold(&thresholds);
        options.set_root_margin(&config.tracker.root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        for section in &sections {
            observer.observe(section);
        }
        self.observer = Some((observer, callback));
        Ok(())
    }

    fn bind_links(&mut self) -> Result<(), DomError> {
        let links = self.shared.state.borrow().elements.entry_links.clone();
        for link in links {
            let Some(id) = link.get_attribute("data-entry") else {
                continue;
            };
            let shared = Rc::clone(&self.shared);
            let listener = Closure::wrap(Box::new(move |e: MouseEvent| {
                e.prevent_default();
                shared.navigate(&id);
            }) as Box<dyn FnMut(MouseEvent)>);
            link.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
            self.link_listeners.push((link, listener));
        }
        Ok(())
    }

    /// Deep links like `/#entry-cedar-quay` scroll to their section on load.
    fn follow_initial_fragment(&self) {
        let Ok(hash) = self.shared.window.location().hash() else {
            return;
        };
        if let Some(id) = entry_id_from_dom_id(&hash) {
            self.shared.navigate(id);
        }
    }

    /// Removes every listener, disconnects the observer and cancels pending
    /// frames and timers. Callbacks already queued by the browser become no-ops.
    pub fn teardown(self) {
        let shared = &self.shared;
        shared.alive.set(false);

        let window = &shared.window;
        let _ = window.remove_event_listener_with_callback("scroll", self.on_scroll.as_ref().unchecked_ref());
        let _ = window.remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
        for (link, listener) in &self.link_listeners {
            let _ = link.remove_event_listener_with_callback("click", listener.as_ref().unchecked_ref());
        }
        if let Some((observer, _)) = &self.observer {
            observer.disconnect();
        }

        shared.frame.borrow_mut().take();
        shared.settle.borrow_mut().take();

        let mut state = shared.state.borrow_mut();
        state.gate.reset();
        let now_ms = state.last_now_ms;
        let pose = state.engine.sidebar().pose(now_ms);
        state.engine.cancel();
        let State { driver, elements, .. } = &mut *state;
        if let Some(sidebar) = elements.sidebar.as_ref() {
            driver.cancel(sidebar, &pose);
        }
        info!(
            "Page controller torn down after {} frames (sidebar {:?}, active {:?})",
            shared.frames_scheduled.get(),
            state.engine.sidebar().phase(),
            state.tracker.active()
        );
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
    use web_sys::Event;

    // Applies to every browser test in the crate.
    wasm_bindgen_test_configure!(run_in_browser);

    const IDS: [&str; 3] = ["aurora", "birch", "cedar"];

    /// Renders a minimal landing page and clears any fragment left behind by
    /// a previous test.
    fn mount_landing() -> Window {
        let window = dom::window().unwrap();
        let document = window.document().unwrap();
        let links: String = IDS
            .iter()
            .map(|id| format!(r#"<a href="{}" data-entry="{}">{}</a>"#, fragment_for(id), id, id))
            .collect();
        let sections: String = IDS
            .iter()
            .map(|id| {
                format!(
                    r#"<section class="project-section" id="{}" style="height: 600px"></section>"#,
                    section_dom_id(id)
                )
            })
            .collect();
        let markup = format!(
            r#"<div class="hero-frame" style="height: 400px"></div>
            <img class="hero-media" />
            <a class="project-tile first" style="display: block; width: 300px; height: 200px"></a>
            <nav class="project-sidebar">{}</nav>
            {}
            <footer class="site-footer"></footer>"#,
            links, sections
        );
        document.body().unwrap().set_inner_html(&markup);

        let path = window.location().pathname().unwrap();
        window
            .history()
            .unwrap()
            .replace_state_with_url(&JsValue::NULL, "", Some(&path))
            .unwrap();
        window
    }

    fn init() -> PageController {
        PageController::init(IDS, LayoutConfig::default()).unwrap()
    }

    fn hash(window: &Window) -> String {
        window.location().hash().unwrap()
    }

    fn dispatch_scroll(window: &Window, times: usize) {
        for _ in 0..times {
            window.dispatch_event(&Event::new("scroll").unwrap()).unwrap();
        }
    }

    fn report(id: &str, ratio: f64) -> Intersection {
        Intersection {
            id: id.to_string(),
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }

    fn link(window: &Window, id: &str) -> HtmlElement {
        let document = window.document().unwrap();
        dom::query(&document, &format!(r#"[data-entry="{}"]"#, id)).unwrap()
    }

    #[wasm_bindgen_test]
    fn scroll_bursts_share_one_frame() {
        let window = mount_landing();
        let controller = init();
        let shared = Rc::clone(&controller.shared);
        assert_eq!(shared.frames_scheduled.get(), 1);

        dispatch_scroll(&window, 5);
        assert_eq!(shared.frames_scheduled.get(), 1);
        assert!(shared.frame.borrow().is_some());
        assert!(shared.state.borrow().gate.is_pending());

        controller.teardown();
    }

    #[wasm_bindgen_test]
    fn teardown_releases_everything() {
        let window = mount_landing();
        let controller = init();
        let shared = Rc::clone(&controller.shared);
        shared.navigate("birch");
        assert!(shared.settle.borrow().is_some());

        controller.teardown();
        assert!(!shared.alive.get());
        assert!(shared.frame.borrow().is_none());
        assert!(shared.settle.borrow().is_none());
        assert!(!shared.state.borrow().gate.is_pending());
        // Listeners, observer callback, frame and timer closures are all gone.
        assert_eq!(Rc::strong_count(&shared), 1);

        let scheduled = shared.frames_scheduled.get();
        dispatch_scroll(&window, 3);
        assert_eq!(shared.frames_scheduled.get(), scheduled);
    }

    #[wasm_bindgen_test]
    fn callbacks_after_teardown_write_nothing() {
        let window = mount_landing();
        let controller = init();
        let shared = Rc::clone(&controller.shared);
        controller.teardown();

        shared.run_frame(16.0);
        shared.observe_batch(&[report("cedar", 1.0)]);
        shared.navigate("cedar");
        shared.settle_now();

        assert_eq!(link(&window, "cedar").class_name(), "");
        let document = window.document().unwrap();
        let media = dom::query(&document, HERO_MEDIA).unwrap();
        assert_eq!(media.style().get_property_value("top").unwrap(), "");
        assert_eq!(shared.state.borrow().tracker.active(), None);
        assert_eq!(hash(&window), "");
    }

    #[wasm_bindgen_test]
    fn navigation_mutes_reports_until_settled() {
        let window = mount_landing();
        let controller = init();
        let shared = Rc::clone(&controller.shared);

        shared.navigate("cedar");
        assert_eq!(hash(&window), "#entry-cedar");
        assert!(link(&window, "cedar").class_list().contains("active"));
        assert!(shared.state.borrow().tracker.is_scrolling());

        // Sections passed on the way must not take over.
        shared.observe_batch(&[report("birch", 1.0)]);
        assert_eq!(shared.state.borrow().tracker.active(), Some("cedar"));
        assert_eq!(hash(&window), "#entry-cedar");

        // Ongoing scrolling keeps the settle timer armed.
        dispatch_scroll(&window, 2);
        assert!(shared.settle.borrow().is_some());
        assert!(shared.state.borrow().debounce.is_armed());

        shared.settle_now();
        assert!(!shared.state.borrow().tracker.is_scrolling());
        assert!(shared.settle.borrow().is_none());
        assert_eq!(shared.state.borrow().tracker.active(), Some("birch"));
        assert_eq!(hash(&window), "#entry-birch");
        assert!(!link(&window, "cedar").class_list().contains("active"));

        controller.teardown();
    }

    #[wasm_bindgen_test]
    fn sidebar_link_click_navigates() {
        let window = mount_landing();
        let controller = init();
        let shared = Rc::clone(&controller.shared);

        link(&window, "birch").click();
        assert_eq!(hash(&window), "#entry-birch");
        assert_eq!(shared.state.borrow().tracker.active(), Some("birch"));
        assert!(shared.state.borrow().tracker.is_scrolling());

        controller.teardown();
    }
}
