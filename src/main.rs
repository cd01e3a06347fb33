use yew::prelude::*;
use yew_router::prelude::*;
use log::info;
use web_sys::MouseEvent;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

mod catalog;
mod config;
mod controller;
mod dom;
mod motion {
    pub mod driver;
    pub mod easing;
    pub mod engine;
    pub mod progress;
    pub mod sidebar;
    pub mod tracker;
    pub mod transition;
}
mod components {
    pub mod gallery;
}
mod pages {
    pub mod home;
    pub mod project;
}

use catalog::Catalog;
use pages::{
    home::Home,
    project::ProjectPage,
};

/// Scroll offset past which the top bar gets its solid background.
const NAV_SOLID_AFTER_PX: f64 = 80.0;

/// Remembers whether the top bar is solid so scroll events only touch
/// component state when that flips.
#[derive(Debug, Default)]
struct NavLatch {
    solid: bool,
}

impl NavLatch {
    fn update(&mut self, scroll_y: f64) -> Option<bool> {
        let solid = scroll_y > NAV_SOLID_AFTER_PX;
        if solid == self.solid {
            return None;
        }
        self.solid = solid;
        Some(solid)
    }
}

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/projects/:id")]
    Project { id: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}


fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        },
        Route::Project { id } => {
            info!("Rendering Project page for {}", id);
            html! { <ProjectPage id={id} /> }
        },
        Route::NotFound => {
            info!("Rendering NotFound page");
            html! {
                <div class="not-found">
                    <h1>{"Page not found"}</h1>
                    <Link<Route> to={Route::Home}>{"Back to projects"}</Link<Route>>
                </div>
            }
        },
    }
}


#[function_component(Nav)]
pub fn nav() -> Html {
    let menu_open = use_state(|| false);
    let is_scrolled = use_state(|| false);

    {
        let is_scrolled = is_scrolled.clone();
        use_effect_with_deps(move |_| {
            let window = web_sys::window();
            let scroll_callback = {
                let window = window.clone();
                let mut latch = NavLatch::default();
                Closure::wrap(Box::new(move || {
                    let scroll_y = window.as_ref().and_then(|w| w.scroll_y().ok());
                    if let Some(solid) = scroll_y.and_then(|y| latch.update(y)) {
                        is_scrolled.set(solid);
                    }
                }) as Box<dyn FnMut()>)
            };

            if let Some(window) = &window {
                let _ = window.add_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref());
            }

            move || {
                if let Some(window) = &window {
                    let _ = window.remove_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref());
                }
            }
        }, ());
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| {
            menu_open.set(false);
        })
    };

    let menu_class = if *menu_open {
        "nav-right mobile-menu-open"
    } else {
        "nav-right"
    };

    html! {
        <nav class={classes!("top-nav", (*is_scrolled).then(|| "scrolled"))}>
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"Estate & Co."}
                </Link<Route>>

                <button class="burger-menu" onclick={toggle_menu}>
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <div class={menu_class}>
                    <div onclick={close_menu.clone()}>
                        <a href="/#projects" class="nav-link">{"Projects"}</a>
                    </div>
                    <div onclick={close_menu}>
                        <a href="/#contact" class="nav-link nav-contact">{"Contact"}</a>
                    </div>
                </div>
            </div>
            <style>
                {r#"
                .top-nav {
                    position: fixed;
                    top: 0;
                    left: 0;
                    right: 0;
                    height: 74px;
                    z-index: 10;
                    transition: background 0.3s ease;
                }
                .top-nav.scrolled {
                    background: rgba(20, 17, 15, 0.92);
                    backdrop-filter: blur(8px);
                }
                .nav-content {
                    max-width: 1200px;
                    margin: 0 auto;
                    height: 100%;
                    padding: 0 2rem;
                    display: flex;
                    align-items: center;
                    justify-content: space-between;
                }
                .nav-logo, .nav-link {
                    color: #f4efe6;
                    text-decoration: none;
                }
                .nav-right {
                    display: flex;
                    gap: 2rem;
                }
                .burger-menu {
                    display: none;
                    background: none;
                    border: none;
                    cursor: pointer;
                }
                .burger-menu span {
                    display: block;
                    width: 24px;
                    height: 2px;
                    margin: 5px 0;
                    background: #f4efe6;
                }
                @media (max-width: 900px) {
                    .burger-menu {
                        display: block;
                    }
                    .nav-right {
                        display: none;
                    }
                    .nav-right.mobile-menu-open {
                        display: flex;
                        flex-direction: column;
                        position: absolute;
                        top: 74px;
                        left: 0;
                        right: 0;
                        padding: 1.5rem 2rem;
                        background: rgba(20, 17, 15, 0.97);
                    }
                }
                "#}
            </style>
        </nav>
    }
}


#[function_component]
fn App() -> Html {
    let catalog = use_state(Catalog::load);

    html! {
        <ContextProvider<Catalog> context={(*catalog).clone()}>
            <BrowserRouter>
                <Nav />
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<Catalog>>
    }
}


fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
