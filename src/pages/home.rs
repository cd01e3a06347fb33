use yew::prelude::*;
use yew_router::prelude::*;
use log::{error, info};

use crate::catalog::{Catalog, CatalogEntry, DeveloperGroup};
use crate::config::LayoutConfig;
use crate::controller::PageController;
use crate::motion::tracker::{fragment_for, section_dom_id};
use crate::Route;

#[derive(Properties, PartialEq)]
struct TileProps {
    entry: CatalogEntry,
    first: bool,
}

#[function_component(ProjectTile)]
fn project_tile(props: &TileProps) -> Html {
    let entry = &props.entry;
    html! {
        <Link<Route> to={Route::Project { id: entry.id.clone() }} classes={classes!("project-tile", props.first.then(|| "first"))}>
            <img src={entry.image.clone()} alt={entry.name.clone()} loading="lazy" />
            <div class="tile-meta">
                <span class="tile-ordinal">{entry.ordinal_label()}</span>
                <span class="tile-name">{&entry.name}</span>
            </div>
        </Link<Route>>
    }
}

#[derive(Properties, PartialEq)]
struct SectionProps {
    entry: CatalogEntry,
}

#[function_component(ProjectSection)]
fn project_section(props: &SectionProps) -> Html {
    let entry = &props.entry;
    html! {
        <section class="project-section" id={section_dom_id(&entry.id)}>
            <div class="section-media">
                <img src={entry.image.clone()} alt={entry.name.clone()} loading="lazy" />
            </div>
            <div class="section-text">
                <span class="section-ordinal">{entry.ordinal_label()}</span>
                <h2>{&entry.name}</h2>
                <p class="section-group">{entry.group.label()}</p>
                <Link<Route> to={Route::Project { id: entry.id.clone() }} classes="section-link">
                    {"View project →"}
                </Link<Route>>
            </div>
        </section>
    }
}

fn render_group(catalog: &Catalog, group: DeveloperGroup) -> Html {
    let first_id = catalog.first().map(|e| e.id.clone());
    html! {
        <div class="grid-group">
            <h3>{group.label()}</h3>
            <div class="project-grid">
                { for catalog.in_group(group).map(|entry| html! {
                    <ProjectTile
                        entry={entry.clone()}
                        first={first_id.as_deref() == Some(entry.id.as_str())}
                    />
                }) }
            </div>
        </div>
    }
}

#[function_component]
pub fn Home() -> Html {
    let catalog = use_context::<Catalog>().unwrap_or_default();

    // Scroll to top only on initial mount
    {
        use_effect_with_deps(
            move |_| {
                if let Some(window) = web_sys::window() {
                    if window.location().hash().unwrap_or_default().is_empty() {
                        window.scroll_to_with_x_and_y(0.0, 0.0);
                    }
                }
                || ()
            },
            (),
        );
    }

    // The controller needs the rendered sections, so it is built after mount
    // and rebuilt only if the catalog changes.
    {
        let ids: Vec<String> = catalog.ids().map(str::to_string).collect();
        use_effect_with_deps(
            move |ids: &Vec<String>| {
                let controller = match PageController::init(ids.clone(), LayoutConfig::default()) {
                    Ok(controller) => {
                        info!("Landing page controller ready for {} entries", ids.len());
                        Some(controller)
                    }
                    Err(e) => {
                        error!("Landing page controller failed: {}", e);
                        None
                    }
                };
                move || {
                    if let Some(controller) = controller {
                        controller.teardown();
                    }
                }
            },
            ids,
        );
    }

    html! {
        <div class="landing-page">
            <section class="hero">
                <div class="hero-frame">
                    <div class="hero-copy">
                        <h1>{"Homes worth the wait"}</h1>
                        <p>{"New residential developments from Northgate and Harbourline, sold by one team."}</p>
                    </div>
                </div>
                {
                    if let Some(first) = catalog.first() {
                        html! { <img class="hero-media" src={first.image.clone()} alt={first.name.clone()} /> }
                    } else {
                        html! {}
                    }
                }
            </section>

            <section id="projects" class="project-catalog">
                <h2 class="catalog-title">{"Projects"}</h2>
                if catalog.is_empty() {
                    <p class="catalog-empty">{"New developments are on their way."}</p>
                }
                { render_group(&catalog, DeveloperGroup::Northgate) }
                { render_group(&catalog, DeveloperGroup::Harbourline) }
            </section>

            <nav class="project-sidebar">
                <ul>
                    { for catalog.entries().iter().map(|entry| html! {
                        <li>
                            <a href={fragment_for(&entry.id)} data-entry={entry.id.clone()}>
                                <span class="sidebar-ordinal">{entry.ordinal_label()}</span>
                                <span class="sidebar-name">{&entry.name}</span>
                            </a>
                        </li>
                    }) }
                </ul>
            </nav>

            <div class="project-sections">
                { for catalog.entries().iter().map(|entry| html! {
                    <ProjectSection entry={entry.clone()} />
                }) }
            </div>

            <footer class="site-footer" id="contact">
                <p>{"Sales office open Monday to Saturday, 10:00 to 18:00."}</p>
                <p class="footer-fine">{"Renderings are illustrative. Specifications may change without notice."}</p>
            </footer>

            <style>
                {r#"
                .landing-page {
                    background: #14110f;
                    color: #f4efe6;
                    min-height: 100vh;
                }
                .hero {
                    position: relative;
                    height: 100vh;
                }
                .hero-frame {
                    position: absolute;
                    inset: 74px 0 0 0;
                    display: flex;
                    align-items: flex-end;
                    padding: 4rem;
                    z-index: 2;
                    pointer-events: none;
                }
                .hero-copy h1 {
                    font-size: 4rem;
                    margin: 0 0 1rem 0;
                }
                .hero-copy p {
                    font-size: 1.2rem;
                    color: #cfc6b8;
                    max-width: 560px;
                }
                .hero-media {
                    position: fixed;
                    top: 74px;
                    left: 0;
                    width: 100%;
                    height: calc(100vh - 74px);
                    object-fit: cover;
                    z-index: 1;
                    will-change: top, left, width, height, opacity;
                }
                .project-catalog {
                    position: relative;
                    z-index: 3;
                    max-width: 1200px;
                    margin: 0 auto;
                    padding: 8vh 2rem 4rem 2rem;
                }
                .catalog-title {
                    font-size: 2.5rem;
                    margin-bottom: 2rem;
                }
                .grid-group h3 {
                    color: #c8a96a;
                    font-weight: 500;
                    letter-spacing: 0.05em;
                    text-transform: uppercase;
                    font-size: 0.9rem;
                }
                .project-grid {
                    display: grid;
                    grid-template-columns: repeat(auto-fill, minmax(320px, 1fr));
                    gap: 1.5rem;
                    margin-bottom: 3rem;
                }
                .project-tile {
                    display: block;
                    position: relative;
                    border-radius: 16px;
                    overflow: hidden;
                    color: inherit;
                    text-decoration: none;
                    aspect-ratio: 3 / 2;
                }
                .project-tile.first {
                    opacity: 0;
                }
                .project-tile img {
                    width: 100%;
                    height: 100%;
                    object-fit: cover;
                    display: block;
                }
                .tile-meta {
                    position: absolute;
                    left: 0;
                    right: 0;
                    bottom: 0;
                    padding: 1rem;
                    display: flex;
                    gap: 0.75rem;
                    background: linear-gradient(to top, rgba(0, 0, 0, 0.7), rgba(0, 0, 0, 0));
                }
                .tile-ordinal, .section-ordinal, .sidebar-ordinal {
                    color: #c8a96a;
                    font-variant-numeric: tabular-nums;
                }
                .project-sidebar {
                    position: fixed;
                    top: 50%;
                    left: 1.5rem;
                    margin-top: -120px;
                    z-index: 5;
                    opacity: 0;
                    transform: translateY(24px);
                    pointer-events: none;
                }
                .project-sidebar.visible {
                    pointer-events: auto;
                }
                .project-sidebar ul {
                    list-style: none;
                    padding: 0;
                    margin: 0;
                }
                .project-sidebar a {
                    display: flex;
                    gap: 0.5rem;
                    padding: 0.35rem 0;
                    color: #8f877b;
                    text-decoration: none;
                    transition: color 0.2s ease;
                }
                .project-sidebar a.active {
                    color: #f4efe6;
                }
                .project-section {
                    display: grid;
                    grid-template-columns: 3fr 2fr;
                    gap: 3rem;
                    align-items: center;
                    max-width: 1200px;
                    margin: 0 auto;
                    padding: 10vh 2rem 10vh 12rem;
                    min-height: 80vh;
                }
                .section-media img {
                    width: 100%;
                    border-radius: 16px;
                    display: block;
                }
                .section-text h2 {
                    font-size: 2.5rem;
                    margin: 0.5rem 0;
                }
                .section-group {
                    color: #8f877b;
                }
                .section-link {
                    color: #c8a96a;
                    text-decoration: none;
                }
                .site-footer {
                    padding: 4rem 2rem;
                    text-align: center;
                    border-top: 1px solid rgba(200, 169, 106, 0.2);
                    color: #8f877b;
                }
                .footer-fine {
                    font-size: 0.8rem;
                }
                @media (max-width: 900px) {
                    .hero-copy h1 {
                        font-size: 2.5rem;
                    }
                    .project-sidebar {
                        display: none;
                    }
                    .project-section {
                        grid-template-columns: 1fr;
                        padding: 6vh 1.5rem;
                    }
                }
                "#}
            </style>
        </div>
    }
}
