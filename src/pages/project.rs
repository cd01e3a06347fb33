use yew::prelude::*;
use yew_router::history::{BrowserHistory, History};
use yew_router::prelude::*;

use crate::catalog::Catalog;
use crate::components::gallery::Gallery;
use crate::motion::tracker::fragment_for;
use crate::Route;

/// Landing page URL that scrolls to the section of entry `id` once mounted.
pub fn back_href(id: &str) -> String {
    format!("/{}", fragment_for(id))
}

#[derive(Properties, PartialEq)]
struct BackLinkProps {
    id: String,
}

/// Routes back to the landing page in-app, keeping the fragment so the
/// landing controller deep-links to the section.
#[function_component(BackLink)]
fn back_link(props: &BackLinkProps) -> Html {
    let href = back_href(&props.id);
    let onclick = {
        let href = href.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            BrowserHistory::new().push(href.clone());
        })
    };
    html! {
        <a href={href} class="back-link" {onclick}>{"← All projects"}</a>
    }
}

#[derive(Properties, PartialEq)]
pub struct ProjectProps {
    pub id: String,
}

#[function_component(ProjectPage)]
pub fn project_page(props: &ProjectProps) -> Html {
    let catalog = use_context::<Catalog>().unwrap_or_default();

    {
        use_effect_with_deps(
            move |_| {
                if let Some(window) = web_sys::window() {
                    window.scroll_to_with_x_and_y(0.0, 0.0);
                }
                || ()
            },
            props.id.clone(),
        );
    }

    let Some(entry) = catalog.get(&props.id) else {
        log::warn!("Unknown project id: {}", props.id);
        return html! {
            <div class="project-page missing">
                <h1>{"Project not found"}</h1>
                <Link<Route> to={Route::Home} classes="back-link">{"← All projects"}</Link<Route>>
            </div>
        };
    };

    let position = catalog
        .entries()
        .iter()
        .position(|e| e.id == entry.id)
        .unwrap_or(0);
    let next = catalog
        .entries()
        .get((position + 1) % catalog.len().max(1))
        .filter(|n| n.id != entry.id);

    html! {
        <div class="project-page">
            <header class="project-header">
                <BackLink id={entry.id.clone()} />
                <span class="project-ordinal">{entry.ordinal_label()}</span>
                <h1>{&entry.name}</h1>
                <p class="project-group">{entry.group.label()}</p>
            </header>

            <Gallery photos={entry.photos()} title={entry.name.clone()} />

            {
                if let Some(next) = next {
                    html! {
                        <Link<Route> to={Route::Project { id: next.id.clone() }} classes="next-project">
                            <span>{"Next project"}</span>
                            <strong>{format!("{} {}", next.ordinal_label(), next.name)}</strong>
                        </Link<Route>>
                    }
                } else {
                    html! {}
                }
            }

            <style>
                {r#"
                .project-page {
                    padding: 110px 2rem 4rem 2rem;
                    max-width: 1100px;
                    margin: 0 auto;
                    color: #f4efe6;
                    min-height: 100vh;
                }
                .project-header {
                    margin-bottom: 2rem;
                }
                .project-header h1 {
                    font-size: 3rem;
                    margin: 0.25rem 0;
                }
                .back-link {
                    color: #8f877b;
                    text-decoration: none;
                    display: inline-block;
                    margin-bottom: 1.5rem;
                }
                .project-ordinal {
                    display: block;
                    color: #c8a96a;
                }
                .project-group {
                    color: #8f877b;
                }
                .next-project {
                    display: flex;
                    justify-content: space-between;
                    margin-top: 3rem;
                    padding: 1.5rem 0;
                    border-top: 1px solid rgba(200, 169, 106, 0.2);
                    color: inherit;
                    text-decoration: none;
                }
                "#}
            </style>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::tracker::entry_id_from_dom_id;

    #[test]
    fn back_link_targets_the_landing_section() {
        let href = back_href("cedar-quay");
        assert_eq!(href, "/#entry-cedar-quay");
        let fragment = href.trim_start_matches('/');
        assert_eq!(entry_id_from_dom_id(fragment), Some("cedar-quay"));
        let path = href.split('#').next().unwrap_or_default();
        assert!(Route::recognize(path) == Some(Route::Home));
    }
}
