use yew::prelude::*;

/// Which photo of a gallery is showing. Stepping wraps around both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryCursor {
    index: usize,
    len: usize,
}

impl GalleryCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(self) -> Self {
        if self.len == 0 {
            return self;
        }
        Self {
            index: (self.index + 1) % self.len,
            ..self
        }
    }

    pub fn prev(self) -> Self {
        if self.len == 0 {
            return self;
        }
        Self {
            index: (self.index + self.len - 1) % self.len,
            ..self
        }
    }

    /// Out-of-range picks are ignored.
    pub fn select(self, index: usize) -> Self {
        if index < self.len {
            Self { index, ..self }
        } else {
            self
        }
    }

    pub fn counter(&self) -> String {
        if self.len == 0 {
            "0 / 0".to_string()
        } else {
            format!("{} / {}", self.index + 1, self.len)
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct GalleryProps {
    pub photos: Vec<String>,
    pub title: String,
}

#[function_component(Gallery)]
pub fn gallery(props: &GalleryProps) -> Html {
    let cursor = use_state(|| GalleryCursor::new(props.photos.len()));

    // A different project reuses the component, so restart at the first photo.
    {
        let cursor = cursor.clone();
        use_effect_with_deps(
            move |photos: &Vec<String>| {
                cursor.set(GalleryCursor::new(photos.len()));
                || ()
            },
            props.photos.clone(),
        );
    }

    let on_prev = {
        let cursor = cursor.clone();
        Callback::from(move |_: MouseEvent| cursor.set(cursor.prev()))
    };
    let on_next = {
        let cursor = cursor.clone();
        Callback::from(move |_: MouseEvent| cursor.set(cursor.next()))
    };

    let Some(current) = props.photos.get(cursor.index()) else {
        return html! {};
    };

    html! {
        <div class="gallery">
            <div class="gallery-stage">
                <img src={current.clone()} alt={format!("{} photo {}", props.title, cursor.index() + 1)} />
                if props.photos.len() > 1 {
                    <>
                        <button class="gallery-prev" onclick={on_prev} aria-label="Previous photo">{"‹"}</button>
                        <button class="gallery-next" onclick={on_next} aria-label="Next photo">{"›"}</button>
                    </>
                }
                <span class="gallery-counter">{cursor.counter()}</span>
            </div>
            <div class="gallery-thumbs">
                { for props.photos.iter().enumerate().map(|(i, photo)| {
                    let onclick = {
                        let cursor = cursor.clone();
                        Callback::from(move |_: MouseEvent| cursor.set(cursor.select(i)))
                    };
                    html! {
                        <button
                            class={classes!("gallery-thumb", (i == cursor.index()).then(|| "selected"))}
                            {onclick}
                        >
                            <img src={photo.clone()} alt="" loading="lazy" />
                        </button>
                    }
                }) }
            </div>
            <style>
                {r#"
                .gallery-stage {
                    position: relative;
                    border-radius: 16px;
                    overflow: hidden;
                    background: #111;
                }
                .gallery-stage img {
                    width: 100%;
                    height: auto;
                    display: block;
                }
                .gallery-prev, .gallery-next {
                    position: absolute;
                    top: 50%;
                    transform: translateY(-50%);
                    background: rgba(0, 0, 0, 0.45);
                    color: #fff;
                    border: none;
                    font-size: 2rem;
                    width: 48px;
                    height: 48px;
                    border-radius: 50%;
                    cursor: pointer;
                }
                .gallery-prev { left: 1rem; }
                .gallery-next { right: 1rem; }
                .gallery-counter {
                    position: absolute;
                    bottom: 1rem;
                    right: 1rem;
                    color: #fff;
                    font-size: 0.9rem;
                    background: rgba(0, 0, 0, 0.45);
                    padding: 0.2rem 0.6rem;
                    border-radius: 999px;
                }
                .gallery-thumbs {
                    display: flex;
                    gap: 0.5rem;
                    margin-top: 0.75rem;
                    overflow-x: auto;
                }
                .gallery-thumb {
                    border: 2px solid transparent;
                    padding: 0;
                    background: none;
                    border-radius: 8px;
                    overflow: hidden;
                    cursor: pointer;
                    opacity: 0.6;
                    transition: opacity 0.2s ease;
                }
                .gallery-thumb.selected {
                    border-color: #c8a96a;
                    opacity: 1;
                }
                .gallery-thumb img {
                    width: 96px;
                    height: 64px;
                    object-fit: cover;
                    display: block;
                }
                "#}
            </style>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_wraps_both_ways() {
        let cursor = GalleryCursor::new(3);
        assert_eq!(cursor.prev().index(), 2);
        assert_eq!(cursor.next().next().next().index(), 0);
    }

    #[test]
    fn select_ignores_out_of_range() {
        let cursor = GalleryCursor::new(3).select(2);
        assert_eq!(cursor.index(), 2);
        assert_eq!(cursor.select(7).index(), 2);
        assert_eq!(cursor.counter(), "3 / 3");
    }

    #[test]
    fn empty_gallery_is_inert() {
        let cursor = GalleryCursor::new(0);
        assert_eq!(cursor.next(), cursor);
        assert_eq!(cursor.prev(), cursor);
        assert_eq!(cursor.counter(), "0 / 0");
    }
}
