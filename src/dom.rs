use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

#[derive(Debug, Error)]
pub enum DomError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("element not found: {0}")]
    Missing(String),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<wasm_bindgen::JsValue> for DomError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        DomError::Js(format!("{:?}", value))
    }
}

/// Something whose inline style and class list can be written.
pub trait StyleSink {
    fn set_style(&self, property: &str, value: &str);
    fn toggle_class(&self, class: &str, on: bool);
}

impl StyleSink for HtmlElement {
    fn set_style(&self, property: &str, value: &str) {
        if let Err(e) = self.style().set_property(property, value) {
            log::debug!("set_property {} failed: {:?}", property, e);
        }
    }

    fn toggle_class(&self, class: &str, on: bool) {
        if let Err(e) = self.class_list().toggle_with_force(class, on) {
            log::debug!("toggle class {} failed: {:?}", class, e);
        }
    }
}

pub fn window() -> Result<Window, DomError> {
    web_sys::window().ok_or(DomError::NoWindow)
}

pub fn query(document: &Document, selector: &str) -> Result<HtmlElement, DomError> {
    document
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| DomError::Missing(selector.to_string()))
}

/// Like [`query`] but logs and swallows a missing element. Used for optional
/// page parts where the page still works without them.
pub fn query_optional(document: &Document, selector: &str) -> Option<HtmlElement> {
    match query(document, selector) {
        Ok(el) => Some(el),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    }
}

pub fn query_all(document: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn viewport_height(window: &Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
pub use recording::RecordingSink;

#[cfg(test)]
mod recording {
    use super::StyleSink;
    use std::cell::RefCell;

    /// Test double that remembers every write.
    #[derive(Default)]
    pub struct RecordingSink {
        styles: RefCell<Vec<(String, String)>>,
        classes: RefCell<Vec<(String, bool)>>,
    }

    impl RecordingSink {
        pub fn styles(&self) -> Vec<(String, String)> {
            self.styles.borrow().clone()
        }

        /// Last value written for `property`.
        pub fn style(&self, property: &str) -> Option<String> {
            self.styles
                .borrow()
                .iter()
                .rev()
                .find(|(p, _)| p == property)
                .map(|(_, v)| v.clone())
        }

        pub fn has_class(&self, class: &str) -> bool {
            self.classes
                .borrow()
                .iter()
                .rev()
                .find(|(c, _)| c == class)
                .map(|(_, on)| *on)
                .unwrap_or(false)
        }

        pub fn clear(&self) {
            self.styles.borrow_mut().clear();
            self.classes.borrow_mut().clear();
        }
    }

    impl StyleSink for RecordingSink {
        fn set_style(&self, property: &str, value: &str) {
            self.styles
                .borrow_mut()
                .push((property.to_string(), value.to_string()));
        }

        fn toggle_class(&self, class: &str, on: bool) {
            self.classes.borrow_mut().push((class.to_string(), on));
        }
    }
}
