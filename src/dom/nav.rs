//! Highlights the nav link of the section currently in view.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::document;
use crate::error::BuddyError;
use crate::scroll_spy::{ACTIVE_RATIO, ScrollSpy};
use crate::section::Section;

const LINK_SELECTOR: &str = "nav a[href^='#']";
const ACTIVE_CLASS: &str = "active";

fn highlight(spy: &ScrollSpy) {
    let Ok(links) = document().and_then(|d| Ok(d.query_selector_all(LINK_SELECTOR)?)) else {
        return;
    };
    for i in 0..links.length() {
        let Some(link) = links.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else { continue };
        let href = link.get_attribute("href").unwrap_or_default();
        let _ = link.class_list().toggle_with_force(ACTIVE_CLASS, spy.is_active_href(&href));
    }
}

/// Live `IntersectionObserver` over the page sections. Disconnects on drop.
pub struct NavHighlighter {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl NavHighlighter {
    pub fn mount() -> Result<Self, BuddyError> {
        let doc = document()?;
        let spy = Rc::new(RefCell::new(ScrollSpy::new()));
        highlight(&spy.borrow());

        let callback = {
            let spy = spy.clone();
            Closure::wrap(Box::new(move |entries: js_sys::Array| {
                let mut spy = spy.borrow_mut();
                let mut changed = false;
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
                    let id = entry.target().id();
                    changed |= spy
                        .observe(&id, entry.is_intersecting(), entry.intersection_ratio())
                        .is_some();
                }
                if changed {
                    highlight(&spy);
                }
            }) as Box<dyn FnMut(js_sys::Array)>)
        };

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(ACTIVE_RATIO));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        let mut watched = 0;
        for section in Section::NAV {
            if let Some(el) = doc.get_element_by_id(section.anchor()) {
                observer.observe(&el);
                watched += 1;
            }
        }
        if watched == 0 {
            gloo::console::warn!("no section anchors found; nav highlighting is idle");
        }
        Ok(Self { observer, _callback: callback })
    }
}

impl Drop for NavHighlighter {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
