//! Browser bindings. Everything under here touches `web-sys` and only runs
//! inside a page; the state machines it drives live in the parent modules.

pub mod chat_panel;
pub mod nav;
pub mod overlay;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    ScrollToOptions, Window,
};

use crate::chat::EffectSink;
use crate::chat::rules::HostInfo;
use crate::env::{Environment, RandomSource, Viewport};
use crate::error::BuddyError;
use crate::section::Section;

pub fn window() -> Result<Window, BuddyError> {
    web_sys::window().ok_or(BuddyError::NoWindow)
}

pub fn document() -> Result<Document, BuddyError> {
    window()?.document().ok_or(BuddyError::NoDocument)
}

pub fn body() -> Result<HtmlElement, BuddyError> {
    document()?.body().ok_or(BuddyError::NoBody)
}

pub fn create_element<T: JsCast>(doc: &Document, tag: &str) -> Result<T, BuddyError> {
    doc.create_element(tag)?
        .dyn_into::<T>()
        .map_err(|_| BuddyError::Js(format!("<{tag}> has an unexpected type")))
}

/// Host environment backed by the live window.
pub struct BrowserEnv {
    window: Window,
}

impl BrowserEnv {
    pub fn new() -> Result<Self, BuddyError> {
        Ok(Self { window: window()? })
    }
}

impl RandomSource for BrowserEnv {
    #[cfg(feature = "rng")]
    fn next_unit(&mut self) -> f64 {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => (u64::from_le_bytes(buf) >> 11) as f64 / (1u64 << 53) as f64,
            Err(_) => js_sys::Math::random(),
        }
    }

    #[cfg(not(feature = "rng"))]
    fn next_unit(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

impl Environment for BrowserEnv {
    fn viewport(&self) -> Viewport {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(dim(self.window.inner_width()), dim(self.window.inner_height()))
    }

    fn now_ms(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }
}

/// Local clock, zone name and clipboard presence for the chat rules.
pub fn host_info() -> HostInfo {
    let local_time = chrono::Local::now().fixed_offset();
    let resolved = js_sys::Intl::DateTimeFormat::new(&js_sys::Array::new(), &js_sys::Object::new())
        .resolved_options();
    let time_zone = js_sys::Reflect::get(&resolved, &JsValue::from_str("timeZone"))
        .ok()
        .and_then(|tz| tz.as_string())
        .unwrap_or_else(|| format!("UTC{}", local_time.format("%:z")));
    HostInfo { local_time, time_zone, clipboard_available: clipboard().is_some() }
}

fn clipboard() -> Option<JsValue> {
    let navigator = web_sys::window()?.navigator();
    let clip = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard")).ok()?;
    if clip.is_undefined() || clip.is_null() { None } else { Some(clip) }
}

/// Smooth-scrolls to a section anchor. Missing targets are a no-op.
pub fn scroll_to_section(section: Section) {
    let Some(target) = document().ok().and_then(|d| d.get_element_by_id(section.anchor())) else {
        return;
    };
    let opts = ScrollIntoViewOptions::new();
    opts.set_behavior(ScrollBehavior::Smooth);
    opts.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&opts);
}

pub fn scroll_to_top() {
    if let Ok(win) = window() {
        let opts = ScrollToOptions::new();
        opts.set_top(0.0);
        opts.set_behavior(ScrollBehavior::Smooth);
        win.scroll_to_with_scroll_to_options(&opts);
    }
}

/// `mailto:` / `tel:` go through the current location so the composer opens;
/// anything else gets a new tab without an opener.
pub fn open_url(url: &str) {
    let Ok(win) = window() else { return };
    let result = if url.starts_with("mailto:") || url.starts_with("tel:") {
        win.location().set_href(url)
    } else {
        win.open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer")
            .map(|_| ())
    };
    if let Err(err) = result {
        gloo::console::warn!("open url failed", url, err);
    }
}

pub fn copy_text(text: &str) {
    let Some(clip) = clipboard() else { return };
    let write = js_sys::Reflect::get(&clip, &JsValue::from_str("writeText"))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
    let Some(write) = write else { return };
    match write.call1(&clip, &JsValue::from_str(text)) {
        Ok(promise) => {
            if let Ok(promise) = promise.dyn_into::<js_sys::Promise>() {
                // rejected writes (permissions, focus) are ignored
                let ignore = Closure::wrap(Box::new(|_: JsValue| {}) as Box<dyn FnMut(JsValue)>);
                let _ = promise.catch(&ignore);
                ignore.forget();
            }
        }
        Err(err) => gloo::console::warn!("clipboard write failed", err),
    }
}

/// [`EffectSink`] that acts on the live page.
pub struct PageEffects;

impl EffectSink for PageEffects {
    fn scroll_to(&mut self, section: Section) {
        scroll_to_section(section);
    }
    fn scroll_to_top(&mut self) {
        scroll_to_top();
    }
    fn open_url(&mut self, url: &str) {
        open_url(url);
    }
    fn copy_text(&mut self, text: &str) {
        copy_text(text);
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Self-rescheduling `requestAnimationFrame` loop. Dropping it cancels the
/// pending frame and frees the callback.
pub struct FrameLoop {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn start(mut tick: impl FnMut(f64) + 'static) -> Self {
        let f: FrameCallback = Rc::new(RefCell::new(None));
        let g = f.clone();
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let pending_inner = pending.clone();
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            pending_inner.set(None);
            tick(ts);
            if let (Some(w), Some(cb)) = (web_sys::window(), f.borrow().as_ref()) {
                pending_inner.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
            }
        }) as Box<dyn FnMut(f64)>));
        if let (Some(w), Some(cb)) = (web_sys::window(), g.borrow().as_ref()) {
            pending.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
        }
        Self { callback: g, pending }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(w), Some(id)) = (web_sys::window(), self.pending.take()) {
            let _ = w.cancel_animation_frame(id);
        }
        // breaks the closure -> Rc -> closure cycle
        self.callback.borrow_mut().take();
    }
}
