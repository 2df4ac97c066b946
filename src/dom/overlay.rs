//! The floating mascot element.
//!
//! A fixed full-viewport layer (pointer-events disabled) holds one sprite
//! element. The sprite gets pointer listeners; move/up/resize are on the
//! window so a fast drag that leaves the sprite keeps tracking.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, HtmlImageElement, PointerEvent};

use super::{BrowserEnv, FrameLoop, body, create_element, document};
use crate::config::BuddyConfig;
use crate::env::Environment;
use crate::error::BuddyError;
use crate::motion::{MotionController, Pose};
use crate::pointer::{PointerAdapter, PointerKind, PointerSample};
use crate::sizing::SizingPolicy;

struct MascotState {
    env: BrowserEnv,
    motion: MotionController,
    pointer: PointerAdapter,
    sizing: SizingPolicy,
    sprite: HtmlElement,
    img: HtmlImageElement,
    shown_image: String,
}

impl MascotState {
    fn render(&mut self) {
        let Pose { position, size, bob, tilt_deg, facing_right, image, dragging } = self.motion.pose();
        let style = self.sprite.style();
        let _ = style.set_property(
            "transform",
            &format!(
                "translate3d({:.2}px, {:.2}px, 0) rotate({:.2}deg)",
                position.x,
                position.y + bob,
                tilt_deg
            ),
        );
        let _ = style.set_property("width", &format!("{size}px"));
        let _ = style.set_property("height", &format!("{size}px"));
        let _ = style.set_property("cursor", if dragging { "grabbing" } else { "grab" });
        let _ = self
            .img
            .style()
            .set_property("transform", if facing_right { "scaleX(1)" } else { "scaleX(-1)" });
        // only touch src on change so the gif does not restart every frame
        if image != self.shown_image {
            self.img.set_src(image);
            self.shown_image = image.to_string();
        }
    }
}

fn sample(event: &Event) -> Option<PointerSample> {
    let e = event.dyn_ref::<PointerEvent>()?;
    Some(PointerSample {
        pointer_id: e.pointer_id(),
        x: f64::from(e.client_x()),
        y: f64::from(e.client_y()),
        kind: PointerKind::from_dom(&e.pointer_type()),
        button: e.button(),
    })
}

/// Mounted mascot. Dropping it stops the frame loop, detaches listeners and
/// removes the element.
pub struct MascotOverlay {
    layer: HtmlElement,
    _frame: FrameLoop,
    _listeners: Vec<EventListener>,
}

impl MascotOverlay {
    pub fn mount(config: BuddyConfig, on_click: Rc<dyn Fn()>) -> Result<Self, BuddyError> {
        let doc = document()?;
        let body = body()?;
        let window = super::window()?;

        let layer: HtmlElement = create_element(&doc, "div")?;
        layer.set_class_name("bb-mascot-layer");
        layer.set_attribute("aria-hidden", "true")?;
        let layer_style = layer.style();
        for (k, v) in [
            ("position", "fixed"),
            ("inset", "0"),
            ("pointer-events", "none"),
            ("z-index", "9998"),
            ("overflow", "hidden"),
        ] {
            layer_style.set_property(k, v)?;
        }

        let sprite: HtmlElement = create_element(&doc, "div")?;
        sprite.set_class_name("bb-mascot");
        let sprite_style = sprite.style();
        for (k, v) in [
            ("position", "absolute"),
            ("left", "0"),
            ("top", "0"),
            ("pointer-events", "auto"),
            ("touch-action", "none"),
            ("user-select", "none"),
            ("will-change", "transform"),
        ] {
            sprite_style.set_property(k, v)?;
        }

        let img: HtmlImageElement = create_element(&doc, "img")?;
        img.set_alt("");
        img.set_draggable(false);
        let img_style = img.style();
        img_style.set_property("width", "100%")?;
        img_style.set_property("height", "100%")?;
        img_style.set_property("object-fit", "contain")?;

        sprite.append_child(&img)?;
        layer.append_child(&sprite)?;
        body.append_child(&layer)?;

        let env = BrowserEnv::new()?;
        let viewport = env.viewport();
        let sizing = SizingPolicy::from_config(&config);
        let motion = MotionController::new(config, sizing.size_for(viewport), viewport, env.now_ms());
        let state = Rc::new(RefCell::new(MascotState {
            env,
            motion,
            pointer: PointerAdapter::new(),
            sizing,
            sprite: sprite.clone(),
            img,
            shown_image: String::new(),
        }));
        state.borrow_mut().render();

        let mut listeners = Vec::new();
        {
            let state = state.clone();
            let target = sprite.clone();
            listeners.push(EventListener::new_with_options(
                &sprite,
                "pointerdown",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    let Some(s) = sample(event) else { return };
                    let mut st = state.borrow_mut();
                    let st = &mut *st;
                    if st.pointer.on_pointer_down(&s, &mut st.motion) {
                        event.prevent_default();
                        if let Err(err) = target.set_pointer_capture(s.pointer_id) {
                            gloo::console::warn!("pointer capture failed", err);
                        }
                    }
                },
            ));
        }
        {
            let state = state.clone();
            listeners.push(EventListener::new(&window, "pointermove", move |event| {
                let Some(s) = sample(event) else { return };
                let mut st = state.borrow_mut();
                let st = &mut *st;
                let viewport = st.env.viewport();
                st.pointer.on_pointer_move(&s, &mut st.motion, viewport);
            }));
        }
        for kind in ["pointerup", "pointercancel"] {
            let state = state.clone();
            let target = sprite.clone();
            listeners.push(EventListener::new(&window, kind, move |event| {
                let Some(s) = sample(event) else { return };
                let mut st = state.borrow_mut();
                let st = &mut *st;
                let now = st.env.now_ms();
                if st.pointer.on_pointer_up(&s, &mut st.motion, now, &mut st.env).is_some() {
                    let _ = target.release_pointer_capture(s.pointer_id);
                }
            }));
        }
        {
            let state = state.clone();
            listeners.push(EventListener::new(&sprite, "click", move |_| {
                let fire = state.borrow_mut().pointer.on_click();
                if fire {
                    on_click();
                }
            }));
        }
        {
            let state = state.clone();
            listeners.push(EventListener::new(&window, "resize", move |_| {
                let mut st = state.borrow_mut();
                let st = &mut *st;
                let viewport = st.env.viewport();
                st.sizing.apply(&mut st.motion, viewport);
            }));
        }

        let frame = FrameLoop::start(move |_ts| {
            let mut st = state.borrow_mut();
            let st = &mut *st;
            st.motion.tick(&mut st.env);
            st.render();
        });

        gloo::console::log!("mascot mounted");
        Ok(Self { layer, _frame: frame, _listeners: listeners })
    }
}

impl Drop for MascotOverlay {
    fn drop(&mut self) {
        self.layer.remove();
    }
}
