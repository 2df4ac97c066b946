//! Chat panel DOM: message log, typing indicator, suggestion chips and the
//! input row. Reply timing and effects come from [`ChatSession`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlInputElement, KeyboardEvent};

use super::{BrowserEnv, PageEffects, body, create_element, document, host_info};
use crate::chat::{ChatSession, Effect, SUGGESTIONS, Sender, markup};
use crate::config::Profile;
use crate::error::BuddyError;

const STYLE_ID: &str = "bb-chat-style";

const STYLE: &str = "
.bb-chat{position:fixed;right:16px;bottom:16px;width:min(360px,calc(100vw - 32px));max-height:min(520px,calc(100vh - 32px));display:none;flex-direction:column;background:#fff;color:#1f2330;border-radius:14px;box-shadow:0 12px 40px rgba(0,0,0,.25);font:14px/1.4 system-ui,sans-serif;z-index:9999;overflow:hidden}
.bb-chat.bb-open{display:flex}
.bb-head{display:flex;align-items:center;justify-content:space-between;padding:10px 14px;background:#1f2330;color:#fff;font-weight:600}
.bb-close{background:none;border:0;color:inherit;font-size:18px;cursor:pointer}
.bb-log{flex:1;overflow-y:auto;padding:12px;display:flex;flex-direction:column;gap:8px}
.bb-msg{max-width:85%;padding:8px 11px;border-radius:12px;word-wrap:break-word}
.bb-user{align-self:flex-end;background:#3b6cf6;color:#fff}
.bb-bot{align-self:flex-start;background:#eef0f5}
.bb-link{color:#3b6cf6}
.bb-user .bb-link{color:#fff}
.bb-typing{display:none;padding:0 14px 6px;color:#6b7080;font-style:italic}
.bb-typing.bb-on{display:block}
.bb-chips{display:flex;flex-wrap:wrap;gap:6px;padding:6px 12px}
.bb-chip{border:1px solid #ccd;border-radius:999px;background:#fff;padding:3px 10px;cursor:pointer;font:inherit}
.bb-row{display:flex;gap:6px;padding:10px 12px;border-top:1px solid #eee}
.bb-input{flex:1;padding:7px 10px;border:1px solid #ccd;border-radius:8px;font:inherit}
.bb-send{padding:7px 14px;border:0;border-radius:8px;background:#3b6cf6;color:#fff;cursor:pointer;font:inherit}
";

fn now_epoch_ms() -> f64 {
    js_sys::Date::now()
}

fn ensure_style(doc: &Document) -> Result<(), BuddyError> {
    if doc.get_element_by_id(STYLE_ID).is_some() {
        return Ok(());
    }
    let style: HtmlElement = create_element(doc, "style")?;
    style.set_id(STYLE_ID);
    style.set_text_content(Some(STYLE));
    if let Some(head) = doc.head() {
        head.append_child(&style)?;
    }
    Ok(())
}

struct ChatInner {
    session: RefCell<ChatSession>,
    env: RefCell<BrowserEnv>,
    root: HtmlElement,
    log: HtmlElement,
    typing: HtmlElement,
    input: HtmlInputElement,
    open: Cell<bool>,
    reply_timer: RefCell<Option<Timeout>>,
    effect_timers: RefCell<Vec<Timeout>>,
}

impl ChatInner {
    fn render(&self) {
        let doc = match document() {
            Ok(doc) => doc,
            Err(err) => {
                gloo::console::error!(err.to_string());
                return;
            }
        };
        let session = self.session.borrow();
        self.log.set_inner_html("");
        for msg in session.messages() {
            let Ok(el) = create_element::<HtmlElement>(&doc, "div") else { continue };
            el.set_class_name(match msg.sender {
                Sender::User => "bb-msg bb-user",
                Sender::Bot => "bb-msg bb-bot",
            });
            el.set_inner_html(&markup::render(&msg.text));
            let _ = self.log.append_child(&el);
        }
        let _ = self.typing.class_list().toggle_with_force("bb-on", session.is_typing());
        self.log.set_scroll_top(self.log.scroll_height());
    }

    fn set_open(&self, open: bool) {
        self.open.set(open);
        let _ = self.root.class_list().toggle_with_force("bb-open", open);
        if open {
            let _ = self.input.focus();
        }
    }

    fn submit(self: &Rc<Self>, text: &str) {
        let sent = self.session.borrow_mut().send(text, now_epoch_ms());
        if sent {
            self.input.set_value("");
            self.render();
            self.arm_reply_timer();
        }
    }

    fn suggest(self: &Rc<Self>, label: &str) {
        if self.session.borrow_mut().send_suggestion(label, now_epoch_ms()) {
            self.render();
            self.arm_reply_timer();
        }
    }

    /// Schedules the next delivery. Re-arming replaces (and cancels) the
    /// previous timer.
    fn arm_reply_timer(self: &Rc<Self>) {
        let Some(due) = self.session.borrow().next_due_ms() else {
            self.reply_timer.borrow_mut().take();
            return;
        };
        let wait = (due - now_epoch_ms()).max(0.0).ceil() as u32;
        let weak = Rc::downgrade(self);
        let timer = Timeout::new(wait, move || {
            if let Some(inner) = weak.upgrade() {
                inner.deliver();
            }
        });
        *self.reply_timer.borrow_mut() = Some(timer);
    }

    fn deliver(self: &Rc<Self>) {
        let host = host_info();
        let effects = {
            let mut env = self.env.borrow_mut();
            self.session.borrow_mut().poll(now_epoch_ms(), &host, &mut *env)
        };
        self.render();
        self.arm_reply_timer();

        // effects run after the reply is painted
        let mut timers = self.effect_timers.borrow_mut();
        timers.clear();
        for effect in effects {
            let weak: Weak<Self> = Rc::downgrade(self);
            timers.push(Timeout::new(0, move || {
                if let Some(inner) = weak.upgrade() {
                    inner.run_effect(&effect);
                }
            }));
        }
    }

    fn run_effect(&self, effect: &Effect) {
        self.session.borrow_mut().run_effect(effect, &mut PageEffects);
        if matches!(effect, Effect::ClearHistory) {
            self.render();
        }
    }
}

/// Mounted chat panel, hidden until opened. Dropping it cancels pending
/// replies and removes the panel.
pub struct ChatPanel {
    inner: Rc<ChatInner>,
    _listeners: Vec<EventListener>,
}

impl ChatPanel {
    pub fn mount(profile: &Profile) -> Result<Self, BuddyError> {
        let doc = document()?;
        let body = body()?;
        ensure_style(&doc)?;

        let root: HtmlElement = create_element(&doc, "section")?;
        root.set_class_name("bb-chat");
        root.set_attribute("role", "dialog")?;
        root.set_attribute("aria-label", &format!("Chat with {}", profile.assistant))?;

        let head: HtmlElement = create_element(&doc, "div")?;
        head.set_class_name("bb-head");
        let title: HtmlElement = create_element(&doc, "span")?;
        let heading = format!("{} · {}’s assistant", profile.assistant, profile.owner);
        title.set_text_content(Some(heading.as_str()));
        let close: HtmlButtonElement = create_element(&doc, "button")?;
        close.set_class_name("bb-close");
        close.set_type("button");
        close.set_attribute("aria-label", "Close chat")?;
        close.set_text_content(Some("×"));
        head.append_child(&title)?;
        head.append_child(&close)?;

        let log: HtmlElement = create_element(&doc, "div")?;
        log.set_class_name("bb-log");
        log.set_attribute("aria-live", "polite")?;

        let typing: HtmlElement = create_element(&doc, "div")?;
        typing.set_class_name("bb-typing");
        let typing_label = format!("{} is typing…", profile.assistant);
        typing.set_text_content(Some(typing_label.as_str()));

        let chips: HtmlElement = create_element(&doc, "div")?;
        chips.set_class_name("bb-chips");
        let mut chip_buttons = Vec::with_capacity(SUGGESTIONS.len());
        for (label, _) in SUGGESTIONS {
            let chip: HtmlButtonElement = create_element(&doc, "button")?;
            chip.set_class_name("bb-chip");
            chip.set_type("button");
            chip.set_text_content(Some(label));
            chips.append_child(&chip)?;
            chip_buttons.push((label, chip));
        }

        let row: HtmlElement = create_element(&doc, "div")?;
        row.set_class_name("bb-row");
        let input: HtmlInputElement = create_element(&doc, "input")?;
        input.set_class_name("bb-input");
        input.set_type("text");
        input.set_placeholder("Ask me anything…");
        let send: HtmlButtonElement = create_element(&doc, "button")?;
        send.set_class_name("bb-send");
        send.set_type("button");
        send.set_text_content(Some("Send"));
        row.append_child(&input)?;
        row.append_child(&send)?;

        for part in [&head, &log, &typing, &chips, &row] {
            root.append_child(part)?;
        }
        body.append_child(&root)?;

        let inner = Rc::new(ChatInner {
            session: RefCell::new(ChatSession::new(profile)),
            env: RefCell::new(BrowserEnv::new()?),
            root,
            log,
            typing,
            input: input.clone(),
            open: Cell::new(false),
            reply_timer: RefCell::new(None),
            effect_timers: RefCell::new(Vec::new()),
        });

        let mut listeners = Vec::new();
        {
            let inner = inner.clone();
            listeners.push(EventListener::new(&send, "click", move |_| {
                let text = inner.input.value();
                inner.submit(&text);
            }));
        }
        {
            let inner = inner.clone();
            listeners.push(EventListener::new_with_options(
                &input,
                "keydown",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    let Some(key) = event.dyn_ref::<KeyboardEvent>() else { return };
                    if key.key() == "Enter" && !key.shift_key() && !key.is_composing() {
                        event.prevent_default();
                        let text = inner.input.value();
                        inner.submit(&text);
                    }
                },
            ));
        }
        {
            let inner = inner.clone();
            listeners.push(EventListener::new(&close, "click", move |_| inner.set_open(false)));
        }
        for (label, chip) in chip_buttons {
            let inner = inner.clone();
            listeners.push(EventListener::new(&chip, "click", move |_| inner.suggest(label)));
        }

        inner.render();
        Ok(Self { inner, _listeners: listeners })
    }

    pub fn open(&self) {
        self.inner.set_open(true);
    }

    pub fn close(&self) {
        self.inner.set_open(false);
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    /// Sends a message as if typed into the input.
    pub fn send(&self, text: &str) {
        self.inner.submit(text);
    }

    pub fn handle(&self) -> ChatHandle {
        ChatHandle(Rc::downgrade(&self.inner))
    }

    #[cfg(feature = "serde_json")]
    pub fn transcript_json(&self) -> Result<String, BuddyError> {
        self.inner.session.borrow().transcript_json()
    }
}

impl Drop for ChatPanel {
    fn drop(&mut self) {
        self.inner.reply_timer.borrow_mut().take();
        self.inner.effect_timers.borrow_mut().clear();
        self.inner.root.remove();
    }
}

/// Non-owning handle used by the mascot to open the panel.
#[derive(Clone)]
pub struct ChatHandle(Weak<ChatInner>);

impl ChatHandle {
    pub fn open(&self) {
        if let Some(inner) = self.0.upgrade() {
            inner.set_open(true);
        }
    }
}
