//! Portfolio buddy: a wandering, draggable mascot and a canned-answer chat
//! assistant for a single-page portfolio.
//!
//! The simulation and the chat engine are plain Rust driven by explicit
//! timestamps and an injected [`env::Environment`]; `dom` wires them to the
//! page. JS only needs `mount_portfolio()`.

use std::rc::Rc;

use wasm_bindgen::prelude::*;

pub mod chat;
pub mod config;
pub mod dom;
pub mod env;
pub mod error;
pub mod motion;
pub mod pointer;
pub mod scroll_spy;
pub mod section;
pub mod sizing;

pub use chat::{ChatMessage, ChatSession, Effect, EffectSink, Sender};
pub use config::{AppConfig, BuddyConfig, Profile};
pub use error::BuddyError;
pub use motion::{MotionController, MotionState, Point, Pose};
pub use section::Section;

use dom::chat_panel::ChatPanel;
use dom::nav::NavHighlighter;
use dom::overlay::MascotOverlay;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Everything mounted on the page. Dropping it (or calling `unmount`) removes
/// the widgets and stops all timers and listeners.
#[wasm_bindgen]
pub struct PortfolioApp {
    // mascot first: its click handler only holds a weak handle to the panel
    mascot: Option<MascotOverlay>,
    chat: Option<ChatPanel>,
    nav: Option<NavHighlighter>,
}

impl PortfolioApp {
    pub fn mount(config: AppConfig) -> Result<Self, BuddyError> {
        let chat = ChatPanel::mount(&config.profile)?;
        let handle = chat.handle();
        let mascot = MascotOverlay::mount(config.buddy, Rc::new(move || handle.open()))?;
        let nav = match NavHighlighter::mount() {
            Ok(nav) => Some(nav),
            Err(err) => {
                gloo::console::warn!("nav highlighting disabled:", err.to_string());
                None
            }
        };
        Ok(Self { mascot: Some(mascot), chat: Some(chat), nav })
    }
}

#[wasm_bindgen]
impl PortfolioApp {
    pub fn open_chat(&self) {
        if let Some(chat) = &self.chat {
            chat.open();
        }
    }

    pub fn close_chat(&self) {
        if let Some(chat) = &self.chat {
            chat.close();
        }
    }

    pub fn is_chat_open(&self) -> bool {
        self.chat.as_ref().is_some_and(ChatPanel::is_open)
    }

    /// Sends `text` through the chat as if the visitor typed it.
    pub fn send_message(&self, text: &str) {
        if let Some(chat) = &self.chat {
            chat.send(text);
        }
    }

    pub fn unmount(&mut self) {
        self.mascot.take();
        self.chat.take();
        self.nav.take();
    }

    #[cfg(feature = "serde_json")]
    pub fn transcript_json(&self) -> Result<String, JsValue> {
        match &self.chat {
            Some(chat) => Ok(chat.transcript_json()?),
            None => Ok("[]".to_string()),
        }
    }
}

/// Mounts the mascot, chat panel and nav highlighting with the default config.
#[wasm_bindgen]
pub fn mount_portfolio() -> Result<PortfolioApp, JsValue> {
    Ok(PortfolioApp::mount(AppConfig::default())?)
}

/// Like [`mount_portfolio`], with a JSON [`AppConfig`]. Missing fields keep
/// their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn mount_portfolio_with_config(json: &str) -> Result<PortfolioApp, JsValue> {
    Ok(PortfolioApp::mount(AppConfig::from_json(json)?)?)
}
