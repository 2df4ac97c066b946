//! Chat panel state: the message log, the simulated typing delay and the
//! deferred side effects of bot replies.
//!
//! [`ChatSession`] is driven with explicit timestamps. The browser layer arms a
//! timer for [`ChatSession::next_due_ms`] and calls [`ChatSession::poll`] when it
//! fires; tests just pass larger numbers.

pub mod markup;
pub mod rules;

use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::Profile;
use crate::env::RandomSource;
use crate::section::Section;
use rules::{HostInfo, IntentEngine, ReplyContext};

pub use rules::Reply;

/// Upper bound on the typing indicator, in ms.
pub const MAX_TYPING_MS: f64 = 1200.0;

/// Quick-reply chips shown under the log: (label, prompt sent).
pub const SUGGESTIONS: [(&str, &str); 5] = [
    ("Show projects", "Show me your projects"),
    ("Download resume", "Download resume"),
    ("Your skills", "What are your skills?"),
    ("Contact info", "How can I contact you?"),
    ("Social links", "Share your LinkedIn and GitHub"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChatMessage {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    /// Epoch milliseconds.
    pub timestamp: f64,
}

/// Something a reply asks the page to do once the reply is on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    ScrollTo(Section),
    ScrollToTop,
    OpenUrl(String),
    CopyText(String),
    ClearHistory,
}

/// Page capabilities reply effects are carried out with. Implementations
/// swallow their own failures.
pub trait EffectSink {
    fn scroll_to(&mut self, section: Section);
    fn scroll_to_top(&mut self);
    fn open_url(&mut self, url: &str);
    fn copy_text(&mut self, text: &str);
}

/// How long the typing indicator shows before replying to `text`.
pub fn typing_delay_ms(text: &str) -> f64 {
    (400.0 + 15.0 * text.chars().count() as f64).min(MAX_TYPING_MS)
}

struct PendingReply {
    prompt: String,
    delay_ms: f64,
}

pub struct ChatSession {
    engine: IntentEngine,
    messages: Vec<ChatMessage>,
    next_id: u64,
    pending: VecDeque<PendingReply>,
    // due time of the front of `pending`
    head_due_ms: Option<f64>,
}

impl ChatSession {
    pub fn new(profile: &Profile) -> Self {
        Self {
            engine: IntentEngine::new(profile),
            messages: Vec::new(),
            next_id: 1,
            pending: VecDeque::new(),
            head_due_ms: None,
        }
    }

    pub fn engine(&self) -> &IntentEngine {
        &self.engine
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while at least one reply is still queued.
    pub fn is_typing(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn next_due_ms(&self) -> Option<f64> {
        self.head_due_ms
    }

    fn push(&mut self, sender: Sender, text: String, timestamp: f64) {
        self.messages.push(ChatMessage { id: self.next_id, sender, text, timestamp });
        self.next_id += 1;
    }

    /// Appends the user message and queues a reply. Blank input is ignored
    /// and returns false.
    ///
    /// Replies are answered one at a time in send order: a reply queued behind
    /// another starts its typing delay when the earlier one is delivered.
    pub fn send(&mut self, raw: &str, now_ms: f64) -> bool {
        let text = raw.trim();
        if text.is_empty() {
            return false;
        }
        self.push(Sender::User, text.to_string(), now_ms);
        let delay_ms = typing_delay_ms(text);
        if self.head_due_ms.is_none() {
            self.head_due_ms = Some(now_ms + delay_ms);
        }
        self.pending.push_back(PendingReply { prompt: text.to_string(), delay_ms });
        true
    }

    pub fn send_suggestion(&mut self, label: &str, now_ms: f64) -> bool {
        match SUGGESTIONS.iter().find(|(l, _)| *l == label) {
            Some((_, prompt)) => self.send(prompt, now_ms),
            None => false,
        }
    }

    /// Delivers the reply whose delay has elapsed, if any, and returns the
    /// effects to run afterwards.
    pub fn poll(&mut self, now_ms: f64, host: &HostInfo, rng: &mut dyn RandomSource) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(due) = self.head_due_ms {
            if due > now_ms {
                break;
            }
            let Some(pending) = self.pending.pop_front() else {
                self.head_due_ms = None;
                break;
            };
            let reply = {
                let last_bot_message = self
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.sender == Sender::Bot)
                    .map(|m| m.text.as_str());
                let ctx = ReplyContext { host, last_bot_message };
                self.engine.reply(&pending.prompt, &ctx, rng)
            };
            self.push(Sender::Bot, reply.text, now_ms);
            effects.extend(reply.effect);
            self.head_due_ms = self.pending.front().map(|next| now_ms + next.delay_ms);
        }
        effects
    }

    /// Runs one deferred effect. History clearing is handled here; the rest
    /// goes to the page.
    pub fn run_effect(&mut self, effect: &Effect, sink: &mut dyn EffectSink) {
        match effect {
            Effect::ClearHistory => self.clear(),
            Effect::ScrollTo(section) => sink.scroll_to(*section),
            Effect::ScrollToTop => sink.scroll_to_top(),
            Effect::OpenUrl(url) => sink.open_url(url),
            Effect::CopyText(text) => sink.copy_text(text),
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    #[cfg(feature = "serde_json")]
    pub fn transcript_json(&self) -> Result<String, crate::error::BuddyError> {
        serde_json::to_string(&self.messages)
            .map_err(|e| crate::error::BuddyError::Serialize(e.to_string()))
    }
}
