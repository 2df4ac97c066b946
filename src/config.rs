//! Static configuration: mascot tuning and the portfolio owner's profile.
//!
//! Defaults reproduce the live portfolio. With the `serde_json` feature the
//! whole [`AppConfig`] can be supplied from JS as a JSON string; any field left
//! out keeps its default.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tuning for the mascot overlay.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BuddyConfig {
    pub idle_images: Vec<String>,
    pub run_images: Vec<String>,
    /// Base sprite edge in px; the sizing policy scales it per breakpoint.
    pub base_size: f64,
    /// Viewport widths below this use the narrow-screen multiplier.
    pub narrow_breakpoint: f64,
    pub narrow_scale: f64,
    pub wide_scale: f64,
    /// Idle wait window after arriving, in ms.
    pub min_wait_ms: f64,
    pub max_wait_ms: f64,
    /// Per-frame step as a fraction of the larger viewport dimension.
    pub speed_factor: f64,
    /// Keeps wander targets this far from the right / bottom edges.
    pub edge_margin: f64,
    /// Low-pass factor applied to drag moves (1.0 = jump straight to pointer).
    pub drag_smoothing: f64,
    /// Pointer travel (px) after which a press counts as a drag, not a tap.
    pub drag_threshold: f64,
}

impl Default for BuddyConfig {
    fn default() -> Self {
        Self {
            idle_images: vec!["/cat.gif".into(), "/cat_dance.gif".into(), "/cat_yay.gif".into()],
            run_images: vec!["/cat_run.gif".into(), "/cat_jump.gif".into()],
            base_size: 70.0,
            narrow_breakpoint: 640.0,
            narrow_scale: 1.5,
            wide_scale: 2.0,
            min_wait_ms: 3000.0,
            max_wait_ms: 5000.0,
            speed_factor: 0.002,
            edge_margin: 6.0,
            drag_smoothing: 0.25,
            drag_threshold: 5.0,
        }
    }
}

/// Facts the chat assistant answers with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Profile {
    /// Portfolio owner's first name, used in replies and in the about-subject rule.
    pub owner: String,
    pub assistant: String,
    pub resume: String,
    pub email: String,
    /// Human readable phone number.
    pub phone: String,
    /// Dialable form used in `tel:` links.
    pub phone_dial: String,
    pub linkedin: String,
    pub github: String,
    pub showcase_name: String,
    pub showcase_live: String,
    pub showcase_repo: String,
    pub location: String,
    pub education: String,
    pub certifications: String,
    /// Short skills blurb for the skills reply.
    pub skills: String,
    /// Longer list for the tech-stack reply.
    pub stack: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            owner: "Abhinav".into(),
            assistant: "Ava".into(),
            resume: "/Abhi Resume.pdf".into(),
            email: "abhinavrbgore13@gmail.com".into(),
            phone: "+91 8530684793".into(),
            phone_dial: "+918530684793".into(),
            linkedin: "https://www.linkedin.com/in/abhinavgore13/".into(),
            github: "https://github.com/Abhinav1326".into(),
            showcase_name: "Smart Mails".into(),
            showcase_live: "https://smart-mail-beige.vercel.app/".into(),
            showcase_repo: "https://github.com/Abhinav1326/BE-Final-Year-Project".into(),
            location: "Ahmednagar, Maharashtra, India".into(),
            education: "B.E. in Information Technology (2021–2025), Sinhgad Institute of Technology, CGPA 8.52".into(),
            certifications: "Google IT Automation with Python, AWS Cloud Practitioner Essentials, Intro to Git & GitHub, Crash Course on Python".into(),
            skills: "React, Next.js, Tailwind, Node.js, Python, Firebase, MongoDB, and more".into(),
            stack: "React, Next.js, Tailwind CSS, Node.js, Python, Firebase, MongoDB, MySQL, Git/GitHub, AWS".into(),
        }
    }
}

/// Everything `mount_portfolio_with_config` accepts.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AppConfig {
    pub buddy: BuddyConfig,
    pub profile: Profile,
}

#[cfg(feature = "serde_json")]
impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, crate::error::BuddyError> {
        serde_json::from_str(json).map_err(|e| crate::error::BuddyError::Config(e.to_string()))
    }
}
