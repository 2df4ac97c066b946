// Integration tests (native) for the `portfolio-buddy` crate.
// Only the browser-free parts are exercised here so they run under `cargo test`
// on the host; DOM wiring is covered by tests/web.rs.

use chrono::{FixedOffset, TimeZone};
use portfolio_buddy::chat::markup;
use portfolio_buddy::chat::rules::{FALLBACK, HostInfo};
use portfolio_buddy::env::{Environment, Lcg, RandomSource, Viewport};
use portfolio_buddy::pointer::{Gesture, PointerAdapter, PointerSample};
use portfolio_buddy::sizing::SizingPolicy;
use portfolio_buddy::{BuddyConfig, ChatSession, Effect, EffectSink, MotionController, Profile, Section, Sender};

struct FakeEnv {
    viewport: Viewport,
    now: f64,
    rng: Lcg,
}

impl RandomSource for FakeEnv {
    fn next_unit(&mut self) -> f64 {
        self.rng.next_unit()
    }
}

impl Environment for FakeEnv {
    fn viewport(&self) -> Viewport {
        self.viewport
    }
    fn now_ms(&self) -> f64 {
        self.now
    }
}

#[derive(Default)]
struct RecordingSink {
    opened: Vec<String>,
    scrolled: Vec<Section>,
}

impl EffectSink for RecordingSink {
    fn scroll_to(&mut self, section: Section) {
        self.scrolled.push(section);
    }
    fn scroll_to_top(&mut self) {}
    fn open_url(&mut self, url: &str) {
        self.opened.push(url.to_string());
    }
    fn copy_text(&mut self, _text: &str) {}
}

fn host() -> HostInfo {
    HostInfo {
        local_time: FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
        time_zone: "UTC".into(),
        clipboard_available: true,
    }
}

/// Sends one message and waits long enough for its reply.
fn exchange(session: &mut ChatSession, text: &str, now: &mut f64, rng: &mut Lcg) -> (String, Vec<Effect>) {
    assert!(session.send(text, *now));
    *now += 5_000.0;
    let effects = session.poll(*now, &host(), rng);
    let last = session.messages().last().expect("reply delivered");
    assert_eq!(last.sender, Sender::Bot);
    (last.text.clone(), effects)
}

#[test]
fn sprite_stays_inside_viewport_across_resizes() {
    let cfg = BuddyConfig::default();
    let sizing = SizingPolicy::from_config(&cfg);
    let mut env = FakeEnv { viewport: Viewport::new(1400.0, 900.0), now: 0.0, rng: Lcg::new(9) };
    let mut ctl = MotionController::new(cfg, sizing.size_for(env.viewport), env.viewport, 0.0);

    let viewports = [(1400.0, 900.0), (320.0, 560.0), (800.0, 300.0), (639.0, 1000.0), (1920.0, 1080.0), (150.0, 150.0)];
    for (i, &(w, h)) in viewports.iter().cycle().take(30).enumerate() {
        for _ in 0..40 {
            env.now += 16.0;
            ctl.tick(&mut env);
        }
        env.viewport = Viewport::new(w, h);
        sizing.apply(&mut ctl, env.viewport);
        let p = ctl.position();
        let max = ctl.max_corner(env.viewport);
        assert!(p.x >= 0.0 && p.x <= max.x, "round {i}: x {} outside 0..={}", p.x, max.x);
        assert!(p.y >= 0.0 && p.y <= max.y, "round {i}: y {} outside 0..={}", p.y, max.y);
    }
}

#[test]
fn dragging_freezes_wandering_until_release() {
    let mut env = FakeEnv { viewport: Viewport::new(1000.0, 800.0), now: 0.0, rng: Lcg::new(4) };
    let mut ctl = MotionController::new(BuddyConfig::default(), 140.0, env.viewport, 0.0);
    let mut pointer = PointerAdapter::new();
    env.now = 16.0;
    ctl.tick(&mut env);
    assert!(ctl.is_moving());

    let p = ctl.position();
    assert!(pointer.on_pointer_down(&PointerSample::at(1, p.x + 10.0, p.y + 10.0), &mut ctl));
    let held = ctl.position();
    for _ in 0..60 {
        env.now += 16.0;
        ctl.tick(&mut env);
    }
    assert_eq!(ctl.position(), held);
    assert!(ctl.is_dragging());
}

#[test]
fn taps_open_and_drags_do_not() {
    let mut rng = Lcg::new(2);
    let vp = Viewport::new(1000.0, 800.0);
    let mut ctl = MotionController::new(BuddyConfig::default(), 140.0, vp, 0.0);
    let mut pointer = PointerAdapter::new();

    // tap: 3px of travel
    pointer.on_pointer_down(&PointerSample::at(1, 60.0, 650.0), &mut ctl);
    pointer.on_pointer_move(&PointerSample::at(1, 63.0, 650.0), &mut ctl, vp);
    let g = pointer.on_pointer_up(&PointerSample::at(1, 63.0, 650.0), &mut ctl, 100.0, &mut rng);
    assert_eq!(g, Some(Gesture::Tap));
    assert!(pointer.on_click());

    // drag: 200px of travel
    pointer.on_pointer_down(&PointerSample::at(2, 60.0, 650.0), &mut ctl);
    for step in 1..=20 {
        pointer.on_pointer_move(&PointerSample::at(2, 60.0 + 10.0 * step as f64, 650.0), &mut ctl, vp);
    }
    let g = pointer.on_pointer_up(&PointerSample::at(2, 260.0, 650.0), &mut ctl, 200.0, &mut rng);
    assert_eq!(g, Some(Gesture::Drag));
    assert!(!pointer.on_click(), "click after a drag is swallowed");
    assert!(pointer.on_click(), "only once");
}

#[test]
fn greeting_replies_with_a_known_variant() {
    let profile = Profile::default();
    let mut rng = Lcg::new(21);
    let mut now = 0.0;
    for _ in 0..5 {
        let mut session = ChatSession::new(&profile);
        let (reply, effects) = exchange(&mut session, "hi", &mut now, &mut rng);
        assert!(effects.is_empty());
        assert!(reply.starts_with("Hi there!") || reply.starts_with("Hello!") || reply.starts_with("Hey!"), "{reply}");
        assert!(reply.contains(&profile.assistant));
    }
}

#[test]
fn resume_link_and_download_command() {
    let profile = Profile::default();
    let mut session = ChatSession::new(&profile);
    let mut rng = Lcg::new(1);
    let mut now = 0.0;

    let (reply, effects) = exchange(&mut session, "resume", &mut now, &mut rng);
    assert!(effects.is_empty());
    assert_eq!(markup::link_labels(&reply), ["Resume"]);
    assert!(markup::render(&reply).contains(&format!(r#"href="{}""#, profile.resume)));

    let (_, effects) = exchange(&mut session, "Download resume", &mut now, &mut rng);
    assert_eq!(effects, vec![Effect::OpenUrl(profile.resume.clone())]);
    let mut sink = RecordingSink::default();
    for e in &effects {
        session.run_effect(e, &mut sink);
    }
    assert_eq!(sink.opened, [profile.resume]);
}

#[test]
fn clear_acknowledges_then_empties_the_log() {
    let mut session = ChatSession::new(&Profile::default());
    let mut rng = Lcg::new(1);
    let mut now = 0.0;
    exchange(&mut session, "hello", &mut now, &mut rng);
    let (ack, effects) = exchange(&mut session, "clear", &mut now, &mut rng);
    assert_eq!(ack, "Cleared. How can I help next?");
    assert_eq!(session.messages().len(), 4, "ack is shown before the clear runs");
    let mut sink = RecordingSink::default();
    for e in &effects {
        session.run_effect(e, &mut sink);
    }
    assert!(session.messages().is_empty());
}

#[test]
fn user_markup_is_escaped() {
    let mut session = ChatSession::new(&Profile::default());
    session.send("<script>alert(1)</script>", 0.0);
    let html = markup::render(&session.messages()[0].text);
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[test]
fn skills_question_links_the_section() {
    let mut session = ChatSession::new(&Profile::default());
    let mut rng = Lcg::new(1);
    let mut now = 0.0;
    let (reply, _) = exchange(&mut session, "What are your skills?", &mut now, &mut rng);
    assert!(markup::link_labels(&reply).contains(&"Skills"), "{reply}");
    assert!(markup::render(&reply).contains(r##"href="#skills""##));
}

#[test]
fn gibberish_gets_the_fallback() {
    let mut session = ChatSession::new(&Profile::default());
    let mut rng = Lcg::new(1);
    let mut now = 0.0;
    assert_eq!(session.engine().classify("asdkjalksd"), FALLBACK);
    let (reply, effects) = exchange(&mut session, "asdkjalksd", &mut now, &mut rng);
    assert_eq!(reply, session.engine().fallback_text());
    assert!(effects.is_empty());
}

#[test]
fn navigation_commands_scroll_after_delivery() {
    let mut session = ChatSession::new(&Profile::default());
    let mut rng = Lcg::new(1);
    let mut now = 0.0;
    let (_, effects) = exchange(&mut session, "take me to projects", &mut now, &mut rng);
    let mut sink = RecordingSink::default();
    for e in &effects {
        session.run_effect(e, &mut sink);
    }
    assert_eq!(sink.scrolled, [Section::Projects]);
}
