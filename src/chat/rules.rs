//! Ordered intent rules for the canned-answer assistant.
//!
//! Each rule pairs a predicate over the normalized input with a responder.
//! Rules are tried top to bottom and the first match answers; nothing matching
//! yields the fallback text. Command variants ("open skills", "download
//! resume") sit directly above the keyword rule they refine so they stay
//! reachable.

use chrono::{DateTime, FixedOffset};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

use super::Effect;
use crate::config::Profile;
use crate::env::RandomSource;
use crate::section::Section;

/// Intent name reported when no rule matched.
pub const FALLBACK: &str = "fallback";

// Same unreserved set as JS `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Facts about the hosting page the time, date and copy rules need.
#[derive(Clone, Debug)]
pub struct HostInfo {
    pub local_time: DateTime<FixedOffset>,
    /// IANA zone name when the host knows it, otherwise a UTC offset label.
    pub time_zone: String,
    pub clipboard_available: bool,
}

pub struct ReplyContext<'a> {
    pub host: &'a HostInfo,
    pub last_bot_message: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub intent: &'static str,
    pub text: String,
    pub effect: Option<Effect>,
}

struct Answer {
    text: String,
    effect: Option<Effect>,
}

impl Answer {
    fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), effect: None }
    }

    fn with(text: impl Into<String>, effect: Effect) -> Self {
        Self { text: text.into(), effect: Some(effect) }
    }
}

type Respond = Box<dyn Fn(&str, &ReplyContext<'_>, &mut dyn RandomSource) -> Answer>;

enum Matcher {
    Any(Regex),
    /// Every pattern must match.
    All(Vec<Regex>),
    /// `when` matches and `unless` does not.
    Unless { when: Regex, unless: Regex },
}

impl Matcher {
    fn matches(&self, text: &str) -> bool {
        match self {
            Matcher::Any(re) => re.is_match(text),
            Matcher::All(res) => res.iter().all(|re| re.is_match(text)),
            Matcher::Unless { when, unless } => when.is_match(text) && !unless.is_match(text),
        }
    }
}

pub struct IntentRule {
    name: &'static str,
    matcher: Matcher,
    respond: Respond,
}

impl IntentRule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Expects already normalized text (see [`normalize`]).
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.matches(text)
    }
}

pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("intent pattern compiles")
}

fn rule(name: &'static str, pattern: &str, respond: Respond) -> IntentRule {
    IntentRule { name, matcher: Matcher::Any(re(pattern)), respond }
}

fn say(text: impl Into<String>) -> Respond {
    let text = text.into();
    Box::new(move |_, _, _| Answer::text(text.clone()))
}

fn one_of(options: Vec<String>) -> Respond {
    Box::new(move |_, _, rng| Answer::text(options[rng.pick_index(options.len())].clone()))
}

fn act(text: impl Into<String>, effect: Effect) -> Respond {
    let text = text.into();
    Box::new(move |_, _, _| Answer::with(text.clone(), effect.clone()))
}

pub fn mailto(email: &str, subject: Option<&str>, body: Option<&str>) -> String {
    let mut url = format!("mailto:{email}");
    let mut sep = '?';
    for (key, value) in [("subject", subject), ("body", body)] {
        if let Some(value) = value {
            url.push(sep);
            url.push_str(key);
            url.push('=');
            url.push_str(&utf8_percent_encode(value, URI_COMPONENT).to_string());
            sep = '&';
        }
    }
    url
}

pub struct IntentEngine {
    rules: Vec<IntentRule>,
    fallback: String,
}

impl IntentEngine {
    pub fn new(profile: &Profile) -> Self {
        Self {
            rules: build_rules(profile),
            fallback: format!(
                "I didn't catch that. Try asking about {}’s projects, skills, resume, or contact info.",
                profile.owner
            ),
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &IntentRule> {
        self.rules.iter()
    }

    pub fn fallback_text(&self) -> &str {
        &self.fallback
    }

    /// Name of the rule that would answer `raw`, without running it.
    pub fn classify(&self, raw: &str) -> &'static str {
        let text = normalize(raw);
        self.rules
            .iter()
            .find(|r| r.matches(&text))
            .map(|r| r.name)
            .unwrap_or(FALLBACK)
    }

    pub fn reply(&self, raw: &str, ctx: &ReplyContext<'_>, rng: &mut dyn RandomSource) -> Reply {
        let text = normalize(raw);
        match self.rules.iter().find(|r| r.matches(&text)) {
            Some(rule) => {
                let answer = (rule.respond)(&text, ctx, rng);
                Reply { intent: rule.name, text: answer.text, effect: answer.effect }
            }
            None => Reply { intent: FALLBACK, text: self.fallback.clone(), effect: None },
        }
    }
}

fn build_rules(p: &Profile) -> Vec<IntentRule> {
    let who = p.owner.clone();
    let me = p.assistant.clone();
    let owner_re = regex::escape(&p.owner.to_lowercase());
    let showcase_re = regex::escape(&p.showcase_name.to_lowercase());
    let resume = format!("[Resume]({})", p.resume);
    let open_cmd = r"\b(open|go\s*to|take\s*me\s*to|show\s*me)\s+(the\s+)?";

    let mut rules = Vec::new();

    rules.push(rule(
        "greeting",
        r"\b(hi|hii|hiii|hello|hey|heyy|hiya|yo)\b",
        one_of(vec![
            format!("Hi there! I’m {me}, {who}’s assistant. Want to peek at his [Projects](#projects) or grab his {resume}?"),
            format!("Hello! I’m {me}, here for anything about {who}: [Projects](#projects), [Skills](#skills), [Contact](#contact)."),
            format!("Hey! I’m {me}. I can open [Projects](#projects), share [Skills](#skills), or fetch his {resume}."),
        ]),
    ));

    let tod = re(r"good\s+(morning|afternoon|evening|night)\b");
    let tod_parts = tod.clone();
    let by_part: Vec<(&'static str, Vec<String>)> = vec![
        ("morning", vec![
            format!("Good morning! Ready to check {who}’s [Projects](#projects)?"),
            format!("Morning! Coffee and code. Want his {resume}?"),
        ]),
        ("afternoon", vec![
            format!("Good afternoon! Need {who}’s [Skills](#skills) or [Contact](#contact)?"),
            "Afternoon! I can open his [Projects](#projects) if you’d like.".to_string(),
        ]),
        ("evening", vec![
            format!("Good evening! Fancy a tour of {who}’s [Projects](#projects)?"),
            format!("Evening! I can send over his {resume}."),
        ]),
        ("night", vec![
            format!("Good night! Before you go, want {who}’s {resume}?"),
            "Night owl, huh? Here are his [Projects](#projects).".to_string(),
        ]),
    ];
    rules.push(IntentRule {
        name: "time_of_day",
        matcher: Matcher::Any(tod),
        respond: Box::new(move |text, _, rng| {
            let part = tod_parts
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match by_part.iter().find(|(name, _)| *name == part) {
                Some((_, options)) => Answer::text(options[rng.pick_index(options.len())].clone()),
                None => Answer::text("Hello!"),
            }
        }),
    });

    rules.push(rule(
        "identity",
        r"\b(who\s+are\s+you|your\s+name|introduce|what\s+are\s+you|who\s+are\s*u|who\s*r\s*u)\b",
        one_of(vec![
            format!("I’m {me}, {who}’s assistant and your guide to his work, skills, and contact details."),
            format!("I’m {me}, the friendly assistant for {who}’s portfolio. Ask me for projects, resume, or socials!"),
        ]),
    ));

    rules.push(rule(
        "about_owner",
        &format!(r"\b(tell\s*me\s*about\s*{owner_re}|about\s*{owner_re}|who\s*is\s*{owner_re})\b"),
        one_of(vec![
            format!("{who} is a full‑stack developer (React/Next.js, Node.js, Python) who loves building clean, performant apps. Learn more [About {who}](#about)."),
            format!("{}. He has built projects like {} and has a keen eye for UX and performance. See the [About](#about) section.", p.education, p.showcase_name),
        ]),
    ));

    rules.push(rule(
        "mood",
        r"how\s+are\s+you|how['’]?s\s+it\s+going|what['’]?s\s+up",
        one_of(vec![
            format!("I’m great and ready to help! Want [Projects](#projects) or {resume}?"),
            "Doing well! Can I open [Skills](#skills) for you?".to_string(),
        ]),
    ));

    rules.push(rule(
        "gratitude",
        r"\b(thanks|thank\s*you|ty)\b|appreciate",
        one_of(vec![
            format!("Anytime! Need anything else about {who}?"),
            "You’re welcome! Want to see his [Projects](#projects)?".to_string(),
        ]),
    ));

    rules.push(rule(
        "joke",
        r"joke|something\s+funny",
        one_of(vec![
            "Why do programmers prefer dark mode? Because light attracts bugs. 🐛".to_string(),
            "I told the server a joke. Now it’s in a great response. 😉".to_string(),
        ]),
    ));

    // --- portfolio keywords ---

    rules.push(rule(
        "open_projects",
        &format!(r"{open_cmd}projects?\b"),
        act("Jumping to [Projects](#projects) section… 👇", Effect::ScrollTo(Section::Projects)),
    ));
    rules.push(rule(
        "projects",
        r"project",
        say(format!(
            "Here are {who}’s [Projects](#projects). Try {}: [Live]({}) • [Repo]({}).",
            p.showcase_name, p.showcase_live, p.showcase_repo
        )),
    ));

    rules.push(rule(
        "open_resume",
        r"\b(download|open|get)\s+(the\s+|your\s+|his\s+)?(resume|cv)\b",
        act(
            format!("Opening the resume in a new tab… 📄 If nothing opens, here it is: {resume}."),
            Effect::OpenUrl(p.resume.clone()),
        ),
    ));
    rules.push(rule(
        "resume",
        r"resume|\bcv\b",
        say(format!("You can download {who}’s resume here: {resume}.")),
    ));

    rules.push(rule(
        "open_skills",
        &format!(r"{open_cmd}skills?\b"),
        act("Scrolling to [Skills](#skills)… 👇", Effect::ScrollTo(Section::Skills)),
    ));
    rules.push(rule(
        "skills",
        r"skill",
        say(format!("{who}’s skills include {}. See [Skills](#skills).", p.skills)),
    ));

    rules.push(rule(
        "open_contact",
        &format!(r"{open_cmd}contact\b"),
        act("Heading to [Contact](#contact) section… 👇", Effect::ScrollTo(Section::Contact)),
    ));
    rules.push(IntentRule {
        name: "contact",
        matcher: Matcher::Unless {
            when: re(r"contact|email|phone"),
            // left to the compose / open-email / dial commands further down
            unless: re(r"(compose|write)\s*(an\s*)?email|open\s+email|\b(call|dial)\b|phone\s*now"),
        },
        respond: say(format!(
            "Reach {who} at Email: [{email}](mailto:{email})\nPhone: [{phone}](tel:{dial}). Or visit the [Contact](#contact) section.",
            email = p.email,
            phone = p.phone,
            dial = p.phone_dial,
        )),
    });

    let (linkedin, github) = (p.linkedin.clone(), p.github.clone());
    rules.push(IntentRule {
        name: "open_social",
        matcher: Matcher::Any(re(r"open\s+(linkedin|github)")),
        respond: {
            let who = who.clone();
            Box::new(move |text, _, _| {
                if text.contains("linkedin") {
                    Answer::with(format!("Opening {who}’s LinkedIn…"), Effect::OpenUrl(linkedin.clone()))
                } else {
                    Answer::with(format!("Opening {who}’s GitHub…"), Effect::OpenUrl(github.clone()))
                }
            })
        },
    });
    rules.push(rule(
        "social",
        r"linkedin|github|social",
        say(format!("{who}’s profiles: [LinkedIn]({})\n[GitHub]({})", p.linkedin, p.github)),
    ));

    rules.push(IntentRule {
        name: "showcase_live",
        matcher: Matcher::All(vec![re(&showcase_re), re(r"\b(live|demo)\b")]),
        respond: say(format!(
            "Here’s the live demo of {who}’s {name}: [{name} Live]({})",
            p.showcase_live,
            name = p.showcase_name
        )),
    });
    rules.push(IntentRule {
        name: "showcase_repo",
        matcher: Matcher::All(vec![re(&showcase_re), re(r"code|repo")]),
        respond: say(format!(
            "Repository for {who}’s {name}: [{name} Repo]({})",
            p.showcase_repo,
            name = p.showcase_name
        )),
    });
    rules.push(IntentRule {
        name: "showcase_details",
        matcher: Matcher::All(vec![re(&showcase_re), re(r"what|about|feature")]),
        respond: say(format!(
            "{} is an AI‑assisted tool that auto‑extracts recruiter emails and sends customized job applications. See it [Live]({}) or the [Repo]({}).",
            p.showcase_name, p.showcase_live, p.showcase_repo
        )),
    });

    rules.push(rule(
        "open_about",
        &format!(r"{open_cmd}about\b"),
        act("Taking you to the [About](#about) section…", Effect::ScrollTo(Section::About)),
    ));
    rules.push(rule(
        "about",
        r"about",
        say(format!(
            "{who} is a full‑stack developer who enjoys building clean, performant apps. Learn more [About {who}](#about)."
        )),
    ));

    rules.push(rule(
        "help",
        r"help|what\s+can\s+you\s+do",
        say(format!(
            "I’m {who}’s assistant. I can show his [Projects](#projects), open his {resume}, share his [Skills](#skills), and provide [Contact](#contact) or social links."
        )),
    ));
    rules.push(rule(
        "location",
        r"where.*(from|located|based)|location",
        say(format!("{who} is based in {}. You can reach him via [Contact](#contact).", p.location)),
    ));
    rules.push(rule(
        "education",
        r"education|study|college|degree",
        say(format!("{}. More in [About](#about).", p.education)),
    ));
    rules.push(rule(
        "certifications",
        r"certification|courses",
        say(format!("Certifications: {}. See [About](#about).", p.certifications)),
    ));
    rules.push(rule(
        "tech_stack",
        r"tech\s*stack|stack|technologies|tools",
        say(format!("Primary stack: {}. See [Skills](#skills).", p.stack)),
    ));

    // --- utilities ---

    rules.push(IntentRule {
        name: "time",
        matcher: Matcher::Any(re(r"what\s*time|current\s*time|time\s*now")),
        respond: Box::new(|_, ctx, _| {
            Answer::text(format!(
                "It’s {} ({}).",
                ctx.host.local_time.format("%-I:%M:%S %p"),
                ctx.host.time_zone
            ))
        }),
    });
    rules.push(IntentRule {
        name: "date",
        matcher: Matcher::Any(re(r"today['’]?s\s*date|date\s*today|what\s*date")),
        respond: Box::new(|_, ctx, _| {
            Answer::text(format!("Today is {}.", ctx.host.local_time.format("%-m/%-d/%Y")))
        }),
    });

    rules.push(rule(
        "clear",
        r"^(clear|reset)\s*(chat|conversation)?$",
        act("Cleared. How can I help next?", Effect::ClearHistory),
    ));

    rules.push(IntentRule {
        name: "copy_last",
        matcher: Matcher::Any(re(r"copy\s*that|copy\s*message|copy\s*last")),
        respond: Box::new(|_, ctx, _| match ctx.last_bot_message {
            Some(last) if ctx.host.clipboard_available => Answer::with(
                "Copied the last message to your clipboard.",
                Effect::CopyText(last.to_string()),
            ),
            _ => Answer::text("There’s nothing to copy yet."),
        }),
    });

    rules.push(rule(
        "compose_email",
        r"(compose|write)\s*(an\s*)?email",
        act(
            "Opening your email client with a prefilled draft…",
            Effect::OpenUrl(mailto(
                &p.email,
                Some("Regarding an opportunity"),
                Some(&format!(
                    "Hello {who},\n\nI came across your portfolio and would love to connect regarding...\n\nBest regards,\n"
                )),
            )),
        ),
    ));

    // --- navigation ---

    rules.push(rule(
        "go_home",
        r"go\s*home|back\s*to\s*top|open\s*home",
        act("Taking you to the top…", Effect::ScrollToTop),
    ));
    rules.push(rule(
        "open_email",
        r"open\s+email",
        act("Opening your email client…", Effect::OpenUrl(mailto(&p.email, None, None))),
    ));
    rules.push(rule(
        "call",
        r"\b(call|dial)\b|phone\s*now",
        act("Opening your dialer…", Effect::OpenUrl(format!("tel:{}", p.phone_dial))),
    ));

    rules.push(rule(
        "farewell",
        r"\b(bye|goodbye|see\s*ya|later)\b",
        one_of(vec![
            format!("Bye! Ping me anytime if you need {who}’s details."),
            format!("See you later! I’ll be here if you need anything about {who}."),
        ]),
    ));

    rules.push(rule(
        "hiring",
        r"hire|work\s*with|collaborate|freelance|available",
        say(format!(
            "{who} is open to opportunities and collaborations. Reach out via [Contact](#contact) or email [{email}](mailto:{email}).",
            email = p.email
        )),
    ));

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Lcg;
    use chrono::TimeZone;

    fn host() -> HostInfo {
        HostInfo {
            local_time: FixedOffset::east_opt(5 * 3600 + 1800)
                .unwrap()
                .with_ymd_and_hms(2026, 10, 19, 15, 4, 5)
                .unwrap(),
            time_zone: "Asia/Kolkata".into(),
            clipboard_available: true,
        }
    }

    fn ask(engine: &IntentEngine, text: &str) -> Reply {
        let h = host();
        let ctx = ReplyContext { host: &h, last_bot_message: None };
        engine.reply(text, &ctx, &mut Lcg::new(11))
    }

    #[test]
    fn rule_names_are_unique() {
        let engine = IntentEngine::new(&Profile::default());
        let mut names: Vec<_> = engine.rules().map(|r| r.name()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn classify_follows_priority_order() {
        let e = IntentEngine::new(&Profile::default());
        let cases = [
            ("Hello there", "greeting"),
            ("good evening", "time_of_day"),
            ("what's your name", "identity"),
            ("Tell me about Abhinav", "about_owner"),
            ("how are you", "mood"),
            ("thank you!", "gratitude"),
            ("tell me a joke", "joke"),
            ("open projects", "open_projects"),
            ("Show me your projects", "projects"),
            ("Download resume", "open_resume"),
            ("do you have a cv", "resume"),
            ("open skills", "open_skills"),
            ("How can I contact you?", "contact"),
            ("open contact", "open_contact"),
            ("open linkedin", "open_social"),
            ("Share your LinkedIn and GitHub", "social"),
            ("smart mails live demo", "showcase_live"),
            ("smart mails repo", "showcase_repo"),
            ("what is smart mails", "showcase_details"),
            ("open about", "open_about"),
            ("what can you do", "help"),
            ("where are you based", "location"),
            ("which college", "education"),
            ("any certifications", "certifications"),
            ("tech stack", "tech_stack"),
            ("what time is it", "time"),
            ("what date is it", "date"),
            ("clear", "clear"),
            ("reset chat", "clear"),
            ("copy that", "copy_last"),
            ("compose an email", "compose_email"),
            ("back to top", "go_home"),
            ("open email", "open_email"),
            ("call now", "call"),
            ("goodbye", "farewell"),
            ("can we collaborate", "hiring"),
            ("asdkjalksd", FALLBACK),
        ];
        for (input, want) in cases {
            assert_eq!(e.classify(input), want, "input {input:?}");
        }
    }

    #[test]
    fn ty_needs_word_boundary() {
        let e = IntentEngine::new(&Profile::default());
        assert_ne!(e.classify("pretty city"), "gratitude");
        assert_eq!(e.classify("ty"), "gratitude");
    }

    #[test]
    fn time_and_date_use_host_clock() {
        let e = IntentEngine::new(&Profile::default());
        assert_eq!(ask(&e, "what time is it").text, "It’s 3:04:05 PM (Asia/Kolkata).");
        assert_eq!(ask(&e, "what date").text, "Today is 10/19/2026.");
    }

    #[test]
    fn time_of_day_picks_matching_part() {
        let e = IntentEngine::new(&Profile::default());
        let r = ask(&e, "Good Morning!");
        assert!(r.text.starts_with("Good morning") || r.text.starts_with("Morning"), "{}", r.text);
    }

    #[test]
    fn copy_last_needs_message_and_clipboard() {
        let e = IntentEngine::new(&Profile::default());
        let mut h = host();
        let ctx = ReplyContext { host: &h, last_bot_message: None };
        let r = e.reply("copy last", &ctx, &mut Lcg::new(1));
        assert_eq!(r.text, "There’s nothing to copy yet.");
        assert_eq!(r.effect, None);

        let ctx = ReplyContext { host: &h, last_bot_message: Some("hello") };
        let r = e.reply("copy last", &ctx, &mut Lcg::new(1));
        assert_eq!(r.effect, Some(Effect::CopyText("hello".into())));

        h.clipboard_available = false;
        let ctx = ReplyContext { host: &h, last_bot_message: Some("hello") };
        assert_eq!(e.reply("copy last", &ctx, &mut Lcg::new(1)).effect, None);
    }

    #[test]
    fn compose_email_encodes_like_uri_component() {
        let e = IntentEngine::new(&Profile::default());
        let r = ask(&e, "write email");
        match r.effect {
            Some(Effect::OpenUrl(url)) => {
                assert!(url.starts_with("mailto:abhinavrbgore13@gmail.com?subject=Regarding%20an%20opportunity&body=Hello%20Abhinav%2C%0A%0A"), "{url}");
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn call_opens_dialer() {
        let e = IntentEngine::new(&Profile::default());
        assert_eq!(ask(&e, "dial him").effect, Some(Effect::OpenUrl("tel:+918530684793".into())));
    }

    #[test]
    fn owner_name_comes_from_profile() {
        let profile = Profile { owner: "Sam".into(), ..Profile::default() };
        let e = IntentEngine::new(&profile);
        assert_eq!(e.classify("who is sam"), "about_owner");
        assert_eq!(e.classify("who is abhinav"), FALLBACK);
        assert!(e.fallback_text().contains("Sam’s projects"));
    }
}
