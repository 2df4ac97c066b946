/// Page sections the chat and the nav bar can point at. The markup lives in the
/// host page; only the element ids are shared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Home,
    About,
    Projects,
    Skills,
    Contact,
}

impl Section {
    /// Sections linked from the nav bar, in display order.
    pub const NAV: [Section; 4] = [Section::Home, Section::About, Section::Projects, Section::Skills];

    pub fn anchor(&self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::About => "about",
            Section::Projects => "projects",
            Section::Skills => "skills",
            Section::Contact => "contact",
        }
    }

    pub fn from_anchor(id: &str) -> Option<Section> {
        match id.trim_start_matches('#') {
            "home" => Some(Section::Home),
            "about" => Some(Section::About),
            "projects" => Some(Section::Projects),
            "skills" => Some(Section::Skills),
            "contact" => Some(Section::Contact),
            _ => None,
        }
    }
}
