/// Deepest heading level tracked (`######`)
pub const MAX_HEADING_LEVEL: usize = 6;

/// Separator used when rendering a section path
pub const PATH_SEPARATOR: &str = " > ";

/// The active section path: one title slot per heading level.
///
/// Setting a level clears every deeper level, so the path only ever holds
/// the most recent heading seen at or above each level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingPath {
    slots: [String; MAX_HEADING_LEVEL],
}

impl HeadingPath {
    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a heading at `level` (clamped to 1..=6) and reset deeper levels
    pub fn set(&mut self, level: usize, title: &str) {
        let level = level.clamp(1, MAX_HEADING_LEVEL);
        self.slots[level - 1] = title.trim().to_string();
        for slot in &mut self.slots[level..] {
            slot.clear();
        }
    }

    /// Title currently held at `level`, if any
    pub fn title_at(&self, level: usize) -> Option<&str> {
        if !(1..=MAX_HEADING_LEVEL).contains(&level) {
            return None;
        }
        let title = self.slots[level - 1].as_str();
        (!title.is_empty()).then_some(title)
    }

    /// Non-empty titles in ascending level order
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .map(String::as_str)
            .filter(|title| !title.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.segments().next().is_none()
    }

    /// Render as `"A > B > C"`
    pub fn render(&self) -> String {
        self.segments().collect::<Vec<_>>().join(PATH_SEPARATOR)
    }
}
