use ratatui::layout::Rect;

// ── Panel identity ──

/// The seven panels of the dashboard. The discriminant is the number shown
/// in the panel title and the digit key that focuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    Main = 0,
    Status = 1,
    Files = 2,
    Branches = 3,
    Commits = 4,
    Stash = 5,
    Secondary = 6,
}

impl PanelId {
    pub const ALL: [PanelId; 7] = [
        PanelId::Main,
        PanelId::Status,
        PanelId::Files,
        PanelId::Branches,
        PanelId::Commits,
        PanelId::Stash,
        PanelId::Secondary,
    ];

    /// Left column, top to bottom
    pub const LEFT: [PanelId; 5] = [
        PanelId::Status,
        PanelId::Files,
        PanelId::Branches,
        PanelId::Commits,
        PanelId::Stash,
    ];

    /// Right column, top to bottom
    pub const RIGHT: [PanelId; 2] = [PanelId::Main, PanelId::Secondary];

    /// Tab order
    pub const FOCUS_ORDER: [PanelId; 7] = [
        PanelId::Status,
        PanelId::Files,
        PanelId::Branches,
        PanelId::Commits,
        PanelId::Stash,
        PanelId::Main,
        PanelId::Secondary,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<PanelId> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            PanelId::Main => "Main",
            PanelId::Status => "Status",
            PanelId::Files => "Files",
            PanelId::Branches => "Branches",
            PanelId::Commits => "Commits",
            PanelId::Stash => "Stash",
            PanelId::Secondary => "Secondary",
        }
    }

    /// Panels whose content is a list of selectable lines
    pub fn is_list(self) -> bool {
        matches!(
            self,
            PanelId::Files | PanelId::Branches | PanelId::Commits | PanelId::Stash
        )
    }

    /// Panels that show a scrollbar only while focused
    pub fn scrollbar_needs_focus(self) -> bool {
        matches!(self, PanelId::Stash | PanelId::Secondary)
    }

    /// Whether focusing this panel makes it the source of the main view
    pub fn drives_main(self) -> bool {
        PanelId::LEFT.contains(&self)
    }

    pub fn next(self) -> PanelId {
        let pos = Self::focus_position(self);
        Self::FOCUS_ORDER[(pos + 1) % Self::FOCUS_ORDER.len()]
    }

    pub fn prev(self) -> PanelId {
        let pos = Self::focus_position(self);
        let len = Self::FOCUS_ORDER.len();
        Self::FOCUS_ORDER[(pos + len - 1) % len]
    }

    fn focus_position(id: PanelId) -> usize {
        Self::FOCUS_ORDER.iter().position(|p| *p == id).unwrap_or(0)
    }
}

// ── Panel state ──

/// Content, selection and viewport of one panel
#[derive(Debug, Clone)]
pub struct Panel {
    /// Raw content as delivered by git (may contain escape codes)
    pub content: String,
    /// Selectable lines, only populated for list panels
    pub lines: Vec<String>,
    pub cursor: usize,
    /// First visible line
    pub scroll: usize,
    /// Visible rows inside the border
    pub viewport_height: usize,
}

impl Panel {
    pub fn new(placeholder: &str) -> Self {
        Self {
            content: placeholder.to_string(),
            lines: Vec::new(),
            cursor: 0,
            scroll: 0,
            viewport_height: 0,
        }
    }

    /// Replace the content of a text panel, keeping the scroll position
    /// where it still makes sense.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.lines.clear();
        self.cursor = 0;
        let max = self.max_scroll(self.line_count());
        self.scroll = self.scroll.min(max);
    }

    /// Replace the content of a list panel; blank lines are not selectable.
    /// The cursor stays on the same index when possible.
    pub fn set_lines(&mut self, content: String) {
        self.lines = content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();
        self.content = content;
        self.cursor = self.cursor.min(self.lines.len().saturating_sub(1));
        self.keep_cursor_visible();
    }

    pub fn line_count(&self) -> usize {
        if self.lines.is_empty() {
            self.content.lines().count()
        } else {
            self.lines.len()
        }
    }

    pub fn selected_line(&self) -> Option<&str> {
        self.lines.get(self.cursor).map(String::as_str)
    }

    /// Move the list cursor by `delta`, clamped to the list. Returns whether
    /// the cursor moved.
    pub fn move_cursor(&mut self, delta: isize) -> bool {
        if self.lines.is_empty() {
            return false;
        }
        let last = self.lines.len() - 1;
        let target = self.cursor.saturating_add_signed(delta).min(last);
        let moved = target != self.cursor;
        self.cursor = target;
        self.keep_cursor_visible();
        moved
    }

    /// Scroll a text viewport over `total` rendered lines
    pub fn scroll_by(&mut self, delta: isize, total: usize) {
        let max = self.max_scroll(total);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    fn keep_cursor_visible(&mut self) {
        let height = self.viewport_height.max(1);
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + height {
            self.scroll = self.cursor + 1 - height;
        }
    }

    pub fn max_scroll(&self, total: usize) -> usize {
        total.saturating_sub(self.viewport_height)
    }

    /// First visible line, clamped so the viewport stays filled
    pub fn visible_start(&self, total: usize) -> usize {
        self.scroll.min(self.max_scroll(total))
    }

    /// Whether `total` lines overflow the viewport
    pub fn overflows(&self, total: usize) -> bool {
        total > self.viewport_height
    }

    /// Scroll position as a fraction in [0, 1]
    pub fn scroll_percent(&self, total: usize) -> f64 {
        let max = self.max_scroll(total);
        if max == 0 {
            0.0
        } else {
            self.visible_start(total) as f64 / max as f64
        }
    }

    /// "(N/M)" title suffix; `None` when there is nothing to select.
    pub fn position_indicator(&self) -> Option<String> {
        if self.lines.is_empty() {
            None
        } else {
            Some(format!("({}/{})", self.cursor + 1, self.lines.len()))
        }
    }
}

// ── Geometry ──

/// Share of the terminal width taken by the left column
pub const LEFT_PANEL_WIDTH_RATIO: f64 = 0.3;
/// Columns taken by a panel's left and right border
pub const BORDER_WIDTH: u16 = 2;
pub const HELP_BAR_HEIGHT: u16 = 1;
const STATUS_PANEL_HEIGHT: u16 = 3;
/// Height weights for Files, Branches, Commits, Stash
const LEFT_WEIGHTS: [u16; 4] = [3, 2, 3, 2];
/// Height weights for Main, Secondary
const RIGHT_WEIGHTS: [u16; 2] = [7, 3];

pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 16;

/// Where every panel goes for a given terminal size
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    panels: [Rect; 7],
    pub help_bar: Rect,
}

impl FrameLayout {
    /// `None` when the area is too small to lay out all panels.
    pub fn compute(area: Rect) -> Option<FrameLayout> {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            return None;
        }

        let content_height = area.height - HELP_BAR_HEIGHT;
        let left_width = left_column_width(area.width);
        let right_width = area.width - left_width;

        let mut panels = [Rect::default(); 7];

        let mut y = area.y;
        panels[PanelId::Status.index()] = Rect::new(area.x, y, left_width, STATUS_PANEL_HEIGHT);
        y += STATUS_PANEL_HEIGHT;
        let heights = distribute(content_height - STATUS_PANEL_HEIGHT, &LEFT_WEIGHTS);
        for (id, h) in PanelId::LEFT[1..].iter().zip(heights) {
            panels[id.index()] = Rect::new(area.x, y, left_width, h);
            y += h;
        }

        let mut y = area.y;
        let heights = distribute(content_height, &RIGHT_WEIGHTS);
        for (id, h) in PanelId::RIGHT.iter().zip(heights) {
            panels[id.index()] = Rect::new(area.x + left_width, y, right_width, h);
            y += h;
        }

        let help_bar = Rect::new(area.x, area.y + content_height, area.width, HELP_BAR_HEIGHT);
        Some(FrameLayout { panels, help_bar })
    }

    pub fn panel(&self, id: PanelId) -> Rect {
        self.panels[id.index()]
    }
}

fn left_column_width(total_width: u16) -> u16 {
    (total_width as f64 * LEFT_PANEL_WIDTH_RATIO) as u16
}

/// Width available to diff rendering inside the main panel
pub fn main_content_width(total_width: u16) -> usize {
    let right = total_width.saturating_sub(left_column_width(total_width));
    right.saturating_sub(BORDER_WIDTH) as usize
}

/// Split `total` rows by `weights`; rounding leftovers go to the first panels.
fn distribute(total: u16, weights: &[u16]) -> Vec<u16> {
    let sum: u16 = weights.iter().sum();
    if sum == 0 {
        return vec![0; weights.len()];
    }
    let mut heights: Vec<u16> = weights
        .iter()
        .map(|w| (total as u32 * *w as u32 / sum as u32) as u16)
        .collect();
    let mut leftover = total - heights.iter().sum::<u16>();
    for h in heights.iter_mut() {
        if leftover == 0 {
            break;
        }
        *h += 1;
        leftover -= 1;
    }
    heights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_panel(lines: &[&str], height: usize) -> Panel {
        let mut panel = Panel::new("Loading...");
        panel.viewport_height = height;
        panel.set_lines(lines.join("\n"));
        panel
    }

    #[test]
    fn focus_order_wraps() {
        assert_eq!(PanelId::Status.next(), PanelId::Files);
        assert_eq!(PanelId::Secondary.next(), PanelId::Status);
        assert_eq!(PanelId::Status.prev(), PanelId::Secondary);
        let mut id = PanelId::Main;
        for _ in 0..PanelId::FOCUS_ORDER.len() {
            id = id.next();
        }
        assert_eq!(id, PanelId::Main);
    }

    #[test]
    fn from_index_matches_digit_keys() {
        assert_eq!(PanelId::from_index(0), Some(PanelId::Main));
        assert_eq!(PanelId::from_index(5), Some(PanelId::Stash));
        assert_eq!(PanelId::from_index(7), None);
    }

    #[test]
    fn empty_list_has_no_indicator() {
        let panel = list_panel(&[], 5);
        assert_eq!(panel.position_indicator(), None);
        let blank_only = list_panel(&["", "   "], 5);
        assert_eq!(blank_only.position_indicator(), None);
    }

    #[test]
    fn indicator_is_one_based() {
        let mut panel = list_panel(&["a", "b", "c"], 5);
        assert_eq!(panel.position_indicator().as_deref(), Some("(1/3)"));
        panel.move_cursor(2);
        assert_eq!(panel.position_indicator().as_deref(), Some("(3/3)"));
    }

    #[test]
    fn cursor_clamps_to_list() {
        let mut panel = list_panel(&["a", "b"], 5);
        assert!(!panel.move_cursor(-1));
        assert!(panel.move_cursor(10));
        assert_eq!(panel.cursor, 1);
        assert_eq!(panel.selected_line(), Some("b"));
    }

    #[test]
    fn cursor_stays_inside_viewport() {
        let lines: Vec<String> = (0..20).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut panel = list_panel(&refs, 4);
        panel.move_cursor(6);
        assert_eq!(panel.scroll, 3);
        panel.move_cursor(-5);
        assert_eq!(panel.cursor, 1);
        assert_eq!(panel.scroll, 1);
    }

    #[test]
    fn shrinking_list_clamps_cursor() {
        let mut panel = list_panel(&["a", "b", "c", "d"], 5);
        panel.move_cursor(3);
        panel.set_lines("a\nb".to_string());
        assert_eq!(panel.cursor, 1);
    }

    #[test]
    fn scroll_is_bounded() {
        let mut panel = Panel::new("");
        panel.viewport_height = 10;
        panel.scroll_by(50, 25);
        assert_eq!(panel.scroll, 15);
        assert_eq!(panel.scroll_percent(25), 1.0);
        panel.scroll_by(-100, 25);
        assert_eq!(panel.scroll, 0);
        assert!(!panel.overflows(10));
        assert!(panel.overflows(11));
    }

    #[test]
    fn layout_tiles_the_screen() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = FrameLayout::compute(area).unwrap();

        let left_height: u16 = PanelId::LEFT.iter().map(|id| layout.panel(*id).height).sum();
        let right_height: u16 = PanelId::RIGHT.iter().map(|id| layout.panel(*id).height).sum();
        assert_eq!(left_height, 39);
        assert_eq!(right_height, 39);
        assert_eq!(layout.panel(PanelId::Status).height, 3);
        assert_eq!(layout.help_bar, Rect::new(0, 39, 120, 1));

        let left = layout.panel(PanelId::Files);
        let main = layout.panel(PanelId::Main);
        assert_eq!(left.width, 36);
        assert_eq!(main.x, 36);
        assert_eq!(main.width, 84);
        assert_eq!(main_content_width(120), 82);
    }

    #[test]
    fn too_small_has_no_layout() {
        assert!(FrameLayout::compute(Rect::new(0, 0, 0, 0)).is_none());
        assert!(FrameLayout::compute(Rect::new(0, 0, 39, 40)).is_none());
        assert!(FrameLayout::compute(Rect::new(0, 0, 120, 15)).is_none());
    }

    #[test]
    fn distribute_hands_out_remainder() {
        assert_eq!(distribute(10, &[3, 2, 3, 2]), vec![3, 2, 3, 2]);
        assert_eq!(distribute(13, &[3, 2, 3, 2]), vec![4, 3, 4, 2]);
        assert_eq!(distribute(0, &[7, 3]), vec![0, 0]);
    }
}
