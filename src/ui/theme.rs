use std::collections::BTreeMap;

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

pub const DEFAULT_THEME_NAME: &str = "GitHub Dark";

/// A set of terminal colors a theme is derived from
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub black: Color,
    pub red: Color,
    pub green: Color,
    pub yellow: Color,
    pub blue: Color,
    pub magenta: Color,
    pub cyan: Color,
    pub white: Color,

    pub bright_black: Color,
    pub bright_red: Color,
    pub bright_green: Color,
    pub bright_yellow: Color,
    pub bright_blue: Color,
    pub bright_magenta: Color,
    pub bright_cyan: Color,
    pub bright_white: Color,

    pub dark_black: Color,
    pub dark_red: Color,
    pub dark_green: Color,
    pub dark_yellow: Color,
    pub dark_blue: Color,
    pub dark_magenta: Color,
    pub dark_cyan: Color,
    pub dark_white: Color,

    pub bg: Color,
    pub fg: Color,
}

/// Parse `#rrggbb`; anything else falls back to the terminal default.
pub fn hex(value: &str) -> Color {
    value.trim().parse::<Color>().unwrap_or(Color::Reset)
}

impl Palette {
    pub fn github_dark() -> Self {
        Self {
            black: hex("#24292E"),
            red: hex("#ff7b72"),
            green: hex("#3fb950"),
            yellow: hex("#d29922"),
            blue: hex("#58a6ff"),
            magenta: hex("#bc8cff"),
            cyan: hex("#39c5cf"),
            white: hex("#b1bac4"),

            bright_black: hex("#6e7681"),
            bright_red: hex("#ffa198"),
            bright_green: hex("#56d364"),
            bright_yellow: hex("#e3b341"),
            bright_blue: hex("#79c0ff"),
            bright_magenta: hex("#d2a8ff"),
            bright_cyan: hex("#56d4dd"),
            bright_white: hex("#f0f6fc"),

            dark_black: hex("#1b1f23"),
            dark_red: hex("#d73a49"),
            dark_green: hex("#28a745"),
            dark_yellow: hex("#dbab09"),
            dark_blue: hex("#2188ff"),
            dark_magenta: hex("#a041f5"),
            dark_cyan: hex("#12aab5"),
            dark_white: hex("#8b949e"),

            bg: hex("#0d1117"),
            fg: hex("#c9d1d9"),
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            black: hex("#282828"),
            red: hex("#cc241d"),
            green: hex("#98971a"),
            yellow: hex("#d79921"),
            blue: hex("#458588"),
            magenta: hex("#b16286"),
            cyan: hex("#689d6a"),
            white: hex("#a89984"),

            bright_black: hex("#928374"),
            bright_red: hex("#fb4934"),
            bright_green: hex("#b8bb26"),
            bright_yellow: hex("#fabd2f"),
            bright_blue: hex("#83a598"),
            bright_magenta: hex("#d3869b"),
            bright_cyan: hex("#8ec07c"),
            bright_white: hex("#ebdbb2"),

            dark_black: hex("#1d2021"),
            dark_red: hex("#9d0006"),
            dark_green: hex("#79740e"),
            dark_yellow: hex("#b57614"),
            dark_blue: hex("#076678"),
            dark_magenta: hex("#8f3f71"),
            dark_cyan: hex("#427b58"),
            dark_white: hex("#928374"),

            bg: hex("#282828"),
            fg: hex("#ebdbb2"),
        }
    }
}

/// Border glyphs and color for a panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderStyle {
    pub border_type: BorderType,
    pub style: Style,
}

/// Styles for every component of the UI, derived from a [`Palette`]
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub active_title: Style,
    pub inactive_title: Style,
    pub normal_text: Style,
    pub help_title: Style,
    pub help_key: Style,
    pub help_button: Style,
    pub scrollbar_thumb: Style,
    pub selected_line: Style,
    pub git_staged: Style,
    pub git_unstaged: Style,
    pub git_untracked: Style,
    pub git_conflicted: Style,
    pub branch_current: Style,
    pub branch_date: Style,
    pub commit_sha: Style,
    pub commit_author: Style,
    pub commit_merge: Style,
    pub graph_node: Style,
    pub stash_name: Style,
    pub stash_message: Style,
    pub diff_header: Style,
    pub line_number: Style,
    pub notification: Style,
    pub error_text: Style,
    pub active_border: BorderStyle,
    pub inactive_border: BorderStyle,
}

impl Theme {
    pub fn from_palette(p: &Palette) -> Self {
        Self {
            active_title: Style::default().fg(p.bg).bg(p.bright_cyan),
            inactive_title: Style::default().fg(p.fg).bg(p.black),
            normal_text: Style::default().fg(p.fg),
            help_title: Style::default().fg(p.green).add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(p.yellow),
            help_button: Style::default().fg(p.bg).bg(p.green),
            scrollbar_thumb: Style::default().fg(p.bright_green),
            selected_line: Style::default().fg(p.bright_white).bg(p.dark_blue),
            git_staged: Style::default().fg(p.green),
            git_unstaged: Style::default().fg(p.red),
            git_untracked: Style::default().fg(p.bright_black),
            git_conflicted: Style::default().fg(p.bright_red).add_modifier(Modifier::BOLD),
            branch_current: Style::default().fg(p.green).add_modifier(Modifier::BOLD),
            branch_date: Style::default().fg(p.yellow),
            commit_sha: Style::default().fg(p.yellow),
            commit_author: Style::default().fg(p.green),
            commit_merge: Style::default().fg(p.magenta),
            graph_node: Style::default().fg(p.green),
            stash_name: Style::default().fg(p.yellow),
            stash_message: Style::default().fg(p.fg),
            diff_header: Style::default().add_modifier(Modifier::BOLD),
            line_number: Style::default().fg(p.bright_black),
            notification: Style::default().fg(p.fg).bg(p.black),
            error_text: Style::default().fg(p.bright_red),
            active_border: BorderStyle {
                border_type: BorderType::Rounded,
                style: Style::default().fg(p.bright_cyan),
            },
            inactive_border: BorderStyle {
                border_type: BorderType::Rounded,
                style: Style::default().fg(p.bright_black),
            },
        }
    }
}

/// All loaded themes plus the one currently in use.
#[derive(Debug, Clone)]
pub struct ThemeSet {
    themes: BTreeMap<String, Theme>,
    names: Vec<String>,
    index: usize,
}

impl ThemeSet {
    /// Built-in themes, plus any custom palettes, with `selected` active.
    /// An unknown name falls back to the first theme in name order.
    pub fn new(custom: Vec<(String, Palette)>, selected: &str) -> Self {
        let mut themes = BTreeMap::new();
        themes.insert(
            DEFAULT_THEME_NAME.to_string(),
            Theme::from_palette(&Palette::github_dark()),
        );
        themes.insert("Gruvbox".to_string(), Theme::from_palette(&Palette::gruvbox()));
        for (name, palette) in custom {
            themes.insert(name, Theme::from_palette(&palette));
        }
        let names: Vec<String> = themes.keys().cloned().collect();
        let index = names.iter().position(|n| n == selected).unwrap_or(0);
        Self { themes, names, index }
    }

    pub fn current(&self) -> &Theme {
        // names and themes are built together, so the lookup can't miss
        &self.themes[&self.names[self.index]]
    }

    pub fn current_name(&self) -> &str {
        &self.names[self.index]
    }

    /// Advance to the next theme (wrapping) and return its name
    pub fn cycle(&mut self) -> &str {
        self.index = (self.index + 1) % self.names.len();
        self.current_name()
    }
}

impl Default for ThemeSet {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_THEME_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_rgb_and_falls_back() {
        assert_eq!(hex("#ff0000"), Color::Rgb(255, 0, 0));
        assert_eq!(hex("not-a-color"), Color::Reset);
        assert_eq!(hex(""), Color::Reset);
    }

    #[test]
    fn theme_set_selects_by_name() {
        let set = ThemeSet::new(Vec::new(), "Gruvbox");
        assert_eq!(set.current_name(), "Gruvbox");
        assert_eq!(set.current(), &Theme::from_palette(&Palette::gruvbox()));
    }

    #[test]
    fn unknown_theme_falls_back_to_first_name() {
        let set = ThemeSet::new(Vec::new(), "Nope");
        assert_eq!(set.current_name(), "GitHub Dark");
    }

    #[test]
    fn cycle_wraps_through_all_themes() {
        let custom = vec![("Zen".to_string(), Palette::github_dark())];
        let mut set = ThemeSet::new(custom, "Zen");
        assert_eq!(set.cycle(), "GitHub Dark");
        assert_eq!(set.cycle(), "Gruvbox");
        assert_eq!(set.cycle(), "Zen");
    }

    #[test]
    fn active_and_inactive_borders_differ() {
        let theme = Theme::from_palette(&Palette::github_dark());
        assert_ne!(theme.active_border.style, theme.inactive_border.style);
    }
}
