use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::app::keymap::full_help;
use crate::app::App;

const KEY_COLUMN_WIDTH: usize = 16;

/// Every binding, grouped by section
pub fn help_lines(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for section in full_help() {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::styled(format!(" {}", section.title), theme.help_title));
        for binding in section.bindings {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("   {:<width$}", binding.keys, width = KEY_COLUMN_WIDTH),
                    theme.help_key,
                ),
                Span::styled(binding.help, theme.normal_text),
            ]));
        }
    }
    lines
}

/// Full-screen help, replacing the panels
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.theme();
    let lines = help_lines(theme);
    let rows = area.height.saturating_sub(2) as usize;
    let scroll = app.help_scroll.min(lines.len().saturating_sub(rows));

    let block = Block::default()
        .title(Span::styled(" Help ", theme.active_title))
        .borders(Borders::ALL)
        .border_type(theme.active_border.border_type)
        .border_style(theme.active_border.style);

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(block).scroll((scroll as u16, 0)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemeSet;

    #[test]
    fn sections_are_separated_by_blank_lines() {
        let theme = ThemeSet::default().current().clone();
        let lines = help_lines(&theme);
        let titles = lines.iter().filter(|l| l.style == theme.help_title).count();
        assert_eq!(titles, full_help().len());
        let blanks = lines.iter().filter(|l| l.spans.is_empty() || l.width() == 0).count();
        assert_eq!(blanks, full_help().len() - 1);
    }
}
