use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::theme::Theme;
use super::utils::wrap_text;
use crate::app::{App, CommitField, Popup};

const INPUT_WIDTH: u16 = 60;
const CONFIRM_WIDTH: u16 = 60;
const COMMIT_WIDTH: u16 = 72;
const DESCRIPTION_HEIGHT: u16 = 8;
const CURSOR: &str = "█";

/// Render the open popup, if any, on top of the panels
pub fn render_popup(f: &mut Frame, area: Rect, app: &App) {
    let Some(active) = app.popup.active() else {
        return;
    };
    let theme = app.theme();
    match &active.popup {
        Popup::Input { title, buffer, .. } => render_input(f, area, theme, title, buffer),
        Popup::Confirm { message, .. } => render_confirm(f, area, theme, message),
        Popup::Commit { title, description, focus, .. } => {
            render_commit(f, area, theme, title, description, *focus)
        }
    }
}

fn popup_block<'a>(title: String, theme: &Theme, focused: bool) -> Block<'a> {
    let (border, title_style) = if focused {
        (&theme.active_border, theme.active_title)
    } else {
        (&theme.inactive_border, theme.inactive_title)
    };
    Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_type(border.border_type)
        .border_style(border.style)
}

fn hint_line(theme: &Theme, hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(*key, theme.help_key));
        spans.push(Span::styled(format!(" {}  ", label), theme.normal_text));
    }
    Line::from(spans)
}

/// Last `width` columns of a buffer plus the cursor, so typing past the edge scrolls
fn input_line(buffer: &str, width: usize, theme: &Theme, show_cursor: bool) -> Line<'static> {
    let room = width.saturating_sub(1);
    let chars: Vec<char> = buffer.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(room)..].iter().collect();
    let mut spans = vec![Span::styled(visible, theme.normal_text)];
    if show_cursor {
        spans.push(Span::styled(CURSOR, theme.help_key));
    }
    Line::from(spans)
}

fn render_input(f: &mut Frame, area: Rect, theme: &Theme, title: &str, buffer: &str) {
    let popup = centered_rect(INPUT_WIDTH.min(area.width.saturating_sub(4)), 3, area);
    f.render_widget(Clear, popup);

    let block = popup_block(format!(" {} ", title), theme, true)
        .title_bottom(hint_line(theme, &[("enter", "confirm"), ("esc", "cancel")]));
    let inner = popup.width.saturating_sub(2) as usize;
    f.render_widget(
        Paragraph::new(input_line(buffer, inner, theme, true)).block(block),
        popup,
    );
}

fn render_confirm(f: &mut Frame, area: Rect, theme: &Theme, message: &str) {
    let width = CONFIRM_WIDTH.min(area.width.saturating_sub(4));
    let mut lines: Vec<Line> = wrap_text(message, width.saturating_sub(4) as usize)
        .into_iter()
        .map(|l| Line::styled(format!(" {}", l), theme.normal_text))
        .collect();
    lines.push(Line::raw(""));
    lines.push(hint_line(theme, &[("y", "confirm"), ("n/esc", "cancel")]));

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2)).max(3);
    let popup = centered_rect(width, height, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(popup_block(" Confirm ".to_string(), theme, true)),
        popup,
    );
}

fn render_commit(
    f: &mut Frame,
    area: Rect,
    theme: &Theme,
    title: &str,
    description: &str,
    focus: CommitField,
) {
    let width = COMMIT_WIDTH.min(area.width.saturating_sub(4));
    let height = (3 + DESCRIPTION_HEIGHT).min(area.height.saturating_sub(2));
    let popup = centered_rect(width, height, area);
    f.render_widget(Clear, popup);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(popup);
    let inner = popup.width.saturating_sub(2) as usize;

    let title_focused = focus == CommitField::Title;
    f.render_widget(
        Paragraph::new(input_line(title, inner, theme, title_focused))
            .block(popup_block(" Commit title ".to_string(), theme, title_focused)),
        parts[0],
    );

    // wrapped, keeping the end of the text in view
    let rows = parts[1].height.saturating_sub(2) as usize;
    let mut lines: Vec<String> = description
        .split('\n')
        .flat_map(|l| wrap_text(l, inner.saturating_sub(1)))
        .collect();
    let skip = lines.len().saturating_sub(rows.max(1));
    let mut visible: Vec<Line> = lines
        .drain(skip..)
        .map(|l| Line::styled(l, theme.normal_text))
        .collect();
    if !title_focused {
        if let Some(last) = visible.last_mut() {
            last.spans.push(Span::styled(CURSOR, theme.help_key));
        }
    }

    let block = popup_block(" Description ".to_string(), theme, !title_focused).title_bottom(
        hint_line(
            theme,
            &[("tab", "switch"), ("ctrl+s", "commit"), ("esc", "cancel")],
        ),
    );
    f.render_widget(Paragraph::new(visible).block(block), parts[1]);
}

/// Calculate a centered rectangle within an area
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(r.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered() {
        let r = centered_rect(20, 4, Rect::new(0, 0, 100, 40));
        assert_eq!(r, Rect::new(40, 18, 20, 4));
    }

    #[test]
    fn long_input_keeps_its_tail() {
        let theme = crate::ui::theme::ThemeSet::default().current().clone();
        let line = input_line("abcdefghij", 5, &theme, true);
        assert_eq!(line.spans[0].content, "ghij");
        assert_eq!(line.spans[1].content, CURSOR);
    }
}
