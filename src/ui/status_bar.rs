use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::theme::Theme;
use super::utils::display_width;
use crate::app::keymap::{help_view_short_help, popup_short_help, short_help, Binding};
use crate::app::{App, Mode};

const HELP_BUTTON: &str = " help:? ";

fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| display_width(&s.content)).sum()
}

/// Bindings shown in the bottom bar for the current state
fn current_bindings(app: &App) -> Vec<Binding> {
    if app.show_help {
        return help_view_short_help();
    }
    match app.mode() {
        Mode::Normal => short_help(app.focused),
        mode => popup_short_help(mode),
    }
}

/// Key hints on the left, the diff mode and the help button on the right.
/// Hints that don't fit are dropped from the end.
pub fn help_bar_line(app: &App, width: usize) -> Line<'static> {
    let theme = app.theme();
    let right = vec![
        Span::styled(format!(" diff:{} ", app.diff_view.label()), theme.normal_text),
        Span::styled(HELP_BUTTON, theme.help_button),
    ];
    let right_width = spans_width(&right);

    let mut spans: Vec<Span<'static>> = vec![Span::raw(" ")];
    for binding in current_bindings(app) {
        let hint = [
            Span::styled(binding.keys, theme.help_key),
            Span::styled(format!(" {}  ", binding.help), theme.normal_text),
        ];
        if spans_width(&spans) + spans_width(&hint) + right_width > width {
            break;
        }
        spans.extend(hint);
    }

    let used = spans_width(&spans) + right_width;
    if used < width {
        spans.push(Span::raw(" ".repeat(width - used)));
    }
    spans.extend(right);
    Line::from(spans)
}

pub fn render_help_bar(f: &mut Frame, area: Rect, app: &App) {
    let line = help_bar_line(app, area.width as usize);
    f.render_widget(Paragraph::new(line), area);
}

/// Transient message in the top right corner
pub fn render_notification(f: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let notif_width = (display_width(message) as u16 + 4).min(area.width);
    let notif_x = area.x + area.width.saturating_sub(notif_width + 2);
    let notif_y = area.y + 1;

    let notif_area = Rect {
        x: notif_x,
        y: notif_y,
        width: notif_width,
        height: 1,
    };

    let notif = Paragraph::new(Line::from(vec![
        Span::styled(" ● ", theme.help_title),
        Span::raw(message.to_string()),
        Span::raw(" "),
    ]))
    .style(theme.notification);

    f.render_widget(notif, notif_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::PanelId;
    use crate::config::GitdeckConfig;
    use crate::ui::theme::ThemeSet;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn make_app() -> App {
        let mut app = App::new(GitdeckConfig::default(), ThemeSet::default());
        app.resize(120, 30);
        app
    }

    #[test]
    fn bar_fills_width_and_ends_with_button() {
        let app = make_app();
        let line = help_bar_line(&app, 120);
        assert_eq!(spans_width(&line.spans), 120);
        assert!(text(&line).ends_with(" diff:auto  help:? "));
    }

    #[test]
    fn hints_follow_focus() {
        let mut app = make_app();
        app.focus(PanelId::Files);
        assert!(text(&help_bar_line(&app, 120)).contains("space stage/unstage"));
        app.focus(PanelId::Branches);
        assert!(text(&help_bar_line(&app, 120)).contains("enter checkout"));
    }

    #[test]
    fn narrow_bar_drops_hints() {
        let app = make_app();
        let line = help_bar_line(&app, 30);
        assert_eq!(spans_width(&line.spans), 30);
        assert!(!text(&line).contains("quit"));
    }

    #[test]
    fn popup_mode_shows_popup_keys() {
        let mut app = make_app();
        app.request_commit();
        assert!(text(&help_bar_line(&app, 120)).contains("ctrl+s commit"));
    }
}
