pub mod diff_view;
mod help;
mod overlay;
mod panel;
mod status_bar;
pub mod theme;
pub mod utils;

use anyhow::Result;
use ratatui::backend::TestBackend;
use ratatui::layout::{Alignment, Rect};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};

use crate::app::{App, FrameLayout, PanelId};

pub const TOO_SMALL_TEXT: &str = "Terminal too small";

/// Render the entire UI
pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let Some(layout) = FrameLayout::compute(area) else {
        let placeholder = Paragraph::new(TOO_SMALL_TEXT)
            .style(app.theme().normal_text)
            .alignment(Alignment::Center);
        let row = Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1));
        f.render_widget(placeholder, row);
        return;
    };

    if app.show_help {
        let content = Rect::new(area.x, area.y, area.width, layout.help_bar.y - area.y);
        help::render(f, content, app);
    } else {
        for id in PanelId::ALL {
            panel::render(f, layout.panel(id), app, id);
        }
        overlay::render_popup(f, area, app);
    }

    status_bar::render_help_bar(f, layout.help_bar, app);

    if let Some(ref msg) = app.notification {
        status_bar::render_notification(f, area, msg, app.theme());
    }
}

/// Draw one frame off-screen and return its rows joined by newlines
pub fn render_to_string(app: &App, width: u16, height: u16) -> Result<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    terminal.draw(|f| draw(f, app))?;

    let buffer = terminal.backend().buffer();
    let rows: Vec<String> = (0..height)
        .map(|y| {
            (0..width)
                .filter_map(|x| buffer.cell((x, y)))
                .map(|cell| cell.symbol())
                .collect::<String>()
        })
        .collect();
    Ok(rows.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Resolution;
    use crate::config::GitdeckConfig;
    use crate::git::{CommandOutput, GitCommand};
    use crate::ui::theme::ThemeSet;

    fn make_app(width: u16, height: u16) -> App {
        let mut app = App::new(GitdeckConfig::default(), ThemeSet::default());
        app.resize(width, height);
        app
    }

    fn load(app: &mut App, command: GitCommand, text: &str) {
        let output = CommandOutput {
            text: text.to_string(),
            description: command.description(),
            error: None,
        };
        app.apply_completion(command, output);
    }

    #[test]
    fn startup_frame_shows_all_panels_loading() {
        let app = make_app(120, 30);
        let frame = render_to_string(&app, 120, 30).unwrap();
        for title in ["[0] Main", "[1] Status", "[2] Files", "[3] Branches", "[4] Commits", "[5] Stash", "[6] Secondary"] {
            assert!(frame.contains(title), "missing {title}");
        }
        assert!(frame.contains("Loading..."));
        assert!(frame.contains("help:?"));
    }

    #[test]
    fn tiny_terminal_shows_placeholder() {
        let app = make_app(30, 10);
        let frame = render_to_string(&app, 30, 10).unwrap();
        assert!(frame.contains(TOO_SMALL_TEXT));
        assert!(!frame.contains("[1] Status"));
    }

    #[test]
    fn empty_list_has_no_position_indicator() {
        let mut app = make_app(120, 30);
        load(&mut app, GitCommand::Stashes, "");
        load(&mut app, GitCommand::Files, "├─\t M\ta.rs\n└─\t??\tb.rs");
        let frame = render_to_string(&app, 120, 30).unwrap();
        assert!(frame.contains("[2] Files (1/2)"));
        assert!(frame.contains("[5] Stash "));
        assert!(!frame.contains("[5] Stash ("));
    }

    #[test]
    fn main_panel_renders_diff_split_when_wide() {
        let mut app = make_app(130, 30);
        let diff = "diff --git a/x b/x\n--- a/x\n+++ b/x\n@@ -1,2 +1,2 @@\n same line\n-old line\n+new line";
        load(&mut app, GitCommand::StatusText, diff);
        let frame = render_to_string(&app, 130, 30).unwrap();
        let row = frame
            .lines()
            .find(|l| l.contains("same line"))
            .unwrap();
        assert_eq!(row.matches("same line").count(), 2);
        assert!(row.contains(" │ "));
    }

    #[test]
    fn popup_is_drawn_over_panels() {
        let mut app = make_app(120, 30);
        app.request_new_branch();
        for c in "topic".chars() {
            app.popup.push_char(c);
        }
        let frame = render_to_string(&app, 120, 30).unwrap();
        assert!(frame.contains("New branch name:"));
        assert!(frame.contains("topic█"));

        app.resolve_popup(Resolution::Cancel);
        let frame = render_to_string(&app, 120, 30).unwrap();
        assert!(!frame.contains("New branch name:"));
    }

    #[test]
    fn help_view_replaces_panels() {
        let mut app = make_app(120, 30);
        app.toggle_help();
        let frame = render_to_string(&app, 120, 30).unwrap();
        assert!(frame.contains(" Help "));
        assert!(frame.contains("Navigation"));
        assert!(!frame.contains("[2] Files"));
    }

    /// Rows inside `rect` whose right border carries the scrollbar thumb
    fn thumb_rows(frame: &str, rect: Rect) -> Vec<u16> {
        let x = (rect.x + rect.width - 1) as usize;
        frame
            .lines()
            .enumerate()
            .skip(rect.y as usize)
            .take(rect.height as usize)
            .filter(|(_, line)| line.chars().nth(x) == Some('▐'))
            .map(|(y, _)| y as u16)
            .collect()
    }

    fn numbered(prefix: &str, count: usize) -> String {
        (0..count)
            .map(|i| format!("{prefix}{i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn overflowing_list_shows_thumb_without_focus() {
        let mut app = make_app(120, 30);
        let layout = FrameLayout::compute(Rect::new(0, 0, 120, 30)).unwrap();
        let files = layout.panel(PanelId::Files);

        load(&mut app, GitCommand::Files, "└─\t M\tonly.rs");
        let frame = render_to_string(&app, 120, 30).unwrap();
        assert!(thumb_rows(&frame, files).is_empty());

        load(&mut app, GitCommand::Files, &numbered("├─\t M\tfile", 40));
        let frame = render_to_string(&app, 120, 30).unwrap();
        assert_eq!(thumb_rows(&frame, files), vec![files.y + 1]);

        app.focus(PanelId::Files);
        app.move_cursor(100);
        let frame = render_to_string(&app, 120, 30).unwrap();
        assert_eq!(thumb_rows(&frame, files), vec![files.y + files.height - 2]);
    }

    #[test]
    fn stash_thumb_needs_focus() {
        let mut app = make_app(120, 30);
        let layout = FrameLayout::compute(Rect::new(0, 0, 120, 30)).unwrap();
        let stash = layout.panel(PanelId::Stash);

        load(&mut app, GitCommand::Stashes, &numbered("stash@{0}\tWIP ", 40));
        let frame = render_to_string(&app, 120, 30).unwrap();
        assert!(thumb_rows(&frame, stash).is_empty());

        app.focus(PanelId::Stash);
        let frame = render_to_string(&app, 120, 30).unwrap();
        assert_eq!(thumb_rows(&frame, stash), vec![stash.y + 1]);
    }

    #[test]
    fn notification_is_drawn() {
        let mut app = make_app(120, 30);
        app.notify("Theme: Gruvbox");
        let frame = render_to_string(&app, 120, 30).unwrap();
        assert!(frame.contains("● Theme: Gruvbox"));
    }
}
