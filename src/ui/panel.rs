use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::diff_view::render_adaptive;
use super::theme::Theme;
use super::utils::{expand_tabs, fit_to_width, strip_ansi};
use crate::app::{App, Panel, PanelId};

const SCROLLBAR_THUMB: &str = "▐";

/// Render one bordered panel
pub fn render(f: &mut Frame, area: Rect, app: &App, id: PanelId) {
    let theme = app.theme();
    let panel = app.panel(id);
    let focused = app.focused == id;
    let inner_width = area.width.saturating_sub(2) as usize;

    let lines = panel_lines(app, id, inner_width);
    let total = lines.len();
    let start = panel.visible_start(total);
    let visible: Vec<Line<'static>> = lines
        .into_iter()
        .skip(start)
        .take(panel.viewport_height)
        .collect();

    let border = if focused {
        &theme.active_border
    } else {
        &theme.inactive_border
    };
    let title_style = if focused {
        theme.active_title
    } else {
        theme.inactive_title
    };

    let block = Block::default()
        .title(Span::styled(panel_title(id, panel), title_style))
        .borders(Borders::ALL)
        .border_type(border.border_type)
        .border_style(border.style);

    f.render_widget(Paragraph::new(visible).block(block), area);

    if panel.overflows(total) && (focused || !id.scrollbar_needs_focus()) {
        draw_scrollbar(f, area, panel.scroll_percent(total), theme.scrollbar_thumb);
    }
}

/// " [N] Title " with "(c/M)" for list panels that have lines
pub fn panel_title(id: PanelId, panel: &Panel) -> String {
    match panel.position_indicator() {
        Some(position) if id.is_list() => {
            format!(" [{}] {} {} ", id.index(), id.title(), position)
        }
        _ => format!(" [{}] {} ", id.index(), id.title()),
    }
}

/// Every content line of a panel, styled, before scrolling
fn panel_lines(app: &App, id: PanelId, width: usize) -> Vec<Line<'static>> {
    let theme = app.theme();
    let panel = app.panel(id);

    if id == PanelId::Main {
        return render_adaptive(&panel.content, width, theme, app.diff_view);
    }

    if panel.lines.is_empty() {
        let style = if panel.content.starts_with("[ERROR") {
            theme.error_text
        } else {
            theme.normal_text
        };
        return panel
            .content
            .lines()
            .map(|l| Line::styled(expand_tabs(&strip_ansi(l)), style))
            .collect();
    }

    let focused = app.focused == id;
    panel
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if focused && i == panel.cursor {
                let text = fit_to_width(&selected_text(id, line), width);
                Line::styled(text, theme.selected_line)
            } else {
                style_unselected_line(id, line, theme)
            }
        })
        .collect()
}

fn selected_text(id: PanelId, line: &str) -> String {
    let line = strip_ansi(line);
    match id {
        PanelId::Files => line.split('\t').collect::<Vec<_>>().join(" "),
        _ => line.replace('\t', "  "),
    }
}

/// Color the fields of a list line; the line itself gets no background
pub fn style_unselected_line(id: PanelId, line: &str, theme: &Theme) -> Line<'static> {
    let line = strip_ansi(line);
    let parts: Vec<&str> = line.split('\t').collect();
    let plain = |s: &str| Span::styled(s.to_string(), theme.normal_text);

    let spans = match (id, parts.as_slice()) {
        (PanelId::Files, &[prefix, status, path]) => {
            let mut spans = vec![plain(prefix), Span::raw(" ")];
            spans.extend(style_status(status, theme));
            spans.push(Span::raw(" "));
            spans.push(plain(path));
            spans
        }
        (PanelId::Branches, &[date, name]) => {
            let name_style = if name.ends_with("(*)") {
                theme.branch_current
            } else {
                theme.normal_text
            };
            vec![
                Span::styled(date.to_string(), theme.branch_date),
                Span::raw("  "),
                Span::styled(name.to_string(), name_style),
            ]
        }
        (PanelId::Commits, &[graph, sha, author, subject]) => {
            let author_style = if subject.to_lowercase().starts_with("merge") {
                theme.commit_merge
            } else {
                theme.commit_author
            };
            vec![
                Span::styled(graph.to_string(), theme.graph_node),
                Span::raw("  "),
                Span::styled(sha.to_string(), theme.commit_sha),
                Span::raw("  "),
                Span::styled(author.to_string(), author_style),
                Span::raw("  "),
                plain(subject),
            ]
        }
        (PanelId::Commits, &[graph]) => vec![Span::styled(graph.to_string(), theme.graph_node)],
        (PanelId::Stash, &[name, message]) => vec![
            Span::styled(name.to_string(), theme.stash_name),
            Span::raw("  "),
            Span::styled(message.to_string(), theme.stash_message),
        ],
        _ => vec![plain(line.replace('\t', "  ").as_str())],
    };
    Line::from(spans)
}

/// Two-column porcelain status: index side staged, worktree side unstaged
pub fn style_status(status: &str, theme: &Theme) -> Vec<Span<'static>> {
    if status == "??" {
        return vec![Span::styled("??", theme.git_untracked)];
    }
    if status.contains('U') || status == "AA" || status == "DD" {
        return vec![Span::styled(status.to_string(), theme.git_conflicted)];
    }

    let mut chars = status.chars();
    let index = chars.next().unwrap_or(' ');
    let worktree = chars.next().unwrap_or(' ');
    let side = |c: char, style: Style| match c {
        ' ' | '?' => Span::raw(" "),
        c => Span::styled(c.to_string(), style),
    };
    vec![side(index, theme.git_staged), side(worktree, theme.git_unstaged)]
}

/// Draw the thumb over the right border, on the row matching `percent`
fn draw_scrollbar(f: &mut Frame, area: Rect, percent: f64, style: Style) {
    let content_height = area.height.saturating_sub(2);
    if content_height == 0 || area.width == 0 {
        return;
    }
    let row = ((content_height - 1) as f64 * percent) as u16;
    let x = area.x + area.width - 1;
    let y = area.y + 1 + row.min(content_height - 1);
    if let Some(cell) = f.buffer_mut().cell_mut((x, y)) {
        cell.set_symbol(SCROLLBAR_THUMB);
        cell.set_style(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme() -> Theme {
        crate::ui::theme::ThemeSet::default().current().clone()
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn title_shows_position_only_with_lines() {
        let mut panel = Panel::new("");
        assert_eq!(panel_title(PanelId::Files, &panel), " [2] Files ");
        panel.set_lines("├─\t M\ta\n└─\t??\tb".to_string());
        assert_eq!(panel_title(PanelId::Files, &panel), " [2] Files (1/2) ");
    }

    #[test]
    fn status_codes_color_each_side() {
        let theme = theme();
        let spans = style_status("MM", &theme);
        assert_eq!(spans[0].style, theme.git_staged);
        assert_eq!(spans[1].style, theme.git_unstaged);

        let spans = style_status(" M", &theme);
        assert_eq!(spans[0].content, " ");
        assert_eq!(spans[1].style, theme.git_unstaged);

        assert_eq!(style_status("??", &theme)[0].style, theme.git_untracked);
        assert_eq!(style_status("UU", &theme)[0].style, theme.git_conflicted);
        assert_eq!(style_status("AA", &theme)[0].style, theme.git_conflicted);
    }

    #[test]
    fn files_line_keeps_fields_in_order() {
        let line = style_unselected_line(PanelId::Files, "└─\tA \tsrc/new.rs", &theme());
        assert_eq!(text(&line), "└─ A  src/new.rs");
    }

    #[test]
    fn current_branch_is_highlighted() {
        let theme = theme();
        let line = style_unselected_line(PanelId::Branches, "1 hour ago\tmain (*)", &theme);
        assert_eq!(line.spans[2].style, theme.branch_current);
        assert_eq!(line.spans[0].style, theme.branch_date);
    }

    #[test]
    fn merge_commits_use_merge_style() {
        let theme = theme();
        let line = style_unselected_line(
            PanelId::Commits,
            "○ \tabc1234\tAda\tMerge branch 'x'",
            &theme,
        );
        assert_eq!(line.spans[4].style, theme.commit_merge);
        assert_eq!(line.spans[2].style, theme.commit_sha);
    }

    #[test]
    fn merge_detection_ignores_case() {
        let theme = theme();
        let line = style_unselected_line(PanelId::Commits, "○ \tabc1234\tAda\tmerge pull request #4", &theme);
        assert_eq!(line.spans[4].style, theme.commit_merge);
    }

    #[test]
    fn unselected_lines_have_no_background() {
        let theme = theme();
        let line = style_unselected_line(PanelId::Stash, "stash@{0}\tWIP on main", &theme);
        assert!(line.spans.iter().all(|s| s.style.bg.is_none()));
    }

    #[test]
    fn selected_files_line_joins_with_spaces() {
        assert_eq!(selected_text(PanelId::Files, "├─\t M\ta.rs"), "├─  M a.rs");
        assert_eq!(selected_text(PanelId::Stash, "stash@{0}\tWIP"), "stash@{0}  WIP");
    }
}
