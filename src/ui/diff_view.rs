use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use serde::{Deserialize, Serialize};

use crate::git::diff::{looks_like_diff, max_line_number, parse_diff_rows, DiffRow, RowKind};
use super::theme::Theme;
use super::utils::{expand_tabs, fit_to_width, strip_ansi, truncate_to_width, wrap_text};

/// Auto mode shows split at or above this width
pub const SPLIT_VIEW_THRESHOLD: usize = 80;
/// Auto mode additionally requires the width to exceed this
pub const AUTO_SPLIT_MIN_WIDTH: usize = 60;
/// Forced split falls back to unified below this width
pub const MIN_SPLIT_VIEW_WIDTH: usize = 40;
/// A split column narrower than this can't be laid out
pub const MIN_SPLIT_COLUMN_WIDTH: usize = 20;
const MIN_GUTTER_WIDTH: usize = 4;
/// " │ " between the two columns
const SEPARATOR_WIDTH: usize = 3;

/// How the main view lays out diffs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffViewMode {
    /// Decide from the available width
    #[default]
    Auto,
    #[serde(rename = "split")]
    ForcedSplit,
    #[serde(rename = "unified")]
    ForcedUnified,
}

impl DiffViewMode {
    /// Whether a diff rendered `width` columns wide should use the split layout.
    pub fn use_split(self, width: usize) -> bool {
        match self {
            DiffViewMode::Auto => width >= SPLIT_VIEW_THRESHOLD && width > AUTO_SPLIT_MIN_WIDTH,
            DiffViewMode::ForcedSplit => width >= MIN_SPLIT_VIEW_WIDTH,
            DiffViewMode::ForcedUnified => false,
        }
    }

    /// Next preference when the user toggles the view.
    ///
    /// From Auto the result is the forced opposite of what Auto shows at
    /// `width`, so the first press always flips the visible layout.
    pub fn toggled(self, width: usize) -> Self {
        match self {
            DiffViewMode::Auto => {
                if DiffViewMode::Auto.use_split(width) {
                    DiffViewMode::ForcedUnified
                } else {
                    DiffViewMode::ForcedSplit
                }
            }
            DiffViewMode::ForcedSplit => DiffViewMode::ForcedUnified,
            DiffViewMode::ForcedUnified => DiffViewMode::Auto,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DiffViewMode::Auto => "auto",
            DiffViewMode::ForcedSplit => "split",
            DiffViewMode::ForcedUnified => "unified",
        }
    }
}

/// Format `content` for a main view `width` columns wide.
///
/// Text without diff markers passes through untouched apart from escape
/// codes and tabs. Diffs render split or unified according to `mode`, falling
/// back to unified whenever the split layout doesn't fit.
pub fn render_adaptive(
    content: &str,
    width: usize,
    theme: &Theme,
    mode: DiffViewMode,
) -> Vec<Line<'static>> {
    if !looks_like_diff(content) {
        return content
            .lines()
            .map(|l| Line::from(expand_tabs(&strip_ansi(l))))
            .collect();
    }

    if mode.use_split(width) {
        let rows = parse_diff_rows(content);
        let column_width = width.saturating_sub(SEPARATOR_WIDTH) / 2;
        if let Some(lines) = render_split(&rows, column_width, theme) {
            return lines;
        }
    }

    render_unified(content, width, theme)
}

/// Two-column layout; every line is exactly `2 * column_width + 3` wide.
///
/// Returns `None` when the column is too narrow to hold a gutter and text.
pub fn render_split(rows: &[DiffRow], column_width: usize, theme: &Theme) -> Option<Vec<Line<'static>>> {
    if column_width < MIN_SPLIT_COLUMN_WIDTH {
        return None;
    }

    let max_num = max_line_number(rows);
    let gutter = if max_num > 0 {
        MIN_GUTTER_WIDTH.max(max_num.to_string().len() + 1)
    } else {
        MIN_GUTTER_WIDTH
    };
    let content_width = column_width.checked_sub(gutter + 1).filter(|w| *w > 0)?;

    let half = SplitHalf {
        gutter,
        content_width,
        line_number: theme.line_number,
    };
    let separator = theme.inactive_border.style;
    let header_style = theme.diff_header;

    let mut lines = Vec::new();
    for row in rows {
        match row.kind {
            RowKind::FileHeader | RowKind::HunkHeader => {
                let text = expand_tabs(&row.header_text());
                let mut spans = vec![Span::styled(fit_to_width(&text, column_width), header_style)];
                push_separator(&mut spans, separator);
                spans.push(Span::raw(" ".repeat(column_width)));
                lines.push(Line::from(spans));
            }
            RowKind::Removed => {
                let wrapped = wrap_text(&expand_tabs(&row.old_text), content_width);
                for (i, text) in wrapped.iter().enumerate() {
                    let num = if i == 0 { row.old_num } else { 0 };
                    let mut spans = half.cell(num, text, theme.git_unstaged);
                    push_separator(&mut spans, separator);
                    spans.extend(half.cell(0, "", Style::default()));
                    lines.push(Line::from(spans));
                }
            }
            RowKind::Added => {
                let wrapped = wrap_text(&expand_tabs(&row.new_text), content_width);
                for (i, text) in wrapped.iter().enumerate() {
                    let num = if i == 0 { row.new_num } else { 0 };
                    let mut spans = half.cell(0, "", Style::default());
                    push_separator(&mut spans, separator);
                    spans.extend(half.cell(num, text, theme.git_staged));
                    lines.push(Line::from(spans));
                }
            }
            RowKind::Context => {
                let old = wrap_text(&expand_tabs(&row.old_text), content_width);
                let new = wrap_text(&expand_tabs(&row.new_text), content_width);
                let height = old.len().max(new.len());
                for i in 0..height {
                    let (old_num, new_num) = if i == 0 { (row.old_num, row.new_num) } else { (0, 0) };
                    let old_text = old.get(i).map(String::as_str).unwrap_or("");
                    let new_text = new.get(i).map(String::as_str).unwrap_or("");
                    let mut spans = half.cell(old_num, old_text, Style::default());
                    push_separator(&mut spans, separator);
                    spans.extend(half.cell(new_num, new_text, Style::default()));
                    lines.push(Line::from(spans));
                }
            }
        }
    }
    Some(lines)
}

/// Geometry of one column: right-aligned line number, a space, then text.
struct SplitHalf {
    gutter: usize,
    content_width: usize,
    line_number: Style,
}

impl SplitHalf {
    fn cell(&self, num: usize, text: &str, style: Style) -> Vec<Span<'static>> {
        let num = if num > 0 { num.to_string() } else { String::new() };
        vec![
            Span::styled(format!("{:>width$}", num, width = self.gutter), self.line_number),
            Span::raw(" "),
            Span::styled(fit_to_width(text, self.content_width), style),
        ]
    }
}

fn push_separator(spans: &mut Vec<Span<'static>>, style: Style) {
    spans.push(Span::raw(" "));
    spans.push(Span::styled("│", style));
    spans.push(Span::raw(" "));
}

/// Single-column layout, styled per line and cut to `width`.
pub fn render_unified(content: &str, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut previous_blank = true;

    for raw in content.lines() {
        let cleaned = expand_tabs(&strip_ansi(raw));

        if cleaned.starts_with("@@") && !previous_blank {
            lines.push(Line::from(""));
        }

        let style = unified_style(&cleaned, theme);
        previous_blank = cleaned.is_empty();
        lines.push(Line::from(Span::styled(truncate_to_width(&cleaned, width), style)));
    }
    lines
}

fn unified_style(line: &str, theme: &Theme) -> Style {
    const HEADER_PREFIXES: [&str; 5] = ["diff --git", "index ", "---", "+++", "@@"];
    if HEADER_PREFIXES.iter().any(|p| line.starts_with(p)) {
        Style::default().add_modifier(Modifier::BOLD)
    } else if line.starts_with("\\ No newline") {
        theme.diff_header
    } else if line.starts_with('+') && !line.starts_with("+++") {
        theme.git_staged
    } else if line.starts_with('-') && !line.starts_with("---") {
        theme.git_unstaged
    } else {
        Style::default()
    }
}
