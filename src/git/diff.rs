use crate::ui::utils::strip_ansi;

/// Kind of a structured diff row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    FileHeader,
    HunkHeader,
    Context,
    Added,
    Removed,
}

/// One logical row of a unified diff, with tracked line numbers.
///
/// A line number of 0 means "not applicable" for that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    pub kind: RowKind,
    pub old_text: String,
    pub new_text: String,
    /// Original line, escape codes included
    pub raw: String,
    pub old_num: usize,
    pub new_num: usize,
}

impl DiffRow {
    fn header(kind: RowKind, raw: &str) -> Self {
        Self {
            kind,
            old_text: String::new(),
            new_text: String::new(),
            raw: raw.to_string(),
            old_num: 0,
            new_num: 0,
        }
    }

    fn blank(raw: &str) -> Self {
        Self::header(RowKind::Context, raw)
    }

    /// Stripped header text (for header rows)
    pub fn header_text(&self) -> String {
        strip_ansi(&self.raw)
    }
}

/// True when the text contains unified diff markers at all.
pub fn looks_like_diff(content: &str) -> bool {
    let cleaned = strip_ansi(content);
    cleaned.contains("diff --git") || cleaned.contains("@@")
}

/// Parse unified diff text into typed rows.
///
/// Never fails: unknown lines become context rows without line numbers and
/// unparseable hunk headers leave the counters untouched.
pub fn parse_diff_rows(content: &str) -> Vec<DiffRow> {
    let mut rows = Vec::new();
    let mut old_num: usize = 0;
    let mut new_num: usize = 0;

    for line in content.lines() {
        if line.is_empty() {
            rows.push(DiffRow::blank(""));
            continue;
        }

        // Classification always runs on the stripped line
        let cleaned = strip_ansi(line);
        if cleaned.is_empty() {
            rows.push(DiffRow::blank(line));
            continue;
        }

        if cleaned.starts_with("diff --git") || cleaned.starts_with("index ") {
            rows.push(DiffRow::header(RowKind::FileHeader, line));
            continue;
        }

        if cleaned.starts_with("--- ") || cleaned.starts_with("+++ ") {
            rows.push(DiffRow::header(RowKind::FileHeader, line));
            continue;
        }

        if cleaned.starts_with("@@") {
            rows.push(DiffRow::header(RowKind::HunkHeader, line));
            let (old_start, new_start) = parse_hunk_starts(&cleaned);
            if let Some(n) = old_start {
                old_num = n;
            }
            if let Some(n) = new_start {
                new_num = n;
            }
            continue;
        }

        if cleaned.starts_with("\\ No newline") {
            rows.push(DiffRow::header(RowKind::FileHeader, line));
            continue;
        }

        if let Some(text) = cleaned.strip_prefix('+') {
            rows.push(DiffRow {
                kind: RowKind::Added,
                old_text: String::new(),
                new_text: text.to_string(),
                raw: line.to_string(),
                old_num: 0,
                new_num,
            });
            new_num += 1;
        } else if let Some(text) = cleaned.strip_prefix('-') {
            rows.push(DiffRow {
                kind: RowKind::Removed,
                old_text: text.to_string(),
                new_text: String::new(),
                raw: line.to_string(),
                old_num,
                new_num: 0,
            });
            old_num += 1;
        } else if let Some(text) = cleaned.strip_prefix(' ') {
            rows.push(DiffRow {
                kind: RowKind::Context,
                old_text: text.to_string(),
                new_text: text.to_string(),
                raw: line.to_string(),
                old_num,
                new_num,
            });
            old_num += 1;
            new_num += 1;
        } else {
            rows.push(DiffRow {
                kind: RowKind::Context,
                old_text: cleaned.clone(),
                new_text: cleaned,
                raw: line.to_string(),
                old_num: 0,
                new_num: 0,
            });
        }
    }

    rows
}

/// Starting line numbers from a hunk header like "@@ -10,4 +12,6 @@ fn foo()".
/// Each side is `None` when it can't be parsed.
fn parse_hunk_starts(header: &str) -> (Option<usize>, Option<usize>) {
    let mut fields = header.split_whitespace().skip(1);
    let old = fields.next().and_then(|f| range_start(f, '-'));
    let new = fields.next().and_then(|f| range_start(f, '+'));
    (old, new)
}

fn range_start(field: &str, marker: char) -> Option<usize> {
    let range = field.strip_prefix(marker).unwrap_or(field);
    range.split(',').next()?.trim().parse().ok()
}

/// Largest line number on either side
pub fn max_line_number(rows: &[DiffRow]) -> usize {
    rows.iter()
        .map(|r| r.old_num.max(r.new_num))
        .max()
        .unwrap_or(0)
}
