use ratatui::layout::Rect;

use super::keymap::full_help;
use super::panel::{main_content_width, FrameLayout, Panel, PanelId};
use super::popup::{
    CommitAction, ConfirmAction, InputAction, Mode, PopupError, PopupOutcome, PopupRequest,
    PopupState, RequestId, Resolution,
};
use crate::config::GitdeckConfig;
use crate::git::{CommandOutput, GitCommand, Target};
use crate::ui::diff_view::{render_adaptive, DiffViewMode};
use crate::ui::theme::{Theme, ThemeSet};

const LOADING_TEXT: &str = "Loading...";
const HISTORY_PLACEHOLDER: &str = "Command history will appear here...";
/// Ticks (~100ms each) a notification stays on screen
const NOTIFICATION_TICKS: u8 = 20;

// ── Main App State ──

pub struct App {
    /// Indexed by [`PanelId::index`]
    panels: Vec<Panel>,

    /// Panel receiving keyboard input
    pub focused: PanelId,

    /// Left panel whose selection drives the main view
    pub active_source: PanelId,

    pub popup: PopupState,

    pub diff_view: DiffViewMode,

    pub themes: ThemeSet,

    pub repo_name: String,
    pub branch_name: String,

    /// `$ command` lines and their output, oldest first
    pub command_history: Vec<String>,

    /// Full-screen help view
    pub show_help: bool,
    pub help_scroll: usize,

    /// Terminal size from the last resize
    pub width: u16,
    pub height: u16,

    pub should_quit: bool,

    /// Whether watch mode is active
    pub watching: bool,

    /// Last notification message
    pub notification: Option<String>,

    /// Ticks since last notification (for auto-clearing)
    pub notification_ticks: u8,

    /// The query whose output the main panel currently shows
    main_command: Option<GitCommand>,

    pub config: GitdeckConfig,
}

impl App {
    pub fn new(config: GitdeckConfig, themes: ThemeSet) -> Self {
        let mut panels: Vec<Panel> = PanelId::ALL.iter().map(|_| Panel::new(LOADING_TEXT)).collect();
        panels[PanelId::Secondary.index()] = Panel::new(HISTORY_PLACEHOLDER);

        App {
            panels,
            focused: PanelId::Status,
            active_source: PanelId::Status,
            popup: PopupState::default(),
            diff_view: config.display.diff_view,
            themes,
            repo_name: String::new(),
            branch_name: String::new(),
            command_history: Vec::new(),
            show_help: false,
            help_scroll: 0,
            width: 0,
            height: 0,
            should_quit: false,
            watching: false,
            notification: None,
            notification_ticks: 0,
            main_command: None,
            config,
        }
    }

    // ── Accessors ──

    pub fn panel(&self, id: PanelId) -> &Panel {
        &self.panels[id.index()]
    }

    pub fn panel_mut(&mut self, id: PanelId) -> &mut Panel {
        &mut self.panels[id.index()]
    }

    pub fn theme(&self) -> &Theme {
        self.themes.current()
    }

    pub fn mode(&self) -> Mode {
        self.popup.mode()
    }

    /// Width the main panel renders diffs at
    pub fn main_width(&self) -> usize {
        main_content_width(self.width)
    }

    /// Main panel content as rendered lines
    pub fn main_line_count(&self) -> usize {
        render_adaptive(
            &self.panel(PanelId::Main).content,
            self.main_width(),
            self.theme(),
            self.diff_view,
        )
        .len()
    }

    // ── Layout ──

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let layout = FrameLayout::compute(Rect::new(0, 0, width, height));
        for id in PanelId::ALL {
            let rows = layout
                .as_ref()
                .map(|l| l.panel(id).height.saturating_sub(2) as usize)
                .unwrap_or(0);
            let panel = self.panel_mut(id);
            panel.viewport_height = rows;
            if id.is_list() {
                panel.move_cursor(0);
            }
        }
        tracing::debug!(width, height, "resized");
    }

    // ── Refresh ──

    /// Queries for every panel
    pub fn refresh_all(&self) -> Vec<GitCommand> {
        let mut commands = vec![
            GitCommand::RepoInfo,
            GitCommand::Files,
            GitCommand::Branches,
            GitCommand::Commits,
            GitCommand::Stashes,
        ];
        commands.extend(self.main_request());
        commands
    }

    /// What the main view should show for the current source and selection
    pub fn main_request(&self) -> Option<GitCommand> {
        match self.active_source {
            PanelId::Status => Some(GitCommand::StatusText),
            PanelId::Files => self
                .selected_file()
                .map(|(status, path)| GitCommand::FileDiff { path, status }),
            PanelId::Branches => self.selected_branch().map(|name| GitCommand::BranchLog { name }),
            PanelId::Commits => self.selected_commit().map(|sha| GitCommand::ShowCommit { sha }),
            PanelId::Stash => self.selected_stash().map(|name| GitCommand::ShowStash { name }),
            PanelId::Main | PanelId::Secondary => None,
        }
    }

    /// Ask for a new main view; with nothing selected the view is cleared
    fn request_main(&mut self) -> Vec<GitCommand> {
        match self.main_request() {
            Some(command) => vec![command],
            None => {
                self.main_command = None;
                let main = self.panel_mut(PanelId::Main);
                main.set_content(String::new());
                main.scroll_to_top();
                Vec::new()
            }
        }
    }

    /// Apply a finished command. Returns follow-up commands to dispatch.
    pub fn apply_completion(&mut self, command: GitCommand, output: CommandOutput) -> Vec<GitCommand> {
        tracing::debug!(command = %output.description, error = output.error.is_some(), "completed");
        match command.target() {
            Target::RepoInfo => {
                if output.error.is_none() {
                    let mut lines = output.text.lines();
                    self.repo_name = lines.next().unwrap_or("").to_string();
                    self.branch_name = lines.next().unwrap_or("").to_string();
                }
                let status = match &output.error {
                    Some(e) => e.clone(),
                    None => format!("{} → {}", self.repo_name, self.branch_name),
                };
                self.panel_mut(PanelId::Status).set_content(status);
                Vec::new()
            }
            Target::Main => {
                let same_view = self.main_command.as_ref() == Some(&command);
                let scroll = self.panel(PanelId::Main).scroll;
                self.panel_mut(PanelId::Main)
                    .set_content(output.display_text().to_string());
                // Main scrolls over rendered lines, not raw ones
                let total = self.main_line_count();
                let main = self.panel_mut(PanelId::Main);
                main.scroll = if same_view { scroll.min(main.max_scroll(total)) } else { 0 };
                self.main_command = Some(command);
                Vec::new()
            }
            Target::Files | Target::Branches | Target::Commits | Target::Stash => {
                let id = list_panel(command.target());
                let panel = self.panel_mut(id);
                match &output.error {
                    Some(error) => panel.set_content(error.clone()),
                    None => panel.set_lines(output.text),
                }
                if id == self.active_source {
                    self.request_main()
                } else {
                    Vec::new()
                }
            }
            Target::Action => {
                self.record_history(&output);
                if let Some(error) = &output.error {
                    self.notify(error);
                }
                self.refresh_all()
            }
        }
    }

    fn record_history(&mut self, output: &CommandOutput) {
        self.command_history.push(format!("$ {}", output.description));
        let body = output.display_text().trim_end();
        if !body.is_empty() {
            self.command_history.push(body.to_string());
        }
        let text = self.command_history.join("\n");
        let secondary = self.panel_mut(PanelId::Secondary);
        secondary.set_content(text);
        let total = secondary.line_count();
        secondary.scroll = secondary.max_scroll(total);
    }

    // ── Focus ──

    pub fn focus_next(&mut self) -> Vec<GitCommand> {
        self.focus(self.focused.next())
    }

    pub fn focus_prev(&mut self) -> Vec<GitCommand> {
        self.focus(self.focused.prev())
    }

    /// Focus a panel; a left panel also becomes the main view source.
    pub fn focus(&mut self, id: PanelId) -> Vec<GitCommand> {
        self.focused = id;
        if id.drives_main() && id != self.active_source {
            self.active_source = id;
            return self.request_main();
        }
        Vec::new()
    }

    // ── Cursor / Scrolling ──

    /// Move the cursor of a list panel, or scroll a text panel
    pub fn move_cursor(&mut self, delta: isize) -> Vec<GitCommand> {
        let id = self.focused;
        if id.is_list() {
            let moved = self.panel_mut(id).move_cursor(delta);
            if moved && id == self.active_source {
                return self.request_main();
            }
            return Vec::new();
        }
        self.scroll_panel(id, delta);
        Vec::new()
    }

    pub fn scroll_main(&mut self, delta: isize) {
        self.scroll_panel(PanelId::Main, delta);
    }

    fn scroll_panel(&mut self, id: PanelId, delta: isize) {
        let total = if id == PanelId::Main {
            self.main_line_count()
        } else {
            self.panel(id).line_count()
        };
        self.panel_mut(id).scroll_by(delta, total);
    }

    /// Half the main viewport, for page-style scrolling
    pub fn main_page(&self) -> isize {
        (self.panel(PanelId::Main).viewport_height / 2).max(1) as isize
    }

    // ── Diff view ──

    pub fn toggle_diff_view(&mut self) {
        self.diff_view = self.diff_view.toggled(self.main_width());
        self.panel_mut(PanelId::Main).scroll_to_top();
        let label = format!("Diff view: {}", self.diff_view.label());
        self.notify(&label);
    }

    // ── Selection ──

    /// (status code, path) of the selected file
    pub fn selected_file(&self) -> Option<(String, String)> {
        let line = self.panel(PanelId::Files).selected_line()?;
        let mut parts = line.splitn(3, '\t');
        let _prefix = parts.next()?;
        let status = parts.next()?;
        let path = parts.next()?;
        // renames show as "old -> new"
        let path = path.rsplit(" -> ").next().unwrap_or(path);
        Some((status.to_string(), unquote(path)))
    }

    pub fn selected_branch(&self) -> Option<String> {
        let line = self.panel(PanelId::Branches).selected_line()?;
        let name = line.split_once('\t').map(|(_, n)| n).unwrap_or(line);
        let name = name.trim().trim_end_matches("(*)").trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    pub fn selected_commit(&self) -> Option<String> {
        let line = self.panel(PanelId::Commits).selected_line()?;
        let sha = line.split('\t').nth(1)?.trim();
        (!sha.is_empty()).then(|| sha.to_string())
    }

    pub fn selected_stash(&self) -> Option<String> {
        let line = self.panel(PanelId::Stash).selected_line()?;
        let name = line.split('\t').next()?.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    fn current_branch_selected(&self) -> bool {
        self.panel(PanelId::Branches)
            .selected_line()
            .is_some_and(|l| l.trim_end().ends_with("(*)"))
    }

    // ── Actions ──

    /// Stage an unstaged file, or unstage a staged one
    pub fn toggle_stage_selected(&self) -> Option<GitCommand> {
        let (status, path) = self.selected_file()?;
        let index = status.chars().next().unwrap_or(' ');
        if index != ' ' && index != '?' {
            Some(GitCommand::UnstageFile { path })
        } else {
            Some(GitCommand::StageFile { path })
        }
    }

    pub fn checkout_selected(&self) -> Option<GitCommand> {
        if self.current_branch_selected() {
            return None;
        }
        self.selected_branch().map(|name| GitCommand::Checkout { name })
    }

    pub fn request_discard(&mut self) {
        if let Some((_, path)) = self.selected_file() {
            self.open_popup(PopupRequest::Confirm {
                message: format!("Discard all changes to '{}'?", path),
                action: ConfirmAction::DiscardFile { path },
            });
        }
    }

    pub fn request_commit(&mut self) {
        self.open_popup(PopupRequest::Commit { action: CommitAction::Commit });
    }

    pub fn request_new_branch(&mut self) {
        self.open_popup(PopupRequest::Input {
            title: "New branch name:".to_string(),
            initial: String::new(),
            action: InputAction::CreateBranch,
        });
    }

    pub fn request_rename_branch(&mut self) {
        if let Some(from) = self.selected_branch() {
            self.open_popup(PopupRequest::Input {
                title: format!("Rename branch '{}' to:", from),
                initial: from.clone(),
                action: InputAction::RenameBranch { from },
            });
        }
    }

    pub fn request_delete_branch(&mut self) {
        if self.current_branch_selected() {
            self.notify("Cannot delete the checked-out branch");
            return;
        }
        if let Some(name) = self.selected_branch() {
            self.open_popup(PopupRequest::Confirm {
                message: format!("Delete branch '{}'?", name),
                action: ConfirmAction::DeleteBranch { name },
            });
        }
    }

    pub fn request_stash_push(&mut self) {
        self.open_popup(PopupRequest::Input {
            title: "Stash message:".to_string(),
            initial: String::new(),
            action: InputAction::StashPush,
        });
    }

    pub fn request_stash_pop(&mut self) {
        if let Some(name) = self.selected_stash() {
            self.open_popup(PopupRequest::Confirm {
                message: format!("Pop '{}'?", name),
                action: ConfirmAction::PopStash { name },
            });
        }
    }

    pub fn request_stash_drop(&mut self) {
        if let Some(name) = self.selected_stash() {
            self.open_popup(PopupRequest::Confirm {
                message: format!("Drop '{}'? This cannot be undone.", name),
                action: ConfirmAction::DropStash { name },
            });
        }
    }

    // ── Popups ──

    /// Open a popup. A request while another popup is open is refused.
    pub fn request_popup(&mut self, request: PopupRequest) -> Result<RequestId, PopupError> {
        let result = self.popup.request(request);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "popup request rejected");
            let message = e.to_string();
            self.notify(&message);
        }
        result
    }

    fn open_popup(&mut self, request: PopupRequest) {
        self.request_popup(request).ok();
    }

    /// Close the open popup. Returns the command its continuation produced.
    pub fn resolve_popup(&mut self, resolution: Resolution) -> Vec<GitCommand> {
        match self.popup.resolve(resolution) {
            Ok(PopupOutcome::Completed { result: Ok(command), .. }) => vec![command],
            Ok(PopupOutcome::Completed { result: Err(message), .. }) => {
                self.notify(message);
                Vec::new()
            }
            Ok(PopupOutcome::Cancelled { .. }) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "popup resolve rejected");
                Vec::new()
            }
        }
    }

    // ── Themes / Help ──

    pub fn next_theme(&mut self) {
        let name = self.themes.cycle().to_string();
        tracing::info!(theme = %name, "switched theme");
        self.notify(&format!("Theme: {}", name));
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.help_scroll = 0;
    }

    pub fn scroll_help(&mut self, delta: isize) {
        let sections = full_help();
        let total: usize = sections.iter().map(|s| s.bindings.len() + 2).sum();
        let rows = self.height.saturating_sub(3) as usize;
        let max = total.saturating_sub(rows);
        self.help_scroll = self.help_scroll.saturating_add_signed(delta).min(max);
    }

    // ── Notifications ──

    pub fn notify(&mut self, msg: &str) {
        self.notification = Some(msg.to_string());
        self.notification_ticks = 0;
    }

    /// Tick called on every event loop iteration, used for notification auto-clear
    pub fn tick(&mut self) {
        if self.notification.is_some() {
            self.notification_ticks += 1;
            if self.notification_ticks > NOTIFICATION_TICKS {
                self.notification = None;
                self.notification_ticks = 0;
            }
        }
    }
}

// ── Helpers ──

fn list_panel(target: Target) -> PanelId {
    match target {
        Target::Files => PanelId::Files,
        Target::Branches => PanelId::Branches,
        Target::Commits => PanelId::Commits,
        _ => PanelId::Stash,
    }
}

/// Porcelain quotes paths with unusual characters
fn unquote(path: &str) -> String {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_app() -> App {
        let mut app = App::new(GitdeckConfig::default(), ThemeSet::default());
        app.resize(130, 40);
        app
    }

    fn ok(command: &GitCommand, text: &str) -> CommandOutput {
        CommandOutput {
            text: text.to_string(),
            description: command.description(),
            error: None,
        }
    }

    fn load(app: &mut App, command: GitCommand, text: &str) -> Vec<GitCommand> {
        let output = ok(&command, text);
        app.apply_completion(command, output)
    }

    const FILES: &str = "├─\t M\tsrc/main.rs\n└─\t??\tnotes.txt";

    #[test]
    fn starts_focused_on_status() {
        let app = make_app();
        assert_eq!(app.focused, PanelId::Status);
        assert_eq!(app.mode(), Mode::Normal);
        assert_eq!(app.main_request(), Some(GitCommand::StatusText));
    }

    #[test]
    fn refresh_covers_every_panel() {
        let app = make_app();
        let commands = app.refresh_all();
        assert!(commands.contains(&GitCommand::RepoInfo));
        assert!(commands.contains(&GitCommand::Stashes));
        assert!(commands.contains(&GitCommand::StatusText));
    }

    #[test]
    fn repo_info_fills_status_panel() {
        let mut app = make_app();
        load(&mut app, GitCommand::RepoInfo, "gitdeck\nmain");
        assert_eq!(app.panel(PanelId::Status).content, "gitdeck → main");
    }

    #[test]
    fn focusing_files_requests_selected_diff() {
        let mut app = make_app();
        load(&mut app, GitCommand::Files, FILES);
        let commands = app.focus_next();
        assert_eq!(app.focused, PanelId::Files);
        assert_eq!(app.active_source, PanelId::Files);
        assert_eq!(
            commands,
            vec![GitCommand::FileDiff {
                path: "src/main.rs".to_string(),
                status: " M".to_string(),
            }]
        );
    }

    #[test]
    fn cursor_move_in_source_requests_main() {
        let mut app = make_app();
        load(&mut app, GitCommand::Files, FILES);
        app.focus(PanelId::Files);
        let commands = app.move_cursor(1);
        assert_eq!(
            commands,
            vec![GitCommand::FileDiff {
                path: "notes.txt".to_string(),
                status: "??".to_string(),
            }]
        );
        // already at the end
        assert!(app.move_cursor(1).is_empty());
    }

    #[test]
    fn focusing_right_panels_keeps_source() {
        let mut app = make_app();
        app.focus(PanelId::Commits);
        assert!(app.focus(PanelId::Main).is_empty());
        assert_eq!(app.active_source, PanelId::Commits);
    }

    #[test]
    fn list_refresh_of_source_rerequests_main() {
        let mut app = make_app();
        app.focus(PanelId::Commits);
        let commands = load(&mut app, GitCommand::Commits, "○ \tabc1234\tAda\tAdd parser");
        assert_eq!(commands, vec![GitCommand::ShowCommit { sha: "abc1234".to_string() }]);
        assert!(load(&mut app, GitCommand::Stashes, "stash@{0}\tWIP").is_empty());
    }

    #[test]
    fn empty_source_clears_main() {
        let mut app = make_app();
        load(&mut app, GitCommand::StatusText, "On branch main");
        app.focus(PanelId::Stash);
        assert!(load(&mut app, GitCommand::Stashes, "").is_empty());
        assert!(app.panel(PanelId::Main).content.is_empty());
        assert_eq!(app.panel(PanelId::Stash).position_indicator(), None);
    }

    #[test]
    fn errors_show_as_panel_text() {
        let mut app = make_app();
        let output = CommandOutput {
            text: String::new(),
            description: "git branch".to_string(),
            error: Some("[ERROR - 128] not a git repository".to_string()),
        };
        app.apply_completion(GitCommand::Branches, output);
        let panel = app.panel(PanelId::Branches);
        assert_eq!(panel.content, "[ERROR - 128] not a git repository");
        assert_eq!(panel.position_indicator(), None);
    }

    #[test]
    fn same_main_view_keeps_scroll() {
        let mut app = make_app();
        let long: String = (0..200).map(|i| format!("line {}\n", i)).collect();
        load(&mut app, GitCommand::StatusText, &long);
        app.scroll_main(10);
        assert_eq!(app.panel(PanelId::Main).scroll, 10);
        load(&mut app, GitCommand::StatusText, &long);
        assert_eq!(app.panel(PanelId::Main).scroll, 10);
        load(&mut app, GitCommand::ShowCommit { sha: "abc".to_string() }, &long);
        assert_eq!(app.panel(PanelId::Main).scroll, 0);
    }

    #[test]
    fn same_wrapped_diff_keeps_scroll_past_raw_line_count() {
        let mut app = make_app();
        let long_line = "word ".repeat(40);
        let mut diff = String::from("@@ -1,20 +1,20 @@\n");
        for _ in 0..20 {
            diff.push_str(&format!(" {}\n", long_line));
        }
        load(&mut app, GitCommand::StatusText, &diff);
        assert!(app.main_line_count() > 21 + 60);
        app.scroll_main(60);
        assert_eq!(app.panel(PanelId::Main).scroll, 60);
        load(&mut app, GitCommand::StatusText, &diff);
        assert_eq!(app.panel(PanelId::Main).scroll, 60);
    }

    #[test]
    fn action_completion_records_history_and_refreshes() {
        let mut app = make_app();
        let command = GitCommand::StageFile { path: "a.rs".to_string() };
        let commands = load(&mut app, command, "");
        assert_eq!(app.command_history, vec!["$ git add -- a.rs".to_string()]);
        assert_eq!(app.panel(PanelId::Secondary).content, "$ git add -- a.rs");
        assert!(commands.contains(&GitCommand::Files));
    }

    #[test]
    fn failed_action_notifies() {
        let mut app = make_app();
        let command = GitCommand::Checkout { name: "nope".to_string() };
        let output = CommandOutput {
            text: String::new(),
            description: command.description(),
            error: Some("[ERROR - 1] pathspec 'nope' did not match".to_string()),
        };
        app.apply_completion(command, output);
        assert_eq!(
            app.notification.as_deref(),
            Some("[ERROR - 1] pathspec 'nope' did not match")
        );
        assert_eq!(app.command_history.len(), 2);
    }

    #[test]
    fn toggle_uses_main_panel_width() {
        let mut app = make_app();
        // 130 columns leaves 89 for the main panel: auto shows split
        assert_eq!(app.main_width(), 89);
        app.toggle_diff_view();
        assert_eq!(app.diff_view, DiffViewMode::ForcedUnified);
        app.toggle_diff_view();
        assert_eq!(app.diff_view, DiffViewMode::Auto);

        app.resize(100, 40);
        app.toggle_diff_view();
        assert_eq!(app.diff_view, DiffViewMode::ForcedSplit);
    }

    #[test]
    fn stage_toggle_depends_on_index_side() {
        let mut app = make_app();
        load(&mut app, GitCommand::Files, "├─\tM \tstaged.rs\n└─\t M\tdirty.rs");
        assert_eq!(
            app.toggle_stage_selected(),
            Some(GitCommand::UnstageFile { path: "staged.rs".to_string() })
        );
        app.focus(PanelId::Files);
        app.move_cursor(1);
        assert_eq!(
            app.toggle_stage_selected(),
            Some(GitCommand::StageFile { path: "dirty.rs".to_string() })
        );
    }

    #[test]
    fn renamed_and_quoted_paths() {
        let mut app = make_app();
        load(&mut app, GitCommand::Files, "└─\tR \told.rs -> \"new name.rs\"");
        assert_eq!(
            app.selected_file(),
            Some(("R ".to_string(), "new name.rs".to_string()))
        );
    }

    #[test]
    fn branch_selection_strips_head_marker() {
        let mut app = make_app();
        load(&mut app, GitCommand::Branches, "2 hours ago\tmain (*)\n3 days ago\tfeature");
        assert_eq!(app.selected_branch().as_deref(), Some("main"));
        assert_eq!(app.checkout_selected(), None);
        app.request_delete_branch();
        assert_eq!(app.mode(), Mode::Normal);

        app.focus(PanelId::Branches);
        app.move_cursor(1);
        assert_eq!(
            app.checkout_selected(),
            Some(GitCommand::Checkout { name: "feature".to_string() })
        );
    }

    #[test]
    fn second_popup_is_rejected_and_first_still_completes() {
        let mut app = make_app();
        load(&mut app, GitCommand::Branches, "1 day ago\tmain (*)\n2 days ago\told");
        app.focus(PanelId::Branches);
        app.move_cursor(1);
        app.request_delete_branch();
        assert_eq!(app.mode(), Mode::Confirm);

        let err = app
            .request_popup(PopupRequest::Input {
                title: "New branch name:".to_string(),
                initial: String::new(),
                action: InputAction::CreateBranch,
            })
            .unwrap_err();
        assert!(matches!(err, PopupError::AlreadyActive { .. }));
        assert_eq!(app.mode(), Mode::Confirm);
        assert_eq!(app.notification.as_deref(), Some("a confirm popup is already open"));

        let commands = app.resolve_popup(Resolution::Confirm);
        assert_eq!(commands, vec![GitCommand::DeleteBranch { name: "old".to_string() }]);
        assert_eq!(app.mode(), Mode::Normal);
    }

    #[test]
    fn empty_commit_title_notifies() {
        let mut app = make_app();
        app.request_commit();
        assert_eq!(app.mode(), Mode::Commit);
        assert!(app.resolve_popup(Resolution::Confirm).is_empty());
        assert_eq!(app.notification.as_deref(), Some("Commit title cannot be empty"));
        assert_eq!(app.mode(), Mode::Normal);
    }

    #[test]
    fn resolve_without_popup_does_nothing() {
        let mut app = make_app();
        assert!(app.resolve_popup(Resolution::Confirm).is_empty());
    }

    #[test]
    fn notifications_expire() {
        let mut app = make_app();
        app.notify("hello");
        for _ in 0..=NOTIFICATION_TICKS {
            app.tick();
        }
        assert!(app.notification.is_none());
    }

    #[test]
    fn help_scroll_is_bounded() {
        let mut app = make_app();
        app.toggle_help();
        app.scroll_help(-3);
        assert_eq!(app.help_scroll, 0);
        for _ in 0..500 {
            app.scroll_help(1);
        }
        let stuck = app.help_scroll;
        app.scroll_help(1);
        assert_eq!(app.help_scroll, stuck);
        app.toggle_help();
        assert_eq!(app.help_scroll, 0);
    }

    #[test]
    fn theme_cycles_with_notification() {
        let mut app = make_app();
        app.next_theme();
        assert_eq!(app.themes.current_name(), "Gruvbox");
        assert_eq!(app.notification.as_deref(), Some("Theme: Gruvbox"));
    }
}
