mod app;
mod config;
mod git;
mod logging;
mod ui;
mod watch;

use anyhow::{Context, Result};
use app::{App, CommitField, Mode, PanelId, Resolution};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use git::{Completion, Executor, GitCommand};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use ui::theme::ThemeSet;
use watch::{FileWatcher, WatchEvent};

/// Terminal dashboard for a git working tree
#[derive(Parser)]
#[command(name = "gitdeck", version, about)]
struct Cli {
    /// Initialize a repository in the current directory if there is none
    #[arg(long)]
    init: bool,

    /// Where to write logs (defaults to ~/.gitdeck.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.unwrap_or_else(logging::default_log_path);
    logging::init_tracing(&log_path)?;

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let repo_root = git::ensure_git_repo(&cwd, cli.init)?;

    let config = config::load_config(&repo_root);
    let custom_themes = match config::config_dir() {
        Some(dir) => {
            if let Err(e) = config::ensure_config_files(&dir) {
                tracing::warn!(error = %e, "could not create config files");
            }
            config::load_custom_palettes(&dir)
        }
        None => Vec::new(),
    };
    let themes = ThemeSet::new(custom_themes, &config.theme);
    tracing::info!(theme = %themes.current_name(), repo = %repo_root.display(), "starting");
    let mut app = App::new(config, themes);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let result = run_app(&mut terminal, &mut app, &repo_root);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::warn!(error = %err, "event loop failed");
        eprintln!("Error: {:?}", err);
    }

    println!("Bye from gitdeck! :)");
    Ok(())
}

/// File watching that can be switched on and off at runtime
struct WatchControl {
    root: PathBuf,
    debounce_ms: u64,
    tx: mpsc::Sender<WatchEvent>,
    watcher: Option<FileWatcher>,
}

impl WatchControl {
    fn start(&mut self, app: &mut App) {
        match FileWatcher::new(&self.root, self.debounce_ms, self.tx.clone()) {
            Ok(w) => {
                self.watcher = Some(w);
                app.watching = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not start file watcher");
                app.notify(&format!("Watch failed: {}", e));
            }
        }
    }

    fn toggle(&mut self, app: &mut App) {
        if app.watching {
            self.watcher = None;
            app.watching = false;
            app.notify("Watch stopped");
        } else {
            self.start(app);
            if app.watching {
                app.notify("Watching for changes");
            }
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    repo_root: &Path,
) -> Result<()> {
    let (executor, completions) = Executor::new(repo_root.to_path_buf());

    // Channel for file watch events
    let (watch_tx, watch_rx) = mpsc::channel::<WatchEvent>();
    let mut watch = WatchControl {
        root: repo_root.to_path_buf(),
        debounce_ms: app.config.watch.debounce_ms,
        tx: watch_tx,
        watcher: None,
    };
    if app.config.watch.enabled {
        watch.start(app);
    }

    let size = terminal.size()?;
    app.resize(size.width, size.height);
    executor.dispatch_all(app.refresh_all());

    loop {
        // Draw
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for events with a timeout (lets us process git results and watch events too)
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let commands = handle_key(app, key, &mut watch);
                    executor.dispatch_all(commands);
                }
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        // Apply finished git commands (non-blocking)
        while let Ok(Completion { command, output }) = completions.try_recv() {
            let follow_up = app.apply_completion(command, output);
            executor.dispatch_all(follow_up);
        }

        // Watch events arrive already debounced; collapse whatever queued up
        let mut changed = 0usize;
        while let Ok(WatchEvent::Changed(paths)) = watch_rx.try_recv() {
            changed += paths.len();
        }
        if changed > 0 && app.watching {
            tracing::debug!(changed, "refreshing after file changes");
            executor.dispatch_all(app.refresh_all());
        }

        // Auto-clear notifications
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Route a key press to the handler for the current mode
fn handle_key(app: &mut App, key: KeyEvent, watch: &mut WatchControl) -> Vec<GitCommand> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Vec::new();
    }

    if app.show_help {
        handle_help_input(app, key);
        return Vec::new();
    }

    match app.mode() {
        Mode::Normal => handle_normal_input(app, key, watch),
        Mode::Input => handle_text_input(app, key),
        Mode::Confirm => handle_confirm_input(app, key),
        Mode::Commit => handle_commit_input(app, key),
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent, watch: &mut WatchControl) -> Vec<GitCommand> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // ── Global keys ──

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return Vec::new();
        }
        KeyCode::Tab => return app.focus_next(),
        KeyCode::BackTab => return app.focus_prev(),
        KeyCode::Char(c @ '0'..='6') => {
            let index = c.to_digit(10).unwrap_or(0) as usize;
            return PanelId::from_index(index)
                .map(|id| app.focus(id))
                .unwrap_or_default();
        }
        KeyCode::Char('j') | KeyCode::Down => return app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => return app.move_cursor(-1),
        KeyCode::Char('d') if ctrl => {
            app.scroll_main(app.main_page());
            return Vec::new();
        }
        KeyCode::Char('u') if ctrl => {
            app.scroll_main(-app.main_page());
            return Vec::new();
        }
        KeyCode::PageDown => {
            app.scroll_main(app.main_page() * 2);
            return Vec::new();
        }
        KeyCode::PageUp => {
            app.scroll_main(-app.main_page() * 2);
            return Vec::new();
        }
        KeyCode::Char('v') => {
            app.toggle_diff_view();
            return Vec::new();
        }
        KeyCode::Char('t') => {
            app.next_theme();
            return Vec::new();
        }
        KeyCode::Char('r') => {
            app.notify("Refreshed");
            return app.refresh_all();
        }
        KeyCode::Char('w') => {
            watch.toggle(app);
            return Vec::new();
        }
        KeyCode::Char('?') => {
            app.toggle_help();
            return Vec::new();
        }
        _ => {}
    }

    // ── Panel keys ──

    match (app.focused, key.code) {
        (PanelId::Files, KeyCode::Char(' ')) => app.toggle_stage_selected().into_iter().collect(),
        (PanelId::Files, KeyCode::Char('a')) => vec![GitCommand::StageAll],
        (PanelId::Files, KeyCode::Char('d')) => {
            app.request_discard();
            Vec::new()
        }
        (PanelId::Files, KeyCode::Char('c')) => {
            app.request_commit();
            Vec::new()
        }
        (PanelId::Branches, KeyCode::Enter) => app.checkout_selected().into_iter().collect(),
        (PanelId::Branches, KeyCode::Char('n')) => {
            app.request_new_branch();
            Vec::new()
        }
        (PanelId::Branches, KeyCode::Char('R')) => {
            app.request_rename_branch();
            Vec::new()
        }
        (PanelId::Branches, KeyCode::Char('D')) => {
            app.request_delete_branch();
            Vec::new()
        }
        (PanelId::Stash, KeyCode::Char('s')) => {
            app.request_stash_push();
            Vec::new()
        }
        (PanelId::Stash, KeyCode::Char('p')) => {
            app.request_stash_pop();
            Vec::new()
        }
        (PanelId::Stash, KeyCode::Char('D')) => {
            app.request_stash_drop();
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn handle_text_input(app: &mut App, key: KeyEvent) -> Vec<GitCommand> {
    match key.code {
        KeyCode::Enter => return app.resolve_popup(Resolution::Confirm),
        KeyCode::Esc => return app.resolve_popup(Resolution::Cancel),
        KeyCode::Backspace => app.popup.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.popup.push_char(c)
        }
        _ => {}
    }
    Vec::new()
}

fn handle_confirm_input(app: &mut App, key: KeyEvent) -> Vec<GitCommand> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.resolve_popup(Resolution::Confirm),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.resolve_popup(Resolution::Cancel)
        }
        _ => Vec::new(),
    }
}

fn handle_commit_input(app: &mut App, key: KeyEvent) -> Vec<GitCommand> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if ctrl => return app.resolve_popup(Resolution::Confirm),
        KeyCode::Esc => return app.resolve_popup(Resolution::Cancel),
        KeyCode::Tab | KeyCode::BackTab => app.popup.toggle_commit_focus(),
        KeyCode::Enter => {
            if app.popup.commit_focus() == Some(CommitField::Title) {
                return app.resolve_popup(Resolution::Confirm);
            }
            app.popup.newline();
        }
        KeyCode::Backspace => app.popup.backspace(),
        KeyCode::Char(c) if !ctrl => app.popup.push_char(c),
        _ => {}
    }
    Vec::new()
}

fn handle_help_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_help(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_help(-1),
        KeyCode::Esc | KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}
