use std::path::Path;
use std::process::Command;

/// Every git invocation the dashboard makes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    // ── Queries ──
    RepoInfo,
    StatusText,
    Files,
    Branches,
    Commits,
    Stashes,
    FileDiff { path: String, status: String },
    BranchLog { name: String },
    ShowCommit { sha: String },
    ShowStash { name: String },

    // ── Actions ──
    StageFile { path: String },
    UnstageFile { path: String },
    StageAll,
    DiscardFile { path: String },
    Commit { message: String },
    Checkout { name: String },
    CreateBranch { name: String },
    DeleteBranch { name: String },
    RenameBranch { from: String, to: String },
    StashPush { message: Option<String> },
    StashPop { name: String },
    StashDrop { name: String },
}

/// Where the output of a command goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    RepoInfo,
    Main,
    Files,
    Branches,
    Commits,
    Stash,
    /// State-changing command; output goes to the command history
    Action,
}

/// Result of one git invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub text: String,
    /// The command line, e.g. `git status --porcelain`
    pub description: String,
    /// Normalized `[ERROR - code] message` on failure
    pub error: Option<String>,
}

impl CommandOutput {
    /// Text to show for this result: the error when there is one
    pub fn display_text(&self) -> &str {
        self.error.as_deref().unwrap_or(&self.text)
    }
}

impl GitCommand {
    pub fn args(&self) -> Vec<String> {
        let args: Vec<&str> = match self {
            GitCommand::RepoInfo => vec!["rev-parse", "--show-toplevel", "--abbrev-ref", "HEAD"],
            GitCommand::StatusText => vec!["status"],
            GitCommand::Files => vec!["status", "--porcelain"],
            GitCommand::Branches => vec![
                "branch",
                "--sort=-committerdate",
                "--format=%(committerdate:relative)%09%(refname:short)%09%(HEAD)",
            ],
            GitCommand::Commits => vec![
                "log",
                "--graph",
                "--format=%x09%h%x09%an%x09%s",
                "-n",
                "200",
            ],
            GitCommand::Stashes => vec!["stash", "list", "--format=%gd%x09%s"],
            GitCommand::FileDiff { path, status } => {
                if status == "??" {
                    vec!["diff", "--no-index", "--", "/dev/null", path.as_str()]
                } else if staged_only(status) {
                    vec!["diff", "--cached", "--", path.as_str()]
                } else {
                    vec!["diff", "--", path.as_str()]
                }
            }
            GitCommand::BranchLog { name } => {
                vec!["log", "--graph", "--oneline", "--decorate", "-n", "100", name.as_str()]
            }
            GitCommand::ShowCommit { sha } => vec!["show", sha.as_str()],
            GitCommand::ShowStash { name } => vec!["stash", "show", "-p", name.as_str()],

            GitCommand::StageFile { path } => vec!["add", "--", path.as_str()],
            GitCommand::UnstageFile { path } => vec!["restore", "--staged", "--", path.as_str()],
            GitCommand::StageAll => vec!["add", "-A"],
            GitCommand::DiscardFile { path } => vec!["restore", "--", path.as_str()],
            GitCommand::Commit { message } => vec!["commit", "-m", message.as_str()],
            GitCommand::Checkout { name } => vec!["checkout", name.as_str()],
            GitCommand::CreateBranch { name } => vec!["checkout", "-b", name.as_str()],
            GitCommand::DeleteBranch { name } => vec!["branch", "-d", name.as_str()],
            GitCommand::RenameBranch { from, to } => vec!["branch", "-m", from.as_str(), to.as_str()],
            GitCommand::StashPush { message } => match message {
                Some(m) => vec!["stash", "push", "-m", m.as_str()],
                None => vec!["stash", "push"],
            },
            GitCommand::StashPop { name } => vec!["stash", "pop", name.as_str()],
            GitCommand::StashDrop { name } => vec!["stash", "drop", name.as_str()],
        };
        args.into_iter().map(str::to_string).collect()
    }

    pub fn description(&self) -> String {
        format!("git {}", self.args().join(" "))
    }

    pub fn target(&self) -> Target {
        match self {
            GitCommand::RepoInfo => Target::RepoInfo,
            GitCommand::StatusText
            | GitCommand::FileDiff { .. }
            | GitCommand::BranchLog { .. }
            | GitCommand::ShowCommit { .. }
            | GitCommand::ShowStash { .. } => Target::Main,
            GitCommand::Files => Target::Files,
            GitCommand::Branches => Target::Branches,
            GitCommand::Commits => Target::Commits,
            GitCommand::Stashes => Target::Stash,
            _ => Target::Action,
        }
    }

    pub fn is_action(&self) -> bool {
        self.target() == Target::Action
    }

    /// Exit codes that don't mean failure for this command
    fn accepts_exit_code(&self, code: i32) -> bool {
        match self {
            // --no-index exits 1 when the files differ
            GitCommand::FileDiff { status, .. } if status == "??" => code == 1,
            _ => false,
        }
    }
}

/// Index side changed while the work tree side is clean
fn staged_only(status: &str) -> bool {
    let mut chars = status.chars();
    match (chars.next(), chars.next()) {
        (Some(index), Some(worktree)) => index != ' ' && index != '?' && worktree == ' ',
        _ => false,
    }
}

/// Run `command` in `repo_root`. Never fails: problems are reported through
/// [`CommandOutput::error`].
pub fn run(command: &GitCommand, repo_root: &Path) -> CommandOutput {
    let args = command.args();
    let description = command.description();
    tracing::debug!(command = %description, "executing git");

    let mut git = Command::new("git");
    // queries must not rewrite .git/index, or the watcher would see our own refreshes
    if !command.is_action() {
        git.arg("--no-optional-locks");
    }
    let output = match git.args(&args).current_dir(repo_root).output() {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(command = %description, error = %e, "failed to spawn git");
            return CommandOutput {
                text: String::new(),
                description,
                error: Some(format!("[ERROR - -1] failed to run git: {}", e)),
            };
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    if !output.status.success() && !command.accepts_exit_code(code) {
        let combined = format!("{}{}", stdout, stderr);
        let error = normalize_error(code, &combined);
        tracing::warn!(command = %description, code, "git failed: {}", error);
        return CommandOutput {
            text: String::new(),
            description,
            error: Some(error),
        };
    }

    let text = if command.is_action() {
        format!("{}{}", stdout, stderr)
    } else {
        format_output(command, &stdout)
    };
    CommandOutput {
        text,
        description,
        error: None,
    }
}

/// `[ERROR - code] message`, without git's `fatal: ` / `error: ` prefix
pub fn normalize_error(code: i32, output: &str) -> String {
    let message = output.trim();
    let message = message.strip_prefix("fatal: ").unwrap_or(message);
    let message = message.strip_prefix("error: ").unwrap_or(message);
    format!("[ERROR - {}] {}", code, message)
}

/// Reshape raw query output into the line formats the panels expect
pub fn format_output(command: &GitCommand, raw: &str) -> String {
    match command {
        GitCommand::RepoInfo => format_repo_info(raw),
        GitCommand::Files => format_files(raw),
        GitCommand::Branches => format_branches(raw),
        GitCommand::Commits => format_commits(raw),
        _ => raw.to_string(),
    }
}

/// `<top-level path>\n<branch>` becomes `<repo name>\n<branch>`
fn format_repo_info(raw: &str) -> String {
    let mut lines = raw.lines();
    let root = lines.next().unwrap_or("").trim();
    let branch = lines.next().unwrap_or("").trim();
    let name = Path::new(root)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.to_string());
    format!("{}\n{}", name, branch)
}

/// Porcelain status lines become `prefix\tXY\tpath`, drawn as a small tree
pub fn format_files(raw: &str) -> String {
    let entries: Vec<(&str, &str)> = raw
        .lines()
        .filter(|l| l.len() > 3)
        .map(|l| (&l[..2], &l[3..]))
        .collect();
    let last = entries.len().saturating_sub(1);
    entries
        .iter()
        .enumerate()
        .map(|(i, (status, path))| {
            let prefix = if i == last { "└─" } else { "├─" };
            format!("{}\t{}\t{}", prefix, status, path)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `date\tname\tHEAD-marker` becomes `date\tname`, with ` (*)` on the
/// checked-out branch
pub fn format_branches(raw: &str) -> String {
    raw.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let parts: Vec<&str> = line.splitn(3, '\t').collect();
            match parts.as_slice() {
                [date, name, head] if head.trim() == "*" => format!("{}\t{} (*)", date, name),
                [date, name, ..] => format!("{}\t{}", date, name),
                _ => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Graph log lines with commit nodes drawn as `○`
pub fn format_commits(raw: &str) -> String {
    raw.lines()
        .map(|line| match line.split_once('\t') {
            Some((graph, rest)) => format!("{}\t{}", graph.replace('*', "○"), rest),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_the_command_line() {
        assert_eq!(GitCommand::Files.description(), "git status --porcelain");
        let cmd = GitCommand::RenameBranch {
            from: "old".to_string(),
            to: "new".to_string(),
        };
        assert_eq!(cmd.description(), "git branch -m old new");
    }

    #[test]
    fn file_diff_picks_side_from_status() {
        let diff = |status: &str| GitCommand::FileDiff {
            path: "src/lib.rs".to_string(),
            status: status.to_string(),
        };
        assert_eq!(diff(" M").args(), ["diff", "--", "src/lib.rs"]);
        assert_eq!(diff("M ").args(), ["diff", "--cached", "--", "src/lib.rs"]);
        assert_eq!(diff("MM").args(), ["diff", "--", "src/lib.rs"]);
        assert_eq!(
            diff("??").args(),
            ["diff", "--no-index", "--", "/dev/null", "src/lib.rs"]
        );
        assert!(diff("??").accepts_exit_code(1));
        assert!(!diff(" M").accepts_exit_code(1));
    }

    #[test]
    fn stash_push_message_is_optional() {
        assert_eq!(GitCommand::StashPush { message: None }.args(), ["stash", "push"]);
        assert_eq!(
            GitCommand::StashPush { message: Some("wip".to_string()) }.args(),
            ["stash", "push", "-m", "wip"]
        );
    }

    #[test]
    fn targets() {
        assert_eq!(GitCommand::StatusText.target(), Target::Main);
        assert_eq!(GitCommand::Stashes.target(), Target::Stash);
        assert_eq!(GitCommand::RepoInfo.target(), Target::RepoInfo);
        assert!(GitCommand::StageAll.is_action());
        assert!(GitCommand::Commit { message: "x".to_string() }.is_action());
        assert!(!GitCommand::Files.is_action());
    }

    #[test]
    fn normalize_error_strips_git_prefixes() {
        assert_eq!(
            normalize_error(128, "fatal: not a git repository\n"),
            "[ERROR - 128] not a git repository"
        );
        assert_eq!(
            normalize_error(1, "error: pathspec 'x' did not match"),
            "[ERROR - 1] pathspec 'x' did not match"
        );
        assert_eq!(normalize_error(2, "plain"), "[ERROR - 2] plain");
    }

    #[test]
    fn error_output_is_displayed_instead_of_text() {
        let output = CommandOutput {
            text: "ignored".to_string(),
            description: "git x".to_string(),
            error: Some("[ERROR - 1] bad".to_string()),
        };
        assert_eq!(output.display_text(), "[ERROR - 1] bad");
    }

    #[test]
    fn repo_info_uses_directory_name() {
        assert_eq!(format_repo_info("/home/me/projects/gitdeck\nmain\n"), "gitdeck\nmain");
    }

    #[test]
    fn files_become_tab_separated_tree() {
        let raw = " M src/main.rs\nA  new.rs\n?? notes.txt\n";
        assert_eq!(
            format_files(raw),
            "├─\t M\tsrc/main.rs\n├─\tA \tnew.rs\n└─\t??\tnotes.txt"
        );
        assert_eq!(format_files(""), "");
    }

    #[test]
    fn branches_mark_head() {
        let raw = "2 hours ago\tmain\t*\n3 days ago\tfeature\t \n";
        assert_eq!(
            format_branches(raw),
            "2 hours ago\tmain (*)\n3 days ago\tfeature"
        );
    }

    #[test]
    fn commits_draw_graph_nodes() {
        let raw = "* \tabc1234\tAda\tAdd parser\n|\\  \n| * \tdef5678\tBob\tMerge branch\n";
        assert_eq!(
            format_commits(raw),
            "○ \tabc1234\tAda\tAdd parser\n|\\  \n| ○ \tdef5678\tBob\tMerge branch"
        );
    }
}
