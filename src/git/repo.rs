use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// System directories nobody should turn into a repository by accident
const UNSAFE_INIT_DIRS: [&str; 3] = ["/", "/home", "/tmp"];

/// Top-level directory of the repository containing `dir`
pub fn repo_root(dir: &Path) -> Result<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(dir)
        .output()
        .context("Failed to run git")?;

    if !output.status.success() {
        anyhow::bail!("Not a git repository: {}", dir.display());
    }

    Ok(PathBuf::from(String::from_utf8_lossy(&output.stdout).trim()))
}

/// Find the repository for `dir`, creating one with `git init` when `init`
/// is set and `dir` isn't inside a work tree yet.
pub fn ensure_git_repo(dir: &Path, init: bool) -> Result<PathBuf> {
    if let Ok(root) = repo_root(dir) {
        return Ok(root);
    }
    if !init {
        anyhow::bail!(
            "Not a git repository: {} (run with --init to create one)",
            dir.display()
        );
    }

    let home = dirs::home_dir();
    if let Some(reason) = unsafe_init_reason(dir, home.as_deref()) {
        let stdin = std::io::stdin();
        if !prompt_init_confirmation(dir, reason, &mut stdin.lock())? {
            anyhow::bail!("Aborted: no repository created in {}", dir.display());
        }
    }

    let output = Command::new("git")
        .arg("init")
        .current_dir(dir)
        .output()
        .context("Failed to run git init")?;
    if !output.status.success() {
        anyhow::bail!(
            "git init failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    tracing::info!(path = %dir.display(), "initialized repository");
    repo_root(dir)
}

/// Why initializing a repository in `dir` deserves a second thought
pub fn unsafe_init_reason(dir: &Path, home: Option<&Path>) -> Option<&'static str> {
    if UNSAFE_INIT_DIRS.iter().any(|d| dir == Path::new(d)) {
        return Some("system directory");
    }
    if home.is_some_and(|h| dir == h) {
        return Some("home directory");
    }
    None
}

/// Warn on stdout and read a `y` / `N` answer from `input`
fn prompt_init_confirmation(dir: &Path, reason: &str, input: &mut impl BufRead) -> Result<bool> {
    let mut stdout = std::io::stdout();
    writeln!(
        stdout,
        "\nWARNING: about to initialize a git repository in a {}:\n   Path: {}\n",
        reason,
        dir.display()
    )?;
    write!(stdout, "Continue? [y/N]: ")?;
    stdout.flush()?;
    read_confirmation(input)
}

fn read_confirmation(input: &mut impl BufRead) -> Result<bool> {
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read answer")?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
