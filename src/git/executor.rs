use std::path::PathBuf;
use std::sync::mpsc;

use super::command::{run, CommandOutput, GitCommand};

/// A finished git command, sent back to the event loop
#[derive(Debug, Clone)]
pub struct Completion {
    pub command: GitCommand,
    pub output: CommandOutput,
}

/// Runs git commands off the UI thread. Results arrive on the receiver in
/// the order the commands finish.
#[derive(Debug, Clone)]
pub struct Executor {
    repo_root: PathBuf,
    tx: mpsc::Sender<Completion>,
}

impl Executor {
    pub fn new(repo_root: PathBuf) -> (Self, mpsc::Receiver<Completion>) {
        let (tx, rx) = mpsc::channel();
        (Executor { repo_root, tx }, rx)
    }

    /// Fire and forget; there is no way to cancel a dispatched command.
    pub fn dispatch(&self, command: GitCommand) {
        let tx = self.tx.clone();
        let root = self.repo_root.clone();
        std::thread::spawn(move || {
            let output = run(&command, &root);
            if tx.send(Completion { command, output }).is_err() {
                tracing::debug!("event loop gone, dropping git result");
            }
        });
    }

    pub fn dispatch_all(&self, commands: impl IntoIterator<Item = GitCommand>) {
        for command in commands {
            self.dispatch(command);
        }
    }
}
