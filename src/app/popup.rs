use std::fmt;

use thiserror::Error;

use crate::git::GitCommand;

/// Identifies one popup activation
pub type RequestId = u64;

/// Interaction mode, derived from whichever popup is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Input,
    Confirm,
    Commit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    Input,
    Confirm,
    Commit,
}

impl fmt::Display for PopupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PopupKind::Input => "input",
            PopupKind::Confirm => "confirm",
            PopupKind::Commit => "commit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PopupError {
    #[error("a {active} popup is already open")]
    AlreadyActive { active: PopupKind },
    #[error("no popup is open")]
    NoneActive,
}

// ── Continuations ──

/// What to do with the text of an input popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    CreateBranch,
    RenameBranch { from: String },
    StashPush,
}

impl InputAction {
    fn complete(self, value: &str) -> Result<GitCommand, &'static str> {
        let value = value.trim();
        match self {
            InputAction::CreateBranch => {
                if value.is_empty() {
                    return Err("Branch name cannot be empty");
                }
                Ok(GitCommand::CreateBranch { name: value.to_string() })
            }
            InputAction::RenameBranch { from } => {
                if value.is_empty() {
                    return Err("Branch name cannot be empty");
                }
                Ok(GitCommand::RenameBranch { from, to: value.to_string() })
            }
            InputAction::StashPush => Ok(GitCommand::StashPush {
                message: (!value.is_empty()).then(|| value.to_string()),
            }),
        }
    }
}

/// What a yes/no popup confirms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteBranch { name: String },
    DiscardFile { path: String },
    PopStash { name: String },
    DropStash { name: String },
}

impl ConfirmAction {
    fn complete(self) -> GitCommand {
        match self {
            ConfirmAction::DeleteBranch { name } => GitCommand::DeleteBranch { name },
            ConfirmAction::DiscardFile { path } => GitCommand::DiscardFile { path },
            ConfirmAction::PopStash { name } => GitCommand::StashPop { name },
            ConfirmAction::DropStash { name } => GitCommand::StashDrop { name },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitAction {
    Commit,
}

impl CommitAction {
    fn complete(self, title: &str, description: &str) -> Result<GitCommand, &'static str> {
        let title = title.trim();
        if title.is_empty() {
            return Err("Commit title cannot be empty");
        }
        let description = description.trim();
        let message = if description.is_empty() {
            title.to_string()
        } else {
            format!("{}\n\n{}", title, description)
        };
        match self {
            CommitAction::Commit => Ok(GitCommand::Commit { message }),
        }
    }
}

// ── Popups ──

/// A request to open a popup, carrying the continuation for its answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupRequest {
    Input {
        title: String,
        initial: String,
        action: InputAction,
    },
    Confirm {
        message: String,
        action: ConfirmAction,
    },
    Commit {
        action: CommitAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitField {
    Title,
    Description,
}

/// An open popup: its buffers plus the pending continuation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popup {
    Input {
        title: String,
        buffer: String,
        action: InputAction,
    },
    Confirm {
        message: String,
        action: ConfirmAction,
    },
    Commit {
        title: String,
        description: String,
        focus: CommitField,
        action: CommitAction,
    },
}

impl Popup {
    pub fn kind(&self) -> PopupKind {
        match self {
            Popup::Input { .. } => PopupKind::Input,
            Popup::Confirm { .. } => PopupKind::Confirm,
            Popup::Commit { .. } => PopupKind::Commit,
        }
    }

    fn from_request(request: PopupRequest) -> Self {
        match request {
            PopupRequest::Input { title, initial, action } => Popup::Input {
                title,
                buffer: initial,
                action,
            },
            PopupRequest::Confirm { message, action } => Popup::Confirm { message, action },
            PopupRequest::Commit { action } => Popup::Commit {
                title: String::new(),
                description: String::new(),
                focus: CommitField::Title,
                action,
            },
        }
    }

    /// Run the continuation with the captured value(s)
    fn complete(self) -> Result<GitCommand, &'static str> {
        match self {
            Popup::Input { buffer, action, .. } => action.complete(&buffer),
            Popup::Confirm { action, .. } => Ok(action.complete()),
            Popup::Commit { title, description, action, .. } => action.complete(&title, &description),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePopup {
    pub id: RequestId,
    pub popup: Popup,
}

/// How the user closed a popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupOutcome {
    /// Closed without running the continuation
    Cancelled { id: RequestId },
    /// The continuation ran; `Err` carries a message for the user
    Completed {
        id: RequestId,
        result: Result<GitCommand, &'static str>,
    },
}

// ── State machine ──

/// At most one popup at a time. Requests while one is open are rejected and
/// leave the open popup untouched.
#[derive(Debug, Default)]
pub struct PopupState {
    active: Option<ActivePopup>,
    next_id: RequestId,
}

impl PopupState {
    pub fn mode(&self) -> Mode {
        match self.active.as_ref().map(|a| a.popup.kind()) {
            None => Mode::Normal,
            Some(PopupKind::Input) => Mode::Input,
            Some(PopupKind::Confirm) => Mode::Confirm,
            Some(PopupKind::Commit) => Mode::Commit,
        }
    }

    pub fn active(&self) -> Option<&ActivePopup> {
        self.active.as_ref()
    }

    pub fn request(&mut self, request: PopupRequest) -> Result<RequestId, PopupError> {
        if let Some(active) = &self.active {
            return Err(PopupError::AlreadyActive { active: active.popup.kind() });
        }
        self.next_id += 1;
        let id = self.next_id;
        self.active = Some(ActivePopup {
            id,
            popup: Popup::from_request(request),
        });
        Ok(id)
    }

    /// Close the open popup, running its continuation on confirm.
    pub fn resolve(&mut self, resolution: Resolution) -> Result<PopupOutcome, PopupError> {
        let ActivePopup { id, popup } = self.active.take().ok_or(PopupError::NoneActive)?;
        Ok(match resolution {
            Resolution::Cancel => PopupOutcome::Cancelled { id },
            Resolution::Confirm => PopupOutcome::Completed {
                id,
                result: popup.complete(),
            },
        })
    }

    // ── Editing ──

    pub fn push_char(&mut self, c: char) {
        match self.active.as_mut().map(|a| &mut a.popup) {
            Some(Popup::Input { buffer, .. }) => buffer.push(c),
            Some(Popup::Commit { title, focus: CommitField::Title, .. }) => title.push(c),
            Some(Popup::Commit { description, focus: CommitField::Description, .. }) => {
                description.push(c)
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.active.as_mut().map(|a| &mut a.popup) {
            Some(Popup::Input { buffer, .. }) => {
                buffer.pop();
            }
            Some(Popup::Commit { title, focus: CommitField::Title, .. }) => {
                title.pop();
            }
            Some(Popup::Commit { description, focus: CommitField::Description, .. }) => {
                description.pop();
            }
            _ => {}
        }
    }

    /// Newline in the commit description; ignored everywhere else
    pub fn newline(&mut self) {
        if let Some(Popup::Commit { description, focus: CommitField::Description, .. }) =
            self.active.as_mut().map(|a| &mut a.popup)
        {
            description.push('\n');
        }
    }

    pub fn toggle_commit_focus(&mut self) {
        if let Some(Popup::Commit { focus, .. }) = self.active.as_mut().map(|a| &mut a.popup) {
            *focus = match focus {
                CommitField::Title => CommitField::Description,
                CommitField::Description => CommitField::Title,
            };
        }
    }

    pub fn commit_focus(&self) -> Option<CommitField> {
        match self.active.as_ref().map(|a| &a.popup) {
            Some(Popup::Commit { focus, .. }) => Some(*focus),
            _ => None,
        }
    }
}
