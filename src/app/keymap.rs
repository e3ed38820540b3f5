use super::panel::PanelId;
use super::popup::Mode;

/// A key (or key group) and what it does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub keys: &'static str,
    pub help: &'static str,
}

const fn bind(keys: &'static str, help: &'static str) -> Binding {
    Binding { keys, help }
}

/// A titled group of bindings in the help view
#[derive(Debug, Clone, Copy)]
pub struct HelpSection {
    pub title: &'static str,
    pub bindings: &'static [Binding],
}

const NAVIGATION: &[Binding] = &[
    bind("tab", "next panel"),
    bind("shift+tab", "previous panel"),
    bind("0-6", "focus panel"),
    bind("j/k ↑/↓", "move / scroll"),
    bind("pgup/pgdn", "scroll main"),
    bind("ctrl+u/ctrl+d", "scroll main"),
];

const GLOBAL: &[Binding] = &[
    bind("v", "toggle split/unified diff"),
    bind("t", "next theme"),
    bind("r", "refresh"),
    bind("w", "toggle file watching"),
    bind("?", "toggle help"),
    bind("q", "quit"),
];

const FILES: &[Binding] = &[
    bind("space", "stage/unstage"),
    bind("a", "stage all"),
    bind("d", "discard changes"),
    bind("c", "commit"),
];

const BRANCHES: &[Binding] = &[
    bind("enter", "checkout"),
    bind("n", "new branch"),
    bind("R", "rename"),
    bind("D", "delete"),
];

const COMMITS: &[Binding] = &[bind("j/k", "select commit")];

const STASH: &[Binding] = &[
    bind("s", "stash changes"),
    bind("p", "pop"),
    bind("D", "drop"),
];

const POPUPS: &[Binding] = &[
    bind("enter", "confirm"),
    bind("esc", "cancel"),
    bind("y/n", "answer confirmation"),
    bind("tab", "switch commit title/description"),
    bind("ctrl+s", "commit from any field"),
];

const SECTIONS: &[HelpSection] = &[
    HelpSection { title: "Navigation", bindings: NAVIGATION },
    HelpSection { title: "Global", bindings: GLOBAL },
    HelpSection { title: "Files", bindings: FILES },
    HelpSection { title: "Branches", bindings: BRANCHES },
    HelpSection { title: "Commits", bindings: COMMITS },
    HelpSection { title: "Stash", bindings: STASH },
    HelpSection { title: "Popups", bindings: POPUPS },
];

/// Bindings for the help bar while `panel` has focus
pub fn short_help(panel: PanelId) -> Vec<Binding> {
    let mut bindings: Vec<Binding> = match panel {
        PanelId::Files => FILES.to_vec(),
        PanelId::Branches => BRANCHES.to_vec(),
        PanelId::Stash => STASH.to_vec(),
        PanelId::Main | PanelId::Secondary => vec![bind("j/k", "scroll")],
        PanelId::Status | PanelId::Commits => Vec::new(),
    };
    bindings.extend([bind("tab", "next panel"), bind("v", "diff view"), bind("q", "quit")]);
    bindings
}

/// Bindings for the help bar while the help view is open
pub fn help_view_short_help() -> Vec<Binding> {
    vec![bind("j/k", "scroll"), bind("esc/?", "close help"), bind("q", "quit")]
}

/// Bindings for the help bar while a popup is open
pub fn popup_short_help(mode: Mode) -> Vec<Binding> {
    match mode {
        Mode::Normal => Vec::new(),
        Mode::Input => vec![bind("enter", "confirm"), bind("esc", "cancel")],
        Mode::Confirm => vec![bind("y", "confirm"), bind("n/esc", "cancel")],
        Mode::Commit => vec![
            bind("tab", "switch field"),
            bind("ctrl+s", "commit"),
            bind("esc", "cancel"),
        ],
    }
}

pub fn full_help() -> &'static [HelpSection] {
    SECTIONS
}
