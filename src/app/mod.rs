pub mod keymap;
pub mod panel;
pub mod popup;
mod state;

pub use panel::{FrameLayout, Panel, PanelId};
pub use popup::{CommitField, Mode, Popup, Resolution};
pub use state::App;
