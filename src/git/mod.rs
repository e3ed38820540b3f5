pub mod command;
pub mod diff;
mod executor;
mod repo;

pub use command::{CommandOutput, GitCommand, Target};
pub use executor::{Completion, Executor};
pub use repo::ensure_git_repo;
