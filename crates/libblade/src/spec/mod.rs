//! Descriptors of commands, actions and flags.
//!
//! Descriptors are built once at start-up and only read afterwards.
mod action;
mod command;
mod flag;

pub use action::ActionSpec;
pub use command::CommandSpec;
pub use flag::FlagSpec;
