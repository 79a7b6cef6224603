//! Child process execution.

pub mod command;

pub use command::{
    execute, execute_captured, execute_inherited, CommandOptions, CommandResult,
};
