//! Tripgraph CLI library.
//!
//! Argument types and command handlers for the `tripgraph` binary. The binary
//! only parses arguments, installs logging and dispatches to these handlers.

pub mod args;
pub mod commands;
pub mod output;
