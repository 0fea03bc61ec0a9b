// src/commands/mod.rs
//! Command handlers for the native2ascii CLI

mod completions;
pub mod progress;
mod resources;
mod stream;

pub use completions::cmd_completions;
pub use resources::cmd_resources;
pub use stream::{cmd_decode, cmd_encode};
