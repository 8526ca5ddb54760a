//! isgpt command-line client

pub mod cli;
pub mod client;

pub use cli::Cli;
pub use client::{read_input, IsgptClient};
