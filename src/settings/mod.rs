//! TOML settings loaded through `config`, selected on the command line.
//! See `bin/settings_demo.rs` for a binary printing what was loaded.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
