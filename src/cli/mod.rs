//! CLI module for rekono-tools - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
