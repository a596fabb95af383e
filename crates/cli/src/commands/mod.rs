//! Binary subcommands.

pub mod orders;
pub mod products;
pub mod shell;
