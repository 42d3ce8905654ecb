//! Subcommand implementations.

pub mod checkout;
pub mod deploy;
pub mod notes;
pub mod status;
