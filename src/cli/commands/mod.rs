//! CLI subcommand implementations

pub mod scan;
