//! MobSafe - main application library
//!
//! Wires the report generator, the session controller and the alert feed
//! together and hosts the `mobsafe` command line interface.

mod app;
pub mod cli;

pub use app::{AppHandle, build_generator, create_app, create_app_with_generator};
pub use mobsafe_core::{Config, init_tracing};

// Re-export for convenience
pub use mobsafe_core;
pub use mobsafe_llm;
pub use mobsafe_orchestrator;
