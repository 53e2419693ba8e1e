//! MobSafe Core - Foundation crate for the MobSafe workspace
//!
//! This crate provides the pieces shared by the scan orchestrator, the report
//! generator and the CLI:
//!
//! # Modules
//!
//! - [`config`] — Strongly-typed configuration with TOML and environment variable support
//! - [`domain`] — Security report, vulnerability, threat level and user models
//! - [`logging`] — Structured logging with tracing
//!
//! # Configuration
//!
//! ```rust,ignore
//! use mobsafe_core::Config;
//!
//! let config = Config::load()?;
//! ```
//!
//! Environment variables use the `MOBSAFE__` prefix with double underscore separators:
//!
//! ```bash
//! MOBSAFE__SCAN__DURATION_MS=6000
//! MOBSAFE__LLM__DEFAULT_MODEL=gemini-2.5-flash
//! ```
//!
//! # Logging
//!
//! ```rust,ignore
//! use mobsafe_core::init_tracing;
//!
//! init_tracing(&config.logging)?;
//! ```

pub mod config;
pub mod domain;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
