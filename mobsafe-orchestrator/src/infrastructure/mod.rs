pub mod alerts;

pub use alerts::{AlertFeed, AlertSeverity, SecurityAlert};
