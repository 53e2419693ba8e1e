pub mod google_ai;

pub use google_ai::GoogleAIProvider;
