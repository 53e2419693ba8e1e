pub mod prompts;
pub mod providers;
pub mod response_parser;

pub use providers::GoogleAIProvider;
pub use response_parser::ResponseParser;
