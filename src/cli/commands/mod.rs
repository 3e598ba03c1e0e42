//! CLI command implementations.

mod config;
mod generate;
mod search;
mod serve;
mod transcript;

pub use config::run_config;
pub use generate::{run_generate, GenerateOptions};
pub use search::run_search;
pub use serve::run_serve;
pub use transcript::run_transcript;
