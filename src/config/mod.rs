pub mod base_url;
pub mod settings;

pub use settings::{RelayConfig, ServerConfig, Settings};
