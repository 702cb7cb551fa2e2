pub mod config;
pub mod demo;

pub use config::config_command;
pub use demo::demo_command;
