pub mod app;
pub mod config;
pub mod error;
pub mod frontend;
pub mod handlers;
pub mod language;
pub mod provider;
pub mod relay;
pub mod upstream;
