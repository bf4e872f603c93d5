pub mod app;
pub mod client;
pub mod components;
pub mod config;
pub mod picture;
pub mod tui;
pub mod types;
pub mod utils;
pub mod widgets;
