pub mod app;
pub mod config;
pub mod loader;
pub mod map;
pub mod parser;
