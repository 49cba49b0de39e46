pub mod api;
pub mod app;
pub mod config;
pub mod decode;
pub mod error;
pub mod events;
pub mod export;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod range;
pub mod ui;
