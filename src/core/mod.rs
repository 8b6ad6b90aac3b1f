pub mod app;
pub mod config;
pub mod constants;
pub mod controller;
pub mod message;
pub mod model_switch;
pub mod transcript;
