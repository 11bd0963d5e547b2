pub mod cli;
pub mod config;
pub mod data;
pub mod index;
pub mod logging;
pub mod parallel;
pub mod server;
