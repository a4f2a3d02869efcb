pub mod app;
pub mod cli;
pub mod configs;
pub mod consts;
pub mod error;
pub mod logger;
