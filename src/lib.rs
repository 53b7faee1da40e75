pub mod commands;
pub mod config;
pub mod encode;
pub mod error;
pub mod fs;
pub mod logging;
pub mod remote;
pub mod sink;
pub mod status;
pub mod validation;
