pub mod config;
pub mod line;
pub mod session;
