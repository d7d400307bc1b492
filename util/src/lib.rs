pub mod config;
pub mod faces;
pub mod state;
