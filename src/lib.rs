pub mod boggle;
pub mod config;
pub mod utils;
