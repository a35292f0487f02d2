pub mod backend;
pub mod cli;
pub mod config;
pub mod generate;
pub mod models;
