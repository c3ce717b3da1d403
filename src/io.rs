pub mod cli;
pub mod config;
pub mod obj_loader;
pub mod preview;
