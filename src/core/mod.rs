pub mod config;
pub mod error;
pub mod exercise;
pub mod pose;
pub mod video;
