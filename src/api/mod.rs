pub mod exercise;
pub mod models;
