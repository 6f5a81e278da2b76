//! Application service layer - config, scan use case, tips

pub mod app;
pub mod config;
pub mod repository;
pub mod tips;
