// src/lib.rs
pub mod banner;
pub mod config;
pub mod errors;
pub mod models;
pub mod panel;
pub mod render;
pub mod runner;
pub mod service;
